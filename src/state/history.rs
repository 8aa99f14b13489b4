use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use super::data::ProcessedImage;

/// Maximum number of records kept in the recent history.
/// Older records beyond this bound are evicted on every push.
pub const MAX_RECENT: usize = 10;

/// The History keeps the bounded, newest-first list of processed images
/// and persists it as a single JSON file in the user's data directory.
///
/// The file lives at:
/// - Linux: ~/.local/share/bg-remover/recent_images.json
/// - macOS: ~/Library/Application Support/bg-remover/recent_images.json
/// - Windows: %APPDATA%\bg-remover\recent_images.json
pub struct History {
    entries: Vec<ProcessedImage>,
    path: PathBuf,
}

/// Get the application data directory
pub fn storage_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(|| dirs::home_dir())
        .expect("Could not determine user data directory");

    path.push("bg-remover");
    path
}

/// Directory holding the cached original/processed image pairs
pub fn images_dir() -> PathBuf {
    storage_dir().join("images")
}

impl History {
    /// Load the history from its default location
    pub fn load() -> Self {
        Self::load_from(storage_dir().join("recent_images.json"))
    }

    /// Load the history from an explicit file path.
    ///
    /// A missing or unparseable file yields an empty history. Corrupt
    /// persisted data must never take the application down.
    pub fn load_from(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Vec<ProcessedImage>>(&json) {
                Ok(entries) => {
                    info!("📁 Loaded {} recent images from {}", entries.len(), path.display());
                    entries
                }
                Err(e) => {
                    warn!("⚠️  Recent images file is corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        History { entries, path }
    }

    /// All records, newest first
    pub fn entries(&self) -> &[ProcessedImage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&ProcessedImage> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Prepend a freshly processed record, enforce the bound, and persist.
    ///
    /// Returns the evicted records so the caller can release their cached
    /// files. Any existing record with the same id is replaced, keeping ids
    /// unique.
    pub fn push(&mut self, record: ProcessedImage) -> Vec<ProcessedImage> {
        self.entries.retain(|entry| entry.id != record.id);
        self.entries.insert(0, record);

        let evicted = if self.entries.len() > MAX_RECENT {
            self.entries.split_off(MAX_RECENT)
        } else {
            Vec::new()
        };

        self.save();
        evicted
    }

    /// Remove a record by id and persist.
    ///
    /// Removing an unknown id is a no-op on the sequence but still rewrites
    /// the persisted slot.
    pub fn remove(&mut self, id: &str) -> Option<ProcessedImage> {
        let removed = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .map(|index| self.entries.remove(index));

        self.save();
        removed
    }

    /// Write the full sequence to disk.
    ///
    /// A write failure is logged and otherwise ignored: losing one flush
    /// only costs history across restarts, never the running session.
    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("⚠️  Failed to create data directory {}: {}", parent.display(), e);
                return;
            }
        }

        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!("⚠️  Failed to persist recent images: {}", e);
                }
            }
            Err(e) => warn!("⚠️  Failed to serialize recent images: {}", e),
        }
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("len", &self.entries.len())
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ProcessedImage {
        ProcessedImage {
            id: id.to_string(),
            name: format!("photo-{}.png", id),
            original_path: PathBuf::from(format!("/tmp/{}-original.png", id)),
            processed_path: PathBuf::from(format!("/tmp/{}-processed.png", id)),
            timestamp: 1_000 + id.parse::<i64>().unwrap_or(0),
        }
    }

    #[test]
    fn test_push_prepends() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load_from(dir.path().join("recent.json"));

        history.push(record("1"));
        history.push(record("2"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].id, "2");
        assert_eq!(history.entries()[1].id, "1");
    }

    #[test]
    fn test_push_evicts_beyond_bound() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load_from(dir.path().join("recent.json"));

        for i in 0..MAX_RECENT {
            let evicted = history.push(record(&i.to_string()));
            assert!(evicted.is_empty());
        }
        assert_eq!(history.len(), MAX_RECENT);

        // The 11th push evicts the oldest entry
        let evicted = history.push(record("10"));
        assert_eq!(history.len(), MAX_RECENT);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, "0");
        assert_eq!(history.entries()[0].id, "10");
        assert!(history.get("0").is_none());
    }

    #[test]
    fn test_push_replaces_duplicate_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load_from(dir.path().join("recent.json"));

        history.push(record("1"));
        history.push(record("1"));

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_remove_unknown_id_still_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        let mut history = History::load_from(path.clone());
        history.push(record("1"));

        // Drop the slot on disk, then remove an id that is not present:
        // the sequence is unchanged but the slot is rewritten
        fs::remove_file(&path).unwrap();
        assert!(history.remove("missing").is_none());

        assert_eq!(history.len(), 1);
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");

        let mut history = History::load_from(path.clone());
        history.push(record("1"));
        history.push(record("2"));
        history.push(record("3"));

        let reloaded = History::load_from(path);
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn test_malformed_file_yields_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        fs::write(&path, "{ this is not json").unwrap();

        let history = History::load_from(path);
        assert!(history.is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::load_from(dir.path().join("does-not-exist.json"));
        assert!(history.is_empty());
    }
}
