/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the persistence layer and the UI layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One successfully processed image, as kept in the recent history.
///
/// Records are created once per successful removal, never mutated, and
/// removed only by explicit deletion or eviction from the bounded history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// Unique id, derived from the creation time in milliseconds
    pub id: String,
    /// Original file name (e.g., "portrait.jpg")
    pub name: String,
    /// Cached copy of the uploaded original
    pub original_path: PathBuf,
    /// Cached background-removed result
    pub processed_path: PathBuf,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ProcessedImage {
    /// Human-readable age of this record, e.g. "5 minutes ago"
    pub fn age_label(&self) -> String {
        relative_age(self.timestamp, chrono::Utc::now().timestamp_millis())
    }
}

/// Format the distance between two millisecond timestamps as a coarse
/// relative-time label
fn relative_age(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - timestamp_ms).max(0) / 1000;

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        if minutes == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{} minutes ago", minutes)
        }
    } else if seconds < 86_400 {
        let hours = seconds / 3600;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else {
        let days = seconds / 86_400;
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{} days ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_age_buckets() {
        let now = 1_000_000_000_000;
        assert_eq!(relative_age(now - 30 * 1000, now), "just now");
        assert_eq!(relative_age(now - 60 * 1000, now), "1 minute ago");
        assert_eq!(relative_age(now - 5 * 60 * 1000, now), "5 minutes ago");
        assert_eq!(relative_age(now - 2 * 3600 * 1000, now), "2 hours ago");
        assert_eq!(relative_age(now - 3 * 86_400 * 1000, now), "3 days ago");
    }

    #[test]
    fn test_relative_age_never_negative() {
        // A clock that moved backwards should not produce nonsense
        let now = 1_000_000_000_000;
        assert_eq!(relative_age(now + 60 * 1000, now), "just now");
    }
}
