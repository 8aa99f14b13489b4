use chrono::Utc;
use iced::widget::canvas::Canvas;
use iced::widget::image::Handle as ImageHandle;
use iced::widget::{
    button, checkbox, column, container, pick_list, row, scrollable, text, Column,
};
use iced::{Alignment, Element, Length, Task, Theme};
use log::{error, info, warn};
use rfd::FileDialog;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod config;
mod remote;
mod state;
mod ui;

use remote::{ProcessError, RemovalClient};
use state::data::ProcessedImage;
use state::history::History;
use state::options::{OutputFormat, OutputSize, ProcessingOptions};
use ui::compare::ImageCompare;
use ui::toast::{Toast, TOAST_SECONDS};

/// The pair currently shown in the comparison view
struct Comparison {
    /// Original file name of the upload
    name: String,
    /// The uploaded original
    original: ImageHandle,
    /// Pixel dimensions of the original, for aspect-correct drawing
    image_size: Option<(u32, u32)>,
    /// None while a submission is in flight or after a failure
    processed: Option<ImageHandle>,
    /// Cached file backing the processed half, used for downloads
    processed_path: Option<PathBuf>,
}

/// Bookkeeping for the one submission that may be in flight.
/// Its presence doubles as the busy flag: no second submission can start
/// while this is `Some`.
struct PendingSubmission {
    /// The picked source file
    source: PathBuf,
    /// Original file name (e.g., "portrait.jpg")
    name: String,
    /// Options captured at submission time
    options: ProcessingOptions,
}

/// Main application state
struct BgRemover {
    /// The bounded, persisted history of recent results
    history: History,
    /// Current processing options, replaced wholesale on each UI change
    options: ProcessingOptions,
    /// remove.bg credential, injected via environment or config file
    api_key: Option<String>,
    /// The active before/after pair
    active: Option<Comparison>,
    /// The submission currently in flight, if any
    pending: Option<PendingSubmission>,
    /// Divider position of the comparison view, in [0, 100]
    compare_position: f32,
    /// The transient notice currently on screen
    toast: Option<Toast>,
    /// Monotonic counter so an expiry task only clears its own toast
    toast_seq: u64,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Choose Image" button
    PickImage,
    /// The in-flight submission completed
    ProcessFinished(Result<Vec<u8>, ProcessError>),
    /// User picked an output size
    SizeSelected(OutputSize),
    /// User picked an output format
    FormatSelected(OutputFormat),
    /// User toggled auto-crop
    CropToggled(bool),
    /// User dragged the comparison divider to a new percentage
    CompareDragged(f32),
    /// Download the currently displayed result
    DownloadCurrent,
    /// Re-open a history entry in the comparison view
    SelectRecent(String),
    /// Download a history entry's result
    DownloadRecent(String),
    /// Delete a history entry
    DeleteRecent(String),
    /// A toast's display window elapsed
    ToastExpired(u64),
}

impl BgRemover {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let history = History::load();
        let api_key = config::load_api_key();

        if api_key.is_none() {
            warn!(
                "⚠️  No API key configured. Set ${} or put {{\"api_key\": \"...\"}} in {}",
                config::API_KEY_ENV,
                state::history::storage_dir().join("config.json").display()
            );
        }

        info!(
            "🎨 Background Remover initialized with {} recent images",
            history.len()
        );

        (
            BgRemover {
                history,
                options: ProcessingOptions::default(),
                api_key,
                active: None,
                pending: None,
                compare_position: 50.0,
                toast: None,
                toast_seq: 0,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                // One submission at a time; the button is disabled while
                // busy, this guard covers any other path in
                if self.pending.is_some() {
                    return self.show_toast(Toast::error("Still processing the previous image"));
                }

                let Some(api_key) = self.api_key.clone() else {
                    return self.show_toast(Toast::error(
                        "No API key configured. Set REMOVE_BG_API_KEY and restart.",
                    ));
                };

                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select an image")
                    .add_filter("Images", &["png", "jpg", "jpeg"])
                    .pick_file();

                let Some(path) = file else {
                    return Task::none();
                };

                // Oversized files are rejected before any network activity
                let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                if remote::client::exceeds_size_limit(size) {
                    return self.show_toast(Toast::error("File size exceeds 5MB limit"));
                }

                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "image".to_string());
                let options = self.options;

                // Show the original right away while the request is in flight
                self.active = Some(Comparison {
                    name: name.clone(),
                    original: ImageHandle::from_path(&path),
                    image_size: image::image_dimensions(&path).ok(),
                    processed: None,
                    processed_path: None,
                });
                self.compare_position = 50.0;
                self.pending = Some(PendingSubmission {
                    source: path.clone(),
                    name: name.clone(),
                    options,
                });

                // Launch the removal request
                Task::perform(
                    process_image(path, name, options, api_key),
                    Message::ProcessFinished,
                )
            }

            Message::ProcessFinished(result) => {
                let Some(pending) = self.pending.take() else {
                    return Task::none();
                };

                match result {
                    Ok(bytes) => {
                        let record = self.store_result(&pending, &bytes);

                        if let Some(comparison) = &mut self.active {
                            comparison.processed = Some(ImageHandle::from_bytes(bytes));
                            comparison.processed_path = Some(record.processed_path.clone());
                        }
                        self.compare_position = 50.0;

                        // Evicted records take their cached files with them
                        for evicted in self.history.push(record) {
                            discard_cached_files(&evicted);
                        }

                        self.show_toast(Toast::success("Image processed successfully!"))
                    }
                    Err(e) => {
                        error!("❌ Processing failed: {}", e);

                        // Keep the freshly picked original on screen, but
                        // never a stale before/after pair
                        if let Some(comparison) = &mut self.active {
                            comparison.processed = None;
                            comparison.processed_path = None;
                        }

                        self.show_toast(Toast::error("Failed to process image"))
                    }
                }
            }

            Message::SizeSelected(size) => {
                self.options = ProcessingOptions {
                    size,
                    ..self.options
                };
                Task::none()
            }

            Message::FormatSelected(format) => {
                self.options = ProcessingOptions {
                    format,
                    ..self.options
                };
                Task::none()
            }

            Message::CropToggled(crop) => {
                self.options = ProcessingOptions {
                    crop,
                    ..self.options
                };
                Task::none()
            }

            Message::CompareDragged(position) => {
                self.compare_position = position;
                Task::none()
            }

            Message::DownloadCurrent => {
                let Some((path, name)) = self
                    .active
                    .as_ref()
                    .and_then(|c| Some((c.processed_path.clone()?, c.name.clone())))
                else {
                    return Task::none();
                };

                self.download(&path, &name)
            }

            Message::SelectRecent(id) => {
                if let Some(entry) = self.history.get(&id) {
                    self.active = Some(Comparison {
                        name: entry.name.clone(),
                        original: ImageHandle::from_path(&entry.original_path),
                        image_size: image::image_dimensions(&entry.original_path).ok(),
                        processed: Some(ImageHandle::from_path(&entry.processed_path)),
                        processed_path: Some(entry.processed_path.clone()),
                    });
                    self.compare_position = 50.0;
                }
                Task::none()
            }

            Message::DownloadRecent(id) => {
                let Some((path, name)) = self
                    .history
                    .get(&id)
                    .map(|e| (e.processed_path.clone(), e.name.clone()))
                else {
                    return Task::none();
                };

                self.download(&path, &name)
            }

            Message::DeleteRecent(id) => {
                let Some(removed) = self.history.remove(&id) else {
                    return Task::none();
                };

                discard_cached_files(&removed);

                // The deleted pair's files are gone; clear it if on screen
                let showing_deleted = self.active.as_ref().and_then(|c| c.processed_path.as_ref())
                    == Some(&removed.processed_path);
                if showing_deleted {
                    self.active = None;
                }

                self.show_toast(Toast::success("Image deleted"))
            }

            Message::ToastExpired(seq) => {
                if seq == self.toast_seq {
                    self.toast = None;
                }
                Task::none()
            }
        }
    }

    /// Cache the processed result and a copy of the original, and build the
    /// history record pointing at them.
    ///
    /// Cache-write failures are logged and tolerated: the result is still
    /// displayed from memory, the thumbnails just will not survive.
    fn store_result(&self, pending: &PendingSubmission, bytes: &[u8]) -> ProcessedImage {
        let timestamp = Utc::now().timestamp_millis();
        let id = timestamp.to_string();

        let images_dir = state::history::images_dir();
        if let Err(e) = fs::create_dir_all(&images_dir) {
            warn!(
                "⚠️  Failed to create image cache directory {}: {}",
                images_dir.display(),
                e
            );
        }

        let original_ext = pending
            .source
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "png".to_string());
        let original_path = images_dir.join(format!("{}-original.{}", id, original_ext));
        if let Err(e) = fs::copy(&pending.source, &original_path) {
            warn!("⚠️  Failed to cache original: {}", e);
        }

        let processed_path = images_dir.join(format!(
            "{}-processed.{}",
            id,
            pending.options.format.as_str()
        ));
        if let Err(e) = fs::write(&processed_path, bytes) {
            warn!("⚠️  Failed to cache result: {}", e);
        }

        ProcessedImage {
            id,
            name: pending.name.clone(),
            original_path,
            processed_path,
            timestamp,
        }
    }

    /// Save a processed file through the native save dialog, defaulting to
    /// `processed-{name}.{format}` with the currently selected format
    fn download(&mut self, source: &Path, original_name: &str) -> Task<Message> {
        let default_name = download_file_name(original_name, self.options.format);

        let target = FileDialog::new()
            .set_title("Save processed image")
            .set_file_name(&default_name)
            .save_file();

        let Some(target) = target else {
            return Task::none();
        };

        match fs::copy(source, &target) {
            Ok(_) => {
                info!("💾 Saved {}", target.display());
                self.show_toast(Toast::success("Image downloaded successfully!"))
            }
            Err(e) => {
                error!("❌ Download failed: {}", e);
                self.show_toast(Toast::error("Failed to save image"))
            }
        }
    }

    /// Display a toast and schedule its expiry
    fn show_toast(&mut self, toast: Toast) -> Task<Message> {
        self.toast_seq += 1;
        let seq = self.toast_seq;
        self.toast = Some(toast);

        Task::perform(
            tokio::time::sleep(Duration::from_secs(TOAST_SECONDS)),
            move |_| Message::ToastExpired(seq),
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = column![
            text("AI Background Remover").size(40),
            text("Remove image backgrounds with the remove.bg API").size(16),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let pick_label = if self.pending.is_some() {
            "Processing..."
        } else {
            "Choose Image"
        };
        let mut pick = button(pick_label).padding(10);
        if self.pending.is_none() {
            pick = pick.on_press(Message::PickImage);
        }

        let mut content = Column::new()
            .push(header)
            .push(self.options_panel())
            .push(pick)
            .spacing(20)
            .align_x(Alignment::Center)
            .width(Length::Fixed(760.0));

        if self.pending.is_some() {
            content = content.push(text("Processing your image...").size(16));
        }

        if let Some(comparison) = &self.active {
            match &comparison.processed {
                Some(processed) => {
                    let compare = Canvas::new(ImageCompare {
                        original: comparison.original.clone(),
                        processed: processed.clone(),
                        position: self.compare_position,
                        image_size: comparison.image_size,
                    })
                    .width(Length::Fill)
                    .height(Length::Fixed(400.0));

                    content = content.push(compare).push(
                        button("Download Processed Image")
                            .on_press(Message::DownloadCurrent)
                            .padding(10),
                    );
                }
                None => {
                    // The original alone, while processing or after a failure
                    content = content.push(
                        iced::widget::image(comparison.original.clone())
                            .height(Length::Fixed(400.0)),
                    );
                }
            }
        }

        if !self.history.is_empty() {
            content = content.push(ui::recent::recent_images(self.history.entries()));
        }

        if let Some(toast) = &self.toast {
            content = content.push(ui::toast::view(toast));
        }

        scrollable(
            container(content)
                .width(Length::Fill)
                .center_x(Length::Fill)
                .padding(30),
        )
        .into()
    }

    /// The processing-options panel: size, format, auto-crop
    fn options_panel(&self) -> Element<'_, Message> {
        let size_picker = column![
            text("Output Size").size(14),
            pick_list(
                &OutputSize::ALL[..],
                Some(self.options.size),
                Message::SizeSelected
            ),
        ]
        .spacing(4);

        let format_picker = column![
            text("Format").size(14),
            pick_list(
                &OutputFormat::ALL[..],
                Some(self.options.format),
                Message::FormatSelected
            ),
        ]
        .spacing(4);

        let crop_toggle =
            checkbox("Auto-crop to content", self.options.crop).on_toggle(Message::CropToggled);

        container(
            column![
                text("Processing Options").size(18),
                row![size_picker, format_picker].spacing(16),
                crop_toggle,
            ]
            .spacing(12),
        )
        .padding(16)
        .style(container::rounded_box)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("AI Background Remover", BgRemover::update, BgRemover::view)
        .theme(BgRemover::theme)
        .centered()
        .run_with(BgRemover::new)
}

/// Read the picked file and submit it for background removal.
/// Runs on the executor so the UI stays responsive while the request is
/// outstanding.
async fn process_image(
    path: PathBuf,
    name: String,
    options: ProcessingOptions,
    api_key: String,
) -> Result<Vec<u8>, ProcessError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ProcessError::Io(format!("{}: {}", path.display(), e)))?;

    let client = RemovalClient::new(api_key);
    client.remove_background(&name, bytes, &options).await
}

/// Default download name: the original name with its extension swapped for
/// the selected output format
fn download_file_name(original_name: &str, format: OutputFormat) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    format!("processed-{}.{}", stem, format.as_str())
}

/// Delete a record's cached pair. Missing files are fine; the record may
/// predate a manual cache cleanup.
fn discard_cached_files(record: &ProcessedImage) {
    for path in [&record.original_path, &record.processed_path] {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("⚠️  Failed to remove cached file {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_file_name_swaps_extension() {
        assert_eq!(
            download_file_name("portrait.jpg", OutputFormat::Png),
            "processed-portrait.png"
        );
        assert_eq!(
            download_file_name("holiday.png", OutputFormat::Jpg),
            "processed-holiday.jpg"
        );
    }

    #[test]
    fn test_download_file_name_without_extension() {
        assert_eq!(
            download_file_name("snapshot", OutputFormat::Png),
            "processed-snapshot.png"
        );
        assert_eq!(download_file_name("", OutputFormat::Png), "processed-image.png");
    }
}
