use log::debug;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::state::options::ProcessingOptions;

/// Endpoint of the background-removal service
const API_ENDPOINT: &str = "https://api.remove.bg/v1.0/removebg";

/// Maximum accepted input size in bytes (5 MB).
/// The caller checks this before invoking the client; the client is never
/// handed an oversized file.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Check a file size against the upload limit
pub fn exceeds_size_limit(size: u64) -> bool {
    size > MAX_FILE_SIZE
}

/// Errors produced by a removal request.
///
/// Variants carry rendered messages instead of source errors so a failure
/// can ride an application message (which must be `Clone`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The input file could not be read before submission
    #[error("could not read the input file: {0}")]
    Io(String),
    /// The request never completed (DNS, connect, TLS, read errors)
    #[error("could not reach the removal service: {0}")]
    Network(String),
    /// The service answered with a non-success status
    #[error("removal service rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    /// The service answered 2xx but the body does not decode as an image
    #[error("removal service returned data that is not an image: {0}")]
    InvalidImage(String),
}

impl From<reqwest::Error> for ProcessError {
    fn from(e: reqwest::Error) -> Self {
        ProcessError::Network(e.to_string())
    }
}

/// Client for the remove.bg HTTP API.
///
/// One call per submission: no retry, no streaming, no cancellation. The
/// call either yields the processed image bytes or a single `ProcessError`.
pub struct RemovalClient {
    http: reqwest::Client,
    api_key: String,
}

impl RemovalClient {
    pub fn new(api_key: String) -> Self {
        RemovalClient {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Submit one image for background removal and await the processed bytes
    pub async fn remove_background(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        options: &ProcessingOptions,
    ) -> Result<Vec<u8>, ProcessError> {
        debug!(
            "Submitting {} ({} bytes) with size={} format={} crop={}",
            file_name,
            bytes.len(),
            options.size.as_str(),
            options.format.as_str(),
            options.crop
        );

        let mut form =
            Form::new().part("image_file", Part::bytes(bytes).file_name(file_name.to_string()));
        for (field, value) in option_fields(options) {
            form = form.text(field, value);
        }

        let response = self
            .http
            .post(API_ENDPOINT)
            .header("X-Api-Key", self.api_key.as_str())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "could not read error body".to_string());
            return Err(ProcessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;

        // A success response is raw image content. A 2xx carrying anything
        // else (an HTML error page, a truncated body) is still a failure.
        image::load_from_memory(&body).map_err(|e| ProcessError::InvalidImage(e.to_string()))?;

        Ok(body.to_vec())
    }
}

/// The text fields accompanying the binary part.
/// `crop` is only sent when enabled; the service treats an absent field as off.
fn option_fields(options: &ProcessingOptions) -> Vec<(&'static str, &'static str)> {
    let mut fields = vec![
        ("size", options.size.as_str()),
        ("format", options.format.as_str()),
    ];

    if options.crop {
        fields.push(("crop", "true"));
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::options::{OutputFormat, OutputSize};

    #[test]
    fn test_size_limit_boundary() {
        assert!(!exceeds_size_limit(0));
        assert!(!exceeds_size_limit(MAX_FILE_SIZE));
        assert!(exceeds_size_limit(MAX_FILE_SIZE + 1));
        assert!(exceeds_size_limit(6 * 1024 * 1024));
    }

    #[test]
    fn test_option_fields_with_crop() {
        let options = ProcessingOptions {
            size: OutputSize::Auto,
            format: OutputFormat::Png,
            crop: true,
        };

        assert_eq!(
            option_fields(&options),
            vec![("size", "auto"), ("format", "png"), ("crop", "true")]
        );
    }

    #[test]
    fn test_option_fields_without_crop() {
        let options = ProcessingOptions {
            size: OutputSize::Full,
            format: OutputFormat::Jpg,
            crop: false,
        };

        // No crop field at all when the flag is off
        assert_eq!(
            option_fields(&options),
            vec![("size", "full"), ("format", "jpg")]
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ProcessError::Api {
            status: 402,
            message: "insufficient credits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "removal service rejected the request (402): insufficient credits"
        );
    }
}
