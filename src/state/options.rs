/// Processing options for background removal
///
/// This struct stores the user-selected configuration for a removal request.
/// It is an immutable value: the UI replaces it wholesale whenever a control
/// changes, and the active value is captured at submission time.

use serde::{Deserialize, Serialize};

/// Output size requested from the removal service
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Let the service pick the best size for the input
    Auto,
    /// Small, fast preview output
    Preview,
    /// Full resolution output (slowest)
    Full,
}

impl OutputSize {
    /// All selectable sizes, in menu order
    pub const ALL: [OutputSize; 3] = [OutputSize::Auto, OutputSize::Preview, OutputSize::Full];

    /// The wire value sent in the multipart `size` field
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Auto => "auto",
            OutputSize::Preview => "preview",
            OutputSize::Full => "full",
        }
    }
}

impl std::fmt::Display for OutputSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OutputSize::Auto => "Auto",
            OutputSize::Preview => "Preview (Fast)",
            OutputSize::Full => "Full Resolution",
        };
        write!(f, "{}", label)
    }
}

/// Output image format requested from the removal service
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpg,
}

impl OutputFormat {
    /// All selectable formats, in menu order
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Png, OutputFormat::Jpg];

    /// The wire value sent in the multipart `format` field.
    /// Doubles as the file extension for downloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpg => "JPG",
        };
        write!(f, "{}", label)
    }
}

/// The full option set for one removal request
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Requested output size
    pub size: OutputSize,
    /// Requested output format
    pub format: OutputFormat,
    /// Auto-crop the result to the detected subject
    pub crop: bool,
}

impl Default for ProcessingOptions {
    /// Default options: auto size, PNG output, auto-crop on
    fn default() -> Self {
        Self {
            size: OutputSize::Auto,
            format: OutputFormat::Png,
            crop: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ProcessingOptions::default();
        assert_eq!(options.size, OutputSize::Auto);
        assert_eq!(options.format, OutputFormat::Png);
        assert!(options.crop);
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(OutputSize::Auto.as_str(), "auto");
        assert_eq!(OutputSize::Preview.as_str(), "preview");
        assert_eq!(OutputSize::Full.as_str(), "full");
        assert_eq!(OutputFormat::Png.as_str(), "png");
        assert_eq!(OutputFormat::Jpg.as_str(), "jpg");
    }

    #[test]
    fn test_serialization() {
        let options = ProcessingOptions {
            size: OutputSize::Preview,
            format: OutputFormat::Jpg,
            crop: false,
        };

        // Serialize to JSON
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"preview\""));
        assert!(json.contains("\"jpg\""));

        // Deserialize back
        let restored: ProcessingOptions = serde_json::from_str(&json).unwrap();

        assert_eq!(options, restored);
    }
}
