use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::str::FromStr;

use crate::error::ThumbnailError;

/// Requested thumbnail layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Landscape video thumbnail.
    #[default]
    Youtube,
    /// Vertical short-form video cover.
    Shorts,
}

impl OutputFormat {
    /// Only the exact `shorts` tag selects the vertical layout.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("shorts") => OutputFormat::Shorts,
            _ => OutputFormat::Youtube,
        }
    }

    pub fn target_size(&self) -> TargetSize {
        match self {
            OutputFormat::Shorts => TargetSize::new(1080, 1920),
            OutputFormat::Youtube => TargetSize::new(1280, 720),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An inline `data:{mime};base64,{payload}` image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: String,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Decodes the base64 payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ThumbnailError> {
        STANDARD.decode(&self.data).map_err(|e| {
            ThumbnailError::MalformedDataUri(format!("payload is not valid base64: {}", e))
        })
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

impl FromStr for DataUri {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| ThumbnailError::MalformedDataUri("missing data: scheme".into()))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| ThumbnailError::MalformedDataUri("not base64 encoded".into()))?;

        Ok(DataUri::new(mime_type, data))
    }
}
