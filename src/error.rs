use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream call that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Prompt rewriting through the text-generation provider.
    Prompt,
    /// Thumbnail rendering through the image-generation provider.
    Image,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Prompt => write!(f, "prompt"),
            Stage::Image => write!(f, "image"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("No photo was attached to the request")]
    MissingPhoto,
    #[error("Photo exceeds the {limit} byte upload limit")]
    PhotoTooLarge { limit: usize },
    #[error("Invalid form: {0}")]
    InvalidForm(String),
    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Text generation error: {0}")]
    TextGeneration(String),
    #[error("Image generation error: {0}")]
    ImageGeneration(String),
    #[error("Malformed {stage} response: {message}")]
    ResponseError { stage: Stage, message: String },
    #[error("{stage} request timed out")]
    Timeout { stage: Stage },
}

impl ThumbnailError {
    /// Upstream stage that failed, `None` for input and configuration errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ThumbnailError::TextGeneration(_) => Some(Stage::Prompt),
            ThumbnailError::ImageGeneration(_) => Some(Stage::Image),
            ThumbnailError::ResponseError { stage, .. } | ThumbnailError::Timeout { stage } => {
                Some(*stage)
            }
            _ => None,
        }
    }

    /// Rejected before any upstream call was made.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ThumbnailError::MissingPhoto
                | ThumbnailError::PhotoTooLarge { .. }
                | ThumbnailError::InvalidForm(_)
        )
    }

    /// Maps a transport error from one of the upstream clients.
    pub(crate) fn from_transport(stage: Stage, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ThumbnailError::Timeout { stage };
        }
        match stage {
            Stage::Prompt => ThumbnailError::TextGeneration(err.to_string()),
            Stage::Image => ThumbnailError::ImageGeneration(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
