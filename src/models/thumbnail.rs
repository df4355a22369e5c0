use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::common::{DataUri, OutputFormat, TargetSize};
use crate::error::{Result, Stage, ThumbnailError};

pub const SUCCESS_MESSAGE: &str = "Thumbnails generated!";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong with thumbnail generation";

/// Uploaded photo held in memory for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl Photo {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Descriptive answers that feed prompt synthesis. Absent means "Not specified".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFields {
    pub video_type: Option<String>,
    pub mood: Option<String>,
    pub style: Option<String>,
    pub placement: Option<String>,
    pub custom_prompt: Option<String>,
}

impl PromptFields {
    /// Fields for a refinement: structured answers dropped, only the new instruction kept.
    pub fn refinement(instruction: impl Into<String>) -> Self {
        Self {
            custom_prompt: Some(instruction.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThumbnailRequest {
    pub photo: Option<Photo>,
    pub fields: PromptFields,
    /// Raw `outputFormat` value as submitted; echoed back in the result.
    pub output_format_tag: Option<String>,
}

impl ThumbnailRequest {
    pub fn new(photo: Photo) -> Self {
        Self {
            photo: Some(photo),
            ..Default::default()
        }
    }

    pub fn with_fields(mut self, fields: PromptFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_output_format(mut self, tag: impl Into<String>) -> Self {
        self.output_format_tag = Some(tag.into());
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_tag(self.output_format_tag.as_deref())
    }

    pub fn target_size(&self) -> TargetSize {
        self.output_format().target_size()
    }

    /// The photo, or `MissingPhoto` when none (or an empty file) was attached.
    pub fn require_photo(&self) -> Result<&Photo> {
        self.photo
            .as_ref()
            .filter(|photo| !photo.is_empty())
            .ok_or(ThumbnailError::MissingPhoto)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailResult {
    pub rewritten_prompt: String,
    pub output_format: String,
    pub target_size: TargetSize,
    pub images: Vec<DataUri>,
}

/// JSON body of a successful `/upload` or `/refine` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub rewritten_prompt: String,
    pub output_format: String,
    pub images: Vec<String>,
}

impl From<ThumbnailResult> for UploadResponse {
    fn from(result: ThumbnailResult) -> Self {
        UploadResponse {
            message: SUCCESS_MESSAGE.to_string(),
            rewritten_prompt: result.rewritten_prompt,
            output_format: result.output_format,
            images: result.images.iter().map(DataUri::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

impl ErrorResponse {
    pub fn from_error(err: &ThumbnailError) -> Self {
        let error = if err.is_client_error() {
            err.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        };

        ErrorResponse {
            error,
            stage: err.stage(),
        }
    }
}
