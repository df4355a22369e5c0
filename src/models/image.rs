use serde::{Deserialize, Serialize};

use super::common::DataUri;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Photo plus instruction text for the image model.
#[derive(Debug, Clone)]
pub struct ImageGenerationRequest {
    pub mime_type: String,
    /// Base64 encoded photo bytes.
    pub image_data: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

/// A content part. Only `InlineData` parts carry generated images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

impl Part {
    pub fn inline_data(&self) -> Option<&InlineData> {
        match self {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl From<&ImageGenerationRequest> for GenerateContentRequest {
    fn from(request: &ImageGenerationRequest) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type.clone(),
                            data: request.image_data.clone(),
                        },
                    },
                    Part::Text {
                        text: request.instruction.clone(),
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// First part carrying inline image data, if any.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.content
            .as_ref()?
            .parts
            .iter()
            .find_map(Part::inline_data)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// One data URI per candidate that holds an image, in candidate order.
    pub fn inline_images(&self) -> Vec<DataUri> {
        self.candidates
            .iter()
            .filter_map(Candidate::first_inline_data)
            .map(|inline| {
                let mime_type = if inline.mime_type.is_empty() {
                    FALLBACK_MIME_TYPE
                } else {
                    inline.mime_type.as_str()
                };
                DataUri::new(mime_type, inline.data.clone())
            })
            .collect()
    }
}
