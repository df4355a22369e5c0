use crate::{
    error::Result,
    models::{GenerateContentResponse, ImageGenerationRequest, TextGenerationRequest},
};
use async_trait::async_trait;

/// Returns one completion for a system instruction plus one user message.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: TextGenerationRequest) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// Sends a photo and instruction to an image model and returns its raw candidates.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<GenerateContentResponse>;

    fn model_name(&self) -> &str;
}
