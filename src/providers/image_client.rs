use crate::{
    config::GeminiConfig,
    error::{Result, Stage, ThumbnailError},
    models::{GenerateContentRequest, GenerateContentResponse, ImageGenerationRequest},
    providers::{decode_error, summarize_body, traits::ImageGenerator},
};
use async_trait::async_trait;
use reqwest::Client;

/// Gemini `generateContent` client for image-capable models.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ImageClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ThumbnailError::ConfigError("GEMINI_API_KEY is required".into()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<GenerateContentResponse> {
        let payload = GenerateContentRequest::from(&request);

        log::info!("Generating image with model: {}", self.model);
        log::debug!(
            "Image instruction: {} ({} base64 chars of {})",
            request.instruction,
            request.image_data.len(),
            request.mime_type
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image generation transport error: {:?}", e);
                ThumbnailError::from_transport(Stage::Image, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Image model returned {}: {}", status, summarize_body(&body));
            return Err(ThumbnailError::ImageGeneration(format!(
                "provider returned {}",
                status
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| decode_error(Stage::Image, e))?;

        log::debug!("Image model returned {} candidate(s)", generated.candidates.len());
        Ok(generated)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
