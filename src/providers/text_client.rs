use crate::{
    config::OpenAiConfig,
    error::{Result, Stage, ThumbnailError},
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, TextGenerationRequest},
    providers::{decode_error, summarize_body, traits::TextGenerator},
};
use async_trait::async_trait;
use reqwest::Client;

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct TextClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl TextClient {
    pub fn new(client: Client, config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ThumbnailError::ConfigError("OPENAI_API_KEY is required".into()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for TextClient {
    async fn generate(&self, request: TextGenerationRequest) -> Result<String> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system),
                ChatMessage::user(request.prompt),
            ],
        };

        log::info!("Invoking text model: {}", self.model);
        log::debug!(
            "Text generation request payload: {}",
            serde_json::to_string(&payload).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Text generation transport error: {:?}", e);
                ThumbnailError::from_transport(Stage::Prompt, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Text model returned {}: {}", status, summarize_body(&body));
            return Err(ThumbnailError::TextGeneration(format!(
                "provider returned {}",
                status
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| decode_error(Stage::Prompt, e))?;

        completion
            .first_text()
            .ok_or_else(|| ThumbnailError::ResponseError {
                stage: Stage::Prompt,
                message: "completion carried no text".into(),
            })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
