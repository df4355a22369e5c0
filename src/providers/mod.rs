pub mod image_client;
pub mod text_client;
pub mod traits;

use crate::{
    config::Config,
    error::{Result, Stage, ThumbnailError},
    orchestrator::ThumbnailOrchestrator,
};
use reqwest::Client;
use std::sync::Arc;

pub use image_client::ImageClient;
pub use text_client::TextClient;
pub use traits::{ImageGenerator, TextGenerator};

const MAX_LOGGED_BODY_CHARS: usize = 500;

/// Both upstream clients, built once at startup.
#[derive(Clone)]
pub struct GenAiClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl GenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.server.upstream_timeout())
            .build()
            .map_err(|e| ThumbnailError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            text_client: TextClient::new(http.clone(), &config.openai)?,
            image_client: ImageClient::new(http, &config.gemini)?,
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn orchestrator(&self) -> ThumbnailOrchestrator {
        ThumbnailOrchestrator::new(
            Arc::new(self.text_client.clone()),
            Arc::new(self.image_client.clone()),
        )
    }
}

/// Error while reading or decoding a successful upstream response body.
pub(crate) fn decode_error(stage: Stage, err: reqwest::Error) -> ThumbnailError {
    if err.is_timeout() {
        ThumbnailError::Timeout { stage }
    } else {
        ThumbnailError::ResponseError {
            stage,
            message: err.to_string(),
        }
    }
}

pub(crate) fn summarize_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
