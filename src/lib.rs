pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod synthesizer;

pub use config::{Config, GeminiConfig, OpenAiConfig, ServerConfig};
pub use error::{Result, Stage, ThumbnailError};
pub use models::{
    DataUri, OutputFormat, Photo, PromptFields, TargetSize, ThumbnailRequest, ThumbnailResult,
    UploadResponse,
};
pub use orchestrator::ThumbnailOrchestrator;
pub use providers::{GenAiClient, ImageClient, ImageGenerator, TextClient, TextGenerator};
pub use synthesizer::PromptSynthesizer;
