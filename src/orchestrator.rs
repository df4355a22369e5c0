//! Thumbnail request orchestration.
//!
//! One request runs strictly in sequence: validate the photo, synthesize the
//! prompt, resolve the target size, call the image model, normalize its
//! candidates into data URIs. Nothing is retried and nothing is kept between
//! requests.

use std::sync::Arc;

use crate::{
    error::{Result, ThumbnailError},
    logger,
    models::{
        ImageGenerationRequest, Photo, PromptFields, TargetSize, ThumbnailRequest, ThumbnailResult,
    },
    providers::{ImageGenerator, TextGenerator},
    synthesizer::PromptSynthesizer,
};

/// Instruction text sent next to the photo.
pub fn build_instruction(prompt: &str, size: TargetSize) -> String {
    format!("{}. Generate image in resolution {}", prompt, size)
}

#[derive(Clone)]
pub struct ThumbnailOrchestrator {
    synthesizer: PromptSynthesizer,
    image: Arc<dyn ImageGenerator>,
}

impl ThumbnailOrchestrator {
    pub fn new(text: Arc<dyn TextGenerator>, image: Arc<dyn ImageGenerator>) -> Self {
        Self {
            synthesizer: PromptSynthesizer::new(text),
            image,
        }
    }

    pub async fn orchestrate(&self, request: &ThumbnailRequest) -> Result<ThumbnailResult> {
        let photo = request.require_photo()?;

        let rewritten_prompt = {
            let _timer = logger::timer("prompt synthesis");
            self.synthesizer.synthesize(&request.fields).await?
        };
        log::info!("Rewritten Prompt: {}", rewritten_prompt);

        let target_size = request.target_size();
        let image_request = ImageGenerationRequest {
            mime_type: photo.mime_type.clone(),
            image_data: photo.to_base64(),
            instruction: build_instruction(&rewritten_prompt, target_size),
        };

        let generated = {
            let _timer = logger::timer("image generation");
            self.image.generate(image_request).await?
        };

        let images = generated.inline_images();
        if images.is_empty() {
            log::warn!(
                "Image model returned {} candidate(s) but no inline images",
                generated.candidates.len()
            );
        } else {
            log::info!("Generated {} thumbnail(s) at {}", images.len(), target_size);
        }

        Ok(ThumbnailResult {
            rewritten_prompt,
            output_format: request.output_format_tag.clone().unwrap_or_default(),
            target_size,
            images,
        })
    }

    /// Iterates on a previous result: same photo, a new instruction, no structured answers.
    pub async fn refine(
        &self,
        photo: Option<Photo>,
        instruction: &str,
        output_format_tag: Option<String>,
    ) -> Result<ThumbnailResult> {
        let request = ThumbnailRequest {
            photo,
            fields: PromptFields::refinement(instruction),
            output_format_tag,
        };
        request.require_photo()?;

        if instruction.trim().is_empty() {
            return Err(ThumbnailError::InvalidForm(
                "customPrompt is required to refine a thumbnail".into(),
            ));
        }

        self.orchestrate(&request).await
    }
}
