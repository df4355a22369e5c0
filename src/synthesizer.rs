//! Prompt synthesis: turns the form answers into one rewritten image prompt.

use std::sync::Arc;

use crate::{
    error::Result,
    models::{PromptFields, TextGenerationRequest},
    providers::TextGenerator,
};

pub const SYSTEM_INSTRUCTION: &str = "You are an AI that rewrites thumbnail prompts. Combine all inputs into one concise but descriptive image prompt.";

const NOT_SPECIFIED: &str = "Not specified";

/// Labeled description sent as the user message.
///
/// The four structured lines are always present in a fixed order; the custom
/// prompt line is appended only when it is non-blank after trimming.
pub fn build_description(fields: &PromptFields) -> String {
    let mut description = format!(
        "Video type: {}\nMood: {}\nStyle: {}\nPlacement: {}",
        or_not_specified(&fields.video_type),
        or_not_specified(&fields.mood),
        or_not_specified(&fields.style),
        or_not_specified(&fields.placement),
    );

    if let Some(custom) = fields
        .custom_prompt
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        description.push_str("\nUser Custom Prompt: ");
        description.push_str(custom);
    }

    description
}

fn or_not_specified(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

#[derive(Clone)]
pub struct PromptSynthesizer {
    text: Arc<dyn TextGenerator>,
}

impl PromptSynthesizer {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    /// Returns the provider's completion verbatim. Errors propagate without retry.
    pub async fn synthesize(&self, fields: &PromptFields) -> Result<String> {
        let request = TextGenerationRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: build_description(fields),
        };

        self.text.generate(request).await
    }
}
