use std::time::Instant;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message,
    SystemContentBlock,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use anamnesis_core::models::candidate::{GenerationMeta, RawCandidate};
use anamnesis_core::models::input::ClinicalInput;
use anamnesis_core::models::prompt::PromptSpec;
use anamnesis_core::models::token_count::{TokenCount, TokenUsage};
use anamnesis_core::{BoxFuture, CallFailure, Generator};

use crate::error::BedrockError;
use crate::tokens;

/// Inference parameters for every call in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Inference profile ID, e.g. `us.anthropic.claude-sonnet-4-20250514-v1:0`.
    pub model_id: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: i32,
}

/// Generation backed by the Bedrock Converse API.
///
/// The rendered prompt is sent as a single user message. One call per
/// input, no retries, and the response text is returned as-is.
pub struct BedrockGenerator {
    client: Client,
    settings: GenerationSettings,
}

impl BedrockGenerator {
    pub fn new(client: Client, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Core invocation. Returns the concatenated response text and usage.
    async fn invoke_converse(&self, prompt: String) -> Result<(String, TokenUsage), BedrockError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let inference = InferenceConfiguration::builder()
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_output_tokens)
            .build();

        let mut request = self
            .client
            .converse()
            .model_id(&self.settings.model_id)
            .messages(message)
            .inference_config(inference);

        if let Some(system) = &self.settings.system_prompt {
            request = request.system(SystemContentBlock::Text(system.clone()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let text = response_text(response.output())?;

        let token_count = response
            .usage()
            .map(tokens::extract_token_usage)
            .unwrap_or(TokenCount {
                input: 0,
                output: 0,
            });

        Ok((
            text,
            tokens::usage_for(&self.settings.model_id, token_count),
        ))
    }
}

/// Concatenate the text blocks of a Converse output.
///
/// No message, or a message without any non-blank text, is an
/// [`BedrockError::EmptyResponse`].
pub fn response_text(output: Option<&ConverseOutput>) -> Result<String, BedrockError> {
    let message = output
        .and_then(|o| o.as_message().ok())
        .ok_or(BedrockError::EmptyResponse)?;

    let text = message
        .content()
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(BedrockError::EmptyResponse);
    }
    Ok(text)
}

impl Generator for BedrockGenerator {
    fn model_id(&self) -> &str {
        &self.settings.model_id
    }

    fn generate<'a>(
        &'a self,
        input: &'a ClinicalInput,
        prompt: &'a PromptSpec,
    ) -> BoxFuture<'a, Result<RawCandidate, CallFailure>> {
        Box::pin(async move {
            let rendered = prompt.render(&input.text);
            info!(
                input_id = %input.id,
                model = %self.settings.model_id,
                prompt_version = %prompt.version,
                prompt_chars = rendered.len(),
                "invoking model"
            );

            let started = Instant::now();
            let (text, usage) = self.invoke_converse(rendered).await.map_err(|e| {
                warn!(input_id = %input.id, error = %e, "model call failed");
                CallFailure::from(e)
            })?;
            let latency_ms = started.elapsed().as_millis() as u64;

            info!(
                input_id = %input.id,
                latency_ms,
                input_tokens = usage.tokens.input,
                output_tokens = usage.tokens.output,
                "model call complete"
            );

            Ok(RawCandidate {
                input_id: input.id.clone(),
                prompt_version: prompt.version.clone(),
                text,
                meta: GenerationMeta {
                    model_id: self.settings.model_id.clone(),
                    usage,
                    latency_ms,
                },
            })
        })
    }
}
