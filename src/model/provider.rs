//! Adapter that drives any `edgequake-llm` provider through [`GenerativeModel`].
//!
//! The three request parts map onto two user turns: the free text with the
//! page image attached, then the instruction.

use super::{GenerateRequest, GenerativeModel};
use crate::error::{ServiceError, TalkCvError};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// A [`GenerativeModel`] backed by an edgequake-llm provider.
pub struct ProviderModel {
    name: String,
    provider: Arc<dyn LLMProvider>,
}

impl ProviderModel {
    /// Wrap an already-constructed provider.
    pub fn new(name: impl Into<String>, provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    /// Create a provider by name (`"openai"`, `"anthropic"`, `"gemini"`,
    /// `"ollama"`, …). The provider reads its own API key from the environment.
    pub fn from_name(provider_name: &str, model: &str) -> Result<Self, TalkCvError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            TalkCvError::ProviderNotConfigured {
                provider: provider_name.to_string(),
                hint: format!("{e}"),
            }
        })?;
        Ok(Self::new(provider_name, provider))
    }
}

fn build_messages(request: &GenerateRequest<'_>) -> Vec<ChatMessage> {
    let image = ImageData::new(request.image.data.clone(), crate::pipeline::encode::JPEG_MIME);
    vec![
        ChatMessage::user_with_images(request.text, vec![image]),
        ChatMessage::user(request.instruction),
    ]
}

#[async_trait]
impl GenerativeModel for ProviderModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ServiceError> {
        let messages = build_messages(request);

        let response = self
            .provider
            .chat(&messages, None)
            .await
            .map_err(|e| ServiceError::Provider {
                provider: self.name.clone(),
                detail: format!("{e}"),
            })?;

        debug!(
            "Provider '{}': {} input tokens, {} output tokens",
            self.name, response.prompt_tokens, response.completion_tokens
        );

        if response.content.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(response.content)
    }
}
