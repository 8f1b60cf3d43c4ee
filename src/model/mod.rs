//! Generative-model backends.
//!
//! The rest of the crate talks to a model only through [`GenerativeModel`]:
//! one call, three ordered parts (free text, page image, instruction), text
//! back. Two backends implement it:
//!
//! * [`gemini::GeminiClient`] — native Gemini `generateContent` over REST
//!   (default; needs `GOOGLE_API_KEY`)
//! * [`provider::ProviderModel`] — any `edgequake-llm` provider
//!   (OpenAI, Anthropic, Ollama, …), selected with `TALKCV_PROVIDER`

pub mod gemini;
pub mod provider;

use crate::config::AppConfig;
use crate::error::{ServiceError, TalkCvError};
use crate::pipeline::encode::ImagePart;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// One request: the three parts, in the order they are sent.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    /// User-supplied text (job description or chat question).
    pub text: &'a str,
    /// The rendered first page.
    pub image: &'a ImagePart,
    /// Fixed instruction for the action.
    pub instruction: &'a str,
}

/// A hosted model that answers a text + image + instruction request.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Issue exactly one request and return the model's text verbatim.
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ServiceError>;
}

/// Build the backend selected by `config`.
///
/// A configured `provider_name` routes through edgequake-llm; otherwise the
/// native Gemini client is used. A missing Gemini key is not an error here.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn GenerativeModel>, TalkCvError> {
    match config.provider_name.as_deref() {
        Some(name) => {
            info!("Using edgequake-llm provider '{}' (model: {})", name, config.model);
            Ok(Arc::new(provider::ProviderModel::from_name(name, &config.model)?))
        }
        None => {
            info!("Using Gemini REST client (model: {})", config.model);
            Ok(Arc::new(gemini::GeminiClient::new(config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_selects_gemini() {
        let model = from_config(&AppConfig::default()).unwrap();
        assert_eq!(model.name(), "gemini");
    }
}
