//! The dispatcher: one model call per user action.
//!
//! [`dispatch`] never fails. A missing page image yields a fixed
//! placeholder and a service failure yields `"Error with Gemini API: …"`,
//! so the UI renders every outcome the same way. Callers that want to tell
//! success from failure use [`try_dispatch`].

use crate::error::ServiceError;
use crate::model::{GenerateRequest, GenerativeModel};
use crate::pipeline::extract::ImageBundle;
use crate::prompts::{PDF_MISSING_PLACEHOLDER, SERVICE_ERROR_PREFIX};
use std::time::Instant;
use tracing::{debug, warn};

/// Result of [`try_dispatch`].
#[derive(Debug)]
pub enum DispatchOutcome {
    /// No page image was available; the model was not called.
    MissingDocument,
    /// The model answered.
    Response(String),
}

/// Send `text`, the first image of `bundle` and `instruction` to `model`.
///
/// Returns [`DispatchOutcome::MissingDocument`] without a network call when
/// `bundle` is `None`.
pub async fn try_dispatch(
    model: &dyn GenerativeModel,
    text: &str,
    bundle: Option<&ImageBundle>,
    instruction: &str,
) -> Result<DispatchOutcome, ServiceError> {
    let Some(bundle) = bundle else {
        return Ok(DispatchOutcome::MissingDocument);
    };

    let request = GenerateRequest {
        text,
        image: bundle.first(),
        instruction,
    };

    let start = Instant::now();
    let text = model.generate(&request).await?;
    debug!(
        "{} answered {} chars in {:?}",
        model.name(),
        text.len(),
        start.elapsed()
    );
    Ok(DispatchOutcome::Response(text))
}

/// Like [`try_dispatch`] but flattens every outcome into display text.
pub async fn dispatch(
    model: &dyn GenerativeModel,
    text: &str,
    bundle: Option<&ImageBundle>,
    instruction: &str,
) -> String {
    match try_dispatch(model, text, bundle, instruction).await {
        Ok(DispatchOutcome::Response(text)) => text,
        Ok(DispatchOutcome::MissingDocument) => PDF_MISSING_PLACEHOLDER.to_string(),
        Err(e) => {
            warn!("{} call failed: {}", model.name(), e);
            service_error_text(&e)
        }
    }
}

/// `"Error with Gemini API: {details}"`.
pub fn service_error_text(e: &ServiceError) -> String {
    format!("{SERVICE_ERROR_PREFIX} {e}")
}
