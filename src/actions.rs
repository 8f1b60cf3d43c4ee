//! Action handlers: the seven fixed analyses plus free-form chat.
//!
//! Each handler takes the session by value and returns it along with an
//! [`ActionOutcome`] describing what to show. The page image is extracted
//! afresh on every call; nothing is cached between actions.

use crate::config::AppConfig;
use crate::model::GenerativeModel;
use crate::pipeline::dispatch::dispatch;
use crate::pipeline::extract::{extract_first_page, ImageBundle};
use crate::pipeline::render::{PageRasterizer, PdfiumRasterizer};
use crate::prompts::{chat_instruction, instruction_for, CHAT_EMPTY_QUESTION};
use crate::session::{AnalysisKind, SessionState};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Heading shown above a chat answer.
pub const CHAT_HEADING: &str = "Chat Response";

/// The collaborators every action needs.
#[derive(Clone)]
pub struct ActionContext {
    pub model: Arc<dyn GenerativeModel>,
    pub rasterizer: Arc<dyn PageRasterizer>,
    pub jpeg_quality: u8,
}

impl ActionContext {
    pub fn new(model: Arc<dyn GenerativeModel>, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            model,
            rasterizer,
            jpeg_quality: AppConfig::default().jpeg_quality,
        }
    }

    /// Production wiring: pdfium rasterizer plus the configured model.
    pub fn from_config(
        config: &AppConfig,
        model: Arc<dyn GenerativeModel>,
    ) -> Self {
        Self {
            model,
            rasterizer: Arc::new(PdfiumRasterizer::new(
                config.pdfium_lib_path.clone(),
                config.max_rendered_pixels,
            )),
            jpeg_quality: config.jpeg_quality,
        }
    }
}

/// What the user sees after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The model was asked and its text stored. `text` may still be a
    /// placeholder or an `"Error with Gemini API: …"` string.
    Completed {
        notice: String,
        heading: String,
        text: String,
    },
    /// Nothing was sent; `message` is the error banner.
    Failed { message: String },
}

impl ActionOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            ActionOutcome::Completed { text, .. } => Some(text),
            ActionOutcome::Failed { .. } => None,
        }
    }
}

async fn page_image(
    session: &SessionState,
    ctx: &ActionContext,
) -> Result<ImageBundle, ActionOutcome> {
    extract_first_page(
        session.document.as_ref(),
        Arc::clone(&ctx.rasterizer),
        ctx.jpeg_quality,
    )
    .await
    .map_err(|e| {
        warn!("Extraction failed: {}", e);
        ActionOutcome::Failed {
            message: e.banner(),
        }
    })
}

/// Run one fixed analysis and store its answer in the matching slot.
///
/// On extraction failure the session comes back unchanged.
pub async fn run_action(
    mut session: SessionState,
    kind: AnalysisKind,
    ctx: &ActionContext,
) -> (SessionState, ActionOutcome) {
    info!("Running action {}", kind);

    let bundle = match page_image(&session, ctx).await {
        Ok(bundle) => bundle,
        Err(outcome) => return (session, outcome),
    };

    let text = dispatch(
        ctx.model.as_ref(),
        &session.job_description,
        Some(&bundle),
        instruction_for(kind),
    )
    .await;

    session.slots.set(kind, text.clone());

    let outcome = ActionOutcome::Completed {
        notice: format!("✅ {} Complete!", kind.label()),
        heading: kind.title().to_string(),
        text,
    };
    (session, outcome)
}

/// Answer a free-form question about the résumé.
///
/// The question is both the free text and part of the instruction. The
/// answer goes to the chat slot, which is never exported.
pub async fn run_chat(
    mut session: SessionState,
    question: &str,
    ctx: &ActionContext,
) -> (SessionState, ActionOutcome) {
    let question = question.trim();
    if question.is_empty() {
        return (
            session,
            ActionOutcome::Failed {
                message: CHAT_EMPTY_QUESTION.to_string(),
            },
        );
    }
    info!("Running chat ({} chars)", question.len());

    let bundle = match page_image(&session, ctx).await {
        Ok(bundle) => bundle,
        Err(outcome) => return (session, outcome),
    };

    let text = dispatch(
        ctx.model.as_ref(),
        question,
        Some(&bundle),
        &chat_instruction(question),
    )
    .await;

    session.chat_response = text.clone();

    let outcome = ActionOutcome::Completed {
        notice: "✅ Chat Response Ready!".to_string(),
        heading: CHAT_HEADING.to_string(),
        text,
    };
    (session, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, ServiceError};
    use crate::model::GenerateRequest;
    use async_trait::async_trait;
    use image::{DynamicImage, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct OnePage;

    impl PageRasterizer for OnePage {
        fn render_first_page(&self, _pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractError> {
            Ok(Some(DynamicImage::ImageRgb8(RgbImage::new(4, 4))))
        }
    }

    /// Answers "reply #N" and remembers the instructions it saw.
    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
        instructions: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GenerativeModel for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ServiceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.instructions
                .lock()
                .unwrap()
                .push(request.instruction.to_string());
            Ok(format!("reply #{n}"))
        }
    }

    fn ctx(model: Arc<Counter>) -> ActionContext {
        ActionContext::new(model, Arc::new(OnePage))
    }

    fn session() -> SessionState {
        SessionState::new()
            .with_job_description("Backend engineer")
            .with_document(b"%PDF-1.7".to_vec())
    }

    #[tokio::test]
    async fn action_stores_result_in_its_slot() {
        let model = Arc::new(Counter::default());
        let (s, outcome) = run_action(session(), AnalysisKind::SkillGapAnalysis, &ctx(model.clone())).await;

        assert_eq!(s.slots.get(AnalysisKind::SkillGapAnalysis), "reply #1");
        assert_eq!(s.slots.get(AnalysisKind::ResumeEvaluation), "");
        assert_eq!(
            outcome,
            ActionOutcome::Completed {
                notice: "✅ 🔍 Skill Gap Analysis Complete!".into(),
                heading: "Skill Gap Analysis".into(),
                text: "reply #1".into(),
            }
        );
        assert_eq!(
            model.instructions.lock().unwrap().as_slice(),
            &[instruction_for(AnalysisKind::SkillGapAnalysis).to_string()]
        );
    }

    #[tokio::test]
    async fn rerun_overwrites_slot() {
        for kind in AnalysisKind::ALL {
            let model = Arc::new(Counter::default());
            let c = ctx(model);
            let (s, _) = run_action(session(), kind, &c).await;
            assert_eq!(s.slots.get(kind), "reply #1", "{kind}");
            let (s, _) = run_action(s, kind, &c).await;
            assert_eq!(s.slots.get(kind), "reply #2", "{kind}");
            assert_eq!(s.slots.iter().filter(|(_, t)| !t.is_empty()).count(), 1);
        }
    }

    #[tokio::test]
    async fn missing_document_leaves_session_untouched() {
        let model = Arc::new(Counter::default());
        let before = SessionState::new().with_job_description("jd");
        let (after, outcome) = run_action(before.clone(), AnalysisKind::AtsCompatibility, &ctx(model.clone())).await;

        assert_eq!(
            outcome,
            ActionOutcome::Failed {
                message: "Error processing PDF: No file uploaded".into()
            }
        );
        assert_eq!(after.slots, before.slots);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_uses_question_and_separate_slot() {
        let model = Arc::new(Counter::default());
        let (s, outcome) = run_chat(session(), "  What stands out?  ", &ctx(model.clone())).await;

        assert_eq!(s.chat_response, "reply #1");
        assert!(s.slots.iter().all(|(_, text)| text.is_empty()));
        assert_eq!(outcome.text(), Some("reply #1"));
        assert_eq!(
            model.instructions.lock().unwrap().as_slice(),
            &["Based on the resume, What stands out?".to_string()]
        );
    }

    #[tokio::test]
    async fn blank_chat_question_is_rejected() {
        let model = Arc::new(Counter::default());
        let (_, outcome) = run_chat(session(), "   ", &ctx(model.clone())).await;
        assert_eq!(
            outcome,
            ActionOutcome::Failed {
                message: "Ask a question about your resume.".into()
            }
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
