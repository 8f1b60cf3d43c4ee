//! Full session flow with a fake model and rasterizer: upload, run every
//! action, chat, then export the report.

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use talk_to_cv::report::REPORT_TITLE;
use talk_to_cv::{
    build_report, run_action, run_chat, write_report, ActionContext, ActionOutcome, AnalysisKind,
    ExtractError, GenerateRequest, GenerativeModel, PageRasterizer, ServiceError, SessionState,
};

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Renders a fixed-size white page, or nothing when `pages == 0`.
struct FakeRasterizer {
    pages: usize,
    renders: AtomicUsize,
}

impl FakeRasterizer {
    fn with_pages(pages: usize) -> Arc<Self> {
        Arc::new(Self {
            pages,
            renders: AtomicUsize::new(0),
        })
    }
}

impl PageRasterizer for FakeRasterizer {
    fn render_first_page(&self, _pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if self.pages == 0 {
            return Ok(None);
        }
        Ok(Some(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            32,
            48,
            image::Rgb([255, 255, 255]),
        ))))
    }
}

/// Echoes the instruction back, or fails every call with a quota error.
struct EchoModel {
    fail: bool,
    seen: Mutex<Vec<(String, String, String)>>,
}

impl EchoModel {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl GenerativeModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ServiceError> {
        self.seen.lock().unwrap().push((
            request.text.to_string(),
            request.image.mime_type.clone(),
            request.instruction.to_string(),
        ));
        if self.fail {
            return Err(ServiceError::Api {
                status: 429,
                message: "Resource has been exhausted".into(),
            });
        }
        Ok(format!("answer to: {}", request.instruction))
    }
}

fn uploaded(jd: &str) -> SessionState {
    SessionState::new()
        .with_job_description(jd)
        .with_document(b"%PDF-1.4\n%fake\n".to_vec())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_action_then_report() {
    let model = EchoModel::ok();
    let raster = FakeRasterizer::with_pages(2);
    let ctx = ActionContext::new(model.clone(), raster.clone());

    let mut session = uploaded("Data engineer: Spark, Airflow, SQL");
    for kind in AnalysisKind::ALL {
        let (next, outcome) = run_action(session, kind, &ctx).await;
        session = next;
        assert!(matches!(outcome, ActionOutcome::Completed { .. }), "{kind}: {outcome:?}");
    }

    // One render per action: nothing is cached between actions.
    assert_eq!(raster.renders.load(Ordering::SeqCst), 7);

    let seen = model.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 7);
    for (text, mime, _) in &seen {
        assert_eq!(text, "Data engineer: Spark, Airflow, SQL");
        assert_eq!(mime, "image/jpeg");
    }

    let report = build_report(&session);
    assert!(report.starts_with(REPORT_TITLE));
    assert!(report.contains("### Job Description:\nData engineer: Spark, Airflow, SQL\n"));
    for kind in AnalysisKind::ALL {
        let answer = session.slots.get(kind);
        assert!(answer.starts_with("answer to: "));
        match kind.report_heading() {
            Some(heading) => {
                assert!(report.contains(&format!("### {heading}:\n{answer}\n")), "{kind}")
            }
            None => assert!(!report.contains(answer), "{kind} must not be exported"),
        }
    }
}

#[tokio::test]
async fn chat_answer_is_not_exported() {
    let ctx = ActionContext::new(EchoModel::ok(), FakeRasterizer::with_pages(1));
    let (session, outcome) = run_chat(uploaded("jd"), "Is my summary too long?", &ctx).await;

    assert_eq!(
        outcome.text(),
        Some("answer to: Based on the resume, Is my summary too long?")
    );
    assert_eq!(session.chat_response, "answer to: Based on the resume, Is my summary too long?");
    assert!(!build_report(&session).contains("summary too long"));
}

#[tokio::test]
async fn empty_pdf_produces_banner_and_no_model_call() {
    let model = EchoModel::ok();
    let ctx = ActionContext::new(model.clone(), FakeRasterizer::with_pages(0));

    let (session, outcome) = run_action(uploaded("jd"), AnalysisKind::ResumeEvaluation, &ctx).await;

    assert_eq!(
        outcome,
        ActionOutcome::Failed {
            message: "No pages found in the uploaded PDF.".into()
        }
    );
    assert_eq!(session.slots.get(AnalysisKind::ResumeEvaluation), "");
    assert!(model.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn not_a_pdf_is_rejected_before_rendering() {
    let raster = FakeRasterizer::with_pages(1);
    let ctx = ActionContext::new(EchoModel::ok(), raster.clone());
    let session = SessionState::new().with_document(b"PK\x03\x04 zip archive".to_vec());

    let (_, outcome) = run_action(session, AnalysisKind::PercentageMatch, &ctx).await;

    match outcome {
        ActionOutcome::Failed { message } => {
            assert!(message.starts_with("Error processing PDF:"), "got: {message}")
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(raster.renders.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn service_error_is_stored_as_text() {
    let ctx = ActionContext::new(EchoModel::failing(), FakeRasterizer::with_pages(1));
    let (session, outcome) = run_action(uploaded("jd"), AnalysisKind::AtsCompatibility, &ctx).await;

    let stored = session.slots.get(AnalysisKind::AtsCompatibility);
    assert!(stored.starts_with("Error with Gemini API:"), "got: {stored}");
    assert!(stored.contains("Resource has been exhausted"));
    assert_eq!(outcome.text(), Some(stored));
}

#[tokio::test]
async fn service_error_reaches_every_slot_and_chat() {
    let model = EchoModel::failing();
    let ctx = ActionContext::new(model.clone(), FakeRasterizer::with_pages(1));
    let mut session = uploaded("jd");

    for kind in AnalysisKind::ALL {
        let (next, outcome) = run_action(session, kind, &ctx).await;
        session = next;
        let stored = session.slots.get(kind);
        assert!(stored.starts_with("Error with Gemini API:"), "{kind}: {stored}");
        assert!(matches!(outcome, ActionOutcome::Completed { .. }), "{kind}");
    }

    let (session, outcome) = run_chat(session, "Any gaps?", &ctx).await;
    assert!(session.chat_response.starts_with("Error with Gemini API:"));
    assert_eq!(outcome.text(), Some(session.chat_response.as_str()));
    assert_eq!(model.seen.lock().unwrap().len(), AnalysisKind::ALL.len() + 1);

    // Six exported sections; role suggestions and chat stay out.
    let report = build_report(&session);
    assert_eq!(report.matches("Error with Gemini API:").count(), 6);
}

#[tokio::test]
async fn empty_job_description_is_still_sent() {
    let model = EchoModel::ok();
    let ctx = ActionContext::new(model.clone(), FakeRasterizer::with_pages(1));
    let (_, outcome) = run_action(uploaded(""), AnalysisKind::InterviewQuestions, &ctx).await;

    assert!(matches!(outcome, ActionOutcome::Completed { .. }));
    assert_eq!(model.seen.lock().unwrap()[0].0, "");
}

#[tokio::test]
async fn report_file_matches_download() {
    let ctx = ActionContext::new(EchoModel::ok(), FakeRasterizer::with_pages(1));
    let (session, _) = run_action(uploaded("jd"), AnalysisKind::SkillGapAnalysis, &ctx).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume_summary_report.txt");
    write_report(&session, &path).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), build_report(&session));
}
