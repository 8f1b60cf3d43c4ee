//! # talk-to-cv
//!
//! Analyse a résumé PDF against a job description with a vision model.
//!
//! ## How it works
//!
//! The first page of the uploaded PDF is rasterised, JPEG-encoded and sent to
//! the model as an image together with the job description and one of seven
//! fixed instructions (or a free-form chat question). Each answer is kept in
//! a per-session slot and the exported slots can be downloaded as a plain
//! text report.
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Input     %PDF magic check
//!  ├─ 2. Render    page one via pdfium (spawn_blocking)
//!  ├─ 3. Encode    JPEG → base64 ImagePart
//!  ├─ 4. Dispatch  [job description, image, instruction] → model
//!  └─ 5. Store     answer into the session slot for the action
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use talk_to_cv::{model, run_action, ActionContext, AnalysisKind, AppConfig, SessionState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GOOGLE_API_KEY and the TALKCV_* variables
//!     let config = AppConfig::from_env()?;
//!     let ctx = ActionContext::from_config(&config, model::from_config(&config)?);
//!
//!     let session = SessionState::new()
//!         .with_job_description("Senior backend engineer, Rust and Postgres")
//!         .with_document(std::fs::read("resume.pdf")?);
//!
//!     let (session, outcome) = run_action(session, AnalysisKind::PercentageMatch, &ctx).await;
//!     println!("{}", outcome.text().unwrap_or_default());
//!     println!("{}", talk_to_cv::build_report(&session));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | The axum web surface in [`server`] |
//! | `cli`    | on      | The `talkcv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable both when using only the library:
//! ```toml
//! talk-to-cv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod actions;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod session;

#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use actions::{run_action, run_chat, ActionContext, ActionOutcome};
pub use config::{AppConfig, AppConfigBuilder};
pub use error::{ExtractError, ServiceError, TalkCvError};
pub use model::{GenerateRequest, GenerativeModel};
pub use pipeline::dispatch::dispatch;
pub use pipeline::encode::ImagePart;
pub use pipeline::extract::{extract_first_page, ImageBundle};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer};
pub use report::{build_report, write_report};
pub use session::{AnalysisKind, ResultSlots, SessionSnapshot, SessionState};
