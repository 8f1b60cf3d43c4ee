//! CLI binary for talk-to-cv.
//!
//! A thin shim over the library crate: `analyze` runs one session against a
//! local PDF, `serve` starts the web UI.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use talk_to_cv::pipeline::input::{has_pdf_extension, read_local};
use talk_to_cv::server::{self, AppState};
use talk_to_cv::{
    model, run_action, run_chat, write_report, ActionContext, ActionOutcome, AnalysisKind,
    AppConfig, SessionState,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Evaluate a résumé against a job description
  talkcv analyze resume.pdf --jd "Senior Rust engineer, async, Postgres"

  # Run every analysis and save the summary report
  talkcv analyze resume.pdf --jd-file job.txt --all --report resume_summary_report.txt

  # Ask a free-form question
  talkcv analyze resume.pdf --chat "Which projects best show leadership?"

  # Machine-readable output
  talkcv analyze resume.pdf --jd-file job.txt --action percentage_match --json

  # Start the web UI
  talkcv serve --addr 0.0.0.0:8501

ACTIONS:
  resume_evaluation       📝 Review Resume
  percentage_match        📊 Percentage Match
  interview_questions     ❓ Interview Questions
  skill_gap_analysis      🔍 Skill Gap Analysis
  formatting_suggestions  💼 Formatting Suggestions
  ats_compatibility       ⚙️ ATS Compatibility Check
  role_suggestions        🧑‍💼 Role Suggestions (not included in the report)

ENVIRONMENT VARIABLES:
  GOOGLE_API_KEY          Gemini API key (fallback: GEMINI_API_KEY)
  TALKCV_MODEL            Model ID (default: gemini-1.5-flash)
  TALKCV_PROVIDER         Route through an edgequake-llm provider (openai, anthropic, ollama, …)
  TALKCV_API_BASE         Override the Gemini endpoint
  TALKCV_MAX_PIXELS       Longest edge of the rendered page (default: 2000)
  TALKCV_JPEG_QUALITY     JPEG quality 1–100 (default: 75)
  PDFIUM_LIB_PATH         Path to libpdfium

A .env file in the working directory is loaded first.
"#;

/// Analyse a résumé PDF against a job description with a vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "talkcv",
    version,
    about = "Analyse a résumé PDF against a job description with a vision LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Model ID (e.g. gemini-1.5-flash, gemini-2.0-flash).
    #[arg(long, global = true, env = "TALKCV_MODEL")]
    model: Option<String>,

    /// edgequake-llm provider to use instead of the native Gemini client.
    #[arg(long, global = true, env = "TALKCV_PROVIDER")]
    provider: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "TALKCV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, global = true, env = "TALKCV_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run analyses on a local PDF and print the results.
    Analyze(AnalyzeArgs),
    /// Serve the web UI.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "TALKCV_ADDR", default_value = server::DEFAULT_ADDR)]
        addr: SocketAddr,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Résumé PDF file.
    input: PathBuf,

    /// Job description text.
    #[arg(long, conflicts_with = "jd_file")]
    jd: Option<String>,

    /// Read the job description from a file.
    #[arg(long)]
    jd_file: Option<PathBuf>,

    /// Analysis to run; repeat for several.
    #[arg(short, long = "action", value_enum)]
    actions: Vec<ActionArg>,

    /// Run every analysis.
    #[arg(long, conflicts_with = "actions")]
    all: bool,

    /// Ask a free-form question about the résumé.
    #[arg(long)]
    chat: Option<String>,

    /// Write the summary report to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
#[value(rename_all = "snake_case")]
enum ActionArg {
    ResumeEvaluation,
    PercentageMatch,
    InterviewQuestions,
    SkillGapAnalysis,
    FormattingSuggestions,
    AtsCompatibility,
    RoleSuggestions,
}

impl From<ActionArg> for AnalysisKind {
    fn from(v: ActionArg) -> Self {
        match v {
            ActionArg::ResumeEvaluation => AnalysisKind::ResumeEvaluation,
            ActionArg::PercentageMatch => AnalysisKind::PercentageMatch,
            ActionArg::InterviewQuestions => AnalysisKind::InterviewQuestions,
            ActionArg::SkillGapAnalysis => AnalysisKind::SkillGapAnalysis,
            ActionArg::FormattingSuggestions => AnalysisKind::FormattingSuggestions,
            ActionArg::AtsCompatibility => AnalysisKind::AtsCompatibility,
            ActionArg::RoleSuggestions => AnalysisKind::RoleSuggestions,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real env vars still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active.
    let show_spinner = match &cli.command {
        Command::Analyze(args) => !cli.quiet && !args.json,
        Command::Serve { .. } => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let model = model::from_config(&config).context("Failed to set up the model backend")?;
    let ctx = ActionContext::from_config(&config, model);

    match cli.command {
        Command::Serve { addr } => {
            if !cli.quiet {
                eprintln!("{} Serving on {}", green("◆"), bold(&format!("http://{addr}")));
            }
            server::serve(addr, AppState::new(ctx))
                .await
                .context("Server failed")?;
            Ok(())
        }
        Command::Analyze(args) => analyze(args, &ctx, show_spinner, cli.quiet).await,
    }
}

/// Map CLI args onto the environment-derived `AppConfig`.
fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut builder = AppConfig::from_env()
        .context("Invalid configuration")?
        .into_builder();
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    builder.build().context("Invalid configuration")
}

async fn load_job_description(args: &AnalyzeArgs) -> Result<String> {
    if let Some(ref text) = args.jd {
        return Ok(text.clone());
    }
    match args.jd_file {
        Some(ref path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description from {:?}", path)),
        None => Ok(String::new()),
    }
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Analyzing...");
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

async fn analyze(args: AnalyzeArgs, ctx: &ActionContext, show_spinner: bool, quiet: bool) -> Result<()> {
    let kinds: Vec<AnalysisKind> = if args.all {
        AnalysisKind::ALL.to_vec()
    } else {
        args.actions.iter().copied().map(AnalysisKind::from).collect()
    };
    if kinds.is_empty() && args.chat.is_none() && args.report.is_none() {
        anyhow::bail!("Nothing to do: pass --action, --all, --chat or --report");
    }

    if !has_pdf_extension(&args.input.to_string_lossy()) {
        warn!("{} does not have a .pdf extension", args.input.display());
    }
    let document = read_local(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut session = SessionState::new()
        .with_job_description(load_job_description(&args).await?)
        .with_document(document);

    if !quiet && !args.json {
        eprintln!("{} {}", green("✔"), talk_to_cv::prompts::UPLOAD_SUCCESS);
    }

    let mut results: Vec<(String, ActionOutcome)> = Vec::new();

    for kind in kinds {
        let bar = show_spinner.then(|| spinner(kind.label().to_string()));
        let (next, outcome) = run_action(session, kind, ctx).await;
        session = next;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        if !args.json {
            print_outcome(&outcome, quiet);
        }
        results.push((kind.key().to_string(), outcome));
    }

    if let Some(ref question) = args.chat {
        let bar = show_spinner.then(|| spinner("💬 Chat".to_string()));
        let (next, outcome) = run_chat(session, question, ctx).await;
        session = next;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        if !args.json {
            print_outcome(&outcome, quiet);
        }
        results.push(("chat".to_string(), outcome));
    }

    if let Some(ref path) = args.report {
        write_report(&session, path)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        if !quiet && !args.json {
            eprintln!("{} Report saved to {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if args.json {
        let mut outcomes = serde_json::Map::new();
        for (key, outcome) in &results {
            let value = serde_json::to_value(outcome).context("Failed to serialise results")?;
            outcomes.insert(key.clone(), value);
        }
        let body = serde_json::json!({
            "outcomes": outcomes,
            "session": session.snapshot(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).context("Failed to serialise results")?
        );
    }

    let failed = results
        .iter()
        .filter(|(_, o)| matches!(o, ActionOutcome::Failed { .. }))
        .count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} requests could not be run", results.len());
    }
    Ok(())
}

fn print_outcome(outcome: &ActionOutcome, quiet: bool) {
    match outcome {
        ActionOutcome::Completed {
            notice,
            heading,
            text,
        } => {
            if !quiet {
                eprintln!("{notice}");
            }
            println!("{}\n{}\n", bold(&format!("### {heading}")), text);
        }
        ActionOutcome::Failed { message } => eprintln!("{} {}", red("✗"), red(message)),
    }
}
