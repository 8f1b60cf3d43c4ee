//! The downloadable summary report.
//!
//! The report is the job description followed by every exported result
//! slot, each under a fixed heading. Empty slots still get their heading.

use crate::error::TalkCvError;
use crate::session::{AnalysisKind, SessionState};
use std::path::Path;
use tracing::info;

/// File name offered for download.
pub const REPORT_FILE_NAME: &str = "resume_summary_report.txt";

/// MIME type of the report.
pub const REPORT_MIME: &str = "text/plain";

/// Title line of the report.
pub const REPORT_TITLE: &str = "## ATS Resume Expert Summary Report";

/// Heading of the job-description section.
pub const JOB_DESCRIPTION_HEADING: &str = "Job Description";

/// Render the report for `session`.
pub fn build_report(session: &SessionState) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    push_section(&mut out, JOB_DESCRIPTION_HEADING, &session.job_description);

    for (kind, text) in session.slots.iter() {
        if let Some(heading) = kind.report_heading() {
            push_section(&mut out, heading, text);
        }
    }
    out
}

fn push_section(out: &mut String, heading: &str, body: &str) {
    out.push_str("### ");
    out.push_str(heading);
    out.push_str(":\n");
    out.push_str(body);
    out.push_str("\n\n");
}

/// Headings present in every report, in order.
pub fn report_headings() -> Vec<&'static str> {
    std::iter::once(JOB_DESCRIPTION_HEADING)
        .chain(AnalysisKind::ALL.iter().filter_map(|k| k.report_heading()))
        .collect()
}

/// Write the report for `session` to `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_report(session: &SessionState, path: impl AsRef<Path>) -> Result<(), TalkCvError> {
    let path = path.as_ref();
    let report = build_report(session);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| TalkCvError::ReportWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, report.as_bytes())
        .await
        .map_err(|e| TalkCvError::ReportWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| TalkCvError::ReportWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Split a report into `(heading, body)` pairs.
    fn sections(report: &str) -> Vec<(String, String)> {
        report
            .split("### ")
            .skip(1)
            .map(|chunk| {
                let (heading, body) = chunk.split_once(":\n").unwrap();
                (heading.to_string(), body.trim_end_matches('\n').to_string())
            })
            .collect()
    }

    #[test]
    fn fresh_session_has_all_headings_and_only_the_job_description() {
        let jd = "Senior Rust engineer\nRemote, EU time zones";
        let report = build_report(&SessionState::new().with_job_description(jd));

        assert!(report.starts_with(REPORT_TITLE));
        let secs = sections(&report);
        let headings: Vec<&str> = secs.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                "Job Description",
                "Resume Evaluation",
                "Percentage Match",
                "Interview Questions",
                "Skill Gap Analysis",
                "Resume Formatting Suggestions",
                "ATS Compatibility Check",
            ]
        );
        assert_eq!(secs[0].1, jd);
        assert!(secs[1..].iter().all(|(_, body)| body.is_empty()));
        assert_eq!(headings, report_headings());
    }

    #[test]
    fn filled_slots_land_under_their_heading() {
        let mut s = SessionState::new().with_job_description("jd");
        s.slots.set(AnalysisKind::PercentageMatch, "72%");
        s.slots.set(AnalysisKind::RoleSuggestions, "Platform engineer");
        let report = build_report(&s);

        let secs = sections(&report);
        let pm = secs.iter().find(|(h, _)| h == "Percentage Match").unwrap();
        assert_eq!(pm.1, "72%");
        assert!(!report.contains("Platform engineer"));
    }

    #[tokio::test]
    async fn write_report_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(REPORT_FILE_NAME);
        let s = SessionState::new().with_job_description("jd");
        write_report(&s, &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, build_report(&s));
        assert!(!path.with_extension("txt.tmp").exists());
    }
}
