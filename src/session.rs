//! Per-session state: the uploaded résumé, the job description and the
//! latest result of every analysis.
//!
//! [`SessionState`] is a plain record. Action handlers in [`crate::actions`]
//! take it by value and hand it back, so a session never changes behind a
//! caller's back and every handler can be tested in isolation.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven fixed analyses a user can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    ResumeEvaluation,
    PercentageMatch,
    InterviewQuestions,
    SkillGapAnalysis,
    FormattingSuggestions,
    AtsCompatibility,
    RoleSuggestions,
}

impl AnalysisKind {
    /// All kinds, in the order they are offered to the user.
    pub const ALL: [AnalysisKind; 7] = [
        AnalysisKind::ResumeEvaluation,
        AnalysisKind::PercentageMatch,
        AnalysisKind::InterviewQuestions,
        AnalysisKind::SkillGapAnalysis,
        AnalysisKind::FormattingSuggestions,
        AnalysisKind::AtsCompatibility,
        AnalysisKind::RoleSuggestions,
    ];

    /// Stable identifier used in URLs, JSON and the CLI.
    pub fn key(self) -> &'static str {
        match self {
            AnalysisKind::ResumeEvaluation => "resume_evaluation",
            AnalysisKind::PercentageMatch => "percentage_match",
            AnalysisKind::InterviewQuestions => "interview_questions",
            AnalysisKind::SkillGapAnalysis => "skill_gap_analysis",
            AnalysisKind::FormattingSuggestions => "formatting_suggestions",
            AnalysisKind::AtsCompatibility => "ats_compatibility",
            AnalysisKind::RoleSuggestions => "role_suggestions",
        }
    }

    /// Button label, emoji included.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::ResumeEvaluation => "📝 Review Resume",
            AnalysisKind::PercentageMatch => "📊 Percentage Match",
            AnalysisKind::InterviewQuestions => "❓ Interview Questions",
            AnalysisKind::SkillGapAnalysis => "🔍 Skill Gap Analysis",
            AnalysisKind::FormattingSuggestions => "💼 Formatting Suggestions",
            AnalysisKind::AtsCompatibility => "⚙️ ATS Compatibility Check",
            AnalysisKind::RoleSuggestions => "🧑‍💼 Role Suggestions",
        }
    }

    /// Label without the leading emoji, used as the result heading.
    pub fn title(self) -> &'static str {
        let label = self.label();
        label.split_once(' ').map(|(_, rest)| rest).unwrap_or(label)
    }

    /// Section heading in the exported report, or `None` for kinds that
    /// are shown interactively but never exported.
    pub fn report_heading(self) -> Option<&'static str> {
        match self {
            AnalysisKind::ResumeEvaluation => Some("Resume Evaluation"),
            AnalysisKind::PercentageMatch => Some("Percentage Match"),
            AnalysisKind::InterviewQuestions => Some("Interview Questions"),
            AnalysisKind::SkillGapAnalysis => Some("Skill Gap Analysis"),
            AnalysisKind::FormattingSuggestions => Some("Resume Formatting Suggestions"),
            AnalysisKind::AtsCompatibility => Some("ATS Compatibility Check"),
            AnalysisKind::RoleSuggestions => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown action key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action '{0}'. Expected one of: resume_evaluation, percentage_match, interview_questions, skill_gap_analysis, formatting_suggestions, ats_compatibility, role_suggestions")]
pub struct UnknownAction(pub String);

impl FromStr for AnalysisKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace('-', "_");
        AnalysisKind::ALL
            .into_iter()
            .find(|k| k.key() == normalised)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Latest text result for each [`AnalysisKind`].
///
/// A slot is either empty or holds exactly what the last run of its action
/// returned. Writing a slot replaces it; nothing accumulates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSlots {
    slots: [String; 7],
}

impl ResultSlots {
    pub fn get(&self, kind: AnalysisKind) -> &str {
        &self.slots[kind.index()]
    }

    pub fn set(&mut self, kind: AnalysisKind, text: impl Into<String>) {
        self.slots[kind.index()] = text.into();
    }

    /// Iterate `(kind, text)` pairs in [`AnalysisKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (AnalysisKind, &str)> + '_ {
        AnalysisKind::ALL
            .into_iter()
            .map(move |k| (k, self.slots[k.index()].as_str()))
    }
}

impl Serialize for ResultSlots {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (kind, text) in self.iter() {
            map.serialize_entry(kind.key(), text)?;
        }
        map.end()
    }
}

/// Everything one user session holds.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Job description text as typed by the user.
    pub job_description: String,
    /// Raw bytes of the uploaded résumé. A new upload replaces the old one.
    pub document: Option<Bytes>,
    /// Latest analysis results.
    pub slots: ResultSlots,
    /// Latest chat answer. Never exported.
    pub chat_response: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job_description(mut self, text: impl Into<String>) -> Self {
        self.job_description = text.into();
        self
    }

    pub fn with_document(mut self, bytes: impl Into<Bytes>) -> Self {
        self.document = Some(bytes.into());
        self
    }

    /// A serialisable view for API responses (the document itself is omitted).
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            job_description: self.job_description.clone(),
            has_document: self.document.is_some(),
            document_bytes: self.document.as_ref().map(|d| d.len()).unwrap_or(0),
            results: self.slots.clone(),
            chat_response: self.chat_response.clone(),
        }
    }
}

/// JSON-friendly view of a [`SessionState`].
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub job_description: String,
    pub has_document: bool,
    pub document_bytes: usize,
    pub results: ResultSlots,
    pub chat_response: String,
}
