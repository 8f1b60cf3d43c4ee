//! Instruction strings and fixed user-facing text.
//!
//! Every prompt sent to the model lives here so wording changes touch one
//! file, and tests can inspect the prompts without a live model.

use crate::session::AnalysisKind;

/// Instruction for [`AnalysisKind::ResumeEvaluation`].
pub const RESUME_EVALUATION: &str = "You are an experienced Technical Human Resource Manager. Your task is to review the provided resume against the job description. Please share your professional evaluation on whether the candidate's profile aligns with the role. Highlight strengths and weaknesses of the applicant.";

/// Instruction for [`AnalysisKind::PercentageMatch`].
pub const PERCENTAGE_MATCH: &str = "You are a skilled ATS scanner. Evaluate the resume and give a percentage match with the job description, missing keywords, and your thoughts.";

/// Instruction for [`AnalysisKind::InterviewQuestions`].
pub const INTERVIEW_QUESTIONS: &str = "Generate 10 interview questions based on the resume relevant to a web developer role.";

/// Instruction for [`AnalysisKind::SkillGapAnalysis`].
pub const SKILL_GAP_ANALYSIS: &str = "Analyze the resume to identify skill gaps and suggest improvements to be a better fit for the role.";

/// Instruction for [`AnalysisKind::FormattingSuggestions`].
pub const FORMATTING_SUGGESTIONS: &str = "Evaluate the resume's formatting and suggest improvements, including layout, font usage, and missing sections.";

/// Instruction for [`AnalysisKind::AtsCompatibility`].
pub const ATS_COMPATIBILITY: &str = "Review the resume for ATS compatibility and highlight potential parsing issues.";

/// Instruction for [`AnalysisKind::RoleSuggestions`].
pub const ROLE_SUGGESTIONS: &str = "Based on the resume, suggest job roles that match the candidate's skills and experience, explaining why each role is suitable.";

/// Returned by the dispatcher when there is no page image to send.
pub const PDF_MISSING_PLACEHOLDER: &str = "PDF content is missing. Please upload a valid PDF file.";

/// Prefix of every flattened service error.
pub const SERVICE_ERROR_PREFIX: &str = "Error with Gemini API:";

/// Shown when chat is triggered with a blank question.
pub const CHAT_EMPTY_QUESTION: &str = "Ask a question about your resume.";

/// Shown after a résumé upload is accepted.
pub const UPLOAD_SUCCESS: &str = "PDF Uploaded Successfully!";

/// Look up the fixed instruction for an analysis kind.
pub fn instruction_for(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::ResumeEvaluation => RESUME_EVALUATION,
        AnalysisKind::PercentageMatch => PERCENTAGE_MATCH,
        AnalysisKind::InterviewQuestions => INTERVIEW_QUESTIONS,
        AnalysisKind::SkillGapAnalysis => SKILL_GAP_ANALYSIS,
        AnalysisKind::FormattingSuggestions => FORMATTING_SUGGESTIONS,
        AnalysisKind::AtsCompatibility => ATS_COMPATIBILITY,
        AnalysisKind::RoleSuggestions => ROLE_SUGGESTIONS,
    }
}

/// Build the instruction for a free-form chat question.
pub fn chat_instruction(question: &str) -> String {
    format!("Based on the resume, {question}")
}
