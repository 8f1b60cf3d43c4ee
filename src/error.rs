//! Error types for the talk-to-cv library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`ExtractError`] — the uploaded résumé could not be turned into a page
//!   image (nothing uploaded, zero pages, corrupt file, pdfium missing).
//!   The action layer turns it into an error banner and leaves the session
//!   untouched.
//!
//! * [`ServiceError`] — the call to the generative model failed (auth,
//!   network, quota, blocked prompt). [`crate::pipeline::dispatch::dispatch`]
//!   flattens it into an `"Error with Gemini API: …"` string that takes the
//!   place of the analysis text.
//!
//! * [`TalkCvError`] — **Fatal**: problems outside any session, such as an
//!   unreadable input path, a report that cannot be written or a server
//!   that cannot bind. Returned as `Err` from the top-level entry points.

use std::path::PathBuf;
use thiserror::Error;

/// Why the first page of an uploaded document could not be extracted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// No document was supplied with the request.
    #[error("No file uploaded")]
    MissingInput,

    /// The document opened fine but contains no pages.
    #[error("No pages found in the uploaded PDF.")]
    EmptyDocument,

    /// The bytes do not start with the `%PDF` magic.
    #[error("File is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// The PDF is encrypted; résumés with passwords are not supported.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// pdfium-render returned an error for the first page.
    #[error("Rasterisation failed: {detail}")]
    RasterisationFailed { detail: String },

    /// The rendered bitmap could not be written as JPEG.
    #[error("Image encoding failed: {detail}")]
    EncodeFailed { detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or place the library next to the binary."
    )]
    PdfiumBindingFailed(String),

    /// Unexpected internal error (e.g. the render task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// The text shown to the user in place of a result.
    ///
    /// An empty document gets its own sentence; every other failure is
    /// prefixed with `Error processing PDF:`.
    pub fn banner(&self) -> String {
        match self {
            ExtractError::EmptyDocument => self.to_string(),
            other => format!("Error processing PDF: {other}"),
        }
    }
}

/// A failed call to the external generative model.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No API key was configured. Only detected at request time.
    #[error("API key not configured; set GOOGLE_API_KEY")]
    MissingApiKey,

    /// Transport-level failure (DNS, TLS, connection reset, bad JSON body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The prompt or the response was blocked by the service's safety filters.
    #[error("Response blocked: {reason}")]
    Blocked { reason: String },

    /// The service answered but produced no text.
    #[error("Model returned no text content")]
    EmptyResponse,

    /// A non-Gemini provider (via edgequake-llm) failed.
    #[error("Provider '{provider}' failed: {detail}")]
    Provider { provider: String, detail: String },
}

/// Fatal errors returned by the talk-to-cv entry points.
#[derive(Debug, Error)]
pub enum TalkCvError {
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Could not create or write the report file.
    #[error("Failed to write report '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured model backend could not be created.
    #[error("Model backend '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The web surface could not bind or serve.
    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_banner_is_plain() {
        assert_eq!(
            ExtractError::EmptyDocument.banner(),
            "No pages found in the uploaded PDF."
        );
    }

    #[test]
    fn missing_input_banner_is_prefixed() {
        assert_eq!(
            ExtractError::MissingInput.banner(),
            "Error processing PDF: No file uploaded"
        );
    }

    #[test]
    fn api_error_display() {
        let e = ServiceError::Api {
            status: 403,
            message: "API key not valid".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("403"), "got: {msg}");
        assert!(msg.contains("API key not valid"));
    }

    #[test]
    fn provider_error_display() {
        let e = ServiceError::Provider {
            provider: "openai".into(),
            detail: "quota exceeded".into(),
        };
        assert!(e.to_string().contains("openai"));
        assert!(e.to_string().contains("quota exceeded"));
    }
}
