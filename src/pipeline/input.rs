//! Input validation: make sure uploaded bytes look like a PDF before pdfium
//! ever sees them, and read local files for the CLI.
//!
//! Checking the `%PDF` magic up front gives the user a clear message
//! instead of an opaque pdfium load failure.

use crate::error::{ExtractError, TalkCvError};
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// Magic bytes every PDF starts with.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Check the supplied document and return it if it looks like a PDF.
///
/// `None` (or an empty upload) is [`ExtractError::MissingInput`].
pub fn validate_document(document: Option<&[u8]>) -> Result<&[u8], ExtractError> {
    let bytes = match document {
        Some(b) if !b.is_empty() => b,
        _ => return Err(ExtractError::MissingInput),
    };

    if bytes.len() < PDF_MAGIC.len() || &bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
        let magic = bytes.iter().take(PDF_MAGIC.len()).copied().collect();
        return Err(ExtractError::NotAPdf { magic });
    }

    Ok(bytes)
}

/// Whether a file name is acceptable for the résumé upload.
pub fn has_pdf_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Read a local résumé into memory.
pub async fn read_local(path: &Path) -> Result<Bytes, TalkCvError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(Bytes::from(bytes))
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(TalkCvError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(TalkCvError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}
