//! PDF validation and content encoding for captured files.

use attach_core::CaptureError;
use base64::{engine::general_purpose::STANDARD, Engine};

/// Every well-formed PDF starts with this marker.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Rejects anything that is not a PDF before it can enter the pipeline.
///
/// Checks the filename extension (case-insensitive) and the leading magic
/// bytes; an empty file is unreadable rather than merely the wrong type.
pub fn validate_pdf(filename: &str, bytes: &[u8]) -> Result<(), CaptureError> {
    if !filename.to_ascii_lowercase().ends_with(".pdf") {
        return Err(CaptureError::NotPdf(filename.to_string()));
    }

    if bytes.is_empty() {
        return Err(CaptureError::EmptyFile);
    }

    if !bytes.starts_with(PDF_MAGIC) {
        return Err(CaptureError::NotPdf(format!(
            "{} does not start with a PDF header",
            filename
        )));
    }

    Ok(())
}

/// Encodes document bytes as the base64 text stored at rest.
pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
