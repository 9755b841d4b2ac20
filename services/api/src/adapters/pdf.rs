//! services/api/src/adapters/pdf.rs
//!
//! Text extraction from uploaded CVs.

use bytes::Bytes;
use career_portal_core::ports::{PortError, PortResult};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub fn is_pdf(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with(PDF_CONTENT_TYPE))
}

/// Extracts the text of a PDF. Parsing is CPU-bound, so it runs on the blocking pool.
pub async fn extract_pdf_text(data: Bytes) -> PortResult<String> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| PortError::Unexpected(format!("PDF extraction task failed: {e}")))?
        .map_err(|e| PortError::Unexpected(format!("Unreadable PDF: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_check_allows_parameters() {
        assert!(is_pdf(Some("application/pdf")));
        assert!(is_pdf(Some("application/pdf; name=cv.pdf")));
        assert!(!is_pdf(Some("text/plain")));
        assert!(!is_pdf(None));
    }

    #[tokio::test]
    async fn garbage_is_reported_not_panicked() {
        let err = extract_pdf_text(Bytes::from_static(b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }
}
