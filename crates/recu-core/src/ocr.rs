//! OCR collaborator contract.
//!
//! Image-to-text is a black box to the core: one synchronous call producing
//! UTF-8 text or a typed failure. The pipeline treats empty or
//! whitespace-only output as [`OcrError::EmptyText`].

use crate::error::OcrError;

/// External OCR collaborator: image bytes in, UTF-8 text out.
pub trait OcrProvider: Send + Sync {
    fn extract_text(&self, image: &[u8]) -> Result<String, OcrError>;
}
