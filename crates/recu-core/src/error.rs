//! Error types for the recu-core library.

use thiserror::Error;

/// Main error type for the recu library.
#[derive(Error, Debug)]
pub enum RecuError {
    /// Input document error (empty or unreadable raw text).
    #[error("input error: {0}")]
    Input(String),

    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Shop template application error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// External AI extraction error.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Catalog/template store error.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// A referenced product does not exist in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// OCR ran but produced no usable text.
    #[error("OCR produced empty text")]
    EmptyText,

    /// The OCR engine itself failed.
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// Errors related to applying a shop template.
///
/// These are recoverable: the extractor falls back to the generic
/// line scanner when a template cannot be applied.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A stored template pattern failed to compile.
    #[error("invalid {field} pattern: {reason}")]
    InvalidPattern { field: &'static str, reason: String },
}

/// Errors from the external AI extraction collaborator.
#[derive(Error, Debug)]
pub enum AiError {
    /// Service unreachable or unconfigured (missing credentials, network
    /// failure, timeout). Recovered by accepting the local result.
    #[error("AI service unavailable: {0}")]
    Unavailable(String),

    /// Malformed response (invalid JSON, missing fields).
    #[error("malformed AI response: {0}")]
    ResponseFormat(String),
}

/// Errors from the catalog/template/learning stores.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to load a persisted document.
    #[error("failed to load {what}: {reason}")]
    Load { what: &'static str, reason: String },

    /// Failed to save a persisted document.
    #[error("failed to save {what}: {reason}")]
    Save { what: &'static str, reason: String },
}

/// Result type for the recu library.
pub type Result<T> = std::result::Result<T, RecuError>;
