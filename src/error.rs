//! Error type for the fallible edges of the crate
//!
//! The pagination engine itself never fails; only parsing host input and
//! CLI I/O can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagerError {
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown paper size '{0}' (expected A4 or Letter)")]
    UnknownPaperSize(String),

    #[error("Zoom factor must be finite and positive, got {0}")]
    InvalidZoom(f32),

    #[error("Pagination distances must be finite and non-negative (minAdvance {min_advance}, gap {gap})")]
    InvalidRules { min_advance: f32, gap: f32 },
}

pub type Result<T> = std::result::Result<T, PagerError>;
