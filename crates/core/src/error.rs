//! Error types for the GroundCrew domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all GroundCrew operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors raised while selecting or calling an LLM provider.
///
/// `UnsupportedModel` and `MissingCredential` are client errors (the request
/// named something we cannot serve); `Unavailable` and `Rejected` are
/// upstream failures.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Missing credential for provider: {0}")]
    MissingCredential(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider rejected request (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Soft per-file ingestion failures.
///
/// These never abort a batch: the offending file is logged and skipped, and
/// the remaining files still contribute chunks.
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    #[error("No loader for file {file} (media type {media_type})")]
    LoaderUnavailable { file: String, media_type: String },

    #[error("Extraction failed for file {file}: {reason}")]
    ExtractionFailed { file: String, reason: String },
}

/// Hard index-construction failures.
///
/// Raised when the embedding backend or index assembly fails; aborts the
/// request since no grounded answer is possible.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Index build failed: {0}")]
    BuildFailed(String),
}
