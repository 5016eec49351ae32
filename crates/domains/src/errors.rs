//! # DomainError
//!
//! Centralized error type shared by every crate in the workspace.
//! Adapters map their infrastructure failures into these variants so the
//! services layer can decide what is fatal and what is only reported.

use thiserror::Error;

use crate::models::StoreKind;

/// The primary error type for all moderation operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Submission rejected before any signal was computed (e.g. empty title)
    #[error("validation error: {0}")]
    Validation(String),

    /// Cutoff for time-based deletion could not be parsed
    #[error("invalid timestamp '{0}': expected ISO-8601")]
    InvalidTimestamp(String),

    /// Backing store is missing or malformed; reads degrade to empty,
    /// deletes skip the store.
    #[error("{store} store unavailable: {detail}")]
    StoreUnavailable { store: StoreKind, detail: String },

    /// Infrastructure failure while writing (disk full, permissions, ...)
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(store: StoreKind, detail: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            store,
            detail: detail.into(),
        }
    }
}

/// A specialized Result type for moderation logic.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Failure of an external classification collaborator.
///
/// Never surfaces to submitters: the signal collector turns it into the
/// `error` sentinel label.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Transport(String),

    #[error("classifier returned status {0}: {1}")]
    Status(u16, String),

    #[error("unrecognized classifier output: {0}")]
    UnexpectedOutput(String),

    #[error("classifier timed out after {0} ms")]
    Timeout(u64),
}
