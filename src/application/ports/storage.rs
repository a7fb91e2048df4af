//! Storage fault surfaced by every repository port.

use thiserror::Error;

/// Operational storage failure
///
/// The only non-domain fault in the core. A failed commit must leave
/// in-memory state untouched; callers log it and surface a generic failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
