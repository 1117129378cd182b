//! Store error types.
//!
//! Query operations distinguish caller mistakes ([`StoreError::InvalidArgument`])
//! from an unusable database ([`StoreError::Unavailable`]). Seeding adds its
//! own validation failures.

use std::path::PathBuf;
use thiserror::Error;

/// Content store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or a query failed.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),

    /// A required parameter was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Seed data violates the hierarchy invariants.
    #[error("invalid seed data: {0}")]
    InvalidSeed(String),

    /// Seed file could not be read.
    #[error("Failed to read seed file: {path}")]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid JSON for the seed format.
    #[error("Failed to parse seed data")]
    SeedFormat {
        #[source]
        source: serde_json::Error,
    },

    /// The connection mutex was poisoned by a panicking reader.
    #[error("store connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Whether the caller, not the store, is at fault.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
