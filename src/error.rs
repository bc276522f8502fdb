//! Error types for fetching and rebuilding repository trees.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoTreeError {
    #[error("Invalid repository reference: {0:?} (expected owner/repo or a repository URL)")]
    MalformedReference(String),

    #[error("Invalid author or repo name: {0}")]
    LookupFailed(u16),

    #[error("Failed to get git tree: {0}")]
    ListingFailed(u16),

    #[error("Unexpected response format: {0}")]
    UnexpectedResponseShape(String),

    #[error("Path is used as both a file and a directory: {0}")]
    PathConflict(String),

    #[error("Malformed tree entry path: {0:?}")]
    MalformedEntry(String),

    #[error("Still rate limited after {0} waits")]
    RateLimitExhausted(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepoTreeError {
    /// Transport and I/O failures are reported as unexpected rather than as
    /// a problem with the repository or its listing.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, RepoTreeError::Http(_) | RepoTreeError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, RepoTreeError>;
