//! Domain error taxonomy for pagescout.
//!
//! `ScrapeError` classifies failures into NotFound / OutOfRange / Invalid /
//! Upstream classes. `anyhow::Error` from external seams converts into the
//! `Upstream` variant at the tool boundary.

use thiserror::Error;

/// Convenience alias for results that fail with a [`ScrapeError`].
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// The domain error taxonomy surfaced by the session store and MCP tools.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No session has been established via `visit_page` yet (NotFound class).
    #[error("No active session")]
    NoActiveSession,

    /// A session id was requested that does not exist (NotFound class).
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// No in-page search is currently active (NotFound class).
    #[error("No active search")]
    NoActiveSearch,

    /// A chunk index outside the valid range was requested (OutOfRange class).
    #[error("Chunk index {index} is out of range. Available chunks: 0 to {max}")]
    ChunkOutOfRange { index: i64, max: usize },

    /// A URL failed the safety guard and was refused (Invalid class).
    #[error("unsafe url: {0}")]
    UnsafeUrl(String),

    /// An external dependency failed (UpstreamFailure class).
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        ScrapeError::Upstream(format!("{err:#}"))
    }
}
