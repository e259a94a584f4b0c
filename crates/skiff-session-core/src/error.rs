//! Error types for session queries.

use skiff_events::InfoHash;
use thiserror::Error;

/// Primary error type for per-torrent session queries.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The torrent was removed or is in a transient invalid state, so its
    /// handle can no longer be queried.
    #[error("torrent {hash} handle is no longer valid")]
    StaleHandle {
        /// Hash of the torrent whose handle went stale.
        hash: InfoHash,
    },
}

impl SessionError {
    /// Hash of the torrent the failed query concerned.
    #[must_use]
    pub const fn hash(&self) -> InfoHash {
        match self {
            Self::StaleHandle { hash } => *hash,
        }
    }
}

/// Convenience alias for session query results.
pub type SessionResult<T> = Result<T, SessionError>;
