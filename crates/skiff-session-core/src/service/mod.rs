//! Collaborator traits the transfer model is built against.
//!
//! The row model never talks to a concrete engine. It receives a
//! [`TorrentSession`] and a [`MetadataStore`] at construction time and goes
//! through these traits for every fact it displays, which keeps the model
//! testable with scripted fakes and keeps engine bindings swappable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use skiff_events::InfoHash;

use crate::error::SessionResult;
use crate::model::{Activity, Eta, SwarmCounts, TransferRates};

/// Queryable view of one torrent inside the engine.
///
/// Every query except [`info_hash`](Self::info_hash) is fallible: the engine
/// may invalidate a handle at any time, typically between an about-to-remove
/// notice and the matching removal. Callers treat a
/// [`StaleHandle`](crate::SessionError::StaleHandle) answer as "this row has
/// no fresh data", never as a crash.
pub trait SessionHandle: Send + Sync {
    /// Info-hash identifying the torrent. Valid even after the handle goes
    /// stale.
    fn info_hash(&self) -> InfoHash;

    /// Display name reported by the engine.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn name(&self) -> SessionResult<String>;

    /// Whether the torrent is paused.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn is_paused(&self) -> SessionResult<bool>;

    /// Whether the torrent is held in the queue rather than active.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn is_queued(&self) -> SessionResult<bool>;

    /// Whether the torrent has all payload data.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn is_seed(&self) -> SessionResult<bool>;

    /// Raw engine activity, before pause and queue flags are considered.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn activity(&self) -> SessionResult<Activity>;

    /// Instantaneous payload transfer rates.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn rates(&self) -> SessionResult<TransferRates>;

    /// Total size of the selected payload in bytes.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn total_size(&self) -> SessionResult<u64>;

    /// Completion progress in the `0.0..=1.0` range.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn progress(&self) -> SessionResult<f64>;

    /// Connected and tracker-reported swarm counts.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn swarm(&self) -> SessionResult<SwarmCounts>;

    /// Position in the download queue, or a negative value when unqueued.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn queue_position(&self) -> SessionResult<i64>;

    /// URL of the tracker the torrent is currently working with, empty when
    /// none has answered yet.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn current_tracker(&self) -> SessionResult<String>;

    /// Per-torrent download limit in bytes per second, negative or zero when
    /// unlimited.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn download_limit(&self) -> SessionResult<i64>;

    /// Per-torrent upload limit in bytes per second, negative or zero when
    /// unlimited.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes this torrent.
    fn upload_limit(&self) -> SessionResult<i64>;
}

/// Engine-wide queries the model needs beyond a single handle.
pub trait TorrentSession: Send + Sync {
    /// Handles for every torrent the engine currently tracks, in engine
    /// order.
    fn torrents(&self) -> Vec<Arc<dyn SessionHandle>>;

    /// Handle for one torrent, or `None` when the engine does not track it.
    fn find(&self, hash: InfoHash) -> Option<Arc<dyn SessionHandle>>;

    /// Estimated time until the torrent completes.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes the torrent.
    fn eta(&self, hash: InfoHash) -> SessionResult<Eta>;

    /// All-time upload divided by all-time download for the torrent.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](crate::SessionError::StaleHandle) when the
    /// engine no longer recognizes the torrent.
    fn share_ratio(&self, hash: InfoHash) -> SessionResult<f64>;
}

/// Persistence for the per-torrent facts the engine does not keep.
///
/// Names and labels are user-editable; timestamps are recorded once when the
/// matching lifecycle event fires. Readers get `None` for anything never
/// saved.
pub trait MetadataStore: Send + Sync {
    /// Saved display name override, if any.
    fn name(&self, hash: InfoHash) -> Option<String>;

    /// Persist a display name override.
    fn save_name(&self, hash: InfoHash, name: &str);

    /// Saved label, if any.
    fn label(&self, hash: InfoHash) -> Option<String>;

    /// Persist a label.
    fn save_label(&self, hash: InfoHash, label: &str);

    /// When the torrent was added, if recorded.
    fn added_at(&self, hash: InfoHash) -> Option<DateTime<Utc>>;

    /// Record when the torrent was added.
    fn save_added_at(&self, hash: InfoHash, at: DateTime<Utc>);

    /// When the torrent finished downloading, if recorded.
    fn completed_at(&self, hash: InfoHash) -> Option<DateTime<Utc>>;

    /// Record when the torrent finished downloading.
    fn save_completed_at(&self, hash: InfoHash, at: DateTime<Utc>);
}
