//! Status DTOs reported by the session layer.
//!
//! These types carry the raw per-torrent facts the engine exposes. They stay
//! deliberately close to the wire: presentation concerns such as state
//! classification live downstream in the row model.

use serde::{Deserialize, Serialize};

/// What the engine is currently doing with a torrent.
///
/// This is the raw engine activity, before pause and queue flags are folded
/// in. Display-level state classification is derived from it downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Disk space is being allocated for the torrent's files.
    Allocating,
    /// Metadata is still being fetched from the swarm.
    FetchingMetadata,
    /// Payload data is being downloaded.
    Downloading,
    /// All payload data is present; the torrent finished downloading.
    Finished,
    /// The torrent is complete and uploading to peers.
    Seeding,
    /// The torrent is waiting its turn for a file check.
    QueuedForChecking,
    /// Resume data is being validated against on-disk files.
    CheckingResumeData,
    /// File contents are being hashed and verified.
    CheckingFiles,
    /// The engine reported an activity this model does not recognize.
    Unknown,
}

/// Instantaneous payload transfer rates in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRates {
    /// Download rate in bytes per second.
    pub download_bps: u64,
    /// Upload rate in bytes per second.
    pub upload_bps: u64,
}

/// Swarm connectivity counts for a torrent.
///
/// `seeds` and `peers` are live connections. `complete` and `incomplete` are
/// tracker-reported swarm totals and are absent until a tracker has answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmCounts {
    /// Connected seeds.
    pub seeds: u32,
    /// Connected peers, seeds included.
    pub peers: u32,
    /// Seeds in the whole swarm, when the tracker has reported them.
    pub complete: Option<u32>,
    /// Leechers in the whole swarm, when the tracker has reported them.
    pub incomplete: Option<u32>,
}

/// Estimated time until a torrent completes.
///
/// `Seconds` values order numerically and every finite estimate sorts ahead
/// of `Unbounded`, so the variant order here is load-bearing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Eta {
    /// Completion expected after this many seconds.
    Seconds(u64),
    /// No meaningful estimate, e.g. a stalled or already-complete torrent.
    Unbounded,
}

impl Eta {
    /// Whether this estimate carries no finite completion time.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}
