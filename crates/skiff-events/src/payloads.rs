//! Event payload types carried across the bus.

use chrono::{DateTime, Utc};

use crate::id::InfoHash;

/// Identifier assigned to each event emitted by the session.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 1_024;

/// Lifecycle events the session reports for its torrents.
///
/// Every variant carries the hash of the torrent it concerns; consumers
/// resolve the hash against their own state or the live session.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A torrent was registered with the session.
    TorrentAdded {
        /// Hash of the torrent that was added.
        hash: InfoHash,
    },
    /// A torrent is about to be removed; its handle is still valid.
    TorrentAboutToBeRemoved {
        /// Hash of the torrent scheduled for removal.
        hash: InfoHash,
    },
    /// A torrent was removed from the session.
    TorrentRemoved {
        /// Hash of the torrent that was removed.
        hash: InfoHash,
    },
    /// A torrent finished downloading its payload.
    TorrentFinished {
        /// Hash of the torrent that completed.
        hash: InfoHash,
    },
    /// Magnet metadata arrived and the torrent now has a file listing.
    MetadataReceived {
        /// Hash of the torrent whose metadata arrived.
        hash: InfoHash,
    },
    /// A paused torrent resumed transferring.
    TorrentResumed {
        /// Hash of the torrent that resumed.
        hash: InfoHash,
    },
    /// A torrent was paused.
    TorrentPaused {
        /// Hash of the torrent that paused.
        hash: InfoHash,
    },
    /// A file re-check completed for a torrent.
    CheckingFinished {
        /// Hash of the torrent whose re-check completed.
        hash: InfoHash,
    },
}

impl Event {
    /// Machine-friendly discriminator for filtering consumers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TorrentAdded { .. } => "torrent_added",
            Self::TorrentAboutToBeRemoved { .. } => "torrent_about_to_be_removed",
            Self::TorrentRemoved { .. } => "torrent_removed",
            Self::TorrentFinished { .. } => "torrent_finished",
            Self::MetadataReceived { .. } => "metadata_received",
            Self::TorrentResumed { .. } => "torrent_resumed",
            Self::TorrentPaused { .. } => "torrent_paused",
            Self::CheckingFinished { .. } => "checking_finished",
        }
    }

    /// Hash of the torrent the event concerns.
    #[must_use]
    pub const fn hash(&self) -> InfoHash {
        match self {
            Self::TorrentAdded { hash }
            | Self::TorrentAboutToBeRemoved { hash }
            | Self::TorrentRemoved { hash }
            | Self::TorrentFinished { hash }
            | Self::MetadataReceived { hash }
            | Self::TorrentResumed { hash }
            | Self::TorrentPaused { hash }
            | Self::CheckingFinished { hash } => *hash,
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Monotonic identifier assigned to the wrapped event.
    pub id: EventId,
    /// Timestamp recording when the envelope was produced.
    pub timestamp: DateTime<Utc>,
    /// Wrapped event payload.
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn sample_hash() -> InfoHash {
        InfoHash::new([0x42; 20])
    }

    fn assert_event_kind(event: &Event, expected: &str) {
        assert_eq!(event.kind(), expected);
    }

    #[test]
    fn event_kind_maps_lifecycle_variants() {
        let hash = sample_hash();
        assert_event_kind(&Event::TorrentAdded { hash }, "torrent_added");
        assert_event_kind(
            &Event::TorrentAboutToBeRemoved { hash },
            "torrent_about_to_be_removed",
        );
        assert_event_kind(&Event::TorrentRemoved { hash }, "torrent_removed");
        assert_event_kind(&Event::TorrentFinished { hash }, "torrent_finished");
        assert_event_kind(&Event::MetadataReceived { hash }, "metadata_received");
        assert_event_kind(&Event::TorrentResumed { hash }, "torrent_resumed");
        assert_event_kind(&Event::TorrentPaused { hash }, "torrent_paused");
        assert_event_kind(&Event::CheckingFinished { hash }, "checking_finished");
    }

    #[test]
    fn every_variant_exposes_its_hash() {
        let hash = sample_hash();
        assert_eq!(Event::TorrentAdded { hash }.hash(), hash);
        assert_eq!(Event::TorrentRemoved { hash }.hash(), hash);
        assert_eq!(Event::CheckingFinished { hash }.hash(), hash);
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let envelope = EventEnvelope {
            id: 7,
            timestamp: Utc::now(),
            event: Event::TorrentPaused {
                hash: sample_hash(),
            },
        };
        let json = serde_json::to_string(&envelope).expect("serialize");
        assert!(json.contains("\"type\":\"torrent_paused\""));
        let back: EventEnvelope = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, envelope);
    }
}
