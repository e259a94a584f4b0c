//! Per-torrent row state and cell derivation.
//!
//! A [`TransferRow`] wraps one live session handle plus the persisted
//! display fields (name, label, timestamps). Everything else it shows is
//! recomputed from the handle on each query, so a row never holds stale
//! transfer data and a stale handle degrades to the invalid classification
//! instead of an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skiff_events::InfoHash;
use skiff_session_core::{
    Activity, Eta, MetadataStore, SessionHandle, SessionResult, SwarmCounts, TorrentSession,
};
use tracing::debug;

use crate::columns::Column;

/// Display classification of one torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    /// Actively downloading payload data.
    Downloading,
    /// Downloading but currently without payload throughput.
    StalledDownloading,
    /// Actively uploading to peers.
    Seeding,
    /// Complete but currently without upload throughput.
    StalledSeeding,
    /// Paused before completion.
    PausedDownloading,
    /// Paused after completion.
    PausedSeeding,
    /// Held in the queue before completion.
    QueuedDownloading,
    /// Held in the queue after completion.
    QueuedSeeding,
    /// Checking files before completion.
    CheckingDownloading,
    /// Checking files after completion.
    CheckingSeeding,
    /// The handle could not be queried or the engine state is unknown.
    Invalid,
}

impl TransferState {
    /// Icon the view should show for this state.
    #[must_use]
    pub const fn icon(self) -> StatusIcon {
        match self {
            Self::PausedDownloading | Self::PausedSeeding => StatusIcon::Paused,
            Self::QueuedDownloading | Self::QueuedSeeding => StatusIcon::Queued,
            Self::Downloading => StatusIcon::Downloading,
            Self::StalledDownloading => StatusIcon::StalledDownload,
            Self::Seeding => StatusIcon::Uploading,
            Self::StalledSeeding => StatusIcon::StalledUpload,
            Self::CheckingDownloading | Self::CheckingSeeding => StatusIcon::Checking,
            Self::Invalid => StatusIcon::Error,
        }
    }

    /// Foreground color the view should use for this state.
    #[must_use]
    pub const fn color(self) -> StatusColor {
        match self {
            Self::PausedDownloading | Self::PausedSeeding | Self::Invalid => StatusColor::Red,
            Self::QueuedDownloading
            | Self::QueuedSeeding
            | Self::StalledDownloading
            | Self::StalledSeeding
            | Self::CheckingDownloading
            | Self::CheckingSeeding => StatusColor::Grey,
            Self::Downloading => StatusColor::Green,
            Self::Seeding => StatusColor::Orange,
        }
    }
}

/// Symbolic icon reference; views resolve it against their skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    /// Pause glyph.
    Paused,
    /// Queue glyph.
    Queued,
    /// Active download arrow.
    Downloading,
    /// Idle download arrow.
    StalledDownload,
    /// Active upload arrow.
    Uploading,
    /// Idle upload arrow.
    StalledUpload,
    /// Verification spinner.
    Checking,
    /// Error glyph.
    Error,
}

impl StatusIcon {
    /// Skin asset name for the icon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Queued => "queued",
            Self::Downloading => "downloading",
            Self::StalledDownload => "stalled_dl",
            Self::Uploading => "uploading",
            Self::StalledUpload => "stalled_up",
            Self::Checking => "checking",
            Self::Error => "error",
        }
    }
}

/// Symbolic foreground color for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    /// Paused and invalid rows.
    Red,
    /// Queued, stalled, and checking rows.
    Grey,
    /// Active downloads.
    Green,
    /// Active uploads.
    Orange,
}

/// Sortable encoding of (connected, total) source counts.
///
/// Connected sources dominate the ordering. A known swarm-wide total of at
/// least the connected count contributes `total * 10`; an unknown or
/// implausible total contributes a bare `1`, so rows with tracker-confirmed
/// totals outrank rows without them at equal connectivity. Counts too large
/// for the encoding saturate at `u64::MAX`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SourceCount(pub u64);

impl SourceCount {
    /// Encode connected sources plus an optional swarm-wide total.
    #[must_use]
    pub const fn encode(connected: u64, total: Option<u64>) -> Self {
        let value = connected.saturating_mul(1_000_000);
        let low = match total {
            Some(total) if total >= connected => total.saturating_mul(10),
            _ => 1,
        };
        Self(value.saturating_add(low))
    }

    /// Connected count recovered from the encoding.
    ///
    /// Exact whenever the low part came from the unknown-total arm.
    #[must_use]
    pub const fn connected(self) -> u64 {
        self.0 / 1_000_000
    }
}

/// One derived cell, typed by content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Free-form text such as a name, label, or tracker URL.
    Text(String),
    /// Unsigned byte quantity (sizes, rates).
    Bytes(u64),
    /// Signed quantity (queue position, limits).
    Signed(i64),
    /// Completion fraction in `0.0..=1.0`.
    Fraction(f64),
    /// Share ratio.
    Ratio(f64),
    /// The row's classification.
    State(TransferState),
    /// Sortable source-count encoding.
    Sources(SourceCount),
    /// Estimated completion time.
    Eta(Eta),
    /// A point in time.
    Timestamp(DateTime<Utc>),
    /// Nothing to show, e.g. after a failed handle query.
    Empty,
}

/// Outcome of a label edit that actually changed the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChange {
    /// Label before the edit, empty when none was set.
    pub previous: String,
    /// Label after the edit.
    pub current: String,
}

/// One torrent's row in the transfer table.
pub struct TransferRow {
    handle: Arc<dyn SessionHandle>,
    session: Arc<dyn TorrentSession>,
    store: Arc<dyn MetadataStore>,
    hash: InfoHash,
    name: String,
    label: String,
    added_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl TransferRow {
    /// Wrap a live handle, resolving persisted display fields.
    ///
    /// A missing added-at timestamp is stamped with the current time, so
    /// every row has one from the moment it is first seen.
    #[must_use]
    pub fn new(
        handle: Arc<dyn SessionHandle>,
        session: Arc<dyn TorrentSession>,
        store: Arc<dyn MetadataStore>,
    ) -> Self {
        let hash = handle.info_hash();
        let name = store
            .name(hash)
            .filter(|name| !name.is_empty())
            .or_else(|| handle.name().ok())
            .unwrap_or_default();
        let label = store.label(hash).unwrap_or_default();
        let added_at = store.added_at(hash).or_else(|| {
            let now = Utc::now();
            store.save_added_at(hash, now);
            Some(now)
        });
        let completed_at = store.completed_at(hash);
        Self {
            handle,
            session,
            store,
            hash,
            name,
            label,
            added_at,
            completed_at,
        }
    }

    /// Stable identity of the torrent.
    #[must_use]
    pub const fn hash(&self) -> InfoHash {
        self.hash
    }

    /// Classify the torrent for display.
    ///
    /// Pause wins over queueing, queueing wins over engine activity, and
    /// any failed handle query collapses to [`TransferState::Invalid`].
    #[must_use]
    pub fn state(&self) -> TransferState {
        self.classify().unwrap_or(TransferState::Invalid)
    }

    fn classify(&self) -> SessionResult<TransferState> {
        let seed = self.handle.is_seed()?;
        if self.handle.is_paused()? {
            return Ok(if seed {
                TransferState::PausedSeeding
            } else {
                TransferState::PausedDownloading
            });
        }
        if self.handle.is_queued()? {
            return Ok(if seed {
                TransferState::QueuedSeeding
            } else {
                TransferState::QueuedDownloading
            });
        }
        let rates = self.handle.rates()?;
        Ok(match self.handle.activity()? {
            Activity::Allocating | Activity::FetchingMetadata | Activity::Downloading => {
                if rates.download_bps > 0 {
                    TransferState::Downloading
                } else {
                    TransferState::StalledDownloading
                }
            }
            Activity::Finished | Activity::Seeding => {
                if rates.upload_bps > 0 {
                    TransferState::Seeding
                } else {
                    TransferState::StalledSeeding
                }
            }
            Activity::QueuedForChecking
            | Activity::CheckingResumeData
            | Activity::CheckingFiles => {
                if seed {
                    TransferState::CheckingSeeding
                } else {
                    TransferState::CheckingDownloading
                }
            }
            Activity::Unknown => TransferState::Invalid,
        })
    }

    /// Derive the value for one column.
    ///
    /// Failed handle queries yield [`CellValue::Empty`] for data columns;
    /// the status column reports the invalid classification instead.
    #[must_use]
    pub fn cell(&self, column: Column) -> CellValue {
        match column {
            Column::Name => CellValue::Text(self.name.clone()),
            Column::Priority => self
                .handle
                .queue_position()
                .map_or(CellValue::Empty, CellValue::Signed),
            Column::Size => self
                .handle
                .total_size()
                .map_or(CellValue::Empty, CellValue::Bytes),
            Column::Progress => self
                .handle
                .progress()
                .map_or(CellValue::Empty, CellValue::Fraction),
            Column::Status => CellValue::State(self.state()),
            Column::Seeds => self
                .handle
                .swarm()
                .map_or(CellValue::Empty, |swarm| {
                    CellValue::Sources(seed_sources(swarm))
                }),
            Column::Peers => self
                .handle
                .swarm()
                .map_or(CellValue::Empty, |swarm| {
                    CellValue::Sources(peer_sources(swarm))
                }),
            Column::DownSpeed => self
                .handle
                .rates()
                .map_or(CellValue::Empty, |rates| CellValue::Bytes(rates.download_bps)),
            Column::UpSpeed => self
                .handle
                .rates()
                .map_or(CellValue::Empty, |rates| CellValue::Bytes(rates.upload_bps)),
            Column::Ratio => self
                .session
                .share_ratio(self.hash)
                .map_or(CellValue::Empty, CellValue::Ratio),
            Column::Eta => self.eta().map_or(CellValue::Empty, CellValue::Eta),
            Column::Label => CellValue::Text(self.label.clone()),
            Column::AddedOn => self.added_at.map_or(CellValue::Empty, CellValue::Timestamp),
            Column::CompletedOn => self
                .completed_at
                .map_or(CellValue::Empty, CellValue::Timestamp),
            Column::Tracker => self
                .handle
                .current_tracker()
                .map_or(CellValue::Empty, CellValue::Text),
            Column::DownLimit => self
                .handle
                .download_limit()
                .map_or(CellValue::Empty, CellValue::Signed),
            Column::UpLimit => self
                .handle
                .upload_limit()
                .map_or(CellValue::Empty, CellValue::Signed),
        }
    }

    fn eta(&self) -> SessionResult<Eta> {
        if self.handle.is_seed()? || self.handle.is_paused()? || self.handle.is_queued()? {
            return Ok(Eta::Unbounded);
        }
        self.session.eta(self.hash)
    }

    /// Rename the torrent for display, persisting the override.
    pub fn set_name(&mut self, name: &str) {
        debug!(hash = %self.hash, name, "renaming torrent");
        self.name = name.to_owned();
        self.store.save_name(self.hash, name);
    }

    /// Relabel the torrent, persisting the change.
    ///
    /// Returns the old and new labels when the value actually changed;
    /// re-submitting the current label returns `None` and persists nothing.
    pub fn set_label(&mut self, label: &str) -> Option<LabelChange> {
        if self.label == label {
            return None;
        }
        debug!(hash = %self.hash, label, "relabeling torrent");
        let previous = std::mem::replace(&mut self.label, label.to_owned());
        self.store.save_label(self.hash, label);
        Some(LabelChange {
            previous,
            current: label.to_owned(),
        })
    }

    /// Re-read the completion timestamp after a finished notification.
    pub fn refresh_completed_at(&mut self) {
        self.completed_at = self.store.completed_at(self.hash);
    }
}

fn seed_sources(swarm: SwarmCounts) -> SourceCount {
    SourceCount::encode(u64::from(swarm.seeds), swarm.complete.map(u64::from))
}

fn peer_sources(swarm: SwarmCounts) -> SourceCount {
    let connected = u64::from(swarm.peers.saturating_sub(swarm.seeds));
    SourceCount::encode(connected, swarm.incomplete.map(u64::from))
}

#[cfg(test)]
mod tests {
    use skiff_session_core::{MemoryMetadataStore, TransferRates};
    use skiff_test_support::fixtures::info_hash;
    use skiff_test_support::mocks::{ScriptedSession, ScriptedTorrent};

    use super::*;

    fn collaborators() -> (Arc<ScriptedSession>, Arc<MemoryMetadataStore>) {
        (
            Arc::new(ScriptedSession::new()),
            Arc::new(MemoryMetadataStore::new()),
        )
    }

    fn row_for(
        session: &Arc<ScriptedSession>,
        store: &Arc<MemoryMetadataStore>,
        hash: InfoHash,
    ) -> TransferRow {
        let handle = session.find(hash).expect("scripted handle");
        TransferRow::new(
            handle,
            Arc::clone(session) as Arc<dyn TorrentSession>,
            Arc::clone(store) as Arc<dyn MetadataStore>,
        )
    }

    #[test]
    fn pause_wins_over_queue_and_rate() {
        let (session, store) = collaborators();
        session.insert(
            info_hash(1),
            ScriptedTorrent {
                paused: true,
                queued: true,
                ..ScriptedTorrent::downloading("busy")
            },
        );

        let row = row_for(&session, &store, info_hash(1));
        assert_eq!(row.state(), TransferState::PausedDownloading);

        session.configure(info_hash(1), |torrent| torrent.seed = true);
        assert_eq!(row.state(), TransferState::PausedSeeding);
    }

    #[test]
    fn queue_splits_by_completion_side() {
        let (session, store) = collaborators();
        session.insert(
            info_hash(2),
            ScriptedTorrent {
                queued: true,
                ..ScriptedTorrent::downloading("waiting")
            },
        );

        let row = row_for(&session, &store, info_hash(2));
        assert_eq!(row.state(), TransferState::QueuedDownloading);

        session.configure(info_hash(2), |torrent| {
            torrent.seed = true;
            torrent.activity = Activity::Seeding;
        });
        assert_eq!(row.state(), TransferState::QueuedSeeding);
    }

    #[test]
    fn queue_wins_over_checking_activity() {
        let (session, store) = collaborators();
        session.insert(
            info_hash(3),
            ScriptedTorrent {
                queued: true,
                activity: Activity::CheckingFiles,
                ..ScriptedTorrent::downloading("verify")
            },
        );

        let row = row_for(&session, &store, info_hash(3));
        assert_eq!(row.state(), TransferState::QueuedDownloading);

        session.configure(info_hash(3), |torrent| torrent.seed = true);
        assert_eq!(row.state(), TransferState::QueuedSeeding);

        session.configure(info_hash(3), |torrent| torrent.queued = false);
        assert_eq!(row.state(), TransferState::CheckingSeeding);

        session.configure(info_hash(3), |torrent| torrent.seed = false);
        assert_eq!(row.state(), TransferState::CheckingDownloading);
    }

    #[test]
    fn throughput_splits_active_from_stalled() {
        let (session, store) = collaborators();
        session.insert(info_hash(4), ScriptedTorrent::downloading("moving"));

        let row = row_for(&session, &store, info_hash(4));
        assert_eq!(row.state(), TransferState::Downloading);

        session.configure(info_hash(4), |torrent| {
            torrent.rates = TransferRates::default();
        });
        assert_eq!(row.state(), TransferState::StalledDownloading);

        session.configure(info_hash(4), |torrent| {
            torrent.seed = true;
            torrent.activity = Activity::Seeding;
            torrent.rates = TransferRates {
                download_bps: 0,
                upload_bps: 5_000,
            };
        });
        assert_eq!(row.state(), TransferState::Seeding);

        session.configure(info_hash(4), |torrent| {
            torrent.rates = TransferRates::default();
        });
        assert_eq!(row.state(), TransferState::StalledSeeding);
    }

    #[test]
    fn stale_handle_classifies_invalid_and_empties_cells() {
        let (session, store) = collaborators();
        session.insert(info_hash(5), ScriptedTorrent::downloading("vanishing"));
        let row = row_for(&session, &store, info_hash(5));

        session.invalidate(info_hash(5));

        assert_eq!(row.state(), TransferState::Invalid);
        assert_eq!(
            row.cell(Column::Status),
            CellValue::State(TransferState::Invalid)
        );
        assert_eq!(row.cell(Column::Size), CellValue::Empty);
        assert_eq!(row.cell(Column::Eta), CellValue::Empty);
        assert_eq!(TransferState::Invalid.icon(), StatusIcon::Error);
        assert_eq!(TransferState::Invalid.color(), StatusColor::Red);
    }

    #[test]
    fn unknown_activity_classifies_invalid() {
        let (session, store) = collaborators();
        session.insert(
            info_hash(6),
            ScriptedTorrent {
                activity: Activity::Unknown,
                ..ScriptedTorrent::downloading("odd")
            },
        );

        let row = row_for(&session, &store, info_hash(6));
        assert_eq!(row.state(), TransferState::Invalid);
    }

    #[test]
    fn decorations_cover_every_state() {
        let table = [
            (
                TransferState::Downloading,
                StatusIcon::Downloading,
                "downloading",
                StatusColor::Green,
            ),
            (
                TransferState::StalledDownloading,
                StatusIcon::StalledDownload,
                "stalled_dl",
                StatusColor::Grey,
            ),
            (
                TransferState::Seeding,
                StatusIcon::Uploading,
                "uploading",
                StatusColor::Orange,
            ),
            (
                TransferState::StalledSeeding,
                StatusIcon::StalledUpload,
                "stalled_up",
                StatusColor::Grey,
            ),
            (
                TransferState::PausedDownloading,
                StatusIcon::Paused,
                "paused",
                StatusColor::Red,
            ),
            (
                TransferState::PausedSeeding,
                StatusIcon::Paused,
                "paused",
                StatusColor::Red,
            ),
            (
                TransferState::QueuedDownloading,
                StatusIcon::Queued,
                "queued",
                StatusColor::Grey,
            ),
            (
                TransferState::QueuedSeeding,
                StatusIcon::Queued,
                "queued",
                StatusColor::Grey,
            ),
            (
                TransferState::CheckingDownloading,
                StatusIcon::Checking,
                "checking",
                StatusColor::Grey,
            ),
            (
                TransferState::CheckingSeeding,
                StatusIcon::Checking,
                "checking",
                StatusColor::Grey,
            ),
            (
                TransferState::Invalid,
                StatusIcon::Error,
                "error",
                StatusColor::Red,
            ),
        ];

        for (state, icon, asset, color) in table {
            assert_eq!(state.icon(), icon, "icon for {state:?}");
            assert_eq!(state.icon().name(), asset, "asset for {state:?}");
            assert_eq!(state.color(), color, "color for {state:?}");
        }
    }

    #[test]
    fn composite_counts_order_and_recover_connected() {
        let few_known = SourceCount::encode(2, Some(10));
        let few_unknown = SourceCount::encode(2, None);
        assert!(few_known > few_unknown);

        let crowded = SourceCount::encode(7, Some(3));
        assert_eq!(crowded, SourceCount(7_000_001));
        assert_eq!(crowded.connected(), 7);
        assert_eq!(few_unknown.connected(), 2);
    }

    #[test]
    fn extreme_counts_saturate_instead_of_overflowing() {
        assert_eq!(
            SourceCount::encode(u64::MAX, Some(u64::MAX)),
            SourceCount(u64::MAX)
        );
        assert_eq!(SourceCount::encode(u64::MAX, None), SourceCount(u64::MAX));
        assert!(SourceCount::encode(u64::MAX, None) > SourceCount::encode(7, Some(3)));
    }

    #[test]
    fn seed_and_peer_cells_use_the_composite_encoding() {
        let (session, store) = collaborators();
        session.insert(
            info_hash(7),
            ScriptedTorrent {
                swarm: SwarmCounts {
                    seeds: 4,
                    peers: 9,
                    complete: Some(40),
                    incomplete: None,
                },
                ..ScriptedTorrent::downloading("swarmed")
            },
        );

        let row = row_for(&session, &store, info_hash(7));
        assert_eq!(
            row.cell(Column::Seeds),
            CellValue::Sources(SourceCount(4_000_400))
        );
        assert_eq!(
            row.cell(Column::Peers),
            CellValue::Sources(SourceCount(5_000_001))
        );
    }

    #[test]
    fn label_edits_report_a_change_exactly_once() {
        let (session, store) = collaborators();
        session.insert(info_hash(8), ScriptedTorrent::downloading("labeled"));
        let mut row = row_for(&session, &store, info_hash(8));

        let change = row.set_label("music").expect("first edit changes");
        assert_eq!(change.previous, "");
        assert_eq!(change.current, "music");
        assert_eq!(store.label(info_hash(8)).as_deref(), Some("music"));

        assert!(row.set_label("music").is_none());
        assert_eq!(row.cell(Column::Label), CellValue::Text("music".to_owned()));
    }

    #[test]
    fn name_prefers_the_persisted_override() {
        let (session, store) = collaborators();
        session.insert(info_hash(9), ScriptedTorrent::downloading("engine-name"));

        let mut row = row_for(&session, &store, info_hash(9));
        assert_eq!(
            row.cell(Column::Name),
            CellValue::Text("engine-name".to_owned())
        );

        row.set_name("custom");
        let reloaded = row_for(&session, &store, info_hash(9));
        assert_eq!(reloaded.cell(Column::Name), CellValue::Text("custom".to_owned()));
    }

    #[test]
    fn eta_is_unbounded_for_seed_paused_and_queued() {
        let (session, store) = collaborators();
        session.insert(info_hash(10), ScriptedTorrent::downloading("timed"));
        let row = row_for(&session, &store, info_hash(10));
        assert_eq!(row.cell(Column::Eta), CellValue::Eta(Eta::Seconds(120)));

        session.configure(info_hash(10), |torrent| torrent.paused = true);
        assert_eq!(row.cell(Column::Eta), CellValue::Eta(Eta::Unbounded));

        session.configure(info_hash(10), |torrent| {
            torrent.paused = false;
            torrent.seed = true;
        });
        assert_eq!(row.cell(Column::Eta), CellValue::Eta(Eta::Unbounded));
    }

    #[test]
    fn added_at_is_stamped_on_first_sight() {
        let (session, store) = collaborators();
        session.insert(info_hash(11), ScriptedTorrent::downloading("fresh"));
        assert_eq!(store.added_at(info_hash(11)), None);

        let row = row_for(&session, &store, info_hash(11));
        let stamped = store.added_at(info_hash(11)).expect("stamped on load");
        assert_eq!(row.cell(Column::AddedOn), CellValue::Timestamp(stamped));
    }
}
