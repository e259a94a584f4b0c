//! Ordered row collection behind the table surface.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use skiff_events::InfoHash;
use skiff_session_core::{MetadataStore, SessionHandle, TorrentSession};
use tracing::{debug, info};

use crate::adapter::RowSnapshot;
use crate::columns::{COLUMN_COUNT, Column};
use crate::item::{CellValue, StatusColor, StatusIcon, TransferRow, TransferState};
use crate::notify::{ModelNotice, ViewNotifier};

/// Aggregate snapshot of the table for summary display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Torrents moving payload right now.
    pub active: u64,
    /// Torrents present but not transferring (stalled, queued, checking, paused).
    pub inactive: u64,
    /// Paused torrents.
    pub paused: u64,
    /// Torrents on the download side.
    pub downloading: u64,
    /// Torrents on the seeding side.
    pub seeding: u64,
}

/// Ordered collection of transfer rows.
///
/// Row position is not identity: removal shifts later rows up. Hashes stay
/// unique across the collection and lookups are linear scans.
pub struct TransferListModel {
    session: Arc<dyn TorrentSession>,
    store: Arc<dyn MetadataStore>,
    rows: Vec<TransferRow>,
    notifier: ViewNotifier,
}

impl TransferListModel {
    /// Build an empty model over the injected collaborators.
    #[must_use]
    pub fn new(
        session: Arc<dyn TorrentSession>,
        store: Arc<dyn MetadataStore>,
        notifier: ViewNotifier,
    ) -> Self {
        Self {
            session,
            store,
            rows: Vec::new(),
            notifier,
        }
    }

    /// Snapshot every torrent the session currently tracks.
    pub fn populate(&mut self) {
        for handle in self.session.torrents() {
            self.add_handle(handle);
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    /// Append a row for a handle unless its hash is already tracked.
    pub fn add_handle(&mut self, handle: Arc<dyn SessionHandle>) {
        let hash = handle.info_hash();
        if self.row_of(hash).is_some() {
            return;
        }
        let row = self.rows.len();
        self.rows.push(TransferRow::new(
            handle,
            Arc::clone(&self.session),
            Arc::clone(&self.store),
        ));
        info!(%hash, row, "torrent added to transfer list");
        self.notifier
            .notify(ModelNotice::RowsInserted { first: row, last: row });
    }

    /// Track a newly announced torrent if the session still knows it.
    pub fn add_by_hash(&mut self, hash: InfoHash) {
        if let Some(handle) = self.session.find(hash) {
            self.add_handle(handle);
        } else {
            debug!(%hash, "announced torrent vanished before it could be tracked");
        }
    }

    /// Remove the row for a hash, shifting later rows up.
    ///
    /// Works for every valid index, the first row included. Unknown hashes
    /// are ignored.
    pub fn remove(&mut self, hash: InfoHash) {
        let Some(row) = self.row_of(hash) else {
            return;
        };
        self.rows.remove(row);
        info!(%hash, row, "torrent removed from transfer list");
        self.notifier
            .notify(ModelNotice::RowsRemoved { first: row, last: row });
    }

    /// Relay that a row's torrent is about to go away while the row is
    /// still present and queryable.
    pub fn announce_removal(&self, hash: InfoHash) {
        if let Some(row) = self.row_of(hash) {
            self.notifier
                .notify(ModelNotice::RowAboutToBeRemoved { row, hash });
        }
    }

    /// Emit a content notice for the row tracking a hash.
    pub fn notify_changed(&self, hash: InfoHash) {
        if let Some(row) = self.row_of(hash) {
            self.notifier
                .notify(ModelNotice::RowsChanged { first: row, last: row });
        }
    }

    /// Emit a content notice covering every visible row.
    ///
    /// Skipped while the model is empty.
    pub fn refresh_all(&self) {
        if self.rows.is_empty() {
            return;
        }
        self.notifier.notify(ModelNotice::RowsChanged {
            first: 0,
            last: self.rows.len() - 1,
        });
    }

    /// Index of the row tracking a hash.
    #[must_use]
    pub fn row_of(&self, hash: InfoHash) -> Option<usize> {
        self.rows.iter().position(|row| row.hash() == hash)
    }

    /// Hash of the torrent at a row, `None` out of range.
    #[must_use]
    pub fn hash_at(&self, row: usize) -> Option<InfoHash> {
        self.rows.get(row).map(TransferRow::hash)
    }

    /// Value of one cell; out-of-range coordinates read as empty.
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> CellValue {
        let Some(column) = Column::at(column) else {
            return CellValue::Empty;
        };
        self.rows
            .get(row)
            .map_or(CellValue::Empty, |item| item.cell(column))
    }

    /// Icon decoration for a row's status, `None` out of range.
    #[must_use]
    pub fn decoration(&self, row: usize) -> Option<StatusIcon> {
        self.rows.get(row).map(|item| item.state().icon())
    }

    /// Foreground color for a row's status, `None` out of range.
    #[must_use]
    pub fn foreground(&self, row: usize) -> Option<StatusColor> {
        self.rows.get(row).map(|item| item.state().color())
    }

    /// Write an editable cell.
    ///
    /// Only the name and label columns accept writes; anything else, or bad
    /// coordinates, reports `false`. A successful write emits a row content
    /// notice, and a label change additionally emits a label notice.
    pub fn set_value(&mut self, row: usize, column: usize, value: &str) -> bool {
        let Some(column) = Column::at(column) else {
            return false;
        };
        let Some(item) = self.rows.get_mut(row) else {
            return false;
        };
        let hash = item.hash();
        match column {
            Column::Name => item.set_name(value),
            Column::Label => {
                if let Some(change) = item.set_label(value) {
                    self.notifier.notify(ModelNotice::LabelChanged {
                        hash,
                        previous: change.previous,
                        current: change.current,
                    });
                }
            }
            _ => return false,
        }
        self.notifier
            .notify(ModelNotice::RowsChanged { first: row, last: row });
        true
    }

    /// Stamp the completion time once and refresh the affected row.
    pub fn record_completion(&mut self, hash: InfoHash) {
        let Some(row) = self.row_of(hash) else {
            return;
        };
        if self.store.completed_at(hash).is_none() {
            self.store.save_completed_at(hash, Utc::now());
        }
        if let Some(item) = self.rows.get_mut(row) {
            item.refresh_completed_at();
        }
        self.notifier
            .notify(ModelNotice::RowsChanged { first: row, last: row });
    }

    /// Classify every row and accumulate the aggregate report.
    ///
    /// Paused torrents count once each toward paused, inactive, and their
    /// transfer side; invalid rows are not counted at all.
    #[must_use]
    pub fn status_report(&self) -> StatusReport {
        let mut report = StatusReport::default();
        for row in &self.rows {
            match row.state() {
                TransferState::Downloading => {
                    report.active += 1;
                    report.downloading += 1;
                }
                TransferState::StalledDownloading
                | TransferState::CheckingDownloading
                | TransferState::QueuedDownloading => {
                    report.inactive += 1;
                    report.downloading += 1;
                }
                TransferState::PausedDownloading => {
                    report.paused += 1;
                    report.inactive += 1;
                    report.downloading += 1;
                }
                TransferState::Seeding => {
                    report.active += 1;
                    report.seeding += 1;
                }
                TransferState::StalledSeeding
                | TransferState::CheckingSeeding
                | TransferState::QueuedSeeding => {
                    report.inactive += 1;
                    report.seeding += 1;
                }
                TransferState::PausedSeeding => {
                    report.paused += 1;
                    report.inactive += 1;
                    report.seeding += 1;
                }
                TransferState::Invalid => {}
            }
        }
        report
    }

    /// Render every row to plain data in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RowSnapshot> {
        self.rows
            .iter()
            .map(|row| {
                let state = row.state();
                RowSnapshot {
                    hash: row.hash(),
                    state,
                    icon: state.icon(),
                    color: state.color(),
                    cells: Column::ALL.iter().map(|column| row.cell(*column)).collect(),
                }
            })
            .collect()
    }
}
