//! In-memory metadata persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skiff_events::InfoHash;

use crate::service::MetadataStore;

/// Everything persisted for one torrent outside the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentMetadata {
    /// Display name override.
    pub name: Option<String>,
    /// User-assigned label.
    pub label: Option<String>,
    /// When the torrent was added.
    pub added_at: Option<DateTime<Utc>>,
    /// When the torrent finished downloading.
    pub completed_at: Option<DateTime<Utc>>,
}

/// [`MetadataStore`] backed by a process-local map.
///
/// Suits tests and single-process deployments; durable backends implement
/// the same trait.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    entries: Mutex<HashMap<InfoHash, TorrentMetadata>>,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load an entry, replacing whatever was stored for the hash.
    pub fn seed(&self, hash: InfoHash, metadata: TorrentMetadata) {
        self.lock().insert(hash, metadata);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<InfoHash, TorrentMetadata>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, hash: InfoHash, apply: impl FnOnce(&mut TorrentMetadata)) {
        let mut entries = self.lock();
        apply(entries.entry(hash).or_default());
    }

    fn read<T>(
        &self,
        hash: InfoHash,
        pick: impl FnOnce(&TorrentMetadata) -> Option<T>,
    ) -> Option<T> {
        self.lock().get(&hash).and_then(pick)
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn name(&self, hash: InfoHash) -> Option<String> {
        self.read(hash, |entry| entry.name.clone())
    }

    fn save_name(&self, hash: InfoHash, name: &str) {
        self.update(hash, |entry| entry.name = Some(name.to_owned()));
    }

    fn label(&self, hash: InfoHash) -> Option<String> {
        self.read(hash, |entry| entry.label.clone())
    }

    fn save_label(&self, hash: InfoHash, label: &str) {
        self.update(hash, |entry| entry.label = Some(label.to_owned()));
    }

    fn added_at(&self, hash: InfoHash) -> Option<DateTime<Utc>> {
        self.read(hash, |entry| entry.added_at)
    }

    fn save_added_at(&self, hash: InfoHash, at: DateTime<Utc>) {
        self.update(hash, |entry| entry.added_at = Some(at));
    }

    fn completed_at(&self, hash: InfoHash) -> Option<DateTime<Utc>> {
        self.read(hash, |entry| entry.completed_at)
    }

    fn save_completed_at(&self, hash: InfoHash, at: DateTime<Utc>) {
        self.update(hash, |entry| entry.completed_at = Some(at));
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const fn hash(byte: u8) -> InfoHash {
        InfoHash::new([byte; 20])
    }

    #[test]
    fn unknown_hash_reads_as_absent() {
        let store = MemoryMetadataStore::new();
        assert_eq!(store.name(hash(1)), None);
        assert_eq!(store.label(hash(1)), None);
        assert_eq!(store.added_at(hash(1)), None);
        assert_eq!(store.completed_at(hash(1)), None);
    }

    #[test]
    fn saved_fields_read_back() {
        let store = MemoryMetadataStore::new();
        let added = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();

        store.save_name(hash(2), "alpine.iso");
        store.save_label(hash(2), "linux");
        store.save_added_at(hash(2), added);

        assert_eq!(store.name(hash(2)).as_deref(), Some("alpine.iso"));
        assert_eq!(store.label(hash(2)).as_deref(), Some("linux"));
        assert_eq!(store.added_at(hash(2)), Some(added));
        assert_eq!(store.completed_at(hash(2)), None);
    }

    #[test]
    fn updates_touch_only_their_field() {
        let store = MemoryMetadataStore::new();
        store.save_name(hash(3), "first");
        store.save_label(hash(3), "tagged");
        store.save_name(hash(3), "second");

        assert_eq!(store.name(hash(3)).as_deref(), Some("second"));
        assert_eq!(store.label(hash(3)).as_deref(), Some("tagged"));
    }

    #[test]
    fn seeding_replaces_the_whole_entry() {
        let store = MemoryMetadataStore::new();
        store.save_label(hash(4), "old");
        store.seed(
            hash(4),
            TorrentMetadata {
                name: Some("seeded".to_owned()),
                ..TorrentMetadata::default()
            },
        );

        assert_eq!(store.name(hash(4)).as_deref(), Some("seeded"));
        assert_eq!(store.label(hash(4)), None);
    }
}
