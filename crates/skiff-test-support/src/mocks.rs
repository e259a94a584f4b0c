//! Scripted session fakes for exercising the transfer model.
//!
//! Tests describe torrents as plain data, mutate that data mid-test, and the
//! fakes surface the changes through the same traits production code uses.
//! Marking a torrent invalid makes every outstanding handle answer
//! [`SessionError::StaleHandle`], which is how removal races are simulated.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use skiff_events::InfoHash;
use skiff_session_core::{
    Activity, Eta, SessionError, SessionHandle, SessionResult, SwarmCounts, TorrentSession,
    TransferRates,
};

type SharedTorrent = Arc<Mutex<ScriptedTorrent>>;

/// Mutable facts one scripted torrent reports through its handles.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScriptedTorrent {
    /// Display name reported by the engine.
    pub name: String,
    /// Paused flag.
    pub paused: bool,
    /// Queued flag.
    pub queued: bool,
    /// Whether all payload data is present.
    pub seed: bool,
    /// Raw engine activity.
    pub activity: Activity,
    /// Instantaneous transfer rates.
    pub rates: TransferRates,
    /// Payload size in bytes.
    pub total_size: u64,
    /// Completion progress in `0.0..=1.0`.
    pub progress: f64,
    /// Swarm counts.
    pub swarm: SwarmCounts,
    /// Queue position, negative when unqueued.
    pub queue_position: i64,
    /// Tracker URL currently in use.
    pub tracker: String,
    /// Download limit in bytes per second.
    pub download_limit: i64,
    /// Upload limit in bytes per second.
    pub upload_limit: i64,
    /// Estimated completion time.
    pub eta: Eta,
    /// All-time share ratio.
    pub share_ratio: f64,
    /// When `false`, every handle query answers `StaleHandle`.
    pub valid: bool,
}

impl Default for ScriptedTorrent {
    fn default() -> Self {
        Self {
            name: "scripted".to_owned(),
            paused: false,
            queued: false,
            seed: false,
            activity: Activity::Downloading,
            rates: TransferRates::default(),
            total_size: 0,
            progress: 0.0,
            swarm: SwarmCounts::default(),
            queue_position: -1,
            tracker: String::new(),
            download_limit: -1,
            upload_limit: -1,
            eta: Eta::Unbounded,
            share_ratio: 0.0,
            valid: true,
        }
    }
}

impl ScriptedTorrent {
    /// Baseline actively-downloading torrent with the given name.
    #[must_use]
    pub fn downloading(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            rates: TransferRates {
                download_bps: 64_000,
                upload_bps: 8_000,
            },
            total_size: 1_048_576,
            progress: 0.25,
            eta: Eta::Seconds(120),
            ..Self::default()
        }
    }

    /// Baseline seeding torrent with the given name.
    #[must_use]
    pub fn seeding(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            seed: true,
            activity: Activity::Seeding,
            rates: TransferRates {
                download_bps: 0,
                upload_bps: 12_000,
            },
            total_size: 1_048_576,
            progress: 1.0,
            share_ratio: 1.5,
            ..Self::default()
        }
    }
}

/// [`TorrentSession`] fake whose contents tests script directly.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    torrents: Mutex<Vec<(InfoHash, SharedTorrent)>>,
}

impl ScriptedSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a torrent, replacing any previous script for the hash.
    pub fn insert(&self, hash: InfoHash, torrent: ScriptedTorrent) {
        if let Some(state) = self.shared(hash) {
            *lock_state(&state) = torrent;
            return;
        }
        self.lock().push((hash, Arc::new(Mutex::new(torrent))));
    }

    /// Drop a torrent from the session listing without touching live handles.
    pub fn remove(&self, hash: InfoHash) {
        self.lock().retain(|(existing, _)| *existing != hash);
    }

    /// Mark a torrent stale, so existing and future handles return errors.
    pub fn invalidate(&self, hash: InfoHash) {
        self.configure(hash, |torrent| torrent.valid = false);
    }

    /// Mutate a torrent's scripted facts in place.
    pub fn configure(&self, hash: InfoHash, apply: impl FnOnce(&mut ScriptedTorrent)) {
        if let Some(state) = self.shared(hash) {
            let mut guard = lock_state(&state);
            apply(&mut guard);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(InfoHash, SharedTorrent)>> {
        self.torrents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn shared(&self, hash: InfoHash) -> Option<SharedTorrent> {
        self.lock()
            .iter()
            .find(|(existing, _)| *existing == hash)
            .map(|(_, state)| Arc::clone(state))
    }

    fn scripted_fact<T>(
        &self,
        hash: InfoHash,
        pick: impl FnOnce(&ScriptedTorrent) -> T,
    ) -> SessionResult<T> {
        let state = self
            .shared(hash)
            .ok_or(SessionError::StaleHandle { hash })?;
        let guard = lock_state(&state);
        if guard.valid {
            Ok(pick(&guard))
        } else {
            Err(SessionError::StaleHandle { hash })
        }
    }
}

fn lock_state(state: &SharedTorrent) -> MutexGuard<'_, ScriptedTorrent> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct ScriptedHandle {
    hash: InfoHash,
    state: SharedTorrent,
}

impl ScriptedHandle {
    fn snapshot(&self) -> SessionResult<ScriptedTorrent> {
        let state = lock_state(&self.state);
        if state.valid {
            Ok(state.clone())
        } else {
            Err(SessionError::StaleHandle { hash: self.hash })
        }
    }
}

impl SessionHandle for ScriptedHandle {
    fn info_hash(&self) -> InfoHash {
        self.hash
    }

    fn name(&self) -> SessionResult<String> {
        Ok(self.snapshot()?.name)
    }

    fn is_paused(&self) -> SessionResult<bool> {
        Ok(self.snapshot()?.paused)
    }

    fn is_queued(&self) -> SessionResult<bool> {
        Ok(self.snapshot()?.queued)
    }

    fn is_seed(&self) -> SessionResult<bool> {
        Ok(self.snapshot()?.seed)
    }

    fn activity(&self) -> SessionResult<Activity> {
        Ok(self.snapshot()?.activity)
    }

    fn rates(&self) -> SessionResult<TransferRates> {
        Ok(self.snapshot()?.rates)
    }

    fn total_size(&self) -> SessionResult<u64> {
        Ok(self.snapshot()?.total_size)
    }

    fn progress(&self) -> SessionResult<f64> {
        Ok(self.snapshot()?.progress)
    }

    fn swarm(&self) -> SessionResult<SwarmCounts> {
        Ok(self.snapshot()?.swarm)
    }

    fn queue_position(&self) -> SessionResult<i64> {
        Ok(self.snapshot()?.queue_position)
    }

    fn current_tracker(&self) -> SessionResult<String> {
        Ok(self.snapshot()?.tracker)
    }

    fn download_limit(&self) -> SessionResult<i64> {
        Ok(self.snapshot()?.download_limit)
    }

    fn upload_limit(&self) -> SessionResult<i64> {
        Ok(self.snapshot()?.upload_limit)
    }
}

impl TorrentSession for ScriptedSession {
    fn torrents(&self) -> Vec<Arc<dyn SessionHandle>> {
        self.lock()
            .iter()
            .map(|(hash, state)| {
                Arc::new(ScriptedHandle {
                    hash: *hash,
                    state: Arc::clone(state),
                }) as Arc<dyn SessionHandle>
            })
            .collect()
    }

    fn find(&self, hash: InfoHash) -> Option<Arc<dyn SessionHandle>> {
        self.shared(hash)
            .map(|state| Arc::new(ScriptedHandle { hash, state }) as Arc<dyn SessionHandle>)
    }

    fn eta(&self, hash: InfoHash) -> SessionResult<Eta> {
        self.scripted_fact(hash, |torrent| torrent.eta)
    }

    fn share_ratio(&self, hash: InfoHash) -> SessionResult<f64> {
        self.scripted_fact(hash, |torrent| torrent.share_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn hash(byte: u8) -> InfoHash {
        InfoHash::new([byte; 20])
    }

    #[test]
    fn handles_report_scripted_facts() {
        let session = ScriptedSession::new();
        session.insert(hash(1), ScriptedTorrent::downloading("fixture"));

        let handle = session.find(hash(1)).expect("handle");
        assert_eq!(handle.name().expect("name"), "fixture");
        assert_eq!(handle.activity().expect("activity"), Activity::Downloading);
        assert_eq!(session.eta(hash(1)), Ok(Eta::Seconds(120)));
    }

    #[test]
    fn invalidated_torrents_answer_stale_handle() {
        let session = ScriptedSession::new();
        session.insert(hash(2), ScriptedTorrent::seeding("stale"));
        let handle = session.find(hash(2)).expect("handle");

        session.invalidate(hash(2));

        assert_eq!(handle.info_hash(), hash(2));
        assert_eq!(
            handle.name(),
            Err(SessionError::StaleHandle { hash: hash(2) })
        );
        assert_eq!(
            session.eta(hash(2)),
            Err(SessionError::StaleHandle { hash: hash(2) })
        );
    }

    #[test]
    fn configure_updates_existing_handles() {
        let session = ScriptedSession::new();
        session.insert(hash(3), ScriptedTorrent::downloading("mutable"));
        let handle = session.find(hash(3)).expect("handle");

        session.configure(hash(3), |torrent| torrent.queue_position = 7);

        assert_eq!(handle.queue_position(), Ok(7));
    }

    #[test]
    fn removal_drops_the_torrent_from_listing() {
        let session = ScriptedSession::new();
        session.insert(hash(4), ScriptedTorrent::downloading("first"));
        session.insert(hash(5), ScriptedTorrent::downloading("second"));

        session.remove(hash(4));

        let listed: Vec<InfoHash> = session
            .torrents()
            .iter()
            .map(|handle| handle.info_hash())
            .collect();
        assert_eq!(listed, vec![hash(5)]);
        assert!(session.find(hash(4)).is_none());
    }
}
