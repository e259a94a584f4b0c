//! Async ownership loop binding the model to the event bus.
//!
//! One spawned task owns the [`TransferListModel`] outright. Bus events,
//! refresh ticks, and controller commands all land on this task through
//! `select!`, which serializes every mutation without locking the rows.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skiff_events::{Event, EventBus};
use skiff_session_core::{MetadataStore, TorrentSession};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::adapter::ModelCommand;
use crate::list::TransferListModel;
use crate::notify::ViewNotifier;

/// Refresh cadence configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOptions {
    /// Milliseconds between full-range refresh notices.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl RefreshOptions {
    /// Interval as a [`Duration`].
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

const fn default_refresh_interval_ms() -> u64 {
    2_000
}

/// Spawn the ownership loop for a transfer list model.
///
/// The task subscribes to the bus, populates the model from the session,
/// and then reacts to events, refresh ticks, and commands until both the
/// bus and the command channel close.
pub fn spawn(
    session: Arc<dyn TorrentSession>,
    store: Arc<dyn MetadataStore>,
    events: EventBus,
    options: RefreshOptions,
    mut commands: mpsc::Receiver<ModelCommand>,
    notifier: ViewNotifier,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = events.subscribe(None);
        let mut model = TransferListModel::new(session, store, notifier);
        model.populate();
        info!(rows = model.row_count(), "transfer model driver started");

        let mut period = options.refresh_interval();
        let mut refresh = make_interval(period);

        loop {
            tokio::select! {
                event = stream.next() => match event {
                    Some(Ok(envelope)) => apply_event(&mut model, envelope.event),
                    Some(Err(lag)) => {
                        warn!(error = %lag, "event stream lagged; forcing a full refresh");
                        model.refresh_all();
                    }
                    None => {
                        info!("event bus closed; stopping transfer model driver");
                        break;
                    }
                },
                _ = refresh.tick() => model.refresh_all(),
                command = commands.recv() => match command {
                    Some(ModelCommand::SetRefreshInterval(interval)) => {
                        if interval != period {
                            period = interval;
                            refresh = make_interval(period);
                            debug!(?period, "refresh interval reconfigured");
                        }
                    }
                    Some(ModelCommand::Edit { row, column, value, respond_to }) => {
                        let _ = respond_to.send(model.set_value(row, column, &value));
                    }
                    Some(ModelCommand::Rows { respond_to }) => {
                        let _ = respond_to.send(model.snapshot());
                    }
                    Some(ModelCommand::Report { respond_to }) => {
                        let _ = respond_to.send(model.status_report());
                    }
                    Some(ModelCommand::HashAt { row, respond_to }) => {
                        let _ = respond_to.send(model.hash_at(row));
                    }
                    None => {
                        info!("command channel closed; stopping transfer model driver");
                        break;
                    }
                },
            }
        }
    })
}

fn make_interval(period: Duration) -> Interval {
    let mut refresh = interval_at(Instant::now() + period, period);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    refresh
}

fn apply_event(model: &mut TransferListModel, event: Event) {
    match event {
        Event::TorrentAdded { hash } => model.add_by_hash(hash),
        Event::TorrentAboutToBeRemoved { hash } => model.announce_removal(hash),
        Event::TorrentRemoved { hash } => model.remove(hash),
        Event::TorrentFinished { hash } => model.record_completion(hash),
        Event::MetadataReceived { hash }
        | Event::TorrentResumed { hash }
        | Event::TorrentPaused { hash }
        | Event::CheckingFinished { hash } => model.notify_changed(hash),
    }
}
