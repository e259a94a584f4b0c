//! Bus construction, publication and subscription.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::Sender;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use crate::error::{EventBusError, EventBusResult};
use crate::payloads::{DEFAULT_REPLAY_CAPACITY, Event, EventEnvelope, EventId};

/// Stream of envelopes handed to subscribers. Yields `Err` items when the
/// subscriber lagged behind the broadcast buffer.
pub type EventStream =
    Pin<Box<dyn Stream<Item = Result<EventEnvelope, BroadcastStreamRecvError>> + Send>>;

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    replay: Arc<Mutex<VecDeque<EventEnvelope>>>,
    replay_capacity: usize,
    next_id: Arc<Mutex<EventId>>,
}

impl EventBus {
    /// Construct a bus with a custom replay capacity.
    #[must_use]
    pub fn with_capacity(replay_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(replay_capacity);
        Self {
            sender,
            replay: Arc::new(Mutex::new(VecDeque::with_capacity(replay_capacity))),
            replay_capacity,
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Construct a bus with the default replay capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Subscribe to the bus. When `last_event_id` is supplied, envelopes
    /// recorded after that id are re-delivered from the replay ring before
    /// any live event.
    #[must_use]
    pub fn subscribe(&self, last_event_id: Option<EventId>) -> EventStream {
        let rx = self.sender.subscribe();
        let live = BroadcastStream::new(rx);
        match last_event_id {
            Some(last) => {
                let backlog = self.backlog_since(last);
                let newest = backlog.last().map_or(last, |env| env.id);
                let deduped = live.filter(move |item| match item {
                    Ok(env) => env.id > newest,
                    Err(_) => true,
                });
                Box::pin(tokio_stream::iter(backlog.into_iter().map(Ok)).chain(deduped))
            }
            None => Box::pin(live),
        }
    }

    /// Publish a new event, recording it in the replay ring and fanning it
    /// out to all subscribers. Returns the assigned event id.
    #[must_use]
    pub fn publish(&self, event: Event) -> EventId {
        self.record_and_send(event).0
    }

    /// Publish a new event, reporting whether any live subscriber received
    /// it. The replay ring records the event either way.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::SendFailed`] when no subscriber is
    /// currently attached to the bus.
    pub fn try_publish(&self, event: Event) -> EventBusResult<EventId> {
        let kind = event.kind();
        let (id, delivered) = self.record_and_send(event);
        if delivered {
            Ok(id)
        } else {
            Err(EventBusError::SendFailed {
                event_id: id,
                event_kind: kind,
            })
        }
    }

    /// Last event id observed in the replay buffer.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        self.lock_replay().back().map(|env| env.id)
    }

    /// Collect a backlog of events emitted after the specified id.
    #[must_use]
    pub fn backlog_since(&self, id: EventId) -> Vec<EventEnvelope> {
        let replay = self.lock_replay();
        replay.iter().filter(|env| env.id > id).cloned().collect()
    }

    fn record_and_send(&self, event: Event) -> (EventId, bool) {
        let mut next = self
            .next_id
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let id = *next;
        *next = next.saturating_add(1);
        drop(next);

        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };
        {
            let mut replay = self.lock_replay();
            if replay.len() == self.replay_capacity {
                let _ = replay.pop_front();
            }
            replay.push_back(envelope.clone());
        }
        let delivered = self.sender.send(envelope).is_ok();
        (id, delivered)
    }

    fn lock_replay(&self) -> MutexGuard<'_, VecDeque<EventEnvelope>> {
        self.replay
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
