#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Session lifecycle events for the skiff transfer list.
//!
//! The bus provides a typed event enum keyed by [`InfoHash`], sequential
//! identifiers, and support for replaying recent events when subscribers
//! reconnect. Internally it uses `tokio::broadcast` with a bounded buffer;
//! when the channel overflows, the oldest events are dropped.
//!
//! Layout: id.rs (torrent identifiers), payloads.rs (event types),
//! routing.rs (bus), error.rs (bus errors).

mod error;
/// Torrent identifier primitives shared across the workspace.
pub mod id;
/// Event payload types carried across the bus.
pub mod payloads;
/// Bus construction, publication and subscription.
pub mod routing;

pub use error::{EventBusError, EventBusResult};
pub use id::{InfoHash, ParseInfoHashError};
pub use payloads::{DEFAULT_REPLAY_CAPACITY, Event, EventEnvelope, EventId};
pub use routing::{EventBus, EventStream};
