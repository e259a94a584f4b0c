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

//! Engine-agnostic session interfaces and status DTOs.
//!
//! The transfer list never talks to a torrent engine directly: it receives
//! a [`TorrentSession`] and a [`MetadataStore`] at construction and queries
//! per-torrent state through [`SessionHandle`]. Handles go stale whenever
//! the engine removes a torrent from another thread, so every handle query
//! is fallible and callers map failures to safe defaults.
//!
//! Layout: model/ (status DTOs), service/ (collaborator traits), store.rs
//! (in-memory metadata persistence), error.rs (error types).

mod error;
/// Status DTOs reported by the session.
pub mod model;
/// Collaborator traits the transfer list depends on.
pub mod service;
mod store;

pub use error::{SessionError, SessionResult};
pub use model::{Activity, Eta, SwarmCounts, TransferRates};
pub use service::{MetadataStore, SessionHandle, TorrentSession};
pub use store::{MemoryMetadataStore, TorrentMetadata};
