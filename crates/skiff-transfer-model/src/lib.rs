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

//! Live transfer table over a torrent session.
//!
//! The crate adapts engine state to a list/table view: each torrent becomes
//! a row, each row derives its cells and status decoration on demand, and
//! lifecycle events from the bus turn into structural and content notices
//! the view consumes. A single async driver task owns the row collection,
//! so every mutation is serialized without locks.
//!
//! Layout: columns.rs (column surface and headers), item.rs (per-row state
//! and cell derivation), list.rs (ordered row collection), notify.rs (view
//! notices), adapter.rs (command surface), driver.rs (ownership loop).

pub mod adapter;
pub mod columns;
pub mod driver;
pub mod item;
pub mod list;
pub mod notify;

pub use adapter::{COMMAND_BUFFER, ModelCommand, ModelController, RowSnapshot};
pub use columns::{Alignment, COLUMN_COUNT, Column};
pub use driver::RefreshOptions;
pub use item::{
    CellValue, LabelChange, SourceCount, StatusColor, StatusIcon, TransferRow, TransferState,
};
pub use list::{StatusReport, TransferListModel};
pub use notify::{ModelNotice, ViewNotifier};
