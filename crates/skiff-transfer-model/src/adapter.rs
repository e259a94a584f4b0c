//! Command surface for driving the model from other tasks.
//!
//! A [`ModelController`] is the clonable handle other tasks use to reach
//! the driver loop. Every request crosses the bounded command channel and
//! is answered over a oneshot, so callers never touch the row collection
//! directly.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use skiff_events::InfoHash;
use tokio::sync::{mpsc, oneshot};

use crate::item::{CellValue, StatusColor, StatusIcon, TransferState};
use crate::list::StatusReport;

/// Depth of the command queue between controller and driver.
pub const COMMAND_BUFFER: usize = 128;

/// One row rendered to plain data for pull-style consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSnapshot {
    /// Torrent identity.
    pub hash: InfoHash,
    /// Classification at snapshot time.
    pub state: TransferState,
    /// Icon for the state.
    pub icon: StatusIcon,
    /// Foreground color for the state.
    pub color: StatusColor,
    /// Cell values in column order.
    pub cells: Vec<CellValue>,
}

/// Instructions the driver loop accepts at runtime.
#[derive(Debug)]
pub enum ModelCommand {
    /// Change the periodic refresh cadence.
    SetRefreshInterval(Duration),
    /// Write an editable cell.
    Edit {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
        /// Replacement text.
        value: String,
        /// Acknowledges whether the write landed.
        respond_to: oneshot::Sender<bool>,
    },
    /// Snapshot the full table.
    Rows {
        /// Receives the rendered rows.
        respond_to: oneshot::Sender<Vec<RowSnapshot>>,
    },
    /// Compute the aggregate status report.
    Report {
        /// Receives the report.
        respond_to: oneshot::Sender<StatusReport>,
    },
    /// Look up the hash at a row.
    HashAt {
        /// Row index.
        row: usize,
        /// Receives the hash, `None` out of range.
        respond_to: oneshot::Sender<Option<InfoHash>>,
    },
}

/// Clonable handle that feeds commands to a running driver.
#[derive(Debug, Clone)]
pub struct ModelController {
    commands: mpsc::Sender<ModelCommand>,
}

impl ModelController {
    /// Build a controller and the receiving half for the driver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<ModelCommand>) {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        (Self { commands }, receiver)
    }

    /// Change the periodic refresh cadence.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is no longer running.
    pub async fn set_refresh_interval(&self, interval: Duration) -> Result<()> {
        self.send(ModelCommand::SetRefreshInterval(interval)).await
    }

    /// Write an editable cell, reporting whether the write landed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is no longer running or dropped the
    /// response.
    pub async fn edit(&self, row: usize, column: usize, value: impl Into<String>) -> Result<bool> {
        let (respond_to, response) = oneshot::channel();
        self.send(ModelCommand::Edit {
            row,
            column,
            value: value.into(),
            respond_to,
        })
        .await?;
        response.await.context("transfer model dropped the edit response")
    }

    /// Snapshot the full table in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is no longer running or dropped the
    /// response.
    pub async fn rows(&self) -> Result<Vec<RowSnapshot>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ModelCommand::Rows { respond_to }).await?;
        response
            .await
            .context("transfer model dropped the snapshot response")
    }

    /// Compute the aggregate status report.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is no longer running or dropped the
    /// response.
    pub async fn report(&self) -> Result<StatusReport> {
        let (respond_to, response) = oneshot::channel();
        self.send(ModelCommand::Report { respond_to }).await?;
        response
            .await
            .context("transfer model dropped the report response")
    }

    /// Look up the hash at a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is no longer running or dropped the
    /// response.
    pub async fn hash_at(&self, row: usize) -> Result<Option<InfoHash>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ModelCommand::HashAt { row, respond_to }).await?;
        response
            .await
            .context("transfer model dropped the lookup response")
    }

    async fn send(&self, command: ModelCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow!("failed to enqueue transfer model command"))
    }
}
