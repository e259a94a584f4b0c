//! Column surface of the transfer table.

use serde::{Deserialize, Serialize};

/// Number of columns the table exposes.
pub const COLUMN_COUNT: usize = 17;

/// Horizontal alignment hint for a column's cells and header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Lead-edge alignment.
    Left,
    /// Centered.
    Center,
    /// Trail-edge alignment.
    Right,
}

/// Identifies one column of the transfer table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Torrent display name.
    Name,
    /// Queue priority.
    Priority,
    /// Payload size.
    Size,
    /// Completion fraction.
    Progress,
    /// Display classification.
    Status,
    /// Seed availability.
    Seeds,
    /// Peer availability.
    Peers,
    /// Payload download rate.
    DownSpeed,
    /// Payload upload rate.
    UpSpeed,
    /// Share ratio.
    Ratio,
    /// Estimated completion time.
    Eta,
    /// User-assigned label.
    Label,
    /// When the torrent was added.
    AddedOn,
    /// When the torrent finished downloading.
    CompletedOn,
    /// Tracker currently in use.
    Tracker,
    /// Per-torrent download cap.
    DownLimit,
    /// Per-torrent upload cap.
    UpLimit,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Self; COLUMN_COUNT] = [
        Self::Name,
        Self::Priority,
        Self::Size,
        Self::Progress,
        Self::Status,
        Self::Seeds,
        Self::Peers,
        Self::DownSpeed,
        Self::UpSpeed,
        Self::Ratio,
        Self::Eta,
        Self::Label,
        Self::AddedOn,
        Self::CompletedOn,
        Self::Tracker,
        Self::DownLimit,
        Self::UpLimit,
    ];

    /// Column at a display index.
    #[must_use]
    pub fn at(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Header label shown to users.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Priority => "#",
            Self::Size => "Size",
            Self::Progress => "Done",
            Self::Status => "Status",
            Self::Seeds => "Seeds",
            Self::Peers => "Peers",
            Self::DownSpeed => "Down Speed",
            Self::UpSpeed => "Up Speed",
            Self::Ratio => "Ratio",
            Self::Eta => "ETA",
            Self::Label => "Label",
            Self::AddedOn => "Added On",
            Self::CompletedOn => "Completed On",
            Self::Tracker => "Tracker",
            Self::DownLimit => "Down Limit",
            Self::UpLimit => "Up Limit",
        }
    }

    /// Alignment hint for the column.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        match self {
            Self::Priority
            | Self::Size
            | Self::Seeds
            | Self::Peers
            | Self::DownSpeed
            | Self::UpSpeed
            | Self::Ratio
            | Self::DownLimit
            | Self::UpLimit => Alignment::Right,
            Self::Progress => Alignment::Center,
            Self::Name
            | Self::Status
            | Self::Eta
            | Self::Label
            | Self::AddedOn
            | Self::CompletedOn
            | Self::Tracker => Alignment::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_order_covers_every_column_once() {
        assert_eq!(Column::ALL.len(), COLUMN_COUNT);
        for (index, column) in Column::ALL.iter().enumerate() {
            assert_eq!(Column::at(index), Some(*column));
        }
        assert_eq!(Column::at(COLUMN_COUNT), None);
    }

    #[test]
    fn headers_match_the_table_surface() {
        assert_eq!(Column::Priority.header(), "#");
        assert_eq!(Column::Progress.header(), "Done");
        assert_eq!(Column::DownSpeed.header(), "Down Speed");
        assert_eq!(Column::AddedOn.header(), "Added On");
        assert_eq!(Column::CompletedOn.header(), "Completed On");
    }

    #[test]
    fn numeric_columns_align_right_and_eta_stays_left() {
        assert_eq!(Column::Priority.alignment(), Alignment::Right);
        assert_eq!(Column::Ratio.alignment(), Alignment::Right);
        assert_eq!(Column::UpLimit.alignment(), Alignment::Right);
        assert_eq!(Column::Progress.alignment(), Alignment::Center);
        assert_eq!(Column::Eta.alignment(), Alignment::Left);
        assert_eq!(Column::Tracker.alignment(), Alignment::Left);
    }
}
