//! View notification channel.
//!
//! The model pushes notices through an unbounded sender so mutation paths
//! never block on a slow or absent view. Row indexes inside a notice are
//! valid at emission time only; views must apply notices in order.

use skiff_events::InfoHash;
use tokio::sync::mpsc;
use tracing::debug;

/// Structural or content change the view must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelNotice {
    /// Rows `first..=last` were inserted.
    RowsInserted {
        /// First affected row.
        first: usize,
        /// Last affected row.
        last: usize,
    },
    /// Rows `first..=last` were removed.
    RowsRemoved {
        /// First affected row.
        first: usize,
        /// Last affected row.
        last: usize,
    },
    /// Cell content changed across rows `first..=last`.
    RowsChanged {
        /// First affected row.
        first: usize,
        /// Last affected row.
        last: usize,
    },
    /// The row is still present but its torrent is about to go away.
    RowAboutToBeRemoved {
        /// Row index at emission time.
        row: usize,
        /// Torrent being removed.
        hash: InfoHash,
    },
    /// A label edit changed a torrent's label.
    LabelChanged {
        /// Torrent whose label changed.
        hash: InfoHash,
        /// Label before the edit.
        previous: String,
        /// Label after the edit.
        current: String,
    },
}

/// Sends model notices to the view layer.
///
/// Losing the receiver is not an error: the model keeps running and dropped
/// notices are logged at debug level.
#[derive(Debug, Clone)]
pub struct ViewNotifier {
    sender: mpsc::UnboundedSender<ModelNotice>,
}

impl ViewNotifier {
    /// Build a notifier and the receiving half for the view.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ModelNotice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Deliver a notice, logging instead of failing when the view is gone.
    pub fn notify(&self, notice: ModelNotice) {
        if let Err(err) = self.sender.send(notice) {
            debug!(dropped = ?err.0, "view receiver closed; dropping notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_arrive_in_send_order() {
        let (notifier, mut notices) = ViewNotifier::channel();
        notifier.notify(ModelNotice::RowsInserted { first: 0, last: 0 });
        notifier.notify(ModelNotice::RowsChanged { first: 0, last: 0 });

        assert_eq!(
            notices.try_recv(),
            Ok(ModelNotice::RowsInserted { first: 0, last: 0 })
        );
        assert_eq!(
            notices.try_recv(),
            Ok(ModelNotice::RowsChanged { first: 0, last: 0 })
        );
        assert!(notices.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_does_not_fail_the_sender() {
        let (notifier, notices) = ViewNotifier::channel();
        drop(notices);
        notifier.notify(ModelNotice::RowsRemoved { first: 1, last: 1 });
    }
}
