//! Single-slot hand-off between the feed thread and the paint loop.
//!
//! The feed posts every new snapshot; the paint loop takes whatever is
//! newest when it next runs.  A post overwrites any snapshot that has not
//! been taken yet, so there is no queue and no backpressure.

use crate::tree::TreeSnapshot;
use parking_lot::Mutex;
use std::sync::Arc;

/// Last-write-wins slot for [`TreeSnapshot`]s.
///
/// Cloning the mailbox yields another handle to the same slot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMailbox {
    slot: Arc<Mutex<Option<Arc<TreeSnapshot>>>>,
}

impl SnapshotMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending snapshot with `snapshot`.
    ///
    /// Returns `true` if an unread snapshot was dropped.
    pub fn post(&self, snapshot: TreeSnapshot) -> bool {
        self.slot.lock().replace(Arc::new(snapshot)).is_some()
    }

    /// Take the pending snapshot, leaving the slot empty.
    pub fn take(&self) -> Option<Arc<TreeSnapshot>> {
        self.slot.lock().take()
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeType};

    fn snapshot(ws: &str) -> TreeSnapshot {
        TreeSnapshot::new(Node::new(1, NodeType::Root), ws)
    }

    #[test]
    fn empty_mailbox_yields_nothing() {
        let mb = SnapshotMailbox::new();
        assert!(!mb.has_pending());
        assert!(mb.take().is_none());
    }

    #[test]
    fn latest_post_wins() {
        let mb = SnapshotMailbox::new();
        assert!(!mb.post(snapshot("1")));
        assert!(mb.post(snapshot("2")), "unread snapshot should be reported as dropped");
        assert!(mb.post(snapshot("3")));

        let taken = mb.take().expect("pending snapshot");
        assert_eq!(taken.focused_workspace, "3");
        assert!(mb.take().is_none(), "slot empties after take");
    }

    #[test]
    fn clones_share_the_slot() {
        let feed = SnapshotMailbox::new();
        let painter = feed.clone();

        let handle = std::thread::spawn(move || {
            feed.post(snapshot("from-thread"));
        });
        handle.join().unwrap();

        assert_eq!(painter.take().unwrap().focused_workspace, "from-thread");
    }
}
