//! Sway-backed [`TreeSource`] implementation.
//!
//! Subscribes to the events that can change the shape of the focused
//! workspace and re-reads the whole tree after each one.  Sway does not send
//! tree diffs, so every refresh is a full `GET_TREE` + `GET_WORKSPACES`.

use super::ipc::{EventKind, SwayIpc, SwayIpcError};
use crate::mailbox::SnapshotMailbox;
use crate::traits::{TreeSource, WindowManager};
use crate::tree::TreeSnapshot;
use log::{debug, error, info, warn};

/// Events that trigger a refresh.
pub const SUBSCRIBED_EVENTS: &[&str] = &["window", "workspace", "binding"];

/// Read the current tree and focused workspace from `wm`.
///
/// Returns `Ok(None)` while no workspace reports focus (e.g. mid-switch).
pub fn snapshot<W: WindowManager>(wm: &W) -> Result<Option<TreeSnapshot>, W::Error> {
    let Some(focused) = wm.focused_workspace()? else {
        return Ok(None);
    };
    let root = wm.tree()?;
    Ok(Some(TreeSnapshot::new(root, focused)))
}

/// Post a fresh snapshot, logging instead of failing.
fn refresh<W: WindowManager>(wm: &W, sink: &SnapshotMailbox) {
    match snapshot(wm) {
        Ok(Some(snap)) => {
            debug!("snapshot for workspace {:?}", snap.focused_workspace);
            if sink.post(snap) {
                debug!("replaced an unread snapshot");
            }
        }
        Ok(None) => debug!("no focused workspace, skipping refresh"),
        Err(e) => warn!("refresh failed: {}", e),
    }
}

/// A [`TreeSource`] that follows sway's event stream.
pub struct SwayListener {
    ipc: SwayIpc,
}

impl SwayListener {
    pub fn new(ipc: SwayIpc) -> Self {
        Self { ipc }
    }
}

impl TreeSource for SwayListener {
    type Error = SwayIpcError;

    /// Subscribe, post the current state, then refresh on every event.
    ///
    /// Returns `Ok(())` when sway shuts down or closes the connection.
    fn run(&mut self, sink: SnapshotMailbox) -> Result<(), Self::Error> {
        let mut events = self.ipc.subscribe(SUBSCRIBED_EVENTS)?;
        info!("listening on {}", self.ipc.socket().display());

        refresh(&self.ipc, &sink);

        loop {
            match events.next_event() {
                Ok(event) if event.kind == EventKind::Shutdown => {
                    info!("sway is shutting down");
                    return Ok(());
                }
                Ok(event) => {
                    debug!("event: {:?}", event.kind);
                    refresh(&self.ipc, &sink);
                }
                Err(e) if e.is_disconnect() => {
                    info!("sway closed the event connection");
                    return Ok(());
                }
                Err(e) => {
                    error!("event stream broken: {}", e);
                    return Err(e);
                }
            }
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sway::ipc::tests::{spawn_fake_sway, tmp_socket_path};
    use crate::traits::{OutputInfo, WorkspaceInfo};
    use crate::tree::{Node, NodeType};
    use std::cell::Cell;

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    struct MockWm {
        focused: Option<&'static str>,
        fail_tree: bool,
        tree_calls: Cell<u32>,
    }

    impl MockWm {
        fn new(focused: Option<&'static str>) -> Self {
            Self {
                focused,
                fail_tree: false,
                tree_calls: Cell::new(0),
            }
        }
    }

    impl WindowManager for MockWm {
        type Error = MockError;

        fn tree(&self) -> Result<Node, MockError> {
            self.tree_calls.set(self.tree_calls.get() + 1);
            if self.fail_tree {
                return Err(MockError);
            }
            Ok(Node::new(1, NodeType::Root))
        }

        fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, MockError> {
            Ok(self
                .focused
                .map(|name| WorkspaceInfo {
                    name: name.into(),
                    focused: true,
                    output: "eDP-1".into(),
                })
                .into_iter()
                .collect())
        }

        fn outputs(&self) -> Result<Vec<OutputInfo>, MockError> {
            Ok(vec![])
        }
    }

    #[test]
    fn snapshot_pairs_tree_with_focused_workspace() {
        let wm = MockWm::new(Some("web"));
        let snap = snapshot(&wm).unwrap().unwrap();
        assert_eq!(snap.focused_workspace, "web");
        assert_eq!(snap.root.node_type, NodeType::Root);
    }

    #[test]
    fn snapshot_skips_tree_without_focus() {
        let wm = MockWm::new(None);
        assert!(snapshot(&wm).unwrap().is_none());
        assert_eq!(wm.tree_calls.get(), 0, "tree is not fetched without a focused workspace");
    }

    #[test]
    fn failed_refresh_posts_nothing() {
        let wm = MockWm {
            fail_tree: true,
            ..MockWm::new(Some("1"))
        };
        let sink = SnapshotMailbox::new();
        refresh(&wm, &sink);
        assert!(!sink.has_pending());
    }

    #[test]
    fn listener_posts_snapshots_until_disconnect() {
        let path = tmp_socket_path();
        spawn_fake_sway(&path, vec![3, 5]);

        let sink = SnapshotMailbox::new();
        let mut listener = SwayListener::new(SwayIpc::with_socket(&path));
        listener.run(sink.clone()).expect("clean exit on disconnect");

        let snap = sink.take().expect("snapshot posted");
        assert_eq!(snap.focused_workspace, "1");
        assert!(snap.root.find_workspace_by_name("1", false).is_some());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn listener_stops_on_shutdown_event() {
        let path = tmp_socket_path();
        spawn_fake_sway(&path, vec![6, 3]);

        let sink = SnapshotMailbox::new();
        let mut listener = SwayListener::new(SwayIpc::with_socket(&path));
        assert!(listener.run(sink.clone()).is_ok());
        assert!(sink.has_pending(), "initial snapshot is posted before events");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn listener_without_sway_fails() {
        let mut listener = SwayListener::new(SwayIpc::with_socket(tmp_socket_path()));
        assert!(matches!(
            listener.run(SnapshotMailbox::new()),
            Err(SwayIpcError::Io(_))
        ));
    }
}
