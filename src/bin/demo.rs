//! Demo without sway: a canned workspace whose focus walks through every
//! window, one step every 800 ms.  Exercises split, tabbed, stacked and
//! floating rendering with the same window as the real binary.
//!
//! Run with:
//!     cargo run --bin swaytree-demo -- [window|transparent]
//!
//! Press Escape (window mode) or Ctrl-C to quit.

use log::{error, info};
use std::time::Duration;
use swaytree::config::{Mode, ViewConfig};
use swaytree::mailbox::SnapshotMailbox;
use swaytree::tree::{Layout, NativeRect, Node, NodeId, NodeType, TreeSnapshot};

/// Milliseconds between each focus step.
const STEP_MS: u64 = 800;

const WORKSPACE: &str = "demo";

fn leaf(id: NodeId, name: &str, rect: NativeRect) -> Node {
    Node::new(id, NodeType::Container)
        .with_name(name)
        .with_rect(rect)
}

fn container(id: NodeId, layout: Layout, rect: NativeRect, children: Vec<Node>) -> Node {
    Node::new(id, NodeType::Container)
        .with_layout(layout)
        .with_rect(rect)
        .with_children(children)
}

fn canned_tree() -> Node {
    let half = NativeRect::new(0, 0, 960, 1080);
    let quarter = NativeRect::new(0, 0, 960, 540);

    let tabs = container(
        20,
        Layout::Tabbed,
        quarter,
        vec![
            leaf(21, "firefox", quarter),
            leaf(22, "docs", quarter),
            leaf(23, "music", quarter),
        ],
    );
    let stack = container(
        30,
        Layout::Stacked,
        quarter,
        vec![leaf(31, "mail", quarter), leaf(32, "chat", quarter)],
    );
    let right = container(40, Layout::SplitVertical, half, vec![tabs, stack]);

    let float = Node::new(50, NodeType::FloatingContainer)
        .with_rect(NativeRect::new(600, 300, 600, 400))
        .with_children(vec![leaf(51, "pavucontrol", NativeRect::new(600, 300, 600, 400))]);

    let workspace = Node::new(3, NodeType::Workspace)
        .with_name(WORKSPACE)
        .with_layout(Layout::SplitHorizontal)
        .with_rect(NativeRect::new(0, 0, 1920, 1080))
        .with_children(vec![leaf(10, "foot", half), right])
        .with_floating(vec![float]);

    let output = Node::new(2, NodeType::Output)
        .with_name("DEMO-1")
        .with_rect(NativeRect::new(0, 0, 1920, 1080))
        .with_children(vec![workspace]);

    Node::new(1, NodeType::Root)
        .with_name("root")
        .with_children(vec![output])
}

/// Focus `target`: set its flag, clear every other flag and move each
/// ancestor's branch to the front of its parent's focus order.
///
/// Returns whether `target` was found under `node`.
fn focus(node: &mut Node, target: NodeId) -> bool {
    node.focused = node.id == target;
    let mut found = node.focused;
    for child in node.nodes.iter_mut().chain(node.floating_nodes.iter_mut()) {
        if focus(child, target) {
            found = true;
            let id = child.id;
            node.focus.retain(|&f| f != id);
            node.focus.insert(0, id);
        }
    }
    found
}

fn leaf_ids(node: &Node, out: &mut Vec<NodeId>) {
    if node.is_leaf() && node.node_type == NodeType::Container {
        out.push(node.id);
    }
    for child in node.nodes.iter().chain(&node.floating_nodes) {
        leaf_ids(child, out);
    }
}

fn main() {
    env_logger::init();

    let mode = match std::env::args().nth(1).map(|a| a.parse::<Mode>()) {
        None => Mode::Window,
        Some(Ok(mode)) => mode,
        Some(Err(e)) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    let view = ViewConfig {
        mode,
        include_floating: true,
        width: "800".into(),
        height: "500".into(),
        ..ViewConfig::default()
    };

    let mailbox = SnapshotMailbox::new();
    {
        let mailbox = mailbox.clone();
        std::thread::spawn(move || {
            let mut tree = canned_tree();
            let mut order = Vec::new();
            leaf_ids(&tree, &mut order);
            info!("cycling focus through {} windows", order.len());

            for id in order.iter().cycle() {
                focus(&mut tree, *id);
                mailbox.post(TreeSnapshot::new(tree.clone(), WORKSPACE));
                std::thread::sleep(Duration::from_millis(STEP_MS));
            }
        });
    }

    if let Err(e) = swaytree::visualizer::gtk::run_main_loop(&view, mailbox, None) {
        error!("failed to start GTK: {}", e);
        std::process::exit(1);
    }
}
