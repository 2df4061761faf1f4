//! The window manager's container tree.
//!
//! A [`Node`] deserializes directly from sway's `GET_TREE` reply.  Each
//! snapshot is a whole-tree replacement: the renderer never mutates a tree,
//! it only walks it and drops it when the next one arrives.
//!
//! Ownership is strictly hierarchical (every node owns its `nodes` and
//! `floating_nodes`), so lookups are plain recursive searches and the
//! `focus` back-references are resolved by a linear scan over the
//! immediate children.

use serde::Deserialize;
use std::fmt;

/// Opaque node identifier as reported by sway.
pub type NodeId = i64;

/// The kind of a node in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NodeType {
    #[serde(rename = "root")]
    Root,
    #[serde(rename = "output")]
    Output,
    #[serde(rename = "workspace")]
    Workspace,
    #[serde(rename = "con")]
    Container,
    #[serde(rename = "floating_con")]
    FloatingContainer,
    #[serde(rename = "dockarea")]
    Dockarea,
    #[serde(other)]
    Unknown,
}

impl NodeType {
    /// The wire name, used as a breadcrumb fallback for unnamed nodes.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Output => "output",
            NodeType::Workspace => "workspace",
            NodeType::Container => "con",
            NodeType::FloatingContainer => "floating_con",
            NodeType::Dockarea => "dockarea",
            NodeType::Unknown => "unknown",
        }
    }
}

/// How a container arranges its children.
///
/// Values sway reports that do not partition anything (`output`,
/// `dockarea`, …) collapse into [`Layout::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Layout {
    #[serde(rename = "splith")]
    SplitHorizontal,
    #[serde(rename = "splitv")]
    SplitVertical,
    #[serde(rename = "tabbed")]
    Tabbed,
    #[serde(rename = "stacked")]
    Stacked,
    #[default]
    #[serde(other)]
    None,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::SplitHorizontal => write!(f, "splith"),
            Layout::SplitVertical => write!(f, "splitv"),
            Layout::Tabbed => write!(f, "tabbed"),
            Layout::Stacked => write!(f, "stacked"),
            Layout::None => write!(f, "none"),
        }
    }
}

/// Native geometry in the window manager's coordinate space.
///
/// Only the proportions matter to the renderer; absolute placement on the
/// diagram is computed from the canvas.  A zero width or height means the
/// geometry is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct NativeRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl NativeRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether both dimensions are known (non-zero).
    pub fn has_geometry(&self) -> bool {
        self.width != 0 && self.height != 0
    }
}

/// One element of the container tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub rect: NativeRect,
    #[serde(default)]
    pub focused: bool,
    /// Tiled children, in layout order.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Floating containers anchored under this node.
    #[serde(default)]
    pub floating_nodes: Vec<Node>,
    /// Child ids, most recently focused first.
    #[serde(default)]
    pub focus: Vec<NodeId>,
}

impl Node {
    /// Create a childless node of the given type.
    pub fn new(id: NodeId, node_type: NodeType) -> Self {
        Self {
            id,
            name: None,
            node_type,
            layout: Layout::None,
            rect: NativeRect::default(),
            focused: false,
            nodes: Vec::new(),
            floating_nodes: Vec::new(),
            focus: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_rect(mut self, rect: NativeRect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.nodes = children;
        self
    }

    pub fn with_floating(mut self, floating: Vec<Node>) -> Self {
        self.floating_nodes = floating;
        self
    }

    pub fn with_focus_order(mut self, focus: Vec<NodeId>) -> Self {
        self.focus = focus;
        self
    }

    /// A node is a leaf (a window) iff it has no tiled children.
    pub fn is_leaf(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The child shown in full by a tabbed or stacked container.
    ///
    /// This is the child named by `focus[0]` when that id is among the
    /// children, otherwise the first child.  Returns `None` only for leaves.
    pub fn active_child(&self) -> Option<&Node> {
        self.active_child_index().map(|i| &self.nodes[i])
    }

    /// Index form of [`active_child`](Self::active_child).
    pub fn active_child_index(&self) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let by_focus = self
            .focus
            .first()
            .and_then(|id| self.nodes.iter().position(|c| c.id == *id));
        Some(by_focus.unwrap_or(0))
    }

    /// Children visited by the search helpers, in document order.
    fn search_children(&self, include_floating: bool) -> impl Iterator<Item = &Node> {
        let floating: &[Node] = if include_floating {
            &self.floating_nodes
        } else {
            &[]
        };
        self.nodes.iter().chain(floating.iter())
    }

    /// Depth-first search for the first workspace named `name`.
    ///
    /// Visits the node itself, then its tiled children, then (when
    /// `include_floating` is set) its floating children.  A missing
    /// workspace is a normal outcome, e.g. during a workspace switch.
    pub fn find_workspace_by_name(&self, name: &str, include_floating: bool) -> Option<&Node> {
        if self.node_type == NodeType::Workspace && self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.search_children(include_floating)
            .find_map(|child| child.find_workspace_by_name(name, include_floating))
    }

    /// Chain of nodes from `self` down to the node with `target`,
    /// inclusive at both ends.
    pub fn path_to(&self, target: NodeId, include_floating: bool) -> Option<Vec<&Node>> {
        if self.id == target {
            return Some(vec![self]);
        }
        for child in self.search_children(include_floating) {
            if let Some(mut path) = child.path_to(target, include_floating) {
                path.insert(0, self);
                return Some(path);
            }
        }
        None
    }

    /// The node's name, treating an empty string as no name.
    ///
    /// Sway reports `""` for windows without a title.
    pub fn non_empty_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Name for breadcrumbs: the node's name, or its type when unnamed.
    pub fn display_name(&self) -> &str {
        self.non_empty_name().unwrap_or(self.node_type.as_str())
    }

    /// The label drawn in the node's header band.
    pub fn label(&self) -> String {
        match self.node_type {
            NodeType::Workspace => format!("WS: {}", self.name.as_deref().unwrap_or_default()),
            NodeType::Container if self.is_leaf() => {
                self.non_empty_name().unwrap_or("unnamed").to_string()
            }
            NodeType::Container => self.layout.to_string(),
            NodeType::FloatingContainer => "Float".into(),
            _ => String::new(),
        }
    }
}

/// Breadcrumb text for the path from `root` to `target`.
///
/// Falls back to `"Root"` when the target is not in the tree.
pub fn breadcrumb(root: &Node, target: NodeId, include_floating: bool) -> String {
    match root.path_to(target, include_floating) {
        Some(path) => path
            .iter()
            .map(|n| n.display_name())
            .collect::<Vec<_>>()
            .join(" > "),
        None => "Root".into(),
    }
}

/// A tree plus the name of the workspace to draw, as delivered by the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
    pub root: Node,
    pub focused_workspace: String,
}

impl TreeSnapshot {
    pub fn new(root: Node, focused_workspace: impl Into<String>) -> Self {
        Self {
            root,
            focused_workspace: focused_workspace.into(),
        }
    }
}

//  Tests
