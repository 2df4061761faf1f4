//! Core traits that decouple swaytree from any specific window manager,
//! transport, or drawing backend.
//!
//! * [`WindowManager`] answers the read-only queries the feed needs (tree,
//!   workspaces, outputs).
//! * [`TreeSource`] delivers [`TreeSnapshot`](crate::tree::TreeSnapshot)s
//!   into a [`SnapshotMailbox`] from its own thread.
//! * [`Canvas`] is the drawing surface the renderer paints on.
//!
//! The render engine only depends on [`Canvas`]; the feed only depends on
//! [`WindowManager`].

use crate::layout::Rect;
use crate::mailbox::SnapshotMailbox;
use crate::tree::{NativeRect, Node};

/// A workspace as listed by the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceInfo {
    pub name: String,
    pub focused: bool,
    pub output: String,
}

/// A display output as listed by the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    pub name: String,
    pub active: bool,
    pub focused: bool,
    pub rect: NativeRect,
}

/// Read-only view of a tiling window manager.
///
/// An implementation might talk to sway over IPC, or it might be a fixed
/// tree used in tests.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// The full container tree, rooted at the `root` node.
    fn tree(&self) -> Result<Node, Self::Error>;

    /// Every workspace, in the window manager's order.
    fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, Self::Error>;

    /// Every output the window manager knows about.
    fn outputs(&self) -> Result<Vec<OutputInfo>, Self::Error>;

    /// Name of the focused workspace, or `None` during transitions when no
    /// workspace reports focus.
    fn focused_workspace(&self) -> Result<Option<String>, Self::Error> {
        Ok(self
            .workspaces()?
            .into_iter()
            .find(|ws| ws.focused)
            .map(|ws| ws.name))
    }

    /// The output that should size the host window: the focused one, else
    /// the first active one.
    fn primary_output(&self) -> Result<Option<OutputInfo>, Self::Error> {
        let outputs = self.outputs()?;
        let focused = outputs.iter().position(|o| o.focused);
        let active = outputs.iter().position(|o| o.active);
        Ok(focused.or(active).map(|i| outputs[i].clone()))
    }
}

//  Tree source

/// A source of tree snapshots.
///
/// # Contract
///
/// * [`run`](TreeSource::run) **blocks** until the source is exhausted or an
///   unrecoverable error occurs.
/// * Every new state is posted to `sink`; older unread snapshots may be
///   overwritten, only the newest state matters.
/// * Failures stay inside the source: it stops posting and returns the
///   error, it never panics into the renderer.
pub trait TreeSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and post every new snapshot into `sink`.
    fn run(&mut self, sink: SnapshotMailbox) -> Result<(), Self::Error>;
}

//  Canvas

/// An RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn grey(level: f64, a: f64) -> Self {
        Self::new(level, level, level, a)
    }

    /// The same colour with its alpha replaced.
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
}

/// A rectangular drawing surface.
///
/// Implementations are scoped to a single paint pass and must not be kept
/// past it.
pub trait Canvas {
    /// Surface width in pixels.
    fn width(&self) -> f64;

    /// Surface height in pixels.
    fn height(&self) -> f64;

    /// Replace every pixel with `color` (no blending).
    fn clear(&mut self, color: Rgba);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64);

    /// Draw `text` in bold sans with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Rgba);

    /// Run `draw` with output clipped to `clip`; the previous clip is
    /// restored afterwards.
    fn clipped(&mut self, clip: Rect, draw: &mut dyn FnMut(&mut dyn Canvas));
}
