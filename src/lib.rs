//! **swaytree** is a live diagram of the focused sway workspace.
//!
//! The container tree of the focused workspace is drawn as nested
//! rectangles: split containers share their area in proportion to their
//! children's real sizes, tabbed containers show a tab strip above the
//! active child, and stacked containers collapse inactive children into
//! header bands.  Each node carries a short label and the focused window
//! is highlighted.
//!
//! # Architecture
//!
//! The crate is organised around three core traits:
//!
//! * [`traits::WindowManager`] answers read-only queries (tree, workspaces,
//!   outputs) so the feed is not coupled to a specific compositor.
//! * [`traits::TreeSource`] delivers [`tree::TreeSnapshot`]s into a
//!   [`mailbox::SnapshotMailbox`] from its own thread.
//! * [`traits::Canvas`] is the drawing surface, so the engine in
//!   [`render`] and [`layout`] is not coupled to cairo.
//!
//! Concrete implementations live in [`sway`] (i3-ipc client and event
//! listener), [`visualizer`] (GTK4 window and cairo canvas) and
//! [`recording`] (an in-memory canvas).

pub mod config;
pub mod layout;
pub mod mailbox;
pub mod recording;
pub mod render;
pub mod sway;
pub mod traits;
pub mod tree;
pub mod visualizer;
