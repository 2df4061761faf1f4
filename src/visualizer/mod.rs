//! Host window implementations.
//!
//! When the `visualizer-gtk` feature is enabled, [`gtk::run_main_loop`]
//! takes over the main thread, polls the snapshot mailbox from the GLib
//! main loop and paints through a cairo-backed
//! [`Canvas`](crate::traits::Canvas).

#[cfg(feature = "visualizer-gtk")]
pub mod gtk;
