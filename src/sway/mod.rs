//! Sway (and i3) specific implementations.
//!
//! This module provides the concrete backends for the
//! [`WindowManager`](crate::traits::WindowManager) and
//! [`TreeSource`](crate::traits::TreeSource) traits, powered by the i3-ipc
//! protocol that sway speaks on `$SWAYSOCK`.
//!
//! Nothing outside this module should reference sway directly.

pub mod ipc;
pub mod listener;
