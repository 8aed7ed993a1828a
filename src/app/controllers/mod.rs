//! Controllers layer - orchestration and coordination.
//!
//! This module contains the stateful parts of a session:
//! - Document store (open documents in tab order)
//! - View state (active document, zoom, settings)
//! - Session controller (keeps the two consistent)

pub mod session;
pub mod store;
pub mod view;
