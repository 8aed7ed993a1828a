//! Services layer - stateless operations used by the controllers.
//!
//! - File classification (kind, language, mime)
//! - Search and positional diff
//! - Rendering (syntax highlighting)
//! - Text utilities

pub mod classify;
pub mod diff;
pub mod render;
pub mod search;
pub mod text_ops;
