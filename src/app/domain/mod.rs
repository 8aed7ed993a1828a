//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document, DocumentId and DocumentKind
//! - Viewer settings and zoom
//! - Session events for subscribers

pub mod document;
pub mod messages;
pub mod settings;

pub use document::{Document, DocumentContent, DocumentId, DocumentKind, FileMeta};
pub use messages::{Notice, NoticeLevel, SessionEvent};
pub use settings::{ThemeMode, ViewerSettings, Zoom};
