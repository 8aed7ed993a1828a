//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, ViewerSettings, SessionEvent)
//! - `controllers/` - Orchestration (DocumentStore, ViewState, SessionController)
//! - `services/` - Stateless operations (classify, search, diff, render, text_ops)
//! - `infrastructure/` - External integrations (file reading, storage, platform, error)

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::session::{PendingOpen, SessionController, StatusSummary, TabEntry};
pub use controllers::store::DocumentStore;
pub use controllers::view::ViewState;
pub use domain::{
    Document, DocumentContent, DocumentId, DocumentKind, FileMeta, Notice, NoticeLevel,
    SessionEvent, ThemeMode, ViewerSettings, Zoom,
};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::system_prefers_dark;
pub use infrastructure::reader::{FileReader, FsReader, MemoryReader, RawInput};
pub use infrastructure::storage::{FileStore, KeyValueStore, MemoryStore};
pub use services::diff::{DiffRow, DiffStats, DiffStatus};
pub use services::render::{RenderOutput, RenderRegistry, Renderer};
pub use services::search::{Direction, Match, SearchOptions};
