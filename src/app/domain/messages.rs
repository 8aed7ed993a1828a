use super::document::DocumentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A short user-facing notification (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// State-change notifications sent to subscribers of a session.
/// The presentation layer re-renders tabs, sidebar and status bar from these.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    // Documents
    DocumentOpened(DocumentId),
    DocumentClosed(DocumentId),
    SessionCleared,

    /// `None` is the welcome state.
    ActiveChanged(Option<DocumentId>),

    // Search
    SearchUpdated { matches: usize, current: Option<usize> },
    SearchCleared,

    // View
    ZoomChanged(u32),
    SettingsChanged,

    Notice(Notice),
}
