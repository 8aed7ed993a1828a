use std::fmt;

use serde::{Deserialize, Serialize};

/// Session-unique document handle. Allocated from a monotonic counter and
/// never reused within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc-{}", self.0)
    }
}

/// Which renderer applies to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Image,
    Pdf,
    Word,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Text => "text",
            DocumentKind::Image => "image",
            DocumentKind::Pdf => "pdf",
            DocumentKind::Word => "word",
        }
    }
}

/// Payload captured at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    /// Decoded text (`Text` documents).
    Text(String),
    /// Raw bytes (`Pdf` and `Word` documents).
    Binary(Vec<u8>),
    /// `data:` reference (`Image` documents).
    Encoded(String),
}

impl DocumentContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DocumentContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Metadata the host knows about a file before its content is read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileMeta {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type_hint: String,
    /// Milliseconds since the Unix epoch, 0 when unknown.
    pub last_modified_ms: i64,
}

/// An opened file. Immutable after construction; there is no in-place editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    meta: FileMeta,
    kind: DocumentKind,
    content: DocumentContent,
    language: String,
}

impl Document {
    pub fn new(
        id: DocumentId,
        meta: FileMeta,
        kind: DocumentKind,
        content: DocumentContent,
        language: String,
    ) -> Self {
        Self {
            id,
            meta,
            kind,
            content,
            language,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.meta.size_bytes
    }

    pub fn mime_type_hint(&self) -> &str {
        &self.meta.mime_type_hint
    }

    pub fn last_modified_ms(&self) -> i64 {
        self.meta.last_modified_ms
    }

    pub fn meta(&self) -> &FileMeta {
        &self.meta
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    /// Highlighting token, `plaintext` for non-text documents.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Plain-text representation used by search and diff. Only text
    /// documents have one.
    pub fn plain_text(&self) -> Option<&str> {
        match self.kind {
            DocumentKind::Text => self.content.as_text(),
            DocumentKind::Image | DocumentKind::Pdf | DocumentKind::Word => None,
        }
    }
}
