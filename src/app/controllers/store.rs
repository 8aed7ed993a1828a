use crate::app::domain::document::{Document, DocumentId};
use crate::app::infrastructure::error::{AppError, Result};

/// Open documents in insertion order (oldest first). The order drives tab
/// and sidebar layout and the fallback when the active document closes.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, document: Document) -> Result<()> {
        if self.contains(document.id()) {
            return Err(AppError::DuplicateId(document.id()));
        }
        self.documents.push(document);
        Ok(())
    }

    pub fn remove(&mut self, id: DocumentId) -> Result<Document> {
        let idx = self
            .documents
            .iter()
            .position(|d| d.id() == id)
            .ok_or(AppError::NotFound(id))?;
        Ok(self.documents.remove(idx))
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.iter().any(|d| d.id() == id)
    }

    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    /// Most recently opened document still in the store.
    pub fn last(&self) -> Option<&Document> {
        self.documents.last()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Neighbour of `id` in tab order, wrapping at both ends.
    pub fn cycle_from(&self, id: DocumentId, forward: bool) -> Option<DocumentId> {
        let idx = self.documents.iter().position(|d| d.id() == id)?;
        let len = self.documents.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Some(self.documents[next].id())
    }
}
