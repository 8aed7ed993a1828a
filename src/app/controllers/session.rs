use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use super::store::DocumentStore;
use super::view::{self, ViewState};
use crate::app::domain::document::{Document, DocumentContent, DocumentId, DocumentKind};
use crate::app::domain::messages::{Notice, SessionEvent};
use crate::app::domain::settings::{ThemeMode, ViewerSettings, Zoom};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::reader::{FileReader, RawInput, decode_data_url};
use crate::app::infrastructure::storage::{KeyValueStore, THEME_KEY};
use crate::app::services::classify::{classify_kind, file_extension, language_for};
use crate::app::services::diff::{self, DiffRow};
use crate::app::services::render::{RenderContext, RenderOutput, RenderRegistry};
use crate::app::services::search::{Direction, SearchOptions, SearchState};
use crate::app::services::text_ops::{format_file_size, line_count};

/// An open request that has been classified but not read yet.
///
/// Reading may suspend in an event-driven host. Whatever happens to the
/// session meanwhile, [`SessionController::finish_open`] registers the result.
#[derive(Debug, Clone)]
pub struct PendingOpen {
    input: RawInput,
    kind: DocumentKind,
    language: &'static str,
}

impl PendingOpen {
    pub fn input(&self) -> &RawInput {
        &self.input
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Read the content through the capability matching the kind.
    pub fn read(&self, reader: &dyn FileReader) -> Result<DocumentContent> {
        match self.kind {
            DocumentKind::Text => reader.read_text(&self.input).map(DocumentContent::Text),
            DocumentKind::Image => reader.read_encoded(&self.input).map(DocumentContent::Encoded),
            DocumentKind::Pdf | DocumentKind::Word => {
                reader.read_binary(&self.input).map(DocumentContent::Binary)
            }
        }
    }
}

/// One entry in the tab strip and sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    pub id: DocumentId,
    pub name: String,
    pub kind: DocumentKind,
    pub active: bool,
}

/// Status bar contents for the active document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub file_type: String,
    pub size: String,
    /// Line count for non-empty text documents.
    pub lines: Option<usize>,
}

impl StatusSummary {
    fn empty() -> Self {
        Self {
            file_type: "No file".to_string(),
            size: "0 B".to_string(),
            lines: Some(0),
        }
    }

    pub fn lines_label(&self) -> String {
        match self.lines {
            Some(n) => format!("{n} lines"),
            None => "-".to_string(),
        }
    }
}

/// Owns one viewing session: the open documents, the view state and the
/// last search. It is the only place that mutates documents and view state
/// together, so after every operation the active id is either `None` or a
/// document in the store.
pub struct SessionController {
    documents: DocumentStore,
    view: ViewState,
    search: SearchState,
    storage: Box<dyn KeyValueStore>,
    next_id: u64,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl SessionController {
    /// Assumes a dark desktop when no theme has been stored.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_system_theme(storage, true)
    }

    /// Load preferences from `storage`. On first run the theme follows the
    /// desktop preference.
    pub fn with_system_theme(storage: Box<dyn KeyValueStore>, system_prefers_dark: bool) -> Self {
        let view = ViewState::load(storage.as_ref(), system_prefers_dark);
        Self {
            documents: DocumentStore::new(),
            view,
            search: SearchState::new(),
            storage,
            next_id: 1,
            subscribers: Vec::new(),
        }
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn notify(&mut self, notice: Notice) {
        self.emit(SessionEvent::Notice(notice));
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    fn active_is_valid(&self) -> bool {
        self.view
            .active()
            .is_none_or(|id| self.documents.contains(id))
    }

    fn set_active(&mut self, active: Option<DocumentId>) {
        if self.view.active() != active {
            self.view.set_active(active);
            self.emit(SessionEvent::ActiveChanged(active));
        }
    }

    fn clear_search(&mut self) {
        self.search.clear();
        self.emit(SessionEvent::SearchCleared);
    }

    // --- Accessors ---

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.view.active()
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.documents.get(self.view.active()?)
    }

    pub fn settings(&self) -> &ViewerSettings {
        self.view.settings()
    }

    // --- Open / close / activate ---

    /// Classify an input by name. Nothing in the session changes yet.
    pub fn prepare_open(&self, input: RawInput) -> PendingOpen {
        let kind = classify_kind(&input.meta.name);
        let language = match kind {
            DocumentKind::Text => language_for(&input.meta.name),
            DocumentKind::Image | DocumentKind::Pdf | DocumentKind::Word => "plaintext",
        };
        debug!(name = %input.meta.name, kind = kind.as_str(), language, "Classified input");
        PendingOpen { input, kind, language }
    }

    /// Register the outcome of a read. A failed read is reported and leaves
    /// the session untouched; a successful one is registered and activated.
    pub fn finish_open(
        &mut self,
        pending: PendingOpen,
        content: Result<DocumentContent>,
    ) -> Result<DocumentId> {
        let name = pending.input.meta.name.clone();
        let content = match content {
            Ok(content) => content,
            Err(e) => {
                warn!(name = %name, "Failed to open: {e}");
                self.notify(Notice::error(format!("Failed to open: {name}")));
                return Err(e);
            }
        };

        let id = self.next_document_id();
        let document = Document::new(
            id,
            pending.input.meta,
            pending.kind,
            content,
            pending.language.to_string(),
        );
        self.documents.add(document)?;
        info!(%id, name = %name, kind = pending.kind.as_str(), "Opened document");

        self.emit(SessionEvent::DocumentOpened(id));
        self.set_active(Some(id));
        self.clear_search();
        self.notify(Notice::success(format!("Opened: {name}")));
        debug_assert!(self.active_is_valid());
        Ok(id)
    }

    /// Classify, read and register in one step.
    pub fn open_document(
        &mut self,
        input: RawInput,
        reader: &dyn FileReader,
    ) -> Result<DocumentId> {
        let pending = self.prepare_open(input);
        let content = pending.read(reader);
        self.finish_open(pending, content)
    }

    /// Close a document. Unknown ids are ignored. Closing the active document
    /// falls back to the most recently opened one left, or the welcome state.
    pub fn close_document(&mut self, id: DocumentId) {
        if self.documents.remove(id).is_err() {
            debug!(%id, "Close ignored: not open");
            return;
        }
        info!(%id, "Closed document");
        self.emit(SessionEvent::DocumentClosed(id));

        if self.view.active() == Some(id) {
            let fallback = self.documents.last().map(|d| d.id());
            self.set_active(fallback);
        }
        self.clear_search();
        debug_assert!(self.active_is_valid());
    }

    pub fn close_all(&mut self) {
        let count = self.documents.len();
        self.documents.clear();
        info!(count, "Closed all documents");
        self.emit(SessionEvent::SessionCleared);
        self.set_active(None);
        self.clear_search();
    }

    /// Focus a document, or the welcome state with `None`.
    pub fn activate(&mut self, id: Option<DocumentId>) -> Result<()> {
        if let Some(id) = id
            && !self.documents.contains(id)
        {
            return Err(AppError::NotFound(id));
        }
        self.set_active(id);
        self.clear_search();
        Ok(())
    }

    /// Activate the tab after (or before) the active one, wrapping around.
    pub fn activate_adjacent(&mut self, forward: bool) -> Option<DocumentId> {
        let current = self.view.active()?;
        let target = self.documents.cycle_from(current, forward)?;
        self.set_active(Some(target));
        self.clear_search();
        Some(target)
    }

    // --- Search ---

    /// Search the active document's text. An invalid pattern is reported and
    /// the previous matches stay in place.
    pub fn search(&mut self, query: &str, options: SearchOptions) -> Result<usize> {
        let text = self
            .view
            .active()
            .and_then(|id| self.documents.get(id))
            .and_then(|d| d.plain_text());
        match self.search.run(text, query, options) {
            Ok(count) => {
                debug!(query, count, "Search finished");
                let current = self.search.current_index();
                self.emit(SessionEvent::SearchUpdated { matches: count, current });
                Ok(count)
            }
            Err(e) => {
                warn!(query, "Search failed: {e}");
                self.notify(Notice::error("Invalid regex pattern"));
                Err(e)
            }
        }
    }

    pub fn advance_search(&mut self, direction: Direction) -> Option<usize> {
        let current = self.search.advance(direction)?;
        let matches = self.search.matches().len();
        self.emit(SessionEvent::SearchUpdated {
            matches,
            current: Some(current),
        });
        Some(current)
    }

    // --- Diff ---

    /// Documents that can take part in a comparison.
    pub fn diff_candidates(&self) -> Vec<&Document> {
        self.documents
            .list()
            .iter()
            .filter(|d| d.kind() == DocumentKind::Text)
            .collect()
    }

    fn text_of(&self, id: DocumentId) -> Result<&str> {
        let doc = self.documents.get(id).ok_or(AppError::NotFound(id))?;
        doc.plain_text().ok_or_else(|| {
            AppError::UnsupportedInput(format!("{} is not a text document", doc.name()))
        })
    }

    /// Compare two open text documents. A missing or non-text side is
    /// reported as a warning.
    pub fn compare_documents(
        &mut self,
        left: DocumentId,
        right: DocumentId,
    ) -> Result<Vec<DiffRow>> {
        let rows = match (self.text_of(left), self.text_of(right)) {
            (Ok(a), Ok(b)) => Ok(diff::compare(a, b)),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        if let Err(e) = &rows {
            debug!(%left, %right, "Compare rejected: {e}");
            self.notify(Notice::warning("Please select two files to compare"));
        }
        rows
    }

    // --- Zoom ---

    pub fn set_zoom(&mut self, percent: u32) -> u32 {
        let zoom = Zoom::new(percent);
        if self.view.set_zoom(zoom) {
            self.emit(SessionEvent::ZoomChanged(zoom.percent()));
        }
        zoom.percent()
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.set_zoom(self.view.zoom().zoomed_in().percent())
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.set_zoom(self.view.zoom().zoomed_out().percent())
    }

    pub fn reset_zoom(&mut self) -> u32 {
        self.set_zoom(Zoom::DEFAULT)
    }

    // --- Settings ---

    /// Apply new settings for this session without persisting them.
    pub fn update_settings(&mut self, settings: ViewerSettings) {
        self.view.set_settings(settings);
        self.emit(SessionEvent::SettingsChanged);
    }

    fn edit_settings(&mut self, edit: impl FnOnce(&mut ViewerSettings)) {
        let mut settings = self.view.settings().clone();
        edit(&mut settings);
        self.update_settings(settings);
    }

    pub fn toggle_line_numbers(&mut self) -> bool {
        self.edit_settings(|s| s.show_line_numbers = !s.show_line_numbers);
        self.view.settings().show_line_numbers
    }

    pub fn toggle_word_wrap(&mut self) -> bool {
        self.edit_settings(|s| s.word_wrap = !s.word_wrap);
        self.view.settings().word_wrap
    }

    pub fn toggle_minimap(&mut self) -> bool {
        self.edit_settings(|s| s.show_minimap = !s.show_minimap);
        self.view.settings().show_minimap
    }

    /// Set and persist the theme on its own key.
    pub fn set_theme(&mut self, theme: ThemeMode) -> Result<()> {
        self.edit_settings(|s| s.theme = theme);
        self.storage.set(THEME_KEY, theme.as_str())
    }

    /// Flip between dark and light, starting from the effective theme.
    pub fn toggle_theme(&mut self, system_prefers_dark: bool) -> Result<ThemeMode> {
        let next = if self.view.settings().theme.is_dark(system_prefers_dark) {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn save_settings(&mut self) -> Result<()> {
        view::save_settings(self.storage.as_mut(), self.view.settings())?;
        info!("Saved settings");
        self.notify(Notice::success("Settings saved"));
        Ok(())
    }

    /// Restore the hard-coded defaults and forget the persisted ones.
    pub fn reset_settings(&mut self) -> Result<()> {
        self.update_settings(ViewerSettings::default());
        view::clear_settings(self.storage.as_mut())?;
        info!("Reset settings to defaults");
        self.notify(Notice::info("Settings reset to defaults"));
        Ok(())
    }

    // --- Presentation helpers ---

    pub fn tabs(&self) -> Vec<TabEntry> {
        let active = self.view.active();
        self.documents
            .list()
            .iter()
            .map(|d| TabEntry {
                id: d.id(),
                name: d.name().to_string(),
                kind: d.kind(),
                active: active == Some(d.id()),
            })
            .collect()
    }

    pub fn status(&self) -> StatusSummary {
        let Some(doc) = self.active_document() else {
            return StatusSummary::empty();
        };
        let file_type = file_extension(doc.name())
            .map(|ext| ext.to_uppercase())
            .unwrap_or_else(|| "TXT".to_string());
        StatusSummary {
            file_type,
            size: format_file_size(doc.size_bytes()),
            lines: doc.plain_text().filter(|t| !t.is_empty()).map(line_count),
        }
    }

    /// Render a document. A failure is reported and the document stays open.
    pub fn render(
        &mut self,
        id: DocumentId,
        registry: &RenderRegistry,
        system_prefers_dark: bool,
    ) -> Result<RenderOutput> {
        let doc = self.documents.get(id).ok_or(AppError::NotFound(id))?;
        let settings = self.view.settings();
        let ctx = RenderContext {
            settings,
            zoom: self.view.zoom(),
            dark: settings.theme.is_dark(system_prefers_dark),
        };
        let result = registry.render(doc, &ctx);
        if let Err(e) = &result {
            let name = doc.name().to_string();
            warn!(%id, "Render failed: {e}");
            self.notify(Notice::error(format!("Failed to render: {name}")));
        }
        result
    }

    pub fn render_active(
        &mut self,
        registry: &RenderRegistry,
        system_prefers_dark: bool,
    ) -> Option<Result<RenderOutput>> {
        let id = self.view.active()?;
        Some(self.render(id, registry, system_prefers_dark))
    }

    /// Original bytes of a document, for saving a copy.
    pub fn export(&mut self, id: DocumentId) -> Result<Vec<u8>> {
        let Some(doc) = self.documents.get(id) else {
            self.notify(Notice::warning("No file to download"));
            return Err(AppError::NotFound(id));
        };
        match doc.content() {
            DocumentContent::Text(text) => Ok(text.as_bytes().to_vec()),
            DocumentContent::Binary(bytes) => Ok(bytes.clone()),
            DocumentContent::Encoded(url) => decode_data_url(url).map(|(_, bytes)| bytes),
        }
    }
}
