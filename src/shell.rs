use tracing::{debug, error};

use crate::errors::ClientError;
use crate::models::{Document, DocumentId};

pub const LOAD_FAILED: &str = "Error loading PDFs. Please check if the backend server is running.";

/// Window width, in CSS pixels, below which the sidebar overlays the chat.
pub const NARROW_VIEWPORT_PX: f64 = 768.0;

/// Root state: the canonical document list, the selection, sidebar
/// visibility and the one alert that may be showing.
///
/// The selection is stored as an id and always refers to a document in
/// `documents`.
#[derive(Clone, Debug, PartialEq)]
pub struct Shell {
    documents: Vec<Document>,
    selected: Option<DocumentId>,
    loading: bool,
    sidebar_open: bool,
    alert: Option<String>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            selected: None,
            loading: false,
            sidebar_open: true,
            alert: None,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn selected_id(&self) -> Option<&DocumentId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Document> {
        let id = self.selected.as_ref()?;
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Result of the initial `GET /pdfs`. Auto-selects the first document
    /// when nothing is selected yet.
    pub fn documents_loaded(&mut self, result: Result<Vec<Document>, ClientError>) {
        self.loading = false;
        match result {
            Ok(documents) => {
                debug!(count = documents.len(), "Documents loaded");
                self.documents = documents;
                let still_present = self.selected.as_ref().is_some_and(|id| self.contains(id));
                if !still_present {
                    self.selected = self.documents.first().map(|d| d.id.clone());
                }
            }
            Err(e) => {
                error!("Failed to load documents: {e}");
                self.raise_alert(LOAD_FAILED);
            }
        }
    }

    /// Select a document from the list. Unknown ids are ignored. The sidebar
    /// collapses so the chat becomes visible on small screens.
    pub fn select(&mut self, id: &DocumentId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        self.sidebar_open = false;
        true
    }

    /// A new document came back from the upload endpoint.
    pub fn upload_succeeded(&mut self, document: Document, narrow_viewport: bool) {
        debug!(id = %document.id, "Document added");
        self.selected = Some(document.id.clone());
        self.documents.retain(|d| d.id != document.id);
        self.documents.push(document);
        if narrow_viewport {
            self.sidebar_open = false;
        }
    }

    /// The backend confirmed the delete. A deleted selection moves to the first
    /// remaining document, or to nothing.
    pub fn delete_succeeded(&mut self, id: &DocumentId) {
        self.documents.retain(|d| &d.id != id);
        if self.selected.as_ref() == Some(id) {
            self.selected = self.documents.first().map(|d| d.id.clone());
            debug!(deleted = %id, next = ?self.selected, "Selection moved after delete");
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    pub fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    fn contains(&self, id: &DocumentId) -> bool {
        self.documents.iter().any(|d| &d.id == id)
    }
}
