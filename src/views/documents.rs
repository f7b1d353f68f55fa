//! Document list with a single selection

use crate::client::{ApiClient, ClientResult, Document};
use crate::services::documents;

use super::state::{inline_error, RequestState};

/// The user's documents and which one is selected
#[derive(Debug, Clone, Default)]
pub struct DocumentListView {
    documents: Vec<Document>,
    selected: Option<String>,
    state: RequestState<()>,
}

impl DocumentListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn find(&self, uuid: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.uuid == uuid)
    }

    /// Select a document by uuid; unknown ids clear the selection
    pub fn select(&mut self, uuid: Option<&str>) {
        self.selected = uuid
            .filter(|id| self.find(id).is_some())
            .map(str::to_string);
    }

    pub fn selected_uuid(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    /// Replace the list with `documents`
    ///
    /// A selection whose document disappeared is dropped.
    pub fn apply(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        if self.selected_document().is_none() {
            self.selected = None;
        }
        self.state = RequestState::Success(());
    }

    /// Reload the list; whichever response arrives last is applied
    pub async fn refresh(&mut self, client: &ApiClient) -> ClientResult<()> {
        self.state = RequestState::Loading;

        match documents::list(client).await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "Document list refreshed");
                self.apply(list);
                Ok(())
            }
            Err(e) => {
                self.state = match inline_error(&e, "Failed to load documents") {
                    Some(message) => RequestState::Error(message),
                    None => RequestState::Idle,
                };
                Err(e)
            }
        }
    }
}
