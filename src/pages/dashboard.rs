//! Dashboard: documents, uploads, one-shot questions, and the panel modes

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::client::{ApiClient, ClientError, ClientResult, Conversation, Document};
use crate::services::{documents, UploadFile};
use crate::views::{Banner, DocumentListView, RequestState, UploadView};

/// Which panel the dashboard is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Upload,
    Chat,
    Summary,
    Conversations,
}

/// Banner text for a failed dashboard action
///
/// `None` for an expired session, which the client already handled.
pub fn error_message(err: &ClientError) -> Option<String> {
    match err {
        ClientError::SessionExpired { .. } => None,
        ClientError::Api { .. } => Some(err.user_message("An unexpected API error occurred.")),
        _ => Some("An unexpected error occurred.".to_string()),
    }
}

/// Dashboard page state
#[derive(Debug, Default)]
pub struct Dashboard {
    view_mode: ViewMode,
    banner: Banner,
    documents: DocumentListView,
    upload: UploadView,
    query: RequestState<String>,
    selected_conversation: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch panels; banners are cleared, selections survive
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.banner.clear();
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn documents(&self) -> &DocumentListView {
        &self.documents
    }

    pub fn upload(&self) -> &UploadView {
        &self.upload
    }

    /// Latest answer to a one-shot question
    pub fn query_state(&self) -> &RequestState<String> {
        &self.query
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.documents.selected_document()
    }

    pub fn selected_conversation(&self) -> Option<&str> {
        self.selected_conversation.as_deref()
    }

    pub fn select_document(&mut self, uuid: Option<&str>) {
        self.documents.select(uuid);
    }

    /// Show an existing conversation in the chat panel
    pub fn open_conversation(&mut self, conversation_uuid: &str, document_uuid: Option<&str>) {
        if let Some(doc) = document_uuid {
            self.documents.select(Some(doc));
        }
        self.selected_conversation = Some(conversation_uuid.to_string());
        self.set_view_mode(ViewMode::Chat);
    }

    /// The chat panel started a new conversation
    pub fn on_conversation_started(&mut self, conversation: &Conversation) {
        self.selected_conversation = Some(conversation.uuid.clone());
    }

    /// Load the document list
    pub async fn refresh(&mut self, client: &ApiClient) -> ClientResult<()> {
        let result = self.documents.refresh(client).await;
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    /// Upload `file` under a fresh id, then reload the list
    pub async fn handle_upload(
        &mut self,
        client: &ApiClient,
        file: UploadFile,
    ) -> ClientResult<String> {
        if !self.upload.begin() {
            return Err(ClientError::InvalidInput(
                "An upload is already in progress".to_string(),
            ));
        }
        self.banner.clear();

        let uuid = Uuid::new_v4().to_string();
        let result = documents::upload(client, &uuid, file, self.upload.progress_sink()).await;
        self.upload.finish();

        match result {
            Ok(_) => {
                self.banner.set_success("Upload successful!");
                self.refresh_quietly(client).await;
                Ok(uuid)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Replace the content of an existing document
    pub async fn handle_replace(
        &mut self,
        client: &ApiClient,
        uuid: &str,
        file: UploadFile,
    ) -> ClientResult<()> {
        if !self.upload.begin() {
            return Err(ClientError::InvalidInput(
                "An upload is already in progress".to_string(),
            ));
        }
        self.banner.clear();

        let result = documents::replace(client, uuid, file, self.upload.progress_sink()).await;
        self.upload.finish();

        match result {
            Ok(_) => {
                self.banner.set_success("Update successful!");
                self.refresh_quietly(client).await;
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub async fn handle_delete(&mut self, client: &ApiClient, uuid: &str) -> ClientResult<()> {
        self.banner.clear();
        match documents::delete(client, uuid).await {
            Ok(()) => {
                self.banner.set_success("Deleted successfully.");
                self.refresh_quietly(client).await;
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Save a document's PDF; `dest` defaults to `<uuid>.pdf`
    pub async fn handle_download(
        &mut self,
        client: &ApiClient,
        uuid: &str,
        dest: Option<&Path>,
    ) -> ClientResult<PathBuf> {
        let result = documents::download(client, uuid, dest).await;
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    /// Ask a one-shot question about the selected document
    ///
    /// Does nothing without a selection or with a blank question.
    pub async fn handle_query(&mut self, client: &ApiClient, question: &str) -> ClientResult<()> {
        let Some(uuid) = self.documents.selected_uuid().map(str::to_string) else {
            return Ok(());
        };
        let question = question.trim();
        if question.is_empty() {
            return Ok(());
        }

        self.query = RequestState::Loading;
        self.banner.error = None;

        match documents::query(client, &uuid, question).await {
            Ok(answer) => {
                self.query = RequestState::Success(answer);
                Ok(())
            }
            Err(e) => {
                self.query = error_message(&e)
                    .map(RequestState::Error)
                    .unwrap_or_default();
                self.report(&e);
                Err(e)
            }
        }
    }

    fn report(&mut self, err: &ClientError) {
        if let Some(message) = error_message(err) {
            self.banner.set_error(message);
        }
    }

    async fn refresh_quietly(&mut self, client: &ApiClient) {
        if let Err(e) = self.refresh(client).await {
            tracing::warn!(error = %e, "Document list refresh failed");
        }
    }
}
