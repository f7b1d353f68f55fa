//! Conversation list panel

use chrono::{DateTime, Utc};

use crate::client::{parse_timestamp, ApiClient, ClientResult, ConversationListItem};
use crate::services::chat;

use super::state::{inline_error, truncate};

/// Maximum title length before truncation
pub const TITLE_CHARS: usize = 50;

/// Maximum filename length before truncation
pub const FILENAME_CHARS: usize = 40;

/// Recent conversations with delete support
#[derive(Debug, Clone, Default)]
pub struct ConversationListView {
    conversations: Vec<ConversationListItem>,
    loading: bool,
    deleting: Option<String>,
    error: Option<String>,
}

impl ConversationListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &[ConversationListItem] {
        &self.conversations
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Conversation currently being deleted
    pub fn deleting(&self) -> Option<&str> {
        self.deleting.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty() && !self.loading && self.error.is_none()
    }

    pub fn find(&self, uuid: &str) -> Option<&ConversationListItem> {
        self.conversations.iter().find(|c| c.uuid == uuid)
    }

    /// Reload the list from the server
    pub async fn refresh(&mut self, client: &ApiClient) -> ClientResult<()> {
        self.loading = true;
        self.error = None;

        let result = chat::list_conversations(client).await;
        self.loading = false;

        match result {
            Ok(conversations) => {
                self.conversations = conversations;
                Ok(())
            }
            Err(e) => {
                self.error = inline_error(&e, "Failed to load conversations");
                Err(e)
            }
        }
    }

    /// Delete one conversation and drop exactly that row
    pub async fn delete(&mut self, client: &ApiClient, uuid: &str) -> ClientResult<()> {
        self.deleting = Some(uuid.to_string());
        let result = chat::delete_conversation(client, uuid).await;
        self.deleting = None;

        match result {
            Ok(()) => {
                self.remove(uuid);
                Ok(())
            }
            Err(e) => {
                self.error = inline_error(&e, "Failed to delete conversation");
                Err(e)
            }
        }
    }

    /// Drop a row locally
    pub fn remove(&mut self, uuid: &str) {
        self.conversations.retain(|c| c.uuid != uuid);
    }
}

/// Display title for a row
pub fn display_title(item: &ConversationListItem) -> String {
    truncate(&item.title, TITLE_CHARS)
}

/// Display filename for a row
pub fn display_filename(item: &ConversationListItem) -> String {
    truncate(&item.document_filename, FILENAME_CHARS)
}

/// Short relative age: "Just now", "5h ago", "3d ago", or the date
pub fn relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };

    let hours = (now - then).num_minutes() as f64 / 60.0;
    if hours < 1.0 {
        "Just now".to_string()
    } else if hours < 24.0 {
        format!("{}h ago", hours.floor() as i64)
    } else if hours < 24.0 * 7.0 {
        format!("{}d ago", (hours / 24.0).floor() as i64)
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}
