//! Wire Types
//!
//! Records exchanged with the backend. The client never owns these beyond
//! ephemeral view state.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Documents ============

/// An uploaded PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub uuid: String,
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentListResponse {
    #[serde(default)]
    pub pdfs: Vec<Document>,
}

/// Server acknowledgement of an upload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
}

/// Answer to a one-shot question about a document
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    pub llm_response: String,
}

/// Plain `{message}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ============ Chat ============

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl ChatMessage {
    /// A user message stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// A conversation about one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub uuid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub document_uuid: Option<String>,
    #[serde(default)]
    pub document_filename: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Conversation row as listed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationListItem {
    pub uuid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub document_uuid: String,
    #[serde(default)]
    pub document_filename: String,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// The list endpoint answers with either a bare array or a wrapper object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ConversationListResponse {
    Bare(Vec<ConversationListItem>),
    Wrapped { conversations: Vec<ConversationListItem> },
}

impl ConversationListResponse {
    pub fn into_items(self) -> Vec<ConversationListItem> {
        match self {
            ConversationListResponse::Wrapped { conversations } => conversations,
            ConversationListResponse::Bare(items) => items,
        }
    }
}

/// The continue endpoint answers with the assistant message, bare or wrapped
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReplyResponse {
    Bare(ChatMessage),
    Wrapped { message: ChatMessage },
}

impl ReplyResponse {
    pub fn into_message(self) -> ChatMessage {
        match self {
            ReplyResponse::Bare(message) | ReplyResponse::Wrapped { message } => message,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

// ============ Summaries ============

/// Generated summary of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub uuid: String,
    #[serde(default)]
    pub filename: String,
    pub summary: String,
    #[serde(default)]
    pub summary_generated_at: Option<String>,
}

// ============ Auth ============

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
}

/// Parse a server timestamp
///
/// Accepts RFC 3339 and naive ISO 8601 (interpreted as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
