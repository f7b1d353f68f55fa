//! Backend API Client
//!
//! The single configured HTTP client plus the records it exchanges.
//!
//! ## Failure policy
//!
//! The client is the only place that reacts to 401/403: the token is
//! cleared, subscribers are told, and the call fails with
//! [`ClientError::SessionExpired`]. Every other error is handed to the
//! caller untouched; nothing is retried.

mod dto;
mod error;
mod http;
mod progress;

pub use dto::{
    parse_timestamp, ChatMessage, Conversation, ConversationListItem, Document, DocumentSummary,
    MessageResponse, QueryResponse, Role, UploadReceipt,
};
pub(crate) use dto::{
    ChatRequest, ConversationListResponse, Credentials, DocumentListResponse, LoginResponse,
    ReplyResponse,
};
pub use error::{extract_detail, ClientError, ClientResult};
pub use http::{decode_json, ApiClient, ClientConfig, DEFAULT_BASE_URL};
pub use progress::UploadProgress;
