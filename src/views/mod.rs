//! View Components
//!
//! Renderer-independent state for each panel of the dashboard. A view owns
//! its data and error text, and performs its requests through the services.
//!
//! ## Architecture
//!
//! - **State**: request lifecycle, banners, and shared text helpers
//! - **Documents**: the document list and its selection
//! - **Upload**: upload flag and progress
//! - **Chat**: messages with optimistic sending
//! - **Summary**: generation, collapsing, and export
//! - **Conversations**: recent conversations with delete
//!
//! ## Errors
//!
//! Every async operation returns the underlying [`ClientError`] after
//! recording a message for display. An expired session never produces an
//! inline message; see [`inline_error`].
//!
//! [`ClientError`]: crate::client::ClientError

mod chat;
mod conversations;
mod documents;
mod state;
mod summary;
mod upload;

pub use chat::{ChatView, PendingSend, SendState};
pub use conversations::{
    display_filename, display_title, relative_time, ConversationListView, FILENAME_CHARS,
    TITLE_CHARS,
};
pub use documents::DocumentListView;
pub use state::{inline_error, truncate, Banner, RequestState};
pub use summary::{
    export_filename, export_text, generated_label, sections, SummaryPhase, SummarySection,
    SummaryView, PREVIEW_CHARS,
};
pub use upload::UploadView;
