//! Chat panel
//!
//! Sending is optimistic: the user's message shows up before the server
//! answers and is taken back if the request fails. A rolled-back message is
//! never re-sent automatically.

use crate::client::{ApiClient, ChatMessage, ClientError, ClientResult, Conversation};
use crate::services::chat;

use super::state::inline_error;

/// Progress of the most recent send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    /// A tentative user message is on screen, waiting for the server
    Pending,
    /// The server accepted the last message
    Committed,
    /// The last message failed and was removed
    RolledBack,
}

/// A message accepted for sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub message: String,
    index: usize,
}

/// State of the chat panel for one document
#[derive(Debug, Clone)]
pub struct ChatView {
    document_uuid: String,
    document_filename: String,
    conversation_uuid: Option<String>,
    conversation: Option<Conversation>,
    messages: Vec<ChatMessage>,
    send_state: SendState,
    error: Option<String>,
}

impl ChatView {
    /// Fresh chat about a document
    pub fn new(document_uuid: impl Into<String>, document_filename: impl Into<String>) -> Self {
        Self {
            document_uuid: document_uuid.into(),
            document_filename: document_filename.into(),
            conversation_uuid: None,
            conversation: None,
            messages: Vec::new(),
            send_state: SendState::Idle,
            error: None,
        }
    }

    /// Chat bound to an existing conversation; call [`ChatView::load`] next
    pub fn for_conversation(
        document_uuid: impl Into<String>,
        document_filename: impl Into<String>,
        conversation_uuid: impl Into<String>,
    ) -> Self {
        let mut view = Self::new(document_uuid, document_filename);
        view.conversation_uuid = Some(conversation_uuid.into());
        view
    }

    pub fn document_uuid(&self) -> &str {
        &self.document_uuid
    }

    pub fn document_filename(&self) -> &str {
        &self.document_filename
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    /// Conversation the next message continues, if any
    pub fn conversation_uuid(&self) -> Option<&str> {
        self.conversation
            .as_ref()
            .map(|c| c.uuid.as_str())
            .or(self.conversation_uuid.as_deref())
    }

    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    pub fn is_sending(&self) -> bool {
        self.send_state == SendState::Pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Header title
    pub fn title(&self) -> &str {
        match &self.conversation {
            Some(c) if !c.title.is_empty() => &c.title,
            _ => "New Chat",
        }
    }

    /// Whether to show the "start a conversation" prompt
    pub fn shows_empty_prompt(&self) -> bool {
        self.messages.is_empty() && self.conversation_uuid.is_none()
    }

    /// Load the bound conversation, replacing the message list
    pub async fn load(&mut self, client: &ApiClient) -> ClientResult<()> {
        let Some(uuid) = self.conversation_uuid.clone() else {
            return Ok(());
        };

        match chat::get_conversation(client, &uuid).await {
            Ok(conversation) => {
                self.messages = conversation.messages.clone();
                self.conversation = Some(conversation);
                Ok(())
            }
            Err(e) => {
                self.error = inline_error(&e, "Failed to load conversation");
                Err(e)
            }
        }
    }

    /// Accept `input` for sending and show it immediately
    ///
    /// Returns `None` for blank input or while another send is pending.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        let message = input.trim();
        if message.is_empty() || self.is_sending() {
            return None;
        }

        self.error = None;
        self.send_state = SendState::Pending;
        self.messages.push(ChatMessage::user(message));

        Some(PendingSend {
            message: message.to_string(),
            index: self.messages.len() - 1,
        })
    }

    /// The server started a new conversation from the pending message
    ///
    /// Its message list (which includes the user's message) replaces ours.
    pub fn commit_started(&mut self, conversation: Conversation) {
        self.messages = conversation.messages.clone();
        self.conversation_uuid = Some(conversation.uuid.clone());
        self.conversation = Some(conversation);
        self.send_state = SendState::Committed;
    }

    /// The server answered a follow-up; only the reply is appended
    pub fn commit_reply(&mut self, reply: ChatMessage) {
        self.messages.push(reply);
        self.send_state = SendState::Committed;
    }

    /// The send failed: take the tentative message back and show the error
    pub fn rollback(&mut self, pending: &PendingSend, err: &ClientError) {
        let matches_pending = self
            .messages
            .get(pending.index)
            .map(|m| m.is_user() && m.content == pending.message)
            .unwrap_or(false);
        if matches_pending {
            self.messages.remove(pending.index);
        }

        self.error = inline_error(err, "Failed to send message");
        self.send_state = SendState::RolledBack;
    }

    /// Send `input`, starting a conversation if none exists yet
    ///
    /// Returns the conversation when this send started it, so the owner can
    /// record it. Blank input and concurrent sends are ignored.
    pub async fn send(
        &mut self,
        client: &ApiClient,
        input: &str,
    ) -> ClientResult<Option<Conversation>> {
        let Some(pending) = self.begin_send(input) else {
            return Ok(None);
        };

        let result = match self.conversation_uuid().map(str::to_string) {
            None => chat::start(client, &self.document_uuid, &pending.message)
                .await
                .map(Some),
            Some(uuid) => chat::continue_conversation(client, &uuid, &pending.message)
                .await
                .map(|reply| {
                    self.commit_reply(reply);
                    None
                }),
        };

        match result {
            Ok(Some(conversation)) => {
                self.commit_started(conversation.clone());
                Ok(Some(conversation))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Chat message failed");
                self.rollback(&pending, &e);
                Err(e)
            }
        }
    }
}
