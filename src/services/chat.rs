//! Conversation operations

use crate::client::{
    ApiClient, ChatMessage, ChatRequest, ClientResult, Conversation, ConversationListItem,
    ConversationListResponse, ReplyResponse,
};

/// Start a conversation about a document with its first message
pub async fn start(
    client: &ApiClient,
    document_uuid: &str,
    message: &str,
) -> ClientResult<Conversation> {
    let conversation: Conversation = client
        .post_json(
            &format!("chat/start/{}", document_uuid),
            &ChatRequest { message },
        )
        .await?;

    tracing::info!(
        conversation = %conversation.uuid,
        document = %document_uuid,
        "Conversation started"
    );
    Ok(conversation)
}

/// Send a follow-up message; returns the assistant's reply
pub async fn continue_conversation(
    client: &ApiClient,
    conversation_uuid: &str,
    message: &str,
) -> ClientResult<ChatMessage> {
    let reply: ReplyResponse = client
        .post_json(
            &format!("chat/continue/{}", conversation_uuid),
            &ChatRequest { message },
        )
        .await?;
    Ok(reply.into_message())
}

pub async fn list_conversations(client: &ApiClient) -> ClientResult<Vec<ConversationListItem>> {
    let response: ConversationListResponse = client.get_json("chat/conversations").await?;
    Ok(response.into_items())
}

pub async fn get_conversation(client: &ApiClient, uuid: &str) -> ClientResult<Conversation> {
    client
        .get_json(&format!("chat/conversation/{}", uuid))
        .await
}

pub async fn delete_conversation(client: &ApiClient, uuid: &str) -> ClientResult<()> {
    client
        .delete(&format!("chat/conversation/{}", uuid))
        .await?;
    tracing::info!(conversation = %uuid, "Conversation deleted");
    Ok(())
}
