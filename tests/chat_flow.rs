//! Conversations and summaries against the mock backend

mod common;

use docchat::client::ClientError;
use docchat::pages::{Dashboard, ViewMode};
use docchat::views::{ChatView, ConversationListView, SendState, SummaryPhase, SummaryView};

use common::{FAIL_BARE, FAIL_WITH_DETAIL};

#[tokio::test]
async fn test_chat_start_then_continue() {
    let (backend, client, _session) = common::logged_in().await;
    backend.add_document("doc-1", "a.pdf", b"%PDF");
    let mut dashboard = Dashboard::new();
    let mut view = ChatView::new("doc-1", "a.pdf");

    let started = view.send(&client, "What is this?").await.unwrap();
    let conversation = started.expect("first send starts a conversation");
    dashboard.on_conversation_started(&conversation);
    assert_eq!(dashboard.selected_conversation(), Some(conversation.uuid.as_str()));

    assert_eq!(view.messages().len(), 2);
    assert_eq!(view.title(), "What is this?");
    assert_eq!(view.send_state(), SendState::Committed);

    let next = view.send(&client, "And then?").await.unwrap();
    assert!(next.is_none());
    let contents: Vec<_> = view.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["What is this?", "Reply to: What is this?", "And then?", "Reply to: And then?"]
    );
    assert_eq!(backend.conversation_count(), 1);
}

#[tokio::test]
async fn test_failed_send_is_rolled_back() {
    let (_backend, client, _session) = common::logged_in().await;
    let mut view = ChatView::new("doc-1", "a.pdf");

    assert!(view.send(&client, FAIL_WITH_DETAIL).await.is_err());
    assert!(view.messages().is_empty());
    assert_eq!(view.error(), Some("LLM unavailable"));
    assert_eq!(view.send_state(), SendState::RolledBack);

    view.send(&client, "hello").await.unwrap();
    assert_eq!(view.messages().len(), 2);
    assert_eq!(view.error(), None);

    assert!(view.send(&client, FAIL_BARE).await.is_err());
    assert_eq!(view.messages().len(), 2);
    assert_eq!(view.error(), Some("Failed to send message"));
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let (backend, client, _session) = common::logged_in().await;
    let mut view = ChatView::new("doc-1", "a.pdf");

    assert!(view.send(&client, "   ").await.unwrap().is_none());
    assert!(view.messages().is_empty());
    assert!(backend.auth_headers().is_empty());
}

#[tokio::test]
async fn test_open_existing_conversation() {
    let (_backend, client, _session) = common::logged_in().await;
    let mut first = ChatView::new("doc-1", "a.pdf");
    let conversation = first.send(&client, "Hi").await.unwrap().unwrap();

    let mut dashboard = Dashboard::new();
    dashboard.open_conversation(&conversation.uuid, None);
    assert_eq!(dashboard.view_mode(), ViewMode::Chat);

    let mut view = ChatView::for_conversation("doc-1", "a.pdf", &conversation.uuid);
    view.load(&client).await.unwrap();
    assert_eq!(view.messages().len(), 2);
    assert!(!view.shows_empty_prompt());

    let mut missing = ChatView::for_conversation("doc-1", "a.pdf", "nope");
    assert!(missing.load(&client).await.is_err());
    assert_eq!(missing.error(), Some("Conversation not found"));
}

#[tokio::test]
async fn test_delete_conversation_removes_exactly_one() {
    let (backend, client, _session) = common::logged_in().await;
    for text in ["one", "two", "three"] {
        let mut view = ChatView::new("doc-1", "a.pdf");
        view.send(&client, text).await.unwrap();
    }

    let mut list = ConversationListView::new();
    list.refresh(&client).await.unwrap();
    assert_eq!(list.conversations().len(), 3);
    assert_eq!(list.conversations()[0].message_count, 2);

    list.delete(&client, "conv-2").await.unwrap();
    let left: Vec<_> = list.conversations().iter().map(|c| c.uuid.as_str()).collect();
    assert_eq!(left, vec!["conv-1", "conv-3"]);
    assert_eq!(list.deleting(), None);
    assert_eq!(backend.conversation_count(), 2);
}

#[tokio::test]
async fn test_summary_generate_and_regenerate() {
    let (_backend, client, _session) = common::logged_in().await;
    let mut view = SummaryView::new("doc-1", "doc-1.pdf");

    view.load(&client).await.unwrap();
    assert_eq!(view.phase(), SummaryPhase::Empty);
    assert_eq!(view.error(), None);

    view.generate(&client).await.unwrap();
    assert_eq!(view.phase(), SummaryPhase::Ready);
    let first = view.summary().cloned().unwrap();
    assert!(first.summary.starts_with("Summary run 1."));

    let sections = view.visible_sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[1].title.as_deref(), Some("Overview"));

    view.generate(&client).await.unwrap();
    let second = view.summary().cloned().unwrap();
    assert!(second.summary.starts_with("Summary run 2."));
    assert_ne!(first.summary_generated_at, second.summary_generated_at);

    let mut reloaded = SummaryView::new("doc-1", "doc-1.pdf");
    reloaded.load(&client).await.unwrap();
    assert_eq!(reloaded.summary(), Some(&second));
}

#[tokio::test]
async fn test_expired_session_mid_chat() {
    let (_backend, client, session) = common::logged_in().await;
    let mut view = ChatView::new("doc-1", "a.pdf");
    session.set("stale").await.unwrap();

    let err = view.send(&client, "hello").await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired { .. }));
    assert!(view.messages().is_empty());
    assert_eq!(view.error(), None);
    assert!(!session.is_authenticated().await);
}
