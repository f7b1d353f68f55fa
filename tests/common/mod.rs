//! In-process mock of the DocChat backend
//!
//! Serves the same routes as the real API under `/api/v1` and records the
//! `Authorization` header of every authenticated request.
//!
//! Tokens: `abc` is accepted, `revoked` answers 403, anything else (or no
//! token) answers 401. Login accepts any username with password `secret`.

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use futures_util::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use docchat::client::{ApiClient, ClientConfig};
use docchat::session::Session;

/// Token the mock hands out and accepts
pub const VALID_TOKEN: &str = "abc";

/// Token the mock rejects with 403
pub const REVOKED_TOKEN: &str = "revoked";

/// Chat message or question that makes the mock fail with a detail
pub const FAIL_WITH_DETAIL: &str = "please fail";

/// Chat message that makes the mock fail without a detail
pub const FAIL_BARE: &str = "fail quietly";

/// Document id whose download drops the connection mid-body
pub const TRUNCATED_DOCUMENT: &str = "truncated";

#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub uuid: String,
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
struct Inner {
    documents: Vec<StoredDocument>,
    conversations: Vec<Value>,
    summaries: HashMap<String, Value>,
    summary_runs: u32,
    auth_headers: Vec<(String, Option<String>)>,
}

/// Handle to the running mock
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    /// `Authorization` headers seen, keyed by request path
    pub fn auth_headers(&self) -> Vec<(String, Option<String>)> {
        self.inner.lock().unwrap().auth_headers.clone()
    }

    pub fn documents(&self) -> Vec<StoredDocument> {
        self.inner.lock().unwrap().documents.clone()
    }

    pub fn add_document(&self, uuid: &str, filename: &str, content: &[u8]) {
        self.inner.lock().unwrap().documents.push(StoredDocument {
            uuid: uuid.to_string(),
            filename: filename.to_string(),
            content: content.to_vec(),
        });
    }

    pub fn conversation_count(&self) -> usize {
        self.inner.lock().unwrap().conversations.len()
    }

    fn authorize(&self, path: &str, headers: &HeaderMap) -> Result<(), Response> {
        let header = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.inner
            .lock()
            .unwrap()
            .auth_headers
            .push((path.to_string(), header.clone()));

        match header.as_deref() {
            Some(h) if h == format!("Bearer {}", VALID_TOKEN) => Ok(()),
            Some(h) if h == format!("Bearer {}", REVOKED_TOKEN) => {
                Err(error(StatusCode::FORBIDDEN, Some("Not enough permissions")))
            }
            _ => Err(error(
                StatusCode::UNAUTHORIZED,
                Some("Could not validate credentials"),
            )),
        }
    }
}

fn error(status: StatusCode, detail: Option<&str>) -> Response {
    match detail {
        Some(detail) => (status, Json(json!({ "detail": detail }))).into_response(),
        None => (status, Json(json!({}))).into_response(),
    }
}

/// Start the mock on an ephemeral port; returns it with its base URL
pub async fn spawn() -> (MockBackend, String) {
    let backend = MockBackend::default();

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/list_uuids", get(list_uuids))
        .route("/upload/:uuid", post(upload))
        .route("/update/:uuid", put(update))
        .route("/download/:uuid", get(download))
        .route("/delete/:uuid", delete(delete_document))
        .route("/query/:uuid", get(query))
        .route("/chat/start/:uuid", post(chat_start))
        .route("/chat/continue/:uuid", post(chat_continue))
        .route("/chat/conversations", get(list_conversations))
        .route(
            "/chat/conversation/:uuid",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/summarize/:uuid", post(summarize))
        .route("/summary/:uuid", get(get_summary))
        .with_state(backend.clone());

    let app = Router::new().nest("/api/v1", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (backend, format!("http://{}/api/v1", addr))
}

/// Client with an in-memory session pointed at `base_url`
pub fn client(base_url: &str) -> (ApiClient, Arc<Session>) {
    let session = Arc::new(Session::in_memory());
    let config = ClientConfig {
        base_url: base_url.to_string(),
        request_timeout_secs: 10,
        upload_chunk_size: 16 * 1024,
    };
    let client = ApiClient::new(config, Arc::clone(&session)).unwrap();
    (client, session)
}

/// Mock backend plus a client already logged in with [`VALID_TOKEN`]
pub async fn logged_in() -> (MockBackend, ApiClient, Arc<Session>) {
    let (backend, url) = spawn().await;
    let (client, session) = client(&url);
    session.set(VALID_TOKEN).await.unwrap();
    (backend, client, session)
}

// ============ Auth ============

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({ "access_token": VALID_TOKEN, "token_type": "bearer" })).into_response()
    } else {
        error(
            StatusCode::UNAUTHORIZED,
            Some("Incorrect username or password"),
        )
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        error(StatusCode::BAD_REQUEST, Some("Username already registered"))
    } else {
        Json(json!({ "message": "User registered successfully" })).into_response()
    }
}

// ============ Documents ============

async fn list_uuids(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(rejection) = backend.authorize("/list_uuids", &headers) {
        return rejection;
    }
    let pdfs: Vec<Value> = backend
        .documents()
        .iter()
        .map(|d| json!({ "uuid": d.uuid, "filename": d.filename }))
        .collect();
    Json(json!({ "pdfs": pdfs })).into_response()
}

async fn read_pdf(multipart: &mut Multipart) -> Result<(String, Vec<u8>), Response> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some("application/pdf") {
            return Err(error(
                StatusCode::BAD_REQUEST,
                Some("Only PDF files are allowed."),
            ));
        }
        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field.bytes().await.map_err(|_| error(StatusCode::BAD_REQUEST, None))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(error(StatusCode::UNPROCESSABLE_ENTITY, Some("file is required")))
}

async fn upload(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(rejection) = backend.authorize("/upload", &headers) {
        return rejection;
    }
    let (filename, content) = match read_pdf(&mut multipart).await {
        Ok(file) => file,
        Err(rejection) => return rejection,
    };
    let message = format!("PDF {} uploaded and text extracted successfully.", filename);
    backend.add_document(&uuid, &filename, &content);
    Json(json!({ "message": message, "uuid": uuid })).into_response()
}

async fn update(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(rejection) = backend.authorize("/update", &headers) {
        return rejection;
    }
    let (filename, content) = match read_pdf(&mut multipart).await {
        Ok(file) => file,
        Err(rejection) => return rejection,
    };

    let mut inner = backend.inner.lock().unwrap();
    let Some(doc) = inner.documents.iter_mut().find(|d| d.uuid == uuid) else {
        return error(StatusCode::NOT_FOUND, Some("PDF not found"));
    };
    doc.filename = filename.clone();
    doc.content = content;
    let message = format!("PDF {} updated and text extracted successfully.", filename);
    Json(json!({ "message": message, "uuid": uuid })).into_response()
}

async fn download(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize("/download", &headers) {
        return rejection;
    }
    if uuid == TRUNCATED_DOCUMENT {
        return truncated_pdf();
    }
    match backend.documents().into_iter().find(|d| d.uuid == uuid) {
        Some(doc) => (
            [(axum::http::header::CONTENT_TYPE, "application/pdf")],
            doc.content,
        )
            .into_response(),
        None => error(StatusCode::NOT_FOUND, Some("PDF not found")),
    }
}

/// Sends the head and one chunk, then fails the body so the connection drops
fn truncated_pdf() -> Response {
    let head = stream::once(async {
        Ok::<_, std::io::Error>(Bytes::from_static(b"%PDF-1.4 partial"))
    });
    let tail = stream::once(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "dropped",
        ))
    });
    (
        [(axum::http::header::CONTENT_TYPE, "application/pdf")],
        Body::from_stream(head.chain(tail)),
    )
        .into_response()
}

async fn delete_document(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize("/delete", &headers) {
        return rejection;
    }
    let mut inner = backend.inner.lock().unwrap();
    let before = inner.documents.len();
    inner.documents.retain(|d| d.uuid != uuid);
    if inner.documents.len() == before {
        return error(StatusCode::NOT_FOUND, Some("PDF not found"));
    }
    Json(json!({ "message": format!("Data for UUID {} deleted successfully.", uuid) }))
        .into_response()
}

async fn query(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize("/query", &headers) {
        return rejection;
    }
    let question = params.get("query").cloned().unwrap_or_default();
    if let Some(failure) = llm_failure(&question) {
        return failure;
    }
    Json(json!({
        "uuid": uuid,
        "query": question,
        "llm_response": format!("Answer to: {}", question),
    }))
    .into_response()
}

// ============ Chat ============

fn message(role: &str, content: &str) -> Value {
    json!({ "role": role, "content": content, "timestamp": "2025-01-01T00:00:00" })
}

fn llm_failure(text: &str) -> Option<Response> {
    match text {
        FAIL_WITH_DETAIL => Some(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("LLM unavailable"),
        )),
        FAIL_BARE => Some(error(StatusCode::INTERNAL_SERVER_ERROR, None)),
        _ => None,
    }
}

async fn chat_start(
    State(backend): State<MockBackend>,
    Path(document_uuid): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = backend.authorize("/chat/start", &headers) {
        return rejection;
    }
    let text = body["message"].as_str().unwrap_or_default().to_string();
    if let Some(failure) = llm_failure(&text) {
        return failure;
    }

    let mut inner = backend.inner.lock().unwrap();
    let filename = inner
        .documents
        .iter()
        .find(|d| d.uuid == document_uuid)
        .map(|d| d.filename.clone())
        .unwrap_or_else(|| format!("{}.pdf", document_uuid));
    let uuid = format!("conv-{}", inner.conversations.len() + 1);
    let conversation = json!({
        "uuid": uuid,
        "title": text,
        "document_uuid": document_uuid,
        "document_filename": filename,
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00",
        "messages": [message("user", &text), message("assistant", &format!("Reply to: {}", text))],
    });
    inner.conversations.push(conversation.clone());
    Json(conversation).into_response()
}

async fn chat_continue(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = backend.authorize("/chat/continue", &headers) {
        return rejection;
    }
    let text = body["message"].as_str().unwrap_or_default().to_string();
    if let Some(failure) = llm_failure(&text) {
        return failure;
    }

    let mut inner = backend.inner.lock().unwrap();
    let Some(conversation) = inner.conversations.iter_mut().find(|c| c["uuid"] == uuid) else {
        return error(StatusCode::NOT_FOUND, Some("Conversation not found"));
    };
    let reply = message("assistant", &format!("Reply to: {}", text));
    if let Some(messages) = conversation["messages"].as_array_mut() {
        messages.push(message("user", &text));
        messages.push(reply.clone());
    }
    Json(json!({ "message": reply })).into_response()
}

async fn list_conversations(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(rejection) = backend.authorize("/chat/conversations", &headers) {
        return rejection;
    }
    let inner = backend.inner.lock().unwrap();
    let items: Vec<Value> = inner
        .conversations
        .iter()
        .map(|c| {
            json!({
                "uuid": c["uuid"],
                "title": c["title"],
                "document_uuid": c["document_uuid"],
                "document_filename": c["document_filename"],
                "message_count": c["messages"].as_array().map(Vec::len).unwrap_or(0),
                "created_at": c["created_at"],
                "updated_at": c["updated_at"],
            })
        })
        .collect();
    Json(Value::Array(items)).into_response()
}

async fn get_conversation(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize("/chat/conversation", &headers) {
        return rejection;
    }
    let inner = backend.inner.lock().unwrap();
    match inner.conversations.iter().find(|c| c["uuid"] == uuid) {
        Some(conversation) => Json(conversation.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, Some("Conversation not found")),
    }
}

async fn delete_conversation(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize("/chat/conversation", &headers) {
        return rejection;
    }
    let mut inner = backend.inner.lock().unwrap();
    inner.conversations.retain(|c| c["uuid"] != uuid);
    Json(json!({ "message": "Conversation deleted" })).into_response()
}

// ============ Summaries ============

async fn summarize(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize("/summarize", &headers) {
        return rejection;
    }
    let mut inner = backend.inner.lock().unwrap();
    inner.summary_runs += 1;
    let run = inner.summary_runs;
    let summary = json!({
        "uuid": uuid,
        "filename": format!("{}.pdf", uuid),
        "summary": format!("Summary run {}.\n1. **Overview**\nThe document.", run),
        "summary_generated_at": format!("2025-01-0{}T00:00:00", run.min(9)),
    });
    inner.summaries.insert(uuid, summary.clone());
    Json(summary).into_response()
}

async fn get_summary(
    State(backend): State<MockBackend>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize("/summary", &headers) {
        return rejection;
    }
    let inner = backend.inner.lock().unwrap();
    match inner.summaries.get(&uuid) {
        Some(summary) => Json(summary.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, Some("Summary not found")),
    }
}
