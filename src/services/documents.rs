//! Document operations: list, upload, download, delete, query

use futures_util::{stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::client::{
    decode_json, ApiClient, ClientError, ClientResult, Document, DocumentListResponse,
    QueryResponse, UploadProgress, UploadReceipt,
};

/// MIME type the backend accepts for uploads
pub const PDF_MIME: &str = "application/pdf";

/// A file ready to be sent as a multipart upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    filename: String,
    content: Vec<u8>,
    size_known: bool,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
            size_known: true,
        }
    }

    /// Read a file from disk; its name becomes the upload filename
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ClientError::InvalidInput(format!("{:?} is not a file", path)))?;
        Ok(Self::new(filename, content))
    }

    /// Send without announcing a length (e.g. content piped from stdin)
    ///
    /// Progress is not reported for such uploads.
    pub fn with_unknown_size(mut self) -> Self {
        self.size_known = false;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Total used for progress, if known
    pub fn size_hint(&self) -> Option<u64> {
        self.size_known.then(|| self.len())
    }
}

/// List the user's documents
pub async fn list(client: &ApiClient) -> ClientResult<Vec<Document>> {
    let response: DocumentListResponse = client.get_json("list_uuids").await?;
    Ok(response.pdfs)
}

/// Upload a new PDF under `uuid`
///
/// `on_progress` receives 0 to 100 as the body is streamed out.
pub async fn upload<F>(
    client: &ApiClient,
    uuid: &str,
    file: UploadFile,
    on_progress: F,
) -> ClientResult<UploadReceipt>
where
    F: FnMut(u8) + Send + Sync + 'static,
{
    send_upload(client, Method::POST, &format!("upload/{}", uuid), file, on_progress).await
}

/// Replace the PDF stored under `uuid`
pub async fn replace<F>(
    client: &ApiClient,
    uuid: &str,
    file: UploadFile,
    on_progress: F,
) -> ClientResult<UploadReceipt>
where
    F: FnMut(u8) + Send + Sync + 'static,
{
    send_upload(client, Method::PUT, &format!("update/{}", uuid), file, on_progress).await
}

async fn send_upload<F>(
    client: &ApiClient,
    method: Method,
    path: &str,
    file: UploadFile,
    on_progress: F,
) -> ClientResult<UploadReceipt>
where
    F: FnMut(u8) + Send + Sync + 'static,
{
    tracing::info!(filename = %file.filename(), bytes = file.len(), path = %path, "Uploading document");

    let form = upload_form(file, client.config().upload_chunk_size, on_progress)?;
    let builder = client.request(method, path).await.multipart(form);
    let response = client.send(builder).await?;
    decode_json(response).await
}

fn upload_form<F>(file: UploadFile, chunk_size: usize, mut on_progress: F) -> ClientResult<Form>
where
    F: FnMut(u8) + Send + Sync + 'static,
{
    let size_hint = file.size_hint();
    let mut progress = UploadProgress::new(size_hint);

    let chunks: Vec<Vec<u8>> = file
        .content
        .chunks(chunk_size.max(1))
        .map(<[u8]>::to_vec)
        .collect();

    // Progress advances as the transport pulls each chunk
    let body = Body::wrap_stream(stream::iter(chunks).map(move |chunk| {
        if let Some(percent) = progress.advance(chunk.len() as u64) {
            on_progress(percent);
        }
        Ok::<_, std::io::Error>(chunk)
    }));

    let part = match size_hint {
        Some(len) => Part::stream_with_length(body, len),
        None => Part::stream(body),
    }
    .file_name(file.filename)
    .mime_str(PDF_MIME)
    .map_err(ClientError::from_reqwest)?;

    Ok(Form::new().part("file", part))
}

/// Download a document to disk
///
/// The body is streamed into a transient `.part` file which is renamed into
/// place once complete and removed on failure. `destination` may be a
/// directory, a file path, or `None` for `<uuid>.pdf` in the working
/// directory.
pub async fn download(
    client: &ApiClient,
    uuid: &str,
    destination: Option<&Path>,
) -> ClientResult<PathBuf> {
    let target = download_path(uuid, destination);
    let builder = client.request(Method::GET, &format!("download/{}", uuid)).await;
    let response = client.send(builder).await?;

    let partial = partial_path(&target);
    match write_body(response, &partial).await {
        Ok(bytes) => {
            if let Err(e) = tokio::fs::rename(&partial, &target).await {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e.into());
            }
            tracing::info!(uuid = %uuid, path = ?target, bytes, "Document downloaded");
            Ok(target)
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            Err(e)
        }
    }
}

fn download_path(uuid: &str, destination: Option<&Path>) -> PathBuf {
    let file_name = format!("{}.pdf", uuid);
    match destination {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    target.with_file_name(name)
}

async fn write_body(response: reqwest::Response, path: &Path) -> ClientResult<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ClientError::from_reqwest)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

/// Delete a document
pub async fn delete(client: &ApiClient, uuid: &str) -> ClientResult<()> {
    client.delete(&format!("delete/{}", uuid)).await?;
    tracing::info!(uuid = %uuid, "Document deleted");
    Ok(())
}

/// Ask a one-shot question about a document
///
/// A blank question fails locally without a request.
pub async fn query(client: &ApiClient, uuid: &str, question: &str) -> ClientResult<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ClientError::InvalidInput("Question is required".to_string()));
    }

    let builder = client
        .request(Method::GET, &format!("query/{}", uuid))
        .await
        .query(&[("query", question)]);
    let response = client.send(builder).await?;
    let answer: QueryResponse = decode_json(response).await?;
    Ok(answer.llm_response)
}
