//! Document summary operations

use crate::client::{ApiClient, ClientResult, DocumentSummary};

/// Generate (or regenerate) the summary of a document
pub async fn generate(client: &ApiClient, document_uuid: &str) -> ClientResult<DocumentSummary> {
    let summary: DocumentSummary = client
        .post_empty(&format!("summarize/{}", document_uuid))
        .await?;

    tracing::info!(
        document = %document_uuid,
        chars = summary.summary.len(),
        "Summary generated"
    );
    Ok(summary)
}

/// Fetch the stored summary; `None` when none has been generated yet
pub async fn get(client: &ApiClient, document_uuid: &str) -> ClientResult<Option<DocumentSummary>> {
    match client
        .get_json(&format!("summary/{}", document_uuid))
        .await
    {
        Ok(summary) => Ok(Some(summary)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
