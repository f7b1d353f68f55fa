//! Summary panel

use regex::Regex;

use crate::client::{parse_timestamp, ApiClient, ClientError, ClientResult, DocumentSummary};
use crate::services::summary;

use super::state::{inline_error, truncate};

/// Characters shown before the summary is expanded
pub const PREVIEW_CHARS: usize = 400;

/// Numbered bold heading such as `\n2. **Key Findings**`
const SECTION_HEADING: &str = r"\n\s*\d+\.\s*\*\*([^*]+)\*\*";

/// What the panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPhase {
    /// No summary exists yet
    Empty,
    /// A (re)generation request is in flight
    Generating,
    /// A summary is available
    Ready,
}

/// One block of a formatted summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    /// `None` for the introduction before the first heading
    pub title: Option<String>,
    pub body: String,
}

/// State of the summary panel for one document
#[derive(Debug, Clone)]
pub struct SummaryView {
    document_uuid: String,
    document_filename: String,
    summary: Option<DocumentSummary>,
    generating: bool,
    expanded: bool,
    error: Option<String>,
}

impl SummaryView {
    pub fn new(document_uuid: impl Into<String>, document_filename: impl Into<String>) -> Self {
        Self {
            document_uuid: document_uuid.into(),
            document_filename: document_filename.into(),
            summary: None,
            generating: false,
            expanded: false,
            error: None,
        }
    }

    pub fn document_uuid(&self) -> &str {
        &self.document_uuid
    }

    pub fn document_filename(&self) -> &str {
        &self.document_filename
    }

    pub fn summary(&self) -> Option<&DocumentSummary> {
        self.summary.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> SummaryPhase {
        if self.generating {
            SummaryPhase::Generating
        } else if self.summary.is_some() {
            SummaryPhase::Ready
        } else {
            SummaryPhase::Empty
        }
    }

    /// Fetch an existing summary; a 404 simply leaves the panel empty
    pub async fn load(&mut self, client: &ApiClient) -> ClientResult<()> {
        match summary::get(client, &self.document_uuid).await {
            Ok(found) => {
                self.summary = found;
                Ok(())
            }
            Err(e) => {
                self.error = inline_error(&e, "Failed to check for existing summary");
                Err(e)
            }
        }
    }

    /// Enter the generating phase; false if a generation is already running
    pub fn begin_generate(&mut self) -> bool {
        if self.generating {
            return false;
        }
        self.generating = true;
        self.error = None;
        true
    }

    /// Leave the generating phase with the server's answer
    ///
    /// Success replaces any previous summary; failure keeps it.
    pub fn finish_generate(&mut self, result: &Result<DocumentSummary, ClientError>) {
        self.generating = false;
        match result {
            Ok(summary) => self.summary = Some(summary.clone()),
            Err(e) => self.error = inline_error(e, "Failed to generate summary"),
        }
    }

    /// Generate or regenerate the summary
    pub async fn generate(&mut self, client: &ApiClient) -> ClientResult<()> {
        if !self.begin_generate() {
            return Ok(());
        }
        let result = summary::generate(client, &self.document_uuid).await;
        self.finish_generate(&result);
        result.map(|_| ())
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// Whether the summary is long enough to need a show-more toggle
    pub fn is_collapsible(&self) -> bool {
        self.summary
            .as_ref()
            .map(|s| s.summary.chars().count() > PREVIEW_CHARS)
            .unwrap_or(false)
    }

    /// Text to render given the expanded flag
    pub fn visible_text(&self) -> Option<String> {
        let text = &self.summary.as_ref()?.summary;
        if self.expanded {
            Some(text.clone())
        } else {
            Some(truncate(text, PREVIEW_CHARS))
        }
    }

    /// Rendered sections of the visible text
    pub fn visible_sections(&self) -> Vec<SummarySection> {
        self.visible_text()
            .map(|text| sections(&text))
            .unwrap_or_default()
    }
}

/// Split a summary into an introduction and titled sections
///
/// Headings are numbered bold lines (`1. **Overview**`). Text without any
/// heading comes back as a single untitled section.
pub fn sections(text: &str) -> Vec<SummarySection> {
    let whole = || {
        vec![SummarySection {
            title: None,
            body: text.trim().to_string(),
        }]
    };

    let Ok(heading) = Regex::new(SECTION_HEADING) else {
        return whole();
    };

    let mut result = Vec::new();
    let mut cursor = 0;
    let mut title: Option<String> = None;

    for caps in heading.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        push_section(&mut result, title.take(), &text[cursor..m.start()]);
        title = caps.get(1).map(|t| t.as_str().trim().to_string());
        cursor = m.end();
    }

    if result.is_empty() && title.is_none() {
        return whole();
    }

    push_section(&mut result, title, &text[cursor..]);
    result
}

fn push_section(result: &mut Vec<SummarySection>, title: Option<String>, body: &str) {
    let body = body.trim().trim_start_matches(':').trim().to_string();
    if title.is_none() && body.is_empty() {
        return;
    }
    result.push(SummarySection { title, body });
}

/// Human-readable generation time
pub fn generated_label(summary: &DocumentSummary) -> String {
    summary
        .summary_generated_at
        .as_deref()
        .map(|raw| {
            parse_timestamp(raw)
                .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| raw.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Plain-text export of a summary
pub fn export_text(summary: &DocumentSummary) -> String {
    format!(
        "Summary of {}\n\nGenerated: {}\n\n{}",
        summary.filename,
        generated_label(summary),
        summary.summary
    )
}

/// File name used for an exported summary
pub fn export_filename(summary: &DocumentSummary) -> String {
    format!("{}_summary.txt", summary.filename)
}
