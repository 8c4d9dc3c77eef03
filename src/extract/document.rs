//! Document download and text extraction over plain HTTP
//!
//! HTML bodies are stripped to text; `text/*` bodies pass through as-is;
//! other content types report type and size without a content payload.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use serde::Serialize;

/// Downloaded document metadata and optional extracted text
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDownload {
    pub url: String,
    pub content_type: String,
    /// Body size in bytes
    pub size: usize,
    /// Extracted text, when requested and the content type is textual
    pub content: Option<String>,
}

/// Fetch a document and optionally extract its text content
pub async fn download_document(
    client: &reqwest::Client,
    url: &str,
    extract_text: bool,
) -> Result<DocumentDownload> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download document from {url}"))?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = response
        .bytes()
        .await
        .context("Failed to read document body")?;
    let size = bytes.len();

    let content = if extract_text {
        if content_type.contains("html") {
            Some(html_to_text(&String::from_utf8_lossy(&bytes)))
        } else if content_type.starts_with("text/") {
            Some(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            None
        }
    } else {
        None
    };

    Ok(DocumentDownload {
        url: url.to_string(),
        content_type,
        size,
        content,
    })
}

/// Strip an HTML document to whitespace-normalized body text
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body").ok();

    let text: String = match root.as_ref().and_then(|s| document.select(s).next()) {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    };

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_to_text() {
        let html = "<html><body><h1>Title</h1>\n<p>Some   body\ntext.</p></body></html>";
        assert_eq!(html_to_text(html), "Title Some body text.");
    }

    #[test]
    fn handles_documents_without_body() {
        assert_eq!(html_to_text("just text"), "just text");
    }
}
