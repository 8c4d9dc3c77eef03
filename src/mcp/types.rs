//! Argument schemas for the MCP tool surface
//!
//! Field doc comments surface in the generated JSON schema shown to callers.

use schemars::JsonSchema;
use serde::Deserialize;

fn default_max_results() -> usize {
    10
}

fn default_num_snippets() -> usize {
    5
}

fn default_true() -> bool {
    true
}

/// Arguments for the `search` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Search query text
    pub query: String,
    /// Maximum number of results to return (capped at 10)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Arguments for the `visit_page` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct VisitPageArgs {
    /// URL of the page to visit
    pub url: String,
}

/// Arguments for the `search_on_page` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchOnPageArgs {
    /// Text to search for within the current page content
    pub text: String,
    /// Number of context snippets to return
    #[serde(default = "default_num_snippets")]
    pub num_snippets: usize,
}

/// Arguments for the `search_next_on_page` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchNextOnPageArgs {
    /// Number of additional context snippets to return
    #[serde(default = "default_num_snippets")]
    pub num_snippets: usize,
}

/// Arguments for the `read_chunk` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadChunkArgs {
    /// Index of the chunk to read (0-based)
    pub chunk_index: i64,
}

/// Arguments for the `scrape_social_profile` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SocialProfileArgs {
    /// Platform name, e.g. "twitter" or "linkedin"
    pub platform: String,
    /// URL of the public profile page
    pub profile_url: String,
}

/// Arguments for the `extract_news_article` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NewsArticleArgs {
    /// URL of the article to extract
    pub article_url: String,
    /// Also extract author and publication date
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

/// Arguments for the `scrape_product` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProductArgs {
    /// URL of the product page
    pub product_url: String,
    /// Also collect customer reviews (first 5)
    #[serde(default)]
    pub include_reviews: bool,
}

/// Arguments for the `download_document` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DownloadDocumentArgs {
    /// URL of the document to download
    pub document_url: String,
    /// Extract text content when the document is HTML or plain text
    #[serde(default = "default_true")]
    pub extract_text: bool,
}
