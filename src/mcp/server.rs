//! MCP server wiring for the pagescout tool surface
//!
//! Tools always return a structured JSON payload; failures surface as an
//! `error` string field in that payload rather than a protocol fault, so a
//! calling agent can always read the result.

use std::sync::Arc;

use anyhow::Context as _;
use rmcp::{
    ErrorData as McpError, ServiceExt,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::types::{
    DownloadDocumentArgs, NewsArticleArgs, ProductArgs, ReadChunkArgs, SearchArgs,
    SearchNextOnPageArgs, SearchOnPageArgs, SocialProfileArgs, VisitPageArgs,
};
use crate::browser::{BrowserManager, PageDriver};
use crate::config::ScoutConfig;
use crate::error::ScrapeError;
use crate::extract;
use crate::session::{LoadMoreOutcome, SearchOutcome, SearchSlot, SessionStore};
use crate::utils::constants::CHROME_USER_AGENT;
use crate::utils::validate_url;
use crate::web_search;

/// MCP server context holding the shared managers
///
/// The session store, search slot, and browser are scoped here rather than
/// in process globals; one server instance serves one host conversation.
#[derive(Clone)]
pub struct PagescoutServer {
    tool_router: ToolRouter<Self>,
    sessions: SessionStore,
    search_slot: SearchSlot,
    browser: Arc<BrowserManager>,
    http: reqwest::Client,
}

#[tool_router]
impl PagescoutServer {
    pub fn new(config: ScoutConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            tool_router: Self::tool_router(),
            sessions: SessionStore::new(config.clone()),
            search_slot: SearchSlot::new(config),
            browser: Arc::new(BrowserManager::new()),
            http,
        })
    }

    /// Session store handle (exposed for embedding and tests)
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn tool_result(payload: Value) -> CallToolResult {
        // Structured content for machine consumers plus a text fallback for
        // clients that only read content[0].text
        let mut result = CallToolResult::structured(payload.clone());
        result.content = vec![Content::text(payload.to_string())];
        result
    }

    fn error_result(message: impl std::fmt::Display) -> CallToolResult {
        Self::tool_result(json!({ "error": message.to_string() }))
    }

    fn search_payload(outcome: &SearchOutcome) -> Value {
        let snippets: Vec<Value> = outcome
            .snippets
            .iter()
            .map(|m| {
                json!({
                    "chunk_index": m.chunk_index,
                    "snippet": m.snippet,
                    "position": m.position,
                })
            })
            .collect();

        let mut payload = json!({
            "search_text": outcome.search_text,
            "total_matches": outcome.total_matches,
            "snippets_returned": outcome.snippets.len(),
            "snippets": snippets,
        });
        if let (Some(map), Some(has_more)) = (payload.as_object_mut(), outcome.has_more_results) {
            map.insert("has_more_results".to_string(), json!(has_more));
        }
        payload
    }

    async fn fetch_page_text(driver: &dyn PageDriver, url: &str) -> anyhow::Result<String> {
        driver.navigate(url).await?;
        driver.extract_text("body").await
    }

    /// Release a page handle, swallowing failures (cleanup is best-effort)
    async fn release_quietly(driver: Box<dyn PageDriver>) {
        if let Err(e) = driver.release().await {
            debug!("Failed to release page handle: {e}");
        }
    }

    #[tool(
        description = "Perform a web search and return structured results with titles, URLs, and snippets. Use this to find current information or discover URLs for a topic, then read them with visit_page."
    )]
    async fn search(
        &self,
        params: Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        match web_search::search_with_manager(&self.browser, args.query.clone(), args.max_results)
            .await
        {
            Ok(results) => Ok(Self::tool_result(json!({
                "query": results.query,
                "results": results.results.iter().map(|r| json!({
                    "title": r.title,
                    "url": r.url,
                    "snippet": r.snippet,
                })).collect::<Vec<_>>(),
                "total_results": results.results.len(),
            }))),
            Err(e) => Ok(Self::tool_result(json!({
                "query": args.query,
                "results": [],
                "total_results": 0,
                "error": format!("Search failed: {e}"),
            }))),
        }
    }

    #[tool(
        description = "Visit a webpage and extract its content as plain text. Large pages are split into chunks of up to 5000 characters; the first chunk is returned and has_more_chunks signals whether load_more will yield additional content."
    )]
    async fn visit_page(
        &self,
        params: Parameters<VisitPageArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        if !validate_url(&args.url) {
            return Ok(Self::error_result(ScrapeError::UnsafeUrl(args.url)));
        }

        let driver: Box<dyn PageDriver> = match self.browser.open_page().await {
            Ok(page) => Box::new(page),
            Err(e) => return Ok(Self::error_result(format!("Failed to visit page: {e}"))),
        };

        match Self::fetch_page_text(driver.as_ref(), &args.url).await {
            Ok(text) => {
                let outcome = self
                    .sessions
                    .create_session(&args.url, &text, Some(driver))
                    .await;
                Ok(Self::tool_result(json!({
                    "url": args.url,
                    "content": outcome.content,
                    "format": "text",
                    "chunk_index": 0,
                    "has_more_chunks": outcome.has_more_chunks,
                })))
            }
            Err(e) => {
                Self::release_quietly(driver).await;
                Ok(Self::error_result(format!("Failed to visit page: {e}")))
            }
        }
    }

    #[tool(
        description = "Load the next content chunk from the currently visited page. Takes no parameters; continues from where the previous visit_page or load_more call left off. Call repeatedly until has_more_chunks is false."
    )]
    async fn load_more(&self) -> Result<CallToolResult, McpError> {
        match self.sessions.load_more().await {
            Ok(LoadMoreOutcome::Next {
                content,
                chunk_index,
                has_more_chunks,
            }) => Ok(Self::tool_result(json!({
                "status": "success",
                "message": format!("Chunk {chunk_index} loaded successfully"),
                "content": content,
                "chunk_index": chunk_index,
                "has_more_chunks": has_more_chunks,
            }))),
            Ok(LoadMoreOutcome::Complete { chunk_index }) => Ok(Self::tool_result(json!({
                "status": "complete",
                "message": "No more chunks available",
                "chunk_index": chunk_index,
                "has_more_chunks": false,
            }))),
            Err(e) => Ok(Self::error_result(e)),
        }
    }

    #[tool(
        description = "Search for text within the currently visited page content, across all chunks. Returns context snippets around each case-insensitive match; continue with search_next_on_page for further matches."
    )]
    async fn search_on_page(
        &self,
        params: Parameters<SearchOnPageArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        match self.sessions.snapshot_current().await {
            Ok(snapshot) => {
                let outcome = self
                    .search_slot
                    .begin(&snapshot, &args.text, args.num_snippets)
                    .await;
                Ok(Self::tool_result(Self::search_payload(&outcome)))
            }
            Err(e) => Ok(Self::error_result(e)),
        }
    }

    #[tool(
        description = "Continue the previous search_on_page call, returning the next batch of matching snippets for the same text. Reports has_more_results while undelivered matches remain."
    )]
    async fn search_next_on_page(
        &self,
        params: Parameters<SearchNextOnPageArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        match self
            .search_slot
            .continue_search(&self.sessions, args.num_snippets)
            .await
        {
            Ok(outcome) => Ok(Self::tool_result(Self::search_payload(&outcome))),
            Err(e) => Ok(Self::error_result(e)),
        }
    }

    #[tool(
        description = "Read a specific chunk of the currently visited page by index, without affecting the load_more position. Useful for revisiting an earlier section of a large page."
    )]
    async fn read_chunk(
        &self,
        params: Parameters<ReadChunkArgs>,
    ) -> Result<CallToolResult, McpError> {
        match self.sessions.read_chunk(params.0.chunk_index).await {
            Ok(outcome) => Ok(Self::tool_result(json!({
                "chunk_index": outcome.chunk_index,
                "content": outcome.content,
                "total_chunks": outcome.total_chunks,
                "chunk_size": outcome.chunk_size,
            }))),
            Err(e) => Ok(Self::error_result(e)),
        }
    }

    #[tool(
        description = "Extract public information from a social media profile page: title, display name, and bio where available. Provide the platform name and the profile URL."
    )]
    async fn scrape_social_profile(
        &self,
        params: Parameters<SocialProfileArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        if !validate_url(&args.profile_url) {
            return Ok(Self::error_result(ScrapeError::UnsafeUrl(args.profile_url)));
        }

        let driver = match self.browser.open_page().await {
            Ok(page) => page,
            Err(e) => return Ok(Self::error_result(format!("Failed to scrape profile: {e}"))),
        };

        let result =
            extract::scrape_social_profile(&driver, &args.platform, &args.profile_url).await;
        Self::release_quietly(Box::new(driver)).await;

        match result {
            Ok(profile) => {
                let mut payload = json!({
                    "platform": profile.platform,
                    "url": profile.url,
                    "title": profile.title,
                });
                if let Some(map) = payload.as_object_mut() {
                    if let Some(name) = profile.name {
                        map.insert("name".to_string(), json!(name));
                    }
                    if let Some(bio) = profile.bio {
                        map.insert("bio".to_string(), json!(bio));
                    }
                }
                Ok(Self::tool_result(payload))
            }
            Err(e) => Ok(Self::error_result(format!("Failed to scrape profile: {e}"))),
        }
    }

    #[tool(
        description = "Extract the full content of a news article with title, author, and publication date metadata. Fetches over plain HTTP without a browser."
    )]
    async fn extract_news_article(
        &self,
        params: Parameters<NewsArticleArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        if !validate_url(&args.article_url) {
            return Ok(Self::error_result(ScrapeError::UnsafeUrl(args.article_url)));
        }

        match extract::extract_news_article(&self.http, &args.article_url, args.include_metadata)
            .await
        {
            Ok(article) => Ok(Self::tool_result(json!({
                "url": article.url,
                "title": article.title,
                "content": article.content,
                "author": article.author,
                "date": article.date,
            }))),
            Err(e) => Ok(Self::error_result(format!("Failed to extract article: {e}"))),
        }
    }

    #[tool(
        description = "Extract product details from an e-commerce page: name, price, description, availability, and optionally the first customer reviews."
    )]
    async fn scrape_product(
        &self,
        params: Parameters<ProductArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        if !validate_url(&args.product_url) {
            return Ok(Self::error_result(ScrapeError::UnsafeUrl(args.product_url)));
        }

        let driver = match self.browser.open_page().await {
            Ok(page) => page,
            Err(e) => return Ok(Self::error_result(format!("Failed to scrape product: {e}"))),
        };

        let result = extract::scrape_product(&driver, &args.product_url, args.include_reviews).await;
        Self::release_quietly(Box::new(driver)).await;

        match result {
            Ok(product) => {
                let reviews = match product.reviews {
                    Some(reviews) => json!(reviews),
                    None => json!("Reviews not included (set include_reviews=true)"),
                };
                Ok(Self::tool_result(json!({
                    "url": product.url,
                    "name": product.name,
                    "price": product.price,
                    "description": product.description,
                    "availability": product.availability,
                    "reviews": reviews,
                })))
            }
            Err(e) => Ok(Self::error_result(format!("Failed to scrape product: {e}"))),
        }
    }

    #[tool(
        description = "Download a document from a URL and extract its text content. HTML is stripped to text, text documents pass through, and binary documents report content type and size only."
    )]
    async fn download_document(
        &self,
        params: Parameters<DownloadDocumentArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        if !validate_url(&args.document_url) {
            return Ok(Self::error_result(ScrapeError::UnsafeUrl(args.document_url)));
        }

        match extract::download_document(&self.http, &args.document_url, args.extract_text).await {
            Ok(doc) => {
                let mut payload = json!({
                    "url": doc.url,
                    "content_type": doc.content_type,
                    "size": doc.size,
                });
                if let (Some(map), Some(content)) = (payload.as_object_mut(), doc.content) {
                    map.insert("content".to_string(), json!(content));
                }
                Ok(Self::tool_result(payload))
            }
            Err(e) => Ok(Self::error_result(format!(
                "Failed to download document: {e}"
            ))),
        }
    }
}

#[tool_handler]
impl rmcp::ServerHandler for PagescoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Web browsing tools for incremental reading. Start with `search` to find URLs, \
                 then `visit_page` to read one; content arrives in chunks of up to 5000 \
                 characters. Use `load_more` while has_more_chunks is true, `search_on_page` / \
                 `search_next_on_page` to find text within the current page, and `read_chunk` \
                 for random access. `extract_news_article`, `scrape_social_profile`, \
                 `scrape_product`, and `download_document` handle specific content types."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve the tool surface over MCP stdio until the client disconnects
///
/// Starts the session cleanup task, runs the server, then shuts down the
/// session store and browser.
pub async fn serve_stdio(config: ScoutConfig) -> anyhow::Result<()> {
    let server = PagescoutServer::new(config)?;
    server.sessions.start_cleanup_task();

    let sessions = server.sessions.clone();
    let browser = server.browser.clone();

    let running = server
        .serve(stdio())
        .await
        .context("Failed to start MCP stdio server")?;
    running
        .waiting()
        .await
        .context("MCP server terminated abnormally")?;

    sessions.shutdown().await;
    if let Err(e) = browser.shutdown().await {
        warn!("Browser shutdown failed: {e}");
    }
    Ok(())
}
