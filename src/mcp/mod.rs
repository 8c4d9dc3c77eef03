//! MCP (Model Context Protocol) tool surface
//!
//! Exposes the web-browsing operations as MCP tools over stdio:
//!
//! - **`search`**: web search returning title/URL/snippet triples
//! - **`visit_page`**: fetch a page as text, chunked for incremental reading
//! - **`load_more`** / **`read_chunk`**: linear and random-access chunk reads
//! - **`search_on_page`** / **`search_next_on_page`**: resumable substring
//!   search across the current page's chunks
//! - **`extract_news_article`**, **`scrape_social_profile`**,
//!   **`scrape_product`**, **`download_document`**: site-specific extractors
//!
//! ## Architecture
//!
//! One [`PagescoutServer`] instance owns the shared managers:
//!
//! - [`crate::session::SessionStore`]: chunked page content keyed by session
//!   id, 30-minute TTL, background sweep, LRU capacity cap.
//! - [`crate::session::SearchSlot`]: the single resumable page-search cursor.
//! - [`crate::browser::BrowserManager`]: lazily-launched shared browser.
//!
//! Every tool returns a JSON payload; failures are reported as an `error`
//! field in the payload so the calling agent always receives a structured
//! result.

pub mod server;
pub mod types;

pub use server::{PagescoutServer, serve_stdio};
