pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod mcp;
pub mod session;
pub mod utils;
pub mod web_search;

pub use browser::{BrowserManager, CdpPage, PageDriver};
pub use config::ScoutConfig;
pub use error::{ScrapeError, ScrapeResult};
pub use session::{
    ChunkReadOutcome, LoadMoreOutcome, SearchOutcome, SearchSlot, SessionSnapshot, SessionStore,
    VisitOutcome,
};
pub use utils::validate_url;
pub use web_search::{SearchResult, SearchResults};

// MCP server
pub use mcp::{PagescoutServer, serve_stdio};
