//! Chunked-content sessions and cursor search
//!
//! The core subsystem behind the incremental-browsing tools: fetched page
//! text is split into fixed-size chunks and stored in a [`SessionStore`]
//! that tracks a per-session read cursor; [`SearchSlot`] layers a resumable
//! case-insensitive substring search over the same chunk store.

pub mod chunks;
pub mod page_search;
pub mod store;

pub use chunks::{char_len, chunk_text, format_chunk};
pub use page_search::{PageMatch, SearchOutcome, SearchSlot};
pub use store::{
    ChunkReadOutcome, LoadMoreOutcome, PageSession, SessionSnapshot, SessionStore, VisitOutcome,
};
