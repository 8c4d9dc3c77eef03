//! Session registry for fetched-document state
//!
//! Owns the lifecycle of chunked page content across tool calls: creation on
//! `visit_page`, linear reads via the per-session cursor, random-access chunk
//! reads, and eviction. Expired sessions are unreachable immediately (the
//! timeout is checked on every access) and their memory is reclaimed by a
//! sweep that runs on access and from a background task. Insertion past
//! `max_sessions` evicts the least recently used session.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::chunks::{char_len, chunk_text, format_chunk};
use crate::browser::PageDriver;
use crate::config::ScoutConfig;
use crate::error::{ScrapeError, ScrapeResult};

/// State captured for one fetched document
///
/// The chunk list is immutable after creation; only the cursor and the
/// timestamps move. The attached page handle, when present, is released
/// best-effort on removal.
pub struct PageSession {
    id: String,
    url: String,
    chunks: Arc<Vec<String>>,
    cursor: usize,
    page: Option<Box<dyn PageDriver>>,
    created_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

impl PageSession {
    /// Source URL this session was created from
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Creation timestamp
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Result of storing a freshly fetched document
#[derive(Debug, Clone)]
pub struct VisitOutcome {
    pub session_id: String,
    /// First chunk, already formatted for delivery
    pub content: String,
    pub has_more_chunks: bool,
    pub total_chunks: usize,
}

/// Result of a linear `load_more` read
#[derive(Debug, Clone)]
pub enum LoadMoreOutcome {
    /// The cursor advanced and the next chunk is available
    Next {
        content: String,
        chunk_index: usize,
        has_more_chunks: bool,
    },
    /// The cursor is already at the last chunk; terminal, not an error
    Complete { chunk_index: usize },
}

/// Result of a random-access chunk read
#[derive(Debug, Clone)]
pub struct ChunkReadOutcome {
    pub chunk_index: usize,
    pub content: String,
    pub total_chunks: usize,
    /// Chunk length in characters
    pub chunk_size: usize,
}

/// Cheap handle onto a session's immutable chunk list
///
/// Used by the page-search subsystem, which re-concatenates the chunks on
/// every call rather than caching the joined text.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub chunks: Arc<Vec<String>>,
}

struct StoreInner {
    sessions: HashMap<String, PageSession>,
    /// The session implicitly targeted by load_more / search / read_chunk.
    /// Left dangling when that session is evicted, so later calls report
    /// which session disappeared rather than a generic "no session".
    current: Option<String>,
}

/// Manager for chunked page-content sessions
///
/// Uses `tokio::sync::Mutex` for async-safe access; both the session map and
/// the current-session pointer live behind the same lock so interleaved
/// calls cannot observe a half-updated pair.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreInner>>,
    config: ScoutConfig,
}

impl SessionStore {
    #[must_use]
    pub fn new(config: ScoutConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                sessions: HashMap::new(),
                current: None,
            })),
            config,
        }
    }

    /// Chunk `text`, store it as a new session, and make it current
    ///
    /// Evicts expired sessions first, then least-recently-used sessions while
    /// the store is at capacity. Returns the formatted first chunk.
    pub async fn create_session(
        &self,
        url: &str,
        text: &str,
        page: Option<Box<dyn PageDriver>>,
    ) -> VisitOutcome {
        let chunks = chunk_text(text, self.config.chunk_chars);
        let total_chunks = chunks.len();
        let content = format_chunk(0, &chunks[0], self.config.chunk_chars);
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let session = PageSession {
            id: id.clone(),
            url: url.to_string(),
            chunks: Arc::new(chunks),
            cursor: 0,
            page,
            created_at: now,
            last_used: now,
        };

        let removed = {
            let mut inner = self.inner.lock().await;
            let mut removed = self.sweep_locked(&mut inner);

            while inner.sessions.len() >= self.config.max_sessions {
                let Some(oldest) = inner
                    .sessions
                    .values()
                    .min_by_key(|s| s.last_used)
                    .map(|s| s.id.clone())
                else {
                    break;
                };
                if let Some(evicted) = inner.sessions.remove(&oldest) {
                    debug!(session_id = %oldest, "Evicting least recently used session");
                    removed.push(evicted);
                }
            }

            inner.sessions.insert(id.clone(), session);
            inner.current = Some(id.clone());
            removed
        };
        release_all(removed).await;

        debug!(session_id = %id, total_chunks, "Created session");
        VisitOutcome {
            session_id: id,
            content,
            has_more_chunks: total_chunks > 1,
            total_chunks,
        }
    }

    /// Advance the current session's cursor and return the next chunk
    ///
    /// Reading past the last chunk is a terminal [`LoadMoreOutcome::Complete`],
    /// not an error.
    pub async fn load_more(&self) -> ScrapeResult<LoadMoreOutcome> {
        let (outcome, removed) = {
            let mut inner = self.inner.lock().await;
            let removed = self.sweep_locked(&mut inner);
            let outcome = self.current_mut(&mut inner).map(|session| {
                let next = session.cursor + 1;
                if next < session.chunks.len() {
                    session.cursor = next;
                    LoadMoreOutcome::Next {
                        content: format_chunk(next, &session.chunks[next], self.config.chunk_chars),
                        chunk_index: next,
                        has_more_chunks: next < session.chunks.len() - 1,
                    }
                } else {
                    LoadMoreOutcome::Complete {
                        chunk_index: session.cursor,
                    }
                }
            });
            (outcome, removed)
        };
        release_all(removed).await;
        outcome
    }

    /// Read an arbitrary chunk from the current session without moving the cursor
    pub async fn read_chunk(&self, index: i64) -> ScrapeResult<ChunkReadOutcome> {
        let (outcome, removed) = {
            let mut inner = self.inner.lock().await;
            let removed = self.sweep_locked(&mut inner);
            let outcome = self.current_mut(&mut inner).and_then(|session| {
                let total_chunks = session.chunks.len();
                if index < 0 || index as usize >= total_chunks {
                    return Err(ScrapeError::ChunkOutOfRange {
                        index,
                        max: total_chunks - 1,
                    });
                }
                let content = session.chunks[index as usize].clone();
                let chunk_size = char_len(&content);
                Ok(ChunkReadOutcome {
                    chunk_index: index as usize,
                    content,
                    total_chunks,
                    chunk_size,
                })
            });
            (outcome, removed)
        };
        release_all(removed).await;
        outcome
    }

    /// Snapshot the current session's chunk list for searching
    pub async fn snapshot_current(&self) -> ScrapeResult<SessionSnapshot> {
        let (outcome, removed) = {
            let mut inner = self.inner.lock().await;
            let removed = self.sweep_locked(&mut inner);
            let outcome = self.current_mut(&mut inner).map(|session| SessionSnapshot {
                session_id: session.id.clone(),
                chunks: Arc::clone(&session.chunks),
            });
            (outcome, removed)
        };
        release_all(removed).await;
        outcome
    }

    /// Snapshot a specific session's chunk list (search continuation path)
    pub async fn snapshot(&self, session_id: &str) -> ScrapeResult<SessionSnapshot> {
        let (outcome, removed) = {
            let mut inner = self.inner.lock().await;
            let removed = self.sweep_locked(&mut inner);
            let outcome = match inner.sessions.get_mut(session_id) {
                Some(session) => {
                    session.last_used = Utc::now();
                    Ok(SessionSnapshot {
                        session_id: session.id.clone(),
                        chunks: Arc::clone(&session.chunks),
                    })
                }
                None => Err(ScrapeError::SessionNotFound(session_id.to_string())),
            };
            (outcome, removed)
        };
        release_all(removed).await;
        outcome
    }

    /// Remove a session, releasing any attached page handle best-effort
    ///
    /// Returns whether the session existed.
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let session = {
            let mut inner = self.inner.lock().await;
            inner.sessions.remove(session_id)
        };
        match session {
            Some(session) => {
                release_all(vec![session]).await;
                true
            }
            None => false,
        }
    }

    /// Remove all sessions idle past the configured timeout
    ///
    /// Returns the number of sessions removed.
    pub async fn sweep_expired(&self) -> usize {
        let removed = {
            let mut inner = self.inner.lock().await;
            self.sweep_locked(&mut inner)
        };
        let count = removed.len();
        if count > 0 {
            debug!("Swept {count} expired sessions");
        }
        release_all(removed).await;
        count
    }

    /// Start the background eviction sweep (call once at initialization)
    pub fn start_cleanup_task(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(store.config.sweep_interval);
            loop {
                interval.tick().await;
                store.sweep_expired().await;
            }
        });
    }

    /// Drain every session and release attached handles
    ///
    /// Called during server shutdown so browser pages are closed before the
    /// process exits.
    pub async fn shutdown(&self) {
        let removed: Vec<PageSession> = {
            let mut inner = self.inner.lock().await;
            inner.current = None;
            inner.sessions.drain().map(|(_, session)| session).collect()
        };
        let count = removed.len();
        release_all(removed).await;
        info!("Session store shutdown complete: {count} sessions released");
    }

    /// Number of live sessions (for monitoring and tests)
    pub async fn session_count(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    /// Resolve the current session, refreshing its `last_used` timestamp
    fn current_mut<'a>(&self, inner: &'a mut StoreInner) -> ScrapeResult<&'a mut PageSession> {
        let id = inner.current.clone().ok_or(ScrapeError::NoActiveSession)?;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or(ScrapeError::SessionNotFound(id))?;
        session.last_used = Utc::now();
        Ok(session)
    }

    /// Remove expired sessions from the map; callers release the returned
    /// handles after dropping the lock
    fn sweep_locked(&self, inner: &mut StoreInner) -> Vec<PageSession> {
        let cutoff =
            TimeDelta::from_std(self.config.session_timeout).unwrap_or(TimeDelta::MAX);
        let now = Utc::now();

        let expired: Vec<String> = inner
            .sessions
            .iter()
            .filter(|(_, session)| now.signed_duration_since(session.last_used) > cutoff)
            .map(|(id, _)| id.clone())
            .collect();

        expired
            .into_iter()
            .filter_map(|id| inner.sessions.remove(&id))
            .collect()
    }
}

/// Release page handles outside the store lock; failures are swallowed
async fn release_all(sessions: Vec<PageSession>) {
    for mut session in sessions {
        if let Some(page) = session.page.take() {
            if let Err(e) = page.release().await {
                debug!(session_id = %session.id, "Failed to release page handle: {e}");
            }
        }
    }
}
