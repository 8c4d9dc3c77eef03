//! Shared test helpers

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use pagescout::PageDriver;

/// In-memory page driver that records whether it was released
pub struct StubPage {
    released: Arc<AtomicBool>,
}

impl StubPage {
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        (
            Self {
                released: released.clone(),
            },
            released,
        )
    }
}

impl PageDriver for StubPage {
    fn navigate<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<()>> {
        async { Ok(()) }.boxed()
    }

    fn extract_text<'a>(&'a self, _selector: &'a str) -> BoxFuture<'a, Result<String>> {
        async { Ok(String::new()) }.boxed()
    }

    fn extract_text_all<'a>(&'a self, _selector: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
        async { Ok(Vec::new()) }.boxed()
    }

    fn release(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        async move {
            self.released.store(true, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }
}

pub fn was_released(flag: &Arc<AtomicBool>) -> bool {
    flag.load(Ordering::SeqCst)
}
