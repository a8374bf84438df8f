use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::debug;

/// Time-boxed cache for a single rendered response.
///
/// Holds the home-feed body for a fixed window. Within the window every
/// request is served the identical bytes regardless of writes committed in
/// the interim; after the window the next request regenerates the entry.
pub struct PageCache {
    ttl: Duration,
    slot: RwLock<Option<CachedPage>>,
}

#[derive(Clone)]
struct CachedPage {
    content_type: String,
    body: Vec<u8>,
    stored_at: Instant,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Fetch the cached response if it is still within its window.
    pub fn get(&self) -> Option<(String, Vec<u8>)> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!("home page cache HIT");
                Some((entry.content_type.clone(), entry.body.clone()))
            }
            Some(_) => {
                debug!("home page cache EXPIRED");
                None
            }
            None => {
                debug!("home page cache MISS");
                None
            }
        }
    }

    /// Replace the cached response, restarting its window.
    pub fn store(&self, content_type: &str, body: &[u8]) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(CachedPage {
            content_type: content_type.to_string(),
            body: body.to_vec(),
            stored_at: Instant::now(),
        });
        debug!(bytes = body.len(), "home page cache WRITE");
    }

    /// Drop the cached response.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}
