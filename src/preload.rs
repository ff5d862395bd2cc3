//! Preload cache for gallery items.
//!
//! One [`PreloadCache`] is created per page session and handed to whatever
//! needs gallery data. Clones share state.
//!
//! # Guarantees
//!
//! - [`snapshot`](PreloadCache::snapshot) never waits on I/O and never fails.
//! - At most one fetch is in flight per cache. Callers that arrive while a
//!   load is pending await the same shared result, so a failed load returns
//!   `[]` to all of them.
//! - The cache is written once, on the first successful load, and never
//!   invalidated afterwards.
//! - A failed load leaves the cache empty and clears the in-flight marker.
//!   Nothing retries on its own; the next `ensure_loaded` call tries again.
//!
//! The load runs as a spawned task. It completes and writes the cache even if
//! every caller has stopped awaiting it, which is why `ensure_loaded` needs a
//! tokio runtime.

use crate::content::ContentSource;
use crate::types::GalleryItem;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

type SharedLoad = Shared<BoxFuture<'static, Arc<[GalleryItem]>>>;

/// Point-in-time view of the cache.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub images: Arc<[GalleryItem]>,
}

#[derive(Clone)]
pub struct PreloadCache {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ContentSource>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    images: Option<Arc<[GalleryItem]>>,
    in_flight: Option<SharedLoad>,
}

impl PreloadCache {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Current cached items; empty until the first successful load.
    pub fn snapshot(&self) -> Snapshot {
        let images = self.inner.lock().images.clone().unwrap_or_else(empty);
        Snapshot { images }
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.lock().images.is_some()
    }

    /// Return cached items, loading them first if needed.
    ///
    /// Never fails: a fetch error resolves to an empty sequence.
    pub async fn ensure_loaded(&self) -> Arc<[GalleryItem]> {
        let load = {
            let mut state = self.inner.lock();
            if let Some(images) = &state.images {
                return Arc::clone(images);
            }
            match &state.in_flight {
                Some(load) => load.clone(),
                None => {
                    let load = self.start_load();
                    state.in_flight = Some(load.clone());
                    load
                }
            }
        };
        load.await
    }

    /// Spawn the fetch. Called with the state lock held; the task only takes
    /// the lock after its fetch completes.
    fn start_load(&self) -> SharedLoad {
        debug!("starting gallery preload");
        let task = tokio::spawn(Arc::clone(&self.inner).load());
        let inner = Arc::clone(&self.inner);
        async move {
            match task.await {
                Ok(images) => images,
                Err(err) => {
                    warn!(error = %err, "gallery preload task aborted");
                    inner.lock().in_flight = None;
                    empty()
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn load(self: Arc<Self>) -> Arc<[GalleryItem]> {
        let result = self.source.fetch_gallery().await;
        let mut state = self.lock();
        state.in_flight = None;
        match result {
            Ok(items) => {
                debug!(count = items.len(), "gallery preload complete");
                let images: Arc<[GalleryItem]> = items.into();
                state.images = Some(Arc::clone(&images));
                images
            }
            Err(err) => {
                warn!(error = %err, "gallery preload failed; showing no items");
                empty()
            }
        }
    }
}

fn empty() -> Arc<[GalleryItem]> {
    Arc::from(Vec::new())
}
