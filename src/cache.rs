use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task;
use tokio::time::{sleep, Duration};

/// Cache of rendered pages keyed by (document generation, week key).
/// A replaced document bumps the generation, so its pages can never be
/// served again; TTL expiry keeps dead generations from piling up.
pub struct PageCache {
    enabled: bool,
    ttl: Duration,
    inner: RwLock<HashMap<(u64, String), Arc<String>>>,
}

impl PageCache {
    pub fn new(enabled: bool, ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            enabled,
            ttl,
            inner: Default::default(),
        })
    }

    pub async fn insert(self: Arc<Self>, generation: u64, week: &str, page: String) -> Arc<String> {
        let page = Arc::new(page);
        if !self.enabled {
            return page;
        }

        let key = (generation, week.to_string());
        self.inner
            .write()
            .await
            .insert(key.clone(), Arc::clone(&page));

        let cache = Arc::clone(&self);
        task::spawn(async move {
            sleep(cache.ttl).await;
            cache.inner.write().await.remove(&key);
        });

        page
    }

    pub async fn get(&self, generation: u64, week: &str) -> Option<Arc<String>> {
        if !self.enabled {
            return None;
        }

        self.inner
            .read()
            .await
            .get(&(generation, week.to_string()))
            .map(Arc::clone)
    }
}
