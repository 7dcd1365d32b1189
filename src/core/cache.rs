//! Render cache with typed invalidation
//!
//! Rendered pages are stored under a [`CacheTag`] naming the resource they
//! were built from, plus a variant key (query string, page number...).
//! Mutations invalidate by tag, never by URL.
//!
//! ```rust,ignore
//! let html = cache.get_or_render(CacheTag::InvoiceList, "q=&page=1", || render()).await?;
//! // after a write:
//! cache.invalidate(CacheTag::InvoiceList);
//! ```

use crate::core::error::{DashboardResult, StorageError};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// Identity of a cached resource view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// The `/dashboard/invoices` listing, every query/page variant
    InvoiceList,
}

impl CacheTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTag::InvoiceList => "invoice-list",
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    pages: HashMap<CacheTag, HashMap<String, String>>,
    /// Bumped on every invalidation; a render that started under an older
    /// generation is not stored.
    generations: HashMap<CacheTag, u64>,
}

/// Shared cache of rendered pages
///
/// Cheap to clone; all clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    entries: Arc<RwLock<Entries>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: CacheTag, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        entries.pages.get(&tag)?.get(key).cloned()
    }

    pub fn generation(&self, tag: CacheTag) -> u64 {
        self.entries
            .read()
            .map(|entries| entries.generations.get(&tag).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Store a rendered page unless the tag was invalidated since
    /// `generation` was read.
    pub fn insert(&self, tag: CacheTag, key: impl Into<String>, generation: u64, html: String) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        if entries.generations.get(&tag).copied().unwrap_or(0) != generation {
            tracing::debug!(tag = tag.as_str(), "Discarding render from a stale generation");
            return;
        }
        entries.pages.entry(tag).or_default().insert(key.into(), html);
    }

    /// Return the cached page or render, store and return it.
    pub async fn get_or_render<F, Fut>(
        &self,
        tag: CacheTag,
        key: &str,
        render: F,
    ) -> DashboardResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DashboardResult<String>>,
    {
        if let Some(html) = self.get(tag, key) {
            tracing::debug!(tag = tag.as_str(), key, "Render cache hit");
            return Ok(html);
        }

        tracing::debug!(tag = tag.as_str(), key, "Render cache miss");
        let generation = self.generation(tag);
        let html = render().await?;
        self.insert(tag, key, generation, html.clone());
        Ok(html)
    }

    /// Mark every cached variant of `tag` as stale.
    pub fn invalidate(&self, tag: CacheTag) -> DashboardResult<()> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Unavailable {
            backend: "render cache".to_string(),
        })?;
        let dropped = entries.pages.remove(&tag).map(|pages| pages.len()).unwrap_or(0);
        *entries.generations.entry(tag).or_insert(0) += 1;

        tracing::debug!(tag = tag.as_str(), dropped, "Render cache invalidated");
        Ok(())
    }

    pub fn len(&self, tag: CacheTag) -> usize {
        self.entries
            .read()
            .map(|entries| entries.pages.get(&tag).map(HashMap::len).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, tag: CacheTag) -> bool {
        self.len(tag) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = RenderCache::new();
        let renders = AtomicUsize::new(0);

        for _ in 0..3 {
            let html = cache
                .get_or_render(CacheTag::InvoiceList, "page=1", || async {
                    renders.fetch_add(1, Ordering::SeqCst);
                    Ok("<p>list</p>".to_string())
                })
                .await
                .unwrap();
            assert_eq!(html, "<p>list</p>");
        }

        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(CacheTag::InvoiceList), 1);
    }

    #[tokio::test]
    async fn test_invalidate_drops_every_variant() {
        let cache = RenderCache::new();
        for key in ["page=1", "page=2", "query=lee"] {
            cache
                .get_or_render(CacheTag::InvoiceList, key, || async { Ok(key.to_string()) })
                .await
                .unwrap();
        }
        assert_eq!(cache.len(CacheTag::InvoiceList), 3);

        cache.invalidate(CacheTag::InvoiceList).unwrap();

        assert!(cache.is_empty(CacheTag::InvoiceList));
        assert!(cache.get(CacheTag::InvoiceList, "page=1").is_none());
    }

    #[test]
    fn test_stale_generation_is_not_stored() {
        let cache = RenderCache::new();
        let generation = cache.generation(CacheTag::InvoiceList);
        cache.invalidate(CacheTag::InvoiceList).unwrap();

        cache.insert(CacheTag::InvoiceList, "page=1", generation, "old".to_string());

        assert!(cache.get(CacheTag::InvoiceList, "page=1").is_none());
    }

    #[tokio::test]
    async fn test_render_error_is_not_cached() {
        let cache = RenderCache::new();
        let result = cache
            .get_or_render(CacheTag::InvoiceList, "page=1", || async {
                Err(crate::core::error::DashboardError::Internal("boom".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty(CacheTag::InvoiceList));
    }
}
