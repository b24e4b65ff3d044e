//! Bounded cache of constructed models.
//!
//! Loading a model means pulling hundreds of megabytes into memory, so the
//! cache is explicitly bounded: at most `capacity` entries (one, by default)
//! are resident. Lookup, eviction, construction, and insertion happen under
//! a single async lock, so concurrent requests for the same key construct
//! once and the bound holds at every point in time.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

/// A bounded, keyed cache handing out shared instances.
pub struct ModelCache<T> {
    capacity: usize,
    entries: Mutex<Vec<(String, Arc<T>)>>,
}

impl<T> ModelCache<T> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Return the cached instance for `key`, constructing it with `loader`
    /// on a miss.
    ///
    /// A hit returns a clone of the stored `Arc`, so repeated calls with the
    /// same key observe the identical instance. On a miss the oldest entry
    /// is evicted first when the cache is full, keeping at most `capacity`
    /// models resident even while the new one is being constructed. A failed
    /// construction inserts nothing.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, loader: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut entries = self.entries.lock().await;

        if let Some((_, cached)) = entries.iter().find(|(k, _)| k == key) {
            tracing::debug!("Cache hit for '{key}'");
            return Ok(Arc::clone(cached));
        }

        while entries.len() >= self.capacity {
            let (evicted, _) = entries.remove(0);
            tracing::info!("Evicting model '{evicted}' from cache");
        }

        let instance = Arc::new(loader().await?);
        entries.push((key.to_string(), Arc::clone(&instance)));
        Ok(instance)
    }

    /// Number of resident entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Whether `key` is currently resident.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.iter().any(|(k, _)| k == key)
    }

    /// Drop all entries.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counted(
        cache: &ModelCache<String>,
        key: &str,
        counter: &AtomicUsize,
    ) -> Arc<String> {
        cache
            .get_or_load(key, || async {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(format!("model-{key}"))
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn hit_returns_identical_instance() {
        let cache = ModelCache::new(1);
        let loads = AtomicUsize::new(0);

        let first = load_counted(&cache, "a", &loads).await;
        let second = load_counted(&cache, "a", &loads).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn capacity_one_evicts_previous_entry() {
        let cache = ModelCache::new(1);
        let loads = AtomicUsize::new(0);

        load_counted(&cache, "a", &loads).await;
        load_counted(&cache, "b", &loads).await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.contains("b").await);
        assert!(!cache.contains("a").await);

        // Going back to "a" is a fresh construction
        load_counted(&cache, "a", &loads).await;
        assert_eq!(loads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn capacity_two_keeps_both() {
        let cache = ModelCache::new(2);
        let loads = AtomicUsize::new(0);

        let a = load_counted(&cache, "a", &loads).await;
        load_counted(&cache, "b", &loads).await;

        assert_eq!(cache.len().await, 2);
        let a_again = load_counted(&cache, "a", &loads).await;
        assert!(Arc::ptr_eq(&a, &a_again));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let cache: ModelCache<String> = ModelCache::new(0);
        assert_eq!(cache.capacity(), 1);
    }

    #[tokio::test]
    async fn failed_load_inserts_nothing() {
        let cache: ModelCache<String> = ModelCache::new(1);

        let result = cache
            .get_or_load("a", || async { Err::<String, _>("boom") })
            .await;

        assert_eq!(result.unwrap_err(), "boom");
        assert!(cache.is_empty().await);

        // The next attempt runs the loader again
        let ok = cache
            .get_or_load("a", || async { Ok::<_, &str>("recovered".to_string()) })
            .await
            .unwrap();
        assert_eq!(*ok, "recovered");
    }

    #[tokio::test]
    async fn concurrent_requests_construct_once() {
        let cache = ModelCache::new(1);
        let loads = AtomicUsize::new(0);

        let (first, second) = tokio::join!(
            load_counted(&cache, "a", &loads),
            load_counted(&cache, "a", &loads),
        );

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let cache = ModelCache::new(2);
        let loads = AtomicUsize::new(0);

        load_counted(&cache, "a", &loads).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
