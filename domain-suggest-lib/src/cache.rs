//! Availability cache.
//!
//! The checker reads the cache before any network I/O and writes after a
//! completed lookup. The cache is an explicit object shared through
//! `Arc<dyn AvailabilityCache>`; it lives as long as its owner keeps it.

use crate::types::AvailabilityRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Storage for availability records, keyed by domain.
#[async_trait]
pub trait AvailabilityCache: Send + Sync {
    /// Return a fresh record for `domain`, if one is stored.
    async fn get(&self, domain: &str) -> Option<AvailabilityRecord>;

    /// Store `record`, replacing any previous record for the same domain.
    async fn set(&self, record: AvailabilityRecord);
}

/// Process-local cache backed by a mutex-guarded map.
///
/// Records older than the TTL are treated as missing and evicted on read.
/// With no TTL, records live as long as the cache.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, AvailabilityRecord>>,
    ttl: Option<Duration>,
}

impl InMemoryCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored records, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every record.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

#[async_trait]
impl AvailabilityCache for InMemoryCache {
    async fn get(&self, domain: &str) -> Option<AvailabilityRecord> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(domain) {
            Some(record) if !record.is_expired(self.ttl) => Some(record.clone()),
            Some(_) => {
                entries.remove(domain);
                None
            }
            None => None,
        }
    }

    async fn set(&self, record: AvailabilityRecord) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(record.domain.clone(), record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_get_and_overwrite() {
        let cache = InMemoryCache::new(None);
        assert!(cache.get("brewly.com").await.is_none());

        cache.set(AvailabilityRecord::new("brewly.com", true)).await;
        assert!(cache.get("brewly.com").await.unwrap().available);

        cache.set(AvailabilityRecord::new("brewly.com", false)).await;
        assert!(!cache.get("brewly.com").await.unwrap().available);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_records_are_evicted() {
        let cache = InMemoryCache::new(Some(Duration::from_secs(60)));
        let mut stale = AvailabilityRecord::new("old.com", true);
        stale.checked_at = Utc::now() - chrono::Duration::seconds(61);
        cache.set(stale).await;
        cache.set(AvailabilityRecord::new("fresh.com", true)).await;

        assert!(cache.get("old.com").await.is_none());
        assert!(cache.get("fresh.com").await.is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = InMemoryCache::new(None);
        tokio_test::block_on(cache.set(AvailabilityRecord::new("a.com", true)));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert!(tokio_test::block_on(cache.get("a.com")).is_none());
    }
}
