//! Availability checker for single domains.
//!
//! This module provides the `AvailabilityChecker`, which answers "is this
//! domain free?" with a plain boolean. It consults the cache first, falls
//! through to a registry lookup, and resolves lookup failures through the
//! configured [`LookupErrorPolicy`].

use crate::cache::{AvailabilityCache, InMemoryCache};
use crate::protocols::{RegistryLookup, WhoisClient};
use crate::types::{AvailabilityRecord, LookupErrorPolicy, SuggestConfig};
use std::sync::Arc;
use tracing::{debug, warn};

/// Checks one domain at a time through a cache and a registry lookup.
///
/// # Example
///
/// ```rust,no_run
/// use domain_suggest_lib::{AvailabilityChecker, SuggestConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let checker = AvailabilityChecker::from_config(&SuggestConfig::default());
///     let free = checker.check("brewly.com").await;
///     println!("brewly.com available: {}", free);
/// }
/// ```
#[derive(Clone)]
pub struct AvailabilityChecker {
    lookup: Arc<dyn RegistryLookup>,
    cache: Arc<dyn AvailabilityCache>,
    error_policy: LookupErrorPolicy,
}

impl AvailabilityChecker {
    /// Create a checker from explicit collaborators.
    pub fn new(
        lookup: Arc<dyn RegistryLookup>,
        cache: Arc<dyn AvailabilityCache>,
        error_policy: LookupErrorPolicy,
    ) -> Self {
        Self {
            lookup,
            cache,
            error_policy,
        }
    }

    /// WHOIS lookups with an in-memory cache sized by `config.cache_ttl`.
    pub fn from_config(config: &SuggestConfig) -> Self {
        Self::new(
            Arc::new(WhoisClient::new()),
            Arc::new(InMemoryCache::new(config.cache_ttl)),
            config.lookup_errors,
        )
    }

    /// The cache this checker reads and writes.
    pub fn cache(&self) -> Arc<dyn AvailabilityCache> {
        self.cache.clone()
    }

    /// Whether `domain` is available. Never fails.
    ///
    /// Completed lookups are cached; failed lookups resolve through the error
    /// policy and are not cached, so the next request tries again.
    pub async fn check(&self, domain: &str) -> bool {
        if let Some(record) = self.cache.get(domain).await {
            debug!(domain = %domain, available = record.available, "Cache hit");
            return record.available;
        }

        match self.lookup.lookup(domain).await {
            Ok(status) => {
                let available = status.is_available();
                debug!(domain = %domain, status = ?status, available, "Lookup complete");
                self.cache
                    .set(AvailabilityRecord::new(domain, available))
                    .await;
                available
            }
            Err(e) => {
                let available = self.error_policy.resolve();
                warn!(
                    domain = %domain,
                    error = %e,
                    resolved_available = available,
                    "Lookup failed, applying error policy"
                );
                available
            }
        }
    }
}
