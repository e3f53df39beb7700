//! Bounded parallel verification.
//!
//! Every unique domain gets its own spawned checker task; at most
//! `concurrency` of them are in flight at once. A task that panics is
//! recorded as unavailable and does not disturb its siblings.

use crate::checker::AvailabilityChecker;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, error};

/// Check every domain and return `domain -> available`.
///
/// Duplicates in `domains` are checked once. Completion order is not
/// preserved; the map holds one entry per unique input.
pub async fn verify_domains(
    checker: &AvailabilityChecker,
    domains: &[String],
    concurrency: usize,
) -> HashMap<String, bool> {
    let mut seen = HashSet::new();
    let unique: Vec<String> = domains
        .iter()
        .filter(|d| seen.insert(d.as_str()))
        .cloned()
        .collect();

    let started = Instant::now();
    let total = unique.len();

    let tasks = unique.into_iter().map(|domain| {
        let checker = checker.clone();
        let task_domain = domain.clone();
        let handle = tokio::spawn(async move { checker.check(&task_domain).await });
        async move { (domain, handle.await) }
    });

    let results: HashMap<String, bool> = stream::iter(tasks)
        .buffer_unordered(concurrency.max(1))
        .map(|(domain, joined)| match joined {
            Ok(available) => (domain, available),
            Err(e) => {
                error!(domain = %domain, error = %e, "Verification task failed, marking unavailable");
                (domain, false)
            }
        })
        .collect()
        .await;

    debug!(
        checked = total,
        available = results.values().filter(|&&v| v).count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Verification batch complete"
    );

    results
}
