//! Registry lookup protocols.
//!
//! The availability checker depends only on the [`RegistryLookup`] trait.
//! WHOIS over TCP port 43 is the shipped implementation.

use crate::error::SuggestError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// WHOIS protocol implementation
pub mod whois;

/// Extension to WHOIS server mappings
pub mod registry;

pub use registry::{whois_server_for, WhoisServer};
pub use whois::{classify_response, WhoisClient};

/// What a registry said about a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// The registry reports no registration
    Available,
    /// The registry returned registration data
    Registered,
    /// The response matched neither pattern set
    Inconclusive,
}

impl RegistrationStatus {
    /// Availability as reported to callers. Inconclusive answers count as
    /// available.
    pub fn is_available(&self) -> bool {
        !matches!(self, RegistrationStatus::Registered)
    }
}

/// One registry query for one domain.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<RegistrationStatus, SuggestError>;
}
