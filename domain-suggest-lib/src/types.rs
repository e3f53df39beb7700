//! Core data types for domain suggestion.
//!
//! This module defines the request and result shapes that flow through the
//! pipeline, the policy enums callers can tune, and the pipeline configuration.

use crate::acceptance::AcceptancePolicy;
use crate::error::SuggestError;
use crate::styles::Style;
use crate::utils::{dotted_extension, normalize_extensions, sanitize_idea};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum idea length in characters, after trimming.
pub const MAX_IDEA_LEN: usize = 100;

/// Maximum number of candidates one request may ask for.
pub const MAX_COUNT: usize = 200;

/// Candidates generated per request when the caller does not say.
pub const DEFAULT_COUNT: usize = 60;

/// Default Gemini REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// A validated request to generate and verify domain names.
///
/// Construct with [`GenerationRequest::new`]; fields are public for reading
/// but a hand-built request skips validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Business idea, lowercase alphanumerics and single spaces
    pub idea: String,

    /// Tone preset
    pub style: Style,

    /// Ordered, deduplicated, dot-prefixed extensions (never empty)
    pub extensions: Vec<String>,

    /// Number of candidates to generate
    pub count: usize,
}

impl GenerationRequest {
    /// Validate and normalize raw request input.
    ///
    /// The idea is trimmed and must be 1-100 characters; it is then reduced
    /// to alphanumerics and spaces. The style key must be known (empty means
    /// `default`). Extensions are normalized; an empty list selects the
    /// default set. `count` must be in `1..=200`.
    pub fn new<S: AsRef<str>>(
        idea: &str,
        style: &str,
        extensions: &[S],
        count: usize,
    ) -> Result<Self, SuggestError> {
        let trimmed = idea.trim();
        let length = trimmed.chars().count();
        if length == 0 || length > MAX_IDEA_LEN {
            return Err(SuggestError::invalid_request(
                "idea",
                format!("must be 1-{} characters", MAX_IDEA_LEN),
            ));
        }

        let sanitized = sanitize_idea(trimmed);
        if sanitized.is_empty() {
            return Err(SuggestError::invalid_request(
                "idea",
                "must contain at least one letter or digit",
            ));
        }

        let style = Style::from_key(style)?;
        let extensions = normalize_extensions(extensions)?;

        if count == 0 || count > MAX_COUNT {
            return Err(SuggestError::invalid_request(
                "count",
                format!("must be between 1 and {}", MAX_COUNT),
            ));
        }

        Ok(Self {
            idea: sanitized,
            style,
            extensions,
            count,
        })
    }
}

/// One proposed domain name: a base label plus one allowed extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub domain: String,
}

impl Candidate {
    pub fn new<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Dot-prefixed extension of this candidate.
    pub fn extension(&self) -> String {
        dotted_extension(&self.domain)
    }
}

/// Where the verified candidates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum CandidateSource {
    /// Accepted model output, on the given attempt number
    Model { attempts: u32 },
    /// Deterministic fallback generator
    Fallback,
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSource::Model { attempts } => write!(f, "model (attempt {})", attempts),
            CandidateSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Cached outcome of one availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub domain: String,
    pub available: bool,
    pub checked_at: DateTime<Utc>,
}

impl AvailabilityRecord {
    pub fn new<D: Into<String>>(domain: D, available: bool) -> Self {
        Self {
            domain: domain.into(),
            available,
            checked_at: Utc::now(),
        }
    }

    /// Whether this record is older than `ttl`. `None` never expires.
    pub fn is_expired(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            None => false,
            Some(ttl) => {
                let age = Utc::now().signed_duration_since(self.checked_at);
                // Negative ages (clock moved backwards) count as fresh.
                age.to_std().map(|age| age >= ttl).unwrap_or(false)
            }
        }
    }
}

/// A domain confirmed available, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableDomain {
    pub domain: String,
    pub status: String,
}

impl AvailableDomain {
    pub fn new<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
            status: "available".to_string(),
        }
    }
}

/// Final result of one request: available domains split into two pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// First page (at most 10)
    pub initial: Vec<AvailableDomain>,

    /// Second page (at most 10)
    pub more: Vec<AvailableDomain>,

    /// Number of available domains found, including ones past the second page
    pub total: usize,

    /// Style key the request ran with
    pub style_used: String,

    /// Set when the pipeline could not run
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,

    /// Human-readable failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Which generator produced the verified candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CandidateSource>,
}

impl RankedResult {
    /// Structured failure result: empty pages, zero total.
    pub fn failure<S: Into<String>, M: Into<String>>(style_used: S, message: M) -> Self {
        Self {
            initial: Vec::new(),
            more: Vec::new(),
            total: 0,
            style_used: style_used.into(),
            error: true,
            message: Some(message.into()),
            source: None,
        }
    }
}

/// How a failed lookup (timeout, network error) resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupErrorPolicy {
    /// Treat the domain as available (optimistic)
    Available,
    /// Treat the domain as taken (pessimistic)
    #[default]
    Unavailable,
}

impl LookupErrorPolicy {
    /// Parse `available` / `unavailable` (also `optimistic` / `pessimistic`).
    pub fn from_key(key: &str) -> Result<Self, SuggestError> {
        match key.trim().to_lowercase().as_str() {
            "available" | "optimistic" => Ok(Self::Available),
            "unavailable" | "pessimistic" => Ok(Self::Unavailable),
            other => Err(SuggestError::config(format!(
                "unknown lookup error policy '{}', expected 'available' or 'unavailable'",
                other
            ))),
        }
    }

    /// The availability a failed lookup resolves to.
    pub fn resolve(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Ordering applied to available domains before pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RankingRule {
    /// Plain lexicographic order
    #[default]
    Lexicographic,
    /// Preferred extensions first, in list order, then lexicographic
    ExtensionPriority(Vec<String>),
}

/// Configuration for the suggestion pipeline.
///
/// Every collaborator reads its knobs from here; build with `Default` and
/// the `with_*` methods.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Maximum number of concurrent availability checks
    /// Default: 15, Range: 1-50
    pub concurrency: usize,

    /// Generation attempts before falling back
    /// Default: 3
    pub max_attempts: u32,

    /// Wait between failed generation attempts
    /// Default: 1.5 seconds
    pub retry_backoff: Duration,

    /// When a parsed model batch is good enough to use
    pub acceptance: AcceptancePolicy,

    /// Resolution of failed lookups
    /// Default: unavailable
    pub lookup_errors: LookupErrorPolicy,

    /// How long cached availability stays valid; `None` keeps it for the
    /// life of the cache
    /// Default: 24 hours
    pub cache_ttl: Option<Duration>,

    /// Result ordering
    pub ranking: RankingRule,

    /// Generation model name
    pub model: String,

    /// Timeout for one generation call
    /// Default: 30 seconds
    pub generation_timeout: Duration,

    /// Base URL of the generation service
    pub api_base_url: String,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            concurrency: 15,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(1500),
            acceptance: AcceptancePolicy::default(),
            lookup_errors: LookupErrorPolicy::default(),
            cache_ttl: Some(Duration::from_secs(24 * 60 * 60)),
            ranking: RankingRule::default(),
            model: DEFAULT_MODEL.to_string(),
            generation_timeout: Duration::from_secs(30),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl SuggestConfig {
    /// Set verification concurrency, clamped to 1-50.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 50);
        self
    }

    /// Set the generation attempt budget (at least 1).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_lookup_errors(mut self, policy: LookupErrorPolicy) -> Self {
        self.lookup_errors = policy;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingRule) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_model<M: Into<String>>(mut self, model: M) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_api_base_url<U: Into<String>>(mut self, url: U) -> Self {
        self.api_base_url = url.into();
        self
    }
}
