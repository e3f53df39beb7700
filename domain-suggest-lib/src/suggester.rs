//! The suggestion pipeline facade.
//!
//! `DomainSuggester` wires generation, verification and ranking together:
//!
//! 1. [`GenerationPipeline`] produces candidates (model or fallback)
//! 2. [`verify_domains`] checks them in parallel through the checker
//! 3. [`rank`] and [`paginate`] shape the result

use crate::checker::AvailabilityChecker;
use crate::concurrent::verify_domains;
use crate::error::SuggestError;
use crate::llm::{GeminiClient, TextGenerator};
use crate::pipeline::{GeneratedBatch, GenerationPipeline};
use crate::ranker::{paginate, rank};
use crate::types::{GenerationRequest, RankedResult, SuggestConfig};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Generates domain ideas and keeps the ones that are free to register.
///
/// # Example
///
/// ```rust,no_run
/// use domain_suggest_lib::{DomainSuggester, SuggestConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api_key = std::env::var("GEMINI_API_KEY").ok();
///     let suggester = DomainSuggester::from_config(SuggestConfig::default(), api_key)?;
///
///     let result = suggester
///         .generate_and_verify("organic coffee shop", "professional", &[".com", ".net"], 20)
///         .await;
///     for domain in &result.initial {
///         println!("{}", domain.domain);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DomainSuggester {
    config: SuggestConfig,
    pipeline: GenerationPipeline,
    checker: AvailabilityChecker,
}

impl DomainSuggester {
    /// Assemble a suggester from explicit collaborators.
    pub fn new(
        config: SuggestConfig,
        generator: Option<Arc<dyn TextGenerator>>,
        checker: AvailabilityChecker,
    ) -> Self {
        let pipeline = GenerationPipeline::new(generator, &config);
        Self {
            config,
            pipeline,
            checker,
        }
    }

    /// Gemini generation when `api_key` is given, fallback-only otherwise;
    /// WHOIS verification with an in-memory cache.
    pub fn from_config(
        config: SuggestConfig,
        api_key: Option<String>,
    ) -> Result<Self, SuggestError> {
        let generator: Option<Arc<dyn TextGenerator>> = match api_key {
            Some(key) if !key.trim().is_empty() => {
                Some(Arc::new(GeminiClient::from_config(&config, key)?))
            }
            _ => None,
        };
        let checker = AvailabilityChecker::from_config(&config);
        Ok(Self::new(config, generator, checker))
    }

    /// Get the current configuration.
    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// Whether a model backend is configured.
    pub fn uses_model(&self) -> bool {
        self.pipeline.has_generator()
    }

    /// Produce candidates without checking availability.
    pub async fn generate_candidates(&self, request: &GenerationRequest) -> GeneratedBatch {
        self.pipeline.run(request).await
    }

    /// Run the full pipeline for a validated request.
    pub async fn suggest(&self, request: &GenerationRequest) -> Result<RankedResult, SuggestError> {
        let started = Instant::now();

        let batch = self.pipeline.run(request).await;
        if batch.candidates.is_empty() {
            return Err(SuggestError::internal("no candidates were generated"));
        }

        let domains: Vec<String> = batch
            .candidates
            .iter()
            .map(|c| c.domain.clone())
            .collect();
        let verified = verify_domains(&self.checker, &domains, self.config.concurrency).await;

        let mut result = paginate(rank(&verified, &self.config.ranking), request.style.key());
        result.source = Some(batch.source);

        info!(
            idea = %request.idea,
            style = %request.style,
            candidates = domains.len(),
            source = %batch.source,
            available = result.total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Suggestion request complete"
        );

        Ok(result)
    }

    /// Validate raw input and run the pipeline. Never fails: problems come
    /// back as a result with `error` set, empty pages and the style preserved.
    pub async fn generate_and_verify<S: AsRef<str>>(
        &self,
        idea: &str,
        style: &str,
        extensions: &[S],
        count: usize,
    ) -> RankedResult {
        let request = match GenerationRequest::new(idea, style, extensions, count) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected suggestion request");
                return RankedResult::failure(style_label(style), e.to_string());
            }
        };

        match self.suggest(&request).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Suggestion pipeline failed");
                RankedResult::failure(request.style.key(), e.to_string())
            }
        }
    }
}

fn style_label(style: &str) -> String {
    let trimmed = style.trim();
    if trimmed.is_empty() {
        "default".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::protocols::{RegistrationStatus, RegistryLookup};
    use crate::types::{CandidateSource, LookupErrorPolicy};
    use async_trait::async_trait;

    struct AllFree;

    #[async_trait]
    impl RegistryLookup for AllFree {
        async fn lookup(&self, _domain: &str) -> Result<RegistrationStatus, SuggestError> {
            Ok(RegistrationStatus::Available)
        }
    }

    fn offline_suggester() -> DomainSuggester {
        let checker = AvailabilityChecker::new(
            Arc::new(AllFree),
            Arc::new(InMemoryCache::new(None)),
            LookupErrorPolicy::Unavailable,
        );
        DomainSuggester::new(SuggestConfig::default(), None, checker)
    }

    #[tokio::test]
    async fn test_invalid_request_becomes_error_result() {
        let result = offline_suggester()
            .generate_and_verify("", "funny", &[".com"], 10)
            .await;
        assert!(result.error);
        assert!(result.message.unwrap().contains("idea"));
        assert_eq!(result.total, 0);
        assert_eq!(result.style_used, "funny");

        let result = offline_suggester()
            .generate_and_verify("coffee", "gothic", &[".com"], 10)
            .await;
        assert!(result.error);
        assert_eq!(result.style_used, "gothic");
    }

    #[tokio::test]
    async fn test_fallback_only_pipeline() {
        let suggester = offline_suggester();
        assert!(!suggester.uses_model());

        let result = suggester
            .generate_and_verify("coffee", "pro", &[".com", ".net"], 30)
            .await;
        assert!(!result.error);
        assert_eq!(result.total, 30);
        assert_eq!(result.initial.len(), 10);
        assert_eq!(result.more.len(), 10);
        assert_eq!(result.style_used, "professional");
        assert_eq!(result.source, Some(CandidateSource::Fallback));
    }

    #[test]
    fn test_from_config_without_key() {
        let suggester = DomainSuggester::from_config(SuggestConfig::default(), None).unwrap();
        assert!(!suggester.uses_model());

        let suggester =
            DomainSuggester::from_config(SuggestConfig::default(), Some("key".to_string()))
                .unwrap();
        assert!(suggester.uses_model());
    }
}
