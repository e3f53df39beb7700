//! Candidate generation with retry and fallback.
//!
//! Generation runs as a small state machine:
//!
//! ```text
//! Attempting(1) --rejected--> Attempting(2) --rejected--> ... Attempting(max)
//!      |                                                         |
//!   accepted                                                 rejected
//!      v                                                         v
//!    Done  <-------------------------------------------------  Fallback
//! ```
//!
//! A failure that retrying cannot fix (for example an invalid API key) skips
//! the remaining attempts. [`transition`] is pure; [`GenerationPipeline::run`]
//! drives it and performs the I/O and the back-off sleeps.

use crate::acceptance::AcceptancePolicy;
use crate::error::SuggestError;
use crate::fallback::generate_fallback;
use crate::llm::TextGenerator;
use crate::parser::{extension_histogram, parse_candidates};
use crate::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use crate::types::{Candidate, CandidateSource, GenerationRequest, SuggestConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the generation loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// Running model attempt `n` (1-based)
    Attempting(u32),
    /// Model path abandoned; the fallback generator runs next
    Fallback,
    /// Candidates are available
    Done,
}

/// What happened in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationEvent {
    /// The attempt produced an accepted batch
    Accepted,
    /// The attempt failed
    Failed { retryable: bool },
    /// The fallback generator produced its batch
    FallbackProduced,
}

/// Compute the next state. Unexpected events leave the state unchanged.
pub fn transition(
    state: GenerationState,
    event: GenerationEvent,
    max_attempts: u32,
) -> GenerationState {
    use GenerationEvent::*;
    use GenerationState::*;

    match (state, event) {
        (Attempting(_), Accepted) => Done,
        (Attempting(n), Failed { retryable: true }) if n < max_attempts => Attempting(n + 1),
        (Attempting(_), Failed { .. }) => Fallback,
        (Fallback, FallbackProduced) => Done,
        (state, _) => state,
    }
}

/// Candidates for verification and where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedBatch {
    pub candidates: Vec<Candidate>,
    pub source: CandidateSource,
}

/// Drives model attempts, acceptance and fallback for one request.
#[derive(Clone)]
pub struct GenerationPipeline {
    generator: Option<Arc<dyn TextGenerator>>,
    max_attempts: u32,
    retry_backoff: Duration,
    acceptance: AcceptancePolicy,
}

impl GenerationPipeline {
    /// Build a pipeline. With no generator every request goes straight to
    /// the fallback generator.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: &SuggestConfig) -> Self {
        Self {
            generator,
            max_attempts: config.max_attempts.max(1),
            retry_backoff: config.retry_backoff,
            acceptance: config.acceptance,
        }
    }

    /// Whether a model backend is configured.
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Produce candidates for `request`. Never fails.
    pub async fn run(&self, request: &GenerationRequest) -> GeneratedBatch {
        let prompt = build_prompt(request);
        let mut state = match self.generator {
            Some(_) => GenerationState::Attempting(1),
            None => GenerationState::Fallback,
        };
        let mut batch: Option<GeneratedBatch> = None;

        loop {
            match state {
                GenerationState::Attempting(n) => {
                    let event = match self.attempt(request, &prompt).await {
                        Ok(candidates) => {
                            info!(
                                attempt = n,
                                candidates = candidates.len(),
                                "Accepted model candidates"
                            );
                            batch = Some(GeneratedBatch {
                                candidates,
                                source: CandidateSource::Model { attempts: n },
                            });
                            GenerationEvent::Accepted
                        }
                        Err(e) => {
                            warn!(attempt = n, max_attempts = self.max_attempts, error = %e, "Generation attempt failed");
                            GenerationEvent::Failed {
                                retryable: e.is_retryable(),
                            }
                        }
                    };

                    state = transition(state, event, self.max_attempts);
                    if matches!(state, GenerationState::Attempting(_))
                        && !self.retry_backoff.is_zero()
                    {
                        tokio::time::sleep(self.retry_backoff).await;
                    }
                }
                GenerationState::Fallback => {
                    if self.generator.is_some() {
                        warn!("Model output unusable, using fallback generator");
                    } else {
                        debug!("No generator configured, using fallback generator");
                    }
                    batch = Some(GeneratedBatch {
                        candidates: generate_fallback(request),
                        source: CandidateSource::Fallback,
                    });
                    state = transition(state, GenerationEvent::FallbackProduced, self.max_attempts);
                }
                GenerationState::Done => break,
            }
        }

        batch.unwrap_or_else(|| GeneratedBatch {
            candidates: generate_fallback(request),
            source: CandidateSource::Fallback,
        })
    }

    /// One model round trip: generate, parse, validate, accept.
    async fn attempt(
        &self,
        request: &GenerationRequest,
        prompt: &str,
    ) -> Result<Vec<Candidate>, SuggestError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| SuggestError::internal("no generator configured"))?;

        let raw = generator.generate(prompt, Some(SYSTEM_INSTRUCTION)).await?;
        let candidates = parse_candidates(&raw, &request.extensions)?;
        let histogram = extension_histogram(&candidates);

        debug!(
            valid = candidates.len(),
            distribution = ?histogram,
            "Parsed model candidates"
        );

        self.acceptance
            .evaluate(
                candidates.len(),
                &histogram,
                request.count,
                request.extensions.len(),
            )
            .map_err(|rejection| SuggestError::ParseError {
                message: format!("batch rejected: {}", rejection),
                content: None,
            })?;

        Ok(candidates)
    }
}
