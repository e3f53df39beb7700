//! # Domain Suggest Library
//!
//! Turns a business idea into brandable domain names and keeps the ones
//! that are still free to register.
//!
//! A language model proposes candidates; when it is unavailable or its output
//! is unusable, a deterministic affix generator takes over. Every candidate is
//! then checked over WHOIS in parallel, and the available ones are ranked and
//! split into two pages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_suggest_lib::{DomainSuggester, SuggestConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let suggester = DomainSuggester::from_config(SuggestConfig::default(), None)?;
//!     let result = suggester
//!         .generate_and_verify("organic coffee shop", "professional", &[".com", ".ma"], 20)
//!         .await;
//!
//!     println!("{} available, style {}", result.total, result.style_used);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Model generation**: Gemini `generateContent` with retries and batch acceptance
//! - **Deterministic fallback**: style-specific affixes over idea keywords
//! - **WHOIS verification**: per-TLD servers, IANA referral discovery, rate-limit retry
//! - **Bounded concurrency**: parallel checks with a configurable ceiling
//! - **Caching**: availability records with a configurable lifetime

// Re-export main public API types and functions
// This makes them available as domain_suggest_lib::TypeName
pub use acceptance::{AcceptancePolicy, Rejection};
pub use cache::{AvailabilityCache, InMemoryCache};
pub use checker::AvailabilityChecker;
pub use concurrent::verify_domains;
pub use config::{
    load_env_config, parse_duration_string, parse_ranking, ConfigManager, DefaultsConfig,
    EnvConfig, FileConfig, GenerationConfig, VerificationConfig,
};
pub use error::SuggestError;
pub use llm::{GeminiClient, TextGenerator};
pub use pipeline::{transition, GeneratedBatch, GenerationEvent, GenerationPipeline, GenerationState};
pub use protocols::{
    classify_response, whois_server_for, RegistrationStatus, RegistryLookup, WhoisClient,
    WhoisServer,
};
pub use ranker::{paginate, rank, PAGE_SIZE};
pub use styles::{available_styles, Style};
pub use suggester::DomainSuggester;
pub use types::{
    AvailabilityRecord, AvailableDomain, Candidate, CandidateSource, GenerationRequest,
    LookupErrorPolicy, RankedResult, RankingRule, SuggestConfig, DEFAULT_COUNT,
    MAX_COUNT, MAX_IDEA_LEN,
};
pub use utils::{
    default_extensions, extract_extension, normalize_extension, normalize_extensions,
    DEFAULT_EXTENSIONS, MAX_EXTENSIONS,
};

// Public modules
pub mod fallback;
pub mod parser;
pub mod prompt;

// Internal modules - reachable through the re-exports above
mod acceptance;
mod cache;
mod checker;
mod concurrent;
mod config;
mod error;
mod llm;
mod pipeline;
mod protocols;
mod ranker;
mod styles;
mod suggester;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SuggestError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Information about the library build, for `--version` style output.
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub styles: Vec<&'static str>,
}

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        styles: available_styles(),
    }
}
