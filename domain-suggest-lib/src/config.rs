//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, reading `DS_*`
//! environment variables, and merging layers with proper precedence rules.

use crate::acceptance::AcceptancePolicy;
use crate::error::SuggestError;
use crate::types::{LookupErrorPolicy, RankingRule, SuggestConfig};
use crate::utils::normalize_extension;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration loaded from TOML files.
///
/// This represents the structure of configuration files that users can create
/// to set default request values and tune the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Model and retry settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationConfig>,

    /// Availability checking and ranking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationConfig>,
}

/// Default request values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default style key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Default extension list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,

    /// Default number of candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

/// Generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Wait between attempts (as string, e.g., "1500ms", "2s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_backoff: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_count_ratio: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_count_floor: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_distinct_extensions: Option<usize>,
}

/// Verification and ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerificationConfig {
    /// Cache lifetime (e.g. "24h"), or "none" to keep records for the process lifetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<String>,

    /// "available" or "unavailable"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_errors: Option<String>,

    /// "lexicographic" or "extension-priority"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<String>,

    /// Extension order used by "extension-priority"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_extensions: Option<Vec<String>>,
}

impl FileConfig {
    /// Layer this file's pipeline settings over `config`.
    ///
    /// Request defaults (`style`, `extensions`, `count`) are left to the
    /// caller; everything else that is set here overrides `config`.
    pub fn apply_to(&self, mut config: SuggestConfig) -> Result<SuggestConfig, SuggestError> {
        if let Some(concurrency) = self.defaults.as_ref().and_then(|d| d.concurrency) {
            config = config.with_concurrency(concurrency);
        }

        if let Some(generation) = &self.generation {
            if let Some(model) = &generation.model {
                config = config.with_model(model.clone());
            }
            if let Some(attempts) = generation.max_attempts {
                config = config.with_max_attempts(attempts);
            }
            if let Some(backoff) = &generation.retry_backoff {
                config = config.with_retry_backoff(parse_duration_field("retry_backoff", backoff)?);
            }

            let mut acceptance = config.acceptance;
            if let Some(ratio) = generation.min_count_ratio {
                acceptance.min_count_ratio = ratio;
            }
            if let Some(floor) = generation.min_count_floor {
                acceptance.min_count_floor = floor;
            }
            if let Some(distinct) = generation.min_distinct_extensions {
                acceptance.min_distinct_extensions = distinct;
            }
            config = config.with_acceptance(acceptance);
        }

        if let Some(verification) = &self.verification {
            if let Some(ttl) = &verification.cache_ttl {
                config = config.with_cache_ttl(parse_cache_ttl(ttl)?);
            }
            if let Some(policy) = &verification.lookup_errors {
                config = config.with_lookup_errors(LookupErrorPolicy::from_key(policy)?);
            }
            if let Some(ranking) = &verification.ranking {
                let preferred = verification.preferred_extensions.clone().unwrap_or_default();
                config = config.with_ranking(parse_ranking(ranking, &preferred)?);
            }
        }

        Ok(config)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which files were loaded
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed and validated configuration, or an error if the file is
    /// missing, unreadable, malformed or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, SuggestError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SuggestError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SuggestError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            SuggestError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config < home config < local config; later files win per field.
    /// Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, SuggestError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping configuration file"),
            }
        }

        if self.verbose && !loaded_files.is_empty() {
            for (i, path) in loaded_files.iter().enumerate() {
                info!(
                    path = %path.display(),
                    precedence = i + 1,
                    "Using configuration file"
                );
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let path = Path::new("./domain-suggest.toml");
        path.exists().then(|| path.to_path_buf())
    }

    /// Get the global configuration file path in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".domain-suggest.toml");
        path.exists().then_some(path)
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-suggest").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.style.is_some() {
                        lower_defaults.style = higher_defaults.style;
                    }
                    if higher_defaults.extensions.is_some() {
                        lower_defaults.extensions = higher_defaults.extensions;
                    }
                    if higher_defaults.count.is_some() {
                        lower_defaults.count = higher_defaults.count;
                    }
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            generation: match (lower.generation, higher.generation) {
                (Some(mut lower_gen), Some(higher_gen)) => {
                    if higher_gen.model.is_some() {
                        lower_gen.model = higher_gen.model;
                    }
                    if higher_gen.max_attempts.is_some() {
                        lower_gen.max_attempts = higher_gen.max_attempts;
                    }
                    if higher_gen.retry_backoff.is_some() {
                        lower_gen.retry_backoff = higher_gen.retry_backoff;
                    }
                    if higher_gen.min_count_ratio.is_some() {
                        lower_gen.min_count_ratio = higher_gen.min_count_ratio;
                    }
                    if higher_gen.min_count_floor.is_some() {
                        lower_gen.min_count_floor = higher_gen.min_count_floor;
                    }
                    if higher_gen.min_distinct_extensions.is_some() {
                        lower_gen.min_distinct_extensions = higher_gen.min_distinct_extensions;
                    }
                    Some(lower_gen)
                }
                (lower_gen, higher_gen) => higher_gen.or(lower_gen),
            },
            verification: match (lower.verification, higher.verification) {
                (Some(mut lower_ver), Some(higher_ver)) => {
                    if higher_ver.cache_ttl.is_some() {
                        lower_ver.cache_ttl = higher_ver.cache_ttl;
                    }
                    if higher_ver.lookup_errors.is_some() {
                        lower_ver.lookup_errors = higher_ver.lookup_errors;
                    }
                    if higher_ver.ranking.is_some() {
                        lower_ver.ranking = higher_ver.ranking;
                    }
                    if higher_ver.preferred_extensions.is_some() {
                        lower_ver.preferred_extensions = higher_ver.preferred_extensions;
                    }
                    Some(lower_ver)
                }
                (lower_ver, higher_ver) => higher_ver.or(lower_ver),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), SuggestError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 50 {
                    return Err(SuggestError::config("Concurrency must be between 1 and 50"));
                }
            }

            if let Some(count) = defaults.count {
                if count == 0 || count > crate::types::MAX_COUNT {
                    return Err(SuggestError::config(format!(
                        "Count must be between 1 and {}",
                        crate::types::MAX_COUNT
                    )));
                }
            }

            if let Some(style) = &defaults.style {
                crate::styles::Style::from_key(style)
                    .map_err(|_| SuggestError::config(format!("Unknown style '{}'", style)))?;
            }

            if let Some(extensions) = &defaults.extensions {
                for ext in extensions {
                    normalize_extension(ext).map_err(|_| {
                        SuggestError::config(format!("Invalid extension '{}' in defaults", ext))
                    })?;
                }
            }
        }

        if let Some(generation) = &config.generation {
            if generation.max_attempts == Some(0) {
                return Err(SuggestError::config("max_attempts must be at least 1"));
            }

            if let Some(backoff) = &generation.retry_backoff {
                parse_duration_field("retry_backoff", backoff)?;
            }

            if let Some(ratio) = generation.min_count_ratio {
                if !(0.0..=1.0).contains(&ratio) {
                    return Err(SuggestError::config(format!(
                        "min_count_ratio must be between 0 and 1, got {}",
                        ratio
                    )));
                }
            }
        }

        if let Some(verification) = &config.verification {
            if let Some(ttl) = &verification.cache_ttl {
                parse_cache_ttl(ttl)?;
            }
            if let Some(policy) = &verification.lookup_errors {
                LookupErrorPolicy::from_key(policy)?;
            }
            if let Some(ranking) = &verification.ranking {
                let preferred = verification.preferred_extensions.clone().unwrap_or_default();
                parse_ranking(ranking, &preferred)?;
            }
        }

        Ok(())
    }
}

/// Parse a ranking key. `extension-priority` needs at least one preferred extension.
pub fn parse_ranking(key: &str, preferred: &[String]) -> Result<RankingRule, SuggestError> {
    match key.trim().to_lowercase().as_str() {
        "lexicographic" | "alpha" => Ok(RankingRule::Lexicographic),
        "extension-priority" | "extension_priority" | "priority" => {
            if preferred.is_empty() {
                return Err(SuggestError::config(
                    "ranking 'extension-priority' requires preferred_extensions",
                ));
            }
            let preferred = preferred
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SuggestError::config(e.to_string()))?;
            Ok(RankingRule::ExtensionPriority(preferred))
        }
        other => Err(SuggestError::config(format!(
            "unknown ranking '{}', expected 'lexicographic' or 'extension-priority'",
            other
        ))),
    }
}

/// Parse a duration string like "1500ms", "5s", "2m", "24h".
///
/// A bare number is read as seconds. Returns `None` if parsing fails.
pub fn parse_duration_string(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    if let Some(ms) = input.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = input.strip_suffix('s') {
        s.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(m) = input.strip_suffix('m') {
        m.trim().parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else if let Some(h) = input.strip_suffix('h') {
        h.trim().parse::<u64>().ok().map(|h| Duration::from_secs(h * 3600))
    } else {
        input.parse::<u64>().ok().map(Duration::from_secs)
    }
}

fn parse_duration_field(field: &str, value: &str) -> Result<Duration, SuggestError> {
    parse_duration_string(value).ok_or_else(|| {
        SuggestError::config(format!(
            "Invalid {} '{}'. Use a format like '1500ms', '5s', '2m', '24h'",
            field, value
        ))
    })
}

/// `none` (or `never`) disables expiry.
fn parse_cache_ttl(value: &str) -> Result<Option<Duration>, SuggestError> {
    match value.trim().to_lowercase().as_str() {
        "none" | "never" => Ok(None),
        _ => parse_duration_field("cache_ttl", value).map(Some),
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DS_* environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub style: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub count: Option<usize>,
    pub concurrency: Option<usize>,
    pub model: Option<String>,
    pub config: Option<String>,
    pub no_ai: Option<bool>,
}

/// Load configuration from environment variables.
///
/// Parses all DS_* environment variables and returns a structured configuration.
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Build an [`EnvConfig`] from any variable source.
fn env_config_from<F>(var: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // DS_STYLE - default style
    if let Some(style) = non_empty(var("DS_STYLE")) {
        match crate::styles::Style::from_key(&style) {
            Ok(_) => {
                debug!(value = %style, "Using DS_STYLE");
                env_config.style = Some(style);
            }
            Err(_) => warn!(value = %style, "Ignoring invalid DS_STYLE"),
        }
    }

    // DS_TLD - comma-separated extensions
    if let Some(tld_str) = non_empty(var("DS_TLD")) {
        let extensions: Vec<String> = tld_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if extensions.iter().all(|ext| normalize_extension(ext).is_ok()) && !extensions.is_empty()
        {
            debug!(value = %tld_str, "Using DS_TLD");
            env_config.extensions = Some(extensions);
        } else {
            warn!(value = %tld_str, "Ignoring invalid DS_TLD");
        }
    }

    // DS_COUNT - number of candidates
    if let Some(val) = non_empty(var("DS_COUNT")) {
        match val.parse::<usize>() {
            Ok(count) if count > 0 && count <= crate::types::MAX_COUNT => {
                debug!(value = count, "Using DS_COUNT");
                env_config.count = Some(count);
            }
            _ => warn!(value = %val, "Ignoring invalid DS_COUNT, must be 1-200"),
        }
    }

    // DS_CONCURRENCY - verification parallelism
    if let Some(val) = non_empty(var("DS_CONCURRENCY")) {
        match val.parse::<usize>() {
            Ok(concurrency) if concurrency > 0 && concurrency <= 50 => {
                debug!(value = concurrency, "Using DS_CONCURRENCY");
                env_config.concurrency = Some(concurrency);
            }
            _ => warn!(value = %val, "Ignoring invalid DS_CONCURRENCY, must be 1-50"),
        }
    }

    // DS_MODEL - generation model
    if let Some(model) = non_empty(var("DS_MODEL")) {
        debug!(value = %model, "Using DS_MODEL");
        env_config.model = Some(model);
    }

    // DS_CONFIG - explicit config file
    if let Some(path) = non_empty(var("DS_CONFIG")) {
        debug!(value = %path, "Using DS_CONFIG");
        env_config.config = Some(path);
    }

    // DS_NO_AI - fallback generator only
    if let Some(val) = non_empty(var("DS_NO_AI")) {
        match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => env_config.no_ai = Some(true),
            "false" | "0" | "no" | "off" => env_config.no_ai = Some(false),
            _ => warn!(value = %val, "Ignoring invalid DS_NO_AI, use true/false"),
        }
    }

    env_config
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
