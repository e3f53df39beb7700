//! Domain Suggest CLI Application
//!
//! A command-line interface that turns a business idea into brandable domain
//! names and checks which ones are still available over WHOIS.
//! This CLI application provides a user-friendly interface to the domain-suggest-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use console::Term;
use domain_suggest_lib::{load_env_config, ConfigManager, EnvConfig, FileConfig};
use domain_suggest_lib::{DomainSuggester, GenerationRequest, SuggestConfig, DEFAULT_COUNT};
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Environment variable holding the Gemini API key.
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// CLI arguments for domain-suggest
#[derive(Parser, Debug)]
#[command(name = "domain-suggest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Suggest brandable domain names for a business idea and keep the available ones")]
#[command(
    long_about = "Suggest brandable domain names for a business idea.\n\nNames come from a language model (GEMINI_API_KEY) or, without one, from a deterministic\nstyle-based generator. Every candidate is checked over WHOIS and only available names are shown."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Business idea, e.g. "organic coffee shop"
    #[arg(value_name = "IDEA", help_heading = "Request")]
    pub idea: Vec<String>,

    /// Naming style (use --list-styles to see all)
    #[arg(short = 's', long = "style", value_name = "STYLE", help_heading = "Request")]
    pub style: Option<String>,

    /// Extensions to generate (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Request")]
    pub tlds: Option<Vec<String>>,

    /// Number of candidates to generate (default: 60, max: 200)
    #[arg(short = 'n', long = "count", value_name = "N", help_heading = "Request")]
    pub count: Option<usize>,

    /// List all available styles and exit
    #[arg(long = "list-styles", help_heading = "Request")]
    pub list_styles: bool,

    /// Skip the language model and use the fallback generator only
    #[arg(long = "no-ai", help_heading = "Generation")]
    pub no_ai: bool,

    /// Print generated candidates without checking availability
    #[arg(long = "dry-run", help_heading = "Generation")]
    pub dry_run: bool,

    /// Max concurrent availability checks (default: 15, max: 50)
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show detailed debug information
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Everything a run needs after config files, environment and flags are layered.
#[derive(Debug, Clone)]
struct RunSettings {
    style: String,
    extensions: Vec<String>,
    count: usize,
    no_ai: bool,
    config: SuggestConfig,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Handle --list-styles early
    if args.list_styles {
        ui::print_styles();
        return;
    }

    init_tracing(&args);
    info!(version = env!("CARGO_PKG_VERSION"), "Domain Suggest CLI starting");

    if let Err(e) = run_suggest(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn validate_args(args: &Args) -> Result<(), String> {
    // --list-styles is self-contained, skip other validation
    if args.list_styles {
        return Ok(());
    }

    if args.idea.iter().all(|word| word.trim().is_empty()) {
        return Err("You must describe a business idea, e.g. domain-suggest \"organic coffee shop\"".to_string());
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 50 {
            return Err("Concurrency must be between 1 and 50".to_string());
        }
    }

    if let Some(count) = args.count {
        if count == 0 || count > domain_suggest_lib::MAX_COUNT {
            return Err(format!(
                "Count must be between 1 and {}",
                domain_suggest_lib::MAX_COUNT
            ));
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(args: &Args) {
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(args.debug)
        .try_init();
}

/// Main suggestion logic
async fn run_suggest(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = build_settings(&args)?;

    let api_key = if settings.no_ai {
        None
    } else {
        std::env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty())
    };
    if api_key.is_none() && !settings.no_ai {
        info!("{} not set, using the fallback generator", API_KEY_VAR);
    }

    let concurrency = settings.config.concurrency;
    let suggester = DomainSuggester::from_config(settings.config, api_key)?;
    let request = GenerationRequest::new(
        &args.idea.join(" "),
        &settings.style,
        &settings.extensions,
        settings.count,
    )?;
    debug!(request = ?request, "Validated request");

    let interactive = !args.json && Term::stderr().is_term();

    if args.dry_run {
        let spinner = interactive.then(|| {
            ui::Spinner::start(format!("Generating {} names...", request.count))
        });
        let batch = suggester.generate_candidates(&request).await;
        if let Some(spinner) = spinner {
            spinner.stop().await;
        }

        if args.json {
            let output = serde_json::json!({
                "idea": request.idea,
                "style": request.style.key(),
                "extensions": request.extensions,
                "source": batch.source,
                "candidates": batch.candidates.iter().map(|c| c.domain.as_str()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            ui::print_header(&request, suggester.uses_model(), concurrency);
            ui::print_candidates(&batch.candidates, &batch.source);
        }
        return Ok(());
    }

    if !args.json {
        ui::print_header(&request, suggester.uses_model(), concurrency);
    }

    let started = Instant::now();
    let spinner = interactive.then(|| {
        ui::Spinner::start(format!(
            "Generating and checking {} names...",
            request.count
        ))
    });
    let outcome = suggester.suggest(&request).await;
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    let result = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        ui::print_result_pages(&result);
        ui::print_summary(&result, request.count, started.elapsed());
    }

    Ok(())
}

/// Layer configuration sources: defaults < config file < environment < CLI flags.
fn build_settings(args: &Args) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Determine config file path and load config files
    let file_config = if let Some(explicit_config_path) = &args.config {
        debug!(path = %explicit_config_path, "Using explicit config file (CLI --config)");
        config_manager
            .load_file(explicit_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_config_path, e))?
    } else if let Some(env_config_path) = &env_config.config {
        debug!(path = %env_config_path, "Using explicit config file (DS_CONFIG)");
        config_manager
            .load_file(env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?
    } else {
        debug!("Discovering config files");
        config_manager.discover_and_load()?
    };

    resolve_settings(args, &env_config, &file_config)
}

/// Resolve precedence for every setting. Pure, so precedence is testable.
fn resolve_settings(
    args: &Args,
    env_config: &EnvConfig,
    file_config: &FileConfig,
) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let defaults = file_config.defaults.clone().unwrap_or_default();

    // Step 2: file values over library defaults
    let mut config = file_config.apply_to(SuggestConfig::default())?;

    // Step 3: environment (DS_*)
    if let Some(concurrency) = env_config.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(model) = &env_config.model {
        config = config.with_model(model.clone());
    }

    // Step 4: CLI arguments (highest precedence)
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }

    let style = args
        .style
        .clone()
        .or_else(|| env_config.style.clone())
        .or(defaults.style)
        .unwrap_or_else(|| "default".to_string());

    let extensions = args
        .tlds
        .clone()
        .or_else(|| env_config.extensions.clone())
        .or(defaults.extensions)
        .unwrap_or_default();

    let count = args
        .count
        .or(env_config.count)
        .or(defaults.count)
        .unwrap_or(DEFAULT_COUNT);

    let no_ai = args.no_ai || env_config.no_ai.unwrap_or(false);

    Ok(RunSettings {
        style,
        extensions,
        count,
        no_ai,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_suggest_lib::{DefaultsConfig, GenerationConfig};

    fn create_test_args() -> Args {
        Args {
            idea: vec!["organic".to_string(), "coffee".to_string()],
            style: None,
            tlds: None,
            count: None,
            list_styles: false,
            no_ai: false,
            dry_run: false,
            concurrency: None,
            json: false,
            config: None,
            debug: false,
            verbose: false,
        }
    }

    fn file_config() -> FileConfig {
        FileConfig {
            defaults: Some(DefaultsConfig {
                style: Some("funny".to_string()),
                extensions: Some(vec!["ma".to_string()]),
                count: Some(30),
                concurrency: Some(10),
            }),
            generation: Some(GenerationConfig {
                model: Some("file-model".to_string()),
                ..Default::default()
            }),
            verification: None,
        }
    }

    #[test]
    fn test_validate_args() {
        assert!(validate_args(&create_test_args()).is_ok());

        let mut args = create_test_args();
        args.idea = vec![];
        assert!(validate_args(&args).is_err());

        args.list_styles = true;
        assert!(validate_args(&args).is_ok());

        let mut args = create_test_args();
        args.concurrency = Some(0);
        assert!(validate_args(&args).is_err());

        let mut args = create_test_args();
        args.count = Some(500);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_defaults_without_any_source() {
        let settings =
            resolve_settings(&create_test_args(), &EnvConfig::default(), &FileConfig::default())
                .unwrap();
        assert_eq!(settings.style, "default");
        assert!(settings.extensions.is_empty());
        assert_eq!(settings.count, DEFAULT_COUNT);
        assert_eq!(settings.config.concurrency, 15);
        assert!(!settings.no_ai);
    }

    #[test]
    fn test_file_values_apply() {
        let settings =
            resolve_settings(&create_test_args(), &EnvConfig::default(), &file_config()).unwrap();
        assert_eq!(settings.style, "funny");
        assert_eq!(settings.extensions, vec!["ma"]);
        assert_eq!(settings.count, 30);
        assert_eq!(settings.config.concurrency, 10);
        assert_eq!(settings.config.model, "file-model");
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let env_config = EnvConfig {
            style: Some("moroccan".to_string()),
            count: Some(40),
            concurrency: Some(20),
            model: Some("env-model".to_string()),
            no_ai: Some(true),
            ..Default::default()
        };

        let settings = resolve_settings(&create_test_args(), &env_config, &file_config()).unwrap();
        assert_eq!(settings.style, "moroccan");
        assert_eq!(settings.count, 40);
        assert_eq!(settings.config.concurrency, 20);
        assert_eq!(settings.config.model, "env-model");
        assert_eq!(settings.extensions, vec!["ma"]);
        assert!(settings.no_ai);

        let mut args = create_test_args();
        args.style = Some("pro".to_string());
        args.count = Some(12);
        args.concurrency = Some(5);
        args.tlds = Some(vec!["com".to_string(), "net".to_string()]);

        let settings = resolve_settings(&args, &env_config, &file_config()).unwrap();
        assert_eq!(settings.style, "pro");
        assert_eq!(settings.count, 12);
        assert_eq!(settings.config.concurrency, 5);
        assert_eq!(settings.extensions, vec!["com", "net"]);
    }
}
