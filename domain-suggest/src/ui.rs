//! Terminal display logic for the domain-suggest CLI.
//!
//! This module handles the human-readable output: the style catalog,
//! dry-run candidate listings, the two result pages, spinner animation and
//! the summary line. Uses only the `console` crate.

use console::{pad_str, style, Alignment, Term};
use domain_suggest_lib::{
    extract_extension, AvailableDomain, Candidate, CandidateSource, GenerationRequest,
    RankedResult, Style,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message (e.g. "Generating 60 names...").
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Style catalog ────────────────────────────────────────────────────────────

/// Print every style with a sample of its affixes, then exit.
pub fn print_styles() {
    let heading = console::Style::new().yellow().bold();
    let name_style = console::Style::new().green().bold();

    println!();
    println!("{}", heading.apply_to("Available Styles:"));
    println!();

    for s in Style::ALL {
        let samples: Vec<String> = s
            .affixes()
            .iter()
            .take(4)
            .map(|(prefix, suffix)| format!("{}name{}", prefix, suffix))
            .collect();
        println!(
            "  {}  {}",
            name_style.apply_to(format!("{:<14}", s.key())),
            style(samples.join(", ")).dim(),
        );
    }

    println!();
    println!("Use: domain-suggest <idea> --style <style>");
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a run.
pub fn print_header(request: &GenerationRequest, uses_model: bool, concurrency: usize) {
    println!(
        "{} {} {}",
        style("domain-suggest").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!("· \"{}\"", request.idea)).dim(),
    );

    let meta_parts = [
        format!("Style: {}", request.style),
        format!("Extensions: {}", request.extensions.join(" ")),
        format!("Count: {}", request.count),
        format!("Concurrency: {}", concurrency),
        format!("Generator: {}", if uses_model { "model" } else { "fallback" }),
    ];

    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Dry run ──────────────────────────────────────────────────────────────────

/// Print unverified candidates with a per-extension breakdown.
pub fn print_candidates(candidates: &[Candidate], source: &CandidateSource) {
    println!(
        "  {} {}",
        style(format!("── Candidates ({}) ", candidates.len()))
            .cyan()
            .bold(),
        style("─".repeat(38)).cyan().dim(),
    );
    for candidate in candidates {
        println!("    {}", style(&candidate.domain).white());
    }
    println!();

    let breakdown: Vec<String> = extension_breakdown(candidates.iter().map(|c| c.domain.as_str()))
        .into_iter()
        .map(|(ext, n)| format!("{} {}", n, ext))
        .collect();
    println!(
        "  {} {}  {}  {}",
        style(candidates.len()).bold(),
        style(pluralize(candidates.len(), "candidate")).dim(),
        style("|").dim(),
        style(format!("{} · source: {}", breakdown.join(", "), source_label(source))).dim(),
    );
}

// ── Result pages ─────────────────────────────────────────────────────────────

/// Print the "initial" and "more" pages. Empty pages are omitted.
pub fn print_result_pages(result: &RankedResult) {
    if result.initial.is_empty() {
        println!("  {}", style("No available domains found.").yellow());
        println!();
        return;
    }

    print_page("Available", &result.initial, console::Color::Green);
    if !result.more.is_empty() {
        print_page("More", &result.more, console::Color::Cyan);
    }

    let shown = result.initial.len() + result.more.len();
    if result.total > shown {
        println!(
            "  {}",
            style(format!("... and {} more not shown", result.total - shown)).dim()
        );
        println!();
    }
}

fn print_page(title: &str, domains: &[AvailableDomain], color: console::Color) {
    let header = format!("── {} ({}) ", title, domains.len());
    let rule = "─".repeat(52usize.saturating_sub(header.chars().count()));
    println!(
        "  {} {}",
        style(header).fg(color).bold(),
        style(rule).fg(color).dim(),
    );

    for domain in domains {
        let padded = pad_str(&domain.domain, 30, Alignment::Left, Some(".."));
        println!(
            "    {}  {}",
            style(&padded).white(),
            style("AVAILABLE").green().bold(),
        );
    }
    println!();
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar.
pub fn print_summary(result: &RankedResult, checked: usize, duration: Duration) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    let source = result
        .source
        .as_ref()
        .map(source_label)
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "  {} {} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(checked).bold(),
        pluralize(checked, "candidate"),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", result.total)).green(),
        style("|").dim(),
        style(format!("style: {}", result.style_used)).cyan(),
        style("|").dim(),
        style(format!("source: {}", source)).dim(),
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Short human label for where candidates came from.
pub fn source_label(source: &CandidateSource) -> String {
    match source {
        CandidateSource::Model { attempts: 1 } => "model".to_string(),
        CandidateSource::Model { attempts } => format!("model after {} attempts", attempts),
        CandidateSource::Fallback => "fallback generator".to_string(),
    }
}

/// Count domains per dotted extension, ordered by extension.
pub fn extension_breakdown<'a, I>(domains: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for domain in domains {
        *counts
            .entry(format!(".{}", extract_extension(domain)))
            .or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

fn pluralize(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label() {
        assert_eq!(source_label(&CandidateSource::Model { attempts: 1 }), "model");
        assert_eq!(
            source_label(&CandidateSource::Model { attempts: 3 }),
            "model after 3 attempts"
        );
        assert_eq!(source_label(&CandidateSource::Fallback), "fallback generator");
    }

    #[test]
    fn test_extension_breakdown_handles_compound() {
        let breakdown =
            extension_breakdown(["brewly.com", "cafe.net.ma", "roast.com", "bean.ma"]);
        assert_eq!(
            breakdown,
            vec![
                (".com".to_string(), 2),
                (".ma".to_string(), 1),
                (".net.ma".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_spinner_stops_cleanly() {
        tokio_test::block_on(async {
            let spinner = Spinner::start("Working...".to_string());
            tokio::time::sleep(Duration::from_millis(20)).await;
            spinner.stop().await;
        });
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "candidate"), "candidate");
        assert_eq!(pluralize(0, "candidate"), "candidates");
        assert_eq!(pluralize(7, "candidate"), "candidates");
    }
}
