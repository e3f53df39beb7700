//! Response parsing and validation.
//!
//! Model output is free text that should contain a JSON array of
//! `{"domain": "..."}` objects. This module digs the array out, drops
//! anything malformed, and keeps only candidates that use a requested
//! extension and a letters-only base label.

use crate::error::SuggestError;
use crate::types::Candidate;
use crate::utils::{is_valid_base_label, split_domain};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::debug;

lazy_static! {
    /// First `[` through last `]`, across newlines.
    static ref JSON_ARRAY: Regex = Regex::new(r"(?s)\[.*\]").unwrap();
}

/// Remove markdown code-fence markers (```` ```json ```` and ```` ``` ````).
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Locate the embedded JSON array in model output.
pub fn extract_json_array(text: &str) -> Option<&str> {
    JSON_ARRAY.find(text).map(|m| m.as_str())
}

/// Parse model output into validated candidates.
///
/// Errors only when no array can be found or it is not valid JSON. Entries
/// that are not objects, lack a string `domain`, use an extension outside
/// `allowed`, or have an invalid base label are dropped individually.
/// Domains are trimmed and lowercased; repeats are dropped.
pub fn parse_candidates(raw: &str, allowed: &[String]) -> Result<Vec<Candidate>, SuggestError> {
    let cleaned = strip_code_fences(raw);

    let array_text = extract_json_array(&cleaned).ok_or_else(|| SuggestError::ParseError {
        message: "no JSON array found in model output".to_string(),
        content: Some(truncate(&cleaned, 200)),
    })?;

    let entries: Vec<Value> =
        serde_json::from_str(array_text).map_err(|e| SuggestError::ParseError {
            message: format!("invalid JSON array: {}", e),
            content: Some(truncate(array_text, 200)),
        })?;

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for entry in entries {
        let domain = match entry.get("domain").and_then(Value::as_str) {
            Some(d) => d.trim().to_lowercase(),
            None => {
                debug!(entry = %entry, "Dropping entry without a string domain");
                continue;
            }
        };

        let (base, ext) = match split_domain(&domain) {
            Some(parts) => parts,
            None => {
                debug!(domain = %domain, "Dropping candidate without an extension");
                continue;
            }
        };

        if !allowed.contains(&ext) {
            debug!(domain = %domain, extension = %ext, "Dropping candidate with unrequested extension");
            continue;
        }

        if !is_valid_base_label(base, false) {
            debug!(domain = %domain, "Dropping candidate with invalid base label");
            continue;
        }

        if seen.insert(domain.clone()) {
            candidates.push(Candidate::new(domain));
        }
    }

    Ok(candidates)
}

/// Count candidates per dot-prefixed extension.
pub fn extension_histogram(candidates: &[Candidate]) -> HashMap<String, usize> {
    let mut histogram = HashMap::new();
    for candidate in candidates {
        *histogram.entry(candidate.extension()).or_insert(0) += 1;
    }
    histogram
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(exts: &[&str]) -> Vec<String> {
        exts.iter().map(|s| s.to_string()).collect()
    }

    fn domains(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.domain.as_str()).collect()
    }

    #[test]
    fn test_fenced_with_prose() {
        let raw = "Here you go:\n```json\n[{\"domain\":\"foo.com\"}]\n```";
        let parsed = parse_candidates(raw, &allowed(&[".com"])).unwrap();
        assert_eq!(domains(&parsed), vec!["foo.com"]);
    }

    #[test]
    fn test_multiline_array() {
        let raw = "[\n  {\"domain\": \"brewly.com\"},\n  {\"domain\": \"beanhub.net\"}\n]\nHope this helps!";
        let parsed = parse_candidates(raw, &allowed(&[".com", ".net"])).unwrap();
        assert_eq!(domains(&parsed), vec!["brewly.com", "beanhub.net"]);
    }

    #[test]
    fn test_drops_malformed_entries() {
        let raw = r#"[{"domain":"good.com"}, "bare.com", {"name":"x.com"}, {"domain": 42},
                     {"domain":"bad-name.com"}, {"domain":"num3.com"}, {"domain":"other.org"},
                     {"domain":"GOOD.com"}, {"domain":"sub.good.com"}]"#;
        let parsed = parse_candidates(raw, &allowed(&[".com"])).unwrap();
        assert_eq!(domains(&parsed), vec!["good.com"]);
    }

    #[test]
    fn test_compound_extensions() {
        let raw = r#"[{"domain":"souk.net.ma"},{"domain":"souk.ma"},{"domain":"souk.co.ma"}]"#;
        let parsed = parse_candidates(raw, &allowed(&[".net.ma", ".ma"])).unwrap();
        assert_eq!(domains(&parsed), vec!["souk.net.ma", "souk.ma"]);

        let hist = extension_histogram(&parsed);
        assert_eq!(hist.get(".net.ma"), Some(&1));
        assert_eq!(hist.get(".ma"), Some(&1));
    }

    #[test]
    fn test_unparsable_output() {
        assert!(matches!(
            parse_candidates("I cannot help with that.", &allowed(&[".com"])),
            Err(SuggestError::ParseError { .. })
        ));
        assert!(matches!(
            parse_candidates("[{\"domain\": \"foo.com\"", &allowed(&[".com"])),
            Err(SuggestError::ParseError { .. })
        ));
        assert!(parse_candidates("[{oops}]", &allowed(&[".com"])).is_err());
    }

    #[test]
    fn test_empty_array_is_not_an_error() {
        let parsed = parse_candidates("[]", &allowed(&[".com"])).unwrap();
        assert!(parsed.is_empty());
    }
}
