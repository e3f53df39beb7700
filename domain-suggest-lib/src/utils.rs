//! Utility functions for extension handling and name validation.
//!
//! This module contains helpers shared by the prompt builder, the response
//! parser, the fallback generator and the ranker. All of them agree on a
//! single rule for splitting a domain into base label and extension.

use crate::error::SuggestError;

/// Extensions used when a request names none.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".com", ".ma", ".net", ".org", ".info", ".me", ".net.ma"];

/// Maximum number of extensions in one request.
pub const MAX_EXTENSIONS: usize = 10;

/// Final labels that act as a country registry with second-level zones
/// (`net.ma`, `co.ma`, ...).
const COMPOUND_MARKERS: &[&str] = &["ma"];

/// Words ignored when picking a seed word from an idea.
pub(crate) const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "have", "hello"];

/// Canonicalize one user-supplied extension into dot-prefixed lowercase form.
///
/// `"COM"`, `".com"` and `" com "` all become `".com"`.
pub fn normalize_extension(raw: &str) -> Result<String, SuggestError> {
    let trimmed = raw.trim().to_lowercase();
    let bare = trimmed.strip_prefix('.').unwrap_or(&trimmed);

    if bare.is_empty() {
        return Err(SuggestError::invalid_request(
            "extensions",
            format!("'{}' is not an extension", raw),
        ));
    }

    let labels_ok = bare.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    });

    if !labels_ok {
        return Err(SuggestError::invalid_request(
            "extensions",
            format!("'{}' is not a valid extension", raw),
        ));
    }

    Ok(format!(".{}", bare))
}

/// Canonicalize an extension list.
///
/// Duplicates collapse (first occurrence keeps its position) and an empty
/// list becomes [`DEFAULT_EXTENSIONS`]. More than [`MAX_EXTENSIONS`] distinct
/// entries is an error.
pub fn normalize_extensions<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, SuggestError> {
    let mut result: Vec<String> = Vec::new();

    for ext in raw {
        let normalized = normalize_extension(ext.as_ref())?;
        if !result.contains(&normalized) {
            result.push(normalized);
        }
    }

    if result.is_empty() {
        return Ok(default_extensions());
    }

    if result.len() > MAX_EXTENSIONS {
        return Err(SuggestError::invalid_request(
            "extensions",
            format!(
                "at most {} extensions are allowed, got {}",
                MAX_EXTENSIONS,
                result.len()
            ),
        ));
    }

    Ok(result)
}

/// The default extension set as owned strings.
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

/// Extract the extension of a domain, without the leading dot.
///
/// The extension is the final label, or the final two labels when the final
/// label is a compound marker and the domain has at least three labels.
///
/// ```
/// use domain_suggest_lib::extract_extension;
///
/// assert_eq!(extract_extension("foo.net.ma"), "net.ma");
/// assert_eq!(extract_extension("foo.ma"), "ma");
/// assert_eq!(extract_extension("foo.com"), "com");
/// ```
pub fn extract_extension(domain: &str) -> String {
    let parts: Vec<&str> = domain.split('.').collect();
    let last = parts[parts.len() - 1];

    if parts.len() >= 3 && COMPOUND_MARKERS.contains(&last) {
        parts[parts.len() - 2..].join(".")
    } else {
        last.to_string()
    }
}

/// Dot-prefixed extension of a domain, e.g. `".net.ma"`.
pub fn dotted_extension(domain: &str) -> String {
    format!(".{}", extract_extension(domain))
}

/// Split a domain into `(base, dotted_extension)`.
///
/// Returns `None` when the domain has no dot or nothing precedes the extension.
pub fn split_domain(domain: &str) -> Option<(&str, String)> {
    if !domain.contains('.') {
        return None;
    }
    let ext = dotted_extension(domain);
    let base = domain.strip_suffix(ext.as_str())?;
    if base.is_empty() {
        None
    } else {
        Some((base, ext))
    }
}

/// Validate a base label (the part before the extension).
///
/// Model candidates must be letters only; fallback candidates may carry
/// digit disambiguators, enabled with `allow_digits`.
pub fn is_valid_base_label(label: &str, allow_digits: bool) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }

    label
        .chars()
        .all(|c| c.is_ascii_lowercase() || (allow_digits && c.is_ascii_digit()))
}

/// Reduce free text to lowercase ASCII alphanumerics separated by single spaces.
pub fn sanitize_idea(idea: &str) -> String {
    idea.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick the seed keywords of an idea: tokens longer than two characters
/// that are not stop-words, in order.
pub fn keywords(idea: &str) -> Vec<String> {
    sanitize_idea(idea)
        .split_whitespace()
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(|word| word.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("com").unwrap(), ".com");
        assert_eq!(normalize_extension(" .COM ").unwrap(), ".com");
        assert_eq!(normalize_extension("net.ma").unwrap(), ".net.ma");

        assert!(normalize_extension("").is_err());
        assert!(normalize_extension(".").is_err());
        assert!(normalize_extension("co..uk").is_err());
        assert!(normalize_extension("c_m").is_err());
    }

    #[test]
    fn test_normalize_extensions_dedupes_in_order() {
        let result = normalize_extensions(&["com", ".net", ".COM", "net"]).unwrap();
        assert_eq!(result, vec![".com", ".net"]);
    }

    #[test]
    fn test_normalize_extensions_empty_uses_defaults() {
        let empty: Vec<String> = vec![];
        let result = normalize_extensions(&empty).unwrap();
        assert_eq!(result, default_extensions());
        assert_eq!(result.len(), 7);
    }

    #[test]
    fn test_normalize_extensions_limit() {
        let many: Vec<String> = (0..11).map(|i| format!("t{}", i)).collect();
        assert!(normalize_extensions(&many).is_err());

        let ten: Vec<String> = (0..10).map(|i| format!("t{}", i)).collect();
        assert_eq!(normalize_extensions(&ten).unwrap().len(), 10);
    }

    #[test]
    fn test_extract_extension() {
        assert_eq!(extract_extension("foo.net.ma"), "net.ma");
        assert_eq!(extract_extension("foo.co.ma"), "co.ma");
        assert_eq!(extract_extension("foo.ma"), "ma");
        assert_eq!(extract_extension("foo.com"), "com");
        assert_eq!(extract_extension("foo.co.uk"), "uk");
        assert_eq!(extract_extension("nodot"), "nodot");
    }

    #[test]
    fn test_split_domain() {
        assert_eq!(
            split_domain("brand.net.ma"),
            Some(("brand", ".net.ma".to_string()))
        );
        assert_eq!(split_domain("brand.com"), Some(("brand", ".com".to_string())));
        assert_eq!(split_domain("sub.brand.com"), Some(("sub.brand", ".com".to_string())));
        assert_eq!(split_domain("brand"), None);
        assert_eq!(split_domain(".com"), None);
    }

    #[test]
    fn test_is_valid_base_label() {
        assert!(is_valid_base_label("organicpro", false));
        assert!(!is_valid_base_label("organic2", false));
        assert!(is_valid_base_label("organic2", true));
        assert!(!is_valid_base_label("organic-pro", true));
        assert!(!is_valid_base_label("Organic", false));
        assert!(!is_valid_base_label("", true));
        assert!(!is_valid_base_label("sub.brand", true));
    }

    #[test]
    fn test_sanitize_and_keywords() {
        assert_eq!(sanitize_idea("  Organic   Coffee-Shop! "), "organic coffee shop");
        assert_eq!(
            keywords("The best app for dogs"),
            vec!["best", "app", "dogs"]
        );
        assert!(keywords("a to be").is_empty());
    }
}
