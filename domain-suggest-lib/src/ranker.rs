//! Ranking and pagination of verified domains.

use crate::types::{AvailableDomain, RankedResult, RankingRule};
use crate::utils::dotted_extension;
use std::collections::HashMap;

/// Domains per page.
pub const PAGE_SIZE: usize = 10;

/// Keep available domains and order them by `rule`.
pub fn rank(results: &HashMap<String, bool>, rule: &RankingRule) -> Vec<String> {
    let mut available: Vec<String> = results
        .iter()
        .filter(|(_, free)| **free)
        .map(|(domain, _)| domain.clone())
        .collect();

    match rule {
        RankingRule::Lexicographic => available.sort(),
        RankingRule::ExtensionPriority(preferred) => {
            // Unlisted extensions share the last rank.
            let priority = |domain: &str| {
                let ext = dotted_extension(domain);
                preferred
                    .iter()
                    .position(|p| *p == ext)
                    .unwrap_or(preferred.len())
            };
            available.sort_by(|a, b| priority(a.as_str()).cmp(&priority(b.as_str())).then_with(|| a.cmp(b)));
        }
    }

    available
}

/// Split ranked domains into the `initial` and `more` pages.
pub fn paginate(ranked: Vec<String>, style_used: &str) -> RankedResult {
    let total = ranked.len();
    let mut pages = ranked.into_iter().map(AvailableDomain::new);

    let initial: Vec<AvailableDomain> = pages.by_ref().take(PAGE_SIZE).collect();
    let more: Vec<AvailableDomain> = pages.take(PAGE_SIZE).collect();

    RankedResult {
        initial,
        more,
        total,
        style_used: style_used.to_string(),
        error: false,
        message: None,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verified(entries: &[(&str, bool)]) -> HashMap<String, bool> {
        entries.iter().map(|(d, v)| (d.to_string(), *v)).collect()
    }

    #[test]
    fn test_lexicographic_filters_taken() {
        let results = verified(&[
            ("zeta.com", true),
            ("alpha.net", true),
            ("taken.com", false),
            ("beta.ma", true),
        ]);
        assert_eq!(
            rank(&results, &RankingRule::Lexicographic),
            vec!["alpha.net", "beta.ma", "zeta.com"]
        );
    }

    #[test]
    fn test_extension_priority() {
        let results = verified(&[
            ("zeta.com", true),
            ("alpha.net", true),
            ("beta.ma", true),
            ("gamma.com", true),
            ("delta.net.ma", true),
        ]);
        let rule = RankingRule::ExtensionPriority(vec![".com".to_string(), ".ma".to_string()]);
        assert_eq!(
            rank(&results, &rule),
            vec!["gamma.com", "zeta.com", "beta.ma", "alpha.net", "delta.net.ma"]
        );
    }

    #[test]
    fn test_pagination_of_twenty_five() {
        let results: HashMap<String, bool> =
            (0..25).map(|i| (format!("brand{:02}.com", i), true)).collect();
        let page = paginate(rank(&results, &RankingRule::Lexicographic), "funny");

        assert_eq!(page.initial.len(), 10);
        assert_eq!(page.more.len(), 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.style_used, "funny");
        assert_eq!(page.initial[0].domain, "brand00.com");
        assert_eq!(page.more[0].domain, "brand10.com");
        assert!(!page.error);
    }

    #[test]
    fn test_pagination_of_few() {
        let page = paginate(vec!["a.com".to_string(), "b.com".to_string()], "default");
        assert_eq!(page.initial.len(), 2);
        assert!(page.more.is_empty());
        assert_eq!(page.total, 2);
    }
}
