//! Deterministic fallback name generator.
//!
//! Used when the model fails or returns an unusable batch. It works offline
//! from the idea text alone: pick a seed word, wrap it in the style's affix
//! templates, then walk the base pool against the requested extensions.
//!
//! # Examples
//!
//! ```
//! use domain_suggest_lib::fallback::{base_pool, generate_fallback};
//! use domain_suggest_lib::{GenerationRequest, Style};
//!
//! let pool = base_pool("organic coffee shop", Style::Professional);
//! assert_eq!(pool[0], "organicpro");
//! assert_eq!(pool[2], "globalorganic");
//!
//! let request = GenerationRequest::new("organic coffee shop", "professional", &[".com", ".net"], 4).unwrap();
//! let names: Vec<_> = generate_fallback(&request).into_iter().map(|c| c.domain).collect();
//! assert_eq!(names, vec!["organicpro.com", "organicpro.net", "organicsolutions.com", "organicsolutions.net"]);
//! ```

use crate::styles::{AffixTemplate, Style};
use crate::types::{Candidate, GenerationRequest};
use crate::utils::{default_extensions, keywords, sanitize_idea};
use tracing::debug;

/// Maximum seed length taken from the idea's first keyword.
pub const SEED_LEN: usize = 8;

/// Apply affix templates to a seed word, in template order.
pub fn apply_affixes<'a>(
    seed: &'a str,
    templates: &'a [AffixTemplate],
) -> impl Iterator<Item = String> + 'a {
    templates
        .iter()
        .map(move |(prefix, suffix)| format!("{}{}{}", prefix, seed, suffix))
}

/// Build the deduplicated base-name pool for an idea and style.
///
/// With no usable keyword the pool is built from the whole idea instead:
/// the first 8 characters, `my` + first 6, and first 6 + `hub`.
pub fn base_pool(idea: &str, style: Style) -> Vec<String> {
    let candidates: Vec<String> = match keywords(idea).first() {
        Some(word) => {
            let seed: String = word.chars().take(SEED_LEN).collect();
            apply_affixes(&seed, style.affixes()).collect()
        }
        None => {
            let clean: String = sanitize_idea(idea).replace(' ', "");
            let short: String = clean.chars().take(6).collect();
            vec![
                clean.chars().take(SEED_LEN).collect(),
                format!("my{}", short),
                format!("{}hub", short),
            ]
        }
    };

    let mut pool: Vec<String> = Vec::with_capacity(candidates.len());
    for name in candidates {
        if !name.is_empty() && !pool.contains(&name) {
            pool.push(name);
        }
    }
    pool
}

/// Synthesize exactly `request.count` candidates.
///
/// Output `i` uses extension `i % E` and base `(i / E) % P`. Once every
/// base has been paired with every extension, the round number `i / (P * E)`
/// is appended to the base so no domain repeats. Never fails.
pub fn generate_fallback(request: &GenerationRequest) -> Vec<Candidate> {
    let extensions = if request.extensions.is_empty() {
        default_extensions()
    } else {
        request.extensions.clone()
    };
    let pool = base_pool(&request.idea, request.style);

    let ext_count = extensions.len();
    let pool_size = pool.len();
    let grid = ext_count * pool_size;

    let candidates: Vec<Candidate> = (0..request.count)
        .map(|i| {
            let ext = &extensions[i % ext_count];
            let base = &pool[(i / ext_count) % pool_size];
            let round = i / grid;
            if round == 0 {
                Candidate::new(format!("{}{}", base, ext))
            } else {
                Candidate::new(format!("{}{}{}", base, round, ext))
            }
        })
        .collect();

    debug!(
        style = %request.style,
        pool_size,
        extensions = ext_count,
        generated = candidates.len(),
        "Generated fallback candidates"
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extension_histogram;
    use std::collections::HashSet;

    fn request(idea: &str, style: &str, exts: &[&str], count: usize) -> GenerationRequest {
        GenerationRequest::new(idea, style, exts, count).unwrap()
    }

    #[test]
    fn test_exact_count_and_even_split() {
        for count in [1, 7, 10, 60, 200] {
            let req = request("organic coffee shop", "default", &[".com", ".net", ".ma"], count);
            let out = generate_fallback(&req);
            assert_eq!(out.len(), count);

            let hist = extension_histogram(&out);
            let max = hist.values().max().copied().unwrap_or(0);
            let min = if hist.len() < 3 {
                0
            } else {
                hist.values().min().copied().unwrap_or(0)
            };
            assert!(max - min <= 1, "count {} gave {:?}", count, hist);
        }
    }

    #[test]
    fn test_no_repeats_past_the_grid() {
        let req = request("coffee", "funny", &[".com", ".net"], 60);
        let out = generate_fallback(&req);
        let unique: HashSet<_> = out.iter().map(|c| c.domain.clone()).collect();
        assert_eq!(unique.len(), 60);
        assert!(unique.contains("coffeeify1.com"));
        assert!(unique.contains("coffeeify2.com"));
    }

    #[test]
    fn test_round_suffix_format() {
        // 12 bases x 2 extensions = 24 before the first round suffix.
        let req = request("coffee", "funny", &[".com", ".net"], 26);
        let out = generate_fallback(&req);
        assert_eq!(out[23].domain, "wildcoffee.net");
        assert_eq!(out[24].domain, "coffeeify1.com");
        assert_eq!(out[25].domain, "coffeeify1.net");
    }

    #[test]
    fn test_professional_seed() {
        let req = request("organic coffee shop", "professional", &[".com", ".net"], 10);
        let out: Vec<String> = generate_fallback(&req).into_iter().map(|c| c.domain).collect();
        assert_eq!(
            out,
            vec![
                "organicpro.com",
                "organicpro.net",
                "organicsolutions.com",
                "organicsolutions.net",
                "globalorganic.com",
                "globalorganic.net",
                "organicgroup.com",
                "organicgroup.net",
                "eliteorganic.com",
                "eliteorganic.net",
            ]
        );
    }

    #[test]
    fn test_seed_truncated_and_stop_words_skipped() {
        let pool = base_pool("the international bakery", Style::Default);
        assert_eq!(pool[0], "internat");
        assert_eq!(pool[1], "myinternat");
    }

    #[test]
    fn test_no_keywords_uses_whole_idea() {
        let pool = base_pool("a b c d e f g h i", Style::Moroccan);
        assert_eq!(pool, vec!["abcdefgh", "myabcdef", "abcdefhub"]);

        let pool = base_pool("an ox", Style::Default);
        assert_eq!(pool, vec!["anox", "myanox", "anoxhub"]);
    }

    #[test]
    fn test_deterministic() {
        let req = request("solar panels", "moroccan", &[".ma", ".net.ma"], 15);
        assert_eq!(generate_fallback(&req), generate_fallback(&req));
        assert_eq!(generate_fallback(&req)[1].domain, "darsolar.net.ma");
    }
}
