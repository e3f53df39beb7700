//! Acceptance policy for parsed model batches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Thresholds deciding whether a parsed batch is usable.
///
/// A batch is accepted when it has at least
/// `max(ceil(requested * min_count_ratio), min_count_floor)` candidates and
/// spans at least `min(min_distinct_extensions, requested_extensions)`
/// distinct extensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptancePolicy {
    pub min_count_ratio: f64,
    pub min_count_floor: usize,
    pub min_distinct_extensions: usize,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            min_count_ratio: 0.5,
            min_count_floor: 0,
            min_distinct_extensions: 2,
        }
    }
}

/// Why a batch was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooFew { got: usize, needed: usize },
    TooNarrow { got: usize, needed: usize },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooFew { got, needed } => {
                write!(f, "only {} valid candidates, need {}", got, needed)
            }
            Rejection::TooNarrow { got, needed } => {
                write!(f, "only {} distinct extensions, need {}", got, needed)
            }
        }
    }
}

impl AcceptancePolicy {
    /// Minimum candidate count for a request of `requested`.
    pub fn required_count(&self, requested: usize) -> usize {
        let ratio = self.min_count_ratio.clamp(0.0, 1.0);
        let scaled = (requested as f64 * ratio).ceil() as usize;
        scaled.max(self.min_count_floor)
    }

    /// Minimum number of distinct extensions given how many were requested.
    pub fn required_distinct(&self, requested_extensions: usize) -> usize {
        self.min_distinct_extensions.min(requested_extensions)
    }

    /// Evaluate a batch from its size and extension histogram.
    pub fn evaluate(
        &self,
        valid_count: usize,
        histogram: &HashMap<String, usize>,
        requested_count: usize,
        requested_extensions: usize,
    ) -> Result<(), Rejection> {
        let needed = self.required_count(requested_count);
        if valid_count < needed {
            return Err(Rejection::TooFew {
                got: valid_count,
                needed,
            });
        }

        let distinct = histogram.values().filter(|&&n| n > 0).count();
        let needed = self.required_distinct(requested_extensions);
        if distinct < needed {
            return Err(Rejection::TooNarrow {
                got: distinct,
                needed,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(entries: &[(&str, usize)]) -> HashMap<String, usize> {
        entries
            .iter()
            .map(|(ext, n)| (ext.to_string(), *n))
            .collect()
    }

    #[test]
    fn test_rejects_too_few() {
        let policy = AcceptancePolicy::default();
        let hist = histogram(&[(".com", 1), (".net", 1), (".org", 1)]);
        assert_eq!(
            policy.evaluate(3, &hist, 10, 5),
            Err(Rejection::TooFew { got: 3, needed: 5 })
        );
    }

    #[test]
    fn test_rejects_single_extension() {
        let policy = AcceptancePolicy::default();
        let hist = histogram(&[(".com", 8)]);
        assert_eq!(
            policy.evaluate(8, &hist, 10, 3),
            Err(Rejection::TooNarrow { got: 1, needed: 2 })
        );
    }

    #[test]
    fn test_accepts_spread_batch() {
        let policy = AcceptancePolicy::default();
        let hist = histogram(&[(".com", 3), (".net", 3)]);
        assert!(policy.evaluate(6, &hist, 10, 2).is_ok());
    }

    #[test]
    fn test_single_requested_extension() {
        let policy = AcceptancePolicy::default();
        let hist = histogram(&[(".com", 5)]);
        assert!(policy.evaluate(5, &hist, 10, 1).is_ok());
    }

    #[test]
    fn test_floor_and_ratio() {
        let policy = AcceptancePolicy {
            min_count_ratio: 0.0,
            min_count_floor: 5,
            min_distinct_extensions: 1,
        };
        assert_eq!(policy.required_count(60), 5);
        assert_eq!(AcceptancePolicy::default().required_count(60), 30);
        assert_eq!(AcceptancePolicy::default().required_count(3), 2);
    }
}
