//! Floating comparison with exact fallback.

use std::cmp::Ordering;

use num::BigRational;
use serde::{Deserialize, Serialize};

/// Tolerance used to decide when two floating keys are too close to order
/// without consulting their exact values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPolicy {
    pub epsilon: f64,
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self { epsilon: 2f64.powi(-30) }
    }
}

impl ComparisonPolicy {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Absolute or relative closeness.
    pub fn almost_equal(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let diff = (a - b).abs();
        diff <= self.epsilon || diff <= self.epsilon * a.abs().max(b.abs())
    }

    /// Order two values by their floating keys, or by their exact values
    /// when the floats are almost equal.
    pub fn compare(&self, a: f64, b: f64, exact_a: &BigRational, exact_b: &BigRational) -> Ordering {
        if self.almost_equal(a, b) {
            exact_a.cmp(exact_b)
        } else {
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::{BigInt, FromPrimitive};

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_default_epsilon() {
        let policy = ComparisonPolicy::default();
        assert!((policy.epsilon - 1.0 / 1073741824.0).abs() < 1e-20);
        assert!(policy.almost_equal(1.0, 1.0 + 1e-12));
        assert!(!policy.almost_equal(1.0, 1.001));
        assert!(policy.almost_equal(1e12, 1e12 + 1.0));
    }

    #[test]
    fn test_exact_fallback_breaks_near_ties() {
        let policy = ComparisonPolicy::default();
        let third = ratio(1, 3);
        let a = BigRational::from_f64(1.0 / 3.0).unwrap();
        // floats are equal, exact values are not
        assert_eq!(policy.compare(1.0 / 3.0, 1.0 / 3.0, &third, &a), third.cmp(&a));
        assert_ne!(policy.compare(1.0 / 3.0, 1.0 / 3.0, &third, &a), Ordering::Equal);
        assert_eq!(policy.compare(0.2, 0.5, &ratio(1, 5), &ratio(1, 2)), Ordering::Less);
    }

    #[test]
    fn test_coarse_policy_defers_to_exact() {
        let policy = ComparisonPolicy::new(0.5);
        // the floats disagree with the exact values but are within epsilon
        assert_eq!(policy.compare(1.0, 1.2, &ratio(2, 1), &ratio(1, 1)), Ordering::Greater);
    }
}
