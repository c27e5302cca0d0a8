//! Crossing events for the arrangement sweep.
//!
//! Two adjacent anchor lines a (below) and b (above) cross to the right of
//! the sweep iff a has the larger slope X. The crossing point is
//!
//! ```text
//!   m = (Y_a − Y_b) / (X_a − X_b),   b = X_a·m − Y_a
//! ```
//!
//! Events are ordered by m, then b, then by the lower curve's slope
//! descending, so all crossings at one point pop consecutively.

use std::cmp::Ordering;

use num::{BigRational, ToPrimitive};

use super::anchor::AnchorId;
use super::policy::ComparisonPolicy;
use crate::topology::{Grades, Multigrade};

#[derive(Debug, Clone)]
pub(crate) struct Crossing {
    pub lower: AnchorId,
    pub upper: AnchorId,
    pub m: f64,
    pub b: f64,
    exact_m: BigRational,
    exact_b: BigRational,
    lower_slope: usize,
    policy: ComparisonPolicy,
}

impl Crossing {
    /// Crossing of `lower` and `upper` if their lines meet to the right.
    pub fn between(
        lower: (AnchorId, Multigrade),
        upper: (AnchorId, Multigrade),
        grades: &Grades,
        policy: ComparisonPolicy,
    ) -> Option<Self> {
        let (a, b) = (lower.1, upper.1);
        if a.x <= b.x {
            return None;
        }
        let (xa, ya) = (grades.x.exact(a.x), grades.y.exact(a.y));
        let (xb, yb) = (grades.x.exact(b.x), grades.y.exact(b.y));
        let exact_m = (ya - yb) / (xa - xb);
        let exact_b = xa * &exact_m - ya;
        let (fxa, fya) = grades.point(a);
        let (fxb, fyb) = grades.point(b);
        let m = (fya - fyb) / (fxa - fxb);
        let b_value = fxa * m - fya;
        Some(Self {
            lower: lower.0,
            upper: upper.0,
            m,
            b: b_value,
            exact_m,
            exact_b,
            lower_slope: a.x,
            policy,
        })
    }

    /// Same sweep position.
    pub fn same_m(&self, other: &Crossing) -> bool {
        self.policy.compare(self.m, other.m, &self.exact_m, &other.exact_m) == Ordering::Equal
    }

    /// Same crossing point.
    pub fn same_point(&self, other: &Crossing) -> bool {
        self.same_m(other)
            && self.policy.compare(self.b, other.b, &self.exact_b, &other.exact_b) == Ordering::Equal
    }

    /// Floating value of the crossing's b, recomputed from the exact value.
    pub fn b_value(&self) -> f64 {
        self.exact_b.to_f64().unwrap_or(self.b)
    }
}

impl PartialEq for Crossing {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Crossing {}

impl PartialOrd for Crossing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Crossing {
    fn cmp(&self, other: &Self) -> Ordering {
        self.policy
            .compare(self.m, other.m, &self.exact_m, &other.exact_m)
            .then_with(|| self.policy.compare(self.b, other.b, &self.exact_b, &other.exact_b))
            .then_with(|| other.lower_slope.cmp(&self.lower_slope))
            .then_with(|| self.lower.cmp(&other.lower))
            .then_with(|| self.upper.cmp(&other.upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    fn crossing(lower: (usize, usize, usize), upper: (usize, usize, usize)) -> Option<Crossing> {
        let grades = Grades::integers(8, 8);
        Crossing::between(
            (AnchorId(lower.0), Multigrade::new(lower.1, lower.2)),
            (AnchorId(upper.0), Multigrade::new(upper.1, upper.2)),
            &grades,
            ComparisonPolicy::default(),
        )
    }

    #[test]
    fn test_crossing_point() {
        // b = 3m - 3 and b = m - 1 meet at m = 1, b = 0
        let c = crossing((0, 3, 3), (1, 1, 1)).unwrap();
        assert!((c.m - 1.0).abs() < 1e-12);
        assert!(c.b.abs() < 1e-12);
        assert!(c.b_value().abs() < 1e-12);
    }

    #[test]
    fn test_diverging_lines_never_cross() {
        assert!(crossing((0, 1, 3), (1, 3, 1)).is_none());
        assert!(crossing((0, 2, 3), (1, 2, 1)).is_none());
    }

    #[test]
    fn test_heap_order_bottom_to_top_at_common_point() {
        // Three lines through (m, b) = (1, 0): X = 3, 2, 1 with Y = X
        let bottom = crossing((0, 3, 3), (1, 2, 2)).unwrap();
        let top = crossing((1, 2, 2), (2, 1, 1)).unwrap();
        let later = crossing((3, 5, 6), (4, 1, 1)).unwrap();
        assert!(bottom.same_point(&top));
        assert!(!bottom.same_m(&later));

        let mut heap = BinaryHeap::new();
        heap.push(Reverse(later.clone()));
        heap.push(Reverse(top.clone()));
        heap.push(Reverse(bottom.clone()));
        assert_eq!(heap.pop().unwrap().0.lower, AnchorId(0));
        assert_eq!(heap.pop().unwrap().0.lower, AnchorId(1));
        assert_eq!(heap.pop().unwrap().0.lower, AnchorId(3));
    }
}
