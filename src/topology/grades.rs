//! Multigrades and Grade Values
//!
//! A bifiltration is indexed by two real parameters. After discretisation,
//! every simplex carries a *multigrade* (x, y): a pair of indices into the
//! sorted distinct values of each parameter.
//!
//! ```text
//!   y
//!   ↑   (0,2) (1,2) (2,2)        column order is reverse-lexicographic:
//!   │   (0,1) (1,1) (2,1)        y first, then x
//!   │   (0,0) (1,0) (2,0)
//!   └──────────────────→ x
//! ```
//!
//! Each axis keeps both a floating-point and an exact rational copy of its
//! values. Floating values drive fast comparisons; exact values settle
//! near-ties.

use std::cmp::Ordering;

use num::{BigRational, FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Discrete grade (x, y) of a simplex or support point.
///
/// `Ord` is the reverse-lexicographic order used for boundary-matrix columns:
/// compare `y` first, then `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multigrade {
    pub x: usize,
    pub y: usize,
}

impl Multigrade {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Coordinate-wise partial order: `self ≤ other`.
    pub fn leq(&self, other: &Multigrade) -> bool {
        self.x <= other.x && self.y <= other.y
    }

    /// True when neither grade dominates the other.
    pub fn incomparable(&self, other: &Multigrade) -> bool {
        !self.leq(other) && !other.leq(self)
    }

    /// Incomparable, or distinct with one coordinate in common. The order in
    /// which a slice meets two such grades, or whether it meets them at one
    /// point, changes across the line dual to their least upper bound.
    pub fn weakly_incomparable(&self, other: &Multigrade) -> bool {
        self.incomparable(other) || (self != other && (self.x == other.x || self.y == other.y))
    }

    /// Least upper bound (coordinate-wise maximum).
    pub fn lub(&self, other: &Multigrade) -> Multigrade {
        Multigrade::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl PartialOrd for Multigrade {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Multigrade {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

/// Sorted distinct values of one filtration parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeAxis {
    values: Vec<f64>,
    exact: Vec<BigRational>,
}

impl GradeAxis {
    /// Axis with values 0, 1, ..., n-1.
    pub fn integers(n: usize) -> Self {
        let exact: Vec<BigRational> = (0..n)
            .map(|i| BigRational::from_integer((i as u64).into()))
            .collect();
        let values = (0..n).map(|i| i as f64).collect();
        Self { values, exact }
    }

    /// Axis from floating-point values. Non-finite values are ignored;
    /// duplicates collapse to one grade.
    pub fn from_f64(values: &[f64]) -> Self {
        let exact: Vec<BigRational> = values
            .iter()
            .filter_map(|&v| BigRational::from_f64(v))
            .collect();
        Self::from_exact(exact)
    }

    /// Axis from exact values, sorted and deduplicated.
    pub fn from_exact(mut exact: Vec<BigRational>) -> Self {
        exact.sort();
        exact.dedup();
        let values = exact
            .iter()
            .map(|r| r.to_f64().unwrap_or(f64::NAN))
            .collect();
        Self { values, exact }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Floating value of grade `i`.
    pub fn value(&self, i: usize) -> f64 {
        self.values[i]
    }

    /// Exact value of grade `i`.
    pub fn exact(&self, i: usize) -> &BigRational {
        &self.exact[i]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Grade index of an exact value, if it is on the axis.
    pub fn position(&self, value: &BigRational) -> Option<usize> {
        self.exact.binary_search(value).ok()
    }
}

/// The two grade axes of a bifiltration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grades {
    pub x: GradeAxis,
    pub y: GradeAxis,
}

impl Grades {
    pub fn new(x: GradeAxis, y: GradeAxis) -> Self {
        Self { x, y }
    }

    /// Integer-valued axes of the given sizes.
    pub fn integers(width: usize, height: usize) -> Self {
        Self::new(GradeAxis::integers(width), GradeAxis::integers(height))
    }

    pub fn width(&self) -> usize {
        self.x.len()
    }

    pub fn height(&self) -> usize {
        self.y.len()
    }

    /// Floating coordinates of a multigrade.
    pub fn point(&self, grade: Multigrade) -> (f64, f64) {
        (self.x.value(grade.x), self.y.value(grade.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colex_order() {
        let mut grades = vec![
            Multigrade::new(2, 0),
            Multigrade::new(0, 1),
            Multigrade::new(1, 0),
            Multigrade::new(0, 0),
        ];
        grades.sort();
        assert_eq!(
            grades,
            vec![
                Multigrade::new(0, 0),
                Multigrade::new(1, 0),
                Multigrade::new(2, 0),
                Multigrade::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_partial_order() {
        let a = Multigrade::new(1, 2);
        let b = Multigrade::new(3, 1);
        assert!(a.incomparable(&b));
        assert_eq!(a.lub(&b), Multigrade::new(3, 2));
        assert!(a.leq(&Multigrade::new(3, 2)));
        assert!(!Multigrade::new(3, 1).incomparable(&Multigrade::new(3, 2)));

        assert!(Multigrade::new(3, 1).weakly_incomparable(&Multigrade::new(3, 2)));
        assert!(Multigrade::new(1, 2).weakly_incomparable(&Multigrade::new(3, 2)));
        assert!(a.weakly_incomparable(&b));
        assert!(!a.weakly_incomparable(&a));
        assert!(!Multigrade::new(0, 0).weakly_incomparable(&Multigrade::new(1, 1)));
    }

    #[test]
    fn test_axis_from_f64_dedups_and_sorts() {
        let axis = GradeAxis::from_f64(&[0.5, -1.0, 0.5, f64::NAN, 2.25]);
        assert_eq!(axis.len(), 3);
        assert_eq!(axis.values(), &[-1.0, 0.5, 2.25]);
        let half = BigRational::from_f64(0.5).unwrap();
        assert_eq!(axis.position(&half), Some(1));
    }

    #[test]
    fn test_integer_axis() {
        let grades = Grades::integers(4, 3);
        assert_eq!(grades.width(), 4);
        assert_eq!(grades.height(), 3);
        assert_eq!(grades.point(Multigrade::new(3, 2)), (3.0, 2.0));
    }
}
