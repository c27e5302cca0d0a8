//! Anchors: least upper bounds of weakly incomparable support points.
//!
//! For support points p, q with neither p ≤ q nor q ≤ p, the anchor
//! u = p ∨ q is where the order in which a slice line meets p and q can
//! flip. Points sharing one coordinate are pushed to the same point exactly
//! when the line passes above u, so they contribute u as well. In the dual
//! plane u is the line b = u_x·m − u_y.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::dcel::HalfedgeId;
use crate::topology::{Grades, Multigrade, SupportPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub usize);

impl AnchorId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An anchor and its curve through the arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub grade: Multigrade,
    /// Real coordinates of the grade.
    pub x: f64,
    pub y: f64,
    /// Left-to-right halfedges along the anchor's dual line.
    pub curve: Vec<HalfedgeId>,
}

impl Anchor {
    pub fn new(grade: Multigrade, grades: &Grades) -> Self {
        let (x, y) = grades.point(grade);
        Self { grade, x, y, curve: Vec::new() }
    }

    /// Dual line value b = X·m − Y.
    pub fn line_value(&self, m: f64) -> f64 {
        self.x * m - self.y
    }
}

/// All anchors of a support set, deduplicated, in reverse-lexicographic
/// grade order.
pub fn find_anchors(points: &[SupportPoint]) -> Vec<Multigrade> {
    let mut anchors = BTreeSet::new();
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            let (a, b) = (p.grade(), q.grade());
            if a.weakly_incomparable(&b) {
                anchors.insert(a.lub(&b));
            }
        }
    }
    anchors.into_iter().collect()
}

/// Bottom-to-top order of anchor lines along the left edge (m = 0):
/// larger y first, ties by smaller x.
pub fn left_edge_order(a: &Multigrade, b: &Multigrade) -> Ordering {
    b.y.cmp(&a.y).then(a.x.cmp(&b.x))
}
