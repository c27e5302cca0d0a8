//! Point location and face representatives.

use super::dcel::{Arrangement, FaceId};
use super::slice::SliceLine;

impl Arrangement {
    /// Face below every anchor line.
    pub fn bottom_face(&self) -> Option<FaceId> {
        self.halfedge(self.bottom).face
    }

    /// Face containing the dual point (m, b). Points on an anchor line
    /// belong to the face above it.
    pub fn locate(&self, m: f64, b: f64) -> Option<FaceId> {
        let m = m.max(0.0);
        let policy = self.policy;
        // Highest line on or below (m, b); lines meeting at a crossing tie,
        // and the steepest of them bounds the face above the vertex
        let mut below: Option<(usize, f64)> = None;
        for (index, anchor) in self.anchors.iter().enumerate() {
            let value = anchor.line_value(m);
            if value > b && !policy.almost_equal(value, b) {
                continue;
            }
            below = match below {
                Some((best, best_value)) if policy.almost_equal(value, best_value) => {
                    if anchor.x > self.anchors[best].x {
                        Some((index, value))
                    } else {
                        below
                    }
                }
                Some((_, best_value)) if value < best_value => below,
                _ => Some((index, value)),
            };
        }
        let Some((index, _)) = below else {
            return self.bottom_face();
        };
        let curve = &self.anchors[index].curve;
        let k = curve
            .partition_point(|&h| {
                let start = self.vertex(self.halfedge(h).origin).m;
                start <= m || policy.almost_equal(start, m)
            })
            .saturating_sub(1);
        let h = *curve.get(k)?;
        self.halfedge(h.twin()).face
    }

    /// Face containing the dual of a slice line. Vertical lines sit on the
    /// far edge, where curves are ordered by anchor x.
    pub fn locate_line(&self, line: &SliceLine) -> Option<FaceId> {
        match *line {
            SliceLine::Sloped { .. } => {
                let (m, b) = line.dual()?;
                self.locate(m, b)
            }
            SliceLine::Vertical { x } => {
                let below = self
                    .anchors
                    .iter()
                    .filter(|a| a.x <= x)
                    .max_by(|p, q| p.x.total_cmp(&q.x).then(q.y.total_cmp(&p.y)));
                match below {
                    Some(anchor) => {
                        let h = *anchor.curve.last()?;
                        self.halfedge(h.twin()).face
                    }
                    None => self.bottom_face(),
                }
            }
        }
    }

    /// Face of the slice with direction angle `angle` (radians) and signed
    /// perpendicular offset `offset`.
    pub fn face_at(&self, angle: f64, offset: f64) -> Option<FaceId> {
        self.locate_line(&SliceLine::from_angle_offset(angle, offset))
    }

    /// A dual point strictly inside `face`, at an m where no vertex of
    /// the arrangement lies.
    pub fn sample_point(&self, face: FaceId) -> (f64, f64) {
        let cycle = self.boundary(face);
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for &h in &cycle {
            let m = self.vertex(self.halfedge(h).origin).m;
            lo = lo.min(m);
            hi = hi.max(m);
        }
        // Faces are convex, so any m in (lo, hi) meets the interior
        let next = self
            .vertices
            .iter()
            .map(|v| v.m)
            .filter(|&m| m > lo && !self.policy.almost_equal(m, lo))
            .fold(hi, f64::min);
        let m = if next.is_finite() { (lo + next) / 2.0 } else { lo + 1.0 };

        let (mut bottom, mut top) = (f64::INFINITY, f64::NEG_INFINITY);
        for &h in &cycle {
            let origin = self.vertex(self.halfedge(h).origin);
            let dest = self.vertex(self.destination(h));
            if !(origin.m.min(dest.m) < m && m < origin.m.max(dest.m)) {
                continue;
            }
            let value = match self.halfedge(h).anchor {
                Some(a) => self.anchor(a).line_value(m),
                None => origin.b,
            };
            bottom = bottom.min(value);
            top = top.max(value);
        }

        let b = match (bottom.is_finite(), top.is_finite()) {
            (true, true) => (bottom + top) / 2.0,
            (false, true) => top - 1.0,
            (true, false) => bottom + 1.0,
            (false, false) => 0.0,
        };
        (m, b)
    }

    /// Slice line through the sample point of `face`.
    pub fn sample_line(&self, face: FaceId) -> SliceLine {
        let (m, b) = self.sample_point(face);
        SliceLine::from_dual(m, b)
    }
}
