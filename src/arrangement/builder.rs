//! Sweep construction of the anchor-line arrangement.
//!
//! Anchor lines enter on the left edge (m = 0) in bottom-to-top order and
//! are swept left to right. Every crossing splits the open edge of each
//! curve through it. Halfedges are created with pending destinations and
//! every vertex records its outgoing halfedges counter-clockwise; `next`
//! pointers and faces are derived from these rotations once the sweep ends.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use tracing::{debug, info};

use super::anchor::{find_anchors, left_edge_order, Anchor, AnchorId};
use super::crossing::Crossing;
use super::dcel::{Arrangement, Face, FaceId, Halfedge, HalfedgeId, Vertex, VertexId};
use super::policy::ComparisonPolicy;
use crate::config::ArrangementConfig;
use crate::error::{Error, Result};
use crate::topology::{Grades, Multigrade, SupportPoint};

/// Halfedges with pending destinations and per-vertex rotations.
#[derive(Default)]
struct DcelBuilder {
    vertices: Vec<(f64, f64)>,
    origins: Vec<Option<VertexId>>,
    anchors: Vec<Option<AnchorId>>,
    rotations: Vec<Vec<HalfedgeId>>,
}

impl DcelBuilder {
    fn vertex(&mut self, m: f64, b: f64) -> VertexId {
        self.vertices.push((m, b));
        self.rotations.push(Vec::new());
        VertexId(self.vertices.len() - 1)
    }

    /// Edge leaving `origin` whose far end is closed later.
    fn edge(&mut self, origin: VertexId, anchor: Option<AnchorId>) -> HalfedgeId {
        let id = HalfedgeId(self.origins.len());
        self.origins.push(Some(origin));
        self.origins.push(None);
        self.anchors.push(anchor);
        self.anchors.push(anchor);
        id
    }

    fn segment(&mut self, from: VertexId, to: VertexId) -> HalfedgeId {
        let h = self.edge(from, None);
        self.close(h, to);
        h
    }

    fn close(&mut self, h: HalfedgeId, at: VertexId) {
        self.origins[h.twin().0] = Some(at);
    }

    /// Chain `chain` bottom to top with northward segments; returns them.
    fn chain(&mut self, chain: &[VertexId]) -> Vec<HalfedgeId> {
        chain.windows(2).map(|w| self.segment(w[0], w[1])).collect()
    }

    fn finish(
        self,
        anchors: Vec<Anchor>,
        crossings: usize,
        bottom: HalfedgeId,
        outer: HalfedgeId,
        policy: ComparisonPolicy,
    ) -> Result<Arrangement> {
        let n = self.origins.len();
        let origin = self
            .origins
            .iter()
            .enumerate()
            .map(|(i, o)| o.ok_or(Error::InconsistentDcel { element: "halfedge", index: i }))
            .collect::<Result<Vec<_>>>()?;

        let mut slot = vec![usize::MAX; n];
        for (v, rotation) in self.rotations.iter().enumerate() {
            if rotation.is_empty() {
                return Err(Error::InconsistentDcel { element: "vertex", index: v });
            }
            for (k, &h) in rotation.iter().enumerate() {
                if origin[h.0] != VertexId(v) {
                    return Err(Error::InconsistentDcel { element: "halfedge", index: h.0 });
                }
                slot[h.0] = k;
            }
        }
        if let Some(i) = slot.iter().position(|&k| k == usize::MAX) {
            return Err(Error::InconsistentDcel { element: "halfedge", index: i });
        }

        // next(h) follows twin(h) counter-clockwise around dest(h)
        let mut next = vec![HalfedgeId(0); n];
        let mut prev = vec![HalfedgeId(0); n];
        for i in 0..n {
            let t = HalfedgeId(i).twin();
            let rotation = &self.rotations[origin[t.0].0];
            let succ = rotation[(slot[t.0] + 1) % rotation.len()];
            next[i] = succ;
            prev[succ.0] = HalfedgeId(i);
        }

        let mut face_of: Vec<Option<FaceId>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut faces = Vec::new();
        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut h = start;
            while !visited[h] {
                visited[h] = true;
                cycle.push(h);
                h = next[h].0;
            }
            if cycle.contains(&outer.0) {
                continue;
            }
            let id = FaceId(faces.len());
            faces.push(Face { boundary: HalfedgeId(start), barcode: None });
            for h in cycle {
                face_of[h] = Some(id);
            }
        }

        let vertices = self
            .vertices
            .iter()
            .zip(&self.rotations)
            .map(|(&(m, b), rotation)| Vertex { m, b, incident: rotation[0] })
            .collect();
        let halfedges = (0..n)
            .map(|i| Halfedge {
                origin: origin[i],
                twin: HalfedgeId(i).twin(),
                next: next[i],
                prev: prev[i],
                face: face_of[i],
                anchor: self.anchors[i],
            })
            .collect();

        Ok(Arrangement {
            vertices,
            halfedges,
            faces,
            anchors,
            bottom,
            crossings,
            policy,
        })
    }
}

/// Pending crossings between curves that have been adjacent.
struct Sweep<'a> {
    grades: &'a Grades,
    policy: ComparisonPolicy,
    anchor_grades: Vec<Multigrade>,
    queue: BinaryHeap<Reverse<Crossing>>,
    considered: HashSet<(AnchorId, AnchorId)>,
}

impl Sweep<'_> {
    fn consider(&mut self, lower: AnchorId, upper: AnchorId) {
        let key = (lower.min(upper), lower.max(upper));
        if !self.considered.insert(key) {
            return;
        }
        let crossing = Crossing::between(
            (lower, self.anchor_grades[lower.0]),
            (upper, self.anchor_grades[upper.0]),
            self.grades,
            self.policy,
        );
        if let Some(c) = crossing {
            self.queue.push(Reverse(c));
        }
    }
}

impl Arrangement {
    /// Build the arrangement of the anchors of `support`.
    pub fn build(support: &[SupportPoint], grades: &Grades, config: &ArrangementConfig) -> Result<Self> {
        let mut anchor_grades = find_anchors(support);
        anchor_grades.sort_by(left_edge_order);
        let n = anchor_grades.len();
        let mut anchors: Vec<Anchor> = anchor_grades.iter().map(|&g| Anchor::new(g, grades)).collect();
        debug!(support = support.len(), anchors = n, "building arrangement");

        let mut dcel = DcelBuilder::default();
        let inf = f64::INFINITY;
        let top_left = dcel.vertex(0.0, inf);
        let top_right = dcel.vertex(inf, inf);
        let bottom_right = dcel.vertex(inf, -inf);
        let bottom_left = dcel.vertex(0.0, -inf);
        let top = dcel.segment(top_left, top_right);
        let bottom = dcel.segment(bottom_left, bottom_right);

        // Left edge: one vertex per distinct Y, bottom to top
        let mut open: Vec<HalfedgeId> = Vec::with_capacity(n);
        let mut left: Vec<(VertexId, Vec<HalfedgeId>)> = Vec::new();
        for (i, g) in anchor_grades.iter().enumerate() {
            let fresh = i == 0 || anchor_grades[i - 1].y != g.y;
            if fresh {
                let v = dcel.vertex(0.0, -grades.y.value(g.y));
                left.push((v, Vec::new()));
            }
            let group = left.len() - 1;
            let h = dcel.edge(left[group].0, Some(AnchorId(i)));
            anchors[i].curve.push(h);
            left[group].1.push(h);
            open.push(h);
        }
        let mut chain = vec![bottom_left];
        chain.extend(left.iter().map(|(v, _)| *v));
        chain.push(top_left);
        let segments = dcel.chain(&chain);
        dcel.rotations[bottom_left.0] = vec![segments[0], bottom];
        dcel.rotations[top_left.0] = vec![top, segments[segments.len() - 1].twin()];
        for (k, (v, curves)) in left.into_iter().enumerate() {
            let mut rotation = vec![segments[k].twin()];
            rotation.extend(curves);
            rotation.push(segments[k + 1]);
            dcel.rotations[v.0] = rotation;
        }

        // Sweep
        let mut order: Vec<AnchorId> = (0..n).map(AnchorId).collect();
        let mut position: Vec<usize> = (0..n).collect();
        let mut sweep = Sweep {
            grades,
            policy: config.comparison,
            anchor_grades: anchor_grades.clone(),
            queue: BinaryHeap::new(),
            considered: HashSet::new(),
        };
        for pos in 1..n {
            sweep.consider(order[pos - 1], order[pos]);
        }

        let mut crossings = 0;
        while let Some(Reverse(first)) = sweep.queue.pop() {
            // All curves through one point are swapped as a block
            let mut bundle = vec![first];
            while matches!(sweep.queue.peek(), Some(Reverse(next)) if next.same_point(&bundle[0])) {
                if let Some(Reverse(next)) = sweep.queue.pop() {
                    bundle.push(next);
                }
            }
            for c in &bundle {
                if position[c.lower.0] > position[c.upper.0] {
                    return Err(Error::InvertedCrossing { lower: c.lower.0, upper: c.upper.0 });
                }
            }
            let mut members: Vec<AnchorId> = bundle.iter().flat_map(|c| [c.lower, c.upper]).collect();
            members.sort_by_key(|a| position[a.0]);
            members.dedup();
            for w in members.windows(2) {
                let (lower_position, upper_position) = (position[w[0].0], position[w[1].0]);
                if upper_position != lower_position + 1 {
                    return Err(Error::NonAdjacentCrossing {
                        lower: w[0].0,
                        upper: w[1].0,
                        lower_position,
                        upper_position,
                    });
                }
            }
            let first = &bundle[0];
            let first_pos = position[members[0].0];
            let last_pos = first_pos + members.len() - 1;

            let v = dcel.vertex(first.m, first.b_value());
            let mut outgoing = Vec::with_capacity(last_pos - first_pos + 1);
            let mut incoming = Vec::with_capacity(last_pos - first_pos + 1);
            for pos in (first_pos..=last_pos).rev() {
                let a = order[pos];
                dcel.close(open[a.0], v);
                incoming.push(open[a.0].twin());
                let h = dcel.edge(v, Some(a));
                anchors[a.0].curve.push(h);
                open[a.0] = h;
                outgoing.push(h);
            }
            outgoing.extend(incoming);
            dcel.rotations[v.0] = outgoing;

            order[first_pos..=last_pos].reverse();
            for pos in first_pos..=last_pos {
                position[order[pos].0] = pos;
            }
            if first_pos > 0 {
                sweep.consider(order[first_pos - 1], order[first_pos]);
            }
            if last_pos + 1 < n {
                sweep.consider(order[last_pos], order[last_pos + 1]);
            }
            crossings += 1;
            debug!(m = first.m, b = first.b, curves = last_pos - first_pos + 1, "crossing");
        }

        // Right edge: curves end ordered by X ascending
        for pos in 1..n {
            let (below, above) = (order[pos - 1], order[pos]);
            if anchor_grades[below.0].x > anchor_grades[above.0].x {
                return Err(Error::InvertedCrossing { lower: below.0, upper: above.0 });
            }
        }
        let mut right: Vec<(VertexId, Vec<HalfedgeId>)> = Vec::new();
        for pos in 0..n {
            let a = order[pos];
            let x = anchor_grades[a.0].x;
            let fresh = pos == 0 || anchor_grades[order[pos - 1].0].x != x;
            if fresh {
                let v = dcel.vertex(inf, grades.x.value(x));
                right.push((v, Vec::new()));
            }
            let group = right.len() - 1;
            dcel.close(open[a.0], right[group].0);
            right[group].1.push(open[a.0].twin());
        }
        let mut chain = vec![bottom_right];
        chain.extend(right.iter().map(|(v, _)| *v));
        chain.push(top_right);
        let segments = dcel.chain(&chain);
        dcel.rotations[bottom_right.0] = vec![segments[0], bottom.twin()];
        dcel.rotations[top_right.0] = vec![top.twin(), segments[segments.len() - 1].twin()];
        for (k, (v, curves)) in right.into_iter().enumerate() {
            let mut rotation = vec![segments[k + 1]];
            rotation.extend(curves.into_iter().rev());
            rotation.push(segments[k].twin());
            dcel.rotations[v.0] = rotation;
        }

        let arrangement = dcel.finish(anchors, crossings, bottom.twin(), top.twin(), config.comparison)?;
        let stats = arrangement.stats();
        info!(
            anchors = stats.anchors,
            vertices = stats.vertices,
            faces = stats.faces,
            crossings = stats.crossings,
            "arrangement built"
        );
        Ok(arrangement)
    }
}
