//! Doubly-Connected Edge List over an index arena.
//!
//! The arrangement lives in the dual strip [0, ∞] × [−∞, ∞] of slope m and
//! offset b. All cross references are indices into the arena vectors.
//!
//! ```text
//!   (0,+∞) ─────────── top ──────────── (∞,+∞)
//!     │                                   │
//!   left                                right
//!     │                                   │
//!   (0,−∞) ────────── bottom ─────────── (∞,−∞)
//! ```
//!
//! Twins are stored in adjacent slots (`twin(h) = h ^ 1`). Each face lies
//! to the right of its boundary halfedges; the unbounded outer region has
//! no face record.

use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, AnchorId};
use super::policy::ComparisonPolicy;
use crate::barcode::DiscreteBarcode;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HalfedgeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl HalfedgeId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn twin(self) -> HalfedgeId {
        HalfedgeId(self.0 ^ 1)
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A vertex at dual coordinates (m, b); coordinates may be infinite on the
/// strip boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub m: f64,
    pub b: f64,
    pub incident: HalfedgeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Halfedge {
    pub origin: VertexId,
    pub twin: HalfedgeId,
    pub next: HalfedgeId,
    pub prev: HalfedgeId,
    /// `None` for the outer region.
    pub face: Option<FaceId>,
    /// Anchor whose dual line carries this edge; `None` on the strip boundary.
    pub anchor: Option<AnchorId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub boundary: HalfedgeId,
    pub barcode: Option<DiscreteBarcode>,
}

/// Construction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementStats {
    pub anchors: usize,
    pub vertices: usize,
    pub halfedges: usize,
    pub faces: usize,
    pub crossings: usize,
}

/// Planar subdivision of the dual strip by anchor lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<Halfedge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) anchors: Vec<Anchor>,
    /// Westward halfedge of the bottom boundary; its face lies below every
    /// anchor line.
    pub(crate) bottom: HalfedgeId,
    pub(crate) crossings: usize,
    /// Tolerance for point location at crossing vertices.
    pub(crate) policy: ComparisonPolicy,
}

impl Arrangement {
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn halfedge(&self, id: HalfedgeId) -> &Halfedge {
        &self.halfedges[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    pub fn anchor(&self, id: AnchorId) -> &Anchor {
        &self.anchors[id.0]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn halfedges(&self) -> &[Halfedge] {
        &self.halfedges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Destination vertex of a halfedge.
    pub fn destination(&self, id: HalfedgeId) -> VertexId {
        self.halfedge(self.halfedge(id).twin).origin
    }

    /// Halfedges around a face, starting at its boundary edge.
    pub fn boundary(&self, face: FaceId) -> Vec<HalfedgeId> {
        let start = self.face(face).boundary;
        let mut cycle = vec![start];
        let mut h = self.halfedge(start).next;
        while h != start {
            cycle.push(h);
            h = self.halfedge(h).next;
        }
        cycle
    }

    pub fn set_barcode(&mut self, face: FaceId, barcode: DiscreteBarcode) {
        self.faces[face.0].barcode = Some(barcode);
    }

    pub fn barcode(&self, face: FaceId) -> Option<&DiscreteBarcode> {
        self.face(face).barcode.as_ref()
    }

    /// V − E + F, counting the outer region as a face.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertices.len() as i64 - (self.halfedges.len() / 2) as i64 + self.faces.len() as i64 + 1
    }

    pub fn stats(&self) -> ArrangementStats {
        ArrangementStats {
            anchors: self.anchors.len(),
            vertices: self.vertices.len(),
            halfedges: self.halfedges.len(),
            faces: self.faces.len(),
            crossings: self.crossings,
        }
    }

    /// Verify the DCEL pointer structure.
    pub fn check_consistency(&self) -> Result<()> {
        let n = self.halfedges.len();
        for (i, h) in self.halfedges.iter().enumerate() {
            let id = HalfedgeId(i);
            let broken = h.twin.0 >= n
                || self.halfedge(h.twin).twin != id
                || self.halfedge(h.next).prev != id
                || self.halfedge(h.prev).next != id
                || self.halfedge(h.next).face != h.face
                || self.halfedge(h.twin).anchor != h.anchor
                || self.destination(id) != self.halfedge(h.next).origin;
            if broken {
                return Err(Error::InconsistentDcel { element: "halfedge", index: i });
            }
        }
        for (i, face) in self.faces.iter().enumerate() {
            if self.halfedge(face.boundary).face != Some(FaceId(i)) {
                return Err(Error::InconsistentDcel { element: "face", index: i });
            }
        }
        for (i, v) in self.vertices.iter().enumerate() {
            if self.halfedge(v.incident).origin != VertexId(i) {
                return Err(Error::InconsistentDcel { element: "vertex", index: i });
            }
        }
        Ok(())
    }
}
