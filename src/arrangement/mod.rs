//! Arrangement Module: the Augmented Arrangement of Slice Lines
//!
//! Every non-vertical slice line y = m·x − b is a point (m, b) of the dual
//! half-plane m ≥ 0. Each anchor (X, Y) becomes the dual line b = X·m − Y,
//! and the arrangement of these lines cuts the dual strip into faces. Slices
//! in one face meet the support points in the same combinatorial order, so
//! they share a discrete barcode.
//!
//! - [`Arrangement::build`] sweeps the anchor lines left to right
//! - [`Arrangement::locate`] and [`Arrangement::face_at`] answer queries
//! - [`SliceLine`] converts between primal lines and dual points

mod anchor;
mod builder;
mod crossing;
mod dcel;
mod locate;
mod policy;
mod slice;

pub use anchor::{find_anchors, Anchor, AnchorId};
pub use dcel::{Arrangement, ArrangementStats, Face, FaceId, Halfedge, HalfedgeId, Vertex, VertexId};
pub use policy::ComparisonPolicy;
pub use slice::SliceLine;
