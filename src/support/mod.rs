//! Support Module: the Sparse Grid of Betti Support Points
//!
//! The multigrades where ξ₀ or ξ₁ is nonzero are the only places where
//! the barcode of a slice can begin or end. They are stored in a sparse
//! grid linked along rows and columns; grade blocks of simplices are binned
//! to the support-point class they first reach along a slice line.

mod class;
mod grid;

pub use class::{ClassHead, EquivalenceClass};
pub use grid::{Bin, EntryId, GridEntry, Side, SupportGrid};
