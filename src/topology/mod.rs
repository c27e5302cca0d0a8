//! Topology Module: Bifiltrations and Multigraded Betti Numbers
//!
//! Implements the algebraic input side of two-parameter persistence:
//! - Grade axes with exact and floating values
//! - Sparse boundary matrices over Z/2Z and their index matrices
//! - Bifiltered simplicial complexes (explicit and function-Rips)
//! - Multigraded Betti numbers ξ₀, ξ₁ via column reduction
//!
//! ## Mathematical Background
//!
//! A bifiltration F is a family of simplicial complexes F(a, b) indexed by
//! two real parameters with F(a, b) ⊆ F(a', b') whenever a ≤ a', b ≤ b'.
//! Its homology H_d(F) is a bipersistence module. Unlike the one-parameter
//! case there is no complete discrete invariant, but the multigraded Betti
//! numbers locate where generators and relations live. Their support is
//! what the slice arrangement is built from.

mod betti;
mod bifiltration;
mod grades;
mod index;
mod matrix;
mod vietoris_rips;

#[cfg(test)]
pub(crate) mod fixtures;

pub use betti::{BettiEngine, BettiGrid, SupportPoint};
pub use bifiltration::{Bifiltration, BoundaryData, BoundaryProvider};
pub use grades::{GradeAxis, Grades, Multigrade};
pub use index::{GradeBlock, IndexMatrix};
pub use matrix::{BoundaryMatrix, SparseColumn};
pub use vietoris_rips::BifilteredRips;
