//! Barcode Module: Per-Face Barcode Templates and Vineyard Updates
//!
//! Inside one face of the arrangement, every slice line meets the support
//! points in the same order, so the barcode of the face is stored once as a
//! [`DiscreteBarcode`] over support-point indices and projected onto any
//! concrete slice with [`DiscreteBarcode::project`].
//!
//! ## Computation
//!
//! 1. Bin each grade block of ∂_d and ∂_{d+1} to the support-point class it
//!    first reaches along the slice (the face's template)
//! 2. Reduce both matrices in template order for a starting face
//! 3. Walk a spanning tour of the faces, turning each template into the
//!    next by adjacent transpositions of the reduced matrices
//!
//! Barcodes may be checked against a full re-reduction of every face.

mod bars;
mod engine;
mod path;
mod template;
mod vineyard;

pub use bars::{Bar, Barcode, Death, DiscreteBar, DiscreteBarcode};
pub use engine::{BarcodeEngine, BarcodeStats};
