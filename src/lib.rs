//! # TDA-Bipersistence
//!
//! Two-Parameter Persistent Homology: Multigraded Betti Numbers, the
//! Augmented Arrangement of Slice Lines, and Per-Face Barcodes
//!
//! ## Theoretical Framework
//!
//! A bifiltration indexed by two real parameters has no complete discrete
//! invariant, but its restriction to any line of non-negative slope is an
//! ordinary one-parameter filtration with a barcode. This crate computes a
//! data structure that answers "what is the barcode along this line?" for
//! every such line at once.
//!
//! ### Methodology
//!
//! 1. **Multigraded Betti numbers**: ξ₀ and ξ₁ of H_d, computed by column
//!    reduction of ∂_d and ∂_{d+1} grade by grade
//!
//! 2. **Anchors**: least upper bounds of incomparable support points; each
//!    anchor (X, Y) is the dual line b = X·m − Y
//!
//! 3. **Arrangement**: a doubly connected edge list of the anchor lines in
//!    the dual strip, built by a plane sweep over their crossings
//!
//! 4. **Barcode templates**: one discrete barcode per face, obtained by
//!    vineyard updates along a spanning tour of the faces
//!
//! ## Key Result
//!
//! All slices whose duals lie in one face meet the support points in the
//! same order, so their barcodes share one template:
//!
//!   barcode(L) = project(template(face(L)), L)
//!
//! ## References
//!
//! - Lesnick & Wright, "Interactive Visualization of 2-D Persistence
//!   Modules" (2015)
//! - Lesnick & Wright, "Computing Minimal Presentations and Bigraded Betti
//!   Numbers of 2-Parameter Persistent Homology" (2022)
//! - Cohen-Steiner, Edelsbrunner & Morozov, "Vines and Vineyards by
//!   Updating Persistence in Linear Time" (2006)
//! - de Berg et al., "Computational Geometry" (2008) - DCEL

pub mod arrangement;
pub mod barcode;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod support;
pub mod topology;

// Re-exports from topology
pub use topology::{
    // Inputs
    Bifiltration,
    BifilteredRips,
    BoundaryData,
    BoundaryProvider,
    BoundaryMatrix,
    IndexMatrix,
    // Grades
    GradeAxis,
    Grades,
    Multigrade,
    // Betti numbers
    BettiEngine,
    BettiGrid,
    SupportPoint,
};

// Re-exports from support
pub use support::SupportGrid;

// Re-exports from arrangement
pub use arrangement::{
    Arrangement,
    ArrangementStats,
    ComparisonPolicy,
    FaceId,
    SliceLine,
};

// Re-exports from barcode
pub use barcode::{
    Bar,
    Barcode,
    BarcodeEngine,
    BarcodeStats,
    Death,
    DiscreteBar,
    DiscreteBarcode,
};

// Re-exports from pipeline
pub use config::{ArrangementConfig, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{
    compute,
    compute_with_progress,
    spawn,
    ComputationHandle,
    PipelineOutput,
    PipelineStats,
    Progress,
    Stage,
};
