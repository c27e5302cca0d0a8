//! Pipeline Module: End-to-End Computation
//!
//! Runs the stages in their dependency order:
//!
//! 1. Betti engine on ∂_d and ∂_{d+1}
//! 2. Support grid of the ξ₀/ξ₁ support
//! 3. Arrangement of the anchor lines
//! 4. Barcode of every face
//!
//! Results are handed out only once every stage has succeeded; a failing
//! stage discards everything computed before it. [`spawn`] runs the same
//! computation on a background thread.

mod worker;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::arrangement::{Arrangement, ArrangementStats, SliceLine};
use crate::barcode::{Barcode, BarcodeEngine, BarcodeStats};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::support::SupportGrid;
use crate::topology::{BettiEngine, BettiGrid, BoundaryProvider, Grades, SupportPoint};

pub use worker::{spawn, ComputationHandle};

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Betti,
    SupportGrid,
    Arrangement,
    Barcodes,
}

/// Progress report sent between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    Started(Stage),
    /// `count` is the number of items the stage produced: support points,
    /// grid entries, faces or barcodes.
    Finished { stage: Stage, count: usize },
}

/// Counters collected over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub xi0_total: usize,
    pub xi1_total: usize,
    pub support_points: usize,
    pub arrangement: ArrangementStats,
    pub barcodes: BarcodeStats,
}

/// Everything a front end needs to answer slice queries.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub grades: Grades,
    pub betti: BettiGrid,
    pub support: Vec<SupportPoint>,
    pub arrangement: Arrangement,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    /// Barcode of the slice with direction `angle` (radians, in [0, π/2])
    /// and signed perpendicular offset `offset`.
    pub fn barcode(&self, angle: f64, offset: f64) -> Option<Barcode> {
        self.barcode_along(&SliceLine::from_angle_offset(angle, offset))
    }

    pub fn barcode_along(&self, line: &SliceLine) -> Option<Barcode> {
        let face = self.arrangement.locate_line(line)?;
        let discrete = self.arrangement.barcode(face)?;
        Some(discrete.project(line, &self.grades, &self.support))
    }
}

/// Run the whole pipeline.
pub fn compute<P>(provider: &P, config: &PipelineConfig) -> Result<PipelineOutput>
where
    P: BoundaryProvider + ?Sized,
{
    compute_with_progress(provider, config, |_| {})
}

/// Run the whole pipeline, reporting stage boundaries to `report`.
pub fn compute_with_progress<P, F>(provider: &P, config: &PipelineConfig, mut report: F) -> Result<PipelineOutput>
where
    P: BoundaryProvider + ?Sized,
    F: FnMut(Progress),
{
    let dim = config.homology_dimension;
    let grades = provider.grades().clone();
    let low = provider.boundary(dim)?;
    let high = provider.boundary(dim + 1)?;
    info!(dim, low = low.matrix.width(), high = high.matrix.width(), "starting pipeline");

    report(Progress::Started(Stage::Betti));
    let betti = BettiEngine::new(low.clone(), high.clone())?.compute()?;
    let (xi0_total, xi1_total) = betti.totals();
    let support = betti.support_points();
    report(Progress::Finished { stage: Stage::Betti, count: support.len() });

    report(Progress::Started(Stage::SupportGrid));
    let grid = SupportGrid::build(&betti)?;
    report(Progress::Finished { stage: Stage::SupportGrid, count: grid.len() });

    report(Progress::Started(Stage::Arrangement));
    let mut arrangement = Arrangement::build(&support, &grades, &config.arrangement)?;
    let arrangement_stats = arrangement.stats();
    report(Progress::Finished { stage: Stage::Arrangement, count: arrangement_stats.faces });

    report(Progress::Started(Stage::Barcodes));
    let mut engine = BarcodeEngine::new(low, high, grid, grades.clone(), config.arrangement.comparison)?;
    let barcodes = engine.run(&mut arrangement, config.verify_barcodes)?;
    report(Progress::Finished { stage: Stage::Barcodes, count: barcodes.faces });

    let stats = PipelineStats {
        xi0_total,
        xi1_total,
        support_points: support.len(),
        arrangement: arrangement_stats,
        barcodes,
    };
    info!(
        support = stats.support_points,
        faces = stats.arrangement.faces,
        transpositions = stats.barcodes.transpositions,
        "pipeline finished"
    );
    Ok(PipelineOutput { grades, betti, support, arrangement, stats })
}
