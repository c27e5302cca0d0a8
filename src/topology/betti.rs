//! Multigraded Betti Numbers
//!
//! For a bipersistence module M = H_d(F) of a bifiltration F, the
//! multigraded Betti numbers count minimal generators (ξ₀), relations (ξ₁)
//! and syzygies (ξ₂) at each multigrade a:
//!
//! - ξ₀(a): classes at a not coming from a − e₁ or a − e₂
//! - ξ₁(a): relations among generators that first appear at a
//! - ξ₂(a): relations among relations
//!
//! ## Algorithm Overview
//!
//! With Z(a) = ker ∂_d and B(a) = im ∂_{d+1} restricted to grade ≤ a, and
//!
//! ```text
//!   N(a)  = dim Z(a)                         nullity of ∂_d
//!   R(a)  = dim B(a)                         rank of ∂_{d+1}
//!   R'(a) = dim B(a−e₁) + B(a−e₂)            rank of ∂_{d+1} strictly below a
//!   S(a)  = dim B(a) + Z(a−e₁) + Z(a−e₂)     rank of the spliced matrix
//! ```
//!
//! the Betti numbers are
//!
//! ```text
//!   ξ₀(a) = N(a) − S(a)
//!   ξ₂(a) = R(a−e₁) + R(a−e₂) − R'(a) − R(a−e₁−e₂)
//!   ξ₁(a) = N(a−e₁) + N(a−e₂) − N(a−e₁−e₂) + R(a) − R'(a) − S(a)
//! ```
//!
//! the last one being ξ₀ + ξ₂ minus the alternating sum of dim H over the
//! unit square below a (Koszul Euler characteristic).
//!
//! All four ranks come out of one column-reduction sweep over the grade
//! grid: x-columns left to right, y ascending within each. Row-0 columns are
//! reduced once against a persistent low array; every later row is
//! re-reduced at each x against a copy of it, which keeps every column's
//! low consistent with the grades processed so far.
//!
//! ```text
//!   y ↑  (x,2) ─┐
//!     │  (x,1)  │  one x-column per pass, spliced matrix reset per pass
//!     │  (x,0) ─┘
//!     └────────→ x
//! ```
//!
//! ## Reference
//!
//! Lesnick & Wright (2015). "Interactive Visualization of 2-D Persistence
//! Modules". arXiv:1512.00180.

use std::collections::HashMap;
use std::ops::Range;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::bifiltration::BoundaryData;
use super::grades::Multigrade;
use super::matrix::{BoundaryMatrix, SparseColumn};
use crate::error::{Error, Result};

/// A multigrade where ξ₀ or ξ₁ is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportPoint {
    pub x: usize,
    pub y: usize,
    pub xi0: usize,
    pub xi1: usize,
}

impl SupportPoint {
    pub fn grade(&self) -> Multigrade {
        Multigrade::new(self.x, self.y)
    }
}

/// ξ₀, ξ₁, ξ₂ and the Hilbert function over the whole grade grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettiGrid {
    xi0: Array2<usize>,
    xi1: Array2<usize>,
    xi2: Array2<usize>,
    hilbert: Array2<usize>,
}

impl BettiGrid {
    pub(crate) fn empty(width: usize, height: usize) -> Self {
        Self {
            xi0: Array2::zeros((height, width)),
            xi1: Array2::zeros((height, width)),
            xi2: Array2::zeros((height, width)),
            hilbert: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.xi0.ncols()
    }

    pub fn height(&self) -> usize {
        self.xi0.nrows()
    }

    pub fn xi0(&self, x: usize, y: usize) -> usize {
        self.xi0[[y, x]]
    }

    pub fn xi1(&self, x: usize, y: usize) -> usize {
        self.xi1[[y, x]]
    }

    pub fn xi2(&self, x: usize, y: usize) -> usize {
        self.xi2[[y, x]]
    }

    /// dim H_d at (x, y).
    pub fn hilbert(&self, x: usize, y: usize) -> usize {
        self.hilbert[[y, x]]
    }

    /// Support points, x ascending then y ascending.
    pub fn support_points(&self) -> Vec<SupportPoint> {
        let mut points = Vec::new();
        for x in 0..self.width() {
            for y in 0..self.height() {
                let (xi0, xi1) = (self.xi0(x, y), self.xi1(x, y));
                if xi0 != 0 || xi1 != 0 {
                    points.push(SupportPoint { x, y, xi0, xi1 });
                }
            }
        }
        points
    }

    /// Total ξ₀ and ξ₁ counts.
    pub fn totals(&self) -> (usize, usize) {
        (self.xi0.sum(), self.xi1.sum())
    }
}

/// Outcome of reducing a range of columns.
#[derive(Debug, Clone, Default)]
struct ReductionOutcome {
    zero_columns: Vec<usize>,
    nonzero: usize,
}

/// Low array of one reduction pass.
///
/// Maps each row to the column whose low it is. Owned by exactly one pass;
/// the row-0 context persists across x while the per-row context is cloned
/// from it at every x.
#[derive(Debug, Clone)]
struct ReductionContext {
    lows: Vec<Option<usize>>,
}

impl ReductionContext {
    fn new(height: usize) -> Self {
        Self { lows: vec![None; height] }
    }

    fn reduce(
        &mut self,
        matrix: &mut BoundaryMatrix,
        mut tracking: Option<&mut BoundaryMatrix>,
        columns: Range<usize>,
    ) -> ReductionOutcome {
        let mut outcome = ReductionOutcome::default();
        for j in columns {
            while let Some(low) = matrix.low(j) {
                match self.lows[low] {
                    Some(k) if k != j => {
                        matrix.add_column(k, j);
                        if let Some(v) = tracking.as_deref_mut() {
                            v.add_column(k, j);
                        }
                    }
                    _ => break,
                }
            }
            match matrix.low(j) {
                Some(low) => {
                    self.lows[low] = Some(j);
                    outcome.nonzero += 1;
                }
                None => outcome.zero_columns.push(j),
            }
        }
        outcome
    }
}

/// Which half of the spliced matrix an absolute column index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplicedHalf {
    /// Column of ∂_{d+1}.
    Boundary(usize),
    /// Kernel vector of ∂_d, i.e. a column of the merge matrix.
    Kernel(usize),
}

/// Spliced matrix [∂_{d+1} | merge] reduced one column at a time.
///
/// Absolute column indices below `left_width` belong to the boundary half,
/// the rest to the kernel half.
#[derive(Debug, Clone)]
struct SplicedReducer {
    left_width: usize,
    lows: HashMap<usize, usize>,
    columns: HashMap<usize, SparseColumn>,
    rank: usize,
}

impl SplicedReducer {
    fn new(left_width: usize) -> Self {
        Self {
            left_width,
            lows: HashMap::new(),
            columns: HashMap::new(),
            rank: 0,
        }
    }

    fn reset(&mut self) {
        self.lows.clear();
        self.columns.clear();
        self.rank = 0;
    }

    fn half(&self, absolute: usize) -> SplicedHalf {
        if absolute < self.left_width {
            SplicedHalf::Boundary(absolute)
        } else {
            SplicedHalf::Kernel(absolute - self.left_width)
        }
    }

    fn insert_boundary(&mut self, j: usize, column: SparseColumn) -> Result<()> {
        self.insert(j, column)
    }

    fn insert_kernel(&mut self, j: usize, column: SparseColumn) -> Result<()> {
        self.insert(self.left_width + j, column)
    }

    fn insert(&mut self, absolute: usize, mut column: SparseColumn) -> Result<()> {
        while let Some(low) = column.low() {
            let Some(&k) = self.lows.get(&low) else {
                break;
            };
            let source = &self.columns[&k];
            if source.low() != Some(low) {
                return Err(Error::SpliceLowMismatch {
                    source_col: k,
                    target_col: absolute,
                    source_low: source.low(),
                    target_low: Some(low),
                });
            }
            trace!(source = ?self.half(k), target = ?self.half(absolute), "spliced column addition");
            column.add_assign(source);
        }
        if let Some(low) = column.low() {
            self.lows.insert(low, absolute);
            self.columns.insert(absolute, column);
            self.rank += 1;
        }
        Ok(())
    }
}

/// Betti engine for homological dimension d.
///
/// Consumes ∂_d and ∂_{d+1}; both matrices are reduced in place.
pub struct BettiEngine {
    low: BoundaryData,
    high: BoundaryData,
}

impl BettiEngine {
    /// `low` is ∂_d, `high` is ∂_{d+1}.
    pub fn new(low: BoundaryData, high: BoundaryData) -> Result<Self> {
        if low.index.width() != high.index.width() {
            return Err(Error::DimensionMismatch {
                context: "grade grid width",
                expected: low.index.width(),
                found: high.index.width(),
            });
        }
        if low.index.height() != high.index.height() {
            return Err(Error::DimensionMismatch {
                context: "grade grid height",
                expected: low.index.height(),
                found: high.index.height(),
            });
        }
        if high.matrix.height() != low.matrix.width() {
            return Err(Error::DimensionMismatch {
                context: "boundary chain (rows of the higher matrix)",
                expected: low.matrix.width(),
                found: high.matrix.height(),
            });
        }
        Ok(Self { low, high })
    }

    pub fn compute(self) -> Result<BettiGrid> {
        let Self { mut low, mut high } = self;
        let width = low.index.width();
        let height = low.index.height();
        if width == 0 || height == 0 {
            return Ok(BettiGrid::empty(width, height));
        }

        let n_low = low.matrix.width();
        let mut merge = BoundaryMatrix::identity(n_low);

        let mut nullity = Array2::<usize>::zeros((height, width));
        let mut rank = Array2::<usize>::zeros((height, width));
        let mut rank_below = Array2::<usize>::zeros((height, width));
        let mut spliced_rank = Array2::<usize>::zeros((height, width));

        let mut low_first = ReductionContext::new(low.matrix.height());
        let mut high_first = ReductionContext::new(high.matrix.height());
        let mut low_row = low_first.clone();
        let mut high_row = high_first.clone();
        let mut spliced = SplicedReducer::new(high.matrix.width());
        let mut added = vec![false; n_low];

        for x in 0..width {
            spliced.reset();
            added.iter_mut().for_each(|a| *a = false);
            let mut pending: Vec<usize> = Vec::new();

            for y in 0..height {
                // Step 1: rank of ∂_{d+1} strictly below (x, y), then at (x, y)
                let (high_ctx, below_cols) = if y == 0 {
                    (&mut high_first, 0..0)
                } else {
                    (&mut high_row, high.index.row_start(y)..high.index.grade_start(x, y))
                };
                let below = high_ctx.reduce(&mut high.matrix, None, below_cols).nonzero;
                let at = high_ctx
                    .reduce(&mut high.matrix, None, high.index.grade_range(x, y))
                    .nonzero;
                let (r_below, r) = if y == 0 {
                    let previous = if x > 0 { rank[[0, x - 1]] } else { 0 };
                    (previous, previous + at)
                } else {
                    let base = rank[[y - 1, x]] + below;
                    (base, base + at)
                };
                rank_below[[y, x]] = r_below;
                rank[[y, x]] = r;

                // Step 2: splice in the current boundary columns of row y
                for j in high.index.row_range(x, y) {
                    if !high.matrix.is_zero(j) {
                        spliced.insert_boundary(j, high.matrix.column(j).clone())?;
                    }
                }

                // Step 3: splice in kernel vectors of Z(x-1, y) and Z(x, y-1)
                let earlier = low.index.row_start(y)..low.index.grade_start(x, y);
                pending.extend(earlier.filter(|&j| low.matrix.is_zero(j)));
                for j in pending.drain(..) {
                    if !added[j] {
                        added[j] = true;
                        spliced.insert_kernel(j, merge.column(j).clone())?;
                    }
                }
                spliced_rank[[y, x]] = spliced.rank;

                // Step 4: nullity of ∂_d at (x, y)
                let (low_ctx, low_cols) = if y == 0 {
                    (&mut low_first, low.index.grade_range(x, 0))
                } else {
                    (&mut low_row, low.index.row_range(x, y))
                };
                let outcome = low_ctx.reduce(&mut low.matrix, Some(&mut merge), low_cols);
                let zeros_in_row: Vec<usize> = if y == 0 {
                    // row 0 is only reduced once, so count over every column seen so far
                    low.index
                        .row_range(x, 0)
                        .filter(|&j| low.matrix.is_zero(j))
                        .collect()
                } else {
                    outcome.zero_columns
                };
                nullity[[y, x]] = zeros_in_row.len() + if y == 0 { 0 } else { nullity[[y - 1, x]] };
                pending.extend(zeros_in_row);

                if y == 0 {
                    low_row = low_first.clone();
                    high_row = high_first.clone();
                }
                trace!(
                    x,
                    y,
                    nullity = nullity[[y, x]],
                    rank = rank[[y, x]],
                    spliced = spliced_rank[[y, x]],
                    "betti sweep step"
                );
            }
            debug!(x, "finished grade column");
        }

        let grid = assemble(&nullity, &rank, &rank_below, &spliced_rank)?;
        let (xi0, xi1) = grid.totals();
        info!(width, height, xi0, xi1, "computed multigraded Betti numbers");
        Ok(grid)
    }
}

fn at(m: &Array2<usize>, x: Option<usize>, y: Option<usize>) -> i64 {
    match (x, y) {
        (Some(x), Some(y)) => m[[y, x]] as i64,
        _ => 0,
    }
}

fn assemble(
    nullity: &Array2<usize>,
    rank: &Array2<usize>,
    rank_below: &Array2<usize>,
    spliced: &Array2<usize>,
) -> Result<BettiGrid> {
    let (height, width) = nullity.dim();
    let mut grid = BettiGrid::empty(width, height);
    for y in 0..height {
        for x in 0..width {
            let (cx, cy) = (Some(x), Some(y));
            let (px, py) = (x.checked_sub(1), y.checked_sub(1));

            let n = at(nullity, cx, cy);
            let s = at(spliced, cx, cy);
            let r = at(rank, cx, cy);
            let r_below = at(rank_below, cx, cy);

            let xi0 = n - s;
            let xi1 = at(nullity, px, cy) + at(nullity, cx, py) - at(nullity, px, py) + r - r_below - s;
            let xi2 = at(rank, px, cy) + at(rank, cx, py) - r_below - at(rank, px, py);
            let hilbert = n - r;

            let to_count = |v: i64| usize::try_from(v).map_err(|_| Error::NegativeBetti { x, y });
            grid.xi0[[y, x]] = to_count(xi0)?;
            grid.xi1[[y, x]] = to_count(xi1)?;
            grid.xi2[[y, x]] = to_count(xi2)?;
            grid.hilbert[[y, x]] = to_count(hilbert)?;
        }
    }
    Ok(grid)
}
