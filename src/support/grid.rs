//! Sparse grid of support points.
//!
//! One entry per support point, linked to the next nonempty entry below it
//! in its column and to its left in its row. Column heads are the topmost
//! entries, row heads the rightmost ones. An extra entry past the support
//! points collects grade blocks that no support point dominates.

use serde::{Deserialize, Serialize};

use super::class::EquivalenceClass;
use crate::error::{Error, Result};
use crate::topology::{BettiGrid, GradeBlock, Multigrade, SupportPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which boundary matrix a grade block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Columns of ∂_d (d-simplices)
    Low,
    /// Columns of ∂_{d+1}
    High,
}

/// Grade blocks of one side held by an entry, with their column count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    pub blocks: Vec<GradeBlock>,
    pub count: usize,
}

impl Bin {
    fn push(&mut self, block: GradeBlock) {
        self.count += block.num_cols;
        self.blocks.push(block);
    }

    fn append(&mut self, other: &mut Bin) {
        self.count += other.count;
        other.count = 0;
        self.blocks.append(&mut other.blocks);
    }

    fn clear(&mut self) {
        self.blocks.clear();
        self.count = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridEntry {
    /// `None` for the entry beyond every support point.
    pub grade: Option<Multigrade>,
    /// Next nonempty entry below in the same column.
    pub down: Option<EntryId>,
    /// Next nonempty entry to the left in the same row.
    pub left: Option<EntryId>,
    pub low: Bin,
    pub high: Bin,
    pub class: EquivalenceClass,
}

impl GridEntry {
    fn new(grade: Option<Multigrade>, down: Option<EntryId>, left: Option<EntryId>) -> Self {
        Self {
            grade,
            down,
            left,
            low: Bin::default(),
            high: Bin::default(),
            class: EquivalenceClass::Unassigned,
        }
    }

    pub fn bin(&self, side: Side) -> &Bin {
        match side {
            Side::Low => &self.low,
            Side::High => &self.high,
        }
    }

    fn bin_mut(&mut self, side: Side) -> &mut Bin {
        match side {
            Side::Low => &mut self.low,
            Side::High => &mut self.high,
        }
    }
}

/// Support points of ξ₀ and ξ₁ in a row/column linked arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportGrid {
    width: usize,
    height: usize,
    points: Vec<SupportPoint>,
    pub(crate) entries: Vec<GridEntry>,
    columns: Vec<Option<EntryId>>,
    rows: Vec<Option<EntryId>>,
}

impl SupportGrid {
    /// Grid of the support of a Betti grid.
    pub fn build(betti: &BettiGrid) -> Result<Self> {
        Self::from_points(betti.width(), betti.height(), betti.support_points())
    }

    /// Grid from support points ordered by x, then y. Entry `i` is the
    /// support point with index `i`.
    pub fn from_points(width: usize, height: usize, points: Vec<SupportPoint>) -> Result<Self> {
        let mut columns = vec![None; width];
        let mut rows = vec![None; height];
        let mut entries = Vec::with_capacity(points.len() + 1);
        for (i, p) in points.iter().enumerate() {
            if p.x >= width || p.y >= height {
                return Err(Error::GradeOutOfRange { x: p.x, y: p.y, width, height });
            }
            if i > 0 && (points[i - 1].x, points[i - 1].y) >= (p.x, p.y) {
                return Err(Error::UnorderedSupport { x: p.x, y: p.y });
            }
            let id = EntryId(i);
            entries.push(GridEntry::new(Some(p.grade()), columns[p.x], rows[p.y]));
            columns[p.x] = Some(id);
            rows[p.y] = Some(id);
        }
        entries.push(GridEntry::new(None, None, None));
        Ok(Self { width, height, points, entries, columns, rows })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn points(&self) -> &[SupportPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn entry(&self, id: EntryId) -> &GridEntry {
        &self.entries[id.0]
    }

    /// The entry collecting blocks beyond every support point.
    pub fn infinity(&self) -> EntryId {
        EntryId(self.points.len())
    }

    /// Topmost entry of column `x`.
    pub fn column_top(&self, x: usize) -> Option<EntryId> {
        self.columns.get(x).copied().flatten()
    }

    /// Rightmost entry of row `y`.
    pub fn row_end(&self, y: usize) -> Option<EntryId> {
        self.rows.get(y).copied().flatten()
    }

    /// Entries of column `x`, top to bottom.
    pub fn column(&self, x: usize) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::successors(self.column_top(x), move |&id| self.entry(id).down)
    }

    /// Entries of row `y`, right to left.
    pub fn row(&self, y: usize) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::successors(self.row_end(y), move |&id| self.entry(id).left)
    }

    /// Attach a grade block to the bin of `entry`.
    pub fn add_multigrade(&mut self, entry: EntryId, side: Side, block: GradeBlock) {
        self.entries[entry.0].bin_mut(side).push(block);
    }

    /// Move every block and count of `source` into `target`. Moving from an
    /// empty bin, or from an entry into itself, changes nothing.
    pub fn move_bin_here(&mut self, target: EntryId, source: EntryId) {
        if target == source {
            return;
        }
        for side in [Side::Low, Side::High] {
            let mut moved = std::mem::take(self.entries[source.0].bin_mut(side));
            self.entries[target.0].bin_mut(side).append(&mut moved);
        }
    }

    /// Empty every bin and forget every class.
    pub fn drain_bins(&mut self) {
        for entry in &mut self.entries {
            entry.low.clear();
            entry.high.clear();
            entry.class = EquivalenceClass::Unassigned;
        }
    }

    /// Record the class totals and last column positions of a head.
    pub fn set_class_extent(&mut self, head: EntryId, low_end: Option<usize>, high_end: Option<usize>) {
        let entry = &mut self.entries[head.0];
        entry.class = EquivalenceClass::Head {
            low_size: entry.low.count,
            high_size: entry.high.count,
            low_end,
            high_end,
        };
    }

    /// Head of the class of `entry`; the entry itself when unassigned.
    pub fn head_of(&self, entry: EntryId) -> EntryId {
        match self.entries[entry.0].class {
            EquivalenceClass::Member { head } => head,
            _ => entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: usize, y: usize) -> SupportPoint {
        SupportPoint { x, y, xi0: 1, xi1: 0 }
    }

    fn block(x: usize, y: usize, first_col: usize, num_cols: usize) -> GradeBlock {
        GradeBlock { grade: Multigrade::new(x, y), first_col, num_cols }
    }

    fn grid() -> SupportGrid {
        // (0,2) . (2,2)
        //  .  (1,1) (2,1)
        // (0,0)  .   .
        let points = vec![point(0, 0), point(0, 2), point(1, 1), point(2, 1), point(2, 2)];
        SupportGrid::from_points(3, 3, points).unwrap()
    }

    #[test]
    fn test_links() {
        let grid = grid();
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.column_top(0), Some(EntryId(1)));
        assert_eq!(grid.entry(EntryId(1)).down, Some(EntryId(0)));
        assert_eq!(grid.column(2).collect::<Vec<_>>(), vec![EntryId(4), EntryId(3)]);
        assert_eq!(grid.row(1).collect::<Vec<_>>(), vec![EntryId(3), EntryId(2)]);
        assert_eq!(grid.row_end(0), Some(EntryId(0)));
        assert_eq!(grid.entry(EntryId(4)).left, Some(EntryId(1)));
        assert_eq!(grid.column_top(1), Some(EntryId(2)));
        assert_eq!(grid.infinity(), EntryId(5));
        assert_eq!(grid.entry(grid.infinity()).grade, None);
    }

    #[test]
    fn test_build_from_betti() {
        let grid = SupportGrid::build(&BettiGrid::empty(2, 2)).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.column_top(1), None);
    }

    #[test]
    fn test_rejects_unsorted_points() {
        let err = SupportGrid::from_points(3, 3, vec![point(1, 1), point(0, 2)]).unwrap_err();
        assert_eq!(err, Error::UnorderedSupport { x: 0, y: 2 });
        let err = SupportGrid::from_points(3, 3, vec![point(1, 1), point(1, 1)]).unwrap_err();
        assert_eq!(err, Error::UnorderedSupport { x: 1, y: 1 });
        let err = SupportGrid::from_points(2, 2, vec![point(2, 0)]).unwrap_err();
        assert!(matches!(err, Error::GradeOutOfRange { x: 2, .. }));
    }

    #[test]
    fn test_move_bin_here_is_idempotent() {
        let mut grid = grid();
        grid.add_multigrade(EntryId(2), Side::Low, block(1, 1, 0, 2));
        grid.add_multigrade(EntryId(2), Side::High, block(1, 1, 0, 1));
        grid.add_multigrade(EntryId(3), Side::Low, block(2, 1, 2, 3));

        grid.move_bin_here(EntryId(3), EntryId(2));
        assert_eq!(grid.entry(EntryId(3)).low.count, 5);
        assert_eq!(grid.entry(EntryId(3)).low.blocks.len(), 2);
        assert_eq!(grid.entry(EntryId(3)).high.count, 1);
        assert_eq!(grid.entry(EntryId(2)).low, Bin::default());

        let before = grid.clone();
        grid.move_bin_here(EntryId(3), EntryId(2));
        grid.move_bin_here(EntryId(3), EntryId(3));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_drain_and_extent() {
        let mut grid = grid();
        grid.add_multigrade(EntryId(4), Side::Low, block(2, 2, 4, 2));
        grid.set_class_extent(EntryId(4), Some(5), None);
        assert_eq!(
            grid.entry(EntryId(4)).class,
            EquivalenceClass::Head { low_size: 2, high_size: 0, low_end: Some(5), high_end: None }
        );
        grid.drain_bins();
        assert_eq!(grid.entry(EntryId(4)).low.count, 0);
        assert_eq!(grid.entry(EntryId(4)).class, EquivalenceClass::Unassigned);
    }
}
