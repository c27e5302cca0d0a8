//! Filtration order of the simplices along one slice line.
//!
//! Every grade block is binned to the first support-point class whose push
//! is not before the block's own push; blocks beyond the last class land in
//! the infinity entry. Columns are then laid out class by class, keeping
//! the bifiltration's column order inside each class.

use crate::arrangement::{ComparisonPolicy, SliceLine};
use crate::support::{ClassHead, EntryId, Side, SupportGrid};
use crate::topology::{GradeBlock, Grades};

/// Column order and class labels for one slice.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Template {
    pub low_order: Vec<usize>,
    pub high_order: Vec<usize>,
    /// Class rank of each column of ∂_d.
    pub low_class: Vec<usize>,
    /// Class rank of each column of ∂_{d+1}.
    pub high_class: Vec<usize>,
    /// Support-point index of each class head; `None` for the infinity class.
    pub class_points: Vec<Option<usize>>,
}

impl Template {
    pub fn build(
        grid: &mut SupportGrid,
        line: &SliceLine,
        grades: &Grades,
        policy: ComparisonPolicy,
        low_blocks: &[GradeBlock],
        high_blocks: &[GradeBlock],
    ) -> Self {
        grid.drain_bins();
        let heads = grid.partition(line, grades, policy);
        let infinity = grid.infinity();

        let class_for = |block: &GradeBlock| -> EntryId {
            let (x, y) = grades.point(block.grade);
            let Some(key) = line.push_key(x, y) else {
                return infinity;
            };
            let k = heads.partition_point(|h| h.key < key && !policy.almost_equal(h.key, key));
            heads.get(k).map(|h| h.entry).unwrap_or(infinity)
        };
        for block in low_blocks {
            let entry = class_for(block);
            grid.add_multigrade(entry, Side::Low, *block);
        }
        for block in high_blocks {
            let entry = class_for(block);
            grid.add_multigrade(entry, Side::High, *block);
        }

        let low_width = low_blocks.iter().map(|b| b.num_cols).sum();
        let high_width = high_blocks.iter().map(|b| b.num_cols).sum();
        let mut template = Template {
            low_order: Vec::with_capacity(low_width),
            high_order: Vec::with_capacity(high_width),
            low_class: vec![0; low_width],
            high_class: vec![0; high_width],
            class_points: Vec::with_capacity(heads.len() + 1),
        };

        let classes = heads
            .iter()
            .map(|h: &ClassHead| (h.entry, Some(h.entry.index())))
            .chain(std::iter::once((infinity, None)));
        for (rank, (entry, point)) in classes.enumerate() {
            template.class_points.push(point);
            let low_end = lay_out(grid, entry, Side::Low, rank, &mut template.low_order, &mut template.low_class);
            let high_end = lay_out(grid, entry, Side::High, rank, &mut template.high_order, &mut template.high_class);
            grid.set_class_extent(entry, low_end, high_end);
        }
        template
    }

    pub fn infinity_rank(&self) -> usize {
        self.class_points.len() - 1
    }
}

/// Append the columns binned at `entry` in column order; returns the
/// position of the last one.
fn lay_out(
    grid: &SupportGrid,
    entry: EntryId,
    side: Side,
    rank: usize,
    order: &mut Vec<usize>,
    class: &mut [usize],
) -> Option<usize> {
    let mut columns: Vec<usize> = grid
        .entry(entry)
        .bin(side)
        .blocks
        .iter()
        .flat_map(|b| b.columns())
        .collect();
    columns.sort_unstable();
    for &c in &columns {
        class[c] = rank;
    }
    order.extend(columns);
    order.len().checked_sub(1).filter(|_| grid.entry(entry).bin(side).count > 0)
}
