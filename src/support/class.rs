//! Equivalence classes of support points along a slice line.
//!
//! Points strictly above the line are pushed right onto it, so all such
//! points of one row land on the same point of the line; points on or below
//! it are pushed up, so all such points of one column land together. Each
//! run forms one class whose head is the rightmost (row) or topmost
//! (column) entry. Classes whose pushes coincide are merged.

use serde::{Deserialize, Serialize};

use super::grid::{EntryId, SupportGrid};
use crate::arrangement::{ComparisonPolicy, SliceLine};
use crate::topology::Grades;

/// Class bookkeeping of one grid entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquivalenceClass {
    #[default]
    Unassigned,
    /// Head of its class: total columns per side and the position of the
    /// last column of each side once the class has been laid out.
    Head {
        low_size: usize,
        high_size: usize,
        low_end: Option<usize>,
        high_end: Option<usize>,
    },
    Member { head: EntryId },
}

impl EquivalenceClass {
    fn head() -> Self {
        EquivalenceClass::Head { low_size: 0, high_size: 0, low_end: None, high_end: None }
    }

    pub fn is_head(&self) -> bool {
        matches!(self, EquivalenceClass::Head { .. })
    }
}

/// A class head and the position of its push along the line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassHead {
    pub entry: EntryId,
    pub key: f64,
}

impl SupportGrid {
    /// Partition the support into classes for `line`. Returns the class
    /// heads in push order; classes that never meet the line join the
    /// infinity entry.
    pub fn partition(&mut self, line: &SliceLine, grades: &Grades, policy: ComparisonPolicy) -> Vec<ClassHead> {
        for entry in &mut self.entries {
            entry.class = EquivalenceClass::Unassigned;
        }
        let above = |grid: &SupportGrid, id: EntryId| {
            grid.entry(id)
                .grade
                .map(|g| {
                    let (x, y) = grades.point(g);
                    line.is_above(x, y)
                })
                .unwrap_or(false)
        };

        for y in 0..self.height() {
            let run: Vec<EntryId> = self.row(y).filter(|&id| above(self, id)).collect();
            self.assign_run(&run);
        }
        for x in 0..self.width() {
            let run: Vec<EntryId> = self.column(x).filter(|&id| !above(self, id)).collect();
            self.assign_run(&run);
        }

        let infinity = self.infinity();
        let mut heads = Vec::new();
        for i in 0..self.len() {
            let id = EntryId(i);
            if !self.entry(id).class.is_head() {
                continue;
            }
            let key = self.entry(id).grade.and_then(|g| {
                let (x, y) = grades.point(g);
                line.push_key(x, y)
            });
            match key {
                Some(key) => heads.push(ClassHead { entry: id, key }),
                None => self.merge_class(infinity, id),
            }
        }
        heads.sort_by(|a, b| a.key.total_cmp(&b.key).then(a.entry.cmp(&b.entry)));

        let mut merged: Vec<ClassHead> = Vec::with_capacity(heads.len());
        for head in heads {
            match merged.last() {
                Some(last) if policy.almost_equal(last.key, head.key) => {
                    let survivor = last.entry;
                    self.merge_class(survivor, head.entry);
                }
                _ => merged.push(head),
            }
        }
        merged
    }

    /// First entry of `run` heads it; the rest become members.
    fn assign_run(&mut self, run: &[EntryId]) {
        if let Some((&head, members)) = run.split_first() {
            self.entries[head.0].class = EquivalenceClass::head();
            for &m in members {
                self.entries[m.0].class = EquivalenceClass::Member { head };
            }
        }
    }

    /// Fold the class headed by `source` into the class headed by `target`.
    fn merge_class(&mut self, target: EntryId, source: EntryId) {
        self.move_bin_here(target, source);
        for entry in &mut self.entries {
            if entry.class == (EquivalenceClass::Member { head: source }) {
                entry.class = EquivalenceClass::Member { head: target };
            }
        }
        self.entries[source.0].class = EquivalenceClass::Member { head: target };
        if !self.entries[target.0].class.is_head() {
            self.entries[target.0].class = EquivalenceClass::head();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::grid::Side;
    use crate::topology::{GradeBlock, Multigrade, SupportPoint};

    fn point(x: usize, y: usize) -> SupportPoint {
        SupportPoint { x, y, xi0: 1, xi1: 0 }
    }

    fn two_loops() -> SupportGrid {
        SupportGrid::from_points(4, 3, vec![point(1, 2), point(3, 1), point(3, 2)]).unwrap()
    }

    #[test]
    fn test_line_over_anchor_joins_column() {
        // y = x - 0.5 passes over (3, 2): (3,1) and (3,2) push up together
        let mut grid = two_loops();
        let grades = Grades::integers(4, 3);
        let heads = grid.partition(&SliceLine::from_dual(1.0, 0.5), &grades, ComparisonPolicy::default());
        let entries: Vec<EntryId> = heads.iter().map(|h| h.entry).collect();
        assert_eq!(entries, vec![EntryId(0), EntryId(2)]);
        assert_eq!(grid.head_of(EntryId(1)), EntryId(2));
        assert_eq!(grid.head_of(EntryId(0)), EntryId(0));
        assert!((heads[0].key - 2.5).abs() < 1e-12);
        assert!((heads[1].key - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_under_anchor_joins_row() {
        // y = x - 1.5 passes under (3, 2): (1,2) and (3,2) push right together
        let mut grid = two_loops();
        let grades = Grades::integers(4, 3);
        let heads = grid.partition(&SliceLine::from_dual(1.0, 1.5), &grades, ComparisonPolicy::default());
        let entries: Vec<EntryId> = heads.iter().map(|h| h.entry).collect();
        assert_eq!(entries, vec![EntryId(1), EntryId(2)]);
        assert_eq!(grid.head_of(EntryId(0)), EntryId(2));
        assert!(grid.entry(EntryId(1)).class.is_head());
    }

    #[test]
    fn test_coinciding_pushes_merge() {
        // y = x - 1 passes through (3, 2): (1,2) pushes right onto (3,2)
        let mut grid = two_loops();
        let grades = Grades::integers(4, 3);
        grid.add_multigrade(
            EntryId(2),
            Side::Low,
            GradeBlock { grade: Multigrade::new(3, 2), first_col: 0, num_cols: 2 },
        );
        let heads = grid.partition(&SliceLine::from_dual(1.0, 1.0), &grades, ComparisonPolicy::default());
        assert_eq!(heads.len(), 1);
        assert_eq!(heads[0].entry, EntryId(0));
        assert_eq!(grid.head_of(EntryId(2)), EntryId(0));
        assert_eq!(grid.head_of(EntryId(1)), EntryId(0));
        assert_eq!(grid.entry(EntryId(0)).low.count, 2);
        assert_eq!(grid.entry(EntryId(2)).low.count, 0);
    }

    #[test]
    fn test_flat_line_sends_high_rows_to_infinity() {
        let mut grid = two_loops();
        let grades = Grades::integers(4, 3);
        let heads = grid.partition(&SliceLine::from_dual(0.0, -1.0), &grades, ComparisonPolicy::default());
        assert_eq!(heads.len(), 1);
        assert_eq!(heads[0].entry, EntryId(1));
        assert_eq!(grid.head_of(EntryId(2)), grid.infinity());
        assert_eq!(grid.head_of(EntryId(0)), grid.infinity());
    }
}
