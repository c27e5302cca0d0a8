//! Index Matrix: multigrade → column ranges
//!
//! Boundary-matrix columns are sorted reverse-lexicographically by grade.
//! The index matrix records, for each multigrade (x, y), how many columns
//! have grade ≤ (x, y) in that order. Columns born exactly at (x, y) then
//! form the contiguous range
//!
//! ```text
//!   [end(x-1, y), end(x, y))      (x > 0)
//!   [end(W-1, y-1), end(0, y))    (x = 0)
//! ```
//!
//! The table is non-decreasing along rows and columns.

use std::ops::Range;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::grades::Multigrade;
use crate::error::{Error, Result};

/// A contiguous block of columns sharing one multigrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBlock {
    pub grade: Multigrade,
    pub first_col: usize,
    pub num_cols: usize,
}

impl GradeBlock {
    pub fn columns(&self) -> Range<usize> {
        self.first_col..self.first_col + self.num_cols
    }
}

/// Per-grade cumulative column counts, indexed `[[y, x]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMatrix {
    ends: Array2<usize>,
}

impl IndexMatrix {
    /// Build from the grade of every column, in column order.
    pub fn from_grades(grades: &[Multigrade], width: usize, height: usize) -> Result<Self> {
        let mut counts = Array2::<usize>::zeros((height, width));
        let mut previous: Option<Multigrade> = None;
        for &g in grades {
            if g.x >= width || g.y >= height {
                return Err(Error::GradeOutOfRange { x: g.x, y: g.y, width, height });
            }
            if previous.is_some_and(|p| p > g) {
                return Err(Error::InvalidIndexMatrix { x: g.x, y: g.y });
            }
            previous = Some(g);
            counts[[g.y, g.x]] += 1;
        }

        let mut ends = Array2::<usize>::zeros((height, width));
        let mut running = 0;
        for y in 0..height {
            for x in 0..width {
                running += counts[[y, x]];
                ends[[y, x]] = running;
            }
        }
        Ok(Self { ends })
    }

    /// Build from a precomputed cumulative table, validating monotonicity.
    pub fn from_ends(ends: Array2<usize>) -> Result<Self> {
        let matrix = Self { ends };
        if let Some((x, y)) = matrix.first_violation() {
            return Err(Error::InvalidIndexMatrix { x, y });
        }
        Ok(matrix)
    }

    /// Number of x-grades.
    pub fn width(&self) -> usize {
        self.ends.ncols()
    }

    /// Number of y-grades.
    pub fn height(&self) -> usize {
        self.ends.nrows()
    }

    /// Total number of columns indexed.
    pub fn num_columns(&self) -> usize {
        if self.width() == 0 || self.height() == 0 {
            0
        } else {
            self.ends[[self.height() - 1, self.width() - 1]]
        }
    }

    pub fn check_grade(&self, x: usize, y: usize) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::GradeOutOfRange {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    /// One past the last column with grade ≤ (x, y) in column order.
    pub fn end(&self, x: usize, y: usize) -> usize {
        self.ends[[y, x]]
    }

    /// Index of the last column born at or before (x, y), if any.
    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        self.end(x, y).checked_sub(1)
    }

    /// First column of row y.
    pub fn row_start(&self, y: usize) -> usize {
        if y == 0 {
            0
        } else {
            self.end(self.width() - 1, y - 1)
        }
    }

    /// First column born exactly at (x, y).
    pub fn grade_start(&self, x: usize, y: usize) -> usize {
        if x == 0 {
            self.row_start(y)
        } else {
            self.end(x - 1, y)
        }
    }

    /// Columns born exactly at (x, y).
    pub fn grade_range(&self, x: usize, y: usize) -> Range<usize> {
        self.grade_start(x, y)..self.end(x, y)
    }

    /// Columns of row y with x-grade at most x.
    pub fn row_range(&self, x: usize, y: usize) -> Range<usize> {
        self.row_start(y)..self.end(x, y)
    }

    /// Non-empty grade blocks in column order.
    pub fn blocks(&self) -> Vec<GradeBlock> {
        let mut blocks = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let range = self.grade_range(x, y);
                if !range.is_empty() {
                    blocks.push(GradeBlock {
                        grade: Multigrade::new(x, y),
                        first_col: range.start,
                        num_cols: range.len(),
                    });
                }
            }
        }
        blocks
    }

    /// Grade of every column, in column order.
    pub fn column_grades(&self) -> Vec<Multigrade> {
        let mut grades = Vec::with_capacity(self.num_columns());
        for block in self.blocks() {
            grades.extend(std::iter::repeat(block.grade).take(block.num_cols));
        }
        grades
    }

    pub fn is_monotone(&self) -> bool {
        self.first_violation().is_none()
    }

    fn first_violation(&self) -> Option<(usize, usize)> {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let here = self.ends[[y, x]];
                if x > 0 && self.ends[[y, x - 1]] > here {
                    return Some((x, y));
                }
                if y > 0 && self.ends[[y - 1, self.width() - 1]] > here {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexMatrix {
        let grades = vec![
            Multigrade::new(0, 0),
            Multigrade::new(2, 0),
            Multigrade::new(2, 0),
            Multigrade::new(1, 1),
            Multigrade::new(0, 2),
        ];
        IndexMatrix::from_grades(&grades, 3, 3).unwrap()
    }

    #[test]
    fn test_ranges() {
        let ind = sample();
        assert_eq!(ind.num_columns(), 5);
        assert_eq!(ind.grade_range(2, 0), 1..3);
        assert_eq!(ind.grade_range(1, 0), 1..1);
        assert_eq!(ind.grade_range(1, 1), 3..4);
        assert_eq!(ind.grade_range(0, 2), 4..5);
        assert_eq!(ind.row_range(2, 1), 3..4);
        assert_eq!(ind.get(0, 0), Some(0));
        assert_eq!(ind.get(0, 1), Some(2));
    }

    #[test]
    fn test_empty_prefix_has_no_last_column() {
        let grades = vec![Multigrade::new(1, 1)];
        let ind = IndexMatrix::from_grades(&grades, 2, 2).unwrap();
        assert_eq!(ind.get(0, 0), None);
        assert_eq!(ind.get(1, 1), Some(0));
    }

    #[test]
    fn test_monotone() {
        let ind = sample();
        assert!(ind.is_monotone());
        for y in 0..ind.height() {
            for x in 1..ind.width() {
                assert!(ind.end(x - 1, y) <= ind.end(x, y));
            }
        }
        for x in 0..ind.width() {
            for y in 1..ind.height() {
                assert!(ind.end(x, y - 1) <= ind.end(x, y));
            }
        }
    }

    #[test]
    fn test_blocks_roundtrip_grades() {
        let ind = sample();
        let grades = ind.column_grades();
        assert_eq!(grades.len(), 5);
        assert_eq!(grades[1], Multigrade::new(2, 0));
        assert_eq!(ind.blocks().len(), 4);
    }

    #[test]
    fn test_rejects_unsorted_and_out_of_range() {
        let unsorted = vec![Multigrade::new(0, 1), Multigrade::new(0, 0)];
        assert!(matches!(
            IndexMatrix::from_grades(&unsorted, 1, 2),
            Err(Error::InvalidIndexMatrix { .. })
        ));
        let outside = vec![Multigrade::new(3, 0)];
        assert!(matches!(
            IndexMatrix::from_grades(&outside, 2, 2),
            Err(Error::GradeOutOfRange { x: 3, .. })
        ));
        let bad = Array2::from_shape_vec((1, 2), vec![2, 1]).unwrap();
        assert!(IndexMatrix::from_ends(bad).is_err());
    }
}
