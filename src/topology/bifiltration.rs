//! Bifiltered Simplicial Complexes
//!
//! A 1-critical bifiltration assigns every simplex a single multigrade such
//! that faces are born no later than their cofaces. The downstream engines
//! only ever see it through [`BoundaryProvider`]: for each homological
//! dimension, a boundary matrix whose columns are sorted by grade together
//! with the index matrix describing the per-grade column blocks.
//!
//! ## Column order
//!
//! dim-simplices are sorted reverse-lexicographically by grade (y, then x),
//! ties broken by the vertex list. Row `i` of `boundary(d)` is column `i` of
//! `boundary(d - 1)`, so consecutive dimensions chain correctly.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use super::grades::{Grades, Multigrade};
use super::index::IndexMatrix;
use super::matrix::{BoundaryMatrix, SparseColumn};
use crate::error::{Error, Result};

/// Boundary matrix of one dimension with its index matrix.
#[derive(Debug, Clone)]
pub struct BoundaryData {
    pub matrix: BoundaryMatrix,
    pub index: IndexMatrix,
}

impl BoundaryData {
    pub fn new(matrix: BoundaryMatrix, index: IndexMatrix) -> Result<Self> {
        if matrix.width() != index.num_columns() {
            return Err(Error::DimensionMismatch {
                context: "index matrix column count",
                expected: matrix.width(),
                found: index.num_columns(),
            });
        }
        Ok(Self { matrix, index })
    }
}

/// Source of boundary and index matrices for the pipeline.
pub trait BoundaryProvider {
    /// Grade values of both parameters.
    fn grades(&self) -> &Grades;

    /// Boundary matrix of the dim-simplices (rows are (dim-1)-simplices).
    fn boundary(&self, dim: usize) -> Result<BoundaryData>;
}

/// Explicit 1-critical simplicial bifiltration.
#[derive(Debug, Clone, PartialEq)]
pub struct Bifiltration {
    grades: Grades,
    simplices: BTreeMap<Vec<usize>, Multigrade>,
}

impl Bifiltration {
    pub fn new(grades: Grades) -> Self {
        Self { grades, simplices: BTreeMap::new() }
    }

    /// Insert a simplex and all of its faces at `grade`.
    ///
    /// A face that already exists keeps an earlier grade and is lowered to
    /// a later-inserted smaller one. Incomparable grades are rejected, and a
    /// rejected call leaves the bifiltration unchanged.
    pub fn add_simplex(&mut self, vertices: &[usize], grade: Multigrade) -> Result<()> {
        self.grades_check(grade)?;
        let mut simplex = vertices.to_vec();
        simplex.sort_unstable();
        simplex.dedup();
        let mut pending = BTreeSet::new();
        self.closure(&simplex, grade, &simplex, &mut pending)?;
        for face in pending {
            self.simplices.insert(face, grade);
        }
        Ok(())
    }

    fn grades_check(&self, grade: Multigrade) -> Result<()> {
        if grade.x >= self.grades.width() || grade.y >= self.grades.height() {
            return Err(Error::GradeOutOfRange {
                x: grade.x,
                y: grade.y,
                width: self.grades.width(),
                height: self.grades.height(),
            });
        }
        Ok(())
    }

    /// Faces of `simplex` that must be written at `grade`. Faces already
    /// born at or before `grade` end the descent.
    fn closure(
        &self,
        simplex: &[usize],
        grade: Multigrade,
        top: &[usize],
        pending: &mut BTreeSet<Vec<usize>>,
    ) -> Result<()> {
        if simplex.is_empty() || pending.contains(simplex) {
            return Ok(());
        }
        match self.simplices.get(simplex) {
            Some(existing) if existing.leq(&grade) => return Ok(()),
            Some(existing) if !grade.leq(existing) => {
                return Err(Error::InvalidFiltration {
                    simplex: top.to_vec(),
                    face: simplex.to_vec(),
                });
            }
            _ => {}
        }
        pending.insert(simplex.to_vec());
        if simplex.len() > 1 {
            for i in 0..simplex.len() {
                let mut face = simplex.to_vec();
                face.remove(i);
                self.closure(&face, grade, top, pending)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Grade of a simplex, if present.
    pub fn grade_of(&self, vertices: &[usize]) -> Option<Multigrade> {
        let mut key = vertices.to_vec();
        key.sort_unstable();
        self.simplices.get(&key).copied()
    }

    /// dim-simplices in column order.
    fn ordered(&self, dim: usize) -> Vec<(&Vec<usize>, Multigrade)> {
        let mut list: Vec<(&Vec<usize>, Multigrade)> = self
            .simplices
            .iter()
            .filter(|(s, _)| s.len() == dim + 1)
            .map(|(s, &g)| (s, g))
            .collect();
        list.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        list
    }
}

impl BoundaryProvider for Bifiltration {
    fn grades(&self) -> &Grades {
        &self.grades
    }

    fn boundary(&self, dim: usize) -> Result<BoundaryData> {
        let columns = self.ordered(dim);
        let rows: HashMap<&Vec<usize>, usize> = if dim == 0 {
            HashMap::new()
        } else {
            self.ordered(dim - 1)
                .into_iter()
                .enumerate()
                .map(|(i, (s, _))| (s, i))
                .collect()
        };

        let mut matrix = BoundaryMatrix::new(rows.len());
        let mut column_grades = Vec::with_capacity(columns.len());
        for (simplex, grade) in &columns {
            let mut column = SparseColumn::new();
            if dim > 0 {
                for i in 0..simplex.len() {
                    let mut face = (*simplex).clone();
                    face.remove(i);
                    if let Some(&row) = rows.get(&face) {
                        column.toggle(row);
                    }
                }
            }
            matrix.push_column(column);
            column_grades.push(*grade);
        }

        let index = IndexMatrix::from_grades(&column_grades, self.grades.width(), self.grades.height())?;
        debug!(dim, columns = matrix.width(), rows = matrix.height(), "built boundary matrix");
        BoundaryData::new(matrix, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_inserted_with_coface_grade() {
        let mut bf = Bifiltration::new(Grades::integers(3, 3));
        bf.add_simplex(&[0, 1, 2], Multigrade::new(2, 2)).unwrap();
        assert_eq!(bf.len(), 7);
        assert_eq!(bf.grade_of(&[1, 0]), Some(Multigrade::new(2, 2)));

        bf.add_simplex(&[0], Multigrade::new(0, 0)).unwrap();
        assert_eq!(bf.grade_of(&[0]), Some(Multigrade::new(0, 0)));
        bf.add_simplex(&[0, 1], Multigrade::new(1, 1)).unwrap();
        assert_eq!(bf.grade_of(&[0, 1]), Some(Multigrade::new(1, 1)));
        assert_eq!(bf.grade_of(&[1]), Some(Multigrade::new(1, 1)));
    }

    #[test]
    fn test_incomparable_face_rejected() {
        let mut bf = Bifiltration::new(Grades::integers(3, 3));
        bf.add_simplex(&[0], Multigrade::new(2, 0)).unwrap();
        let err = bf.add_simplex(&[0, 1], Multigrade::new(0, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidFiltration { .. }));
    }

    #[test]
    fn test_rejected_simplex_leaves_no_trace() {
        let mut bf = Bifiltration::new(Grades::integers(3, 3));
        bf.add_simplex(&[2], Multigrade::new(1, 0)).unwrap();
        let err = bf.add_simplex(&[0, 2, 4], Multigrade::new(0, 1)).unwrap_err();
        assert_eq!(err, Error::InvalidFiltration { simplex: vec![0, 2, 4], face: vec![2] });

        assert_eq!(bf.len(), 1);
        assert_eq!(bf.grade_of(&[0, 2, 4]), None);
        assert_eq!(bf.grade_of(&[0, 4]), None);
        assert_eq!(bf.grade_of(&[2]), Some(Multigrade::new(1, 0)));

        // Still a valid bifiltration: one vertex, one bar
        let betti = crate::topology::BettiEngine::new(bf.boundary(0).unwrap(), bf.boundary(1).unwrap())
            .unwrap()
            .compute()
            .unwrap();
        assert_eq!(betti.totals(), (1, 0));
    }

    #[test]
    fn test_boundary_rows_follow_previous_columns() {
        let mut bf = Bifiltration::new(Grades::integers(2, 2));
        bf.add_simplex(&[0], Multigrade::new(1, 0)).unwrap();
        bf.add_simplex(&[1], Multigrade::new(0, 1)).unwrap();
        bf.add_simplex(&[0, 1], Multigrade::new(1, 1)).unwrap();

        let d0 = bf.boundary(0).unwrap();
        assert_eq!(d0.matrix.width(), 2);
        assert_eq!(d0.index.column_grades(), vec![Multigrade::new(1, 0), Multigrade::new(0, 1)]);

        let d1 = bf.boundary(1).unwrap();
        assert_eq!(d1.matrix.height(), 2);
        assert_eq!(d1.matrix.column(0).rows().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(d1.index.grade_range(1, 1), 0..1);
    }

    #[test]
    fn test_grade_out_of_range() {
        let mut bf = Bifiltration::new(Grades::integers(2, 2));
        assert!(matches!(
            bf.add_simplex(&[0], Multigrade::new(2, 0)),
            Err(Error::GradeOutOfRange { x: 2, .. })
        ));
    }
}
