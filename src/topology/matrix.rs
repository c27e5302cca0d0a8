//! Sparse Boundary Matrices over Z/2Z
//!
//! Columns are stored sparsely as ordered row sets. Reduction never
//! reorders columns; it only adds an earlier column to a later one, so the
//! column index of a simplex is stable for the lifetime of the matrix.
//!
//! ## Operations
//!
//! - `low(j)`: the largest row index with a nonzero entry in column j
//! - `add_column(i, j)`: column j ← column j + column i (symmetric difference)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sparse column: non-zero row indices of one boundary column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseColumn {
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    pub fn new() -> Self {
        Self { rows: BTreeSet::new() }
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut column = Self::new();
        for row in indices {
            column.toggle(row);
        }
        column
    }

    pub fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the lowest (maximum) non-zero index
    pub fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Flip a single entry.
    pub fn toggle(&mut self, row: usize) {
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    /// XOR (symmetric difference) with another column - addition in Z/2Z
    pub fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            self.toggle(row);
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column-sparse boundary matrix over Z/2Z.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryMatrix {
    height: usize,
    columns: Vec<SparseColumn>,
}

impl BoundaryMatrix {
    /// Empty matrix with `height` rows and no columns.
    pub fn new(height: usize) -> Self {
        Self { height, columns: Vec::new() }
    }

    pub fn from_columns(height: usize, columns: Vec<SparseColumn>) -> Self {
        Self { height, columns }
    }

    /// `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let columns = (0..n).map(|i| SparseColumn::from_indices([i])).collect();
        Self { height: n, columns }
    }

    pub fn push_column(&mut self, column: SparseColumn) {
        self.columns.push(column);
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn column(&self, j: usize) -> &SparseColumn {
        &self.columns[j]
    }

    pub fn low(&self, j: usize) -> Option<usize> {
        self.columns[j].low()
    }

    pub fn is_zero(&self, j: usize) -> bool {
        self.columns[j].is_zero()
    }

    /// Column `dst` ← column `dst` + column `src`.
    pub fn add_column(&mut self, src: usize, dst: usize) {
        debug_assert_ne!(src, dst);
        let source = std::mem::take(&mut self.columns[src]);
        self.columns[dst].add_assign(&source);
        self.columns[src] = source;
    }

    pub fn columns(&self) -> &[SparseColumn] {
        &self.columns
    }
}
