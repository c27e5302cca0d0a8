//! Reduced boundary matrices under adjacent transpositions.
//!
//! Maintains R = D·V over Z/2Z with V upper triangular, where the columns
//! and rows of D are permuted into the current filtration order. Columns
//! and rows are stored by their original ids; positions are kept in
//! permutation arrays so that a transposition only touches the two
//! affected columns.

use crate::topology::{BoundaryMatrix, SparseColumn};

#[derive(Debug, Clone)]
pub(crate) struct VineyardMatrix {
    reduced: Vec<SparseColumn>,
    tracking: Vec<SparseColumn>,
    col_at: Vec<usize>,
    col_pos: Vec<usize>,
    row_at: Vec<usize>,
    row_pos: Vec<usize>,
    lows: Vec<Option<usize>>,
    pivots: Vec<Option<usize>>,
}

fn inverse(order: &[usize]) -> Vec<usize> {
    let mut pos = vec![0; order.len()];
    for (i, &id) in order.iter().enumerate() {
        pos[id] = i;
    }
    pos
}

impl VineyardMatrix {
    /// Reduce `matrix` with columns in `col_order` and rows in `row_order`.
    pub fn new(matrix: &BoundaryMatrix, col_order: &[usize], row_order: &[usize]) -> Self {
        let width = matrix.width();
        let mut vm = Self {
            reduced: matrix.columns().to_vec(),
            tracking: (0..width).map(|j| SparseColumn::from_indices([j])).collect(),
            col_at: col_order.to_vec(),
            col_pos: inverse(col_order),
            row_at: row_order.to_vec(),
            row_pos: inverse(row_order),
            lows: vec![None; width],
            pivots: vec![None; matrix.height()],
        };
        for pos in 0..width {
            let col = vm.col_at[pos];
            while let Some(low) = vm.compute_low(col) {
                match vm.pivots[low] {
                    Some(other) => vm.add(other, col),
                    None => {
                        vm.pivots[low] = Some(col);
                        vm.lows[col] = Some(low);
                        break;
                    }
                }
            }
        }
        vm
    }

    pub fn width(&self) -> usize {
        self.col_at.len()
    }

    pub fn col_order(&self) -> &[usize] {
        &self.col_at
    }

    pub fn row_order(&self) -> &[usize] {
        &self.row_at
    }

    /// Current position of column `col`.
    pub fn position(&self, col: usize) -> usize {
        self.col_pos[col]
    }

    /// Row id of the pivot of column `col`.
    pub fn low(&self, col: usize) -> Option<usize> {
        self.lows[col]
    }

    /// Column whose pivot is row `row`.
    pub fn pivot(&self, row: usize) -> Option<usize> {
        self.pivots.get(row).copied().flatten()
    }

    pub fn is_zero(&self, col: usize) -> bool {
        self.reduced[col].is_zero()
    }

    /// (row, column) pairs of every pivot.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.lows.iter().enumerate().filter_map(|(col, low)| low.map(|row| (row, col)))
    }

    fn compute_low(&self, col: usize) -> Option<usize> {
        self.reduced[col].rows().max_by_key(|&r| self.row_pos[r])
    }

    fn add(&mut self, src: usize, dst: usize) {
        let column = self.reduced[src].clone();
        self.reduced[dst].add_assign(&column);
        let track = self.tracking[src].clone();
        self.tracking[dst].add_assign(&track);
    }

    fn refresh(&mut self, cols: &[usize]) {
        for &c in cols {
            if let Some(l) = self.lows[c] {
                if self.pivots[l] == Some(c) {
                    self.pivots[l] = None;
                }
            }
        }
        for &c in cols {
            self.lows[c] = self.compute_low(c);
            if let Some(l) = self.lows[c] {
                self.pivots[l] = Some(c);
            }
        }
    }

    /// Exchange the columns at positions `i` and `i + 1`.
    pub fn swap_columns(&mut self, i: usize) {
        let (a, b) = (self.col_at[i], self.col_at[i + 1]);
        let coupled = self.tracking[b].contains(a);
        if coupled {
            self.add(a, b);
        }
        self.col_at.swap(i, i + 1);
        self.col_pos[a] = i + 1;
        self.col_pos[b] = i;
        if !coupled {
            return;
        }
        let (la, lb) = (self.lows[a], self.lows[b]);
        let clash = match (la, lb) {
            (Some(_), None) => true,
            (Some(la), Some(lb)) => self.row_pos[la] > self.row_pos[lb],
            _ => false,
        };
        if clash {
            self.add(b, a);
        }
        self.refresh(&[a, b]);
    }

    /// Exchange the rows at positions `i` and `i + 1`.
    pub fn swap_rows(&mut self, i: usize) {
        let (r, s) = (self.row_at[i], self.row_at[i + 1]);
        let (cr, cs) = (self.pivots[r], self.pivots[s]);
        self.row_at.swap(i, i + 1);
        self.row_pos[r] = i + 1;
        self.row_pos[s] = i;
        match (cr, cs) {
            (Some(cr), Some(cs)) if self.reduced[cs].contains(r) => {
                if self.col_pos[cr] < self.col_pos[cs] {
                    self.add(cr, cs);
                } else {
                    self.add(cs, cr);
                }
                self.refresh(&[cr, cs]);
            }
            (_, Some(cs)) => self.refresh(&[cs]),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> BoundaryMatrix {
        // edges 01, 12, 02 over vertices 0, 1, 2
        BoundaryMatrix::from_columns(
            3,
            vec![
                SparseColumn::from_indices([0, 1]),
                SparseColumn::from_indices([1, 2]),
                SparseColumn::from_indices([0, 2]),
            ],
        )
    }

    fn pairs(vm: &VineyardMatrix) -> Vec<(usize, usize)> {
        let mut p: Vec<_> = vm.pairs().collect();
        p.sort_unstable();
        p
    }

    #[test]
    fn test_initial_reduction() {
        let vm = VineyardMatrix::new(&triangle(), &[0, 1, 2], &[0, 1, 2]);
        assert_eq!(vm.low(0), Some(1));
        assert_eq!(vm.low(1), Some(2));
        assert!(vm.is_zero(2));
        assert_eq!(vm.pivot(2), Some(1));
    }

    #[test]
    fn test_column_swap_moves_cycle() {
        let mut vm = VineyardMatrix::new(&triangle(), &[0, 1, 2], &[0, 1, 2]);
        vm.swap_columns(1);
        let fresh = VineyardMatrix::new(&triangle(), &[0, 2, 1], &[0, 1, 2]);
        assert_eq!(pairs(&vm), pairs(&fresh));
        assert!(vm.is_zero(1));
        assert_eq!(vm.col_order(), &[0, 2, 1]);
    }

    #[test]
    fn test_row_swap_matches_fresh() {
        let mut vm = VineyardMatrix::new(&triangle(), &[0, 1, 2], &[0, 1, 2]);
        vm.swap_rows(1);
        let fresh = VineyardMatrix::new(&triangle(), &[0, 1, 2], &[0, 2, 1]);
        assert_eq!(pairs(&vm), pairs(&fresh));
        assert_eq!(vm.row_order(), &[0, 2, 1]);
    }

    fn matrix_strategy() -> impl Strategy<Value = BoundaryMatrix> {
        prop::collection::vec(prop::collection::vec(0usize..6, 0..4), 1..8)
            .prop_map(|cols| BoundaryMatrix::from_columns(6, cols.into_iter().map(SparseColumn::from_indices).collect()))
    }

    proptest! {
        #[test]
        fn prop_transpositions_match_fresh_reduction(
            matrix in matrix_strategy(),
            moves in prop::collection::vec((any::<bool>(), 0usize..8), 0..20),
        ) {
            let width = matrix.width();
            let mut vm = VineyardMatrix::new(&matrix, &(0..width).collect::<Vec<_>>(), &(0..6).collect::<Vec<_>>());
            for (is_row, k) in moves {
                if is_row {
                    vm.swap_rows(k % 5);
                } else if width > 1 {
                    vm.swap_columns(k % (width - 1));
                }
            }
            let fresh = VineyardMatrix::new(&matrix, vm.col_order(), vm.row_order());
            prop_assert_eq!(pairs(&vm), pairs(&fresh));
        }
    }
}
