//! Function-Rips Bifiltration
//!
//! Given a point cloud X with a function f: X → ℝ (density, codensity,
//! eccentricity, birth time, ...), the function-Rips bifiltration indexes a
//! simplex σ by
//!
//! - x(σ) = max_{v ∈ σ} f(v)
//! - y(σ) = diam(σ) = max_{u,v ∈ σ} d(u, v)
//!
//! so σ is present at (a, b) iff all its vertices have f ≤ a and all its
//! edges have length ≤ b. Both parameters are discretised onto the sorted
//! distinct values that actually occur.

use ndarray::Array2;
use num::{BigRational, FromPrimitive};
use tracing::{debug, warn};

use super::bifiltration::Bifiltration;
use super::grades::{GradeAxis, Grades, Multigrade};
use crate::error::Result;

/// Function-Rips bifiltration builder
pub struct BifilteredRips {
    /// Distance matrix (precomputed)
    distances: Array2<f64>,
    /// Function value per point
    function: Vec<f64>,
    /// Maximum edge length
    max_distance: f64,
    /// Maximum simplex dimension
    max_dim: usize,
}

impl BifilteredRips {
    /// Create from a precomputed distance matrix
    pub fn from_distance_matrix(
        distances: &Array2<f64>,
        function: Vec<f64>,
        max_distance: f64,
        max_dim: usize,
    ) -> Self {
        Self {
            distances: distances.clone(),
            function,
            max_distance,
            max_dim,
        }
    }

    /// Create from point cloud (computes distance matrix)
    pub fn from_points(points: &Array2<f64>, function: Vec<f64>, max_distance: f64, max_dim: usize) -> Self {
        Self::from_distance_matrix(&Self::compute_distance_matrix(points), function, max_distance, max_dim)
    }

    /// Compute Euclidean distance matrix
    fn compute_distance_matrix(points: &Array2<f64>) -> Array2<f64> {
        let n = points.nrows();
        let dim = points.ncols();

        let mut dm = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            for j in i + 1..n {
                let mut dist_sq = 0.0;
                for d in 0..dim {
                    let diff = points[[i, d]] - points[[j, d]];
                    dist_sq += diff * diff;
                }
                let dist = dist_sq.sqrt();
                dm[[i, j]] = dist;
                dm[[j, i]] = dist;
            }
        }

        dm
    }

    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    fn value(&self, v: usize) -> Option<f64> {
        self.function.get(v).copied().filter(|f| f.is_finite())
    }

    /// Enumerate all cliques up to `max_dim` in the neighbourhood graph.
    fn simplices(&self) -> Vec<(Vec<usize>, f64, f64)> {
        let n = self.n_points();
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for i in 0..n {
            for j in i + 1..n {
                if self.distances[[i, j]] <= self.max_distance {
                    neighbors[i].push(j);
                }
            }
        }

        let mut out = Vec::new();
        let mut stack: Vec<(Vec<usize>, f64, f64)> = (0..n)
            .filter_map(|v| self.value(v).map(|f| (vec![v], f, 0.0)))
            .collect();
        while let Some((simplex, fx, diam)) = stack.pop() {
            if simplex.len() <= self.max_dim {
                let last = simplex[simplex.len() - 1];
                for &w in &neighbors[last] {
                    let Some(fw) = self.value(w) else {
                        continue;
                    };
                    if simplex.iter().all(|&u| self.distances[[u, w]] <= self.max_distance) {
                        let grown_diam = simplex
                            .iter()
                            .map(|&u| self.distances[[u, w]])
                            .fold(diam, f64::max);
                        let mut grown = simplex.clone();
                        grown.push(w);
                        stack.push((grown, fx.max(fw), grown_diam));
                    }
                }
            }
            out.push((simplex, fx, diam));
        }
        out
    }

    /// Build the discretised bifiltration.
    pub fn bifiltration(&self) -> Result<Bifiltration> {
        if self.function.len() != self.n_points() {
            warn!(
                points = self.n_points(),
                values = self.function.len(),
                "function values do not match point count; missing values treated as absent"
            );
        }
        let simplices = self.simplices();
        let xs: Vec<f64> = simplices.iter().map(|s| s.1).collect();
        let ys: Vec<f64> = simplices.iter().map(|s| s.2).collect();
        let grades = Grades::new(GradeAxis::from_f64(&xs), GradeAxis::from_f64(&ys));

        let mut bifiltration = Bifiltration::new(grades.clone());
        for (simplex, fx, diam) in &simplices {
            let (Some(x), Some(y)) = (locate(&grades.x, *fx), locate(&grades.y, *diam)) else {
                continue;
            };
            bifiltration.add_simplex(simplex, Multigrade::new(x, y))?;
        }
        debug!(
            simplices = bifiltration.len(),
            x_grades = grades.width(),
            y_grades = grades.height(),
            "built function-Rips bifiltration"
        );
        Ok(bifiltration)
    }
}

fn locate(axis: &GradeAxis, value: f64) -> Option<usize> {
    BigRational::from_f64(value).and_then(|r| axis.position(&r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::BoundaryProvider;
    use ndarray::array;

    #[test]
    fn test_square_grades() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let rips = BifilteredRips::from_points(&points, vec![0.0, 1.0, 0.0, 1.0], 1.5, 2);
        let bf = rips.bifiltration().unwrap();

        // 4 vertices, 6 edges, 4 triangles
        assert_eq!(bf.len(), 14);
        let grades = bf.grades();
        assert_eq!(grades.x.values(), &[0.0, 1.0]);
        assert_eq!(grades.y.len(), 3);

        let side = bf.grade_of(&[0, 1]).unwrap();
        assert_eq!(grades.point(side), (1.0, 1.0));
        let diagonal = bf.grade_of(&[0, 2]).unwrap();
        let (dx, dy) = grades.point(diagonal);
        assert!((dx - 0.0).abs() < 1e-10);
        assert!((dy - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_cycle_metric_keeps_its_loop() {
        // Four points on a cycle graph: sides 1, diagonals 2
        let distances = array![
            [0.0, 1.0, 2.0, 1.0],
            [1.0, 0.0, 1.0, 2.0],
            [2.0, 1.0, 0.0, 1.0],
            [1.0, 2.0, 1.0, 0.0]
        ];
        let rips = BifilteredRips::from_distance_matrix(&distances, vec![0.0, 0.0, 1.0, 1.0], 1.5, 2);
        assert_eq!(rips.n_points(), 4);
        let bf = rips.bifiltration().unwrap();

        // No diagonals, so no triangles
        assert_eq!(bf.len(), 8);
        assert!(bf.grade_of(&[0, 2]).is_none());
        assert_eq!(bf.grades().point(bf.grade_of(&[1, 2]).unwrap()), (1.0, 1.0));

        let output = crate::pipeline::compute(&bf, &crate::PipelineConfig::with_dimension(1)).unwrap();
        assert_eq!((output.stats.xi0_total, output.stats.xi1_total), (1, 0));
    }

    #[test]
    fn test_cutoff_limits_edges() {
        let points = array![[0.0], [1.0], [5.0]];
        let rips = BifilteredRips::from_points(&points, vec![0.0; 3], 2.0, 1);
        let bf = rips.bifiltration().unwrap();
        assert_eq!(bf.len(), 4);
        assert!(bf.grade_of(&[0, 2]).is_none());
        let d1 = bf.boundary(1).unwrap();
        assert_eq!(d1.matrix.width(), 1);
    }
}
