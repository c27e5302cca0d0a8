//! Discrete and projected barcodes.
//!
//! A face stores its barcode in terms of support-point indices, which do
//! not depend on which slice of the face is queried. Projecting onto a
//! concrete slice line turns each index into the arc-length coordinate of
//! the pushed support point.

use serde::{Deserialize, Serialize};

use crate::arrangement::SliceLine;
use crate::topology::{Grades, SupportPoint};

/// End of a discrete bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Death {
    /// Dies at the push of this support point.
    Finite(usize),
    Infinite,
}

/// A bar between support points, by support-point index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscreteBar {
    pub birth: usize,
    pub death: Death,
}

/// Multiset of discrete bars, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteBarcode {
    bars: Vec<DiscreteBar>,
}

impl DiscreteBarcode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, birth: usize, death: Death) {
        let bar = DiscreteBar { birth, death };
        let at = self.bars.partition_point(|b| *b <= bar);
        self.bars.insert(at, bar);
    }

    pub fn bars(&self) -> &[DiscreteBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Barcode along `line`. Bars whose birth never meets the line are
    /// dropped.
    pub fn project(&self, line: &SliceLine, grades: &Grades, points: &[SupportPoint]) -> Barcode {
        let coordinate = |i: usize| {
            points.get(i).and_then(|p| {
                let (x, y) = grades.point(p.grade());
                line.coordinate(x, y)
            })
        };
        let mut barcode = Barcode::new();
        for bar in &self.bars {
            let Some(birth) = coordinate(bar.birth) else {
                continue;
            };
            let death = match bar.death {
                Death::Finite(j) => coordinate(j).unwrap_or(f64::INFINITY),
                Death::Infinite => f64::INFINITY,
            };
            barcode.add(Bar::new(birth, death));
        }
        barcode
    }
}

/// A persistence interval in slice coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub birth: f64,
    pub death: f64,
}

impl Bar {
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    pub fn persistence(&self) -> f64 {
        if self.death.is_infinite() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// Barcode of one slice, sorted by birth then death.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    pub bars: Vec<Bar>,
}

impl Barcode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bar: Bar) {
        let at = self
            .bars
            .partition_point(|b| (b.birth, b.death) <= (bar.birth, bar.death));
        self.bars.insert(at, bar);
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars with a finite death.
    pub fn finite(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(|b| !b.is_essential())
    }

    pub fn essential_count(&self) -> usize {
        self.bars.iter().filter(|b| b.is_essential()).count()
    }

    /// Sum of finite persistences.
    pub fn total_persistence(&self) -> f64 {
        self.finite().map(|b| b.persistence()).sum()
    }

    /// Shannon entropy of the finite persistences.
    pub fn persistence_entropy(&self) -> f64 {
        let lengths: Vec<f64> = self
            .finite()
            .map(|b| b.persistence())
            .filter(|&p| p > 0.0)
            .collect();
        let total: f64 = lengths.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let mut entropy = 0.0;
        for p in lengths {
            let prob = p / total;
            entropy -= prob * prob.ln();
        }
        entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_bars_sorted() {
        let mut barcode = DiscreteBarcode::new();
        barcode.add(2, Death::Infinite);
        barcode.add(0, Death::Finite(3));
        barcode.add(0, Death::Finite(1));
        assert_eq!(
            barcode.bars(),
            &[
                DiscreteBar { birth: 0, death: Death::Finite(1) },
                DiscreteBar { birth: 0, death: Death::Finite(3) },
                DiscreteBar { birth: 2, death: Death::Infinite },
            ]
        );
    }

    #[test]
    fn test_projection_onto_diagonal() {
        let grades = Grades::integers(4, 4);
        let points = vec![
            SupportPoint { x: 1, y: 0, xi0: 1, xi1: 0 },
            SupportPoint { x: 2, y: 2, xi0: 0, xi1: 1 },
        ];
        let mut discrete = DiscreteBarcode::new();
        discrete.add(0, Death::Finite(1));
        discrete.add(0, Death::Infinite);

        let barcode = discrete.project(&SliceLine::from_dual(1.0, 0.0), &grades, &points);
        let root2 = 2.0_f64.sqrt();
        assert_eq!(barcode.len(), 2);
        assert!((barcode.bars[0].birth - root2).abs() < 1e-12);
        assert!((barcode.bars[0].death - 2.0 * root2).abs() < 1e-12);
        assert!(barcode.bars[1].is_essential());
        assert_eq!(barcode.essential_count(), 1);
        assert!((barcode.total_persistence() - root2).abs() < 1e-12);
    }

    #[test]
    fn test_entropy() {
        let mut barcode = Barcode::new();
        barcode.add(Bar::new(0.0, 1.0));
        assert!(barcode.persistence_entropy().abs() < 1e-12);
        barcode.add(Bar::new(0.0, 1.0));
        assert!((barcode.persistence_entropy() - 2.0_f64.ln()).abs() < 1e-12);
        barcode.add(Bar::new(1.0, f64::INFINITY));
        assert!((barcode.persistence_entropy() - 2.0_f64.ln()).abs() < 1e-12);
    }
}
