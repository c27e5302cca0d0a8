//! Hand-built bifiltrations shared by unit tests.

use proptest::prelude::*;

use super::{Bifiltration, Grades, Multigrade};

/// Two triangle loops born at (1,2) and (3,1), joined by a cylinder at
/// (3,2). In H₁: generators at (1,2) and (3,1), one relation at (3,2).
pub(crate) fn two_loops() -> Bifiltration {
    let mut bf = Bifiltration::new(Grades::integers(4, 3));
    let first = Multigrade::new(1, 2);
    let second = Multigrade::new(3, 1);
    let joined = Multigrade::new(3, 2);

    for edge in [[0, 1], [1, 2], [0, 2]] {
        bf.add_simplex(&edge, first).unwrap();
    }
    for edge in [[3, 4], [4, 5], [3, 5]] {
        bf.add_simplex(&edge, second).unwrap();
    }
    for triangle in [[0, 1, 4], [0, 3, 4], [1, 2, 5], [1, 4, 5], [0, 2, 3], [2, 3, 5]] {
        bf.add_simplex(&triangle, joined).unwrap();
    }
    bf
}

/// A single loop born at the origin that never dies.
pub(crate) fn persistent_loop() -> Bifiltration {
    let mut bf = Bifiltration::new(Grades::integers(2, 2));
    for edge in [[0, 1], [1, 2], [0, 2]] {
        bf.add_simplex(&edge, Multigrade::new(0, 0)).unwrap();
    }
    bf
}

/// Vertices on a staircase that merge at a common grade: three H₀
/// generators on an antichain, and relations at (2,3) and (3,3).
pub(crate) fn staircase() -> Bifiltration {
    let mut bf = Bifiltration::new(Grades::integers(4, 4));
    bf.add_simplex(&[0], Multigrade::new(0, 3)).unwrap();
    bf.add_simplex(&[1], Multigrade::new(1, 2)).unwrap();
    bf.add_simplex(&[2], Multigrade::new(3, 0)).unwrap();
    bf.add_simplex(&[0, 1], Multigrade::new(2, 3)).unwrap();
    bf.add_simplex(&[1, 2], Multigrade::new(3, 3)).unwrap();
    bf
}

/// Random 1-critical bifiltrations on a `width` × `height` integer grid over
/// `vertices` vertices, with simplices of up to three vertices. Insertions
/// that would break the face order are rejected and must leave the
/// bifiltration as it was.
pub(crate) fn random_bifiltration(
    width: usize,
    height: usize,
    vertices: usize,
    max_simplices: usize,
) -> impl Strategy<Value = Bifiltration> {
    prop::collection::vec(
        (prop::collection::btree_set(0..vertices, 1..=3), 0..width, 0..height),
        1..max_simplices,
    )
    .prop_map(move |simplices| {
        let mut bf = Bifiltration::new(Grades::integers(width, height));
        for (simplex, x, y) in simplices {
            let simplex: Vec<usize> = simplex.into_iter().collect();
            let before = bf.clone();
            if bf.add_simplex(&simplex, Multigrade::new(x, y)).is_err() {
                assert_eq!(bf, before, "rejected insertion of {:?} changed the bifiltration", simplex);
            }
        }
        bf
    })
}
