//! Traversal order of the arrangement's faces.
//!
//! Faces sharing an anchor edge are adjacent in the dual graph. Crossing an
//! anchor costs roughly the number of simplices below it, so the walk
//! follows a minimum spanning tree of the dual graph (Kruskal) and visits
//! it depth first, stepping back across tree edges when a branch ends.

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::arrangement::{Arrangement, FaceId};
use crate::topology::{GradeBlock, Multigrade};

/// Number of simplices with grade ≤ each multigrade, indexed `[[y, x]]`.
pub(crate) fn dominated_counts(width: usize, height: usize, blocks: &[&[GradeBlock]]) -> Array2<usize> {
    let mut counts = Array2::<usize>::zeros((height, width));
    for block in blocks.iter().flat_map(|b| b.iter()) {
        counts[[block.grade.y, block.grade.x]] += block.num_cols;
    }
    for y in 0..height {
        for x in 0..width {
            let left = if x > 0 { counts[[y, x - 1]] } else { 0 };
            let below = if y > 0 { counts[[y - 1, x]] } else { 0 };
            let corner = if x > 0 && y > 0 { counts[[y - 1, x - 1]] } else { 0 };
            counts[[y, x]] += left + below - corner;
        }
    }
    counts
}

/// Faces in visiting order, starting at `start`. Consecutive faces share
/// an anchor edge.
pub(crate) fn face_path(arrangement: &Arrangement, start: FaceId, counts: &Array2<usize>) -> Vec<FaceId> {
    let n = arrangement.num_faces();
    if n == 0 {
        return Vec::new();
    }

    // Cheapest anchor crossing between each pair of faces
    let mut edges: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for h in arrangement.halfedges() {
        let (Some(anchor), Some(f)) = (h.anchor, h.face) else {
            continue;
        };
        let Some(g) = arrangement.halfedge(h.twin).face else {
            continue;
        };
        if f.index() >= g.index() {
            continue;
        }
        let grade: Multigrade = arrangement.anchor(anchor).grade;
        let weight = 1 + counts.get([grade.y, grade.x]).copied().unwrap_or(0);
        let entry = edges.entry((f.index(), g.index())).or_insert(weight);
        *entry = (*entry).min(weight);
    }
    let mut sorted: Vec<(usize, usize, usize)> = edges.into_iter().map(|((f, g), w)| (w, f, g)).collect();
    sorted.sort_unstable();

    let mut parent: Vec<usize> = (0..n).collect();
    let mut rank = vec![0usize; n];

    fn find(parent: &mut [usize], i: usize) -> usize {
        if parent[i] != i {
            parent[i] = find(parent, parent[i]);
        }
        parent[i]
    }

    let mut tree: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (_, f, g) in sorted {
        let (rf, rg) = (find(&mut parent, f), find(&mut parent, g));
        if rf == rg {
            continue;
        }
        if rank[rf] < rank[rg] {
            parent[rf] = rg;
        } else {
            parent[rg] = rf;
            if rank[rf] == rank[rg] {
                rank[rf] += 1;
            }
        }
        tree[f].push(g);
        tree[g].push(f);
    }
    for children in &mut tree {
        children.sort_unstable();
    }

    // Depth-first tour, stepping back to the parent after each subtree
    let mut path = vec![start];
    let mut visited = vec![false; n];
    visited[start.index()] = true;
    let mut remaining = n - 1;
    let mut stack: Vec<(usize, usize)> = vec![(start.index(), 0)];
    while remaining > 0 {
        let Some(&(face, next)) = stack.last() else {
            break;
        };
        match tree[face][next..].iter().position(|&c| !visited[c]) {
            Some(offset) => {
                let child = tree[face][next + offset];
                if let Some(top) = stack.last_mut() {
                    top.1 = next + offset + 1;
                }
                visited[child] = true;
                remaining -= 1;
                path.push(FaceId(child));
                stack.push((child, 0));
            }
            None => {
                stack.pop();
                if let Some(&(parent_face, _)) = stack.last() {
                    path.push(FaceId(parent_face));
                }
            }
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrangementConfig;
    use crate::topology::{Grades, SupportPoint};

    fn point(x: usize, y: usize) -> SupportPoint {
        SupportPoint { x, y, xi0: 1, xi1: 0 }
    }

    #[test]
    fn test_dominated_counts() {
        let blocks = [
            GradeBlock { grade: Multigrade::new(0, 0), first_col: 0, num_cols: 2 },
            GradeBlock { grade: Multigrade::new(1, 1), first_col: 2, num_cols: 1 },
        ];
        let counts = dominated_counts(2, 2, &[&blocks]);
        assert_eq!(counts[[0, 0]], 2);
        assert_eq!(counts[[0, 1]], 2);
        assert_eq!(counts[[1, 0]], 2);
        assert_eq!(counts[[1, 1]], 3);
    }

    #[test]
    fn test_path_visits_every_face_through_neighbours() {
        let grades = Grades::integers(4, 4);
        let points = [point(0, 3), point(1, 2), point(2, 1), point(3, 0)];
        let arrangement = Arrangement::build(&points, &grades, &ArrangementConfig::default()).unwrap();
        let counts = Array2::zeros((4, 4));
        let start = arrangement.bottom_face().unwrap();
        let path = face_path(&arrangement, start, &counts);

        assert_eq!(path[0], start);
        let mut seen: Vec<FaceId> = path.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), arrangement.num_faces());

        for step in path.windows(2) {
            let shared = arrangement.halfedges().iter().any(|h| {
                h.anchor.is_some() && h.face == Some(step[0]) && arrangement.halfedge(h.twin).face == Some(step[1])
            });
            assert!(shared, "{:?} and {:?} are not adjacent", step[0], step[1]);
        }
    }

    #[test]
    fn test_single_face_path() {
        let arrangement = Arrangement::build(&[], &Grades::integers(1, 1), &ArrangementConfig::default()).unwrap();
        let path = face_path(&arrangement, FaceId(0), &Array2::zeros((1, 1)));
        assert_eq!(path, vec![FaceId(0)]);
    }
}
