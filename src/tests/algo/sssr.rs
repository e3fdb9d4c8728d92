use crate::graph::algo::sssr::normalize_ring;
use crate::graph::algo::*;
use petgraph::graph::UnGraph;

fn ring_key(ring: &[usize]) -> Vec<usize> {
    ring.to_vec()
}

#[test]
fn normalization() {
    assert_eq!(normalize_ring(vec![3, 1, 4, 2]), [1, 3, 2, 4]);
    assert_eq!(normalize_ring(vec![2, 0, 1]), [0, 1, 2]);
    assert_eq!(normalize_ring(vec![0, 1, 2]), [0, 1, 2]);
    assert!(normalize_ring(Vec::new()).is_empty());
}

#[test]
fn cube() {
    let graph = UnGraph::<(), ()>::from_edges([
        (0, 1),
        (0, 2),
        (0, 4),
        (1, 3),
        (1, 5),
        (2, 3),
        (2, 6),
        (3, 7),
        (4, 5),
        (4, 6),
        (5, 7),
        (6, 7),
    ]);
    let basis = minimum_cycle_basis(&graph, ring_key);
    assert_eq!(basis.len(), 5);
    assert!(basis.iter().all(|r| r.len() == 4));
    // repeated runs agree
    assert_eq!(basis, minimum_cycle_basis(&graph, ring_key));
}

#[test]
fn fused_hexagons() {
    // two hexagons sharing the 0-5 edge
    let graph = UnGraph::<(), ()>::from_edges([
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 0),
        (5, 6),
        (6, 7),
        (7, 8),
        (8, 9),
        (9, 0),
    ]);
    let basis = minimum_cycle_basis(&graph, ring_key);
    assert_eq!(basis, [vec![0, 1, 2, 3, 4, 5], vec![0, 5, 6, 7, 8, 9]]);
}

#[test]
fn acyclic() {
    let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
    assert!(minimum_cycle_basis(&graph, ring_key).is_empty());
    assert_eq!(shortest_cycle_through(&graph, 1, ring_key), None);
}

#[test]
fn shortest_through() {
    // a triangle and a square sharing node 0
    let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 5), (5, 0)]);
    assert_eq!(shortest_cycle_through(&graph, 0, ring_key), Some(vec![0, 1, 2]));
    assert_eq!(shortest_cycle_through(&graph, 4, ring_key), Some(vec![0, 3, 4, 5]));
    assert_eq!(shortest_cycle_through(&graph, 17, ring_key), None);
}
