use crate::graph::algo::isomorphism::NoSemanticMatch;
use crate::graph::algo::*;
use crate::graph::CompactGraph;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::stable_graph::StableUnGraph;

type Compact = CompactGraph<NodeIndex>;

fn compact(edges: &[(u32, u32)]) -> Compact {
    CompactGraph::new(&UnGraph::<(), ()>::from_edges(edges))
}

fn hexagon() -> Compact {
    compact(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)])
}

fn same_structure(g0: &Compact, g1: &Compact) -> bool {
    GraphMatcher::new(
        g0,
        g1,
        NoSemanticMatch,
        NoSemanticMatch,
        MatchMode::Isomorphism,
        &[],
    )
    .next()
    .is_some()
}

fn count(pattern: &Compact, host: &Compact, mode: MatchMode, seed: &[(usize, usize)]) -> usize {
    matches_iter(pattern, host, |_, _| true, |_, _| true, mode, seed).count()
}

#[test]
fn compact_graph() {
    let mut graph = StableUnGraph::<(), ()>::default();
    let nodes: Vec<_> = (0..4).map(|_| graph.add_node(())).collect();
    graph.add_edge(nodes[0], nodes[1], ());
    graph.add_edge(nodes[1], nodes[2], ());
    graph.add_edge(nodes[2], nodes[3], ());
    graph.remove_node(nodes[1]);
    let compact = CompactGraph::new(&graph);
    assert_eq!(compact.node_count(), 3);
    assert_eq!(compact.edge_count(), 1);
    let c = compact.to_index(nodes[2]).unwrap();
    let d = compact.to_index(nodes[3]).unwrap();
    assert!(compact.is_adjacent(c, d));
    assert_eq!(compact.from_index(c), nodes[2]);
    assert_eq!(compact.degree(compact.to_index(nodes[0]).unwrap()), 0);
    assert_eq!(compact.to_index(nodes[1]), None);
}

#[test]
fn structure_only() {
    let relabeled = compact(&[(0, 3), (3, 1), (1, 4), (4, 2), (2, 5), (5, 0)]);
    assert!(same_structure(&hexagon(), &relabeled));
    // same degrees and sizes, different shape
    let triangles = compact(&[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
    assert!(!same_structure(&hexagon(), &triangles));
}

#[test]
fn automorphisms() {
    let hex = hexagon();
    let mut matcher = GraphMatcher::new(
        &hex,
        &hex,
        NoSemanticMatch,
        NoSemanticMatch,
        MatchMode::Isomorphism,
        &[],
    );
    let mut found = 0;
    while matcher.next().is_some() {
        found += 1;
    }
    assert_eq!(found, 12);
    assert!(matcher.steps() > 0);
}

#[test]
fn monomorphisms() {
    let path = compact(&[(0, 1), (1, 2)]);
    let triangle = compact(&[(0, 1), (1, 2), (2, 0)]);
    assert_eq!(count(&path, &triangle, MatchMode::Monomorphism, &[]), 6);
    assert_eq!(count(&path, &triangle, MatchMode::Isomorphism, &[]), 0);
    assert_eq!(count(&triangle, &path, MatchMode::Monomorphism, &[]), 0);
    // a path fits a hexagon twice per starting node
    assert_eq!(count(&path, &hexagon(), MatchMode::Monomorphism, &[]), 12);
}

#[test]
fn seeded() {
    let path = compact(&[(0, 1), (1, 2)]);
    let triangle = compact(&[(0, 1), (1, 2), (2, 0)]);
    let found: Vec<_> = matches_iter(
        &path,
        &triangle,
        |_, _| true,
        |_, _| true,
        MatchMode::Monomorphism,
        &[(1, 0)],
    )
    .collect();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|m| m[1] == 0));

    // out of range, or repeating a host node
    assert_eq!(count(&path, &triangle, MatchMode::Monomorphism, &[(3, 0)]), 0);
    assert_eq!(
        count(&path, &triangle, MatchMode::Monomorphism, &[(0, 0), (1, 0)]),
        0
    );
    // a seed that isn't adjacent where the pattern is
    assert_eq!(
        count(&path, &hexagon(), MatchMode::Monomorphism, &[(0, 0), (1, 3)]),
        0
    );
    // a complete seed is the only mapping
    let square = compact(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let full = [(0, 0), (1, 1), (2, 2), (3, 3)];
    assert_eq!(count(&square, &square, MatchMode::Isomorphism, &full), 1);
}

#[test]
fn semantic() {
    // colors by index parity, so only the even rotations and their reflections survive
    let hex = hexagon();
    let found = matches_iter(
        &hex,
        &hex,
        |a: usize, b: usize| a % 2 == b % 2,
        |_, _| true,
        MatchMode::Isomorphism,
        &[],
    )
    .count();
    assert_eq!(found, 6);

    let path = compact(&[(0, 1), (1, 2)]);
    let none = matches_iter(
        &path,
        &hex,
        |_, _| true,
        |_, _| false,
        MatchMode::Monomorphism,
        &[],
    )
    .count();
    assert_eq!(none, 0);
}
