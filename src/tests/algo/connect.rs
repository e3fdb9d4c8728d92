use crate::graph::algo::*;
use petgraph::graph::UnGraph;
use petgraph::visit::Walker;

fn components_of(graph: &UnGraph<(), ()>) -> usize {
    let mut iter = ConnectedGraphIter::<usize, 1>::new(graph);
    std::iter::from_fn(|| iter.walk_next(graph)).count()
}

fn two_triangles() -> UnGraph<(), ()> {
    let mut graph = UnGraph::from_edges([(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
    graph.add_node(());
    graph
}

#[test]
fn components() {
    let graph = two_triangles();
    assert_eq!(components_of(&graph), 3);
    assert_eq!(num_cycles(&graph), 2);

    let mut iter = ConnectedGraphIter::<usize, 1>::new(&graph);
    let mut found = Vec::new();
    while let Some(bits) = iter.walk_next(&graph) {
        found.push(bits.iter_ones().collect::<Vec<_>>());
    }
    assert_eq!(found, [vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
}

#[test]
fn trees() {
    let path = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
    assert_eq!(components_of(&path), 1);
    assert_eq!(num_cycles(&path), 0);
    let empty = UnGraph::<(), ()>::default();
    assert_eq!(components_of(&empty), 0);
    assert_eq!(num_cycles(&empty), 0);
}
