use crate::graph::algo::*;
use petgraph::graph::UnGraph;
use petgraph::stable_graph::StableUnGraph;

#[test]
fn propane_skeleton() {
    let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
    let values = connectivity_values(&graph, |_| 1).unwrap();
    assert_eq!(values[0], values[2]);
    assert_ne!(values[0], values[1]);
}

#[test]
fn symmetric_ring() {
    let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
    let values = connectivity_values(&graph, |_| 1).unwrap();
    assert!(values.iter().all(|&v| v == values[0]));
}

#[test]
fn long_chain() {
    let edges: Vec<(u32, u32)> = (0..499).map(|i| (i, i + 1)).collect();
    let graph = UnGraph::<(), ()>::from_edges(edges);
    let values = connectivity_values(&graph, |_| 2).unwrap();
    assert_eq!(values.len(), 500);
    assert!(values.iter().all(|&v| v <= 500));
    for i in 0..250 {
        assert_eq!(values[i], values[499 - i]);
    }
    assert_ne!(values[0], values[1]);
}

#[test]
fn overflow() {
    let graph = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2), (0, 3)]);
    assert_eq!(
        connectivity_values(&graph, |_| u64::MAX),
        Err(ConnectivityOverflow(1))
    );
}

#[test]
fn holes() {
    let mut graph = StableUnGraph::<(), ()>::default();
    let a = graph.add_node(());
    let b = graph.add_node(());
    let c = graph.add_node(());
    graph.add_edge(a, b, ());
    graph.add_edge(b, c, ());
    graph.add_edge(a, c, ());
    graph.remove_node(b);
    let values = connectivity_values(&graph, |_| 1).unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[1], 0);
    assert_eq!(values[0], values[2]);
    assert_ne!(values[0], 0);
}
