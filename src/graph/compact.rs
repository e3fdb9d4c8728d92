//! Create a compact indexable form of a graph.

use crate::utils::bitset::BitSet;
use ahash::HashMap;
use petgraph::visit::*;
use smallvec::SmallVec;
use std::hash::Hash;

/// Snapshot of a graph's adjacency with the nodes renumbered `0..n`.
///
/// Stable graphs leave holes in their index space after removals, and the matching code wants
/// dense indices, so it works on one of these instead of on the graph itself.
#[derive(Debug, Clone)]
pub struct CompactGraph<N> {
    pub node_map: Vec<N>,
    pub inv_map: HashMap<N, usize>,
    neighbors: Vec<SmallVec<usize, 4>>,
    matrix: Vec<BitSet<usize, 1>>,
    edge_count: usize,
}
impl<N: Hash + Eq + Copy> CompactGraph<N> {
    pub fn new<G>(graph: G) -> Self
    where
        G: IntoNodeIdentifiers<NodeId = N> + IntoNeighbors,
    {
        let node_map: Vec<N> = graph.node_identifiers().collect();
        let inv_map: HashMap<N, usize> = node_map.iter().enumerate().map(|(v, &k)| (k, v)).collect();
        let mut neighbors = vec![SmallVec::new(); node_map.len()];
        let mut matrix = vec![BitSet::new(); node_map.len()];
        let mut edge_count = 0;
        for (i, &n) in node_map.iter().enumerate() {
            for m in graph.neighbors(n) {
                let Some(&j) = inv_map.get(&m) else {
                    continue;
                };
                if i == j || matrix[i].get(j) {
                    continue;
                }
                neighbors[i].push(j);
                matrix[i].set(j, true);
                if i < j {
                    edge_count += 1;
                }
            }
            neighbors[i].sort_unstable();
        }
        Self {
            node_map,
            inv_map,
            neighbors,
            matrix,
            edge_count,
        }
    }
    pub fn to_index(&self, node: N) -> Option<usize> {
        self.inv_map.get(&node).copied()
    }
    pub fn from_index(&self, i: usize) -> N {
        self.node_map[i]
    }
}
impl<N> CompactGraph<N> {
    pub fn node_count(&self) -> usize {
        self.node_map.len()
    }
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.matrix[a].get(b)
    }
}
