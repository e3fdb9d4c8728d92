use crate::utils::bitset::BitSet;
use num_traits::PrimInt;
use petgraph::unionfind::UnionFind;
use petgraph::visit::*;
use smallvec::{smallvec, SmallVec};
use std::fmt::{self, Binary, Debug, Formatter};

/// Iterate over the connected components of a graph, returning their node indices as bits.
#[derive(Clone)]
pub struct ConnectedGraphIter<T = usize, const N: usize = 8> {
    pub full: BitSet<T, N>,
    pub seen: BitSet<T, N>,
}

impl<T: PrimInt, const N: usize> ConnectedGraphIter<T, N> {
    pub fn new<G: IntoNodeIdentifiers + NodeIndexable>(graph: G) -> Self {
        let mut full = BitSet::with_capacity(graph.node_bound());
        for id in graph.node_identifiers() {
            full.set(graph.to_index(id), true);
        }
        let seen = BitSet::with_capacity(graph.node_bound());
        Self { full, seen }
    }
}

impl<T: Binary, const N: usize> Debug for ConnectedGraphIter<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectedGraphIter")
            .field("full", &self.full)
            .field("seen", &self.seen)
            .finish()
    }
}

impl<G: IntoNeighbors + NodeIndexable, T: PrimInt, const N: usize> Walker<G>
    for ConnectedGraphIter<T, N>
{
    type Item = BitSet<T, N>;
    fn walk_next(&mut self, graph: G) -> Option<BitSet<T, N>> {
        let start = self
            .full
            .iter_ones()
            .find(|&i| !self.seen.get(i))?;
        let mut stack: SmallVec<G::NodeId, 8> = smallvec![graph.from_index(start)];
        let mut out = BitSet::with_capacity(graph.node_bound());
        self.seen.set(start, true);
        while let Some(id) = stack.pop() {
            out.set(graph.to_index(id), true);
            for n in graph.neighbors(id) {
                let idx = graph.to_index(n);
                if self.full.get(idx) && !self.seen.get(idx) {
                    self.seen.set(idx, true);
                    stack.push(n);
                }
            }
        }
        Some(out)
    }
}

/// Find the number of independent cycles in a graph by counting the edges that aren't in a
/// spanning forest.
pub fn num_cycles<G: NodeIndexable + IntoEdgeReferences>(graph: G) -> usize {
    let mut union = UnionFind::new(graph.node_bound());
    let mut out = 0;
    for edge in graph.edge_references() {
        let ai = graph.to_index(edge.source());
        let bi = graph.to_index(edge.target());
        if !union.union(ai, bi) {
            out += 1;
        }
    }
    out
}
