//! Smallest set of smallest rings, computed as a minimum cycle basis.
//!
//! Candidates come from Horton's construction: for every root and every edge not in the root's
//! breadth-first tree, the two tree paths to the edge's ends closed by the edge itself. The
//! candidates are sorted and then accepted greedily while they stay independent over GF(2).
//!
//! Everything here works on node indices as given by `NodeIndexable::to_index`.

use super::connect::num_cycles;
use crate::utils::bitset::BitSet;
use ahash::{HashMap, HashSet};
use petgraph::visit::*;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, instrument, trace};

/// A simple cycle, with its nodes in traversal order and its edges as a bit set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub nodes: Vec<usize>,
    pub edges: BitSet<usize, 4>,
}

/// Sorted adjacency lists and edge numbering for a graph.
#[derive(Debug, Clone)]
struct Adjacency {
    neighbors: Vec<Vec<usize>>,
    edge_ids: HashMap<(usize, usize), usize>,
    /// Edges in the order they were numbered
    edge_list: Vec<(usize, usize)>,
    present: Vec<bool>,
}
impl Adjacency {
    fn new<G>(graph: G) -> Self
    where
        G: IntoNodeIdentifiers + IntoEdgeReferences + NodeIndexable,
    {
        let bound = graph.node_bound();
        let mut neighbors = vec![Vec::new(); bound];
        let mut present = vec![false; bound];
        for n in graph.node_identifiers() {
            present[graph.to_index(n)] = true;
        }
        let mut edge_ids = HashMap::default();
        let mut edge_list = Vec::new();
        for edge in graph.edge_references() {
            let a = graph.to_index(edge.source());
            let b = graph.to_index(edge.target());
            if a == b {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if edge_ids.contains_key(&key) {
                continue;
            }
            edge_ids.insert(key, edge_list.len());
            edge_list.push(key);
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }
        Self {
            neighbors,
            edge_ids,
            edge_list,
            present,
        }
    }

    fn edge_id(&self, a: usize, b: usize) -> Option<usize> {
        self.edge_ids.get(&(a.min(b), a.max(b))).copied()
    }

    /// Breadth-first tree from `root`, as (distance, parent) pairs.
    fn bfs(&self, root: usize) -> Vec<Option<(usize, usize)>> {
        let mut tree = vec![None; self.neighbors.len()];
        tree[root] = Some((0, root));
        let mut queue = VecDeque::from([root]);
        while let Some(n) = queue.pop_front() {
            let Some((d, _)) = tree[n] else {
                continue;
            };
            for &m in &self.neighbors[n] {
                if tree[m].is_none() {
                    tree[m] = Some((d + 1, n));
                    queue.push_back(m);
                }
            }
        }
        tree
    }

    /// Every Horton candidate rooted at `root`.
    fn candidates_from(&self, root: usize, out: &mut Vec<Cycle>) {
        let tree = self.bfs(root);
        let path = |mut n: usize| {
            let mut out = vec![n];
            while n != root {
                n = tree[n].map_or(root, |(_, p)| p);
                out.push(n);
            }
            out
        };
        for &(a, b) in &self.edge_list {
            if a == root || b == root {
                continue;
            }
            let (Some((_, pa)), Some((_, pb))) = (tree[a], tree[b]) else {
                continue;
            };
            if pa == b || pb == a {
                continue;
            }
            let pa_path = path(a);
            let pb_path = path(b);
            // the paths share only the root iff they leave it through different nodes
            let branch_a = pa_path[pa_path.len().saturating_sub(2)];
            let branch_b = pb_path[pb_path.len().saturating_sub(2)];
            if branch_a == branch_b {
                continue;
            }
            let mut nodes = pa_path;
            nodes.pop();
            nodes.extend(pb_path.into_iter().rev());
            if let Some(cycle) = self.make_cycle(nodes) {
                out.push(cycle);
            }
        }
    }

    fn make_cycle(&self, nodes: Vec<usize>) -> Option<Cycle> {
        let mut edges = BitSet::new();
        for i in 0..nodes.len() {
            let a = nodes[i];
            let b = nodes[(i + 1) % nodes.len()];
            edges.set(self.edge_id(a, b)?, true);
        }
        Some(Cycle {
            nodes: normalize_ring(nodes),
            edges,
        })
    }
}

/// Rotate a ring so it starts at its smallest node, then go toward the smaller neighbor.
pub fn normalize_ring(mut nodes: Vec<usize>) -> Vec<usize> {
    let Some(start) = nodes.iter().enumerate().min_by_key(|&(_, &n)| n).map(|(i, _)| i) else {
        return nodes;
    };
    nodes.rotate_left(start);
    if nodes.len() > 2 && nodes[nodes.len() - 1] < nodes[1] {
        nodes[1..].reverse();
    }
    nodes
}

/// Collect the distinct Horton candidates for the whole graph.
fn all_candidates(adj: &Adjacency) -> Vec<Cycle> {
    let mut raw = Vec::new();
    for root in 0..adj.neighbors.len() {
        if adj.present[root] && adj.neighbors[root].len() >= 2 {
            adj.candidates_from(root, &mut raw);
        }
    }
    let mut seen = HashSet::default();
    raw.retain(|c| seen.insert(c.edges.iter_ones().collect::<Vec<_>>()));
    raw
}

/// Incremental GF(2) elimination, with rows keyed by their highest set bit.
#[derive(Debug, Default)]
struct Gf2Basis {
    rows: BTreeMap<usize, BitSet<usize, 4>>,
}
impl Gf2Basis {
    /// Add a row if it's independent of the ones already present.
    fn try_insert(&mut self, row: &BitSet<usize, 4>) -> bool {
        let mut row = row.clone();
        while let Some(pivot) = row.last_one() {
            match self.rows.get(&pivot) {
                Some(existing) => row ^= existing,
                None => {
                    self.rows.insert(pivot, row);
                    return true;
                }
            }
        }
        false
    }
}

/// Find a minimum cycle basis for a graph.
///
/// Candidates are ordered by size and then by `key`, which is called with each normalized ring.
/// The key has to totally order distinct rings for the result to be reproducible.
#[instrument(level = "trace", skip_all)]
pub fn minimum_cycle_basis<G, K, F>(graph: G, mut key: F) -> Vec<Vec<usize>>
where
    G: IntoNodeIdentifiers + IntoEdgeReferences + NodeIndexable,
    K: Ord,
    F: FnMut(&[usize]) -> K,
{
    let rank = num_cycles(graph);
    if rank == 0 {
        return Vec::new();
    }
    let adj = Adjacency::new(graph);
    let mut candidates: Vec<(usize, K, Cycle)> = all_candidates(&adj)
        .into_iter()
        .map(|c| (c.nodes.len(), key(&c.nodes), c))
        .collect();
    candidates.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.nodes.cmp(&b.2.nodes))
    });
    debug!(rank, candidates = candidates.len(), "selecting rings");
    let mut basis = Gf2Basis::default();
    let mut out = Vec::with_capacity(rank);
    for (_, _, cycle) in candidates {
        if basis.try_insert(&cycle.edges) {
            trace!(ring = ?cycle.nodes, "accepted ring");
            out.push(cycle.nodes);
            if out.len() == rank {
                break;
            }
        }
    }
    out
}

/// Find the shortest cycle that passes through `root`, using `key` to break ties.
pub fn shortest_cycle_through<G, K, F>(graph: G, root: usize, mut key: F) -> Option<Vec<usize>>
where
    G: IntoNodeIdentifiers + IntoEdgeReferences + NodeIndexable,
    K: Ord,
    F: FnMut(&[usize]) -> K,
{
    let adj = Adjacency::new(graph);
    if !adj.present.get(root).copied().unwrap_or(false) {
        return None;
    }
    let mut found = Vec::new();
    adj.candidates_from(root, &mut found);
    found
        .into_iter()
        .map(|c| ((c.nodes.len(), key(&c.nodes)), c.nodes))
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, nodes)| nodes)
}
