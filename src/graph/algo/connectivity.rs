//! Extended connectivity values, as in Morgan's canonical numbering.
//!
//! Every round sums the neighbors' values, scaled by an edge weight. The sums are computed with
//! checked arithmetic and then replaced with their ranks, so long chains never grow the values
//! past the node count.

use petgraph::visit::*;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("connectivity values overflowed in round {0}")]
pub struct ConnectivityOverflow(pub usize);

/// Replace every value with its rank among the distinct values, starting at 1.
fn compress<K: Ord + Copy>(keys: &[Option<K>]) -> (Vec<u64>, usize) {
    let mut sorted: Vec<K> = keys.iter().flatten().copied().collect();
    sorted.sort_unstable();
    sorted.dedup();
    let ranks = keys
        .iter()
        .map(|k| k.map_or(0, |k| sorted.partition_point(|&s| s < k) as u64 + 1))
        .collect();
    (ranks, sorted.len())
}

/// Compute a connectivity value for each node, indexed by `to_index`. Unused indices get 0.
///
/// Values start at the node degree and are refined until the number of distinct values stops
/// growing. Two nodes with different values are never merged by a later round.
pub fn connectivity_values<G, F>(graph: G, mut weight: F) -> Result<Vec<u64>, ConnectivityOverflow>
where
    G: IntoNodeIdentifiers + IntoEdges + NodeIndexable,
    F: FnMut(G::EdgeRef) -> u64,
{
    let bound = graph.node_bound();
    let nodes: Vec<G::NodeId> = graph.node_identifiers().collect();
    let mut keys = vec![None; bound];
    for &n in &nodes {
        keys[graph.to_index(n)] = Some(graph.edges(n).count() as u64);
    }
    let (mut values, mut classes) = compress(&keys);
    for round in 1..=nodes.len() {
        let mut next = vec![None; bound];
        for &n in &nodes {
            let mut sum = 0u64;
            for edge in graph.edges(n) {
                let other = if edge.source() == n {
                    edge.target()
                } else {
                    edge.source()
                };
                let term = values[graph.to_index(other)]
                    .checked_mul(weight(edge))
                    .ok_or(ConnectivityOverflow(round))?;
                sum = sum.checked_add(term).ok_or(ConnectivityOverflow(round))?;
            }
            let ix = graph.to_index(n);
            next[ix] = Some((values[ix], sum));
        }
        let (refined, count) = compress(&next);
        trace!(round, classes = count, "refined connectivity");
        if count <= classes {
            break;
        }
        values = refined;
        classes = count;
    }
    Ok(values)
}
