//! Ring perception: the smallest set of smallest rings, ring membership, and grouping rings into
//! isolated and fused systems.

use crate::graph::algo::{minimum_cycle_basis, num_cycles, shortest_cycle_through};
use crate::molecule::*;
use petgraph::prelude::*;
use petgraph::unionfind::UnionFind;
use std::cmp::Reverse;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, instrument};

/// Sort key for candidate rings of equal size: heavier rings first, then rings with the higher
/// connectivity score, then by atom indices.
type RingKey = (Reverse<u32>, Reverse<u64>, Vec<usize>);

impl Molecule {
    /// Number of independent cycles: bonds - atoms + components.
    pub fn cycle_rank(&self) -> usize {
        num_cycles(self.graph())
    }

    /// Build the tie-breaking key function, reporting overflow through `overflow`.
    fn ring_key<'a>(
        &'a self,
        conn: &'a [u64],
        overflow: &'a mut Option<MoleculeError>,
    ) -> impl FnMut(&[usize]) -> RingKey + 'a {
        move |ring| {
            let graph = self.graph();
            let protons = ring
                .iter()
                .map(|&i| graph[NodeIndex::new(i)].protons as u32)
                .sum();
            let mut score = Some(0u64);
            for (n, &a) in ring.iter().enumerate() {
                let b = ring[(n + 1) % ring.len()];
                let weight = graph
                    .find_edge(NodeIndex::new(a), NodeIndex::new(b))
                    .and_then(|e| graph.edge_weight(e))
                    .map_or(1, bond_weight);
                score = score.and_then(|s| {
                    conn[a]
                        .checked_add(conn[b])?
                        .checked_mul(weight)?
                        .checked_add(s)
                });
            }
            let score = score.unwrap_or_else(|| {
                overflow.get_or_insert(MoleculeError::Overflow(0));
                u64::MAX
            });
            let mut sorted = ring.to_vec();
            sorted.sort_unstable();
            (Reverse(protons), Reverse(score), sorted)
        }
    }

    /// The smallest set of smallest rings, as a minimum cycle basis.
    ///
    /// The result is cached until the next structural edit, and is the same on every call for
    /// the same molecule.
    #[instrument(level = "debug", skip_all)]
    pub fn smallest_set_of_smallest_rings(&self) -> Result<&[Ring], MoleculeError> {
        if let Some(rings) = self.ring_cache().get() {
            return Ok(rings);
        }
        let conn = self.connectivity_values()?;
        let mut overflow = None;
        let found = minimum_cycle_basis(self.graph(), self.ring_key(&conn, &mut overflow));
        if let Some(err) = overflow {
            return Err(err);
        }
        let rings: Vec<Ring> = found
            .into_iter()
            .map(|r| r.into_iter().map(NodeIndex::new).collect())
            .collect();
        debug!(count = rings.len(), "perceived rings");
        Ok(self.ring_cache().get_or_init(|| rings))
    }

    /// The shortest ring through an atom, or `None` if it isn't in one.
    pub fn smallest_ring_containing(&self, atom: AtomIndex) -> Result<Option<Ring>, MoleculeError> {
        self.atom(atom)?;
        let conn = self.connectivity_values()?;
        let mut overflow = None;
        let found = shortest_cycle_through(
            self.graph(),
            atom.index(),
            self.ring_key(&conn, &mut overflow),
        );
        if let Some(err) = overflow {
            return Err(err);
        }
        Ok(found.map(|r| r.into_iter().map(NodeIndex::new).collect()))
    }

    /// Whether a bond is part of any cycle, i.e. its ends stay connected without it.
    pub fn is_bond_in_cycle(&self, a: AtomIndex, b: AtomIndex) -> Result<bool, MoleculeError> {
        self.get_bond(a, b)?;
        Ok(self.bond_in_cycle(a, b))
    }
    pub fn is_atom_in_cycle(&self, atom: AtomIndex) -> Result<bool, MoleculeError> {
        self.atom(atom)?;
        Ok(self.atom_in_cycle(atom))
    }

    /// Whether `b` is still reachable from `a` without the direct bond. Both atoms must exist.
    pub(crate) fn bond_in_cycle(&self, a: AtomIndex, b: AtomIndex) -> bool {
        let graph = self.graph();
        let mut seen = BTreeSet::from([a]);
        let mut queue = VecDeque::from([a]);
        while let Some(n) = queue.pop_front() {
            for m in graph.neighbors(n) {
                if n == a && m == b {
                    continue;
                }
                if m == b {
                    return true;
                }
                if seen.insert(m) {
                    queue.push_back(m);
                }
            }
        }
        false
    }
    pub(crate) fn atom_in_cycle(&self, atom: AtomIndex) -> bool {
        self.graph()
            .neighbors(atom)
            .any(|n| self.bond_in_cycle(atom, n))
    }
    /// Set every atom's `in_ring` property.
    pub fn identify_ring_membership(&mut self) -> Result<(), MoleculeError> {
        let flags = self
            .atom_indices()
            .map(|i| (i, self.atom_in_cycle(i)))
            .collect::<Vec<_>>();
        for (i, in_ring) in flags {
            self.props_mut(i)?.in_ring = Some(in_ring);
        }
        Ok(())
    }

    /// Split the SSSR into rings that share no atom with any other ring, and fused systems.
    ///
    /// Rings that share at least one atom, spiro junctions included, are merged transitively.
    /// Each system is returned as its sorted set of atoms.
    pub fn disparate_rings(&self) -> Result<(Vec<Ring>, Vec<Vec<AtomIndex>>), MoleculeError> {
        let sssr = self.smallest_set_of_smallest_rings()?;
        let mut union = UnionFind::new(sssr.len());
        for (i, ri) in sssr.iter().enumerate() {
            for (j, rj) in sssr.iter().enumerate().skip(i + 1) {
                if ri.iter().any(|a| rj.contains(a)) {
                    union.union(i, j);
                }
            }
        }
        let mut systems: Vec<(usize, Vec<usize>)> = Vec::new();
        for i in 0..sssr.len() {
            let root = union.find(i);
            match systems.iter_mut().find(|(r, _)| *r == root) {
                Some((_, members)) => members.push(i),
                None => systems.push((root, vec![i])),
            }
        }
        let mut mono = Vec::new();
        let mut poly = Vec::new();
        for (_, members) in systems {
            if let [only] = members[..] {
                mono.push(sssr[only].clone());
            } else {
                let atoms: BTreeSet<AtomIndex> = members
                    .iter()
                    .flat_map(|&m| sssr[m].iter().copied())
                    .collect();
                poly.push(atoms.into_iter().collect());
            }
        }
        Ok((mono, poly))
    }
    pub fn monocyclic_rings(&self) -> Result<Vec<Ring>, MoleculeError> {
        Ok(self.disparate_rings()?.0)
    }
    pub fn polycyclic_rings(&self) -> Result<Vec<Vec<AtomIndex>>, MoleculeError> {
        Ok(self.disparate_rings()?.1)
    }
}
