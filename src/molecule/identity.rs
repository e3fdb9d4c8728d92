//! Atom ids, and comparisons that respect them.
//!
//! Isomorphism asks whether two molecules have the same shape. Identity asks whether they're the
//! same atoms bonded the same way, which is what tracking a molecule through edits needs.

use super::*;
use std::collections::BTreeSet;

impl Molecule {
    /// Give every atom its position as an id, replacing any ids already there.
    pub fn assign_atom_ids(&mut self) {
        let indices: Vec<_> = self.graph.node_indices().collect();
        for (n, idx) in indices.into_iter().enumerate() {
            self.graph[idx].props.id = Some(n);
        }
    }
    /// Whether every atom has an id and no two share one.
    pub fn atom_ids_valid(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.graph
            .node_weights()
            .all(|a| a.props.id.is_some_and(|id| seen.insert(id)))
    }

    /// Whether both molecules hold the same atoms, by id, bonded the same way.
    ///
    /// Atoms are paired up by id, and then compared like an isomorphism would compare them. Lax
    /// comparison ignores electrons and bond orders.
    pub fn is_identical(&self, other: &Molecule, strict: bool) -> Result<bool, MoleculeError> {
        if !self.atom_ids_valid() || !other.atom_ids_valid() {
            return Err(MoleculeError::InvalidAtomIds);
        }
        let by_id = |mol: &Molecule| -> BTreeMap<usize, AtomIndex> {
            mol.atoms()
                .filter_map(|(i, a)| Some((a.props.id?, i)))
                .collect()
        };
        let ours = by_id(self);
        let theirs = by_id(other);
        if !ours.keys().eq(theirs.keys()) {
            return Ok(false);
        }
        let pairs: Vec<(AtomIndex, AtomIndex)> = ours.into_values().zip(theirs.into_values()).collect();
        for &(a, b) in &pairs {
            if !self.graph[a].equivalent(&other.graph[b], strict) {
                return Ok(false);
            }
        }
        for (n, &(a1, b1)) in pairs.iter().enumerate() {
            for &(a2, b2) in &pairs[n + 1..] {
                match (self.get_bond(a1, a2), other.get_bond(b1, b2)) {
                    (Ok(x), Ok(y)) if x.equivalent(y, strict) => {}
                    (Err(_), Err(_)) => {}
                    _ => return Ok(false),
                }
            }
        }
        Ok(true)
    }
}
