//! Hydrogen-bonded structures.
//!
//! A hydrogen bond is a bond of order zero from a hydrogen on O or N to another O or N with a
//! lone pair to spare.

use super::*;
use std::collections::VecDeque;

/// Closest a donor hydrogen and its acceptor may be through covalent bonds and still count.
const MIN_HBOND_SEPARATION: usize = 4;

impl Molecule {
    /// Every `(hydrogen, acceptor)` pair that could form a hydrogen bond.
    ///
    /// Hydrogens that already carry a hydrogen bond aren't donors. Acceptors need a lone pair,
    /// no hydrogen bond of their own, and enough bonds between them and the hydrogen that the
    /// new bond doesn't close a small ring.
    pub fn find_h_bonds(&self) -> Vec<(AtomIndex, AtomIndex)> {
        let acceptors: Vec<AtomIndex> = self
            .atoms()
            .filter(|(i, a)| {
                (a.is_oxygen() || a.is_nitrogen())
                    && a.lone_pairs.is_some_and(|lp| lp > 0)
                    && !self.graph.edges(*i).any(|e| e.weight().is_hydrogen_bond())
            })
            .map(|(i, _)| i)
            .collect();
        let mut out = Vec::new();
        for (h, atom) in self.atoms() {
            if !atom.is_hydrogen() {
                continue;
            }
            let mut edges = self.graph.edges(h);
            let (Some(edge), None) = (edges.next(), edges.next()) else {
                continue;
            };
            let donor = other_end(&edge, h);
            if !(self.graph[donor].is_oxygen() || self.graph[donor].is_nitrogen()) {
                continue;
            }
            let distances = self.bond_distances(h);
            for &acc in &acceptors {
                if distances
                    .get(&acc)
                    .map_or(true, |&d| d >= MIN_HBOND_SEPARATION)
                {
                    out.push((h, acc));
                }
            }
        }
        out
    }

    /// Copies with one hydrogen bond added, then copies with two.
    ///
    /// A pair is only used if it has two different hydrogens and two different acceptors.
    #[instrument(level = "debug", skip_all)]
    pub fn generate_h_bonded_structures(&self) -> Result<Vec<Molecule>, MoleculeError> {
        let pairs = self.find_h_bonds();
        let mut out = Vec::new();
        for &(h, acc) in &pairs {
            let mut mol = self.clone();
            mol.add_bond(h, acc, BondOrder::NONE)?;
            out.push(mol);
        }
        for (n, &(h1, acc1)) in pairs.iter().enumerate() {
            for &(h2, acc2) in &pairs[n + 1..] {
                if h1 == h2 || acc1 == acc2 {
                    continue;
                }
                let mut mol = self.clone();
                mol.add_bond(h1, acc1, BondOrder::NONE)?;
                mol.add_bond(h2, acc2, BondOrder::NONE)?;
                out.push(mol);
            }
        }
        debug!(candidates = pairs.len(), structures = out.len(), "generated hydrogen-bonded structures");
        Ok(out)
    }

    /// Remove every hydrogen bond. Returns how many there were.
    pub fn remove_h_bonds(&mut self) -> usize {
        let found: Vec<_> = self
            .bonds()
            .filter(|(_, _, bond)| bond.is_hydrogen_bond())
            .map(|(a, b, _)| (a, b))
            .collect();
        for &(a, b) in &found {
            if let Some(edge) = self.graph.find_edge(a, b) {
                self.graph.remove_edge(edge);
            }
        }
        if !found.is_empty() {
            self.invalidate();
        }
        found.len()
    }

    /// Number of bonds from `start` to every atom it's connected to.
    fn bond_distances(&self, start: AtomIndex) -> BTreeMap<AtomIndex, usize> {
        let mut out = BTreeMap::from([(start, 0)]);
        let mut queue = VecDeque::from([(start, 0)]);
        while let Some((n, d)) = queue.pop_front() {
            for m in self.graph.neighbors(n) {
                if !out.contains_key(&m) {
                    out.insert(m, d + 1);
                    queue.push_back((m, d + 1));
                }
            }
        }
        out
    }
}
