//! Shape descriptors: rotatable bonds and linearity.

use super::*;

impl Molecule {
    /// Single bonds outside any ring with something besides each other on both ends.
    pub fn count_internal_rotors(&self) -> usize {
        self.bonds()
            .filter(|&(a, b, bond)| {
                bond.is_single()
                    && self.degree(a) > 1
                    && self.degree(b) > 1
                    && !self.bond_in_cycle(a, b)
            })
            .count()
    }

    /// Whether the atoms lie on a line.
    ///
    /// Diatomics are linear. Beyond that, an acyclic molecule is linear if it's all double bonds,
    /// like CO2, or if every inner atom sits between one single and one triple bond.
    pub fn is_linear(&self) -> bool {
        match self.atom_count() {
            0 | 1 => return false,
            2 => return true,
            _ => {}
        }
        if self.cycle_rank() > 0 {
            return false;
        }
        if self.bonds().all(|(_, _, bond)| bond.is_double()) {
            return true;
        }
        self.atom_indices().all(|i| {
            let orders: Vec<_> = self.graph.edges(i).map(|e| e.weight().order).collect();
            match orders.as_slice() {
                [] | [_] => true,
                [x, y] => {
                    (x.is_single() && y.is_triple()) || (x.is_triple() && y.is_single())
                }
                _ => false,
            }
        })
    }
}
