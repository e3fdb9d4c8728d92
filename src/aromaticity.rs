//! Aromatic ring detection and Kekulé-to-benzene resonance.

use crate::core::BondOrder;
use crate::molecule::{AtomIndex, Molecule, MoleculeError, Ring};
use std::collections::BTreeSet;
use tracing::trace;

/// Bond orders around a ring, in traversal order. `None` if a step isn't bonded.
fn ring_orders(molecule: &Molecule, ring: &[AtomIndex]) -> Option<Vec<BondOrder>> {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(&a, &b)| molecule.get_bond(a, b).ok().map(|bond| bond.order))
        .collect()
}

/// Whether the orders alternate single/double, with benzene bonds matching either.
fn alternates(orders: &[BondOrder]) -> bool {
    if orders.len() % 2 != 0 || orders.iter().all(|o| o.is_benzene()) {
        return false;
    }
    (0..2).any(|phase| {
        orders.iter().enumerate().all(|(i, o)| {
            o.is_benzene()
                || if i % 2 == phase {
                    o.is_double()
                } else {
                    o.is_single()
                }
        })
    })
}

impl Molecule {
    /// Six-membered SSSR rings made entirely of benzene bonds.
    pub fn aromatic_rings(&self) -> Result<Vec<Ring>, MoleculeError> {
        Ok(self
            .smallest_set_of_smallest_rings()?
            .iter()
            .filter(|r| r.len() == 6)
            .filter(|r| {
                ring_orders(self, r)
                    .is_some_and(|orders| orders.iter().all(|o| o.is_benzene()))
            })
            .cloned()
            .collect())
    }
    pub fn is_aromatic(&self) -> Result<bool, MoleculeError> {
        Ok(!self.aromatic_rings()?.is_empty())
    }
    /// Whether every radical electron sits on an aromatic ring atom. True with no radicals.
    pub fn is_aryl_radical(&self) -> Result<bool, MoleculeError> {
        let ring_atoms: BTreeSet<AtomIndex> =
            self.aromatic_rings()?.into_iter().flatten().collect();
        let on_rings: u32 = ring_atoms
            .iter()
            .map(|&i| self.graph()[i].radicals as u32)
            .sum();
        Ok(on_rings == self.radical_count())
    }

    /// A copy with every Kekulé six-membered ring turned into benzene bonds.
    ///
    /// Rings already partly aromatic count as long as their remaining bonds still alternate, so
    /// fused systems convert ring by ring until nothing changes.
    pub fn aromatic_resonance(&self) -> Result<Molecule, MoleculeError> {
        let mut out = self.clone();
        let rings: Vec<Ring> = self
            .smallest_set_of_smallest_rings()?
            .iter()
            .filter(|r| r.len() == 6)
            .cloned()
            .collect();
        let mut changed = true;
        while changed {
            changed = false;
            for ring in &rings {
                let Some(orders) = ring_orders(&out, ring) else {
                    continue;
                };
                if !alternates(&orders) {
                    continue;
                }
                trace!(?ring, "converting to benzene bonds");
                for (&a, &b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
                    out.set_bond_order(a, b, BondOrder::BENZENE)?;
                }
                changed = true;
            }
        }
        Ok(out)
    }
}

