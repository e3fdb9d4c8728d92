//! Plain-data descriptions of molecules, for building them and for handing them to
//! serialization layers.

use super::*;
use crate::atom_info::{element_by_symbol, isotope_by_symbol};

#[derive(Debug, Clone, PartialEq)]
pub struct AtomDescription {
    /// Element symbol. `D` and `T` are accepted for hydrogen isotopes.
    pub element: String,
    /// Mass number, `0` for natural abundance
    pub isotope: u16,
    pub charge: i8,
    pub radicals: u8,
    pub lone_pairs: Option<u8>,
    pub label: Option<String>,
}
impl AtomDescription {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            isotope: 0,
            charge: 0,
            radicals: 0,
            lone_pairs: None,
            label: None,
        }
    }
    pub fn with_isotope(mut self, isotope: u16) -> Self {
        self.isotope = isotope;
        self
    }
    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }
    pub fn with_radicals(mut self, radicals: u8) -> Self {
        self.radicals = radicals;
        self
    }
    pub fn with_lone_pairs(mut self, lone_pairs: u8) -> Self {
        self.lone_pairs = Some(lone_pairs);
        self
    }
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondDescription {
    /// Positions in the atom list
    pub atoms: (usize, usize),
    pub order: BondOrder,
}

/// Atoms, bonds between them by position, and an optional multiplicity.
///
/// Without a multiplicity, the molecule gets the number of radical electrons plus one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoleculeDescription {
    pub atoms: Vec<AtomDescription>,
    pub bonds: Vec<BondDescription>,
    pub multiplicity: Option<u8>,
}
impl MoleculeDescription {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_atom(mut self, atom: AtomDescription) -> Self {
        self.atoms.push(atom);
        self
    }
    pub fn with_bond(mut self, a: usize, b: usize, order: BondOrder) -> Self {
        self.bonds.push(BondDescription {
            atoms: (a, b),
            order,
        });
        self
    }
    pub fn with_multiplicity(mut self, multiplicity: u8) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }
}

impl AtomDescription {
    fn to_atom(&self) -> Result<Atom, MoleculeError> {
        let elem = element_by_symbol(&self.element)
            .ok_or_else(|| MoleculeError::UnknownElement(self.element.clone()))?;
        let isotope = match self.isotope {
            0 => isotope_by_symbol(&self.element).map_or(0, |i| i.mass_number),
            n => n,
        };
        Ok(Atom {
            protons: elem.number,
            isotope,
            charge: self.charge,
            radicals: self.radicals,
            lone_pairs: self.lone_pairs,
            label: self.label.clone(),
            props: AtomProps::default(),
        })
    }
    fn from_atom(atom: &Atom) -> Self {
        let symbol = match (atom.protons, atom.isotope) {
            (1, 2) => "D",
            (1, 3) => "T",
            _ => atom.symbol(),
        };
        let isotope = if symbol != atom.symbol() { 0 } else { atom.isotope };
        Self {
            element: symbol.to_string(),
            isotope,
            charge: atom.charge,
            radicals: atom.radicals,
            lone_pairs: atom.lone_pairs,
            label: atom.label.clone(),
        }
    }
}

impl Molecule {
    /// Build a molecule, checking elements, bond indices, self bonds and duplicate bonds.
    #[instrument(level = "trace", skip_all)]
    pub fn from_description(desc: &MoleculeDescription) -> Result<Self, MoleculeError> {
        let mut graph = MoleculeGraph::with_capacity(desc.atoms.len(), desc.bonds.len());
        let mut indices = Vec::with_capacity(desc.atoms.len());
        for atom in &desc.atoms {
            indices.push(graph.add_node(atom.to_atom()?));
        }
        for bond in &desc.bonds {
            let lookup = |index: usize| {
                indices
                    .get(index)
                    .copied()
                    .ok_or(MoleculeError::DescriptionIndex {
                        index,
                        atoms: indices.len(),
                    })
            };
            let a = lookup(bond.atoms.0)?;
            let b = lookup(bond.atoms.1)?;
            if a == b {
                return Err(MoleculeError::SelfBond(a));
            }
            if graph.find_edge(a, b).is_some() {
                return Err(MoleculeError::BondExists(a, b));
            }
            graph.add_edge(a, b, Bond::new(bond.order));
        }
        let mut out = Molecule::from_graph(graph);
        match desc.multiplicity {
            Some(m) => out.multiplicity = m,
            None => out.update_multiplicity(),
        }
        Ok(out)
    }

    /// Describe this molecule. Atoms are listed in index order, so positions won't match the
    /// indices if atoms have been removed.
    pub fn to_description(&self) -> MoleculeDescription {
        let positions: BTreeMap<AtomIndex, usize> = self
            .atom_indices()
            .enumerate()
            .map(|(n, i)| (i, n))
            .collect();
        MoleculeDescription {
            atoms: self
                .atoms()
                .map(|(_, a)| AtomDescription::from_atom(a))
                .collect(),
            bonds: self
                .bonds()
                .map(|(a, b, bond)| BondDescription {
                    atoms: (positions[&a], positions[&b]),
                    order: bond.order,
                })
                .collect(),
            multiplicity: Some(self.multiplicity),
        }
    }
}
