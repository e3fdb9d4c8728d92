//! Functional group patterns, for subgraph queries.
//!
//! A pattern atom lists what it accepts instead of holding a single value. Every list that's left
//! empty accepts anything.

use crate::atom_info::element_by_symbol;
use crate::core::*;
use crate::molecule::{AtomIndex, Molecule, MoleculeError};
use petgraph::prelude::*;
use petgraph::stable_graph::StableUnGraph;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Which atoms a pattern atom accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomClass {
    /// `R`, any atom
    Any,
    /// `R!H`, any atom except hydrogen
    Heavy,
    /// A specific element, by atomic number
    Element(u8),
}
impl AtomClass {
    /// Parse `R`, `R!H` or an element symbol.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "R" => Some(Self::Any),
            "R!H" => Some(Self::Heavy),
            _ => element_by_symbol(s).map(|e| Self::Element(e.number)),
        }
    }
    pub fn matches(self, atom: &Atom) -> bool {
        match self {
            Self::Any => true,
            Self::Heavy => atom.is_non_hydrogen(),
            Self::Element(n) => atom.protons == n,
        }
    }
}
impl Display for AtomClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("R"),
            Self::Heavy => f.write_str("R!H"),
            Self::Element(n) => f.write_str(Atom::new(*n).symbol()),
        }
    }
}

/// An atom in a pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupAtom {
    pub classes: Vec<AtomClass>,
    pub radicals: Vec<u8>,
    pub charges: Vec<i8>,
    pub lone_pairs: Vec<u8>,
    /// `Some(true)` to require ring membership, `Some(false)` to forbid it
    pub in_ring: Option<bool>,
    pub label: Option<String>,
}
impl GroupAtom {
    pub fn new(classes: impl IntoIterator<Item = AtomClass>) -> Self {
        Self {
            classes: classes.into_iter().collect(),
            ..Self::default()
        }
    }
    pub fn with_radicals(mut self, radicals: impl IntoIterator<Item = u8>) -> Self {
        self.radicals = radicals.into_iter().collect();
        self
    }
    pub fn with_charges(mut self, charges: impl IntoIterator<Item = i8>) -> Self {
        self.charges = charges.into_iter().collect();
        self
    }
    pub fn with_lone_pairs(mut self, lone_pairs: impl IntoIterator<Item = u8>) -> Self {
        self.lone_pairs = lone_pairs.into_iter().collect();
        self
    }
    pub fn with_ring(mut self, in_ring: bool) -> Self {
        self.in_ring = Some(in_ring);
        self
    }
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The pattern that only accepts atoms equivalent to `atom`.
    pub fn from_atom(atom: &Atom) -> Self {
        Self {
            classes: vec![AtomClass::Element(atom.protons)],
            radicals: vec![atom.radicals],
            charges: vec![atom.charge],
            lone_pairs: atom.lone_pairs.into_iter().collect(),
            in_ring: None,
            label: atom.label.clone(),
        }
    }

    /// Whether an atom fits this pattern. `in_ring` is only consulted if the pattern has a ring
    /// constraint.
    pub fn accepts(&self, atom: &Atom, in_ring: impl FnOnce() -> bool) -> bool {
        fn allowed<T: PartialEq>(list: &[T], value: &T) -> bool {
            list.is_empty() || list.contains(value)
        }
        if !(self.classes.is_empty() || self.classes.iter().any(|c| c.matches(atom))) {
            return false;
        }
        if !allowed(&self.radicals, &atom.radicals) || !allowed(&self.charges, &atom.charge) {
            return false;
        }
        if let Some(lp) = atom.lone_pairs {
            if !allowed(&self.lone_pairs, &lp) {
                return false;
            }
        }
        self.in_ring.map_or(true, |want| in_ring() == want)
    }
    pub fn requires_ring_info(&self) -> bool {
        self.in_ring.is_some()
    }
}

/// A bond in a pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBond {
    pub orders: Vec<BondOrder>,
}
impl GroupBond {
    pub fn new(orders: impl IntoIterator<Item = BondOrder>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
        }
    }
    pub fn accepts(&self, bond: &Bond) -> bool {
        self.orders.is_empty() || self.orders.contains(&bond.order)
    }
}
impl From<BondOrder> for GroupBond {
    fn from(order: BondOrder) -> Self {
        Self::new([order])
    }
}

pub type GroupGraph = StableUnGraph<GroupAtom, GroupBond>;

/// A functional group: a pattern graph to search molecules for.
#[derive(Debug, Clone, Default)]
pub struct Group {
    graph: GroupGraph,
}
impl Group {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn graph(&self) -> &GroupGraph {
        &self.graph
    }
    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn atom(&self, idx: AtomIndex) -> Result<&GroupAtom, MoleculeError> {
        self.graph
            .node_weight(idx)
            .ok_or(MoleculeError::AtomNotFound(idx))
    }
    pub fn add_atom(&mut self, atom: GroupAtom) -> AtomIndex {
        self.graph.add_node(atom)
    }
    pub fn add_bond(
        &mut self,
        a: AtomIndex,
        b: AtomIndex,
        bond: impl Into<GroupBond>,
    ) -> Result<EdgeIndex, MoleculeError> {
        self.atom(a)?;
        self.atom(b)?;
        if a == b {
            return Err(MoleculeError::SelfBond(a));
        }
        if self.graph.find_edge(a, b).is_some() {
            return Err(MoleculeError::BondExists(a, b));
        }
        Ok(self.graph.add_edge(a, b, bond.into()))
    }
    pub fn get_bond(&self, a: AtomIndex, b: AtomIndex) -> Result<&GroupBond, MoleculeError> {
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .ok_or(MoleculeError::BondNotFound(a, b))
    }
    pub fn all_labeled_atoms(&self) -> BTreeMap<String, Vec<AtomIndex>> {
        let mut out = BTreeMap::<String, Vec<AtomIndex>>::new();
        for i in self.graph.node_indices() {
            if let Some(label) = &self.graph[i].label {
                out.entry(label.clone()).or_default().push(i);
            }
        }
        out
    }
    /// Whether any atom carries a ring constraint.
    pub fn requires_ring_info(&self) -> bool {
        self.graph.node_weights().any(GroupAtom::requires_ring_info)
    }
}

impl Molecule {
    /// The group that only matches molecules containing this one. Atom indices are kept.
    pub fn to_group(&self) -> Group {
        let graph = self
            .graph()
            .map(|_, a| GroupAtom::from_atom(a), |_, b| GroupBond::from(b.order));
        Group { graph }
    }
}
