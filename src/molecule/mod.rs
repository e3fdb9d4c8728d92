//! The molecule graph: atoms are nodes, bonds are edges.
//!
//! Atoms are identified by their [`AtomIndex`], which stays valid across removals of other atoms.

use crate::atom_info::element_by_number;
use crate::core::*;
use crate::graph::algo::{connectivity_values, ConnectedGraphIter};
use petgraph::prelude::*;
use petgraph::stable_graph::StableUnGraph;
use petgraph::visit::{IntoEdgeReferences, Walker};
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use tracing::{debug, instrument};

mod action;
mod description;
mod hbond;
mod identity;
mod shape;

pub use action::*;
pub use description::*;

pub type AtomIndex = NodeIndex;
pub type BondIndex = EdgeIndex;
pub type MoleculeGraph = StableUnGraph<Atom, Bond>;
/// A cycle of atoms, in traversal order
pub type Ring = Vec<AtomIndex>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoleculeError {
    #[error("atom {} is not in the molecule", .0.index())]
    AtomNotFound(AtomIndex),
    #[error("there's no bond between atoms {} and {}", .0.index(), .1.index())]
    BondNotFound(AtomIndex, AtomIndex),
    #[error("no atom is labeled {0:?}")]
    LabelNotFound(String),
    #[error("label {label:?} is shared by {count} atoms")]
    AmbiguousLabel { label: String, count: usize },
    #[error("atoms {} and {} are already bonded", .0.index(), .1.index())]
    BondExists(AtomIndex, AtomIndex),
    #[error("atom {} can't be bonded to itself", .0.index())]
    SelfBond(AtomIndex),
    #[error("{0:?} is not a recognized element")]
    UnknownElement(String),
    #[error("bond references atom {index}, but there are only {atoms} atoms")]
    DescriptionIndex { index: usize, atoms: usize },
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("connectivity values overflowed in round {0}")]
    Overflow(usize),
    #[error("atom ids are missing or repeated")]
    InvalidAtomIds,
}

impl From<crate::graph::algo::ConnectivityOverflow> for MoleculeError {
    fn from(value: crate::graph::algo::ConnectivityOverflow) -> Self {
        Self::Overflow(value.0)
    }
}

/// A molecule, stored as an undirected graph.
///
/// The ring cache is filled lazily and dropped whenever the structure changes, so a molecule is
/// `Send` but not `Sync`.
#[derive(Debug, Clone)]
pub struct Molecule {
    graph: MoleculeGraph,
    /// Spin multiplicity. Only recomputed by [`Molecule::update_multiplicity`].
    pub multiplicity: u8,
    fingerprint: Option<String>,
    rings: OnceCell<Vec<Ring>>,
}
impl Default for Molecule {
    fn default() -> Self {
        Self::new()
    }
}

impl Molecule {
    pub fn new() -> Self {
        Self::from_graph(MoleculeGraph::default())
    }
    pub fn with_capacity(atoms: usize, bonds: usize) -> Self {
        Self::from_graph(MoleculeGraph::with_capacity(atoms, bonds))
    }
    pub fn from_graph(graph: MoleculeGraph) -> Self {
        Self {
            graph,
            multiplicity: 1,
            fingerprint: None,
            rings: OnceCell::new(),
        }
    }

    pub fn graph(&self) -> &MoleculeGraph {
        &self.graph
    }
    pub fn into_graph(self) -> MoleculeGraph {
        self.graph
    }

    pub(crate) fn ring_cache(&self) -> &OnceCell<Vec<Ring>> {
        &self.rings
    }

    /// Drop everything derived from the structure.
    fn invalidate(&mut self) {
        self.rings.take();
        for atom in self.graph.node_weights_mut() {
            atom.props.clear_structural();
        }
    }

    /// Either a borrow of this molecule or an independent clone of it.
    pub fn copy(&self, deep: bool) -> Cow<'_, Molecule> {
        if deep {
            Cow::Owned(self.clone())
        } else {
            Cow::Borrowed(self)
        }
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
    pub fn contains_atom(&self, idx: AtomIndex) -> bool {
        self.graph.contains_node(idx)
    }

    /// Atom indices in ascending order.
    pub fn atom_indices(&self) -> impl Iterator<Item = AtomIndex> + '_ {
        self.graph.node_indices()
    }
    pub fn atoms(&self) -> impl Iterator<Item = (AtomIndex, &Atom)> + '_ {
        self.graph.node_indices().map(|i| (i, &self.graph[i]))
    }
    /// Every bond once, as its endpoints and data.
    pub fn bonds(&self) -> impl Iterator<Item = (AtomIndex, AtomIndex, &Bond)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    pub fn atom(&self, idx: AtomIndex) -> Result<&Atom, MoleculeError> {
        self.graph
            .node_weight(idx)
            .ok_or(MoleculeError::AtomNotFound(idx))
    }
    /// Mutable access to an atom. This drops the ring cache, but keeps the atom's properties.
    pub fn atom_mut(&mut self, idx: AtomIndex) -> Result<&mut Atom, MoleculeError> {
        self.rings.take();
        self.graph
            .node_weight_mut(idx)
            .ok_or(MoleculeError::AtomNotFound(idx))
    }

    /// Mutable access to an atom's properties, which doesn't touch any cache.
    pub fn props_mut(&mut self, idx: AtomIndex) -> Result<&mut AtomProps, MoleculeError> {
        self.graph
            .node_weight_mut(idx)
            .map(|a| &mut a.props)
            .ok_or(MoleculeError::AtomNotFound(idx))
    }

    pub fn add_atom(&mut self, atom: Atom) -> AtomIndex {
        self.invalidate();
        self.graph.add_node(atom)
    }
    /// Remove an atom along with all of its bonds.
    pub fn remove_atom(&mut self, idx: AtomIndex) -> Result<Atom, MoleculeError> {
        let atom = self
            .graph
            .remove_node(idx)
            .ok_or(MoleculeError::AtomNotFound(idx))?;
        self.invalidate();
        Ok(atom)
    }

    /// Bond two atoms that aren't already bonded.
    pub fn add_bond(
        &mut self,
        a: AtomIndex,
        b: AtomIndex,
        order: BondOrder,
    ) -> Result<BondIndex, MoleculeError> {
        self.check_new_bond(a, b)?;
        self.invalidate();
        Ok(self.graph.add_edge(a, b, Bond::new(order)))
    }
    fn check_new_bond(&self, a: AtomIndex, b: AtomIndex) -> Result<(), MoleculeError> {
        self.atom(a)?;
        self.atom(b)?;
        if a == b {
            return Err(MoleculeError::SelfBond(a));
        }
        if self.has_bond(a, b) {
            return Err(MoleculeError::BondExists(a, b));
        }
        Ok(())
    }
    pub fn remove_bond(&mut self, a: AtomIndex, b: AtomIndex) -> Result<Bond, MoleculeError> {
        let edge = self.find_bond(a, b)?;
        let bond = self
            .graph
            .remove_edge(edge)
            .ok_or(MoleculeError::BondNotFound(a, b))?;
        self.invalidate();
        Ok(bond)
    }
    pub fn has_bond(&self, a: AtomIndex, b: AtomIndex) -> bool {
        self.graph.find_edge(a, b).is_some()
    }
    fn find_bond(&self, a: AtomIndex, b: AtomIndex) -> Result<BondIndex, MoleculeError> {
        self.graph
            .find_edge(a, b)
            .ok_or(MoleculeError::BondNotFound(a, b))
    }
    pub fn get_bond(&self, a: AtomIndex, b: AtomIndex) -> Result<&Bond, MoleculeError> {
        let edge = self.find_bond(a, b)?;
        self.graph
            .edge_weight(edge)
            .ok_or(MoleculeError::BondNotFound(a, b))
    }
    pub fn set_bond_order(
        &mut self,
        a: AtomIndex,
        b: AtomIndex,
        order: BondOrder,
    ) -> Result<(), MoleculeError> {
        let edge = self.find_bond(a, b)?;
        self.invalidate();
        if let Some(bond) = self.graph.edge_weight_mut(edge) {
            bond.order = order;
        }
        Ok(())
    }

    /// Bonds of an atom, keyed by the atom on the other side.
    pub fn bonds_of(&self, idx: AtomIndex) -> Result<BTreeMap<AtomIndex, &Bond>, MoleculeError> {
        self.atom(idx)?;
        Ok(self
            .graph
            .edges(idx)
            .map(|e| (other_end(&e, idx), e.weight()))
            .collect())
    }
    /// Neighbors of an atom, in ascending order. Empty for atoms that aren't present.
    pub fn neighbors(&self, idx: AtomIndex) -> Vec<AtomIndex> {
        let mut out: Vec<_> = self.graph.neighbors(idx).collect();
        out.sort_unstable();
        out
    }
    pub fn degree(&self, idx: AtomIndex) -> usize {
        self.graph.edges(idx).count()
    }
    /// Sum of the orders of an atom's bonds.
    pub fn total_bond_order(&self, idx: AtomIndex) -> f64 {
        self.graph.edges(idx).map(|e| e.weight().order.value()).sum()
    }

    /// Atoms carrying a label, in ascending order.
    pub fn labeled_atoms(&self, label: &str) -> Result<Vec<AtomIndex>, MoleculeError> {
        let out: Vec<_> = self
            .atoms()
            .filter(|(_, a)| a.label.as_deref() == Some(label))
            .map(|(i, _)| i)
            .collect();
        if out.is_empty() {
            Err(MoleculeError::LabelNotFound(label.to_string()))
        } else {
            Ok(out)
        }
    }
    /// The single atom carrying a label.
    pub fn labeled_atom(&self, label: &str) -> Result<AtomIndex, MoleculeError> {
        match self.labeled_atoms(label)?.as_slice() {
            &[idx] => Ok(idx),
            all => Err(MoleculeError::AmbiguousLabel {
                label: label.to_string(),
                count: all.len(),
            }),
        }
    }
    pub fn all_labeled_atoms(&self) -> BTreeMap<String, Vec<AtomIndex>> {
        let mut out = BTreeMap::<String, Vec<AtomIndex>>::new();
        for (i, atom) in self.atoms() {
            if let Some(label) = &atom.label {
                out.entry(label.clone()).or_default().push(i);
            }
        }
        out
    }
    pub fn contains_labeled_atom(&self, label: &str) -> bool {
        self.atoms().any(|(_, a)| a.label.as_deref() == Some(label))
    }
    pub fn clear_labeled_atoms(&mut self) {
        for atom in self.graph.node_weights_mut() {
            atom.label = None;
        }
    }

    pub fn radical_count(&self) -> u32 {
        self.graph.node_weights().map(|a| a.radicals as u32).sum()
    }
    pub fn is_radical(&self) -> bool {
        self.graph.node_weights().any(|a| a.radicals > 0)
    }
    /// Set the multiplicity to the number of radical electrons plus one.
    pub fn update_multiplicity(&mut self) {
        self.multiplicity = u8::try_from(self.radical_count() + 1).unwrap_or(u8::MAX);
    }
    /// Whether the multiplicity is reachable with this many radical electrons.
    pub fn is_multiplicity_consistent(&self) -> bool {
        let max = self.radical_count() + 1;
        let mult = self.multiplicity as u32;
        mult >= 1 && mult <= max && mult % 2 == max % 2
    }
    pub fn update_lone_pairs(&mut self) {
        let orders: Vec<_> = self
            .graph
            .node_indices()
            .map(|i| (i, self.total_bond_order(i)))
            .collect();
        for (i, order) in orders {
            self.graph[i].update_lone_pairs(order);
        }
    }
    /// Recompute lone pairs, multiplicity and connectivity values.
    pub fn update(&mut self) -> Result<(), MoleculeError> {
        self.update_lone_pairs();
        self.update_multiplicity();
        self.update_connectivity_values()
    }

    /// Extended connectivity values, indexed by atom index. Missing atoms get 0.
    pub fn connectivity_values(&self) -> Result<Vec<u64>, MoleculeError> {
        Ok(connectivity_values(&self.graph, |e| bond_weight(e.weight()))?)
    }
    pub fn update_connectivity_values(&mut self) -> Result<(), MoleculeError> {
        let values = self.connectivity_values()?;
        for idx in self.graph.node_indices().collect::<Vec<_>>() {
            self.graph[idx].props.connectivity = Some(values[idx.index()]);
        }
        Ok(())
    }

    /// Number of atoms of each element, by symbol.
    pub fn element_count(&self) -> BTreeMap<&'static str, usize> {
        let mut out = BTreeMap::new();
        for atom in self.graph.node_weights() {
            *out.entry(atom.symbol()).or_insert(0) += 1;
        }
        out
    }
    /// Molecular formula in Hill order: carbon, then hydrogen, then everything alphabetically.
    /// Without carbon, everything is alphabetical.
    pub fn formula(&self) -> String {
        let mut counts = self.element_count();
        let mut out = String::new();
        let mut push = |sym: &str, n: usize| {
            out.push_str(sym);
            if n > 1 {
                out.push_str(&n.to_string());
            }
        };
        if let Some(c) = counts.remove("C") {
            push("C", c);
            if let Some(h) = counts.remove("H") {
                push("H", h);
            }
        }
        for (sym, n) in counts {
            push(sym, n);
        }
        out
    }
    /// Molecular weight in g/mol.
    pub fn molecular_weight(&self) -> f64 {
        self.graph.node_weights().map(Atom::mass).sum()
    }

    /// The fingerprint, which defaults to a fixed-width count of C, H, N, O and S.
    pub fn fingerprint(&self) -> Cow<'_, str> {
        if let Some(fp) = &self.fingerprint {
            return Cow::Borrowed(fp.as_str());
        }
        let counts = self.element_count();
        let mut out = String::with_capacity(15);
        for sym in ["C", "H", "N", "O", "S"] {
            out.push_str(&format!("{sym}{:02}", counts.get(sym).copied().unwrap_or(0)));
        }
        Cow::Owned(out)
    }
    pub fn set_fingerprint(&mut self, fingerprint: Option<String>) {
        self.fingerprint = fingerprint;
    }

    /// Disjoint union of two molecules. Atoms from `other` get new indices.
    pub fn merge(&self, other: &Molecule) -> Molecule {
        let mut out = self.clone();
        out.invalidate();
        let mut map = BTreeMap::new();
        for (i, atom) in other.atoms() {
            map.insert(i, out.graph.add_node(atom.clone()));
        }
        for (a, b, bond) in other.bonds() {
            out.graph.add_edge(map[&a], map[&b], *bond);
        }
        out.fingerprint = None;
        out.update_multiplicity();
        out
    }

    /// Split into connected fragments. Atom indices aren't preserved.
    pub fn split(&self) -> Vec<Molecule> {
        ConnectedGraphIter::<usize, 4>::new(&self.graph)
            .iter(&self.graph)
            .map(|bits| {
                let keep: Vec<AtomIndex> = bits.iter_ones().map(NodeIndex::new).collect();
                let mut frag = Molecule::new();
                let mut map = BTreeMap::new();
                for &i in &keep {
                    map.insert(i, frag.graph.add_node(self.graph[i].clone()));
                }
                for (a, b, bond) in self.bonds() {
                    if let (Some(&na), Some(&nb)) = (map.get(&a), map.get(&b)) {
                        frag.graph.add_edge(na, nb, *bond);
                    }
                }
                frag.update_multiplicity();
                frag
            })
            .collect()
    }

    /// Add hydrogens until every heavy atom reaches its standard valence. Returns the new atoms.
    #[instrument(level = "debug", skip_all)]
    pub fn saturate_unfilled_valence(&mut self) -> Vec<AtomIndex> {
        let missing: Vec<(AtomIndex, u32)> = self
            .atoms()
            .filter(|(_, a)| a.is_non_hydrogen())
            .filter_map(|(i, a)| {
                let valence = element_by_number(a.protons)?.valence as i64;
                let used = a.radicals as i64 + self.total_bond_order(i).floor() as i64;
                let n = valence - used;
                (n > 0).then_some((i, n as u32))
            })
            .collect();
        let mut added = Vec::new();
        for (idx, n) in missing {
            for _ in 0..n {
                let h = self.graph.add_node(Atom::new(1));
                self.graph.add_edge(idx, h, Bond::new(BondOrder::SINGLE));
                added.push(h);
            }
        }
        if !added.is_empty() {
            self.invalidate();
        }
        debug!(added = added.len(), "saturated valence");
        added
    }

    /// Count bonds by element pair and order, e.g. `C-H`, `C=C`, `C:C`, `H~O`.
    pub fn enumerate_bonds(&self) -> BTreeMap<String, usize> {
        let mut out = BTreeMap::new();
        for (a, b, bond) in self.bonds() {
            let mut syms = [self.graph[a].symbol(), self.graph[b].symbol()];
            syms.sort_unstable();
            let key = format!("{}{}{}", syms[0], bond_char(bond.order), syms[1]);
            *out.entry(key).or_insert(0) += 1;
        }
        out
    }
}

impl Display for Molecule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula())
    }
}

fn other_end(edge: &petgraph::stable_graph::EdgeReference<'_, Bond>, idx: AtomIndex) -> AtomIndex {
    if edge.source() == idx {
        edge.target()
    } else {
        edge.source()
    }
}

/// Weight of a bond in connectivity sums: twice the order, and never less than one.
pub(crate) fn bond_weight(bond: &Bond) -> u64 {
    ((bond.order.value() * 2.0).round() as u64).max(1)
}

fn bond_char(order: BondOrder) -> char {
    match order.symbol() {
        Some('H') => '~',
        Some('S') => '-',
        Some('B') => ':',
        Some('D') => '=',
        Some('T') => '#',
        Some('Q') => '$',
        _ => '?',
    }
}
