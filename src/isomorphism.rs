//! Isomorphism and substructure queries.
//!
//! Mappings go from host atoms to pattern atoms. For `a.is_isomorphic(b)`, `a` is the host.

use crate::core::{Atom, Bond};
use crate::graph::algo::{matches_iter, MatchMode};
use crate::graph::CompactGraph;
use crate::group::Group;
use crate::molecule::{AtomIndex, Molecule};
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

pub type Mapping = BTreeMap<AtomIndex, AtomIndex>;

/// Options for isomorphism queries.
#[derive(Debug, Clone)]
pub struct IsomorphismOptions {
    /// Compare electrons and bond orders, not just elements
    pub strict: bool,
    /// Pairs the search has to start from
    pub initial_map: Option<Mapping>,
    /// Pair up atoms carrying the same label
    pub generate_initial_map: bool,
    /// Stop after finding this many mappings
    pub max_mappings: Option<usize>,
}
impl Default for IsomorphismOptions {
    fn default() -> Self {
        Self {
            strict: true,
            initial_map: None,
            generate_initial_map: false,
            max_mappings: None,
        }
    }
}
impl IsomorphismOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
    pub fn with_initial_map(mut self, initial_map: Mapping) -> Self {
        self.initial_map = Some(initial_map);
        self
    }
    pub fn with_generated_initial_map(mut self, generate: bool) -> Self {
        self.generate_initial_map = generate;
        self
    }
    pub fn with_max_mappings(mut self, max: usize) -> Self {
        self.max_mappings = Some(max);
        self
    }
}

/// Something that can be looked for in a molecule.
pub trait Pattern {
    fn compact(&self) -> CompactGraph<AtomIndex>;
    fn atom_accepts(&self, pattern: AtomIndex, atom: &Atom, strict: bool, in_ring: bool) -> bool;
    fn bond_accepts(&self, pattern: (AtomIndex, AtomIndex), bond: &Bond, strict: bool) -> bool;
    fn labels(&self) -> BTreeMap<String, Vec<AtomIndex>>;
    /// Whether `atom_accepts` looks at ring membership.
    fn requires_ring_info(&self) -> bool {
        false
    }
}

impl Pattern for Molecule {
    fn compact(&self) -> CompactGraph<AtomIndex> {
        CompactGraph::new(self.graph())
    }
    fn atom_accepts(&self, pattern: AtomIndex, atom: &Atom, strict: bool, _in_ring: bool) -> bool {
        self.graph()
            .node_weight(pattern)
            .map_or(false, |p| {
                if strict {
                    atom.is_specific_case_of(p)
                } else {
                    atom.equivalent(p, false)
                }
            })
    }
    fn bond_accepts(&self, pattern: (AtomIndex, AtomIndex), bond: &Bond, strict: bool) -> bool {
        self.get_bond(pattern.0, pattern.1)
            .map_or(false, |p| !strict || bond.is_specific_case_of(p))
    }
    fn labels(&self) -> BTreeMap<String, Vec<AtomIndex>> {
        self.all_labeled_atoms()
    }
}

impl Pattern for Group {
    fn compact(&self) -> CompactGraph<AtomIndex> {
        CompactGraph::new(self.graph())
    }
    fn atom_accepts(&self, pattern: AtomIndex, atom: &Atom, strict: bool, in_ring: bool) -> bool {
        let Ok(p) = self.atom(pattern) else {
            return false;
        };
        if strict {
            p.accepts(atom, || in_ring)
        } else {
            (p.classes.is_empty() || p.classes.iter().any(|c| c.matches(atom)))
                && p.in_ring.map_or(true, |want| want == in_ring)
        }
    }
    fn bond_accepts(&self, pattern: (AtomIndex, AtomIndex), bond: &Bond, strict: bool) -> bool {
        self.get_bond(pattern.0, pattern.1)
            .map_or(false, |p| !strict || p.accepts(bond))
    }
    fn labels(&self) -> BTreeMap<String, Vec<AtomIndex>> {
        self.all_labeled_atoms()
    }
    fn requires_ring_info(&self) -> bool {
        Group::requires_ring_info(self)
    }
}

/// Combine the explicit initial map with label pairs, or `None` if they can't be satisfied.
fn initial_pairs<P: Pattern + ?Sized>(
    host: &Molecule,
    pattern: &P,
    options: &IsomorphismOptions,
    mode: MatchMode,
) -> Option<Mapping> {
    let mut out = options.initial_map.clone().unwrap_or_default();
    if !options.generate_initial_map {
        return Some(out);
    }
    let host_labels = host.all_labeled_atoms();
    let pattern_labels = pattern.labels();
    if mode == MatchMode::Isomorphism && !host_labels.keys().eq(pattern_labels.keys()) {
        return None;
    }
    for (label, pattern_atoms) in &pattern_labels {
        let host_atoms = host_labels.get(label)?;
        if let ([h], [p]) = (host_atoms.as_slice(), pattern_atoms.as_slice()) {
            match out.get(h) {
                Some(existing) if existing != p => return None,
                _ => {
                    out.insert(*h, *p);
                }
            }
        }
    }
    Some(out)
}

/// Cheap necessary conditions for an isomorphism.
fn same_composition(a: &Molecule, b: &Molecule, strict: bool) -> bool {
    let key = |m: &Molecule| {
        m.atoms()
            .map(|(_, a)| {
                if strict {
                    (a.protons, a.isotope, a.charge, a.radicals)
                } else {
                    (a.protons, a.isotope, 0, 0)
                }
            })
            .sorted_unstable()
            .collect::<Vec<_>>()
    };
    a.atom_count() == b.atom_count() && a.bond_count() == b.bond_count() && key(a) == key(b)
}

#[instrument(level = "debug", skip_all, fields(mode = ?mode))]
fn find_mappings<P: Pattern + ?Sized>(
    host: &Molecule,
    pattern: &P,
    mode: MatchMode,
    options: &IsomorphismOptions,
) -> Vec<Mapping> {
    let Some(initial) = initial_pairs(host, pattern, options, mode) else {
        debug!("initial mapping can't be satisfied");
        return Vec::new();
    };
    let h = CompactGraph::new(host.graph());
    let p = pattern.compact();
    let Some(seed) = initial
        .iter()
        .map(|(&hi, &pi)| Some((p.to_index(pi)?, h.to_index(hi)?)))
        .collect::<Option<Vec<_>>>()
    else {
        debug!("initial mapping refers to missing atoms");
        return Vec::new();
    };
    let ring_flags: Vec<bool> = if pattern.requires_ring_info() {
        h.node_map
            .iter()
            .map(|&i| host.atom_in_cycle(i))
            .collect()
    } else {
        vec![false; h.node_count()]
    };
    let graph = host.graph();
    let strict = options.strict;
    let node_match = |pi: usize, hi: usize| {
        pattern.atom_accepts(
            p.from_index(pi),
            &graph[h.from_index(hi)],
            strict,
            ring_flags[hi],
        )
    };
    let edge_match = |e0: (usize, usize), e1: (usize, usize)| {
        graph
            .find_edge(h.from_index(e1.0), h.from_index(e1.1))
            .and_then(|e| graph.edge_weight(e))
            .map_or(false, |bond| {
                pattern.bond_accepts((p.from_index(e0.0), p.from_index(e0.1)), bond, strict)
            })
    };
    let found: Vec<Mapping> = matches_iter(&p, &h, node_match, edge_match, mode, &seed)
        .take(options.max_mappings.unwrap_or(usize::MAX))
        .map(|m| {
            m.into_iter()
                .enumerate()
                .map(|(pi, hi)| (h.from_index(hi), p.from_index(pi)))
                .collect()
        })
        .collect();
    debug!(count = found.len(), "found mappings");
    found
}

impl Molecule {
    /// Whether the two molecules are the same graph, up to atom and bond equivalence.
    pub fn is_isomorphic(&self, other: &Molecule, options: &IsomorphismOptions) -> bool {
        let options = IsomorphismOptions {
            max_mappings: Some(1),
            ..options.clone()
        };
        !self.find_isomorphism(other, &options).is_empty()
    }
    /// Every isomorphism from this molecule to `other`.
    pub fn find_isomorphism(&self, other: &Molecule, options: &IsomorphismOptions) -> Vec<Mapping> {
        if !same_composition(self, other, options.strict) {
            return Vec::new();
        }
        find_mappings(self, other, MatchMode::Isomorphism, options)
    }
    /// Whether `pattern` occurs in this molecule.
    pub fn is_subgraph_isomorphic<P: Pattern + ?Sized>(
        &self,
        pattern: &P,
        options: &IsomorphismOptions,
    ) -> bool {
        let options = IsomorphismOptions {
            max_mappings: Some(1),
            ..options.clone()
        };
        !find_mappings(self, pattern, MatchMode::Monomorphism, &options).is_empty()
    }
    /// Every occurrence of `pattern` in this molecule. Each mapping covers the whole pattern.
    pub fn find_subgraph_isomorphisms<P: Pattern + ?Sized>(
        &self,
        pattern: &P,
        options: &IsomorphismOptions,
    ) -> Vec<Mapping> {
        find_mappings(self, pattern, MatchMode::Monomorphism, options)
    }
}
