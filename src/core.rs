//! Utilities for modeling molecules as graphs
// This top-level file handles atom and bond definitions

use crate::atom_info::{element_by_number, isotope, Element};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Absolute tolerance used whenever bond orders are compared.
pub const ORDER_TOLERANCE: f64 = 1e-9;

/// An edit was rejected because it would leave an atom or bond in an invalid state.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ActionError {
    #[error("cannot increment a bond of order {0}")]
    Increment(BondOrder),
    #[error("cannot decrement a bond of order {0}")]
    Decrement(BondOrder),
    #[error("cannot change a bond order by {0}")]
    InvalidDelta(i8),
    #[error("cannot remove {requested} radical electrons from an atom with {present}")]
    RadicalUnderflow { present: u8, requested: u8 },
    #[error("too many radical electrons: attempted to set {0}")]
    RadicalOverflow(u16),
}

/// A value in the free-form part of an atom's property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}
impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Annotations that algorithms attach to atoms.
///
/// The well-known ones get real fields, anything else goes in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomProps {
    /// Identity that survives copies, set by `Molecule::assign_atom_ids`
    pub id: Option<usize>,
    /// Set by ring membership perception
    pub in_ring: Option<bool>,
    /// Extended connectivity value, set by `Molecule::update_connectivity_values`
    pub connectivity: Option<u64>,
    pub extra: BTreeMap<String, PropValue>,
}
impl AtomProps {
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.extra.get(key)
    }
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.extra.insert(key.into(), value.into())
    }
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.extra.remove(key)
    }
    /// Forget everything derived from the graph structure.
    pub fn clear_structural(&mut self) {
        self.in_ring = None;
        self.connectivity = None;
    }
}

/// An atom in the molecule graph.
///
/// Equality, ordering and hashing only look at the sort key (element, radicals, charge, lone
/// pairs). Two atoms in the same molecule are told apart by their index, not by value.
#[derive(Debug, Clone, Default)]
pub struct Atom {
    pub protons: u8,
    /// Mass number, `0` for natural abundance
    pub isotope: u16,
    pub charge: i8,
    pub radicals: u8,
    /// `None` if lone pairs haven't been assigned yet
    pub lone_pairs: Option<u8>,
    pub label: Option<String>,
    pub props: AtomProps,
}
impl Atom {
    pub fn new(protons: u8) -> Self {
        Self {
            protons,
            ..Self::default()
        }
    }
    pub fn new_isotope(protons: u8, isotope: u16) -> Self {
        Self {
            protons,
            isotope,
            ..Self::default()
        }
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

    /// Registry entry for this atom's element.
    pub fn element(&self) -> Option<&'static Element> {
        element_by_number(self.protons)
    }
    pub fn symbol(&self) -> &'static str {
        self.element().map_or("?", |e| e.symbol)
    }
    /// Atomic or isotopic mass, in g/mol.
    pub fn mass(&self) -> f64 {
        if self.isotope != 0 {
            if let Some(iso) = isotope(self.protons, self.isotope) {
                return iso.mass;
            }
        }
        self.element().map_or(0.0, |e| e.mass)
    }
    pub fn sort_key(&self) -> (u8, u8, i8, Option<u8>) {
        (self.protons, self.radicals, self.charge, self.lone_pairs)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.protons == 1
    }
    pub fn is_non_hydrogen(&self) -> bool {
        self.protons != 1
    }
    pub fn is_carbon(&self) -> bool {
        self.protons == 6
    }
    pub fn is_nitrogen(&self) -> bool {
        self.protons == 7
    }
    pub fn is_oxygen(&self) -> bool {
        self.protons == 8
    }
    pub fn is_fluorine(&self) -> bool {
        self.protons == 9
    }
    pub fn is_silicon(&self) -> bool {
        self.protons == 14
    }
    pub fn is_sulfur(&self) -> bool {
        self.protons == 16
    }
    pub fn is_chlorine(&self) -> bool {
        self.protons == 17
    }
    pub fn is_iodine(&self) -> bool {
        self.protons == 53
    }
    /// Nitrogen, oxygen or sulfur.
    pub fn is_nos(&self) -> bool {
        matches!(self.protons, 7 | 8 | 16)
    }

    pub fn increment_radical(&mut self) -> Result<(), ActionError> {
        self.gain_radicals(1)
    }
    pub fn decrement_radical(&mut self) -> Result<(), ActionError> {
        self.lose_radicals(1)
    }
    pub fn gain_radicals(&mut self, n: u8) -> Result<(), ActionError> {
        self.radicals = self
            .radicals
            .checked_add(n)
            .ok_or(ActionError::RadicalOverflow(self.radicals as u16 + n as u16))?;
        Ok(())
    }
    pub fn lose_radicals(&mut self, n: u8) -> Result<(), ActionError> {
        self.radicals = self
            .radicals
            .checked_sub(n)
            .ok_or(ActionError::RadicalUnderflow {
                present: self.radicals,
                requested: n,
            })?;
        Ok(())
    }

    /// Recompute lone pairs from the valence shell, given the sum of this atom's bond orders.
    pub fn update_lone_pairs(&mut self, total_order: f64) {
        let lone_pairs = match self.protons {
            1 => 0,
            2 => 1,
            _ => {
                let valence = self.element().map_or(0, |e| e.valence_electrons) as f64;
                let free = valence - self.radicals as f64 - self.charge as f64 - total_order;
                (free / 2.0).floor().max(0.0) as u8
            }
        };
        self.lone_pairs = Some(lone_pairs);
    }

    /// Whether the two atoms describe the same chemical state.
    ///
    /// Lax comparison only looks at the element; electron placement is ignored.
    pub fn equivalent(&self, other: &Self, strict: bool) -> bool {
        if self.protons != other.protons || self.isotope != other.isotope {
            return false;
        }
        !strict
            || (self.charge == other.charge
                && self.radicals == other.radicals
                && lone_pairs_match(self.lone_pairs, other.lone_pairs))
    }
    /// For fully specified atoms, being a specific case of something is being equivalent to it.
    pub fn is_specific_case_of(&self, other: &Self) -> bool {
        self.equivalent(other, true)
    }
}

/// Unknown lone pairs are compatible with anything.
fn lone_pairs_match(a: Option<u8>, b: Option<u8>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}
impl Eq for Atom {}
impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}
impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.element().map_or("unknown", |e| e.name))?;
            if self.isotope != 0 {
                write!(f, "-{}", self.isotope)?;
            }
        } else {
            use fmtastic::*;
            if self.isotope != 0 {
                write!(f, "{}", Superscript(self.isotope))?;
            }
            f.write_str(self.symbol())?;
            match self.charge {
                0 => {}
                1 => f.write_str("⁺")?,
                -1 => f.write_str("⁻")?,
                _ => write!(f, "{:+}", Superscript(self.charge))?,
            }
            for _ in 0..self.radicals {
                f.write_str("•")?;
            }
        }
        Ok(())
    }
}

/// The order of a bond, stored as a number so that partial orders survive arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct BondOrder(pub f64);
impl BondOrder {
    /// Non-bond, also used to mark hydrogen bonds
    pub const NONE: Self = Self(0.0);
    pub const SINGLE: Self = Self(1.0);
    /// Aromatic bond in a benzene ring
    pub const BENZENE: Self = Self(1.5);
    pub const DOUBLE: Self = Self(2.0);
    pub const TRIPLE: Self = Self(3.0);
    pub const QUADRUPLE: Self = Self(4.0);

    pub fn value(self) -> f64 {
        self.0
    }
    pub fn is_order(self, order: f64) -> bool {
        (self.0 - order).abs() <= ORDER_TOLERANCE
    }
    pub fn is_hydrogen_bond(self) -> bool {
        self.is_order(0.0)
    }
    pub fn is_single(self) -> bool {
        self.is_order(1.0)
    }
    pub fn is_benzene(self) -> bool {
        self.is_order(1.5)
    }
    pub fn is_double(self) -> bool {
        self.is_order(2.0)
    }
    pub fn is_triple(self) -> bool {
        self.is_order(3.0)
    }
    pub fn is_quadruple(self) -> bool {
        self.is_order(4.0)
    }

    /// Single-letter symbol, if this is one of the named orders.
    pub fn symbol(self) -> Option<char> {
        [
            (0.0, 'H'),
            (1.0, 'S'),
            (1.5, 'B'),
            (2.0, 'D'),
            (3.0, 'T'),
            (4.0, 'Q'),
        ]
        .into_iter()
        .find_map(|(o, c)| self.is_order(o).then_some(c))
    }
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            'H' => Self::NONE,
            'S' => Self::SINGLE,
            'B' => Self::BENZENE,
            'D' => Self::DOUBLE,
            'T' => Self::TRIPLE,
            'Q' => Self::QUADRUPLE,
            _ => return None,
        })
    }

    /// Integral order in 1..=4, or `None` for anything else.
    fn integral(self) -> Option<u8> {
        (1..=4u8).find(|&o| self.is_order(o as f64))
    }

    pub fn incremented(self) -> Result<Self, ActionError> {
        match self.integral() {
            Some(o @ 1..=3) => Ok(Self((o + 1) as f64)),
            _ => Err(ActionError::Increment(self)),
        }
    }
    pub fn decremented(self) -> Result<Self, ActionError> {
        match self.integral() {
            Some(o @ 2..=4) => Ok(Self((o - 1) as f64)),
            _ => Err(ActionError::Decrement(self)),
        }
    }
    /// Apply a change of `delta` steps, one step at a time.
    pub fn changed_by(self, delta: i8) -> Result<Self, ActionError> {
        if delta == 0 {
            return Err(ActionError::InvalidDelta(delta));
        }
        let mut out = self;
        for _ in 0..delta.unsigned_abs() {
            out = if delta > 0 {
                out.incremented()
            } else {
                out.decremented()
            }
            .map_err(|_| {
                if delta > 0 {
                    ActionError::Increment(self)
                } else {
                    ActionError::Decrement(self)
                }
            })?;
        }
        Ok(out)
    }
}
impl PartialEq for BondOrder {
    fn eq(&self, other: &Self) -> bool {
        self.is_order(other.0)
    }
}
impl PartialOrd for BondOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else {
            self.0.partial_cmp(&other.0)
        }
    }
}
impl Display for BondOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{c}"),
            None => write!(f, "{}", self.0),
        }
    }
}
impl From<f64> for BondOrder {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// A bond between atoms in the molecule graph. The endpoints are owned by the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Bond {
    pub order: BondOrder,
}
impl Bond {
    pub const fn new(order: BondOrder) -> Self {
        Self { order }
    }
    pub fn is_single(&self) -> bool {
        self.order.is_single()
    }
    pub fn is_double(&self) -> bool {
        self.order.is_double()
    }
    pub fn is_triple(&self) -> bool {
        self.order.is_triple()
    }
    pub fn is_quadruple(&self) -> bool {
        self.order.is_quadruple()
    }
    pub fn is_benzene(&self) -> bool {
        self.order.is_benzene()
    }
    pub fn is_hydrogen_bond(&self) -> bool {
        self.order.is_hydrogen_bond()
    }

    pub fn increment_order(&mut self) -> Result<(), ActionError> {
        self.order = self.order.incremented()?;
        Ok(())
    }
    pub fn decrement_order(&mut self) -> Result<(), ActionError> {
        self.order = self.order.decremented()?;
        Ok(())
    }

    /// Lax comparison treats every pair of bonds as equivalent.
    pub fn equivalent(&self, other: &Self, strict: bool) -> bool {
        !strict || self.order == other.order
    }
    pub fn is_specific_case_of(&self, other: &Self) -> bool {
        self.equivalent(other, true)
    }
}
impl Display for Bond {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.order, f)
    }
}
impl From<BondOrder> for Bond {
    fn from(order: BondOrder) -> Self {
        Self::new(order)
    }
}
