//! Label-addressed edits, as used by reaction recipes.

use super::*;

/// A single edit to a molecule. Atoms are addressed by their labels, and each label has to name
/// exactly one atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    BreakBond { atom1: String, atom2: String },
    /// Form a single bond
    FormBond { atom1: String, atom2: String },
    ChangeBond { atom1: String, atom2: String, delta: i8 },
    GainRadical { atom: String, n: u8 },
    LoseRadical { atom: String, n: u8 },
}
impl Action {
    pub fn break_bond(atom1: impl Into<String>, atom2: impl Into<String>) -> Self {
        Self::BreakBond {
            atom1: atom1.into(),
            atom2: atom2.into(),
        }
    }
    pub fn form_bond(atom1: impl Into<String>, atom2: impl Into<String>) -> Self {
        Self::FormBond {
            atom1: atom1.into(),
            atom2: atom2.into(),
        }
    }
    pub fn change_bond(atom1: impl Into<String>, atom2: impl Into<String>, delta: i8) -> Self {
        Self::ChangeBond {
            atom1: atom1.into(),
            atom2: atom2.into(),
            delta,
        }
    }
    pub fn gain_radical(atom: impl Into<String>, n: u8) -> Self {
        Self::GainRadical {
            atom: atom.into(),
            n,
        }
    }
    pub fn lose_radical(atom: impl Into<String>, n: u8) -> Self {
        Self::LoseRadical {
            atom: atom.into(),
            n,
        }
    }
}
impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::BreakBond { atom1, atom2 } => write!(f, "BREAK_BOND({atom1}, {atom2})"),
            Self::FormBond { atom1, atom2 } => write!(f, "FORM_BOND({atom1}, {atom2})"),
            Self::ChangeBond {
                atom1,
                atom2,
                delta,
            } => write!(f, "CHANGE_BOND({atom1}, {delta:+}, {atom2})"),
            Self::GainRadical { atom, n } => write!(f, "GAIN_RADICAL({atom}, {n})"),
            Self::LoseRadical { atom, n } => write!(f, "LOSE_RADICAL({atom}, {n})"),
        }
    }
}

/// A validated edit, ready to be applied without any further checks.
enum Resolved {
    Remove(AtomIndex, AtomIndex),
    Add(AtomIndex, AtomIndex),
    SetOrder(AtomIndex, AtomIndex, BondOrder),
    SetRadicals(AtomIndex, u8),
}

impl Molecule {
    /// Apply an action. Every check runs before anything is changed, so on error the molecule is
    /// left exactly as it was.
    #[instrument(level = "debug", skip_all, fields(action = %action))]
    pub fn apply_action(&mut self, action: &Action) -> Result<(), MoleculeError> {
        let resolved = match action {
            Action::BreakBond { atom1, atom2 } => {
                let (a, b) = self.labeled_pair(atom1, atom2)?;
                self.get_bond(a, b)?;
                Resolved::Remove(a, b)
            }
            Action::FormBond { atom1, atom2 } => {
                let (a, b) = self.labeled_pair(atom1, atom2)?;
                self.check_new_bond(a, b)?;
                Resolved::Add(a, b)
            }
            Action::ChangeBond {
                atom1,
                atom2,
                delta,
            } => {
                let (a, b) = self.labeled_pair(atom1, atom2)?;
                let order = self.get_bond(a, b)?.order.changed_by(*delta)?;
                Resolved::SetOrder(a, b, order)
            }
            Action::GainRadical { atom, n } => {
                let idx = self.labeled_atom(atom)?;
                let mut copy = self.atom(idx)?.clone();
                copy.gain_radicals(*n)?;
                Resolved::SetRadicals(idx, copy.radicals)
            }
            Action::LoseRadical { atom, n } => {
                let idx = self.labeled_atom(atom)?;
                let mut copy = self.atom(idx)?.clone();
                copy.lose_radicals(*n)?;
                Resolved::SetRadicals(idx, copy.radicals)
            }
        };
        match resolved {
            Resolved::Remove(a, b) => {
                self.remove_bond(a, b)?;
            }
            Resolved::Add(a, b) => {
                self.add_bond(a, b, BondOrder::SINGLE)?;
            }
            Resolved::SetOrder(a, b, order) => self.set_bond_order(a, b, order)?,
            Resolved::SetRadicals(idx, radicals) => self.atom_mut(idx)?.radicals = radicals,
        }
        debug!("applied action");
        Ok(())
    }

    fn labeled_pair(&self, a: &str, b: &str) -> Result<(AtomIndex, AtomIndex), MoleculeError> {
        Ok((self.labeled_atom(a)?, self.labeled_atom(b)?))
    }
}
