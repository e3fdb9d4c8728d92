//! Clar structures: the resonance forms with the most aromatic sextets.
//!
//! The assignment is a 0/1 program over six-membered rings and the bonds around them. For the
//! benzenoid systems this is meant for, the relaxation is integral, so a plain LP solver is
//! enough. Anything fractional is reported instead of rounded.

use crate::core::BondOrder;
use crate::molecule::{AtomIndex, Molecule, MoleculeError, Ring};
use std::collections::{BTreeSet, VecDeque};
use thiserror::Error;
use tracing::{debug, instrument, trace};

mod lp;

pub use lp::*;

/// How far an LP value may sit from 0 or 1 and still count as that integer.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClarError {
    #[error("no Clar structure satisfies the constraints")]
    Infeasible,
    #[error("unaccepted {kind} value obtained from optimization: {value}")]
    UnacceptedValue { kind: &'static str, value: f64 },
    #[error("ring atoms aren't in connected order: {} and {} aren't bonded", .0.index(), .1.index())]
    RingTraversal(AtomIndex, AtomIndex),
    #[error("can't pin ring {pin}, there are only {rings} six-membered rings")]
    PinOutOfRange { pin: usize, rings: usize },
    #[error(transparent)]
    Lp(LpError),
    #[error(transparent)]
    Molecule(#[from] MoleculeError),
}
impl From<LpError> for ClarError {
    fn from(value: LpError) -> Self {
        match value {
            LpError::Infeasible => Self::Infeasible,
            e => Self::Lp(e),
        }
    }
}

/// An optimized resonance form.
#[derive(Debug, Clone)]
pub struct ClarStructure {
    pub molecule: Molecule,
    /// Rings holding a sextet, in SSSR order
    pub sextets: Vec<Ring>,
    /// The minimized objective, minus the number of sextets
    pub objective: f64,
}
impl ClarStructure {
    pub fn sextet_count(&self) -> usize {
        self.sextets.len()
    }
}

/// Six-membered rings of the SSSR, which are the only candidates for sextets.
pub fn clar_rings(molecule: &Molecule) -> Result<Vec<Ring>, MoleculeError> {
    Ok(molecule
        .smallest_set_of_smallest_rings()?
        .iter()
        .filter(|r| r.len() == 6)
        .cloned()
        .collect())
}

fn as_binary(value: f64, kind: &'static str) -> Result<bool, ClarError> {
    if value.abs() <= INTEGRALITY_TOLERANCE {
        Ok(false)
    } else if (value - 1.0).abs() <= INTEGRALITY_TOLERANCE {
        Ok(true)
    } else {
        Err(ClarError::UnacceptedValue { kind, value })
    }
}

/// The program for one molecule, solvable again under different ring fixings.
struct ClarProgram {
    molecule: Molecule,
    rings: Vec<Ring>,
    bonds: Vec<(AtomIndex, AtomIndex)>,
    lp: LinearProgram,
}
impl ClarProgram {
    fn new(molecule: &Molecule) -> Result<Self, ClarError> {
        let molecule = molecule.copy(true).into_owned();
        let rings = clar_rings(&molecule)?;
        let atoms: BTreeSet<AtomIndex> = rings.iter().flatten().copied().collect();
        let mut bonds = BTreeSet::new();
        for &atom in &atoms {
            for n in molecule.neighbors(atom) {
                if molecule.graph()[n].is_non_hydrogen() {
                    bonds.insert((atom.min(n), atom.max(n)));
                }
            }
        }
        let bonds: Vec<_> = bonds.into_iter().collect();
        let nr = rings.len();
        let vars = nr + bonds.len();

        let mut objective = vec![0.0; vars];
        objective[..nr].fill(-1.0);
        let mut lp = LinearProgram::new(objective).with_bounds(0.0, 1.0);
        for &atom in &atoms {
            let mut row = vec![0.0; vars];
            for (i, ring) in rings.iter().enumerate() {
                if ring.contains(&atom) {
                    row[i] = 1.0;
                }
            }
            for (j, &(a, b)) in bonds.iter().enumerate() {
                if a == atom || b == atom {
                    row[nr + j] = 1.0;
                }
            }
            lp.add_equality(row, 1.0);
        }
        debug!(rings = nr, bonds = bonds.len(), "built program");
        Ok(Self {
            molecule,
            rings,
            bonds,
            lp,
        })
    }

    /// Solve with each `(ring, sextet)` pair held fixed.
    fn solve<S: LinearProgramSolver + ?Sized>(
        &self,
        fixed: &[(usize, bool)],
        solver: &S,
    ) -> Result<(ClarStructure, Vec<bool>), ClarError> {
        let nr = self.rings.len();
        let mut lp = self.lp.clone();
        for &(ring, on) in fixed {
            let v = if on { 1.0 } else { 0.0 };
            lp.set_bounds(ring, v, v);
        }
        let solution = solver.solve(&lp)?;
        let sextet_flags = solution.x[..nr]
            .iter()
            .map(|&v| as_binary(v, "ring"))
            .collect::<Result<Vec<_>, _>>()?;
        let double_flags = solution.x[nr..]
            .iter()
            .map(|&v| as_binary(v, "bond"))
            .collect::<Result<Vec<_>, _>>()?;

        let mut mol = self.molecule.clone();
        for (&(a, b), &double) in self.bonds.iter().zip(&double_flags) {
            let order = if double {
                BondOrder::DOUBLE
            } else {
                BondOrder::SINGLE
            };
            mol.set_bond_order(a, b, order)?;
        }
        let mut sextets = Vec::new();
        for (ring, &on) in self.rings.iter().zip(&sextet_flags) {
            if on {
                clar_transformation(&mut mol, ring)?;
                sextets.push(ring.clone());
            }
        }
        trace!(sextets = sextets.len(), objective = solution.objective, "solved program");
        let found = ClarStructure {
            molecule: mol,
            sextets,
            objective: solution.objective,
        };
        Ok((found, sextet_flags))
    }
}

/// Find one Clar structure, optionally forcing the `pin`th six-membered ring to be a sextet.
///
/// The input is left alone, the result carries its own copy with the new bond orders.
#[instrument(level = "debug", skip_all, fields(pin = ?pin))]
pub fn clar_optimization<S: LinearProgramSolver + ?Sized>(
    molecule: &Molecule,
    pin: Option<usize>,
    solver: &S,
) -> Result<ClarStructure, ClarError> {
    let program = ClarProgram::new(molecule)?;
    let rings = program.rings.len();
    let fixed = match pin {
        Some(pin) if pin >= rings => return Err(ClarError::PinOutOfRange { pin, rings }),
        Some(pin) => vec![(pin, true)],
        None => Vec::new(),
    };
    let (found, _) = program.solve(&fixed, solver)?;
    debug!(sextets = found.sextet_count(), objective = found.objective, "found Clar structure");
    Ok(found)
}

/// Turn every bond around `ring` into a benzene bond.
///
/// The ring has to be in traversal order, closing back on its first atom.
pub fn clar_transformation(molecule: &mut Molecule, ring: &[AtomIndex]) -> Result<(), ClarError> {
    let pairs: Vec<_> = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
        .collect();
    if let Some(&(a, b)) = pairs.iter().find(|&&(a, b)| !molecule.has_bond(a, b)) {
        return Err(ClarError::RingTraversal(a, b));
    }
    for (a, b) in pairs {
        molecule.set_bond_order(a, b, BondOrder::BENZENE)?;
    }
    Ok(())
}

/// Every Clar structure with the maximum number of sextets, one per distinct sextet set.
///
/// The unpinned optimum comes first. The rest come from splitting the ring assignments around
/// each structure found: the `i`th branch keeps the earlier free rings as they were and flips
/// ring `i`. Branches never overlap, so every sextet set turns up exactly once, and a branch
/// whose optimum falls short of the best count is dropped whole.
#[instrument(level = "debug", skip_all)]
pub fn generate_clar_structures<S: LinearProgramSolver + ?Sized>(
    molecule: &Molecule,
    solver: &S,
) -> Result<Vec<ClarStructure>, ClarError> {
    let program = ClarProgram::new(molecule)?;
    let (best, flags) = program.solve(&[], solver)?;
    let target = best.sextet_count();
    if target == 0 {
        return Ok(vec![best]);
    }
    let mut queue = VecDeque::new();
    branch(&mut queue, &[], &flags);
    let mut out = vec![best];
    while let Some(fixed) = queue.pop_front() {
        let (found, flags) = match program.solve(&fixed, solver) {
            Ok(found) => found,
            Err(ClarError::Infeasible | ClarError::UnacceptedValue { .. }) => {
                trace!(?fixed, "no structure under these fixings");
                continue;
            }
            Err(e) => return Err(e),
        };
        if found.sextet_count() < target {
            continue;
        }
        branch(&mut queue, &fixed, &flags);
        out.push(found);
    }
    debug!(count = out.len(), sextets = target, "enumerated Clar structures");
    Ok(out)
}

/// Queue the branches that exclude `flags` but keep `fixed`.
fn branch(queue: &mut VecDeque<Vec<(usize, bool)>>, fixed: &[(usize, bool)], flags: &[bool]) {
    let mut prefix = fixed.to_vec();
    for (ring, &on) in flags.iter().enumerate() {
        if fixed.iter().any(|&(r, _)| r == ring) {
            continue;
        }
        let mut child = prefix.clone();
        child.push((ring, !on));
        queue.push_back(child);
        prefix.push((ring, on));
    }
}

impl Molecule {
    /// [`clar_optimization`] with the built-in solver and no pinned ring.
    pub fn clar_structure(&self) -> Result<ClarStructure, ClarError> {
        clar_optimization(self, None, &SimplexSolver::default())
    }
    /// [`generate_clar_structures`] with the built-in solver.
    pub fn clar_structures(&self) -> Result<Vec<ClarStructure>, ClarError> {
        generate_clar_structures(self, &SimplexSolver::default())
    }
}
