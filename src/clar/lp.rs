//! Linear programs in equality form, and a small dense simplex solver for them.

use thiserror::Error;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LpError {
    #[error("the linear program is infeasible")]
    Infeasible,
    #[error("the linear program is unbounded")]
    Unbounded,
    #[error("the solver gave up after {0} iterations")]
    IterationLimit(usize),
    #[error("{what} has length {found}, expected {expected}")]
    Dimension {
        what: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("variable {0} has no finite lower bound")]
    FreeVariable(usize),
}

/// Minimize `objective · x` subject to `equalities · x = rhs` and per-variable bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearProgram {
    pub objective: Vec<f64>,
    /// Dense rows, one entry per variable
    pub equalities: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
    /// `(lower, upper)` for each variable. Upper bounds may be infinite.
    pub bounds: Vec<(f64, f64)>,
}
impl LinearProgram {
    /// A program with no constraints and every variable non-negative.
    pub fn new(objective: Vec<f64>) -> Self {
        let n = objective.len();
        Self {
            objective,
            equalities: Vec::new(),
            rhs: Vec::new(),
            bounds: vec![(0.0, f64::INFINITY); n],
        }
    }
    /// Give every variable the same bounds.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.bounds.fill((lower, upper));
        self
    }
    pub fn set_bounds(&mut self, var: usize, lower: f64, upper: f64) {
        if let Some(b) = self.bounds.get_mut(var) {
            *b = (lower, upper);
        }
    }
    pub fn add_equality(&mut self, row: Vec<f64>, rhs: f64) {
        self.equalities.push(row);
        self.rhs.push(rhs);
    }
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }
    pub fn num_constraints(&self) -> usize {
        self.equalities.len()
    }

    pub fn validate(&self) -> Result<(), LpError> {
        let n = self.num_variables();
        let check = |what, found, expected| {
            if found == expected {
                Ok(())
            } else {
                Err(LpError::Dimension {
                    what,
                    found,
                    expected,
                })
            }
        };
        check("bounds", self.bounds.len(), n)?;
        check("rhs", self.rhs.len(), self.equalities.len())?;
        for row in &self.equalities {
            check("constraint row", row.len(), n)?;
        }
        for (i, &(lower, upper)) in self.bounds.iter().enumerate() {
            if !lower.is_finite() {
                return Err(LpError::FreeVariable(i));
            }
            if lower > upper {
                return Err(LpError::Infeasible);
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub x: Vec<f64>,
    pub objective: f64,
    pub iterations: usize,
}

/// Anything that can solve a [`LinearProgram`].
pub trait LinearProgramSolver {
    fn solve(&self, lp: &LinearProgram) -> Result<LpSolution, LpError>;
}

/// Two-phase dense simplex with Bland's rule.
///
/// Bland's rule never cycles, so `max_iterations` only guards against programs far bigger than
/// this is meant for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}
impl Default for SimplexSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: 10_000,
        }
    }
}
impl SimplexSolver {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Rows of `cols + 1` entries, the last one being the right-hand side.
struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    cols: usize,
}
impl Tableau {
    fn rhs(&self, r: usize) -> f64 {
        self.rows[r][self.cols]
    }

    fn pivot(&mut self, r: usize, c: usize) {
        let p = self.rows[r][c];
        for v in &mut self.rows[r] {
            *v /= p;
        }
        let pivot_row = self.rows[r].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            let f = row[c];
            if i == r || f == 0.0 {
                continue;
            }
            for (v, pv) in row.iter_mut().zip(&pivot_row) {
                *v -= f * pv;
            }
        }
        self.basis[r] = c;
    }

    fn reduced_cost(&self, cost: &[f64], j: usize) -> f64 {
        cost[j]
            - self
                .basis
                .iter()
                .zip(&self.rows)
                .map(|(&b, row)| cost[b] * row[j])
                .sum::<f64>()
    }

    /// Minimize `cost` from the current basis, only letting `allowed` columns enter.
    fn optimize(
        &mut self,
        cost: &[f64],
        allowed: impl Fn(usize) -> bool,
        solver: &SimplexSolver,
        iterations: &mut usize,
    ) -> Result<(), LpError> {
        let tol = solver.tolerance;
        loop {
            let entering = (0..self.cols).find(|&j| {
                allowed(j) && !self.basis.contains(&j) && self.reduced_cost(cost, j) < -tol
            });
            let Some(c) = entering else {
                return Ok(());
            };
            let mut leave: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let a = row[c];
                if a <= tol {
                    continue;
                }
                let ratio = row[self.cols] / a;
                leave = match leave {
                    Some((li, lr))
                        if lr < ratio - tol || (lr <= ratio + tol && self.basis[li] < self.basis[i]) =>
                    {
                        Some((li, lr))
                    }
                    _ => Some((i, ratio)),
                };
            }
            let Some((r, _)) = leave else {
                return Err(LpError::Unbounded);
            };
            *iterations += 1;
            if *iterations > solver.max_iterations {
                return Err(LpError::IterationLimit(solver.max_iterations));
            }
            trace!(row = r, col = c, "pivot");
            self.pivot(r, c);
        }
    }
}

impl LinearProgramSolver for SimplexSolver {
    #[instrument(level = "debug", skip_all, fields(vars = lp.num_variables(), rows = lp.num_constraints()))]
    fn solve(&self, lp: &LinearProgram) -> Result<LpSolution, LpError> {
        lp.validate()?;
        let tol = self.tolerance;
        let n = lp.num_variables();
        // substitute x = lower + y, so every y is non-negative
        let lower: Vec<f64> = lp.bounds.iter().map(|b| b.0).collect();
        let ranges: Vec<(usize, f64)> = lp
            .bounds
            .iter()
            .enumerate()
            .filter(|(_, b)| b.1.is_finite())
            .map(|(j, b)| (j, b.1 - b.0))
            .collect();
        let k = ranges.len();
        let m = lp.num_constraints() + k;
        // columns: shifted variables, then slacks for the upper bounds, then artificials
        let cols = n + k + m;
        let mut rows = Vec::with_capacity(m);
        for (row, &b) in lp.equalities.iter().zip(&lp.rhs) {
            let mut t = vec![0.0; cols + 1];
            t[..n].copy_from_slice(row);
            t[cols] = b - row.iter().zip(&lower).map(|(a, l)| a * l).sum::<f64>();
            rows.push(t);
        }
        for (s, &(j, range)) in ranges.iter().enumerate() {
            let mut t = vec![0.0; cols + 1];
            t[j] = 1.0;
            t[n + s] = 1.0;
            t[cols] = range;
            rows.push(t);
        }
        for (i, t) in rows.iter_mut().enumerate() {
            if t[cols] < 0.0 {
                t.iter_mut().for_each(|v| *v = -*v);
            }
            t[n + k + i] = 1.0;
        }
        let mut tableau = Tableau {
            rows,
            basis: (n + k..cols).collect(),
            cols,
        };
        let mut iterations = 0;

        let mut phase1 = vec![0.0; cols];
        phase1[n + k..].fill(1.0);
        tableau.optimize(&phase1, |_| true, self, &mut iterations)?;
        let infeasibility: f64 = tableau
            .basis
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b >= n + k)
            .map(|(r, _)| tableau.rhs(r))
            .sum();
        if infeasibility > tol * (1.0 + m as f64) {
            debug!(infeasibility, "no feasible point");
            return Err(LpError::Infeasible);
        }
        // drive the artificials out of the basis where possible. Rows where that's impossible
        // are redundant and keep a zero artificial.
        for r in 0..m {
            if tableau.basis[r] < n + k {
                continue;
            }
            if let Some(c) = (0..n + k)
                .find(|&c| tableau.rows[r][c].abs() > tol && !tableau.basis.contains(&c))
            {
                tableau.pivot(r, c);
            }
        }

        let mut phase2 = vec![0.0; cols];
        phase2[..n].copy_from_slice(&lp.objective);
        tableau.optimize(&phase2, |j| j < n + k, self, &mut iterations)?;

        let mut x = lower;
        for (r, &b) in tableau.basis.iter().enumerate() {
            if b < n {
                x[b] += tableau.rhs(r);
            }
        }
        for (v, &(l, u)) in x.iter_mut().zip(&lp.bounds) {
            *v = v.clamp(l, u);
            if (*v - v.round()).abs() <= tol {
                *v = v.round();
            }
        }
        let objective = lp.evaluate(&x);
        debug!(objective, iterations, "solved");
        Ok(LpSolution {
            x,
            objective,
            iterations,
        })
    }
}
