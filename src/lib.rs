#[rustfmt::skip]
pub mod atom_info;
pub mod aromaticity;
pub mod clar;
pub mod core;
pub mod graph;
pub mod group;
pub mod isomorphism;
pub mod molecule;
pub mod rings;
pub mod utils;

pub mod prelude {
    pub use crate::clar::{
        clar_optimization, clar_rings, clar_transformation, generate_clar_structures, ClarError,
        ClarStructure, LinearProgram, LinearProgramSolver, LpError, LpSolution, SimplexSolver,
    };
    pub use crate::core::*;
    pub use crate::group::*;
    pub use crate::isomorphism::{IsomorphismOptions, Mapping, Pattern};
    pub use crate::molecule::*;
}

#[cfg(test)]
mod tests;
