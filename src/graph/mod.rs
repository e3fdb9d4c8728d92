//! Graph utilities.

pub mod algo;
pub mod compact;

pub use algo::*;
pub use compact::CompactGraph;
