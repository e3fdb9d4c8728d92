pub mod connect;
pub mod connectivity;
pub mod isomorphism;
pub mod sssr;

pub use connect::{num_cycles, ConnectedGraphIter};
pub use connectivity::{connectivity_values, ConnectivityOverflow};
pub use isomorphism::{matches_iter, GraphMatcher, MatchMode};
pub use sssr::{minimum_cycle_basis, shortest_cycle_through};
