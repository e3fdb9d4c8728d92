
mod algo;
mod isomorphism;
mod utils;
