//! **gridmaze** generates perfect mazes on rectangular grids with a randomised depth first
//! traversal (the recursive backtracker).
//!
//! The result is a `Grid` of per cell wall states; drawing it is left to the caller.

// `error_chain!` can recurse deeply.
#![recursion_limit = "1024"]

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod units;
pub mod visited;

pub use crate::cells::{Facet, Position, Walls};
pub use crate::generators::{generate, generate_with_rng, GeneratorOptions, GeneratorOptionsBuilder};
pub use crate::grid::Grid;
pub use crate::units::{Height, Width};
