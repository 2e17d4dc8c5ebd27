//! Space-filling-curve linearization of lattices.
//!
//! This module provides:
//! - The d-dimensional Hilbert index-to-coordinate transform and permutation builder
//! - A shared, shape-keyed permutation cache
//! - The Gosper curve over hexagonal lattices

pub mod cache;
pub mod curve;
pub mod gosper;

pub use cache::{cached_permutation, global_cache, HilbertCache};
pub use curve::{hilbert_permutation, index_to_coords, MAX_HYPERCUBE_CELLS};
pub use gosper::{coord_to_distance as gosper_distance, gosper_order, HexCell};
