//! Spatial data structures for maze grids
//!
//! This module contains:
//! - The two-state cell grid and its neighbor relations
//! - Connected-component labeling under 4- and 8-connectivity

/// Connected-component labeling
pub mod components;
/// Maze cell grid
pub mod grid;

pub use grid::{Cell, Grid};
