//! Constrained randomized growth of a single maze
//!
//! Plain randomized DFS carves passages between cells on a lattice; this
//! variant instead grows hallway cell by cell, admitting a Wall cell only when
//! it touches exactly one existing Hallway. Every grid it produces is a
//! maximal acyclic hallway tree, so validation passes by construction.

use rand::Rng;

use crate::algorithm::validator::validate;
use crate::io::error::{MazeError, Result};
use crate::spatial::grid::{Cell, Grid};

/// Grows mazes of fixed dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeGenerator {
    width: usize,
    height: usize,
}

impl MazeGenerator {
    /// Create a generator for `width x height` mazes
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is zero
    pub fn new(width: usize, height: usize) -> Result<Self> {
        // Surfaces dimension errors before any growth happens
        Grid::new(width, height)?;
        Ok(Self { width, height })
    }

    /// Maze width in cells
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Maze height in cells
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Grow one maze
    ///
    /// Each draw (start cell, then growth target) is uniform over its
    /// candidate set, so the output depends only on the random source.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` only if growth steps outside the grid, which the
    /// neighbor enumeration rules out
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Grid> {
        let mut grid = Grid::new(self.width, self.height)?;
        let start = (
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        );
        grid.set(start.0, start.1, Cell::Hallway)?;

        let mut stack = vec![start];
        let mut targets = Vec::with_capacity(4);

        while let Some(&(cx, cy)) = stack.last() {
            targets.clear();
            targets.extend(
                grid.neighbors4(cx, cy)
                    .filter(|&(nx, ny)| grid.is_growth_target(nx, ny)),
            );

            if targets.is_empty() {
                stack.pop();
                continue;
            }

            let choice = rng.random_range(0..targets.len());
            if let Some(&(nx, ny)) = targets.get(choice) {
                grid.set(nx, ny, Cell::Hallway)?;
                stack.push((nx, ny));
            }
        }

        Ok(grid)
    }

    /// Grow one maze and certify it
    ///
    /// # Errors
    ///
    /// Returns `GenerationInvariantViolation` if the grown maze fails
    /// validation; `candidate` is recorded in the diagnostic
    pub fn generate_checked<R: Rng + ?Sized>(&self, rng: &mut R, candidate: usize) -> Result<Grid> {
        let grid = self.generate(rng)?;
        certify(grid, candidate)
    }
}

/// Pass a generated grid through validation, turning failure into a fatal error
///
/// # Errors
///
/// Returns `GenerationInvariantViolation` naming the candidate and the failed check
pub fn certify(grid: Grid, candidate: usize) -> Result<Grid> {
    match validate(&grid) {
        Ok(()) => Ok(grid),
        Err(failure) => Err(MazeError::GenerationInvariantViolation {
            candidate,
            failure,
            grid: grid.to_string(),
        }),
    }
}
