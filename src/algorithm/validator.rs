//! Topological certification of maze grids
//!
//! A grid is a valid maze when three independent checks pass, in order:
//!
//! 1. No Wall cell could still be grown into (the hallway tree is maximal)
//! 2. Hallway cells form exactly one 4-connected component with no filled 2x2 block
//! 3. Every 8-connected Wall component reaches the border (no enclosed pocket)
//!
//! The first check catches grids that stopped growing early; the others catch
//! loops and isolated pockets that the growth rule prevents but that a grid
//! loaded from elsewhere may still contain.

use std::fmt;

use crate::spatial::components::{Connectivity, label_components};
use crate::spatial::grid::{Cell, Grid};

/// The first check a grid failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The Wall cell at `(x, y)` is still an eligible growth target
    Growable {
        /// Column of the growable cell
        x: usize,
        /// Row of the growable cell
        y: usize,
    },
    /// The grid contains no Hallway cell
    NoHallway,
    /// Hallway cells split into several 4-connected components
    Disconnected {
        /// Number of Hallway components
        components: usize,
    },
    /// The 2x2 block whose top-left corner is `(x, y)` is all Hallway
    LoopBlock {
        /// Column of the block's top-left cell
        x: usize,
        /// Row of the block's top-left cell
        y: usize,
    },
    /// A Wall pocket starting at `(x, y)` touches no border
    EnclosedWall {
        /// Column of the pocket's first cell
        x: usize,
        /// Row of the pocket's first cell
        y: usize,
    },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Growable { x, y } => write!(f, "wall cell ({x}, {y}) can still be grown into"),
            Self::NoHallway => write!(f, "maze has no hallway cells"),
            Self::Disconnected { components } => {
                write!(f, "hallways form {components} separate components")
            }
            Self::LoopBlock { x, y } => write!(f, "2x2 hallway block at ({x}, {y})"),
            Self::EnclosedWall { x, y } => {
                write!(f, "wall pocket at ({x}, {y}) does not reach the border")
            }
        }
    }
}

/// Whether `grid` passes every maze check
pub fn is_valid_maze(grid: &Grid) -> bool {
    validate(grid).is_ok()
}

/// Run every check in order and report the first failure
///
/// # Errors
///
/// Returns the first `ValidationFailure` encountered
pub fn validate(grid: &Grid) -> Result<(), ValidationFailure> {
    if let Some((x, y)) = find_growth_target(grid) {
        return Err(ValidationFailure::Growable { x, y });
    }
    check_hallway_connectivity(grid)?;
    if let Some((x, y)) = find_loop_block(grid) {
        return Err(ValidationFailure::LoopBlock { x, y });
    }
    if let Some((x, y)) = find_enclosed_wall(grid) {
        return Err(ValidationFailure::EnclosedWall { x, y });
    }
    Ok(())
}

/// First Wall cell that a Hallway cell could still grow into
pub fn find_growth_target(grid: &Grid) -> Option<(usize, usize)> {
    grid.indexed_cells()
        .filter(|&(_, cell)| cell.is_hallway())
        .find_map(|((x, y), _)| {
            grid.neighbors4(x, y)
                .find(|&(nx, ny)| grid.is_growth_target(nx, ny))
        })
}

/// Require exactly one 4-connected Hallway component
///
/// # Errors
///
/// Returns `NoHallway` for an all-Wall grid and `Disconnected` for several components
pub fn check_hallway_connectivity(grid: &Grid) -> Result<(), ValidationFailure> {
    if grid.hallway_count() == 0 {
        return Err(ValidationFailure::NoHallway);
    }
    match label_components(grid, Cell::Hallway, Connectivity::Four).count() {
        components if components > 1 => Err(ValidationFailure::Disconnected { components }),
        _ => Ok(()),
    }
}

/// Top-left corner of the first all-Hallway 2x2 block
pub fn find_loop_block(grid: &Grid) -> Option<(usize, usize)> {
    let hallway = |x: usize, y: usize| grid.cell(x, y).is_some_and(Cell::is_hallway);
    let rows = grid.height().saturating_sub(1);
    let cols = grid.width().saturating_sub(1);

    (0..rows)
        .flat_map(|y| (0..cols).map(move |x| (x, y)))
        .find(|&(x, y)| {
            hallway(x, y) && hallway(x + 1, y) && hallway(x, y + 1) && hallway(x + 1, y + 1)
        })
}

/// First cell of an 8-connected Wall component that touches no border
pub fn find_enclosed_wall(grid: &Grid) -> Option<(usize, usize)> {
    label_components(grid, Cell::Wall, Connectivity::Eight)
        .components()
        .iter()
        .find(|component| !component.touches_border)
        .map(|component| component.origin)
}
