//! Two-state maze grid with bounds-checked access and neighbor enumeration
//!
//! Cells are stored row-major in an `(height, width)` array and addressed by
//! `(x, y)` = `(column, row)`. The eligibility rule shared by growth and
//! validation lives here so both sides read the same definition.

use bitvec::prelude::*;
use ndarray::Array2;
use std::fmt;

use crate::io::error::{MazeError, Result, invalid_parameter};

/// Up, right, down, left
pub const CARDINAL_OFFSETS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Cardinal offsets followed by the four diagonals
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (-1, -1),
    (1, -1),
    (1, 1),
    (-1, 1),
];

/// State of a single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Impassable cell, persisted as 0
    #[default]
    Wall,
    /// Traversable cell, persisted as 1
    Hallway,
}

impl Cell {
    /// Numeric value used by persisted tensors
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Wall => 0,
            Self::Hallway => 1,
        }
    }

    /// Parse a persisted value, rejecting anything other than 0 or 1
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Wall),
            1 => Some(Self::Hallway),
            _ => None,
        }
    }

    /// Whether the cell is traversable
    pub const fn is_hallway(self) -> bool {
        matches!(self, Self::Hallway)
    }
}

/// Fixed-size maze grid
///
/// Equality and hashing are structural: two grids are equal only when their
/// dimensions match and every cell agrees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Create an all-Wall grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is zero, or
    /// `InvalidParameter` if the cell count overflows
    pub fn new(width: usize, height: usize) -> Result<Self> {
        cell_count(width, height)?;
        Ok(Self {
            cells: Array2::default((height, width)),
        })
    }

    /// Build a grid from row-major cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero dimension, or `InvalidParameter`
    /// if the cell count overflows or does not match `width * height`
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self> {
        let expected = cell_count(width, height)?;
        let actual = cells.len();
        let cells = Array2::from_shape_vec((height, width), cells).map_err(|_shape_error| {
            invalid_parameter(
                "cells",
                &actual,
                &format!("expected {expected} cells for a {width}x{height} grid"),
            )
        })?;
        Ok(Self { cells })
    }

    /// Build a grid from rows of 0/1 values
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty, ragged, or contain values other than 0 and 1
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut cells = Vec::with_capacity(cell_count(width, height)?);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(invalid_parameter(
                    "rows",
                    &y,
                    &format!("row has {} cells, expected {width}", row.len()),
                ));
            }
            for &value in row {
                cells.push(Cell::from_u8(value).ok_or_else(|| {
                    invalid_parameter("rows", &value, &"cells must be 0 or 1")
                })?);
            }
        }
        Self::from_cells(width, height, cells)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Cell at `(x, y)`, or `None` outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get([y, x]).copied()
    }

    /// Cell at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the coordinates fall outside the grid
    pub fn get(&self, x: usize, y: usize) -> Result<Cell> {
        self.cell(x, y).ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Overwrite the cell at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the coordinates fall outside the grid
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> Result<()> {
        let error = self.out_of_bounds(x, y);
        let slot = self.cells.get_mut([y, x]).ok_or(error)?;
        *slot = cell;
        Ok(())
    }

    /// Whether `(x, y)` lies on the outer ring
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width() || y + 1 == self.height()
    }

    /// In-bounds 4-connected neighbors of `(x, y)`, ordered up, right, down, left
    pub fn neighbors4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offset_neighbors(x, y, &CARDINAL_OFFSETS)
    }

    /// In-bounds 8-connected neighbors of `(x, y)`
    pub fn neighbors8(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offset_neighbors(x, y, &MOORE_OFFSETS)
    }

    fn offset_neighbors<'a>(
        &'a self,
        x: usize,
        y: usize,
        offsets: &'a [(isize, isize)],
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        offsets.iter().filter_map(move |&(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            (nx < self.width() && ny < self.height()).then_some((nx, ny))
        })
    }

    /// Count of Hallway cells among the 4-connected neighbors of `(x, y)`
    pub fn hallway_neighbor_count(&self, x: usize, y: usize) -> usize {
        self.neighbors4(x, y)
            .filter(|&(nx, ny)| self.cell(nx, ny).is_some_and(Cell::is_hallway))
            .count()
    }

    /// Whether `(x, y)` may join the maze
    ///
    /// A Wall cell is eligible when exactly one of its 4-neighbors is Hallway.
    /// Admitting cells only through a single existing connection is what keeps
    /// the grown hallway structure acyclic.
    pub fn is_growth_target(&self, x: usize, y: usize) -> bool {
        self.cell(x, y) == Some(Cell::Wall) && self.hallway_neighbor_count(x, y) == 1
    }

    /// Total number of Hallway cells
    pub fn hallway_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_hallway()).count()
    }

    /// Iterate `((x, y), cell)` in row-major order
    pub fn indexed_cells(&self) -> impl Iterator<Item = ((usize, usize), Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((y, x), &cell)| ((x, y), cell))
    }

    /// Row-major 0/1 values
    pub fn to_values(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.as_u8()).collect()
    }

    /// Packed row-major bits, Hallway = 1
    ///
    /// Two grids of equal dimensions are structurally equal exactly when their
    /// packed bits are equal, which makes this a compact deduplication key.
    pub fn to_bits(&self) -> BitVec {
        self.cells.iter().map(|cell| cell.is_hallway()).collect()
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> MazeError {
        MazeError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                let symbol = if cell.is_hallway() { '.' } else { '#' };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

const fn check_dimension(parameter: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        Err(MazeError::InvalidDimensions { parameter, value })
    } else {
        Ok(())
    }
}

/// Cells in a `width x height` grid, rejecting zero and unaddressable sizes
fn cell_count(width: usize, height: usize) -> Result<usize> {
    check_dimension("width", width)?;
    check_dimension("height", height)?;
    width
        .checked_mul(height)
        .filter(|&cells| isize::try_from(cells).is_ok())
        .ok_or_else(|| {
            invalid_parameter(
                "dimensions",
                &format!("{width}x{height}"),
                &"cell count overflows",
            )
        })
}
