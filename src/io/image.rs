//! Grayscale PNG rendering of single mazes and sample sheets

use image::{GrayImage, Luma};
use std::path::Path;

use crate::io::configuration::{SAMPLE_GUTTER_PIXELS, SAMPLE_GUTTER_SHADE};
use crate::io::error::{MazeError, Result, file_system, invalid_parameter};
use crate::spatial::grid::Grid;

const HALLWAY_SHADE: u8 = 255;
const WALL_SHADE: u8 = 0;

/// Render one maze with each cell as a `cell_pixels` square
///
/// Hallway cells are white and Wall cells black.
///
/// # Errors
///
/// Returns an error if `cell_pixels` is zero or the image would exceed `u32` pixels per side
pub fn render_maze(grid: &Grid, cell_pixels: u32) -> Result<GrayImage> {
    check_cell_pixels(cell_pixels)?;
    let width = pixel_extent(grid.width(), cell_pixels)?;
    let height = pixel_extent(grid.height(), cell_pixels)?;
    let mut img = GrayImage::new(width, height);
    paint_maze(&mut img, grid, 0, 0, cell_pixels);
    Ok(img)
}

/// Tile the first `side * side` mazes into one sheet separated by a gray gutter
///
/// Fewer mazes than slots leave the trailing slots gutter-colored. Mazes of
/// differing sizes are placed on a lattice sized for the largest one.
///
/// # Errors
///
/// Returns an error if there are no mazes, if `side` or `cell_pixels` is zero,
/// or if the sheet would exceed `u32` pixels per side
pub fn render_sample_sheet(mazes: &[Grid], side: usize, cell_pixels: u32) -> Result<GrayImage> {
    check_cell_pixels(cell_pixels)?;
    if side == 0 {
        return Err(invalid_parameter("side", &side, &"must be positive"));
    }
    if mazes.is_empty() {
        return Err(invalid_parameter(
            "mazes",
            &0,
            &"a sample sheet needs at least one maze",
        ));
    }

    let sample = mazes
        .get(..mazes.len().min(side.saturating_mul(side)))
        .unwrap_or(mazes);
    let max_width = sample.iter().map(Grid::width).max().unwrap_or(0);
    let max_height = sample.iter().map(Grid::height).max().unwrap_or(0);
    let slot_width = slot_extent(max_width, cell_pixels)?;
    let slot_height = slot_extent(max_height, cell_pixels)?;

    let too_large = || invalid_parameter("side", &side, &"sample sheet is too large");
    let sheet_side = u32::try_from(side).map_err(|e| invalid_parameter("side", &side, &e))?;
    let sheet_extent = |slot: u32| {
        sheet_side
            .checked_mul(slot)
            .and_then(|pixels| pixels.checked_add(SAMPLE_GUTTER_PIXELS))
            .ok_or_else(too_large)
    };

    let mut img = GrayImage::from_pixel(
        sheet_extent(slot_width)?,
        sheet_extent(slot_height)?,
        Luma([SAMPLE_GUTTER_SHADE]),
    );

    for (index, maze) in sample.iter().enumerate() {
        // Both fit: each is below `side`, which fits in u32
        let (Ok(column), Ok(row)) = (u32::try_from(index % side), u32::try_from(index / side))
        else {
            continue;
        };
        let left = column * slot_width + SAMPLE_GUTTER_PIXELS;
        let top = row * slot_height + SAMPLE_GUTTER_PIXELS;
        paint_maze(&mut img, maze, left, top, cell_pixels);
    }

    Ok(img)
}

/// Save one rendered maze as a PNG
///
/// # Errors
///
/// Returns an error if rendering fails, the parent directory cannot be
/// created, or the image cannot be saved
pub fn export_maze_png(grid: &Grid, path: impl AsRef<Path>, cell_pixels: u32) -> Result<()> {
    save_png(&render_maze(grid, cell_pixels)?, path.as_ref())
}

/// Save a sample sheet of the first `side * side` mazes as a PNG
///
/// # Errors
///
/// Returns an error if rendering fails, the parent directory cannot be
/// created, or the image cannot be saved
pub fn export_sample_sheet(
    mazes: &[Grid],
    path: impl AsRef<Path>,
    side: usize,
    cell_pixels: u32,
) -> Result<()> {
    save_png(&render_sample_sheet(mazes, side, cell_pixels)?, path.as_ref())
}

fn paint_maze(img: &mut GrayImage, grid: &Grid, left: u32, top: u32, cell_pixels: u32) {
    for ((x, y), cell) in grid.indexed_cells() {
        let shade = if cell.is_hallway() {
            HALLWAY_SHADE
        } else {
            WALL_SHADE
        };
        let origin_x = left + x as u32 * cell_pixels;
        let origin_y = top + y as u32 * cell_pixels;
        for dy in 0..cell_pixels {
            for dx in 0..cell_pixels {
                if let Some(pixel) = img.get_pixel_mut_checked(origin_x + dx, origin_y + dy) {
                    *pixel = Luma([shade]);
                }
            }
        }
    }
}

/// Pixels spanned by `cells` cells of `cell_pixels` each
fn pixel_extent(cells: usize, cell_pixels: u32) -> Result<u32> {
    u32::try_from(cells)
        .ok()
        .and_then(|cells| cells.checked_mul(cell_pixels))
        .ok_or_else(|| {
            invalid_parameter(
                "cell_pixels",
                &cell_pixels,
                &format!("{cells} cells do not fit in one image side"),
            )
        })
}

fn slot_extent(cells: usize, cell_pixels: u32) -> Result<u32> {
    pixel_extent(cells, cell_pixels)?
        .checked_add(SAMPLE_GUTTER_PIXELS)
        .ok_or_else(|| invalid_parameter("cell_pixels", &cell_pixels, &"sample slot is too large"))
}

fn check_cell_pixels(cell_pixels: u32) -> Result<()> {
    if cell_pixels == 0 {
        Err(invalid_parameter("cell_pixels", &cell_pixels, &"must be positive"))
    } else {
        Ok(())
    }
}

fn save_png(img: &GrayImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(file_system(parent, "create directory"))?;
    }

    img.save(path).map_err(|e| MazeError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}
