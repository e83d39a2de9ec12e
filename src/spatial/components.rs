//! Connected-component labeling over maze grids
//!
//! Flood fill with an explicit stack, so large grids never recurse. Labels
//! start at 1; 0 marks cells that are not part of any labeled component.

use ndarray::Array2;

use crate::spatial::grid::{Cell, Grid};

/// Neighbor relation used while labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Up, down, left and right
    Four,
    /// Four plus the diagonals
    Eight,
}

/// Summary of one labeled component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Label assigned to the component (1-based)
    pub label: u32,
    /// First cell of the component in row-major order
    pub origin: (usize, usize),
    /// Number of cells in the component
    pub size: usize,
    /// Whether any cell lies on the outer ring of the grid
    pub touches_border: bool,
}

/// Result of labeling every component of one cell state
#[derive(Debug, Clone)]
pub struct ComponentLabels {
    labels: Array2<u32>,
    components: Vec<Component>,
}

impl ComponentLabels {
    /// Number of components found
    pub fn count(&self) -> usize {
        self.components.len()
    }

    /// Per-component summaries ordered by label
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Label of `(x, y)`; `Some(0)` for cells of the other state
    pub fn label(&self, x: usize, y: usize) -> Option<u32> {
        self.labels.get([y, x]).copied()
    }
}

/// Label every maximal group of `target` cells under `connectivity`
pub fn label_components(grid: &Grid, target: Cell, connectivity: Connectivity) -> ComponentLabels {
    let mut labels = Array2::<u32>::zeros((grid.height(), grid.width()));
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for ((x, y), cell) in grid.indexed_cells() {
        if cell != target || labels.get([y, x]).is_some_and(|&label| label != 0) {
            continue;
        }

        let label = components.len() as u32 + 1;
        let mut component = Component {
            label,
            origin: (x, y),
            size: 0,
            touches_border: false,
        };

        if let Some(slot) = labels.get_mut([y, x]) {
            *slot = label;
        }
        stack.push((x, y));

        while let Some((cx, cy)) = stack.pop() {
            component.size += 1;
            component.touches_border |= grid.is_border(cx, cy);

            let neighbors: Vec<(usize, usize)> = match connectivity {
                Connectivity::Four => grid.neighbors4(cx, cy).collect(),
                Connectivity::Eight => grid.neighbors8(cx, cy).collect(),
            };

            for (nx, ny) in neighbors {
                if grid.cell(nx, ny) != Some(target) {
                    continue;
                }
                if let Some(slot) = labels.get_mut([ny, nx])
                    && *slot == 0
                {
                    *slot = label;
                    stack.push((nx, ny));
                }
            }
        }

        components.push(component);
    }

    ComponentLabels { labels, components }
}
