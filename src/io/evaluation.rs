//! Re-certification of persisted maze samples
//!
//! Samples may come from this crate's generator or from any other producer;
//! each maze is scored with the same validator either way.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::algorithm::validator::validate;
use crate::io::configuration::TENSOR_EXTENSION;
use crate::io::error::{Result, file_system, invalid_parameter};
use crate::io::tensor::load_mazes;
use crate::spatial::grid::Grid;

/// Validity count for one tensor file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationReport {
    /// File the mazes were loaded from
    pub path: PathBuf,
    /// Mazes that passed validation
    pub valid: usize,
    /// Mazes in the file
    pub total: usize,
}

impl EvaluationReport {
    /// Fraction of valid mazes, 0 for an empty file
    pub fn valid_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid as f64 / self.total as f64
        }
    }
}

/// Aggregated validity over a consecutive group of files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Position of the chunk in file order
    pub index: usize,
    /// Files in the chunk
    pub files: usize,
    /// Valid mazes across the chunk
    pub valid: usize,
    /// Mazes across the chunk
    pub total: usize,
}

/// Count the valid mazes in a slice
pub fn count_valid(mazes: &[Grid]) -> usize {
    mazes
        .iter()
        .enumerate()
        .filter(|(index, maze)| match validate(maze) {
            Ok(()) => true,
            Err(failure) => {
                debug!(index, %failure, "Maze failed validation");
                false
            }
        })
        .count()
}

/// Load one tensor file and count its valid mazes
///
/// # Errors
///
/// Returns an error if the file cannot be loaded
pub fn evaluate_file(path: impl AsRef<Path>) -> Result<EvaluationReport> {
    let path = path.as_ref();
    let mazes = load_mazes(path)?;
    let valid = count_valid(&mazes);
    if valid < mazes.len() {
        warn!(
            "{}: {} of {} mazes failed validation",
            path.display(),
            mazes.len() - valid,
            mazes.len()
        );
    }

    Ok(EvaluationReport {
        path: path.to_path_buf(),
        valid,
        total: mazes.len(),
    })
}

/// Evaluate every file in order
///
/// # Errors
///
/// Returns the first load error encountered
pub fn evaluate_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<EvaluationReport>> {
    paths.iter().map(evaluate_file).collect()
}

/// Aggregate reports over consecutive groups of `chunk_size` files
///
/// # Errors
///
/// Returns an error if `chunk_size` is zero
pub fn summarize_chunks(
    reports: &[EvaluationReport],
    chunk_size: usize,
) -> Result<Vec<ChunkSummary>> {
    if chunk_size == 0 {
        return Err(invalid_parameter("chunk", &chunk_size, &"must be positive"));
    }

    Ok(reports
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| ChunkSummary {
            index,
            files: chunk.len(),
            valid: chunk.iter().map(|report| report.valid).sum(),
            total: chunk.iter().map(|report| report.total).sum(),
        })
        .collect())
}

/// Resolve a target into tensor files
///
/// A file is returned as-is; a directory yields its tensor files sorted by name.
///
/// # Errors
///
/// Returns an error if the target does not exist or the directory cannot be read
pub fn collect_tensor_files(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        return Err(invalid_parameter(
            "target",
            &target.display(),
            &"must be a tensor file or a directory",
        ));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(target).map_err(file_system(target, "read directory"))? {
        let path = entry.map_err(file_system(target, "read directory"))?.path();
        if path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(TENSOR_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
