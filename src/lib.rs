//! Generation and validation of perfect-maze corpora
//!
//! Mazes are grown cell by cell under a rule that keeps the hallway structure
//! acyclic, certified against three topological invariants, and collected
//! into corpora of pairwise-distinct grids that persist as `(n, height, width)`
//! tensors.

#![forbid(unsafe_code)]

/// Maze growth, validation and corpus assembly
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Maze grid and connected-component labeling
pub mod spatial;

pub use algorithm::corpus::{Corpus, CorpusBuilder, build_corpus, build_corpus_seeded};
pub use algorithm::generator::MazeGenerator;
pub use algorithm::validator::{ValidationFailure, is_valid_maze, validate};
pub use io::error::{MazeError, Result};
pub use spatial::{Cell, Grid};
