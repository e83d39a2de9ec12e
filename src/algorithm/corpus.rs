//! Assembly of a quota of pairwise-distinct mazes
//!
//! Independent draws over a finite configuration space collide now and then,
//! so a build keeps generating replacement batches for the deficit until the
//! quota is met. Deduplication is keyed by each grid's packed bits and runs
//! sequentially after every batch; the batch itself may be grown in parallel.

use std::collections::HashSet;

use bitvec::prelude::*;
use ndarray::Array3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::algorithm::generator::MazeGenerator;
use crate::io::configuration::{
    ATTEMPT_BUDGET_FACTOR, MAX_MAZE_COUNT, MIN_ATTEMPT_BUDGET, PROGRESS_LOG_INTERVAL,
};
use crate::io::error::{MazeError, Result};
use crate::spatial::grid::{Cell, Grid};

/// Runtime options for corpus builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Cap on generated candidates; `None` derives one from the requested count
    pub max_attempts: Option<usize>,
    /// Grow each batch on the rayon thread pool
    pub parallel: bool,
    /// Re-validate every candidate and abort on failure
    pub verify_candidates: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            parallel: true,
            verify_candidates: true,
        }
    }
}

impl CorpusConfig {
    /// Total candidates a build of `requested` mazes may generate
    pub fn attempt_budget(&self, requested: usize) -> usize {
        self.max_attempts.unwrap_or_else(|| {
            requested
                .saturating_mul(ATTEMPT_BUDGET_FACTOR)
                .max(MIN_ATTEMPT_BUDGET)
        })
    }
}

/// Counters describing how a corpus was built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Candidates generated
    pub attempts: usize,
    /// Candidates rejected as duplicates
    pub duplicates: usize,
    /// Generation rounds, including the initial one
    pub rounds: usize,
}

/// Snapshot reported to progress observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildProgress {
    /// Mazes requested
    pub requested: usize,
    /// Distinct mazes accepted so far
    pub accepted: usize,
    /// Candidates generated so far
    pub attempts: usize,
    /// Duplicates rejected so far
    pub duplicates: usize,
}

/// Ordered collection of distinct, valid mazes sharing one size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    width: usize,
    height: usize,
    mazes: Vec<Grid>,
    stats: BuildStats,
}

impl Corpus {
    /// Maze width in cells
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Maze height in cells
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of mazes
    pub const fn len(&self) -> usize {
        self.mazes.len()
    }

    /// Whether the corpus holds no mazes
    pub const fn is_empty(&self) -> bool {
        self.mazes.is_empty()
    }

    /// Maze at `index` in acceptance order
    pub fn get(&self, index: usize) -> Option<&Grid> {
        self.mazes.get(index)
    }

    /// Iterate mazes in acceptance order
    pub fn iter(&self) -> std::slice::Iter<'_, Grid> {
        self.mazes.iter()
    }

    /// All mazes in acceptance order
    pub fn as_slice(&self) -> &[Grid] {
        &self.mazes
    }

    /// How the corpus was built
    pub const fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Take ownership of the mazes
    pub fn into_mazes(self) -> Vec<Grid> {
        self.mazes
    }

    /// Dense `(n, height, width)` array of 0/1 values
    pub fn to_array(&self) -> Array3<u8> {
        Array3::from_shape_fn((self.len(), self.height, self.width), |(i, y, x)| {
            self.mazes
                .get(i)
                .and_then(|maze| maze.cell(x, y))
                .map_or(0, Cell::as_u8)
        })
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Grid;
    type IntoIter = std::slice::Iter<'a, Grid>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Number of distinct mazes the generator can produce, where known
///
/// A one-cell-wide strip always fills completely, and a 2x2 grid always ends
/// as one of four L shapes. Larger sizes return `None`.
pub const fn distinct_maze_upper_bound(width: usize, height: usize) -> Option<usize> {
    match (width, height) {
        (1, _) | (_, 1) => Some(1),
        (2, 2) => Some(4),
        _ => None,
    }
}

/// Builds corpora from a seeded random source
///
/// One child seed is drawn per candidate from the builder's own generator
/// before a batch is grown, so a given seed yields the same corpus whether the
/// batch runs in parallel or not.
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    rng: StdRng,
    config: CorpusConfig,
}

impl CorpusBuilder {
    /// Create a deterministic builder
    pub fn new(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a builder drawing from an existing random source
    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            config: CorpusConfig::default(),
        }
    }

    /// Replace the build options
    #[must_use]
    pub fn with_config(mut self, config: CorpusConfig) -> Self {
        self.config = config;
        self
    }

    /// Current build options
    pub const fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Build exactly `requested` distinct `width x height` mazes
    ///
    /// # Errors
    ///
    /// See [`CorpusBuilder::build_with_progress`]
    pub fn build(&mut self, requested: usize, width: usize, height: usize) -> Result<Corpus> {
        self.build_with_progress(requested, width, height, |_| {})
    }

    /// Build exactly `requested` distinct mazes, reporting progress
    ///
    /// `on_progress` is called every `PROGRESS_LOG_INTERVAL` candidates and at
    /// the end of each round.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `InvalidDimensions` if the count or a dimension is zero, before any work
    /// - `CorpusUnreachable` if the quota exceeds the known number of distinct
    ///   mazes or the attempt budget runs out
    /// - `GenerationInvariantViolation` if a candidate fails validation
    pub fn build_with_progress<F>(
        &mut self,
        requested: usize,
        width: usize,
        height: usize,
        mut on_progress: F,
    ) -> Result<Corpus>
    where
        F: FnMut(BuildProgress),
    {
        if requested == 0 {
            return Err(MazeError::InvalidDimensions {
                parameter: "count",
                value: requested,
            });
        }
        let generator = MazeGenerator::new(width, height)?;

        if let Some(bound) = distinct_maze_upper_bound(width, height)
            && requested > bound
        {
            return Err(MazeError::CorpusUnreachable {
                requested,
                distinct: bound,
                attempts: 0,
            });
        }

        let budget = self.config.attempt_budget(requested);
        let capacity = requested.min(MAX_MAZE_COUNT);
        let mut seen: HashSet<BitVec> = HashSet::with_capacity(capacity);
        let mut mazes = Vec::with_capacity(capacity);
        let mut stats = BuildStats::default();

        while mazes.len() < requested {
            let deficit = requested - mazes.len();
            let remaining = budget.saturating_sub(stats.attempts);
            if remaining == 0 {
                return Err(MazeError::CorpusUnreachable {
                    requested,
                    distinct: mazes.len(),
                    attempts: stats.attempts,
                });
            }

            stats.rounds += 1;
            if stats.rounds > 1 {
                debug!(
                    round = stats.rounds,
                    deficit, "Duplicates collapsed, generating replacements"
                );
            }

            let candidates = self.grow_batch(&generator, deficit.min(remaining), stats.attempts)?;
            for candidate in candidates {
                stats.attempts += 1;
                if seen.insert(candidate.to_bits()) {
                    mazes.push(candidate);
                } else {
                    stats.duplicates += 1;
                }

                if stats.attempts % PROGRESS_LOG_INTERVAL == 0 {
                    info!(
                        "Generated {} mazes ({}/{requested} distinct)",
                        stats.attempts,
                        mazes.len()
                    );
                    on_progress(snapshot(requested, mazes.len(), stats));
                }
            }

            on_progress(snapshot(requested, mazes.len(), stats));
        }

        info!(
            attempts = stats.attempts,
            duplicates = stats.duplicates,
            rounds = stats.rounds,
            "Corpus contains {requested} unique {width}x{height} mazes"
        );

        Ok(Corpus {
            width,
            height,
            mazes,
            stats,
        })
    }

    fn grow_batch(
        &mut self,
        generator: &MazeGenerator,
        batch: usize,
        first_candidate: usize,
    ) -> Result<Vec<Grid>> {
        let seeds: Vec<u64> = (0..batch).map(|_| self.rng.random()).collect();
        let verify = self.config.verify_candidates;

        let grow = |(offset, seed): (usize, u64)| -> Result<Grid> {
            let mut rng = StdRng::seed_from_u64(seed);
            if verify {
                generator.generate_checked(&mut rng, first_candidate + offset)
            } else {
                generator.generate(&mut rng)
            }
        };

        if self.config.parallel {
            seeds.into_par_iter().enumerate().map(grow).collect()
        } else {
            seeds.into_iter().enumerate().map(grow).collect()
        }
    }
}

const fn snapshot(requested: usize, accepted: usize, stats: BuildStats) -> BuildProgress {
    BuildProgress {
        requested,
        accepted,
        attempts: stats.attempts,
        duplicates: stats.duplicates,
    }
}

/// Build `requested` distinct mazes from an entropy-seeded source
///
/// # Errors
///
/// See [`CorpusBuilder::build_with_progress`]
pub fn build_corpus(requested: usize, width: usize, height: usize) -> Result<Corpus> {
    build_corpus_seeded(requested, width, height, rand::random())
}

/// Build `requested` distinct mazes reproducibly from `seed`
///
/// # Errors
///
/// See [`CorpusBuilder::build_with_progress`]
pub fn build_corpus_seeded(
    requested: usize,
    width: usize,
    height: usize,
    seed: u64,
) -> Result<Corpus> {
    CorpusBuilder::new(seed).build(requested, width, height)
}
