//! Command-line interface for generating, drawing and checking maze corpora

use crate::algorithm::corpus::{CorpusBuilder, CorpusConfig};
use crate::io::configuration::{
    DEFAULT_DATA_DIR, DEFAULT_MAZE_COUNT, DEFAULT_MAZE_SIZE, DEFAULT_SAMPLE_DIR, DEFAULT_SEED,
    EVALUATION_CHUNK_SIZE, MAX_CELL_PIXELS, MAX_GRID_DIMENSION, MAX_MAZE_COUNT,
    MAX_SAMPLE_GRID_SIDE, SAMPLE_CELL_PIXELS, SAMPLE_FILE_NAME, SAMPLE_GRID_SIDE,
    corpus_file_name,
};
use crate::io::error::{MazeError, Result, invalid_parameter};
use crate::io::evaluation::{
    EvaluationReport, collect_tensor_files, evaluate_files, summarize_chunks,
};
use crate::io::image::export_sample_sheet;
use crate::io::progress::BuildProgressBar;
use crate::io::tensor::{load_mazes, save_corpus};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "mazecorpus")]
#[command(
    author,
    version,
    about = "Generate, draw and check corpora of distinct perfect mazes"
)]
/// Command-line arguments for the maze corpus tool
pub struct Cli {
    /// Action to perform
    #[command(subcommand)]
    pub action: Action,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log generation progress (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Available actions
#[derive(Subcommand)]
pub enum Action {
    /// Generate a corpus of distinct mazes and persist it
    Generate(GenerateArgs),
    /// Render a sample sheet from a persisted corpus
    Draw(DrawArgs),
    /// Count valid mazes in persisted tensor files
    Check(CheckArgs),
}

/// Corpus size and maze dimensions
#[derive(Args, Clone, Copy, Debug)]
pub struct SizeArgs {
    /// Number of mazes
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAZE_COUNT)]
    pub number: usize,

    /// Side length of a square maze
    #[arg(short, long, default_value_t = DEFAULT_MAZE_SIZE)]
    pub size: usize,

    /// Maze width in cells (overrides --size)
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Maze height in cells (overrides --size)
    #[arg(short = 'H', long)]
    pub height: Option<usize>,
}

impl SizeArgs {
    /// Resolved `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (
            self.width.unwrap_or(self.size),
            self.height.unwrap_or(self.size),
        )
    }

    /// Reject zero or oversized counts and dimensions before any work starts
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for zero values and `InvalidParameter` for
    /// values above the safety limits
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.dimensions();
        check_range("count", self.number, MAX_MAZE_COUNT)?;
        check_range("width", width, MAX_GRID_DIMENSION)?;
        check_range("height", height, MAX_GRID_DIMENSION)
    }

    /// Default corpus file name for these settings
    pub fn file_name(&self) -> String {
        let (width, height) = self.dimensions();
        corpus_file_name(self.number, width, height)
    }
}

fn check_range(parameter: &'static str, value: usize, max: usize) -> Result<()> {
    if value == 0 {
        Err(MazeError::InvalidDimensions { parameter, value })
    } else if value > max {
        Err(invalid_parameter(
            parameter,
            &value,
            &format!("must not exceed {max}"),
        ))
    } else {
        Ok(())
    }
}

/// Arguments for `generate`
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Corpus size and maze dimensions
    #[command(flatten)]
    pub size: SizeArgs,

    /// Random seed for reproducible generation
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Cap on generated candidates (defaults to a multiple of the count)
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Generate on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Directory receiving the tensor file
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    pub output_dir: PathBuf,
}

/// Arguments for `draw`
#[derive(Args, Debug)]
pub struct DrawArgs {
    /// Corpus size and maze dimensions used to locate the tensor file
    #[command(flatten)]
    pub size: SizeArgs,

    /// Tensor file to draw from (overrides the derived location)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory searched for the derived tensor file
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory receiving the sample sheet
    #[arg(short, long, default_value = DEFAULT_SAMPLE_DIR)]
    pub output_dir: PathBuf,

    /// Mazes per side of the sample sheet
    #[arg(long, default_value_t = SAMPLE_GRID_SIDE)]
    pub side: usize,

    /// Pixels per maze cell
    #[arg(long, default_value_t = SAMPLE_CELL_PIXELS)]
    pub cell_pixels: u32,
}

impl DrawArgs {
    /// Reject empty or oversized sheets before loading anything
    ///
    /// Size arguments are only checked when they name the input file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for zero values and `InvalidParameter` for
    /// values above the rendering limits
    pub fn validate(&self) -> Result<()> {
        if self.input.is_none() {
            self.size.validate()?;
        }
        check_range("side", self.side, MAX_SAMPLE_GRID_SIDE)?;
        check_range(
            "cell_pixels",
            self.cell_pixels as usize,
            MAX_CELL_PIXELS as usize,
        )
    }

    /// Tensor file the sample is drawn from
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| self.data_dir.join(self.size.file_name()))
    }
}

/// Arguments for `check`
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Tensor file or directory of tensor files
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Also report totals over consecutive groups of files
    #[arg(short, long)]
    pub chunked: bool,

    /// Files per group when reporting group totals
    #[arg(long, default_value_t = EVALUATION_CHUNK_SIZE)]
    pub chunk_size: usize,
}

/// Executes the parsed command line
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected action
    ///
    /// # Errors
    ///
    /// Returns an error if argument validation, generation, persistence,
    /// rendering or evaluation fails
    pub fn run(&self) -> Result<()> {
        match &self.cli.action {
            Action::Generate(args) => self.generate(args).map(|_| ()),
            Action::Draw(args) => Self::draw(args).map(|_| ()),
            Action::Check(args) => Self::check(args).map(|_| ()),
        }
    }

    /// Build a corpus and persist it, returning the tensor file path
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid, the build fails, or the
    /// file cannot be written
    pub fn generate(&self, args: &GenerateArgs) -> Result<PathBuf> {
        args.size.validate()?;
        let (width, height) = args.size.dimensions();
        let requested = args.size.number;
        let start_time = Instant::now();

        info!("Generating {requested} {width}x{height} mazes");

        let progress = if self.cli.should_show_progress() {
            BuildProgressBar::new(requested)
        } else {
            BuildProgressBar::hidden()
        };

        let config = CorpusConfig {
            max_attempts: args.max_attempts,
            parallel: !args.sequential,
            verify_candidates: true,
        };
        let mut builder = CorpusBuilder::new(args.seed).with_config(config);
        let result =
            builder.build_with_progress(requested, width, height, |snapshot| {
                progress.update(snapshot);
            });
        progress.finish();
        let corpus = result?;

        info!(
            elapsed_ms = start_time.elapsed().as_millis(),
            "Training data contains only unique mazes now"
        );

        let path = args.output_dir.join(args.size.file_name());
        info!("Persisting data to file {}", path.display());
        save_corpus(&path, &corpus)?;
        Ok(path)
    }

    /// Render the first mazes of a persisted corpus, returning the image path
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid, the tensor file cannot be
    /// loaded, or the sheet cannot be saved
    pub fn draw(args: &DrawArgs) -> Result<PathBuf> {
        args.validate()?;
        let input = args.input_path();
        let mazes = load_mazes(&input)?;
        let output = args.output_dir.join(SAMPLE_FILE_NAME);

        info!(
            "Drawing {} of {} mazes from {}",
            mazes.len().min(args.side.saturating_mul(args.side)),
            mazes.len(),
            input.display()
        );
        export_sample_sheet(&mazes, &output, args.side, args.cell_pixels)?;
        Ok(output)
    }

    /// Count valid mazes per file and print the results
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be resolved or a file cannot be loaded
    #[allow(clippy::print_stdout)]
    pub fn check(args: &CheckArgs) -> Result<Vec<EvaluationReport>> {
        let files = collect_tensor_files(&args.target)?;
        let reports = evaluate_files(&files)?;

        for report in &reports {
            println!(
                "{} {} / {}",
                report.path.display(),
                report.valid,
                report.total
            );
        }

        if args.chunked {
            for summary in summarize_chunks(&reports, args.chunk_size)? {
                println!("{} : {} / {}", summary.index, summary.valid, summary.total);
            }
        }

        Ok(reports)
    }
}
