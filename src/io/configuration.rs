//! Generation constants and runtime configuration defaults

// Corpus build settings
/// Generated candidates between progress log lines
pub const PROGRESS_LOG_INTERVAL: usize = 100;
/// Default attempt budget as a multiple of the requested maze count
pub const ATTEMPT_BUDGET_FACTOR: usize = 10;
/// Lower bound on the derived attempt budget
pub const MIN_ATTEMPT_BUDGET: usize = 1_000;

// Safety limits to prevent excessive memory allocation
/// Maximum allowed maze dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;
/// Maximum number of mazes in one corpus
pub const MAX_MAZE_COUNT: usize = 10_000_000;
/// Maximum mazes per side of a sample sheet
pub const MAX_SAMPLE_GRID_SIDE: usize = 100;
/// Maximum pixels per maze cell in rendered images
pub const MAX_CELL_PIXELS: u32 = 256;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Default number of mazes to generate
pub const DEFAULT_MAZE_COUNT: usize = 60_000;
/// Default side length of a square maze
pub const DEFAULT_MAZE_SIZE: usize = 8;
/// Default directory for persisted corpora
pub const DEFAULT_DATA_DIR: &str = "data/mazes";
/// Default directory for rendered samples
pub const DEFAULT_SAMPLE_DIR: &str = "samples";

// Persistence settings
/// Name of the corpus tensor inside a tensor file
pub const TENSOR_NAME: &str = "mazes";
/// File extension of persisted corpora
pub const TENSOR_EXTENSION: &str = "safetensors";
/// Format tag written to the tensor file metadata
pub const TENSOR_FORMAT_TAG: &str = "mazecorpus";
/// Real-valued samples above this value count as Hallway
pub const BINARIZE_THRESHOLD: f32 = 0.5;

// Rendering settings
/// Mazes per side of a sample sheet
pub const SAMPLE_GRID_SIDE: usize = 5;
/// Pixels per maze cell in rendered images
pub const SAMPLE_CELL_PIXELS: u32 = 8;
/// Pixels between mazes on a sample sheet
pub const SAMPLE_GUTTER_PIXELS: u32 = 2;
/// Gray level of the sample sheet gutter
pub const SAMPLE_GUTTER_SHADE: u8 = 128;
/// File name of the rendered sample sheet
pub const SAMPLE_FILE_NAME: &str = "first_sample.png";

// Evaluation settings
/// Number of files aggregated per evaluation chunk
pub const EVALUATION_CHUNK_SIZE: usize = 100;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// File name of a corpus of `count` mazes of `width x height`
pub fn corpus_file_name(count: usize, width: usize, height: usize) -> String {
    format!("{count}.{width}x{height}.{TENSOR_EXTENSION}")
}
