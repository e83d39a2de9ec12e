//! Error types for maze generation, validation and persistence

use std::fmt;
use std::path::PathBuf;

use crate::algorithm::validator::ValidationFailure;

/// Main error type for all maze operations
#[derive(Debug)]
pub enum MazeError {
    /// A width, height or maze count was zero
    InvalidDimensions {
        /// Which dimension or count was rejected
        parameter: &'static str,
        /// The rejected value
        value: usize,
    },

    /// Grid access outside its bounds
    ///
    /// Indicates a defect in the caller rather than a recoverable condition.
    OutOfBounds {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Grid width
        width: usize,
        /// Grid height
        height: usize,
    },

    /// A generated maze failed validation
    ///
    /// The growth rule guarantees validity, so this means the generator itself
    /// is broken. It is never treated like a duplicate and retried.
    GenerationInvariantViolation {
        /// Index of the offending candidate within the build
        candidate: usize,
        /// The check that failed
        failure: ValidationFailure,
        /// Text rendering of the offending grid
        grid: String,
    },

    /// The requested number of distinct mazes could not be collected
    CorpusUnreachable {
        /// Number of mazes requested
        requested: usize,
        /// Number of distinct mazes collected (or known to exist)
        distinct: usize,
        /// Candidates generated before giving up
        attempts: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A persisted maze tensor could not be decoded
    InvalidTensorFile {
        /// Path of the tensor file
        path: PathBuf,
        /// Description of what is wrong with the file
        reason: String,
    },

    /// Failed to save a rendered maze image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { parameter, value } => {
                write!(f, "Invalid {parameter} {value}: must be positive")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(f, "Cell ({x}, {y}) is outside the {width}x{height} grid")
            }
            Self::GenerationInvariantViolation {
                candidate,
                failure,
                grid,
            } => {
                write!(
                    f,
                    "Generated an incorrect maze (candidate {candidate}): {failure}\n{grid}"
                )
            }
            Self::CorpusUnreachable {
                requested,
                distinct,
                attempts,
            } => {
                write!(
                    f,
                    "Could not collect {requested} distinct mazes: {distinct} distinct after {attempts} attempts"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTensorFile { path, reason } => {
                write!(f, "Invalid maze tensor '{}': {reason}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MazeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for maze results
pub type Result<T> = std::result::Result<T, MazeError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MazeError {
    MazeError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid tensor file error
pub fn invalid_tensor(path: impl Into<PathBuf>, reason: &impl ToString) -> MazeError {
    MazeError::InvalidTensorFile {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Wrap an I/O error with the path and operation it came from
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> MazeError {
    let path = path.into();
    move |source| MazeError::FileSystem {
        path,
        operation,
        source,
    }
}
