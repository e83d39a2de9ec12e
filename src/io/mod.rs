//! Input/output collaborators around the maze core
//!
//! This module contains:
//! - Error types and configuration defaults
//! - Tensor persistence, PNG rendering and sample evaluation
//! - Progress display and the command-line interface

/// Command-line interface and action runner
pub mod cli;
/// Constants and runtime configuration defaults
pub mod configuration;
/// Error types and helpers
pub mod error;
/// Re-certification of persisted samples
pub mod evaluation;
/// Grayscale PNG rendering
pub mod image;
/// Terminal progress display
pub mod progress;
/// Corpus tensor persistence
pub mod tensor;
