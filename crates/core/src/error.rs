//! Construction errors.
//!
//! These only surface while assembling a game (board, controller, config);
//! rejected moves during play are plain `false` returns, never errors.

use std::fmt;

use crate::types::{MAX_BOARD_SIZE, MAX_PREVIEW_COUNT, SHAPE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// Board smaller than one piece bounding box or larger than the maximum
    InvalidDimensions { rows: usize, cols: usize },
    /// Matrix rows of differing widths
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// More preview pieces requested than the queue keeps
    PreviewTooLong { requested: usize },
    /// Garbage rows enabled with an interval of zero locks
    ZeroGarbageInterval,
}

impl BuildError {
    pub fn code(self) -> &'static str {
        match self {
            BuildError::InvalidDimensions { .. } => "invalid_dimensions",
            BuildError::RaggedMatrix { .. } => "ragged_matrix",
            BuildError::PreviewTooLong { .. } => "preview_too_long",
            BuildError::ZeroGarbageInterval => "zero_garbage_interval",
        }
    }

    pub fn message(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BuildError::InvalidDimensions { rows, cols } => write!(
                f,
                "board of {rows}x{cols} must be between {SHAPE_SIZE} and {MAX_BOARD_SIZE} cells on each side"
            ),
            BuildError::RaggedMatrix {
                row,
                expected,
                found,
            } => write!(f, "matrix row {row} has {found} cells, expected {expected}"),
            BuildError::PreviewTooLong { requested } => write!(
                f,
                "preview of {requested} pieces exceeds the maximum of {MAX_PREVIEW_COUNT}"
            ),
            BuildError::ZeroGarbageInterval => {
                write!(f, "garbage interval must be at least one locked piece")
            }
        }
    }
}

impl std::error::Error for BuildError {}
