use serde::Serialize;

use crate::types::Matrix;

/// Result of one row-clear pass, produced once per lock.
///
/// Immutable once built: the board it describes has already been compacted,
/// and `matrix` is an owned copy of that post-shift grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearRow {
    lines_removed: usize,
    rows: Vec<usize>,
    matrix: Matrix,
    score_bonus: i64,
}

impl ClearRow {
    pub fn new(rows: Vec<usize>, matrix: Matrix, score_bonus: i64) -> Self {
        Self {
            lines_removed: rows.len(),
            rows,
            matrix,
            score_bonus,
        }
    }

    pub fn lines_removed(&self) -> usize {
        self.lines_removed
    }

    /// Indices of the removed rows, bottom to top, in pre-clear coordinates
    pub fn rows(&self) -> Vec<usize> {
        self.rows.clone()
    }

    /// The board after removal and shift
    pub fn matrix(&self) -> Matrix {
        self.matrix.clone()
    }

    pub fn score_bonus(&self) -> i64 {
        self.score_bonus
    }
}
