//! Board module - manages the game grid
//!
//! The board is a `rows x cols` grid where each cell can be empty or filled with a piece kind.
//! Uses a flat row-major vector (`y * cols + x`) for cache locality; the dimensions never
//! change after construction.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.

use tracing::debug;

use crate::clear_row::ClearRow;
use crate::error::BuildError;
use crate::pieces::PieceShape;
use crate::scoring::row_clear_bonus;
use crate::types::{Cell, Matrix, PieceKind, DEFAULT_COLS, DEFAULT_ROWS, MAX_BOARD_SIZE, SHAPE_SIZE};

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    ///
    /// Fails if a 4x4 piece bounding box would not fit, or if either side
    /// exceeds [`MAX_BOARD_SIZE`].
    pub fn new(rows: usize, cols: usize) -> Result<Self, BuildError> {
        let sides = SHAPE_SIZE..=MAX_BOARD_SIZE;
        if !sides.contains(&rows) || !sides.contains(&cols) {
            return Err(BuildError::InvalidDimensions { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(BuildError::InvalidDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![None; len],
        })
    }

    /// Build a board from a color-id matrix (`matrix[y][x]`, 0 = empty)
    ///
    /// Unknown color ids are treated as empty.
    pub fn from_matrix(matrix: &Matrix) -> Result<Self, BuildError> {
        let rows = matrix.len();
        let cols = matrix.first().map_or(0, Vec::len);
        if let Some((row, found)) = matrix
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(BuildError::RaggedMatrix {
                row,
                expected: cols,
                found,
            });
        }
        let mut board = Self::new(rows, cols)?;
        for (y, row) in matrix.iter().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                board.cells[y * cols + x] = PieceKind::from_color_id(id);
            }
        }
        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * self.cols + (x as usize))
    }

    /// Get width of the board
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get height of the board
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        x < 0 || x >= self.cols as i32 || y < 0 || y >= self.rows as i32
    }

    /// Check if every mino of `shape` anchored at (x, y) lands on a valid cell
    pub fn fits(&self, shape: &PieceShape, x: i32, y: i32) -> bool {
        shape
            .iter()
            .all(|&(dx, dy)| self.is_valid(x + dx, y + dy))
    }

    fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.rows {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Clear all full rows, shift everything above down, and describe the result
    ///
    /// Two-pointer compaction from the bottom up: surviving rows are copied to the
    /// write cursor, then the vacated rows at the top are emptied. Row indices in
    /// the result are bottom to top, in pre-clear coordinates.
    pub fn clear_full_rows(&mut self) -> ClearRow {
        let mut cleared_rows = Vec::new();
        let width = self.cols;
        let mut write_y = self.rows;

        // Scan from bottom to top
        for read_y in (0..self.rows).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    // copy_within handles overlapping ranges
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(None);

        let bonus = row_clear_bonus(cleared_rows.len() as i64);
        if !cleared_rows.is_empty() {
            debug!(rows = ?cleared_rows, bonus, "cleared full rows");
        }
        ClearRow::new(cleared_rows, self.matrix(), bonus)
    }

    /// Lock a piece onto the board at given position with given shape
    /// Returns true if successful, false if any cell is out of bounds or occupied
    pub fn lock_piece(&mut self, shape: &PieceShape, x: i32, y: i32, kind: PieceKind) -> bool {
        // First check if all positions are valid
        if !self.fits(shape, x, y) {
            return false;
        }

        for &(dx, dy) in shape {
            self.set(x + dx, y + dy, Some(kind));
        }

        true
    }

    /// Push every row up by one and insert a garbage row at the bottom
    ///
    /// The new row is filled with `fill` except for column `hole`. Returns false
    /// without mutating if the top row holds blocks that would be pushed off the
    /// board.
    pub fn inject_garbage_row(&mut self, hole: usize, fill: PieceKind) -> bool {
        if self.row(0).iter().any(|cell| cell.is_some()) {
            return false;
        }

        let width = self.cols;
        self.cells.copy_within(width.., 0);

        let bottom = (self.rows - 1) * width;
        let hole = hole % width;
        for (x, cell) in self.cells[bottom..].iter_mut().enumerate() {
            *cell = if x == hole { None } else { Some(fill) };
        }

        true
    }

    /// Export the grid as a fresh color-id matrix
    pub fn matrix(&self) -> Matrix {
        (0..self.rows)
            .map(|y| {
                self.row(y)
                    .iter()
                    .map(|cell| cell.map_or(0, |kind| kind.color_id()))
                    .collect()
            })
            .collect()
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cells: vec![None; DEFAULT_ROWS * DEFAULT_COLS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::default();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_board_rejects_tiny_dimensions() {
        assert_eq!(
            Board::new(3, 10),
            Err(BuildError::InvalidDimensions { rows: 3, cols: 10 })
        );
        assert!(Board::new(4, 4).is_ok());
    }

    #[test]
    fn test_board_rejects_oversized_dimensions() {
        assert!(Board::new(MAX_BOARD_SIZE, MAX_BOARD_SIZE).is_ok());
        assert_eq!(
            Board::new(MAX_BOARD_SIZE + 1, 10),
            Err(BuildError::InvalidDimensions {
                rows: MAX_BOARD_SIZE + 1,
                cols: 10
            })
        );
        assert_eq!(
            Board::new(usize::MAX / 2, 10),
            Err(BuildError::InvalidDimensions {
                rows: usize::MAX / 2,
                cols: 10
            })
        );
    }

    #[test]
    fn test_ragged_matrix_names_the_bad_row() {
        let mut matrix = vec![vec![0u8; 10]; 6];
        matrix[4].pop();
        assert_eq!(
            Board::from_matrix(&matrix),
            Err(BuildError::RaggedMatrix {
                row: 4,
                expected: 10,
                found: 9
            })
        );
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::default();

        board.set(0, 0, Some(PieceKind::I));
        board.set(5, 10, Some(PieceKind::T));

        assert_eq!(board.get(0, 0), Some(Some(PieceKind::I)));
        assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));

        assert_eq!(board.cells[0], Some(PieceKind::I));
        assert_eq!(board.cells[10 * 10 + 5], Some(PieceKind::T));
    }

    #[test]
    fn test_board_matrix_roundtrip() {
        let mut matrix = vec![vec![0u8; 6]; 8];
        matrix[5][3] = PieceKind::O.color_id();
        matrix[7][0] = PieceKind::L.color_id();

        let board = Board::from_matrix(&matrix).unwrap();
        assert_eq!(board.rows(), 8);
        assert_eq!(board.cols(), 6);
        assert_eq!(board.matrix(), matrix);
    }

    #[test]
    fn test_garbage_row_refused_when_top_is_occupied() {
        let mut board = Board::default();
        board.set(4, 0, Some(PieceKind::T));
        let before = board.clone();

        assert!(!board.inject_garbage_row(0, PieceKind::Z));
        assert_eq!(board, before);
    }
}
