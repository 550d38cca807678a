//! Board tests - grid, collision, row clearing and garbage rows

use blockfall::core::pieces::get_shape;
use blockfall::core::{Board, BuildError};
use blockfall::types::{PieceKind, DEFAULT_COLS, DEFAULT_ROWS};

const W: i32 = DEFAULT_COLS as i32;
const H: i32 = DEFAULT_ROWS as i32;

fn fill_row(board: &mut Board, y: i32, kind: PieceKind) {
    for x in 0..board.cols() as i32 {
        board.set(x, y, Some(kind));
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::default();
    assert_eq!(board.cols(), DEFAULT_COLS);
    assert_eq!(board.rows(), DEFAULT_ROWS);

    // All cells should be empty
    for y in 0..H {
        for x in 0..W {
            assert!(board.is_valid(x, y), "Cell ({}, {}) should be valid", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_custom_dimensions() {
    let board = Board::new(8, 6).unwrap();
    assert_eq!(board.rows(), 8);
    assert_eq!(board.cols(), 6);
    assert_eq!(board.matrix().len(), 8);
    assert!(board.matrix().iter().all(|row| row.len() == 6));

    assert_eq!(
        Board::new(20, 3),
        Err(BuildError::InvalidDimensions { rows: 20, cols: 3 })
    );
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::default();

    // Negative coordinates
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);

    // Beyond bounds
    assert_eq!(board.get(W, 0), None);
    assert_eq!(board.get(0, H), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::default();

    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));

    assert!(board.set(0, 0, Some(PieceKind::I)));
    assert_eq!(board.get(0, 0), Some(Some(PieceKind::I)));

    // Clear a cell
    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));

    // Out of bounds writes are refused
    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, H, Some(PieceKind::T)));
}

#[test]
fn test_board_is_valid_and_occupied() {
    let mut board = Board::default();

    assert!(board.is_valid(5, 10));
    assert!(!board.is_occupied(5, 10));

    board.set(5, 10, Some(PieceKind::T));
    assert!(!board.is_valid(5, 10));
    assert!(board.is_occupied(5, 10));

    // Out of bounds is neither valid nor occupied
    assert!(!board.is_valid(-1, 0));
    assert!(!board.is_valid(W, 0));
    assert!(!board.is_occupied(-1, 0));
    assert!(board.is_out_of_bounds(0, -1));
}

#[test]
fn test_board_lock_piece_success() {
    let mut board = Board::default();
    let shape = get_shape(PieceKind::O, 0);

    assert!(board.lock_piece(&shape, 3, 5, PieceKind::O));

    assert_eq!(board.get(4, 5), Some(Some(PieceKind::O)));
    assert_eq!(board.get(5, 5), Some(Some(PieceKind::O)));
    assert_eq!(board.get(4, 6), Some(Some(PieceKind::O)));
    assert_eq!(board.get(5, 6), Some(Some(PieceKind::O)));
    assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 4);
}

#[test]
fn test_board_lock_piece_collision() {
    let mut board = Board::default();
    board.set(5, 5, Some(PieceKind::T));

    let shape = get_shape(PieceKind::O, 0);
    assert!(!board.lock_piece(&shape, 3, 5, PieceKind::O));

    // Cells should not be modified
    assert_eq!(board.get(4, 5), Some(None));
    assert_eq!(board.get(5, 5), Some(Some(PieceKind::T)));
}

#[test]
fn test_board_lock_piece_out_of_bounds() {
    let mut board = Board::default();
    let shape = get_shape(PieceKind::I, 0);

    // Horizontal I reaches x + 3
    assert!(!board.lock_piece(&shape, W - 3, 5, PieceKind::I));
    assert!(board.lock_piece(&shape, W - 4, 5, PieceKind::I));
}

#[test]
fn test_board_is_row_full() {
    let mut board = Board::default();
    assert!(!board.is_row_full(5));

    fill_row(&mut board, 5, PieceKind::T);
    assert!(board.is_row_full(5));

    // Leave one cell empty in row 6
    for x in 0..W - 1 {
        board.set(x, 6, Some(PieceKind::I));
    }
    assert!(!board.is_row_full(6));
    assert!(!board.is_row_full(DEFAULT_ROWS));
}

#[test]
fn test_board_clear_full_rows_nothing_to_clear() {
    let mut board = Board::default();
    board.set(0, 19, Some(PieceKind::T));
    let before = board.matrix();

    let result = board.clear_full_rows();
    assert_eq!(result.lines_removed(), 0);
    assert!(result.rows().is_empty());
    assert_eq!(result.score_bonus(), 0);
    assert_eq!(result.matrix(), before);
}

#[test]
fn test_board_clear_full_rows() {
    let mut board = Board::default();

    // Fill rows 18 and 19 (bottom two)
    fill_row(&mut board, 18, PieceKind::I);
    fill_row(&mut board, 19, PieceKind::O);

    // Put something at row 17
    board.set(0, 17, Some(PieceKind::T));

    let result = board.clear_full_rows();
    assert_eq!(result.lines_removed(), 2);
    assert_eq!(result.rows(), vec![19, 18]);
    assert_eq!(result.score_bonus(), 200);

    // The T dropped by 2 rows
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.get(0, 17), Some(None));
    assert_eq!(result.matrix(), board.matrix());
}

#[test]
fn test_board_clear_multiple_rows_order() {
    let mut board = Board::default();

    // Fill rows 5, 10, and 15
    fill_row(&mut board, 5, PieceKind::T);
    fill_row(&mut board, 10, PieceKind::I);
    fill_row(&mut board, 15, PieceKind::O);

    // Marker pieces above each
    board.set(0, 4, Some(PieceKind::J));
    board.set(0, 9, Some(PieceKind::L));
    board.set(0, 14, Some(PieceKind::S));

    let result = board.clear_full_rows();
    assert_eq!(result.lines_removed(), 3);
    assert_eq!(result.score_bonus(), 450);

    // Every surviving row drops by the number of full rows beneath it
    assert_eq!(board.get(0, 7), Some(Some(PieceKind::J)));
    assert_eq!(board.get(0, 11), Some(Some(PieceKind::L)));
    assert_eq!(board.get(0, 15), Some(Some(PieceKind::S)));

    // Top three rows are fresh and empty
    for y in 0..3 {
        for x in 0..W {
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_clear_full_board() {
    let mut board = Board::new(4, 4).unwrap();
    for y in 0..4 {
        fill_row(&mut board, y, PieceKind::Z);
    }

    let result = board.clear_full_rows();
    assert_eq!(result.lines_removed(), 4);
    assert_eq!(result.score_bonus(), 800);
    assert!(board.cells().iter().all(|c| c.is_none()));
}

#[test]
fn test_board_garbage_row() {
    let mut board = Board::default();
    board.set(2, 19, Some(PieceKind::T));

    assert!(board.inject_garbage_row(7, PieceKind::L));

    // Existing blocks moved up by one
    assert_eq!(board.get(2, 18), Some(Some(PieceKind::T)));

    // Bottom row is full except the hole
    for x in 0..W {
        let expected = if x == 7 { None } else { Some(PieceKind::L) };
        assert_eq!(board.get(x, 19), Some(expected));
    }
    assert!(!board.is_row_full(19));
    assert_eq!(board.rows(), DEFAULT_ROWS);
}

#[test]
fn test_board_garbage_row_overflow() {
    let mut board = Board::default();
    board.set(0, 0, Some(PieceKind::I));
    assert!(!board.inject_garbage_row(0, PieceKind::L));
    assert_eq!(board.get(0, 19), Some(None));
}

#[test]
fn test_board_clear() {
    let mut board = Board::default();
    fill_row(&mut board, 5, PieceKind::T);

    board.clear();

    assert!(board.cells().iter().all(|c| c.is_none()));
}

#[test]
fn test_board_matrix_is_a_copy() {
    let mut board = Board::default();
    board.set(3, 3, Some(PieceKind::S));

    let mut matrix = board.matrix();
    matrix[3][3] = 0;
    matrix[0][0] = 9;

    assert_eq!(board.get(3, 3), Some(Some(PieceKind::S)));
    assert_eq!(board.get(0, 0), Some(None));
    assert_eq!(board.matrix()[3][3], PieceKind::S.color_id());
}
