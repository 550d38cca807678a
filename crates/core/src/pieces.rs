//! Pieces module - tetromino shapes, rotation states and wall kicks
//!
//! Every shape is four mino offsets inside a 4x4 bounding box, `(dx, dy)` with
//! `dy` growing downwards. Pieces have as many rotation states as they have
//! distinct orientations (I, S, Z: 2; O: 1; J, L, T: 4). Rotation always
//! advances to the next state modulo that count.

use crate::types::{Matrix, PieceKind, SHAPE_SIZE};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i32, i32);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

const I_STATES: [PieceShape; 2] = [
    // horizontal, on row 1
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    // vertical, column 2
    [(2, 0), (2, 1), (2, 2), (2, 3)],
];

const O_STATES: [PieceShape; 1] = [[(1, 0), (2, 0), (1, 1), (2, 1)]];

const T_STATES: [PieceShape; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const S_STATES: [PieceShape; 2] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
];

const Z_STATES: [PieceShape; 2] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
];

const J_STATES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_STATES: [PieceShape; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

/// All rotation states of a piece kind, in rotation order
pub fn rotations(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::Z => &Z_STATES,
    }
}

/// Number of distinct rotation states
pub fn rotation_count(kind: PieceKind) -> usize {
    rotations(kind).len()
}

/// Get the shape (mino offsets) for a piece kind and rotation index
///
/// The index wraps around the kind's rotation count.
pub fn get_shape(kind: PieceKind, rotation: usize) -> PieceShape {
    let states = rotations(kind);
    states[rotation % states.len()]
}

/// Render a rotation state as a 4x4 color-id matrix (`matrix[row][col]`)
pub fn shape_matrix(kind: PieceKind, rotation: usize) -> Matrix {
    let mut matrix = vec![vec![0u8; SHAPE_SIZE]; SHAPE_SIZE];
    for (dx, dy) in get_shape(kind, rotation) {
        matrix[dy as usize][dx as usize] = kind.color_id();
    }
    matrix
}

/// Wall kick offsets tried, in order, after the in-place rotation collides
pub const KICK_OFFSETS: [(i32, i32); 5] = [(-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)];

/// Try to rotate a piece with wall kicks
///
/// Tries the next rotation state in place, then every [`KICK_OFFSETS`] entry.
/// Returns `Some((new_rotation, kick_offset))` for the first placement where
/// all minos satisfy `is_valid`, or `None` if every attempt collides.
pub fn try_rotate(
    kind: PieceKind,
    rotation: usize,
    x: i32,
    y: i32,
    is_valid: impl Fn(i32, i32) -> bool,
) -> Option<(usize, (i32, i32))> {
    let new_rotation = (rotation + 1) % rotation_count(kind);
    let new_shape = get_shape(kind, new_rotation);

    std::iter::once((0, 0))
        .chain(KICK_OFFSETS)
        .find(|&(dx, dy)| {
            new_shape
                .iter()
                .all(|&(mx, my)| is_valid(x + dx + mx, y + dy + my))
        })
        .map(|kick| (new_rotation, kick))
}

/// Spawn anchor for a board `cols` wide: horizontally centered, top row
pub fn spawn_position(cols: usize) -> (i32, i32) {
    (cols.saturating_sub(SHAPE_SIZE) as i32 / 2, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_four_distinct_minos_inside_the_box() {
        for kind in PieceKind::ALL {
            for shape in rotations(kind) {
                for (i, &(x, y)) in shape.iter().enumerate() {
                    assert!((0..SHAPE_SIZE as i32).contains(&x));
                    assert!((0..SHAPE_SIZE as i32).contains(&y));
                    assert!(!shape[i + 1..].contains(&(x, y)), "{:?} repeats a mino", kind);
                }
            }
        }
    }

    #[test]
    fn rotation_counts() {
        assert_eq!(rotation_count(PieceKind::I), 2);
        assert_eq!(rotation_count(PieceKind::O), 1);
        assert_eq!(rotation_count(PieceKind::S), 2);
        assert_eq!(rotation_count(PieceKind::Z), 2);
        assert_eq!(rotation_count(PieceKind::T), 4);
        assert_eq!(rotation_count(PieceKind::J), 4);
        assert_eq!(rotation_count(PieceKind::L), 4);
    }

    #[test]
    fn get_shape_wraps() {
        assert_eq!(get_shape(PieceKind::I, 2), get_shape(PieceKind::I, 0));
        assert_eq!(get_shape(PieceKind::T, 5), get_shape(PieceKind::T, 1));
    }

    #[test]
    fn shape_matrix_uses_color_id() {
        let m = shape_matrix(PieceKind::I, 0);
        assert_eq!(m[1], vec![1, 1, 1, 1]);
        assert_eq!(m.iter().flatten().filter(|&&c| c != 0).count(), 4);
    }

    #[test]
    fn spawn_is_centered() {
        assert_eq!(spawn_position(10), (3, 0));
        assert_eq!(spawn_position(4), (0, 0));
    }
}
