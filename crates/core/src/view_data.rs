//! Rendering snapshot of the active piece.
//!
//! A [`ViewData`] owns everything it describes. Container accessors hand out
//! fresh copies, so a presenter can scribble on what it receives without
//! touching the snapshot or the engine.

use serde::Serialize;

use crate::level::LevelModifiers;
use crate::types::{Matrix, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewData {
    kind: PieceKind,
    brick: Matrix,
    x: i32,
    y: i32,
    ghost_y: i32,
    next_bricks: Vec<Matrix>,
    rotation_index: usize,
    rotation_count: usize,
    rotations_used: u32,
    rotation_limit: Option<u32>,
    modifiers: LevelModifiers,
}

/// Piece-side inputs for [`ViewData::new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePose {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    pub ghost_y: i32,
    pub rotation_index: usize,
    pub rotation_count: usize,
    pub rotations_used: u32,
}

impl ViewData {
    pub fn new(
        pose: PiecePose,
        brick: Matrix,
        next_bricks: Vec<Matrix>,
        rotation_limit: Option<u32>,
        modifiers: LevelModifiers,
    ) -> Self {
        Self {
            kind: pose.kind,
            brick,
            x: pose.x,
            y: pose.y,
            ghost_y: pose.ghost_y,
            next_bricks,
            rotation_index: pose.rotation_index,
            rotation_count: pose.rotation_count,
            rotations_used: pose.rotations_used,
            rotation_limit,
            modifiers,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// 4x4 color-id matrix of the current rotation state
    pub fn brick_data(&self) -> Matrix {
        self.brick.clone()
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn ghost_y(&self) -> i32 {
        self.ghost_y
    }

    /// Upcoming pieces in spawn order; empty when the level hides the preview
    pub fn next_bricks(&self) -> Vec<Matrix> {
        self.next_bricks.clone()
    }

    /// The piece that spawns next, if the preview is visible
    pub fn next_brick_data(&self) -> Option<Matrix> {
        self.next_bricks.first().cloned()
    }

    pub fn rotation_index(&self) -> usize {
        self.rotation_index
    }

    pub fn rotation_count(&self) -> usize {
        self.rotation_count
    }

    pub fn rotations_used(&self) -> u32 {
        self.rotations_used
    }

    pub fn rotation_limit(&self) -> Option<u32> {
        self.rotation_limit
    }

    /// Rotations left before the limit kicks in; `None` when unlimited
    pub fn rotations_remaining(&self) -> Option<u32> {
        self.rotation_limit
            .map(|limit| limit.saturating_sub(self.rotations_used))
    }

    pub fn modifiers(&self) -> LevelModifiers {
        self.modifiers
    }
}
