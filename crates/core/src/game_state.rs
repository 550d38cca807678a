//! Game state module - the active piece state machine
//!
//! Ties together the board, the piece shapes and the piece queue. Every
//! movement goes through the same validation: compute the candidate placement,
//! check every mino against the board, and only then commit. A rejected
//! movement leaves the state untouched.
//!
//! Per piece: `spawned -> (moved | rotated)* -> locked -> spawned | game over`.
//! Game over is terminal and is only reached from a spawn that collides (or a
//! garbage row that has no room left).

use tracing::{debug, info};

use crate::board::Board;
use crate::clear_row::ClearRow;
use crate::level::GameLevel;
use crate::pieces::{get_shape, rotation_count, shape_matrix, spawn_position, try_rotate, PieceShape};
use crate::rng::PieceQueue;
use crate::types::PieceKind;
use crate::view_data::{PiecePose, ViewData};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i32,
    pub y: i32,
    pub rotations_used: u32,
}

impl ActivePiece {
    /// Create a new piece at the given anchor, first rotation state
    pub fn new(kind: PieceKind, (x, y): (i32, i32)) -> Self {
        Self {
            kind,
            rotation: 0,
            x,
            y,
            rotations_used: 0,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    pub fn rotation_count(&self) -> usize {
        rotation_count(self.kind)
    }

    /// Absolute board coordinates of the four minos
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.fits(&self.shape(), self.x, self.y)
    }

    /// Check if the piece is grounded (resting on something)
    pub fn is_grounded(&self, board: &Board) -> bool {
        !board.fits(&self.shape(), self.x, self.y + 1)
    }
}

/// Board plus active piece and piece supply
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<ActivePiece>,
    piece_queue: PieceQueue,
    spawn_anchor: (i32, i32),
    /// Monotonic id for spawned pieces (increments only on successful spawn)
    piece_id: u32,
    /// Pieces locked since the game started
    locked_pieces: u32,
    started: bool,
    game_over: bool,
}

impl GameState {
    /// Create a new game on `board` with the given RNG seed
    pub fn new(board: Board, seed: u32) -> Self {
        let spawn_anchor = spawn_position(board.cols());
        Self {
            board,
            active: None,
            piece_queue: PieceQueue::new(seed),
            spawn_anchor,
            piece_id: 0,
            locked_pieces: 0,
            started: false,
            game_over: false,
        }
    }

    /// Start the game and spawn the first piece
    ///
    /// Returns false if the first spawn already collides.
    pub fn start(&mut self) -> bool {
        if self.started {
            return self.active.is_some();
        }
        self.started = true;
        self.spawn_next()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn locked_pieces(&self) -> u32 {
        self.locked_pieces
    }

    pub fn seed(&self) -> u32 {
        self.piece_queue.seed()
    }

    pub fn spawn_anchor(&self) -> (i32, i32) {
        self.spawn_anchor
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Kinds waiting in the queue, next first
    pub fn next_queue(&self, count: usize) -> Vec<PieceKind> {
        self.piece_queue.preview(count)
    }

    /// Place a new piece of `kind` at the spawn anchor
    ///
    /// If the spawn placement overlaps the stack the game is over and no piece
    /// is placed.
    pub fn spawn(&mut self, kind: PieceKind) -> bool {
        if self.game_over {
            return false;
        }

        let piece = ActivePiece::new(kind, self.spawn_anchor);
        if !piece.is_valid(&self.board) {
            self.end_game();
            return false;
        }

        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        debug!(kind = kind.as_str(), piece_id = self.piece_id, "spawned piece");
        true
    }

    /// Spawn the next piece from the queue
    pub fn spawn_next(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let kind = self.piece_queue.draw();
        self.spawn(kind)
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let moved = ActivePiece {
            x: active.x + dx,
            y: active.y + dy,
            ..active
        };

        if moved.is_valid(&self.board) {
            self.active = Some(moved);
            return true;
        }

        false
    }

    /// Check if piece can move in given direction
    pub fn can_move(&self, dx: i32, dy: i32) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        self.board.fits(&active.shape(), active.x + dx, active.y + dy)
    }

    /// Try to rotate the active piece with wall kicks
    ///
    /// `limit` caps the rotations a single piece may perform (`None` = unlimited).
    /// A single-state piece (O) rotates onto itself and still uses up one
    /// rotation. A rejected rotation does not count against the limit.
    pub fn rotate(&mut self, limit: Option<u32>) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        if limit.is_some_and(|limit| active.rotations_used >= limit) {
            return false;
        }

        let result = try_rotate(active.kind, active.rotation, active.x, active.y, |x, y| {
            self.board.is_valid(x, y)
        });

        if let Some((new_rotation, (dx, dy))) = result {
            self.active = Some(ActivePiece {
                rotation: new_rotation,
                x: active.x + dx,
                y: active.y + dy,
                rotations_used: active.rotations_used + 1,
                ..active
            });
            return true;
        }

        false
    }

    /// Check if the active piece is on the ground
    pub fn is_grounded(&self) -> bool {
        match self.active {
            Some(ref piece) => piece.is_grounded(&self.board),
            None => false,
        }
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i32> {
        let active = self.active?;
        let shape = active.shape();

        let mut drop_distance = 0;
        while self
            .board
            .fits(&shape, active.x, active.y + drop_distance + 1)
        {
            drop_distance += 1;
        }

        Some(active.y + drop_distance)
    }

    /// Write the active piece into the grid and clear full rows
    ///
    /// Leaves no active piece; call [`GameState::spawn_next`] afterwards (the
    /// controller injects garbage rows in between).
    pub fn lock_active(&mut self) -> Option<ClearRow> {
        let active = self.active.take()?;

        let locked = self
            .board
            .lock_piece(&active.shape(), active.x, active.y, active.kind);
        debug_assert!(locked, "active piece overlapped the stack");
        self.locked_pieces = self.locked_pieces.wrapping_add(1);
        debug!(
            kind = active.kind.as_str(),
            x = active.x,
            y = active.y,
            "locked piece"
        );

        Some(self.board.clear_full_rows())
    }

    /// Move the active piece straight down until it rests on something
    ///
    /// Returns the rows travelled, or `None` without an active piece. The piece
    /// stays active; [`GameState::lock_active`] settles it.
    pub fn drop_to_ground(&mut self) -> Option<u32> {
        self.active?;

        let mut rows = 0;
        while self.try_move(0, 1) {
            rows += 1;
        }
        Some(rows)
    }

    /// Push a garbage row in from the bottom
    ///
    /// An active piece that would overlap the raised stack is lifted by one row.
    /// Returns false (and ends the game) if there is no room.
    pub fn inject_garbage_row(&mut self, hole: usize, fill: PieceKind) -> bool {
        if self.game_over {
            return false;
        }

        if !self.board.inject_garbage_row(hole, fill) {
            self.end_game();
            return false;
        }

        if let Some(active) = self.active {
            if !active.is_valid(&self.board) && !self.try_move(0, -1) {
                self.end_game();
                return false;
            }
        }

        debug!(hole, "injected garbage row");
        true
    }

    /// Mark the game as over and drop the active piece; terminal
    pub fn end_game(&mut self) {
        self.active = None;
        if !self.game_over {
            info!(
                piece_id = self.piece_id,
                locked = self.locked_pieces,
                "game over"
            );
        }
        self.game_over = true;
    }

    /// Snapshot of the active piece for rendering
    pub fn view_data(&self, level: &GameLevel, preview_count: usize) -> Option<ViewData> {
        let active = self.active?;
        let modifiers = level.modifiers();

        let next_bricks = if modifiers.hide_next_preview {
            Vec::new()
        } else {
            self.next_queue(preview_count)
                .into_iter()
                .map(|kind| shape_matrix(kind, 0))
                .collect()
        };

        Some(ViewData::new(
            PiecePose {
                kind: active.kind,
                x: active.x,
                y: active.y,
                ghost_y: self.ghost_y().unwrap_or(active.y),
                rotation_index: active.rotation,
                rotation_count: active.rotation_count(),
                rotations_used: active.rotations_used,
            },
            shape_matrix(active.kind, active.rotation),
            next_bricks,
            level.rotation_limit(),
            modifiers,
        ))
    }

    /// Replace the active piece (tests and scripted setups)
    pub fn set_active(&mut self, piece: Option<ActivePiece>) {
        self.active = piece;
    }

    /// Mutable board access for scripted setups
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u32) -> GameState {
        let mut state = GameState::new(Board::default(), seed);
        assert!(state.start());
        state
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(Board::default(), 12345);

        assert!(!state.started());
        assert!(!state.game_over());
        assert!(state.active().is_none());
        assert_eq!(state.piece_id(), 0);
        assert_eq!(state.spawn_anchor(), (3, 0));
    }

    #[test]
    fn test_spawn_piece_follows_queue() {
        let mut state = GameState::new(Board::default(), 12345);
        let next = state.next_queue(2);
        state.start();

        assert_eq!(state.piece_id(), 1);
        assert_eq!(state.active().unwrap().kind, next[0]);

        state.drop_to_ground();
        state.lock_active();
        assert!(state.spawn_next());
        assert_eq!(state.piece_id(), 2);
        assert_eq!(state.active().unwrap().kind, next[1]);
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut state = GameState::new(Board::default(), 1);
        for x in 0..10 {
            state.board_mut().set(x, 1, Some(PieceKind::Z));
            state.board_mut().set(x, 0, Some(PieceKind::Z));
        }
        assert!(!state.start());
        assert!(state.game_over());
        assert!(state.active().is_none());
        assert!(!state.spawn(PieceKind::I));
    }

    #[test]
    fn test_try_move() {
        let mut state = started(12345);
        state.set_active(Some(ActivePiece::new(PieceKind::T, state.spawn_anchor())));
        let initial_x = state.active().unwrap().x;

        assert!(state.try_move(1, 0));
        assert_eq!(state.active().unwrap().x, initial_x + 1);

        assert!(state.try_move(-1, 0));
        assert_eq!(state.active().unwrap().x, initial_x);

        // Can't move up past the top
        let before = state.active();
        assert!(!state.try_move(0, -1));
        assert_eq!(state.active(), before);
    }

    #[test]
    fn test_try_move_collision_with_wall() {
        let mut state = started(12345);
        let mut moved = 0;
        for _ in 0..10 {
            if state.try_move(-1, 0) {
                moved += 1;
            }
        }
        // Spawn at x=3, leftmost mino offset is at least 0
        assert!(moved <= 3);
        assert!(!state.can_move(-1, 0));
    }

    #[test]
    fn test_rotate_cycles_states() {
        let mut state = started(1);
        state.set_active(Some(ActivePiece::new(PieceKind::T, (3, 5))));

        for expected in [1, 2, 3, 0] {
            assert!(state.rotate(None));
            assert_eq!(state.active().unwrap().rotation, expected);
        }
        assert_eq!(state.active().unwrap().rotations_used, 4);
    }

    #[test]
    fn test_o_piece_rotates_in_place_and_counts() {
        let mut state = started(1);
        let o = ActivePiece::new(PieceKind::O, (3, 5));
        state.set_active(Some(o));

        for used in 1..=4 {
            assert!(state.rotate(Some(4)));
            let active = state.active().unwrap();
            assert_eq!((active.rotation, active.x, active.y), (0, o.x, o.y));
            assert_eq!(active.rotations_used, used);
        }
        assert!(!state.rotate(Some(4)));
        assert_eq!(state.active().unwrap().rotations_used, 4);
    }

    #[test]
    fn test_rotation_limit() {
        let mut state = started(1);
        state.set_active(Some(ActivePiece::new(PieceKind::T, (3, 5))));

        for _ in 0..4 {
            assert!(state.rotate(Some(4)));
        }
        let before = state.active();
        assert!(!state.rotate(Some(4)));
        assert_eq!(state.active(), before);
    }

    #[test]
    fn test_rotation_kicks_off_the_wall() {
        let mut state = started(1);
        // Vertical I hugging the right wall: minos at x = 9
        state.set_active(Some(ActivePiece {
            rotation: 1,
            ..ActivePiece::new(PieceKind::I, (7, 5))
        }));
        assert!(state.active().unwrap().is_valid(state.board()));

        // Horizontal at x=7 would reach x=10; the kick shifts it left
        assert!(state.rotate(None));
        let active = state.active().unwrap();
        assert_eq!(active.rotation, 0);
        assert_eq!(active.x, 6);
        assert!(active.is_valid(state.board()));
    }

    #[test]
    fn test_blocked_rotation_keeps_counter() {
        let mut state = started(1);
        state.set_active(Some(ActivePiece {
            rotation: 1,
            ..ActivePiece::new(PieceKind::I, (3, 5))
        }));
        // Wall in every row the horizontal I could reach
        for y in 4..=9 {
            for x in 0..10 {
                if x != 5 {
                    state.board_mut().set(x, y, Some(PieceKind::O));
                }
            }
        }
        assert!(state.active().unwrap().is_valid(state.board()));

        let before = state.active();
        assert!(!state.rotate(None));
        assert_eq!(state.active(), before);
    }

    #[test]
    fn test_ghost_y_when_grounded_equals_y() {
        let mut state = started(12345);
        while state.try_move(0, 1) {}
        let active = state.active().unwrap();
        assert!(state.is_grounded());
        assert_eq!(state.ghost_y(), Some(active.y));
    }

    #[test]
    fn test_ghost_y_does_not_move_piece() {
        let state = started(12345);
        let before = state.active();
        let ghost = state.ghost_y().unwrap();
        assert!(ghost >= before.unwrap().y);
        assert_eq!(state.active(), before);
    }

    #[test]
    fn test_drop_to_ground_lands_on_ghost() {
        let mut state = started(12345);
        let ghost = state.ghost_y().unwrap();
        let start_y = state.active().unwrap().y;

        let rows = state.drop_to_ground().unwrap();
        assert_eq!(rows as i32, ghost - start_y);
        assert_eq!(state.active().unwrap().y, ghost);
        assert!(state.is_grounded());
        assert_eq!(state.drop_to_ground(), Some(0));

        let clear = state.lock_active().unwrap();
        assert_eq!(clear.lines_removed(), 0);
        assert_eq!(state.locked_pieces(), 1);
        assert!(state.active().is_none());
        assert_eq!(state.drop_to_ground(), None);
    }

    #[test]
    fn test_lock_clears_completed_line() {
        let mut state = started(1);
        // Bottom row full except the four cells a flat I fills
        for x in 4..10 {
            state.board_mut().set(x, 19, Some(PieceKind::J));
        }
        state.set_active(Some(ActivePiece::new(PieceKind::I, (0, 18))));

        let clear = state.lock_active().unwrap();
        assert_eq!(clear.lines_removed(), 1);
        assert_eq!(clear.score_bonus(), 50);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_garbage_lifts_overlapping_piece() {
        let mut state = started(1);
        state.set_active(Some(ActivePiece::new(PieceKind::O, (3, 18))));
        assert!(state.inject_garbage_row(0, PieceKind::S));
        let active = state.active().unwrap();
        assert_eq!(active.y, 17);
        assert!(active.is_valid(state.board()));
    }

    #[test]
    fn test_garbage_with_occupied_top_row_ends_game() {
        let mut state = started(1);
        state.board_mut().set(0, 0, Some(PieceKind::L));
        let before = state.board().clone();

        assert!(!state.inject_garbage_row(4, PieceKind::S));
        assert!(state.game_over());
        assert!(state.active().is_none());
        assert_eq!(state.board(), &before);
        assert!(!state.spawn_next());
    }

    #[test]
    fn test_garbage_lift_off_the_top_ends_game() {
        let mut state = started(1);
        // O in the top two rows, stack directly below its left column
        state.set_active(Some(ActivePiece::new(PieceKind::O, (3, 0))));
        state.board_mut().set(4, 2, Some(PieceKind::T));
        assert!(state.active().unwrap().is_valid(state.board()));

        // The raised stack overlaps the piece and there is no row above it
        assert!(!state.inject_garbage_row(0, PieceKind::S));
        assert!(state.game_over());
        assert!(state.active().is_none());
        assert_eq!(state.board().get(4, 1), Some(Some(PieceKind::T)));
    }

    #[test]
    fn test_view_data_hides_preview_on_level3() {
        let state = started(1);
        let classic = state.view_data(&GameLevel::Classic, 3).unwrap();
        assert_eq!(classic.next_bricks().len(), 3);

        let level3 = state.view_data(&GameLevel::Level3, 3).unwrap();
        assert!(level3.next_bricks().is_empty());
        assert!(level3.modifiers().flicker);
    }
}
