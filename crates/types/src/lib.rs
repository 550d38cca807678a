//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond parsing and conversion,
//! making them usable in any context (simulation, input mapping, presentation).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn anchor**: `((cols - 4) / 2, 0)`, i.e. (3, 0) on the default board
//!
//! Boards of other sizes are allowed as long as a 4x4 piece bounding box fits.
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{EventSource, GameAction, MoveEvent, PieceKind, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! // Parse from string (case-insensitive)
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//!
//! // Color ids are 1-based so that 0 can mean "empty" in exported matrices
//! assert_eq!(PieceKind::I.color_id(), 1);
//!
//! // Parse game action
//! assert_eq!(GameAction::from_str("instantDrop"), Some(GameAction::InstantDrop));
//!
//! // Tag an action with where it came from
//! let event = MoveEvent::new(GameAction::MoveDown, EventSource::User);
//! assert!(event.is_user());
//!
//! assert_eq!(DEFAULT_COLS, 10);
//! assert_eq!(DEFAULT_ROWS, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (10 columns)
pub const DEFAULT_COLS: usize = 10;

/// Default board height in cells (20 rows)
pub const DEFAULT_ROWS: usize = 20;

/// Side length of the square bounding box every piece shape lives in
pub const SHAPE_SIZE: usize = 4;

/// Largest accepted board side; keeps every coordinate well inside `i32`
pub const MAX_BOARD_SIZE: usize = 1024;

/// Default number of upcoming pieces exposed to the renderer
pub const DEFAULT_PREVIEW_COUNT: usize = 3;

/// Upper bound for the preview length (one full bag)
pub const MAX_PREVIEW_COUNT: usize = 7;

/// Default number of locked pieces between two garbage rows
pub const DEFAULT_GARBAGE_INTERVAL: u32 = 6;

/// Constant gravity interval used by the classic-speed levels (400ms per row)
pub const CLASSIC_TICK_MS: u64 = 400;

/// Points per line-clear unit: `bonus = ROW_CLEAR_UNIT * lines^2`
pub const ROW_CLEAR_UNIT: i64 = 50;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
/// - **O**: Yellow, 2x2 square
/// - **S**: Green, S-shaped
/// - **T**: Magenta, T-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in color-id order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }

    /// Renderer color id (1..=7); 0 is reserved for empty cells
    pub fn color_id(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::color_id`]
    pub fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Row-major grid of color ids (`matrix[y][x]`, 0 = empty).
///
/// This is the only board/shape representation handed to presentation code.
pub type Matrix = Vec<Vec<u8>>;

/// Where a movement request originated
///
/// Scoring distinguishes voluntary input from passive falling: only
/// user-sourced drops are rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSource {
    /// Keyboard / command input
    User,
    /// The periodic gravity scheduler
    Gravity,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::User => "user",
            EventSource::Gravity => "gravity",
        }
    }
}

/// Game actions that mutate the active piece
///
/// These verbs are shared by the controller, the command objects and the
/// key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one cell down (locks when blocked)
    MoveDown,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Advance to the next rotation state (with wall kicks)
    Rotate,
    /// Drop piece to its lowest valid position and lock it
    InstantDrop,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATE"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "movedown" => Some(GameAction::MoveDown),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "instantdrop" => Some(GameAction::InstantDrop),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveDown => "moveDown",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::InstantDrop => "instantDrop",
        }
    }
}

/// A movement notification: what happened and who asked for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveEvent {
    pub action: GameAction,
    pub source: EventSource,
}

impl MoveEvent {
    pub fn new(action: GameAction, source: EventSource) -> Self {
        Self { action, source }
    }

    pub fn is_user(&self) -> bool {
        self.source == EventSource::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_ids_round_trip_for_every_kind() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_color_id(kind.color_id()), Some(kind));
        }
        assert_eq!(PieceKind::from_color_id(0), None);
        assert_eq!(PieceKind::from_color_id(8), None);
    }

    #[test]
    fn action_names_parse_back() {
        for action in [
            GameAction::MoveDown,
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::Rotate,
            GameAction::InstantDrop,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }

    #[test]
    fn default_board_fits_a_piece() {
        assert!(DEFAULT_ROWS >= SHAPE_SIZE);
        assert!(DEFAULT_COLS >= SHAPE_SIZE);
        assert!(DEFAULT_PREVIEW_COUNT <= MAX_PREVIEW_COUNT);
    }
}
