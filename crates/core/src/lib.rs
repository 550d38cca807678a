//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block puzzle: the grid, the
//! piece shapes, the active piece state machine, scoring, levels and the event
//! bus that announces every state change. It has no dependency on terminals,
//! timers or threads; the engine crate drives it.
//!
//! # Module Structure
//!
//! - [`board`]: `rows x cols` grid with collision checks, row clearing and garbage rows
//! - [`pieces`]: the seven shapes, their rotation states and wall kicks
//! - [`game_state`]: active piece, spawning, locking and game over
//! - [`rng`]: deterministic LCG and the 7-bag piece queue
//! - [`scoring`]: score accumulator, drop policy and [`ScoreManager`]
//! - [`level`]: gravity speed and difficulty modifiers per level
//! - [`events`]: [`GameEvent`] and the synchronous [`EventBus`]
//! - [`view_data`] / [`clear_row`]: owned snapshots handed to presenters
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Board, GameLevel, GameState};
//!
//! let mut game = GameState::new(Board::default(), 12345);
//! assert!(game.start());
//!
//! game.try_move(1, 0);
//! game.rotate(GameLevel::Classic.rotation_limit());
//! game.drop_to_ground();
//! let clear = game.lock_active().unwrap();
//! assert_eq!(clear.lines_removed(), 0);
//! assert!(game.spawn_next());
//! ```

pub mod board;
pub mod clear_row;
pub mod error;
pub mod events;
pub mod game_state;
pub mod level;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod view_data;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clear_row::ClearRow;
pub use error::BuildError;
pub use events::{EventBus, GameEvent, GameEventListener, GameSnapshot, ListenerId};
pub use game_state::{ActivePiece, GameState};
pub use level::{DynamicSpeed, GameLevel, LevelModifiers, LevelParams, Speed};
pub use pieces::{get_shape, try_rotate};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{row_clear_bonus, Score, ScoreManager, ScorePolicy, UserDropPolicy};
pub use view_data::{PiecePose, ViewData};
