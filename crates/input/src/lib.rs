//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and binds each
//! action to a command object from the engine. Nothing here knows whether the
//! commands run against a controller directly or through the game task.

pub mod bindings;
pub mod map;

pub use blockfall_types as types;

pub use bindings::{CommandBindings, ControlScheme};
pub use map::{handle_key_event, session_key, SessionKey};
