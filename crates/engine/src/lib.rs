//! Game engine - drives the core simulation
//!
//! - [`controller`]: [`GameController`], the single writer of game state, and its builder
//! - [`invoker`] / [`commands`]: the verbs front ends call, and one command object per verb
//! - [`config`]: environment configuration for the runner
//! - [`runtime`]: the tokio task that owns a controller and runs gravity

pub mod commands;
pub mod config;
pub mod controller;
pub mod invoker;
pub mod runtime;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use commands::{
    command_for, GameCommand, InstantDropCommand, MoveDownCommand, MoveLeftCommand,
    MoveRightCommand, RotateCommand,
};
pub use config::{EventFormat, GameConfig};
pub use controller::{GameController, GameControllerBuilder};
pub use invoker::GameActionInvoker;
pub use runtime::{GameHandle, GameRuntime, Request};
