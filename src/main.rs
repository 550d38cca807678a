//! Headless terminal runner (default binary).
//!
//! Reads keys in raw mode, feeds them to the game task through the command
//! bindings, and prints every published event as a line on stdout (plain text
//! or JSON, per `BLOCKFALL_EVENT_FORMAT`). Logs go to stderr; set `RUST_LOG`
//! to see them.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use blockfall::core::GameEvent;
use blockfall::engine::{EventFormat, GameConfig, GameHandle, GameRuntime};
use blockfall::input::{
    handle_key_event, session_key, CommandBindings, ControlScheme, SessionKey,
};

fn main() -> Result<()> {
    init_tracing();

    let config = GameConfig::from_env();
    let controller = config
        .builder()
        .build()
        .context("invalid BLOCKFALL_* configuration")?;

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    terminal::enable_raw_mode()?;
    let result = rt.block_on(async move {
        let format = config.event_format;
        let mut controller = controller;
        controller.subscribe(move |event: &GameEvent| print_event(format, event));

        let (handle, game) = GameRuntime::spawn(controller);
        handle.new_game();

        let scheme = ControlScheme::from_inverted(config.inverted_controls);
        let keys = tokio::task::spawn_blocking(move || key_loop(handle, scheme));

        let key_result = keys.await.context("key loop panicked")?;
        let controller = game.await.context("game task panicked")?;
        info!(score = controller.score(), "session ended");
        key_result
    });

    // Always try to restore terminal state.
    let _ = terminal::disable_raw_mode();
    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn key_loop(handle: GameHandle, scheme: ControlScheme) -> Result<()> {
    let mut bindings = CommandBindings::new(handle.clone(), scheme);

    loop {
        if handle.is_closed() {
            return Ok(());
        }
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        match session_key(key) {
            Some(SessionKey::Quit) => {
                handle.shutdown();
                return Ok(());
            }
            Some(SessionKey::NewGame) => {
                handle.new_game();
            }
            Some(SessionKey::TogglePause) => {
                handle.toggle_pause();
            }
            None => {
                if let Some(action) = handle_key_event(key) {
                    bindings.dispatch(action);
                }
            }
        }
    }
}

fn print_event(format: EventFormat, event: &GameEvent) {
    let line = match format {
        EventFormat::Json => match serde_json::to_string(event) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(%err, event = event.name(), "failed to encode event");
                return;
            }
        },
        EventFormat::Text => describe(event),
    };

    // Raw mode: no implicit carriage return
    let mut out = io::stdout().lock();
    let _ = write!(out, "{line}\r\n");
    let _ = out.flush();
}

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::GameInitialized(snapshot) => format!(
            "new game: {}x{} board, level {}",
            snapshot.board.len(),
            snapshot.board.first().map_or(0, Vec::len),
            snapshot.level.display_name()
        ),
        GameEvent::ScoreChanged(score) => format!("score {score}"),
        GameEvent::BrickUpdated(view) => {
            let limit = view
                .rotations_remaining()
                .map_or(String::new(), |left| format!(" rotations left {left}"));
            format!(
                "{:?} at ({}, {}) ghost {} rot {}/{}{}",
                view.kind(),
                view.x(),
                view.y(),
                view.ghost_y(),
                view.rotation_index() + 1,
                view.rotation_count(),
                limit
            )
        }
        GameEvent::BoardUpdated(matrix) => {
            let filled = matrix.iter().flatten().filter(|&&c| c != 0).count();
            format!("board: {filled} cells filled")
        }
        GameEvent::LinesCleared(clear) => format!(
            "cleared {} line(s) {:?} +{}",
            clear.lines_removed(),
            clear.rows(),
            clear.score_bonus()
        ),
        GameEvent::GameOver => "game over (n: new game, q: quit)".to_string(),
    }
}
