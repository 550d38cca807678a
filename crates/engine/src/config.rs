//! Environment configuration for the runner.
//!
//! Every setting has a default; unparsable values fall back to it. Range
//! checks happen in [`GameControllerBuilder::build`], not here.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::controller::GameControllerBuilder;
use crate::core::GameLevel;
use crate::types::{DEFAULT_COLS, DEFAULT_GARBAGE_INTERVAL, DEFAULT_PREVIEW_COUNT, DEFAULT_ROWS};

/// How the runner prints events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFormat {
    #[default]
    Text,
    Json,
}

impl EventFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(EventFormat::Text),
            "json" => Some(EventFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    /// `None` seeds from the clock
    pub seed: Option<u32>,
    pub level: GameLevel,
    pub preview_count: usize,
    pub garbage_interval: u32,
    /// Swap left and right
    pub inverted_controls: bool,
    pub event_format: EventFormat,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: None,
            level: GameLevel::Classic,
            preview_count: DEFAULT_PREVIEW_COUNT,
            garbage_interval: DEFAULT_GARBAGE_INTERVAL,
            inverted_controls: false,
            event_format: EventFormat::Text,
        }
    }
}

impl GameConfig {
    /// Read `BLOCKFALL_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let rows = lookup("BLOCKFALL_ROWS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.rows);

        let cols = lookup("BLOCKFALL_COLS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.cols);

        let seed = lookup("BLOCKFALL_SEED").and_then(|s| s.trim().parse().ok());

        let level = lookup("BLOCKFALL_LEVEL")
            .and_then(|s| GameLevel::from_str(&s))
            .unwrap_or(defaults.level);

        let preview_count = lookup("BLOCKFALL_PREVIEW")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.preview_count);

        let garbage_interval = lookup("BLOCKFALL_GARBAGE_EVERY")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.garbage_interval);

        let inverted_controls = lookup("BLOCKFALL_INVERT")
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(defaults.inverted_controls);

        let event_format = lookup("BLOCKFALL_EVENT_FORMAT")
            .and_then(|s| EventFormat::from_str(&s))
            .unwrap_or(defaults.event_format);

        Self {
            rows,
            cols,
            seed,
            level,
            preview_count,
            garbage_interval,
            inverted_controls,
            event_format,
        }
    }

    /// The configured seed, or one derived from the clock
    pub fn resolved_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }

    /// Controller builder carrying these settings
    pub fn builder(&self) -> GameControllerBuilder {
        GameControllerBuilder::new()
            .dimensions(self.rows, self.cols)
            .seed(self.resolved_seed())
            .level(self.level)
            .preview_count(self.preview_count)
            .garbage_interval(self.garbage_interval)
    }
}
