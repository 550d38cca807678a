//! Level module - gravity speed and difficulty modifiers
//!
//! A level is a plain value: a tag plus the parameters it resolves to. Every
//! level shares one pure interval function ([`tick_interval_ms`]); the only
//! differences are the numbers in [`LevelParams`].
//!
//! | Level | Gravity | Rotation limit | Modifiers |
//! |-------|---------|----------------|-----------|
//! | Classic | 400ms | unlimited | none |
//! | Level 1 | 5.0 drops/s, +1.5 every 100 pts, capped at 500 pts | unlimited | none |
//! | Level 2 | 400ms | 4 per piece | none |
//! | Level 3 | 400ms | unlimited | garbage rows, flicker, hidden preview |

use std::time::Duration;

use serde::Serialize;

use crate::types::CLASSIC_TICK_MS;

/// Score-driven gravity: drops per second grow in steps until a score cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DynamicSpeed {
    /// Drops per second at score 0
    pub base_drops_per_sec: f64,
    /// Drops per second added per threshold reached
    pub increment: f64,
    /// Points needed for each increment
    pub score_threshold: i64,
    /// Score beyond which speed stops growing
    pub score_cap: i64,
}

impl DynamicSpeed {
    pub const LEVEL1: DynamicSpeed = DynamicSpeed {
        base_drops_per_sec: 5.0,
        increment: 1.5,
        score_threshold: 100,
        score_cap: 500,
    };

    /// Drops per second reached at `score`
    pub fn drops_per_sec(&self, score: i64) -> f64 {
        let effective = score.clamp(0, self.score_cap.max(0));
        let steps = if self.score_threshold > 0 {
            effective / self.score_threshold
        } else {
            0
        };
        self.base_drops_per_sec + steps as f64 * self.increment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Speed {
    /// Fixed milliseconds per gravity step
    Constant { interval_ms: u64 },
    Dynamic(DynamicSpeed),
}

/// Boolean difficulty modifiers
///
/// The level only exposes these; the controller and renderer act on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LevelModifiers {
    pub garbage_rows: bool,
    pub flicker: bool,
    pub hide_next_preview: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelParams {
    pub speed: Speed,
    /// Rotations allowed per piece; `None` means unlimited
    pub rotation_limit: Option<u32>,
    pub modifiers: LevelModifiers,
}

const CLASSIC_SPEED: Speed = Speed::Constant {
    interval_ms: CLASSIC_TICK_MS,
};

/// Milliseconds between gravity steps for `speed` at `score`
pub fn tick_interval_ms(speed: &Speed, score: i64) -> f64 {
    match speed {
        Speed::Constant { interval_ms } => *interval_ms as f64,
        Speed::Dynamic(dynamic) => {
            let dps = dynamic.drops_per_sec(score);
            if dps > 0.0 {
                1000.0 / dps
            } else {
                CLASSIC_TICK_MS as f64
            }
        }
    }
}

/// The selectable levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum GameLevel {
    #[default]
    Classic,
    /// Custom score-driven speed without modifiers
    Dynamic(DynamicSpeed),
    Level1,
    Level2,
    Level3,
}

impl GameLevel {
    pub fn params(&self) -> LevelParams {
        match self {
            GameLevel::Classic => LevelParams {
                speed: CLASSIC_SPEED,
                rotation_limit: None,
                modifiers: LevelModifiers::default(),
            },
            GameLevel::Dynamic(dynamic) => LevelParams {
                speed: Speed::Dynamic(*dynamic),
                rotation_limit: None,
                modifiers: LevelModifiers::default(),
            },
            GameLevel::Level1 => LevelParams {
                speed: Speed::Dynamic(DynamicSpeed::LEVEL1),
                rotation_limit: None,
                modifiers: LevelModifiers::default(),
            },
            GameLevel::Level2 => LevelParams {
                speed: CLASSIC_SPEED,
                rotation_limit: Some(4),
                modifiers: LevelModifiers::default(),
            },
            GameLevel::Level3 => LevelParams {
                speed: CLASSIC_SPEED,
                rotation_limit: None,
                modifiers: LevelModifiers {
                    garbage_rows: true,
                    flicker: true,
                    hide_next_preview: true,
                },
            },
        }
    }

    pub fn tick_interval_ms(&self, score: i64) -> f64 {
        tick_interval_ms(&self.params().speed, score)
    }

    pub fn tick_interval(&self, score: i64) -> Duration {
        Duration::from_micros((self.tick_interval_ms(score) * 1000.0).round() as u64)
    }

    pub fn rotation_limit(&self) -> Option<u32> {
        self.params().rotation_limit
    }

    /// Rotation limit with `-1` standing for "unlimited"
    pub fn rotation_limit_raw(&self) -> i64 {
        self.rotation_limit().map_or(-1, i64::from)
    }

    pub fn modifiers(&self) -> LevelModifiers {
        self.params().modifiers
    }

    /// Parse a level name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::GameLevel;
    ///
    /// assert_eq!(GameLevel::from_str("level2"), Some(GameLevel::Level2));
    /// assert_eq!(GameLevel::from_str("Classic"), Some(GameLevel::Classic));
    /// assert_eq!(GameLevel::from_str("hard"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(GameLevel::Classic),
            "level1" | "1" => Some(GameLevel::Level1),
            "level2" | "2" => Some(GameLevel::Level2),
            "level3" | "3" => Some(GameLevel::Level3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameLevel::Classic => "classic",
            GameLevel::Dynamic(_) => "dynamic",
            GameLevel::Level1 => "level1",
            GameLevel::Level2 => "level2",
            GameLevel::Level3 => "level3",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameLevel::Classic => "Classic",
            GameLevel::Dynamic(_) => "Dynamic",
            GameLevel::Level1 => "Level 1: Speed Up",
            GameLevel::Level2 => "Level 2: Limited Spins",
            GameLevel::Level3 => "Level 3: Chaos",
        }
    }
}
