//! Scoring module - score accumulator, drop policy and score orchestration
//!
//! Scoring rules:
//! - A line clear of `n` rows is worth `50 * n^2` (1 → 50, 2 → 200, 3 → 450, 4 → 800).
//! - A drop is worth whatever the [`ScorePolicy`] says; the default policy
//!   awards one point for a user-initiated drop and nothing for gravity.
//!
//! [`ScoreManager`] is the only writer of the [`Score`]; every change it makes is
//! published as [`GameEvent::ScoreChanged`] on the bus passed in by the caller.

use tracing::trace;

use crate::clear_row::ClearRow;
use crate::events::{EventBus, GameEvent};
use crate::types::{MoveEvent, ROW_CLEAR_UNIT};

/// Bonus for clearing `lines` rows at once: `50 * lines^2`, and 0 for `lines <= 0`
pub fn row_clear_bonus(lines: i64) -> i64 {
    if lines <= 0 {
        return 0;
    }
    ROW_CLEAR_UNIT.saturating_mul(lines.saturating_mul(lines))
}

/// Mutable score accumulator
///
/// Negative deltas are allowed (penalties); the total is not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    value: i64,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn add(&mut self, delta: i64) {
        self.value = self.value.saturating_add(delta);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// Points awarded for a single drop event
pub trait ScorePolicy {
    fn calculate_drop_score(&self, event: &MoveEvent) -> i64;
}

/// Default policy: voluntary soft drops are rewarded, passive falling is not
#[derive(Debug, Clone, Copy, Default)]
pub struct UserDropPolicy;

impl ScorePolicy for UserDropPolicy {
    fn calculate_drop_score(&self, event: &MoveEvent) -> i64 {
        if event.is_user() {
            1
        } else {
            0
        }
    }
}

impl<F> ScorePolicy for F
where
    F: Fn(&MoveEvent) -> i64,
{
    fn calculate_drop_score(&self, event: &MoveEvent) -> i64 {
        self(event)
    }
}

/// Applies the score policy and the row-clear bonus, publishing every change
#[derive(Debug, Clone, Default)]
pub struct ScoreManager<P = UserDropPolicy> {
    score: Score,
    policy: P,
}

impl ScoreManager<UserDropPolicy> {
    pub fn new() -> Self {
        Self::with_policy(UserDropPolicy)
    }
}

impl<P: ScorePolicy> ScoreManager<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            score: Score::new(),
            policy,
        }
    }

    pub fn score(&self) -> i64 {
        self.score.value()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// React to a drop. Returns true if the score changed.
    ///
    /// Non-positive policy results leave the score untouched and publish nothing.
    pub fn handle_drop(&mut self, event: &MoveEvent, bus: &mut EventBus) -> bool {
        let points = self.policy.calculate_drop_score(event);
        if points <= 0 {
            return false;
        }
        self.score.add(points);
        trace!(points, total = self.score.value(), "drop scored");
        bus.publish(GameEvent::ScoreChanged(self.score.value()));
        true
    }

    /// React to a lock's row-clear result. Returns true if any line was cleared.
    ///
    /// Publishes `ScoreChanged` and then forwards the same [`ClearRow`] as
    /// `LinesCleared`; a zero-line clear publishes nothing.
    pub fn handle_lines_cleared(&mut self, clear_row: &ClearRow, bus: &mut EventBus) -> bool {
        if clear_row.lines_removed() == 0 {
            return false;
        }
        self.score.add(clear_row.score_bonus());
        bus.publish(GameEvent::ScoreChanged(self.score.value()));
        bus.publish(GameEvent::LinesCleared(clear_row.clone()));
        true
    }

    /// Zero the score for a new game and announce it
    pub fn reset(&mut self, bus: &mut EventBus) {
        self.score.reset();
        bus.publish(GameEvent::ScoreChanged(0));
    }
}
