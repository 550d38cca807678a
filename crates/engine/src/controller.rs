//! Game controller - the single writer of game state
//!
//! The controller owns the [`GameState`], the [`ScoreManager`] and the
//! [`EventBus`]. Every verb runs validate-then-commit on the state and publishes
//! the resulting events before returning, in this order:
//!
//! 1. `BoardUpdated` (only when a piece locked)
//! 2. `BrickUpdated` (piece moved, rotated or spawned)
//! 3. `ScoreChanged` / `LinesCleared`
//! 4. `GameOver`
//!
//! Level modifiers are acted on here: garbage rows are injected between row
//! clearing and the next spawn.

use std::time::Duration;

use tracing::{debug, info};

use crate::core::{
    Board, BuildError, EventBus, GameEvent, GameEventListener, GameLevel, GameSnapshot, GameState,
    ListenerId, ScoreManager, ScorePolicy, SimpleRng, UserDropPolicy, ViewData,
};
use crate::invoker::GameActionInvoker;
use crate::types::{
    EventSource, GameAction, Matrix, MoveEvent, PieceKind, DEFAULT_COLS, DEFAULT_GARBAGE_INTERVAL,
    DEFAULT_PREVIEW_COUNT, DEFAULT_ROWS, MAX_PREVIEW_COUNT,
};

/// Salt mixed into the game seed for the garbage-hole RNG, so holes do not
/// mirror the piece sequence
const GARBAGE_SEED_SALT: u32 = 0x9E37_79B9;

/// Orchestrates one game at a time
pub struct GameController<P = UserDropPolicy> {
    state: GameState,
    starting_board: Board,
    scores: ScoreManager<P>,
    bus: EventBus,
    level: GameLevel,
    base_seed: u32,
    games_started: u32,
    preview_count: usize,
    garbage_interval: u32,
    locks_since_garbage: u32,
    garbage_rng: SimpleRng,
}

impl GameController<UserDropPolicy> {
    pub fn builder() -> GameControllerBuilder<UserDropPolicy> {
        GameControllerBuilder::new()
    }
}

impl<P: ScorePolicy> GameController<P> {
    /// Start a fresh game: starting board, zero score, first piece spawned
    ///
    /// Publishes `GameInitialized`, then `ScoreChanged(0)`, then `GameOver` if the
    /// very first piece cannot spawn. Returns whether a piece is in play.
    pub fn create_new_game(&mut self) -> bool {
        let seed = self.base_seed.wrapping_add(self.games_started);
        self.games_started = self.games_started.wrapping_add(1);

        self.state = GameState::new(self.starting_board.clone(), seed);
        self.locks_since_garbage = 0;
        self.garbage_rng = SimpleRng::new(seed ^ GARBAGE_SEED_SALT);

        let spawned = self.state.start();
        info!(
            seed,
            level = self.level.as_str(),
            rows = self.starting_board.rows(),
            cols = self.starting_board.cols(),
            "new game"
        );

        let snapshot = GameSnapshot {
            board: self.state.board().matrix(),
            view: self.view_data(),
            score: 0,
            level: self.level,
        };
        self.bus.publish(GameEvent::GameInitialized(snapshot));
        self.scores.reset(&mut self.bus);

        if !spawned {
            self.bus.publish(GameEvent::GameOver);
        }
        spawned
    }

    /// Switch level; takes effect on the next tick and the next rotation
    pub fn set_level(&mut self, level: GameLevel) {
        if self.level == level {
            return;
        }
        info!(from = self.level.as_str(), to = level.as_str(), "level changed");
        self.level = level;
        self.locks_since_garbage = 0;
        // Preview visibility and modifiers may have changed
        self.publish_brick();
    }

    pub fn level(&self) -> GameLevel {
        self.level
    }

    pub fn score(&self) -> i64 {
        self.scores.score()
    }

    /// Gravity interval for the current level and score
    pub fn tick_interval(&self) -> Duration {
        self.level.tick_interval(self.score())
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over()
    }

    /// A game has been started and is not over yet
    pub fn is_running(&self) -> bool {
        self.state.started() && !self.state.game_over()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn view_data(&self) -> Option<ViewData> {
        self.state.view_data(&self.level, self.preview_count)
    }

    pub fn board_matrix(&self) -> Matrix {
        self.state.board().matrix()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board_matrix(),
            view: self.view_data(),
            score: self.score(),
            level: self.level,
        }
    }

    pub fn preview_count(&self) -> usize {
        self.preview_count
    }

    pub fn garbage_interval(&self) -> u32 {
        self.garbage_interval
    }

    pub fn subscribe(&mut self, listener: impl GameEventListener + 'static) -> ListenerId {
        self.bus.subscribe(listener)
    }

    pub fn subscribe_boxed(&mut self, listener: Box<dyn GameEventListener>) -> ListenerId {
        self.bus.subscribe_boxed(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn scores(&self) -> &ScoreManager<P> {
        &self.scores
    }

    /// Apply one action as if it came from `source`
    pub fn apply(&mut self, action: GameAction, source: EventSource) -> bool {
        match action {
            GameAction::MoveDown => self.move_down_from(source),
            GameAction::MoveLeft => self.shift(-1),
            GameAction::MoveRight => self.shift(1),
            GameAction::Rotate => self.rotate_active(),
            GameAction::InstantDrop => self.drop_active(),
        }
    }

    fn shift(&mut self, dx: i32) -> bool {
        if !self.state.try_move(dx, 0) {
            return false;
        }
        self.publish_brick();
        true
    }

    fn rotate_active(&mut self) -> bool {
        if !self.state.rotate(self.level.rotation_limit()) {
            return false;
        }
        self.publish_brick();
        true
    }

    fn step_down(&mut self, source: EventSource) -> bool {
        if self.state.active().is_none() {
            return false;
        }

        if self.state.try_move(0, 1) {
            self.publish_brick();
            self.scores
                .handle_drop(&MoveEvent::new(GameAction::MoveDown, source), &mut self.bus);
            return true;
        }

        // Blocked below: the piece locks where it is
        self.lock_and_continue(None);
        true
    }

    fn drop_active(&mut self) -> bool {
        let Some(rows) = self.state.drop_to_ground() else {
            return false;
        };
        debug!(rows, "instant drop");

        // Scored as a single user-initiated drop regardless of distance
        self.lock_and_continue(Some(MoveEvent::new(
            GameAction::InstantDrop,
            EventSource::User,
        )));
        true
    }

    fn lock_and_continue(&mut self, drop: Option<MoveEvent>) {
        let Some(clear) = self.state.lock_active() else {
            return;
        };

        if self.level.modifiers().garbage_rows {
            self.locks_since_garbage += 1;
            if self.locks_since_garbage >= self.garbage_interval {
                self.locks_since_garbage = 0;
                let cols = self.state.board().cols() as u32;
                let hole = self.garbage_rng.next_range(cols) as usize;
                let fill = PieceKind::ALL
                    [self.garbage_rng.next_range(PieceKind::ALL.len() as u32) as usize];
                self.state.inject_garbage_row(hole, fill);
            }
        }

        if !self.state.game_over() {
            self.state.spawn_next();
        }

        self.bus.publish(GameEvent::BoardUpdated(self.board_matrix()));
        self.publish_brick();

        if let Some(event) = drop {
            self.scores.handle_drop(&event, &mut self.bus);
        }
        self.scores.handle_lines_cleared(&clear, &mut self.bus);

        if self.state.game_over() {
            self.bus.publish(GameEvent::GameOver);
        }
    }

    fn publish_brick(&mut self) {
        if let Some(view) = self.view_data() {
            self.bus.publish(GameEvent::BrickUpdated(view));
        }
    }
}

impl<P: ScorePolicy> GameActionInvoker for GameController<P> {
    /// Moves down one row or locks the piece when blocked
    fn move_down_from(&mut self, source: EventSource) -> bool {
        self.step_down(source)
    }

    fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn rotate(&mut self) -> bool {
        self.rotate_active()
    }

    fn instant_drop(&mut self) -> bool {
        self.drop_active()
    }
}

impl<P> std::fmt::Debug for GameController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("level", &self.level)
            .field("game_over", &self.state.game_over())
            .field("listeners", &self.bus.len())
            .finish()
    }
}

/// Validated construction of a [`GameController`]
#[derive(Debug, Clone)]
pub struct GameControllerBuilder<P = UserDropPolicy> {
    rows: usize,
    cols: usize,
    seed: u32,
    level: GameLevel,
    preview_count: usize,
    garbage_interval: u32,
    board: Option<Board>,
    policy: P,
}

impl GameControllerBuilder<UserDropPolicy> {
    pub fn new() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: 1,
            level: GameLevel::default(),
            preview_count: DEFAULT_PREVIEW_COUNT,
            garbage_interval: DEFAULT_GARBAGE_INTERVAL,
            board: None,
            policy: UserDropPolicy,
        }
    }
}

impl Default for GameControllerBuilder<UserDropPolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ScorePolicy> GameControllerBuilder<P> {
    pub fn dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Starting layout for every new game; overrides [`Self::dimensions`]
    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn level(mut self, level: GameLevel) -> Self {
        self.level = level;
        self
    }

    pub fn preview_count(mut self, count: usize) -> Self {
        self.preview_count = count;
        self
    }

    pub fn garbage_interval(mut self, locks: u32) -> Self {
        self.garbage_interval = locks;
        self
    }

    /// Swap the drop score policy
    pub fn policy<Q: ScorePolicy>(self, policy: Q) -> GameControllerBuilder<Q> {
        GameControllerBuilder {
            rows: self.rows,
            cols: self.cols,
            seed: self.seed,
            level: self.level,
            preview_count: self.preview_count,
            garbage_interval: self.garbage_interval,
            board: self.board,
            policy,
        }
    }

    /// Validate the settings and build an idle controller
    ///
    /// No game is running until [`GameController::create_new_game`] is called,
    /// so listeners can subscribe first.
    pub fn build(self) -> Result<GameController<P>, BuildError> {
        let starting_board = match self.board {
            Some(board) => board,
            None => Board::new(self.rows, self.cols)?,
        };
        if self.preview_count > MAX_PREVIEW_COUNT {
            return Err(BuildError::PreviewTooLong {
                requested: self.preview_count,
            });
        }
        if self.garbage_interval == 0 {
            return Err(BuildError::ZeroGarbageInterval);
        }

        Ok(GameController {
            state: GameState::new(starting_board.clone(), self.seed),
            starting_board,
            scores: ScoreManager::with_policy(self.policy),
            bus: EventBus::new(),
            level: self.level,
            base_seed: self.seed,
            games_started: 0,
            preview_count: self.preview_count,
            garbage_interval: self.garbage_interval,
            locks_since_garbage: 0,
            garbage_rng: SimpleRng::new(self.seed ^ GARBAGE_SEED_SALT),
        })
    }
}
