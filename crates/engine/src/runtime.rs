//! Game actor.
//!
//! Moves a [`GameController`] into one tokio task. Gravity ticks and requests
//! from any number of [`GameHandle`]s are multiplexed with `select!`, so each
//! verb runs to completion before the next one starts and listeners see events
//! in mutation order.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::controller::GameController;
use crate::core::{GameEventListener, GameLevel, GameSnapshot, ListenerId, ScorePolicy};
use crate::invoker::GameActionInvoker;
use crate::types::{EventSource, GameAction};

/// Request delivered to the game task
pub enum Request {
    Action {
        action: GameAction,
        source: EventSource,
    },
    NewGame,
    SetLevel(GameLevel),
    SetPaused(bool),
    TogglePause,
    Subscribe {
        listener: Box<dyn GameEventListener>,
        reply: oneshot::Sender<ListenerId>,
    },
    Unsubscribe(ListenerId),
    Snapshot(oneshot::Sender<GameSnapshot>),
    Shutdown,
}

/// Cheap, cloneable sender side of the game task
///
/// As an invoker it reports whether the request was enqueued; the outcome is
/// observed through events.
#[derive(Debug, Clone)]
pub struct GameHandle {
    tx: mpsc::UnboundedSender<Request>,
}

impl GameHandle {
    /// Returns false once the game task has stopped
    pub fn send(&self, request: Request) -> bool {
        self.tx.send(request).is_ok()
    }

    pub fn action(&self, action: GameAction, source: EventSource) -> bool {
        self.send(Request::Action { action, source })
    }

    pub fn new_game(&self) -> bool {
        self.send(Request::NewGame)
    }

    pub fn set_level(&self, level: GameLevel) -> bool {
        self.send(Request::SetLevel(level))
    }

    pub fn set_paused(&self, paused: bool) -> bool {
        self.send(Request::SetPaused(paused))
    }

    pub fn toggle_pause(&self) -> bool {
        self.send(Request::TogglePause)
    }

    pub async fn subscribe(&self, listener: impl GameEventListener + 'static) -> Option<ListenerId> {
        let (reply, rx) = oneshot::channel();
        if !self.send(Request::Subscribe {
            listener: Box::new(listener),
            reply,
        }) {
            return None;
        }
        rx.await.ok()
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.send(Request::Unsubscribe(id))
    }

    pub async fn snapshot(&self) -> Option<GameSnapshot> {
        let (reply, rx) = oneshot::channel();
        if !self.send(Request::Snapshot(reply)) {
            return None;
        }
        rx.await.ok()
    }

    pub fn shutdown(&self) -> bool {
        self.send(Request::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl GameActionInvoker for GameHandle {
    fn move_down_from(&mut self, source: EventSource) -> bool {
        self.action(GameAction::MoveDown, source)
    }

    fn move_left(&mut self) -> bool {
        self.action(GameAction::MoveLeft, EventSource::User)
    }

    fn move_right(&mut self) -> bool {
        self.action(GameAction::MoveRight, EventSource::User)
    }

    fn rotate(&mut self) -> bool {
        self.action(GameAction::Rotate, EventSource::User)
    }

    fn instant_drop(&mut self) -> bool {
        self.action(GameAction::InstantDrop, EventSource::User)
    }
}

pub struct GameRuntime;

impl GameRuntime {
    /// Spawn the game task on the current tokio runtime
    ///
    /// The task ends on [`Request::Shutdown`] or when every handle is dropped,
    /// and hands the controller back through the join handle.
    pub fn spawn<P>(controller: GameController<P>) -> (GameHandle, JoinHandle<GameController<P>>)
    where
        P: ScorePolicy + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(controller, rx));
        (GameHandle { tx }, task)
    }
}

async fn run<P: ScorePolicy>(
    mut controller: GameController<P>,
    mut rx: mpsc::UnboundedReceiver<Request>,
) -> GameController<P> {
    let mut paused = false;
    let mut next_tick = Instant::now() + controller.tick_interval();

    loop {
        let gravity = !paused && controller.is_running();

        tokio::select! {
            request = rx.recv() => {
                let Some(request) = request else {
                    break;
                };
                let was_paused = paused;
                match request {
                    Request::Action { action, source } => {
                        if !paused {
                            controller.apply(action, source);
                        }
                    }
                    Request::NewGame => {
                        paused = false;
                        controller.create_new_game();
                        next_tick = Instant::now() + controller.tick_interval();
                    }
                    Request::SetLevel(level) => {
                        controller.set_level(level);
                        next_tick = Instant::now() + controller.tick_interval();
                    }
                    Request::SetPaused(value) => paused = value,
                    Request::TogglePause => paused = !paused,
                    Request::Subscribe { listener, reply } => {
                        let id = controller.subscribe_boxed(listener);
                        let _ = reply.send(id);
                    }
                    Request::Unsubscribe(id) => {
                        controller.unsubscribe(id);
                    }
                    Request::Snapshot(reply) => {
                        let _ = reply.send(controller.snapshot());
                    }
                    Request::Shutdown => break,
                }
                if was_paused != paused {
                    debug!(paused, "pause toggled");
                    if !paused {
                        next_tick = Instant::now() + controller.tick_interval();
                    }
                }
            }
            _ = sleep_until(next_tick), if gravity => {
                trace!("gravity tick");
                controller.move_down_from(EventSource::Gravity);
                next_tick = Instant::now() + controller.tick_interval();
            }
        }
    }

    debug!("game task stopped");
    controller
}
