//! Event bus between the simulation and presentation.
//!
//! The bus is an ordinary value owned by whoever drives the game (the
//! controller) and lent out as `&mut EventBus` to the components that publish.
//! Publishing is synchronous: every listener has seen an event before the
//! mutation that produced it returns.
//!
//! Order within a single mutation: board/brick updates, then score events
//! (`ScoreChanged`, `LinesCleared`), then `GameOver`.

use serde::Serialize;

use crate::clear_row::ClearRow;
use crate::level::GameLevel;
use crate::types::Matrix;
use crate::view_data::ViewData;

/// Full state handed out when a game starts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub board: Matrix,
    /// `None` only if the very first spawn failed
    pub view: Option<ViewData>,
    pub score: i64,
    pub level: GameLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    GameInitialized(GameSnapshot),
    ScoreChanged(i64),
    BrickUpdated(ViewData),
    BoardUpdated(Matrix),
    LinesCleared(ClearRow),
    GameOver,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameInitialized(_) => "game_initialized",
            GameEvent::ScoreChanged(_) => "score_changed",
            GameEvent::BrickUpdated(_) => "brick_updated",
            GameEvent::BoardUpdated(_) => "board_updated",
            GameEvent::LinesCleared(_) => "lines_cleared",
            GameEvent::GameOver => "game_over",
        }
    }
}

/// Receives every published event
///
/// Implemented for any `FnMut(&GameEvent) + Send` closure.
pub trait GameEventListener: Send {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameEventListener for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners, notified in subscription order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Box<dyn GameEventListener>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl GameEventListener + 'static) -> ListenerId {
        self.subscribe_boxed(Box::new(listener))
    }

    pub fn subscribe_boxed(&mut self, listener: Box<dyn GameEventListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns false if `id` was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: GameEvent) {
        for (_, listener) in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_publish_reaches_listeners_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        let a = Arc::clone(&log);
        bus.subscribe(move |e: &GameEvent| a.lock().unwrap().push(("a", e.clone())));
        let b = Arc::clone(&log);
        bus.subscribe(move |e: &GameEvent| b.lock().unwrap().push(("b", e.clone())));

        bus.publish(GameEvent::ScoreChanged(5));

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                ("a", GameEvent::ScoreChanged(5)),
                ("b", GameEvent::ScoreChanged(5))
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut bus = EventBus::new();

        let c = Arc::clone(&count);
        let id = bus.subscribe(move |_: &GameEvent| *c.lock().unwrap() += 1);
        bus.publish(GameEvent::GameOver);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(GameEvent::GameOver);

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let json = serde_json::to_value(GameEvent::ScoreChanged(130)).unwrap();
        assert_eq!(json["event"], "score_changed");
        assert_eq!(json["data"], 130);

        let json = serde_json::to_value(GameEvent::GameOver).unwrap();
        assert_eq!(json["event"], "game_over");
    }
}
