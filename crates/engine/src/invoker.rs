//! The verbs every game front end can call.

use std::sync::{Arc, Mutex, PoisonError};

use crate::types::{EventSource, GameAction};

/// Something that can carry out game actions
///
/// Every verb returns `true` when it was accepted: committed for a controller,
/// enqueued for an actor handle.
pub trait GameActionInvoker {
    fn move_down_from(&mut self, source: EventSource) -> bool;

    /// User-initiated soft drop
    fn move_down(&mut self) -> bool {
        self.move_down_from(EventSource::User)
    }

    fn move_left(&mut self) -> bool;

    fn move_right(&mut self) -> bool;

    fn rotate(&mut self) -> bool;

    fn instant_drop(&mut self) -> bool;

    /// Dispatch a user action to the matching verb
    fn perform(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveDown => self.move_down(),
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::Rotate => self.rotate(),
            GameAction::InstantDrop => self.instant_drop(),
        }
    }
}

/// Shared invoker; the lock is held for the whole verb
///
/// A poisoned lock is recovered: the game state is only ever mutated through
/// complete verbs.
impl<T: GameActionInvoker> GameActionInvoker for Arc<Mutex<T>> {
    fn move_down_from(&mut self, source: EventSource) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .move_down_from(source)
    }

    fn move_left(&mut self) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .move_left()
    }

    fn move_right(&mut self) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .move_right()
    }

    fn rotate(&mut self) -> bool {
        self.lock().unwrap_or_else(PoisonError::into_inner).rotate()
    }

    fn instant_drop(&mut self) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .instant_drop()
    }
}
