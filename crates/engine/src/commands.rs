//! Command objects: one struct per verb, each holding only an invoker.
//!
//! Key bindings store these instead of calling the invoker directly, so the
//! input layer can remap or swap commands without knowing what runs them.

use crate::invoker::GameActionInvoker;
use crate::types::GameAction;

pub trait GameCommand: Send {
    /// Run the command; returns whether the invoker accepted it
    fn execute(&mut self) -> bool;
}

macro_rules! command {
    ($(#[$doc:meta])* $name:ident => $verb:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<I> {
            invoker: I,
        }

        impl<I> $name<I> {
            pub fn new(invoker: I) -> Self {
                Self { invoker }
            }

            pub fn invoker(&self) -> &I {
                &self.invoker
            }
        }

        impl<I: GameActionInvoker + Send> GameCommand for $name<I> {
            fn execute(&mut self) -> bool {
                self.invoker.$verb()
            }
        }
    };
}

command!(
    /// User soft drop
    MoveDownCommand => move_down
);
command!(MoveLeftCommand => move_left);
command!(MoveRightCommand => move_right);
command!(RotateCommand => rotate);
command!(InstantDropCommand => instant_drop);

/// Boxed command for `action`
pub fn command_for<I>(action: GameAction, invoker: I) -> Box<dyn GameCommand>
where
    I: GameActionInvoker + Send + 'static,
{
    match action {
        GameAction::MoveDown => Box::new(MoveDownCommand::new(invoker)),
        GameAction::MoveLeft => Box::new(MoveLeftCommand::new(invoker)),
        GameAction::MoveRight => Box::new(MoveRightCommand::new(invoker)),
        GameAction::Rotate => Box::new(RotateCommand::new(invoker)),
        GameAction::InstantDrop => Box::new(InstantDropCommand::new(invoker)),
    }
}
