//! Action-to-command table.
//!
//! Each binding owns a clone of the invoker wrapped in its command object.
//! The inverted scheme swaps the horizontal commands.

use blockfall_engine::{
    GameActionInvoker, GameCommand, InstantDropCommand, MoveDownCommand, MoveLeftCommand,
    MoveRightCommand, RotateCommand,
};

use crate::types::GameAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlScheme {
    #[default]
    Normal,
    /// Left moves right and right moves left
    Inverted,
}

impl ControlScheme {
    pub fn from_inverted(inverted: bool) -> Self {
        if inverted {
            ControlScheme::Inverted
        } else {
            ControlScheme::Normal
        }
    }
}

pub struct CommandBindings {
    scheme: ControlScheme,
    move_down: Box<dyn GameCommand>,
    move_left: Box<dyn GameCommand>,
    move_right: Box<dyn GameCommand>,
    rotate: Box<dyn GameCommand>,
    instant_drop: Box<dyn GameCommand>,
}

impl CommandBindings {
    pub fn new<I>(invoker: I, scheme: ControlScheme) -> Self
    where
        I: GameActionInvoker + Clone + Send + 'static,
    {
        let left: Box<dyn GameCommand> = Box::new(MoveLeftCommand::new(invoker.clone()));
        let right: Box<dyn GameCommand> = Box::new(MoveRightCommand::new(invoker.clone()));
        let (move_left, move_right) = match scheme {
            ControlScheme::Normal => (left, right),
            ControlScheme::Inverted => (right, left),
        };

        Self {
            scheme,
            move_down: Box::new(MoveDownCommand::new(invoker.clone())),
            move_left,
            move_right,
            rotate: Box::new(RotateCommand::new(invoker.clone())),
            instant_drop: Box::new(InstantDropCommand::new(invoker)),
        }
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    /// Run the command bound to `action`
    pub fn dispatch(&mut self, action: GameAction) -> bool {
        let command = match action {
            GameAction::MoveDown => &mut self.move_down,
            GameAction::MoveLeft => &mut self.move_left,
            GameAction::MoveRight => &mut self.move_right,
            GameAction::Rotate => &mut self.rotate,
            GameAction::InstantDrop => &mut self.instant_drop,
        };
        command.execute()
    }
}
