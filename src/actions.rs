//! The action vector consumed by one world advance.
//!
//! The order of the flags is part of the contract with worlds and external clients:
//! `[left, right, down, speed, jump]`. Never reorder [`Action`].

use std::fmt::Display;

/// A single input flag of the action vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move left
    Left = 0,
    /// Move right
    Right = 1,
    /// Crouch
    Down = 2,
    /// Run, or shoot when in fire state
    Speed = 3,
    /// Jump
    Jump = 4,
}

impl Action {
    /// Every action, in vector order.
    pub const ALL: [Action; Actions::LEN] = [
        Action::Left,
        Action::Right,
        Action::Down,
        Action::Speed,
        Action::Jump,
    ];

    /// Position of this flag inside the action vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "Left",
            Action::Right => "Right",
            Action::Down => "Down",
            Action::Speed => "Speed",
            Action::Jump => "Jump",
        }
    }
}

/// Fixed-size ordered set of boolean input flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Actions([bool; Actions::LEN]);

impl Actions {
    /// Number of flags in the vector
    pub const LEN: usize = 5;

    /// Nothing pressed. Used for the tick-zero settle update and paused replays.
    pub const NONE: Actions = Actions([false; Actions::LEN]);

    /// Build a vector from the five named flags, in the fixed order.
    pub fn new(left: bool, right: bool, down: bool, speed: bool, jump: bool) -> Self {
        Actions([left, right, down, speed, jump])
    }

    /// Build a vector with only the given actions pressed.
    pub fn pressed(actions: &[Action]) -> Self {
        let mut res = Self::NONE;
        for action in actions {
            res.set(*action, true);
        }
        res
    }

    pub fn from_array(flags: [bool; Actions::LEN]) -> Self {
        Actions(flags)
    }

    pub fn as_array(&self) -> [bool; Actions::LEN] {
        self.0
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, pressed: bool) {
        self.0[action.index()] = pressed;
    }

    /// Builder-style variant of [`Actions::set`]
    #[must_use]
    pub fn with(mut self, action: Action, pressed: bool) -> Self {
        self.set(action, pressed);
        self
    }

    pub fn left(&self) -> bool {
        self.is_pressed(Action::Left)
    }

    pub fn right(&self) -> bool {
        self.is_pressed(Action::Right)
    }

    pub fn down(&self) -> bool {
        self.is_pressed(Action::Down)
    }

    pub fn speed(&self) -> bool {
        self.is_pressed(Action::Speed)
    }

    pub fn jump(&self) -> bool {
        self.is_pressed(Action::Jump)
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|f| *f)
    }
}

impl From<[bool; Actions::LEN]> for Actions {
    fn from(flags: [bool; Actions::LEN]) -> Self {
        Actions(flags)
    }
}

impl Display for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = Action::ALL
            .iter()
            .filter(|a| self.is_pressed(**a))
            .map(|a| a.name())
            .collect::<Vec<_>>();
        if names.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", names.join(" "))
        }
    }
}
