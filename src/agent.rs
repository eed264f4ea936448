//! What an agent should implement, and the built-in agents.
//!
//! Agents only ever see [`ForwardModel`] copies of the world. Each decision comes with a
//! [`Deadline`] that the agent should check by itself: nothing stops an agent that ignores it,
//! the simulator only reports the overrun.
//!
//! Agents reacting to keyboard input expose the [`InputListener`] capability through
//! [`Agent::input_listener`]; the simulator forwards renderer input only to those.

use std::collections::VecDeque;

use crate::actions::{Action, Actions};
use crate::events::AgentEvent;
use crate::forward_model::ForwardModel;
use crate::game_interface::World;
use crate::timer::Deadline;

/// Keys understood by the simulator and the built-in agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Down,
    Speed,
    Jump,
    /// Toggles pause, handled by the simulator itself
    Pause,
}

impl Key {
    /// Action driven by this key, if any
    pub fn action(self) -> Option<Action> {
        match self {
            Key::Left => Some(Action::Left),
            Key::Right => Some(Action::Right),
            Key::Down => Some(Action::Down),
            Key::Speed => Some(Action::Speed),
            Key::Jump => Some(Action::Jump),
            Key::Pause => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        KeyEvent { key, pressed: true }
    }

    pub fn released(key: Key) -> Self {
        KeyEvent {
            key,
            pressed: false,
        }
    }
}

/// Capability of agents driven by keyboard input
pub trait InputListener {
    fn on_key(&mut self, event: KeyEvent);
}

/// What the agent should implement
pub trait Agent<W: World> {
    /// Called once, after the tick-zero update and before the first decision.
    fn initialize(&mut self, _model: ForwardModel<W>, _deadline: &Deadline) {}

    /// Select the actions of the current tick.
    ///
    /// `model` is a fresh copy of the world, the agent may advance and clone it freely.
    fn decide(&mut self, model: ForwardModel<W>, deadline: &Deadline) -> Actions;

    /// Name used in logs
    fn name(&self) -> &str {
        "agent"
    }

    /// `Some` if the agent wants keyboard input
    fn input_listener(&mut self) -> Option<&mut dyn InputListener> {
        None
    }
}

/// Agent controlled by a human through the renderer's keyboard input.
#[derive(Debug, Clone, Default)]
pub struct HumanAgent {
    actions: Actions,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputListener for HumanAgent {
    fn on_key(&mut self, event: KeyEvent) {
        if let Some(action) = event.key.action() {
            self.actions.set(action, event.pressed);
        }
    }
}

impl<W: World> Agent<W> for HumanAgent {
    fn initialize(&mut self, _model: ForwardModel<W>, _deadline: &Deadline) {
        self.actions = Actions::NONE;
    }

    fn decide(&mut self, _model: ForwardModel<W>, _deadline: &Deadline) -> Actions {
        self.actions
    }

    fn name(&self) -> &str {
        "human"
    }

    fn input_listener(&mut self) -> Option<&mut dyn InputListener> {
        Some(self)
    }
}

/// Agent replaying a recorded sequence of actions, then doing nothing.
#[derive(Debug, Clone, Default)]
pub struct ReplayAgent {
    recorded: Vec<Actions>,
    remaining: VecDeque<Actions>,
}

impl ReplayAgent {
    pub fn new(actions: impl IntoIterator<Item = Actions>) -> Self {
        let recorded = actions.into_iter().collect::<Vec<_>>();
        ReplayAgent {
            remaining: recorded.iter().copied().collect(),
            recorded,
        }
    }

    /// Replay the decisions of a previous episode
    pub fn from_records(records: &[AgentEvent]) -> Self {
        Self::new(records.iter().map(|r| r.actions))
    }

    /// Actions not replayed yet
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

impl<W: World> Agent<W> for ReplayAgent {
    fn initialize(&mut self, _model: ForwardModel<W>, _deadline: &Deadline) {
        self.remaining = self.recorded.iter().copied().collect();
    }

    fn decide(&mut self, _model: ForwardModel<W>, _deadline: &Deadline) -> Actions {
        self.remaining.pop_front().unwrap_or(Actions::NONE)
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod agent_tests {
    use super::*;

    #[test]
    fn test_human_agent_follows_keys() {
        let mut agent = HumanAgent::new();
        agent.on_key(KeyEvent::pressed(Key::Right));
        agent.on_key(KeyEvent::pressed(Key::Jump));
        agent.on_key(KeyEvent::pressed(Key::Pause));
        assert_eq!(agent.actions, Actions::pressed(&[Action::Right, Action::Jump]));
        agent.on_key(KeyEvent::released(Key::Jump));
        assert_eq!(agent.actions, Actions::pressed(&[Action::Right]));
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(Key::Speed.action(), Some(Action::Speed));
        assert_eq!(Key::Pause.action(), None);
    }

    #[test]
    fn test_replay_agent_order() {
        let first = Actions::pressed(&[Action::Left]);
        let second = Actions::pressed(&[Action::Jump]);
        let agent = ReplayAgent::new([first, second]);
        assert_eq!(agent.remaining(), 2);
        assert_eq!(agent.remaining.front(), Some(&first));
        assert_eq!(agent.remaining.back(), Some(&second));
    }
}
