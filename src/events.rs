//! Events emitted by the world and decision records produced by the driver.

use std::fmt::Display;

use crate::actions::Actions;
use crate::game_interface::{PowerState, World};

/// Kind of a [`GameEvent`].
///
/// Each kind carries a stable 1-based numeric code, shared with external clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Character bumped a block from below
    Bump,
    /// Enemy killed by jumping on it
    StompKill,
    /// Enemy killed by a fireball
    FireKill,
    /// Enemy fell out of the level
    FallKill,
    /// Enemy killed by a kicked shell
    ShellKill,
    /// Character got hurt and lost a power level
    Hurt,
    /// Character died
    Lose,
    /// Character reached the exit
    Win,
    /// Character collected an item (coin, mushroom, flower...)
    Collect,
    /// Character left the ground
    Jump,
    /// Character touched the ground again
    Land,
    /// Character kicked a shell
    Kick,
}

impl EventKind {
    pub const ALL: [EventKind; 12] = [
        EventKind::Bump,
        EventKind::StompKill,
        EventKind::FireKill,
        EventKind::FallKill,
        EventKind::ShellKill,
        EventKind::Hurt,
        EventKind::Lose,
        EventKind::Win,
        EventKind::Collect,
        EventKind::Jump,
        EventKind::Land,
        EventKind::Kick,
    ];

    /// Stable numeric code, starting at 1.
    pub fn code(self) -> u8 {
        match self {
            EventKind::Bump => 1,
            EventKind::StompKill => 2,
            EventKind::FireKill => 3,
            EventKind::FallKill => 4,
            EventKind::ShellKill => 5,
            EventKind::Hurt => 6,
            EventKind::Lose => 7,
            EventKind::Win => 8,
            EventKind::Collect => 9,
            EventKind::Jump => 10,
            EventKind::Land => 11,
            EventKind::Kick => 12,
        }
    }

    pub fn from_code(code: u8) -> Option<EventKind> {
        Self::ALL.iter().copied().find(|k| k.code() == code)
    }

    /// True for every way of killing an enemy
    pub fn is_kill(self) -> bool {
        matches!(
            self,
            EventKind::StompKill | EventKind::FireKill | EventKind::ShellKill | EventKind::FallKill
        )
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Something that happened inside the world during one tick. Read-only for the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameEvent {
    pub kind: EventKind,
    /// Kind-specific detail (enemy type, collected item...), defined by the world.
    pub param: i32,
    /// Tick in which the event occurred
    pub tick: u32,
    pub x: f32,
    pub y: f32,
}

impl GameEvent {
    pub fn new(kind: EventKind, param: i32, tick: u32, x: f32, y: f32) -> Self {
        GameEvent {
            kind,
            param,
            tick,
            x,
            y,
        }
    }

    /// Pattern used to describe a kill event: only kind and param matter.
    pub fn pattern(kind: EventKind, param: i32) -> Self {
        Self::new(kind, param, 0, 0.0, 0.0)
    }

    /// Same kind and same param, ignoring when and where it happened.
    pub fn matches(&self, other: &GameEvent) -> bool {
        self.kind == other.kind && self.param == other.param
    }
}

/// One agent decision, recorded once per non-paused tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentEvent {
    pub actions: Actions,
    pub x: f32,
    pub y: f32,
    pub power: PowerState,
    pub on_ground: bool,
    pub tick: u32,
}

impl AgentEvent {
    /// Record `actions` together with the character state right after they were applied.
    pub fn record<W: World>(actions: Actions, world: &W) -> Self {
        let character = world.character();
        AgentEvent {
            actions,
            x: character.x,
            y: character.y,
            power: character.power,
            on_ground: character.on_ground,
            tick: world.current_tick(),
        }
    }
}

#[cfg(test)]
mod events_tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(EventKind::from_code(0), None);
        assert_eq!(EventKind::from_code(13), None);
        assert_eq!(EventKind::Collect.code(), 9);
    }

    #[test]
    fn test_kill_kinds() {
        let kills = EventKind::ALL
            .iter()
            .filter(|k| k.is_kill())
            .collect::<Vec<_>>();
        assert_eq!(kills.len(), 4);
        assert!(!EventKind::Kick.is_kill());
    }

    #[test]
    fn test_matches_ignores_position() {
        let event = GameEvent::new(EventKind::StompKill, 2, 40, 120.0, 32.0);
        assert!(event.matches(&GameEvent::pattern(EventKind::StompKill, 2)));
        assert!(!event.matches(&GameEvent::pattern(EventKind::StompKill, 3)));
        assert!(!event.matches(&GameEvent::pattern(EventKind::FireKill, 2)));
    }
}
