//! Module defining traits that need to be implemented to use the simulator
//!
//! The physics, the tile map and the level format all live behind [`World`]. Drawing lives
//! behind [`Renderer`]. The simulator only drives them.

use std::fmt::Display;

use crate::actions::Actions;
use crate::agent::KeyEvent;
use crate::events::GameEvent;
use crate::frame::Frame;

/// Size of a tile, in pixels
pub const TILE_SIZE: f32 = 16.0;

/// Status of a world. Everything but [`GameStatus::Running`] ends the episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Running,
    Win,
    Lose,
    TimeOut,
}

impl GameStatus {
    pub fn is_running(self) -> bool {
        self == GameStatus::Running
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GameStatus::Running => "running",
            GameStatus::Win => "win",
            GameStatus::Lose => "lose",
            GameStatus::TimeOut => "time out",
        };
        write!(f, "{s}")
    }
}

/// Ordinal upgrade level of the character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerState {
    #[default]
    Small,
    Large,
    Fire,
}

impl PowerState {
    /// `0` small, `1` large, `2` (or more) fire. Negative values are small.
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            i32::MIN..=0 => PowerState::Small,
            1 => PowerState::Large,
            _ => PowerState::Fire,
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            PowerState::Small => 0,
            PowerState::Large => 1,
            PowerState::Fire => 2,
        }
    }

    pub fn is_large(self) -> bool {
        self >= PowerState::Large
    }

    pub fn is_fire(self) -> bool {
        self == PowerState::Fire
    }
}

/// Read-only view of the character
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Character {
    pub x: f32,
    pub y: f32,
    pub x_speed: f32,
    pub y_speed: f32,
    pub power: PowerState,
    pub on_ground: bool,
}

impl Character {
    /// Tile column the character stands in
    pub fn tile_x(&self) -> i32 {
        (self.x / TILE_SIZE).floor() as i32
    }

    pub fn tile_y(&self) -> i32 {
        (self.y / TILE_SIZE).floor() as i32
    }
}

/// Static geometry of the loaded level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelGeometry {
    /// Tile column of the exit
    pub exit_tile_x: i32,
    /// Level width, in pixels
    pub width: f32,
    /// Level height, in pixels
    pub height: f32,
}

/// What the simulator tells a world when creating it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldOptions {
    /// Time limit in milliseconds, `<= 0` means unlimited.
    pub time_limit_ms: i64,
    /// Whether the episode is visualized (worlds may skip sprite bookkeeping otherwise).
    pub visuals: bool,
    /// Emitting an event matching one of these (same kind and param) kills the character.
    pub kill_events: Vec<GameEvent>,
}

/// What the world should implement.
///
/// A world is the authoritative simulation state. The simulator never mutates it except through
/// [`World::advance`].
///
/// `Clone` is the forward-model copy: it must be a deep copy. Mutating a clone, advancing it or
/// cloning it again must never be observable through the original. No `Rc<RefCell<_>>` or other
/// shared mutable substructure may be reachable from a world.
pub trait World: Clone {
    /// Build the world from level data.
    ///
    /// # Error
    /// Returned when the level data cannot be parsed. This aborts the episode.
    fn initialize(level: &str, options: &WorldOptions) -> anyhow::Result<Self>;

    /// Set the character power state. Only called before the first update.
    fn set_power_state(&mut self, power: PowerState);

    /// Advance the simulation by exactly one tick.
    fn advance(&mut self, actions: Actions);

    fn status(&self) -> GameStatus;

    /// Number of ticks advanced so far
    fn current_tick(&self) -> u32;

    /// Remaining time in milliseconds. Meaningless when the time limit is unlimited.
    fn remaining_time_ms(&self) -> i64;

    /// Events emitted by the last call to [`World::advance`], in emission order.
    fn last_tick_events(&self) -> &[GameEvent];

    fn character(&self) -> Character;

    fn geometry(&self) -> LevelGeometry;
}

/// What a visualization backend should implement.
///
/// Rendering is best effort and never affects the simulation.
pub trait Renderer<W: World> {
    /// Prepare the output (window, texture...) for a `width` x `height` surface displayed at `scale`.
    ///
    /// # Error
    /// On error, the episode runs without visuals.
    fn open(&mut self, _width: usize, _height: usize, _scale: f32) -> anyhow::Result<()> {
        Ok(())
    }

    /// Draw `world` into `target`, and display it if the renderer owns a display.
    fn render(&mut self, world: &W, target: &mut Frame);

    /// Keyboard input received since last call.
    fn poll_input(&mut self) -> Vec<KeyEvent> {
        vec![]
    }
}

/// Renderer that draws nothing. Frames stay black.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl<W: World> Renderer<W> for NullRenderer {
    fn render(&mut self, _world: &W, _target: &mut Frame) {}
}

#[cfg(test)]
mod interface_tests {
    use super::*;

    #[test]
    fn test_power_state_ordinals() {
        assert_eq!(PowerState::from_ordinal(-3), PowerState::Small);
        assert_eq!(PowerState::from_ordinal(0), PowerState::Small);
        assert_eq!(PowerState::from_ordinal(1), PowerState::Large);
        assert_eq!(PowerState::from_ordinal(2), PowerState::Fire);
        assert_eq!(PowerState::from_ordinal(7), PowerState::Fire);
        for power in [PowerState::Small, PowerState::Large, PowerState::Fire] {
            assert_eq!(PowerState::from_ordinal(power.ordinal() as i32), power);
        }
        assert!(PowerState::Fire.is_large());
        assert!(!PowerState::Small.is_large());
    }

    #[test]
    fn test_character_tiles() {
        let character = Character {
            x: 47.9,
            y: 16.0,
            ..Default::default()
        };
        assert_eq!(character.tile_x(), 2);
        assert_eq!(character.tile_y(), 1);
    }

    #[test]
    fn test_status() {
        assert!(GameStatus::Running.is_running());
        assert!(!GameStatus::TimeOut.is_running());
        assert_eq!(GameStatus::Win.to_string(), "win");
    }
}
