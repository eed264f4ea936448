//! Sandboxed copy of the world handed to agents.
//!
//! A [`ForwardModel`] owns its own world value. Agents may advance it, clone it as many times as
//! their search needs, and drop it: the simulator's world is never reachable from here.

use crate::actions::Actions;
use crate::events::GameEvent;
use crate::game_interface::{Character, GameStatus, LevelGeometry, World};
use crate::reward;

#[derive(Debug, Clone)]
pub struct ForwardModel<W: World> {
    world: W,
}

impl<W: World> ForwardModel<W> {
    /// Wrap an already copied world.
    pub fn new(world: W) -> Self {
        ForwardModel { world }
    }

    /// Copy `world` into a new model.
    pub fn snapshot(world: &W) -> Self {
        ForwardModel {
            world: world.clone(),
        }
    }

    /// Advance the copy by one tick
    pub fn advance(&mut self, actions: Actions) {
        self.world.advance(actions);
    }

    /// Advance the copy by `ticks` ticks with the same actions, stopping early if it ends.
    pub fn advance_for(&mut self, actions: Actions, ticks: u32) {
        for _ in 0..ticks {
            if !self.status().is_running() {
                break;
            }
            self.world.advance(actions);
        }
    }

    pub fn status(&self) -> GameStatus {
        self.world.status()
    }

    pub fn current_tick(&self) -> u32 {
        self.world.current_tick()
    }

    pub fn remaining_time_ms(&self) -> i64 {
        self.world.remaining_time_ms()
    }

    pub fn character(&self) -> Character {
        self.world.character()
    }

    pub fn geometry(&self) -> LevelGeometry {
        self.world.geometry()
    }

    /// Events emitted by the last advance of this copy
    pub fn events(&self) -> &[GameEvent] {
        self.world.last_tick_events()
    }

    pub fn completion_percentage(&self) -> f32 {
        reward::completion_fraction(&self.world)
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn into_world(self) -> W {
        self.world
    }
}

#[cfg(test)]
mod forward_model_tests {
    use super::*;
    use crate::events::EventKind;
    use crate::game_interface::{PowerState, WorldOptions};

    /// Walks right one pixel per tick, pushes an event each tick.
    #[derive(Clone, Debug, PartialEq)]
    struct Walker {
        x: f32,
        tick: u32,
        events: Vec<GameEvent>,
        history: Vec<u32>,
    }

    impl World for Walker {
        fn initialize(_level: &str, _options: &WorldOptions) -> anyhow::Result<Self> {
            Ok(Walker {
                x: 0.0,
                tick: 0,
                events: vec![],
                history: vec![],
            })
        }

        fn set_power_state(&mut self, _power: PowerState) {}

        fn advance(&mut self, actions: Actions) {
            self.tick += 1;
            if actions.right() {
                self.x += 1.0;
            }
            self.events = vec![GameEvent::new(EventKind::Jump, 0, self.tick, self.x, 0.0)];
            self.history.push(self.tick);
        }

        fn status(&self) -> GameStatus {
            if self.x >= 100.0 {
                GameStatus::Win
            } else {
                GameStatus::Running
            }
        }

        fn current_tick(&self) -> u32 {
            self.tick
        }

        fn remaining_time_ms(&self) -> i64 {
            0
        }

        fn last_tick_events(&self) -> &[GameEvent] {
            &self.events
        }

        fn character(&self) -> Character {
            Character {
                x: self.x,
                ..Default::default()
            }
        }

        fn geometry(&self) -> LevelGeometry {
            LevelGeometry {
                exit_tile_x: 10,
                width: 160.0,
                height: 16.0,
            }
        }
    }

    #[test]
    fn test_advancing_copy_leaves_original_untouched() {
        let world = Walker::initialize("", &WorldOptions::default()).unwrap();
        let before = world.clone();

        let mut model = ForwardModel::snapshot(&world);
        model.advance_for(Actions::pressed(&[crate::actions::Action::Right]), 10);

        assert_eq!(model.current_tick(), 10);
        assert_eq!(model.character().x, 10.0);
        assert_eq!(world, before);
        assert_eq!(world.current_tick(), 0);
        assert!(world.last_tick_events().is_empty());
    }

    #[test]
    fn test_nested_clones_are_independent() {
        let world = Walker::initialize("", &WorldOptions::default()).unwrap();
        let mut model = ForwardModel::snapshot(&world);
        model.advance(Actions::NONE);

        let mut branch = model.clone();
        branch.advance_for(Actions::NONE, 5);

        assert_eq!(model.current_tick(), 1);
        assert_eq!(model.world().history, vec![1]);
        assert_eq!(branch.current_tick(), 6);
        assert_eq!(world.current_tick(), 0);
    }

    #[test]
    fn test_advance_for_stops_on_end() {
        let world = Walker::initialize("", &WorldOptions::default()).unwrap();
        let mut model = ForwardModel::new(world);
        model.advance_for(Actions::pressed(&[crate::actions::Action::Right]), 500);
        assert_eq!(model.status(), GameStatus::Win);
        assert_eq!(model.current_tick(), 100);
        assert_eq!(model.completion_percentage(), 100.0 / 160.0);
    }
}
