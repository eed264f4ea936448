//! Scalar reward signal and progress queries.
//!
//! Reward of a tick, from the events emitted during that tick:
//! - collect: `+1`
//! - any kill: `+1`, only if the character stands past the progress marker
//! - hurt: `-1`
//! - win: `+10`
//! - everything else: `0`
//!
//! On top of that, moving more than [`STRIDE_TILES`] tiles past the progress marker gives `+1`
//! and moves the marker to the current tile.

use crate::events::{EventKind, GameEvent};
use crate::game_interface::{World, TILE_SIZE};

/// Forward progress, in tiles, rewarded once.
pub const STRIDE_TILES: i32 = 8;

pub const COLLECT_REWARD: f32 = 1.0;
pub const KILL_REWARD: f32 = 1.0;
pub const HURT_PENALTY: f32 = -1.0;
pub const WIN_REWARD: f32 = 10.0;
pub const STRIDE_REWARD: f32 = 1.0;

/// Keeps the progress marker of one episode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardTracker {
    last_tile: i32,
}

impl RewardTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the start of an episode
    pub fn reset(&mut self) {
        self.last_tile = 0;
    }

    /// Tile of the last stride bonus
    pub fn progress_tile(&self) -> i32 {
        self.last_tile
    }

    /// Reward of one tick, given the character tile after that tick and the tick's events.
    pub fn observe(&mut self, tile: i32, events: &[GameEvent]) -> f32 {
        let advanced = tile > self.last_tile;
        let mut reward: f32 = events
            .iter()
            .map(|event| event_reward(event.kind, advanced))
            .sum();

        if tile > self.last_tile + STRIDE_TILES {
            self.last_tile = tile;
            reward += STRIDE_REWARD;
        }
        reward
    }

    /// [`RewardTracker::observe`] applied to the last tick of `world`.
    pub fn observe_world<W: World>(&mut self, world: &W) -> f32 {
        self.observe(world.character().tile_x(), world.last_tick_events())
    }
}

fn event_reward(kind: EventKind, advanced: bool) -> f32 {
    match kind {
        EventKind::Collect => COLLECT_REWARD,
        EventKind::StompKill | EventKind::FireKill | EventKind::ShellKill | EventKind::FallKill => {
            if advanced {
                KILL_REWARD
            } else {
                0.0
            }
        }
        EventKind::Hurt => HURT_PENALTY,
        EventKind::Win => WIN_REWARD,
        EventKind::Bump | EventKind::Jump | EventKind::Land | EventKind::Kick | EventKind::Lose => {
            0.0
        }
    }
}

/// Horizontal position relative to the exit. `1.0` at the exit.
pub fn completion_fraction<W: World>(world: &W) -> f32 {
    let exit = world.geometry().exit_tile_x as f32 * TILE_SIZE;
    world.character().x / exit
}

/// Vertical position relative to the level height.
pub fn height_bonus<W: World>(world: &W) -> f32 {
    world.character().y / world.geometry().height
}

#[cfg(test)]
mod reward_tests {
    use super::*;

    fn kill(tick: u32) -> GameEvent {
        GameEvent::new(EventKind::StompKill, 0, tick, 0.0, 0.0)
    }

    #[test]
    fn test_event_rewards() {
        let mut tracker = RewardTracker::new();
        let events = [
            GameEvent::new(EventKind::Collect, 0, 1, 0.0, 0.0),
            GameEvent::new(EventKind::Jump, 0, 1, 0.0, 0.0),
            GameEvent::new(EventKind::Hurt, 0, 1, 0.0, 0.0),
            GameEvent::new(EventKind::Win, 0, 1, 0.0, 0.0),
        ];
        assert_eq!(tracker.observe(0, &events), 10.0);
    }

    #[test]
    fn test_kill_only_rewarded_past_marker() {
        let mut tracker = RewardTracker::new();
        assert_eq!(tracker.observe(0, &[kill(1)]), 0.0);
        assert_eq!(tracker.observe(3, &[kill(2)]), 1.0);
    }

    #[test]
    fn test_stride_rewarded_once() {
        let mut tracker = RewardTracker::new();
        let mut total = 0.0;
        for tile in 0..=8 {
            total += tracker.observe(tile, &[]);
        }
        assert_eq!(total, 0.0);

        assert_eq!(tracker.observe(9, &[]), 1.0);
        assert_eq!(tracker.progress_tile(), 9);
        for tile in 9..=17 {
            assert_eq!(tracker.observe(tile, &[]), 0.0);
        }
        assert_eq!(tracker.observe(18, &[]), 1.0);
    }

    #[test]
    fn test_kills_within_stride_do_not_add_stride_bonus() {
        let mut tracker = RewardTracker::new();
        assert_eq!(tracker.observe(9, &[kill(1)]), 2.0);
        // stuck on the same tile: kills are no longer rewarded, no second stride
        assert_eq!(tracker.observe(9, &[kill(2), kill(2)]), 0.0);
        assert_eq!(tracker.observe(9, &[kill(3)]), 0.0);
        assert_eq!(tracker.progress_tile(), 9);
    }

    #[test]
    fn test_reset() {
        let mut tracker = RewardTracker::new();
        tracker.observe(20, &[]);
        tracker.reset();
        assert_eq!(tracker.progress_tile(), 0);
        assert_eq!(tracker.observe(9, &[]), 1.0);
    }
}
