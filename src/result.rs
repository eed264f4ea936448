//! Outcome of an episode.

use crate::events::{AgentEvent, EventKind, GameEvent};
use crate::game_interface::{GameStatus, PowerState, World};
use crate::reward;

/// Final world, every event in tick order, one record per decision, and the reward of each
/// decision. Immutable once built.
#[derive(Debug, Clone)]
pub struct EpisodeResult<W: World> {
    world: W,
    game_events: Vec<GameEvent>,
    agent_events: Vec<AgentEvent>,
    rewards: Vec<f32>,
}

impl<W: World> EpisodeResult<W> {
    pub(crate) fn new(
        world: W,
        game_events: Vec<GameEvent>,
        agent_events: Vec<AgentEvent>,
        rewards: Vec<f32>,
    ) -> Self {
        EpisodeResult {
            world,
            game_events,
            agent_events,
            rewards,
        }
    }

    /// World as it was when the episode ended
    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn status(&self) -> GameStatus {
        self.world.status()
    }

    pub fn completion_percentage(&self) -> f32 {
        reward::completion_fraction(&self.world)
    }

    pub fn remaining_time_ms(&self) -> i64 {
        self.world.remaining_time_ms()
    }

    pub fn power_state(&self) -> PowerState {
        self.world.character().power
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.game_events
    }

    pub fn agent_events(&self) -> &[AgentEvent] {
        &self.agent_events
    }

    /// Reward of each decision, same length as [`EpisodeResult::agent_events`]
    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    pub fn total_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }

    /// Number of events of the given kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.game_events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn kills_total(&self) -> usize {
        self.game_events.iter().filter(|e| e.kind.is_kill()).count()
    }

    pub fn kills_by_stomp(&self) -> usize {
        self.count(EventKind::StompKill)
    }

    pub fn kills_by_fire(&self) -> usize {
        self.count(EventKind::FireKill)
    }

    pub fn kills_by_shell(&self) -> usize {
        self.count(EventKind::ShellKill)
    }

    pub fn kills_by_fall(&self) -> usize {
        self.count(EventKind::FallKill)
    }

    pub fn num_jumps(&self) -> usize {
        self.count(EventKind::Jump)
    }

    pub fn num_hurts(&self) -> usize {
        self.count(EventKind::Hurt)
    }

    pub fn num_collected(&self) -> usize {
        self.count(EventKind::Collect)
    }

    /// Longest horizontal distance between a jump and the following landing
    pub fn max_x_jump(&self) -> f32 {
        self.jumps()
            .map(|(jump, land)| (land.x - jump.x).abs())
            .fold(0.0, f32::max)
    }

    /// Longest time in the air, in ticks
    pub fn max_jump_air_time(&self) -> u32 {
        self.jumps()
            .map(|(jump, land)| land.tick.saturating_sub(jump.tick))
            .max()
            .unwrap_or(0)
    }

    /// Pairs each jump with the landing that ends it. A jump never landed is ignored.
    fn jumps(&self) -> impl Iterator<Item = (&GameEvent, &GameEvent)> {
        let mut start: Option<&GameEvent> = None;
        self.game_events.iter().filter_map(move |event| match event.kind {
            EventKind::Jump => {
                start = Some(event);
                None
            }
            EventKind::Land => start.take().map(|jump| (jump, event)),
            _ => None,
        })
    }
}
