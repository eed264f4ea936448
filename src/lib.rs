//! # Platformer Arena
//!
//! A stepped evaluation harness letting AI agents play deterministic 2D platformer levels, and
//! reporting what happened.
//!
//! It provides:
//! - A fixed-cadence simulation loop (`Simulator`) with soft, per-decision time budgets
//! - Forward models: isolated copies of the world agents can search over
//! - Event history, decision records and a scalar reward signal for training
//! - A loopback frame-streaming bridge for external (non-Rust) clients
//! - A step API to drive the world tick by tick from embedding code
//!
//! The world itself (physics, tiles, level parsing) and the renderer are not part of this crate:
//! implement [`World`] and, optionally, [`Renderer`].
//!
//! # Documentation Overview
//!
//! - For the loop, pausing and the step API, see the [`simulator`] module.
//! - For simulator-wide settings, see [`Configuration`](crate::configuration::Configuration);
//!   for per-episode settings, see [`EpisodeConfigBuilder`](crate::episode::EpisodeConfigBuilder).
//! - For implementing agents, check out the [`Agent`] trait and the [`forward_model`] module.
//! - For the frame protocol, see the [`stream`] module.
//! - For the reward signal, see the [`reward`] module.
//!
//! # Usage Example
//!
//! ```no_run
//! # #[derive(Clone)]
//! # struct YourWorld;
//! # impl platformer_arena::game_interface::World for YourWorld {
//! #     fn initialize(_level: &str, _options: &WorldOptions) -> anyhow::Result<Self> { Ok(YourWorld) }
//! #     fn set_power_state(&mut self, _power: PowerState) {}
//! #     fn advance(&mut self, _actions: Actions) {}
//! #     fn status(&self) -> GameStatus { GameStatus::Win }
//! #     fn current_tick(&self) -> u32 { 0 }
//! #     fn remaining_time_ms(&self) -> i64 { 0 }
//! #     fn last_tick_events(&self) -> &[GameEvent] { &[] }
//! #     fn character(&self) -> Character { Character::default() }
//! #     fn geometry(&self) -> LevelGeometry {
//! #         LevelGeometry { exit_tile_x: 1, width: 16.0, height: 16.0 }
//! #     }
//! # }
//! use platformer_arena::prelude::*;
//!
//! struct AlwaysRight;
//!
//! impl<W: World> Agent<W> for AlwaysRight {
//!     fn decide(&mut self, _model: ForwardModel<W>, _deadline: &Deadline) -> Actions {
//!         Actions::pressed(&[Action::Right, Action::Speed])
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new().with_frame_streaming(false);
//!     let mut simulator: Simulator<YourWorld> = Simulator::headless(config);
//!
//!     let episode = EpisodeConfigBuilder::new()
//!         .with_time_limit(20)
//!         .with_power_state(PowerState::Large)
//!         .build()?;
//!     let result = simulator.run_episode(&mut AlwaysRight, "level data", &episode)?;
//!
//!     println!(
//!         "{} with {:.0}% completion, reward {}",
//!         result.status(),
//!         100.0 * result.completion_percentage(),
//!         result.total_reward()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! # Search Agents
//!
//! Each decision receives its own [`ForwardModel`]: advance it, clone it, throw it away. The
//! simulator's world is never affected. The [`Deadline`] is advisory: check
//! [`Deadline::remaining_ms`] to stop searching in time, the simulator only reports overruns.

pub mod actions;
pub mod agent;
pub mod configuration;
pub mod episode;
pub mod events;
pub mod forward_model;
pub mod frame;
pub mod game_interface;
mod logger;
pub mod pacing;
pub mod result;
pub mod reward;
pub mod simulator;
pub mod stream;
pub mod timer;

pub use anyhow;

pub use agent::Agent;
pub use forward_model::ForwardModel;
pub use game_interface::{Renderer, World};
pub use timer::Deadline;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use platformer_arena::prelude::*;
/// ```
pub mod prelude {
    pub use crate::actions::{Action, Actions};
    pub use crate::agent::{Agent, HumanAgent, InputListener, Key, KeyEvent, ReplayAgent};
    pub use crate::configuration::Configuration;
    pub use crate::episode::{EpisodeConfig, EpisodeConfigBuilder};
    pub use crate::events::{AgentEvent, EventKind, GameEvent};
    pub use crate::forward_model::ForwardModel;
    pub use crate::frame::{Frame, Rgb, FRAME_HEIGHT, FRAME_WIDTH};
    pub use crate::game_interface::{
        Character, GameStatus, LevelGeometry, NullRenderer, PowerState, Renderer, World,
        WorldOptions, TILE_SIZE,
    };
    pub use crate::pacing::{InterruptHandle, PauseHandle};
    pub use crate::result::EpisodeResult;
    pub use crate::reward::RewardTracker;
    pub use crate::simulator::Simulator;
    pub use crate::timer::Deadline;
}
