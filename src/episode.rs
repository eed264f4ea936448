//! Parameters of a single episode.
//!
//! # Overview
//!
//! The main entry point is the [`EpisodeConfigBuilder`] struct, which uses a builder pattern:
//!
//! - **Time limit**, in ticks of the level timer (`<= 0` is unlimited)
//! - **Initial power state** of the character
//! - **Visuals**: whether frames are rendered and displayed
//! - **Frame rate** the loop is paced at (`0` runs as fast as possible)
//! - **Scale** of the display
//! - **Kill events**: events that kill the character when emitted
//!
//! # Example
//!
//! ```
//! use platformer_arena::episode::EpisodeConfigBuilder;
//! use platformer_arena::game_interface::PowerState;
//!
//! let episode = EpisodeConfigBuilder::new()
//!     .with_time_limit(20)
//!     .with_power_state(PowerState::Large)
//!     .with_visuals(true)
//!     .build()
//!     .unwrap();
//! assert_eq!(episode.fps(), 30);
//! ```
//!
//! You may also construct an episode from environment variables using
//! [`EpisodeConfigBuilder::from_env()`].

use std::env;

use anyhow::{bail, ensure, Context};
use tracing::warn;

use crate::events::GameEvent;
use crate::game_interface::{PowerState, WorldOptions};

/// Frame rate of visualized episodes when none is given
pub const DEFAULT_VISUAL_FPS: u32 = 30;
/// Display scale when none is given
pub const DEFAULT_SCALE: f32 = 2.0;

#[derive(Debug, Default, Clone)]
pub struct EpisodeConfigBuilder {
    time_limit: Option<i32>,
    power: Option<PowerState>,
    power_ordinal: Option<String>,
    visuals: bool,
    fps: Option<u32>,
    scale: Option<f32>,
    kill_events: Vec<GameEvent>,
}

impl EpisodeConfigBuilder {
    /// Unlimited time, small character, no visuals, unpaced, scale 2.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder configured from environment variables.
    ///
    /// Read environment variables are:
    /// - `EPISODE_TIME_LIMIT` (i32): time limit, `<= 0` is unlimited
    /// - `EPISODE_POWER_STATE` (0, 1 or 2): small, large or fire
    /// - `EPISODE_VISUALS` (bool): `"true"` to render frames
    /// - `EPISODE_FPS` (u32): target frame rate
    /// - `EPISODE_SCALE` (f32): display scale
    ///
    /// Unparsable numbers are ignored, except the power state which is reported by
    /// [`EpisodeConfigBuilder::build`].
    #[must_use]
    pub fn from_env() -> Self {
        fn parse<T: std::str::FromStr>(var: &str) -> Option<T> {
            let value = env::var(var).ok()?;
            let parsed = value.parse().ok();
            if parsed.is_none() {
                warn!("ignoring {var}: could not parse '{value}'");
            }
            parsed
        }

        EpisodeConfigBuilder {
            time_limit: parse("EPISODE_TIME_LIMIT"),
            power: None,
            power_ordinal: env::var("EPISODE_POWER_STATE").ok(),
            visuals: env::var("EPISODE_VISUALS")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            fps: parse("EPISODE_FPS"),
            scale: parse("EPISODE_SCALE"),
            kill_events: vec![],
        }
    }

    /// Sets the level timer. Anything `<= 0` makes the time infinite.
    #[must_use]
    pub fn with_time_limit(self, time_limit: i32) -> Self {
        Self {
            time_limit: Some(time_limit),
            ..self
        }
    }

    /// Sets the power state the character starts with.
    #[must_use]
    pub fn with_power_state(self, power: PowerState) -> Self {
        Self {
            power: Some(power),
            power_ordinal: None,
            ..self
        }
    }

    /// Enable or disable rendering.
    ///
    /// Visualized episodes are paced at 30 fps unless [`with_fps`](Self::with_fps) is used.
    #[must_use]
    pub fn with_visuals(self, visuals: bool) -> Self {
        Self { visuals, ..self }
    }

    /// Sets the frame rate the loop follows. `0` runs as fast as possible.
    #[must_use]
    pub fn with_fps(self, fps: u32) -> Self {
        Self {
            fps: Some(fps),
            ..self
        }
    }

    /// Sets the scale applied to the displayed frame.
    #[must_use]
    pub fn with_scale(self, scale: f32) -> Self {
        Self {
            scale: Some(scale),
            ..self
        }
    }

    /// Adds an event that kills the character when the world emits it.
    ///
    /// Only kind and param are compared, see [`GameEvent::pattern`].
    #[must_use]
    pub fn with_kill_event(mut self, event: GameEvent) -> Self {
        self.kill_events.push(event);
        self
    }

    /// Consumes the builder and returns the episode parameters.
    ///
    /// # Errors
    ///
    /// Returned when the scale is not a positive number, or when the power state read from the
    /// environment is not `0`, `1` or `2`.
    pub fn build(self) -> anyhow::Result<EpisodeConfig> {
        let power = match (self.power, self.power_ordinal) {
            (Some(power), _) => power,
            (None, Some(ordinal)) => parse_power_state(&ordinal)?,
            (None, None) => PowerState::Small,
        };

        let scale = self.scale.unwrap_or(DEFAULT_SCALE);
        ensure!(
            scale.is_finite() && scale > 0.0,
            "scale must be a positive number, got {scale}"
        );

        let fps = self
            .fps
            .unwrap_or(if self.visuals { DEFAULT_VISUAL_FPS } else { 0 });

        Ok(EpisodeConfig {
            time_limit: self.time_limit.unwrap_or(0),
            power,
            visuals: self.visuals,
            fps,
            scale,
            kill_events: self.kill_events,
        })
    }
}

fn parse_power_state(s: &str) -> anyhow::Result<PowerState> {
    let ordinal: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("could not parse power state '{s}'"))?;
    if !(0..=2).contains(&ordinal) {
        bail!("power state must be 0 (small), 1 (large) or 2 (fire), got {ordinal}");
    }
    Ok(PowerState::from_ordinal(ordinal))
}

/// Obtained using [`EpisodeConfigBuilder`]. Immutable for the duration of an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeConfig {
    time_limit: i32,
    power: PowerState,
    visuals: bool,
    fps: u32,
    scale: f32,
    kill_events: Vec<GameEvent>,
}

impl EpisodeConfig {
    /// create an EpisodeConfigBuilder
    pub fn builder() -> EpisodeConfigBuilder {
        EpisodeConfigBuilder::new()
    }

    pub fn time_limit(&self) -> i32 {
        self.time_limit
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    pub fn visuals(&self) -> bool {
        self.visuals
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn kill_events(&self) -> &[GameEvent] {
        &self.kill_events
    }

    /// Same episode, with visuals forced on.
    pub(crate) fn visualized(&self) -> EpisodeConfig {
        EpisodeConfig {
            visuals: true,
            fps: if self.visuals || self.fps > 0 {
                self.fps
            } else {
                DEFAULT_VISUAL_FPS
            },
            ..self.clone()
        }
    }

    /// Options handed to the world. The time limit is converted to milliseconds.
    pub fn world_options(&self) -> WorldOptions {
        WorldOptions {
            time_limit_ms: time_limit_ms(self.time_limit),
            visuals: self.visuals,
            kill_events: self.kill_events.clone(),
        }
    }
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        EpisodeConfig {
            time_limit: 0,
            power: PowerState::Small,
            visuals: false,
            fps: 0,
            scale: DEFAULT_SCALE,
            kill_events: vec![],
        }
    }
}

/// Level timer in milliseconds, `0` when unlimited.
pub(crate) fn time_limit_ms(time_limit: i32) -> i64 {
    if time_limit <= 0 {
        0
    } else {
        1000 * i64::from(time_limit)
    }
}
