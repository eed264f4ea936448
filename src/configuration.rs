//! Config for the simulator behaviors
//!
//! This module provides configuration options for controlling the behavior of the simulator,
//! independently of the episodes it runs (see [`crate::episode`] for those).
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional. Set a flag to `"true"` (case-insensitive) to enable it.
//!
//! - `ARENA_VERBOSE`: Print slow agents and episode outcomes to stdout (default: `false`)
//! - `ARENA_LOG`: Enable logging to a file (default: `false`)
//! - `ARENA_STREAM_FRAMES`: Open the frame streaming socket (default: `true`)
//! - `ARENA_ACTION_BUDGET_MS`: Time budget of one decision (default: `40`)
//! - `ARENA_GRACE_MS`: Overrun tolerated before reporting a slow agent (default: `10`)

use std::time::Duration;

use crate::timer::{ACTION_BUDGET, GRACE_TIME};

/// Configuration for simulator behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) stream_frames: bool,
    pub(crate) action_budget: Duration,
    pub(crate) grace_time: Duration,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Nothing is printed to stdout.
    /// - Logging to file is disabled.
    /// - A frame streaming socket is opened.
    /// - Each decision gets 40ms, overruns up to 10ms are tolerated.
    pub fn new() -> Self {
        Self {
            verbose: false,
            log: false,
            stream_frames: true,
            action_budget: ACTION_BUDGET,
            grace_time: GRACE_TIME,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Any other value (including unset) will result in using the default value for each field.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_millis(var: &str, default: Duration) -> Duration {
            std::env::var(var)
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        }

        Self {
            verbose: get_env_flag("ARENA_VERBOSE", false),
            log: get_env_flag("ARENA_LOG", false),
            stream_frames: get_env_flag("ARENA_STREAM_FRAMES", true),
            action_budget: get_env_millis("ARENA_ACTION_BUDGET_MS", ACTION_BUDGET),
            grace_time: get_env_millis("ARENA_GRACE_MS", GRACE_TIME),
        }
    }

    /// Enable or disable printing to stdout.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Enable or disable the frame streaming socket.
    pub fn with_frame_streaming(mut self, value: bool) -> Self {
        self.stream_frames = value;
        self
    }

    /// Sets the time budget of a single decision.
    ///
    /// The budget is advisory: agents are never interrupted.
    pub fn with_action_budget(mut self, budget: Duration) -> Self {
        self.action_budget = budget;
        self
    }

    /// Sets the overrun tolerated before a slow decision is reported.
    pub fn with_grace_time(mut self, grace: Duration) -> Self {
        self.grace_time = grace;
        self
    }

    pub fn action_budget(&self) -> Duration {
        self.action_budget
    }

    pub fn grace_time(&self) -> Duration {
        self.grace_time
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
