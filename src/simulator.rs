//! Core simulation loop.
//!
//! This module defines the [`Simulator`] type, which owns the authoritative world and drives it
//! tick by tick. Its responsibilities include:
//!
//! - Building the world from level data and letting it settle with a neutral tick zero
//! - Asking the agent for actions under a soft [`Deadline`], handing it a [`ForwardModel`] copy
//! - Advancing the world once per decision and collecting events, decision records and rewards
//! - Rendering and pacing the loop at the requested frame rate
//! - Streaming rendered frames to an external process (see [`crate::stream`])
//!
//! # Timed loop
//!
//! [`Simulator::run_episode`] runs until the world stops running. Each tick, unless paused:
//!
//! 1. a fresh deadline is started and the agent decides on a fresh copy of the world,
//! 2. the world advances exactly once with the returned actions,
//! 3. the tick's events and one [`AgentEvent`] are appended to the history.
//!
//! Then, paused or not, the frame is rendered (if visualized) and the loop sleeps until the next
//! scheduled frame. An agent exceeding its deadline is reported, never interrupted.
//!
//! Pause and interruption come from [`PauseHandle`] and [`InterruptHandle`], usable from any
//! thread while the episode runs. A paused loop blocks on them instead of spinning.
//!
//! # Step API
//!
//! Embedding code can drive the world itself instead: [`Simulator::reset`], then
//! [`Simulator::step`] with the five flags, and query [`Simulator::is_done`],
//! [`Simulator::compute_reward`], [`Simulator::completion_percentage`],
//! [`Simulator::height_bonus`] and [`Simulator::compute_observation`].

use anyhow::Context;
use tracing::{debug, info, instrument, trace, warn};

use crate::actions::Actions;
use crate::agent::{Agent, HumanAgent, Key};
use crate::configuration::Configuration;
use crate::episode::EpisodeConfig;
use crate::events::AgentEvent;
use crate::forward_model::ForwardModel;
use crate::frame::{Frame, FRAME_HEIGHT, FRAME_WIDTH};
use crate::game_interface::{NullRenderer, Renderer, World};
use crate::logger::init_logger;
use crate::pacing::{Controls, InterruptHandle, Pacer, Pacing, PauseHandle};
use crate::result::EpisodeResult;
use crate::reward::{self, RewardTracker};
use crate::stream::{frame_byte_len, FrameStreamer};
use crate::timer::Deadline;

const NO_LEVEL: &str = "no level loaded, call `reset` first";

/// The simulation driver.
///
/// # Type Parameters
/// - `W`: The world type implementing [`World`]
/// - `R`: The renderer implementing [`Renderer<W>`], [`NullRenderer`] when headless
pub struct Simulator<W: World, R: Renderer<W> = NullRenderer> {
    config: Configuration,
    renderer: R,
    renderer_open: bool,
    frame: Frame,
    streamer: Option<FrameStreamer>,
    controls: Controls,
    world: Option<W>,
    reward: RewardTracker,
}

impl<W: World> Simulator<W, NullRenderer> {
    /// Create a [`Simulator`] that never draws anything.
    pub fn headless(config: Configuration) -> Self {
        Self::new(config, NullRenderer)
    }
}

impl<W: World, R: Renderer<W>> Simulator<W, R> {
    /// Create a [`Simulator`] with given [`Configuration`] and [`Renderer`].
    ///
    /// Unless disabled in `config`, a frame streaming socket is bound right away, see
    /// [`Simulator::port`].
    #[instrument(skip_all)]
    pub fn new(config: Configuration, renderer: R) -> Self {
        if config.log {
            if let Err(e) = init_logger() {
                eprintln!("could not initialize file logger: {e:#}");
            }
        }

        trace!(?config);

        let streamer = config
            .stream_frames
            .then(|| FrameStreamer::bind(FRAME_WIDTH, FRAME_HEIGHT));

        Simulator {
            config,
            renderer,
            renderer_open: false,
            frame: Frame::new(FRAME_WIDTH, FRAME_HEIGHT),
            streamer,
            controls: Controls::new(),
            world: None,
            reward: RewardTracker::new(),
        }
    }

    /// Plays an episode with an [`Agent`].
    ///
    /// # Returns
    /// The final world with every event and decision of the episode. An episode interrupted
    /// through an [`InterruptHandle`] returns what was accumulated so far.
    ///
    /// # Errors
    /// Returns an error if the world cannot be built from `level`.
    #[instrument(skip_all, fields(agent = agent.name()))]
    pub fn run_episode<A: Agent<W> + ?Sized>(
        &mut self,
        agent: &mut A,
        level: &str,
        episode: &EpisodeConfig,
    ) -> anyhow::Result<EpisodeResult<W>> {
        let visuals = episode.visuals() && self.open_renderer(episode.scale());
        let mut world = self.load_level(level, episode, visuals)?;
        let mut pacer = Pacer::new(episode.fps());
        self.controls.reset();

        agent.initialize(
            ForwardModel::snapshot(&world),
            &Deadline::new(self.config.action_budget),
        );

        let mut reward = RewardTracker::new();
        let mut game_events = vec![];
        let mut agent_events = vec![];
        let mut rewards = vec![];

        while world.status().is_running() {
            if visuals {
                self.dispatch_input(agent);
            }

            if !self.controls.is_paused() {
                let deadline = Deadline::new(self.config.action_budget);
                let actions = agent.decide(ForwardModel::snapshot(&world), &deadline);
                self.report_overrun(&deadline, world.current_tick());

                world.advance(actions);
                rewards.push(reward.observe_world(&world));
                game_events.extend_from_slice(world.last_tick_events());
                agent_events.push(AgentEvent::record(actions, &world));
            }

            if visuals {
                self.renderer.render(&world, &mut self.frame);
            }

            if pacer.wait(&self.controls) == Pacing::Interrupted {
                info!(tick = world.current_tick(), "episode interrupted");
                break;
            }
        }

        info!(
            status = %world.status(),
            decisions = agent_events.len(),
            events = game_events.len(),
            "episode finished"
        );
        if self.config.verbose {
            println!(
                "{}: {} after {} ticks, completion {:.2}",
                agent.name(),
                world.status(),
                world.current_tick(),
                reward::completion_fraction(&world)
            );
        }

        let result = EpisodeResult::new(world.clone(), game_events, agent_events, rewards);
        self.world = Some(world);
        self.reward = reward;
        Ok(result)
    }

    /// Plays an episode controlled from the keyboard, with visuals on.
    pub fn play_game(
        &mut self,
        level: &str,
        episode: &EpisodeConfig,
    ) -> anyhow::Result<EpisodeResult<W>> {
        let mut agent = HumanAgent::new();
        self.run_episode(&mut agent, level, &episode.visualized())
    }

    /// Freeze or unfreeze simulation time. Rendering and pacing go on while paused.
    ///
    /// Each episode starts unpaused. Use [`Simulator::pause_handle`] while an episode runs.
    pub fn toggle_pause(&self) {
        let paused = self.controls.toggle_pause();
        debug!(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.controls.is_paused()
    }

    /// Handle able to pause the running episode from another thread, or from the agent itself.
    pub fn pause_handle(&self) -> PauseHandle {
        self.controls.pause_handle()
    }

    /// Handle able to end the running episode from another thread, at its next wait.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.controls.interrupt_handle()
    }

    /// Port of the frame streaming socket, `None` if streaming is disabled or binding failed.
    pub fn port(&self) -> Option<u16> {
        self.streamer.as_ref().and_then(FrameStreamer::port)
    }

    /// Size in bytes of one streamed frame
    pub fn frame_size(&self) -> usize {
        self.streamer
            .as_ref()
            .map(FrameStreamer::frame_size)
            .unwrap_or(frame_byte_len(FRAME_WIDTH, FRAME_HEIGHT))
    }

    /// Last rendered frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// World of the last episode or of the step API
    pub fn world(&self) -> Option<&W> {
        self.world.as_ref()
    }

    /// Load a level for the step API, with an unlimited time if `time_limit <= 0`.
    pub fn reset(&mut self, level: &str, time_limit: i32) -> anyhow::Result<()> {
        let episode = EpisodeConfig::builder()
            .with_time_limit(time_limit)
            .with_visuals(true)
            .build()?;
        self.reset_with(level, &episode)
    }

    /// Load a level for the step API with full episode parameters.
    ///
    /// Frame rate and scale are ignored: stepping is driven by the caller.
    #[instrument(skip_all)]
    pub fn reset_with(&mut self, level: &str, episode: &EpisodeConfig) -> anyhow::Result<()> {
        let visuals = episode.visuals() && (self.renderer_open || self.open_renderer(1.0));
        let world = self.load_level(level, episode, visuals)?;
        self.world = Some(world);
        self.reward.reset();
        Ok(())
    }

    /// Advance the loaded world by one tick. Flags are in the fixed action order.
    pub fn step(
        &mut self,
        left: bool,
        right: bool,
        down: bool,
        speed: bool,
        jump: bool,
    ) -> anyhow::Result<()> {
        let world = self.world.as_mut().context(NO_LEVEL)?;
        world.advance(Actions::new(left, right, down, speed, jump));
        Ok(())
    }

    /// True when the loaded world stopped running, or when no level is loaded.
    pub fn is_done(&self) -> bool {
        self.world
            .as_ref()
            .map_or(true, |world| !world.status().is_running())
    }

    /// Reward of the last tick. Call once per step: the progress marker moves.
    pub fn compute_reward(&mut self) -> anyhow::Result<f32> {
        let world = self.world.as_ref().context(NO_LEVEL)?;
        Ok(self.reward.observe_world(world))
    }

    pub fn completion_percentage(&self) -> anyhow::Result<f32> {
        let world = self.world.as_ref().context(NO_LEVEL)?;
        Ok(reward::completion_fraction(world))
    }

    pub fn height_bonus(&self) -> anyhow::Result<f32> {
        let world = self.world.as_ref().context(NO_LEVEL)?;
        Ok(reward::height_bonus(world))
    }

    /// Render the loaded world and write the frame to the streaming client.
    ///
    /// Blocks until the whole frame is written.
    pub fn compute_observation(&mut self) -> anyhow::Result<()> {
        let world = self.world.as_ref().context(NO_LEVEL)?;
        self.renderer.render(world, &mut self.frame);
        let streamer = self
            .streamer
            .as_mut()
            .context("frame streaming is disabled")?;
        streamer.send(&self.frame)
    }

    /// Build the world, set the power state and run the neutral tick zero.
    fn load_level(
        &self,
        level: &str,
        episode: &EpisodeConfig,
        visuals: bool,
    ) -> anyhow::Result<W> {
        let mut options = episode.world_options();
        options.visuals = visuals;
        let mut world = W::initialize(level, &options).context("could not initialize world")?;
        world.set_power_state(episode.power_state());
        world.advance(Actions::NONE);
        trace!(tick = world.current_tick(), status = %world.status(), "world ready");
        Ok(world)
    }

    fn open_renderer(&mut self, scale: f32) -> bool {
        match self.renderer.open(FRAME_WIDTH, FRAME_HEIGHT, scale) {
            Ok(()) => self.renderer_open = true,
            Err(e) => {
                warn!("could not open renderer, running without visuals: {e:#}");
                self.renderer_open = false;
            }
        }
        self.renderer_open
    }

    /// Pause key is for the simulator, every other key goes to agents listening to input.
    fn dispatch_input<A: Agent<W> + ?Sized>(&mut self, agent: &mut A) {
        for event in self.renderer.poll_input() {
            if event.key == Key::Pause {
                if event.pressed {
                    self.toggle_pause();
                }
            } else if let Some(listener) = agent.input_listener() {
                listener.on_key(event);
            }
        }
    }

    fn report_overrun(&self, deadline: &Deadline, tick: u32) {
        if deadline.overrun(self.config.grace_time).is_some() {
            let slowdown = deadline.elapsed().saturating_sub(deadline.budget());
            warn!(
                tick,
                slowdown_ms = slowdown.as_millis() as u64,
                "agent is slowing down the game"
            );
            if self.config.verbose {
                println!(
                    "The agent is slowing down the game by: {} msec.",
                    slowdown.as_millis()
                );
            }
        }
    }
}
