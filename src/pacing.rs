//! Frame pacing and external control of the simulation loop.
//!
//! The next frame time accumulates a fixed delay from the start of the episode, so rounding
//! never drifts. Waits are interruptible through an [`InterruptHandle`]: an interrupted wait
//! ends the episode early, it is not an error.
//!
//! Pause lives behind a [`PauseHandle`] so it can be toggled from any thread while an episode
//! runs. A paused loop blocks on the control channel instead of spinning, even when unpaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest a paused loop blocks before coming back to poll renderer input.
pub const PAUSED_POLL: Duration = Duration::from_millis(10);

/// Fixed delay between two frames, zero when `fps` is zero (unpaced).
pub fn frame_delay(fps: u32) -> Duration {
    if fps == 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(1000 / u64::from(fps))
    }
}

/// Outcome of a pacing wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    Continue,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Interrupt,
    /// Pause state changed
    Wake,
}

/// Wakes a sleeping simulation loop, from any thread.
#[derive(Debug, Clone)]
pub struct InterruptHandle(Sender<Signal>);

impl InterruptHandle {
    /// Request the running episode to stop at its next wait.
    pub fn interrupt(&self) {
        // the receiver lives as long as the simulator
        let _ = self.0.send(Signal::Interrupt);
    }
}

/// Freezes or unfreezes simulation time, from any thread.
#[derive(Debug, Clone)]
pub struct PauseHandle {
    paused: Arc<AtomicBool>,
    tx: Sender<Signal>,
}

impl PauseHandle {
    /// Flip the pause state. Returns the new state.
    pub fn toggle(&self) -> bool {
        let paused = !self.paused.fetch_xor(true, Ordering::SeqCst);
        let _ = self.tx.send(Signal::Wake);
        paused
    }

    pub fn set_paused(&self, paused: bool) {
        if self.paused.swap(paused, Ordering::SeqCst) != paused {
            let _ = self.tx.send(Signal::Wake);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Receiving side of the handles, owned by the simulator.
#[derive(Debug)]
pub struct Controls {
    pause: PauseHandle,
    rx: Receiver<Signal>,
}

impl Controls {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Controls {
            pause: PauseHandle {
                paused: Arc::new(AtomicBool::new(false)),
                tx,
            },
            rx,
        }
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle(self.pause.tx.clone())
    }

    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn toggle_pause(&self) -> bool {
        self.pause.toggle()
    }

    /// Unpause, and forget interrupts requested before now.
    pub fn reset(&self) {
        self.pause.paused.store(false, Ordering::SeqCst);
        while self.rx.try_recv().is_ok() {}
    }

    /// Look for a pending interrupt without blocking.
    fn poll(&self) -> Pacing {
        loop {
            match self.rx.try_recv() {
                Ok(Signal::Interrupt) => return Pacing::Interrupted,
                Ok(Signal::Wake) => continue,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Pacing::Continue,
            }
        }
    }

    /// Block until `until`, an interrupt, or (if `wake_on_pause`) a pause change.
    fn sleep_until(&self, until: Instant, wake_on_pause: bool) -> Pacing {
        loop {
            let timeout = until.saturating_duration_since(Instant::now());
            if timeout.is_zero() {
                return self.poll();
            }
            match self.rx.recv_timeout(timeout) {
                Ok(Signal::Interrupt) => return Pacing::Interrupted,
                Ok(Signal::Wake) if wake_on_pause => return self.poll(),
                Ok(Signal::Wake) => {}
                // the handle kept in `self.pause` keeps the channel open
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return Pacing::Continue
                }
            }
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

/// Schedules frames `delay` apart from a fixed origin.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
    next_frame: Instant,
}

impl Pacer {
    /// The schedule starts now.
    pub fn new(fps: u32) -> Self {
        Pacer {
            delay: frame_delay(fps),
            next_frame: Instant::now(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the next scheduled frame.
    ///
    /// Unpaced loops only look for interrupts, unless paused: then the wait blocks until the
    /// pause changes, an interrupt arrives, or [`PAUSED_POLL`] elapsed.
    pub fn wait(&mut self, controls: &Controls) -> Pacing {
        if self.delay.is_zero() {
            if controls.is_paused() {
                return controls.sleep_until(Instant::now() + PAUSED_POLL, true);
            }
            return controls.poll();
        }
        self.next_frame += self.delay;
        controls.sleep_until(self.next_frame, false)
    }
}
