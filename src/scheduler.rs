//! Fixed-update game loop
//!
//! The host calls `Scheduler::on_frame` from its frame callback with a
//! monotonic timestamp. At most one simulation tick runs per
//! `min_frame_interval`; faster callbacks are skipped but keep the loop
//! alive. The scheduler asks for each next callback through a
//! `FrameRequester`, and holds the handle of the outstanding request so it
//! can cancel it when the game ends or the scheduler is dropped.

use crate::events::EventSink;
use crate::input::{HostKey, InputLatch};
use crate::score::Scoreboard;
use crate::sim::{GameEvent, GameState, IndexSource, request_shoot, tick};
use crate::tuning::Tuning;

/// Identifies one outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host capability: schedule (and cancel) the next frame callback
pub trait FrameRequester {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// What a frame callback did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No game running; nothing advanced and no frame was requested
    Idle,
    /// Too soon since the last tick (or first frame of a game)
    Skipped,
    /// One tick ran
    Ticked(Vec<GameEvent>),
    /// One tick ran and ended the game; the loop has stopped
    GameOver(Vec<GameEvent>),
}

impl FrameOutcome {
    pub fn events(&self) -> &[GameEvent] {
        match self {
            FrameOutcome::Ticked(events) | FrameOutcome::GameOver(events) => events,
            FrameOutcome::Idle | FrameOutcome::Skipped => &[],
        }
    }
}

/// Frame requester for hosts that poll: requests queue up until taken
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    pending: Option<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the outstanding request, if any, so the host can deliver it
    pub fn take(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl FrameRequester for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

impl<T: FrameRequester + ?Sized> FrameRequester for &mut T {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}

/// Owns the running game and drives it from host frame callbacks
pub struct Scheduler<F: FrameRequester, R: IndexSource, S: EventSink> {
    tuning: Tuning,
    state: GameState,
    latch: InputLatch,
    scoreboard: Scoreboard,
    frames: F,
    rng: R,
    sink: S,
    /// Outstanding frame request; cancelled on stop
    pending: Option<FrameHandle>,
    running: bool,
    last_tick: Option<f64>,
    ticks: u64,
}

impl<F: FrameRequester, R: IndexSource, S: EventSink> Scheduler<F, R, S> {
    /// Create an idle scheduler holding a fresh level-1 state
    pub fn new(tuning: Tuning, frames: F, rng: R, sink: S) -> Self {
        Self {
            state: GameState::new(tuning),
            tuning,
            latch: InputLatch::new(),
            scoreboard: Scoreboard::new(),
            frames,
            rng,
            sink,
            pending: None,
            running: false,
            last_tick: None,
            ticks: 0,
        }
    }

    /// Reset to level 1, zero the score and begin ticking
    pub fn start_game(&mut self) {
        self.state = GameState::new(self.tuning);
        self.scoreboard.reset_score();
        self.latch.take_fire();
        self.running = true;
        self.last_tick = None;
        self.ticks = 0;
        log::info!("Game started (high score {})", self.scoreboard.high_score);
        self.request_next();
    }

    /// Continue from a previously captured state. The score is left as is.
    pub fn load_state(&mut self, state: GameState) {
        self.running = !state.is_game_over();
        self.state = state;
        self.latch.take_fire();
        self.last_tick = None;
        if self.running {
            self.request_next();
        }
    }

    /// Host frame callback with a monotonic timestamp in milliseconds
    pub fn on_frame(&mut self, now: f64) -> FrameOutcome {
        // The request that produced this callback has been consumed
        self.pending = None;

        if !self.running {
            return FrameOutcome::Idle;
        }

        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            self.request_next();
            return FrameOutcome::Skipped;
        };

        if now - last < self.tuning.min_frame_interval {
            log::trace!("Frame skipped ({:.1} ms since last tick)", now - last);
            self.request_next();
            return FrameOutcome::Skipped;
        }

        let mut events = Vec::new();
        if self.latch.take_fire() {
            let shot = request_shoot(&self.state, now);
            self.state = shot.state;
            events.extend(shot.events);
        }

        let next = tick(&self.state, &self.latch.tick_input(), now, &mut self.rng);
        self.state = next.state;
        events.extend(next.events);
        self.last_tick = Some(now);
        self.ticks += 1;

        for event in &events {
            self.scoreboard.apply(event);
            self.sink.on_event(event);
        }

        if self.state.is_game_over() {
            self.running = false;
            log::info!(
                "Game over at level {} after {} ticks, score {}",
                self.state.level(),
                self.ticks,
                self.scoreboard.score
            );
            return FrameOutcome::GameOver(events);
        }

        self.request_next();
        FrameOutcome::Ticked(events)
    }

    /// Route a host key press
    pub fn key_down(&mut self, key: HostKey) {
        match key {
            HostKey::Left => self.latch.set_left(true),
            HostKey::Right => self.latch.set_right(true),
            HostKey::Fire if self.running => self.latch.request_fire(),
            HostKey::Fire => {}
            HostKey::Start if !self.running => self.start_game(),
            HostKey::Start => {}
        }
    }

    /// Route a host key release
    pub fn key_up(&mut self, key: HostKey) {
        match key {
            HostKey::Left => self.latch.set_left(false),
            HostKey::Right => self.latch.set_right(false),
            HostKey::Fire | HostKey::Start => {}
        }
    }

    /// Stop ticking and cancel the outstanding frame request
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
        self.running = false;
    }

    fn request_next(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.frames.request_frame());
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True once a started game has ended, until the next start
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn latch(&self) -> &InputLatch {
        &self.latch
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<F: FrameRequester, R: IndexSource, S: EventSink> Drop for Scheduler<F, R, S> {
    fn drop(&mut self) {
        self.stop();
    }
}
