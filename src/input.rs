//! Input latch
//!
//! Host key events land here between ticks. Directional holds are level
//! state; fire is an edge that the scheduler consumes once.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKey {
    Left,
    Right,
    Fire,
    Start,
}

impl HostKey {
    /// Map a DOM-style `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(HostKey::Left),
            "ArrowRight" | "KeyD" => Some(HostKey::Right),
            "Space" => Some(HostKey::Fire),
            "Enter" | "NumpadEnter" => Some(HostKey::Start),
            _ => None,
        }
    }
}

/// Current movement holds and a pending fire request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    moving_left: bool,
    moving_right: bool,
    fire_requested: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press/release the left hold. Holds are independent; the tick settles
    /// a conflict.
    pub fn set_left(&mut self, held: bool) {
        self.moving_left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.moving_right = held;
    }

    pub fn request_fire(&mut self) {
        self.fire_requested = true;
    }

    /// Consume the pending fire request
    pub fn take_fire(&mut self) -> bool {
        std::mem::take(&mut self.fire_requested)
    }

    pub fn is_fire_requested(&self) -> bool {
        self.fire_requested
    }

    /// Snapshot of the holds for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            moving_left: self.moving_left,
            moving_right: self.moving_right,
        }
    }
}
