//! Pixel Invaders - a fixed-playfield shoot-'em-up simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring, levels)
//! - `scheduler`: Fixed-update loop driven by host frame callbacks
//! - `input`: Input latch fed by host key events
//! - `events`: Event sinks consuming what the simulation emits
//! - `score`: In-session score and high score
//! - `tuning`: Data-driven game balance

pub mod events;
pub mod input;
pub mod scheduler;
pub mod score;
pub mod sim;
pub mod tuning;

pub use events::{EventLog, EventSink, LogSink};
pub use input::{HostKey, InputLatch};
pub use scheduler::{FrameHandle, FrameOutcome, FrameRequester, Scheduler};
pub use score::Scoreboard;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical units, matches the raster surface)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 27.0;
    pub const PLAYER_HEIGHT: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Gap between the ship's bottom edge and the field's bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;

    /// Projectiles (enemy shots travel at half speed)
    pub const PROJECTILE_WIDTH: f32 = 2.0;
    pub const PROJECTILE_HEIGHT: f32 = 8.0;
    pub const PROJECTILE_SPEED: f32 = 6.0;

    /// Enemy grid
    pub const ENEMY_WIDTH: f32 = 24.0;
    pub const ENEMY_HEIGHT: f32 = 18.0;
    pub const ENEMY_COLS: usize = 11;
    pub const ENEMY_ROWS: usize = 5;
    pub const ENEMY_SPACING_X: f32 = 16.0;
    pub const ENEMY_SPACING_Y: f32 = 24.0;
    pub const ENEMY_START_Y: f32 = 120.0;

    /// Formation speed per tick, grows linearly per level
    pub const INITIAL_SPEED: f32 = 0.75;
    pub const SPEED_INCREMENT: f32 = 0.2;

    /// Cooldowns (milliseconds)
    pub const SHOOT_COOLDOWN_MS: f64 = 500.0;
    pub const ENEMY_SHOOT_COOLDOWN_MS: f64 = 1000.0;

    /// Points per kill, multiplied by the current level
    pub const SCORE_PER_KILL: u64 = 10;

    /// Minimum time between accepted ticks (caps the loop at ~60 Hz)
    pub const MIN_FRAME_INTERVAL_MS: f64 = 16.0;
}
