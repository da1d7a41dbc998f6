//! Data-driven game balance
//!
//! Every number the simulation uses lives here. Defaults mirror `consts`;
//! a host may override any subset from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub player_bottom_margin: f32,

    // === Projectiles ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,

    // === Enemies ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub enemy_spacing_x: f32,
    pub enemy_spacing_y: f32,
    pub enemy_start_y: f32,
    pub initial_speed: f32,
    pub speed_increment: f32,

    // === Timing (ms) ===
    pub shoot_cooldown: f64,
    pub enemy_shoot_cooldown: f64,
    pub min_frame_interval: f64,

    // === Scoring ===
    pub score_per_kill: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,

            projectile_width: PROJECTILE_WIDTH,
            projectile_height: PROJECTILE_HEIGHT,
            projectile_speed: PROJECTILE_SPEED,

            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_rows: ENEMY_ROWS,
            enemy_cols: ENEMY_COLS,
            enemy_spacing_x: ENEMY_SPACING_X,
            enemy_spacing_y: ENEMY_SPACING_Y,
            enemy_start_y: ENEMY_START_Y,
            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,

            shoot_cooldown: SHOOT_COOLDOWN_MS,
            enemy_shoot_cooldown: ENEMY_SHOOT_COOLDOWN_MS,
            min_frame_interval: MIN_FRAME_INTERVAL_MS,

            score_per_kill: SCORE_PER_KILL,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document. Missing fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Formation speed for a 1-based level
    pub fn speed_for_level(&self, level: u32) -> f32 {
        self.initial_speed + level.saturating_sub(1) as f32 * self.speed_increment
    }

    /// Total number of enemies in a fresh grid
    pub fn enemy_count(&self) -> usize {
        self.enemy_rows * self.enemy_cols
    }

    /// Width of the enemy grid from the left edge of column 0
    pub fn grid_width(&self) -> f32 {
        let cols = self.enemy_cols as f32;
        cols * self.enemy_width + (cols - 1.0).max(0.0) * self.enemy_spacing_x
    }

    /// Check that the parameters describe a playable field
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("projectile_width", self.projectile_width),
            ("projectile_height", self.projectile_height),
            ("projectile_speed", self.projectile_speed),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("initial_speed", self.initial_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.speed_increment < 0.0 {
            return Err(TuningError::Invalid("speed_increment must not be negative".into()));
        }
        if self.enemy_rows == 0 || self.enemy_cols == 0 {
            return Err(TuningError::Invalid("enemy grid must have at least one row and column".into()));
        }
        if self.grid_width() > self.field_width {
            return Err(TuningError::Invalid(format!(
                "enemy grid ({} wide) does not fit the field ({} wide)",
                self.grid_width(),
                self.field_width
            )));
        }
        if self.player_width > self.field_width
            || self.player_height + self.player_bottom_margin > self.field_height
        {
            return Err(TuningError::Invalid("player does not fit the field".into()));
        }
        if self.shoot_cooldown < 0.0 || self.enemy_shoot_cooldown < 0.0 || self.min_frame_interval < 0.0 {
            return Err(TuningError::Invalid("timings must not be negative".into()));
        }
        Ok(())
    }
}
