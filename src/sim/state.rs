//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`. The state is a
//! plain value: each tick takes the previous one by reference and returns a
//! new one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Run ended; the state no longer advances
    GameOver,
}

/// Notifications emitted by a tick, consumed by audio/HUD collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired a projectile
    Shoot,
    /// An enemy was destroyed
    Score { points: u64 },
    /// Formation reversed and dropped a row; `alt` alternates per step
    EnemyStep { alt: bool },
    /// An enemy fired a projectile
    EnemyFire,
    /// Player was hit or the formation reached the player's row
    GameOver,
    /// Every enemy was destroyed and a new wave was spawned
    LevelUp,
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Player {
    /// Ship centred at the bottom of the field
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.field_width / 2.0 - tuning.player_width / 2.0,
                tuning.field_height - tuning.player_height - tuning.player_bottom_margin,
            ),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            speed: tuning.player_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Move left by one step, floored at the field's left edge
    pub fn step_left(&mut self) {
        self.pos.x = (self.pos.x - self.speed).max(0.0);
    }

    /// Move right by one step, capped so the ship stays inside the field
    pub fn step_right(&mut self, field_width: f32) {
        self.pos.x = (self.pos.x + self.speed).min(field_width - self.size.x);
    }
}

/// Cosmetic enemy look, derived from the grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Squid,
    Crab,
    Octopus,
}

impl EnemyVariant {
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => EnemyVariant::Squid,
            1 | 2 => EnemyVariant::Crab,
            _ => EnemyVariant::Octopus,
        }
    }
}

/// A single enemy in the formation grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
    pub row: usize,
    pub col: usize,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn variant(&self) -> EnemyVariant {
        EnemyVariant::for_row(self.row)
    }
}

/// Build a full-strength, row-major enemy grid
pub fn spawn_grid(tuning: &Tuning) -> Vec<Enemy> {
    let cols = tuning.enemy_cols;
    (0..tuning.enemy_count())
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            Enemy {
                pos: Vec2::new(
                    col as f32 * (tuning.enemy_width + tuning.enemy_spacing_x),
                    row as f32 * (tuning.enemy_height + tuning.enemy_spacing_y) + tuning.enemy_start_y,
                ),
                size: Vec2::new(tuning.enemy_width, tuning.enemy_height),
                alive: true,
                row,
                col,
            }
        })
        .collect()
}

/// Shared movement of the enemy grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    /// +1 moving right, -1 moving left
    pub direction: f32,
    /// Horizontal units per tick
    pub speed: f32,
}

impl Formation {
    pub fn for_level(tuning: &Tuning, level: u32) -> Self {
        Self {
            direction: 1.0,
            speed: tuning.speed_for_level(level),
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub owner: Owner,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Vertical displacement per tick (enemy shots fall, player shots rise)
    pub fn velocity_y(&self) -> f32 {
        match self.owner {
            Owner::Player => -self.speed,
            Owner::Enemy => self.speed,
        }
    }
}

/// Level counter and cooldown bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Current level (1-based)
    pub level: u32,
    /// Host time (ms) of the last accepted player shot
    pub last_shot: f64,
    /// Host time (ms) of the last enemy shot
    pub last_enemy_shot: f64,
    /// Alternating flag reported with each formation step
    pub step_alt: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            level: 1,
            last_shot: 0.0,
            last_enemy_shot: 0.0,
            step_alt: true,
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Balance parameters this game was created with
    pub tuning: Tuning,
    pub player: Player,
    pub formation: Formation,
    /// Row-major grid, fixed length for the lifetime of a level
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub round: RoundState,
    pub phase: GamePhase,
}

impl GameState {
    /// Fresh game at level 1
    pub fn new(tuning: Tuning) -> Self {
        Self {
            player: Player::new(&tuning),
            formation: Formation::for_level(&tuning, 1),
            enemies: spawn_grid(&tuning),
            projectiles: Vec::new(),
            round: RoundState::default(),
            phase: GamePhase::Playing,
            tuning,
        }
    }

    pub fn level(&self) -> u32 {
        self.round.level
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    /// Replace the wave with a full grid at the next level. Player, cooldowns
    /// and the step flag carry over; projectiles in flight are discarded.
    pub fn advance_level(&mut self) {
        self.round.level += 1;
        self.formation = Formation::for_level(&self.tuning, self.round.level);
        self.enemies = spawn_grid(&self.tuning);
        self.projectiles.clear();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
