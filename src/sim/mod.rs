//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, host time passed in explicitly
//! - Injected random source only
//! - Stable iteration order (enemy grid index)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use rng::{FixedIndex, IndexSource, seeded};
pub use state::{
    Enemy, EnemyVariant, Formation, GameEvent, GamePhase, GameState, Owner, Player, Projectile,
    RoundState, spawn_grid,
};
pub use tick::{Tick, TickInput, request_shoot, tick};
