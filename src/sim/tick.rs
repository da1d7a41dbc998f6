//! Fixed timestep simulation tick
//!
//! Pure state transition: the previous state goes in by reference, the next
//! state and the events it produced come out. Nothing is mutated in place
//! and nothing is dispatched from here.

use glam::Vec2;

use super::rng::IndexSource;
use super::state::{GameEvent, GamePhase, GameState, Owner, Projectile};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub moving_left: bool,
    pub moving_right: bool,
}

/// Result of a state transition
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl Tick {
    fn quiet(state: GameState) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }
}

/// Advance the game by one tick at host time `now` (ms)
pub fn tick<R: IndexSource>(prev: &GameState, input: &TickInput, now: f64, rng: &mut R) -> Tick {
    if prev.phase == GamePhase::GameOver {
        return Tick::quiet(prev.clone());
    }

    let mut state = prev.clone();
    let mut events = Vec::new();
    let field_width = state.tuning.field_width;
    let field_height = state.tuning.field_height;

    // Player movement, left then right; both held cancel out away from the walls
    if input.moving_left {
        state.player.step_left();
    }
    if input.moving_right {
        state.player.step_right(field_width);
    }

    // Wave cleared: respawn and skip the rest of the tick
    if state.alive_count() == 0 {
        state.advance_level();
        log::info!(
            "Level {} (formation speed {:.2})",
            state.round.level,
            state.formation.speed
        );
        events.push(GameEvent::LevelUp);
        return Tick { state, events };
    }

    // Boundary scan over the live extent of the formation
    let direction = state.formation.direction;
    let reached_edge = state.alive_enemies().any(|e| {
        (direction > 0.0 && e.rect().right() >= field_width) || (direction < 0.0 && e.rect().left() <= 0.0)
    });

    // Formation step: reverse and drop, or translate, never both
    if reached_edge {
        state.formation.direction = -direction;
        let dy = state.tuning.enemy_height;
        for enemy in &mut state.enemies {
            enemy.pos.y += dy;
        }
        events.push(GameEvent::EnemyStep {
            alt: state.round.step_alt,
        });
        state.round.step_alt = !state.round.step_alt;
        log::debug!("Formation reversed, now moving {}", state.formation.direction);
    } else {
        let dx = direction * state.formation.speed;
        for enemy in &mut state.enemies {
            enemy.pos.x += dx;
        }
    }

    // Formation reached the player's row
    let player_y = state.player.pos.y;
    if state.alive_enemies().any(|e| e.rect().bottom() >= player_y) {
        log::info!("Formation reached the player at level {}", state.round.level);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
        return Tick { state, events };
    }

    // Enemy fire, from where the shooter stood before this tick's step
    if now - state.round.last_enemy_shot > state.tuning.enemy_shoot_cooldown {
        let alive: Vec<usize> = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .map(|(i, _)| i)
            .collect();
        if !alive.is_empty() {
            let shooter = prev.enemies[alive[rng.pick_index(alive.len())]];
            state.projectiles.push(Projectile {
                pos: Vec2::new(
                    shooter.pos.x + shooter.size.x / 2.0,
                    shooter.pos.y + shooter.size.y,
                ),
                size: Vec2::new(state.tuning.projectile_width, state.tuning.projectile_height),
                speed: state.tuning.projectile_speed * 0.5,
                owner: Owner::Enemy,
            });
            state.round.last_enemy_shot = now;
            events.push(GameEvent::EnemyFire);
            log::debug!("Enemy r{}c{} fired", shooter.row, shooter.col);
        }
    }

    // Projectile motion and collision resolution
    let points = state.tuning.score_per_kill * u64::from(state.round.level);
    let player_rect = state.player.rect();
    let in_flight = std::mem::take(&mut state.projectiles);
    let mut kept = Vec::with_capacity(in_flight.len());
    let mut remaining = in_flight.into_iter();

    while let Some(mut projectile) = remaining.next() {
        let new_y = projectile.pos.y + projectile.velocity_y();
        if new_y < 0.0 || new_y > field_height {
            continue;
        }
        projectile.pos.y = new_y;

        match projectile.owner {
            Owner::Enemy => {
                if projectile.rect().overlaps(&player_rect) {
                    log::info!("Player hit at level {}", state.round.level);
                    kept.extend(remaining);
                    state.projectiles = kept;
                    state.phase = GamePhase::GameOver;
                    events.push(GameEvent::GameOver);
                    return Tick { state, events };
                }
            }
            Owner::Player => {
                let shot = projectile.rect();
                if let Some(enemy) = state
                    .enemies
                    .iter_mut()
                    .find(|e| e.alive && shot.overlaps(&e.rect()))
                {
                    enemy.alive = false;
                    events.push(GameEvent::Score { points });
                    continue;
                }
            }
        }
        kept.push(projectile);
    }
    state.projectiles = kept;

    Tick { state, events }
}

/// Fire a player projectile if the cooldown has elapsed
pub fn request_shoot(prev: &GameState, now: f64) -> Tick {
    if prev.phase == GamePhase::GameOver || now - prev.round.last_shot < prev.tuning.shoot_cooldown {
        return Tick::quiet(prev.clone());
    }

    let mut state = prev.clone();
    let tuning = &prev.tuning;
    let player = &prev.player;
    state.projectiles.push(Projectile {
        pos: Vec2::new(
            player.pos.x + player.size.x / 2.0 - tuning.projectile_width / 2.0,
            player.pos.y,
        ),
        size: Vec2::new(tuning.projectile_width, tuning.projectile_height),
        speed: tuning.projectile_speed,
        owner: Owner::Player,
    });
    state.round.last_shot = now;

    Tick {
        state,
        events: vec![GameEvent::Shoot],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rng::FixedIndex;

    const LEFT: TickInput = TickInput {
        moving_left: true,
        moving_right: false,
    };
    const RIGHT: TickInput = TickInput {
        moving_left: false,
        moving_right: true,
    };

    /// Early time so the enemy cooldown never elapses
    const QUIET_NOW: f64 = 1.0;

    fn step(state: &GameState, input: &TickInput) -> Tick {
        tick(state, input, QUIET_NOW, &mut FixedIndex(0))
    }

    #[test]
    fn test_player_moves_and_clamps_left() {
        let mut state = GameState::default();
        let start = state.player.pos.x;
        let next = step(&state, &LEFT).state;
        assert_eq!(next.player.pos.x, start - PLAYER_SPEED);

        state.player.pos.x = 1.0;
        let next = step(&state, &LEFT).state;
        assert_eq!(next.player.pos.x, 0.0);
    }

    #[test]
    fn test_player_clamps_right() {
        let mut state = GameState::default();
        state.player.pos.x = FIELD_WIDTH - PLAYER_WIDTH - 2.0;
        let next = step(&state, &RIGHT).state;
        assert_eq!(next.player.pos.x, FIELD_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_both_directions_cancel() {
        let state = GameState::default();
        let both = TickInput {
            moving_left: true,
            moving_right: true,
        };
        let next = step(&state, &both).state;
        assert_eq!(next.player.pos.x, state.player.pos.x);
    }

    #[test]
    fn test_tick_does_not_mutate_previous() {
        let state = GameState::default();
        let snapshot = state.clone();
        let _ = tick(&state, &RIGHT, 5000.0, &mut FixedIndex(3));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_formation_translates() {
        let state = GameState::default();
        let out = step(&state, &TickInput::default());
        assert!(out.events.is_empty());
        assert_eq!(out.state.enemies[0].pos.x, INITIAL_SPEED);
        assert_eq!(out.state.enemies[0].pos.y, ENEMY_START_Y);
        assert_eq!(out.state.formation.direction, 1.0);
    }

    #[test]
    fn test_formation_reverses_and_drops_at_right_edge() {
        let mut state = GameState::default();
        let shift = FIELD_WIDTH - state.enemies[10].rect().right();
        for enemy in &mut state.enemies {
            enemy.pos.x += shift;
        }
        let before: Vec<_> = state.enemies.iter().map(|e| e.pos).collect();

        let out = step(&state, &TickInput::default());
        assert_eq!(out.events, vec![GameEvent::EnemyStep { alt: true }]);
        assert_eq!(out.state.formation.direction, -1.0);
        assert!(!out.state.round.step_alt);
        for (enemy, old) in out.state.enemies.iter().zip(before) {
            assert_eq!(enemy.pos.x, old.x);
            assert_eq!(enemy.pos.y, old.y + ENEMY_HEIGHT);
        }
    }

    #[test]
    fn test_boundary_ignores_dead_enemies() {
        let mut state = GameState::default();
        let shift = FIELD_WIDTH - state.enemies[10].rect().right();
        for enemy in &mut state.enemies {
            enemy.pos.x += shift;
            // Kill the rightmost column
            if enemy.col == 10 {
                enemy.alive = false;
            }
        }
        let out = step(&state, &TickInput::default());
        assert!(out.events.is_empty());
        assert_eq!(out.state.formation.direction, 1.0);
    }

    #[test]
    fn test_formation_reverses_at_left_edge() {
        let mut state = GameState::default();
        state.formation.direction = -1.0;
        state.round.step_alt = false;
        let out = step(&state, &TickInput::default());
        assert_eq!(out.events, vec![GameEvent::EnemyStep { alt: false }]);
        assert_eq!(out.state.formation.direction, 1.0);
        assert!(out.state.round.step_alt);
    }

    #[test]
    fn test_step_flag_only_toggles_on_reversal() {
        let state = GameState::default();
        let mut current = state;
        for _ in 0..10 {
            current = step(&current, &TickInput::default()).state;
        }
        assert!(current.round.step_alt);
    }

    #[test]
    fn test_game_over_when_formation_reaches_player() {
        let mut state = GameState::default();
        // Bottom row's bottom edge lands exactly on the player's top edge
        let bottom = state.enemies[54].rect().bottom();
        let lift = state.player.pos.y - bottom;
        for enemy in &mut state.enemies {
            enemy.pos.y += lift;
        }
        let out = step(&state, &TickInput::default());
        assert_eq!(out.events, vec![GameEvent::GameOver]);
        assert!(out.state.is_game_over());
    }

    #[test]
    fn test_dead_enemies_below_player_do_not_end_game() {
        let mut state = GameState::default();
        for enemy in &mut state.enemies {
            if enemy.row == 4 {
                enemy.pos.y = state.player.pos.y + 5.0;
                enemy.alive = false;
            }
        }
        let out = step(&state, &TickInput::default());
        assert!(!out.state.is_game_over());
    }

    #[test]
    fn test_game_over_state_is_terminal() {
        let mut state = GameState::default();
        state.phase = GamePhase::GameOver;
        let out = tick(&state, &RIGHT, 10_000.0, &mut FixedIndex(0));
        assert!(out.events.is_empty());
        assert_eq!(out.state, state);
    }

    #[test]
    fn test_enemy_fire_after_cooldown() {
        let state = GameState::default();
        let out = tick(&state, &TickInput::default(), ENEMY_SHOOT_COOLDOWN_MS + 1.0, &mut FixedIndex(2));
        assert_eq!(out.events, vec![GameEvent::EnemyFire]);
        assert_eq!(out.state.round.last_enemy_shot, ENEMY_SHOOT_COOLDOWN_MS + 1.0);

        // Spawned beneath enemy 2 as it stood before the step, then moved once at half speed
        let shooter = state.enemies[2];
        assert_ne!(out.state.enemies[2].pos.x, shooter.pos.x);
        let shot = out.state.projectiles[0];
        assert_eq!(shot.owner, Owner::Enemy);
        assert_eq!(shot.speed, PROJECTILE_SPEED * 0.5);
        assert_eq!(shot.pos.x, shooter.pos.x + ENEMY_WIDTH / 2.0);
        assert_eq!(shot.pos.y, shooter.pos.y + ENEMY_HEIGHT + PROJECTILE_SPEED * 0.5);
    }

    #[test]
    fn test_enemy_fire_respects_cooldown() {
        let mut state = GameState::default();
        state.round.last_enemy_shot = 500.0;
        // Exactly at the cooldown is not enough
        let out = tick(&state, &TickInput::default(), 1500.0, &mut FixedIndex(0));
        assert!(out.state.projectiles.is_empty());
        let out = tick(&state, &TickInput::default(), 1500.5, &mut FixedIndex(0));
        assert_eq!(out.state.projectiles.len(), 1);
    }

    #[test]
    fn test_enemy_shooter_chosen_among_alive() {
        let mut state = GameState::default();
        for enemy in state.enemies.iter_mut().take(54) {
            enemy.alive = false;
        }
        let out = tick(&state, &TickInput::default(), 5000.0, &mut FixedIndex(0));
        let shooter = state.enemies[54];
        assert_eq!(out.state.projectiles[0].pos.x, shooter.pos.x + ENEMY_WIDTH / 2.0);
    }

    #[test]
    fn test_player_shot_kills_first_overlapping_enemy() {
        let mut state = GameState::default();
        // Stack two live enemies on the same spot; index order decides
        state.enemies[1].pos = state.enemies[0].pos;
        state.projectiles.push(Projectile {
            // After the formation moves by 0.75 and the shot rises by 6
            pos: Vec2::new(10.0, ENEMY_START_Y + 10.0 + PROJECTILE_SPEED),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            owner: Owner::Player,
        });
        let out = step(&state, &TickInput::default());
        assert_eq!(out.events, vec![GameEvent::Score { points: 10 }]);
        assert!(!out.state.enemies[0].alive);
        assert!(out.state.enemies[1].alive);
        assert!(out.state.projectiles.is_empty());
        assert_eq!(out.state.alive_count(), 54);
    }

    #[test]
    fn test_score_scales_with_level() {
        let mut state = GameState::default();
        state.round.level = 3;
        state.projectiles.push(Projectile {
            pos: Vec2::new(10.0, ENEMY_START_Y + 10.0 + PROJECTILE_SPEED),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            owner: Owner::Player,
        });
        let out = step(&state, &TickInput::default());
        assert_eq!(out.events, vec![GameEvent::Score { points: 30 }]);
    }

    #[test]
    fn test_projectiles_leave_field() {
        let mut state = GameState::default();
        state.projectiles.push(Projectile {
            pos: Vec2::new(600.0, 3.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            owner: Owner::Player,
        });
        state.projectiles.push(Projectile {
            pos: Vec2::new(600.0, FIELD_HEIGHT - 1.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED * 0.5,
            owner: Owner::Enemy,
        });
        let out = step(&state, &TickInput::default());
        assert!(out.state.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_shot_hits_player_and_halts() {
        let mut state = GameState::default();
        let player = state.player;
        let trailing = Projectile {
            pos: Vec2::new(600.0, 200.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            owner: Owner::Player,
        };
        state.projectiles.push(Projectile {
            pos: Vec2::new(player.pos.x + 5.0, player.pos.y - 5.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED * 0.5,
            owner: Owner::Enemy,
        });
        state.projectiles.push(trailing);

        let out = step(&state, &TickInput::default());
        assert_eq!(out.events, vec![GameEvent::GameOver]);
        assert!(out.state.is_game_over());
        // The shot after the fatal one was never advanced
        assert_eq!(out.state.projectiles, vec![trailing]);
    }

    #[test]
    fn test_level_clear_respawns() {
        let mut state = GameState::default();
        for enemy in &mut state.enemies {
            enemy.alive = false;
        }
        state.player.pos.x = 100.0;
        let out = step(&state, &RIGHT);
        assert_eq!(out.events, vec![GameEvent::LevelUp]);
        assert_eq!(out.state.level(), 2);
        assert_eq!(out.state.alive_count(), 55);
        // Movement still applied before the level check
        assert_eq!(out.state.player.pos.x, 100.0 + PLAYER_SPEED);
        // Fresh grid, nothing else moved this tick
        assert_eq!(out.state.enemies[0].pos, Vec2::new(0.0, ENEMY_START_Y));
    }

    #[test]
    fn test_level_clear_discards_shots_and_keeps_cooldowns() {
        let mut state = GameState::default();
        for enemy in &mut state.enemies {
            enemy.alive = false;
        }
        state.round.last_shot = 4200.0;
        state.round.last_enemy_shot = 3900.0;
        state.projectiles.push(Projectile {
            pos: Vec2::new(100.0, 300.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            owner: Owner::Player,
        });
        state.projectiles.push(Projectile {
            pos: Vec2::new(200.0, 250.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED * 0.5,
            owner: Owner::Enemy,
        });

        let out = tick(&state, &TickInput::default(), 5000.0, &mut FixedIndex(0));
        assert_eq!(out.events, vec![GameEvent::LevelUp]);
        assert!(out.state.projectiles.is_empty());
        assert_eq!(out.state.round.last_shot, 4200.0);
        assert_eq!(out.state.round.last_enemy_shot, 3900.0);
    }

    #[test]
    fn test_request_shoot_spawns_centered() {
        let state = GameState::default();
        let out = request_shoot(&state, 1000.0);
        assert_eq!(out.events, vec![GameEvent::Shoot]);
        let shot = out.state.projectiles[0];
        assert_eq!(shot.owner, Owner::Player);
        assert_eq!(
            shot.pos,
            Vec2::new(
                state.player.pos.x + PLAYER_WIDTH / 2.0 - PROJECTILE_WIDTH / 2.0,
                state.player.pos.y
            )
        );
        assert_eq!(out.state.round.last_shot, 1000.0);
    }

    #[test]
    fn test_request_shoot_cooldown() {
        let state = GameState::default();
        let first = request_shoot(&state, 1000.0).state;
        let blocked = request_shoot(&first, 1499.0);
        assert!(blocked.events.is_empty());
        assert_eq!(blocked.state.projectiles.len(), 1);
        let second = request_shoot(&first, 1500.0);
        assert_eq!(second.events, vec![GameEvent::Shoot]);
        assert_eq!(second.state.projectiles.len(), 2);
    }

    #[test]
    fn test_request_shoot_ignored_after_game_over() {
        let mut state = GameState::default();
        state.phase = GamePhase::GameOver;
        let out = request_shoot(&state, 10_000.0);
        assert!(out.events.is_empty());
        assert!(out.state.projectiles.is_empty());
    }

    #[test]
    fn test_determinism() {
        use crate::sim::rng::seeded;

        let mut a = GameState::default();
        let mut b = GameState::default();
        let mut rng_a = seeded(99999);
        let mut rng_b = seeded(99999);
        let inputs = [LEFT, RIGHT, TickInput::default(), RIGHT];

        for (i, input) in inputs.iter().cycle().take(400).enumerate() {
            let now = i as f64 * 16.0;
            a = tick(&a, input, now, &mut rng_a).state;
            b = tick(&b, input, now, &mut rng_b).state;
        }
        assert_eq!(a, b);
    }
}
