//! Per-frame simulation tick
//!
//! One call advances the session by one display frame. The host's wall-clock
//! countdown runs separately through `tick_clock`.

use super::formation;
use super::state::{Bullet, GameEvent, GameOverCause, GamePhase, GameState};

/// Input intents sampled at the start of a tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left movement held
    pub move_left: bool,
    /// Right movement held
    pub move_right: bool,
    /// Fire pressed since the last tick (one-shot)
    pub fire: bool,
}

/// Advance the game state by one frame.
///
/// `now_ms` is the host clock, used only for the fire cooldown. Returns what
/// happened so the caller can play sounds and log; a tick after game over is
/// a no-op and returns nothing.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase == GamePhase::GameOver {
        return events;
    }

    state.time_ticks += 1;

    if input.fire {
        events.extend(fire(state, now_ms));
    }

    state.player.steer(input.move_left, input.move_right);

    // Move and prune in one pass; pruned bullets never reach collision
    state.bullets.retain_mut(|bullet| {
        bullet.advance();
        !bullet.is_off_screen()
    });

    let reached_player = formation::step(
        &mut state.enemies,
        &mut state.direction,
        state.enemy_speed,
        state.tuning.enemy_drop,
        state.player.pos.y,
    );
    if reached_player {
        lose_life(state, &mut events);
        if state.phase == GamePhase::GameOver {
            return events;
        }
    }

    resolve_collisions(state, &mut events);

    if state.enemies.iter().all(|e| !e.alive) {
        state.level += 1;
        state.enemy_speed += state.tuning.enemy_speed_step;
        state.reset_wave();
        log::info!("Wave cleared, level {} (speed {})", state.level, state.enemy_speed);
        events.push(GameEvent::WaveCleared { level: state.level });
    }

    events
}

/// Try to fire a bullet from the player's centre.
///
/// Refused after game over, once the countdown has hit zero, and inside the
/// cooldown window since the last accepted shot.
pub fn fire(state: &mut GameState, now_ms: f64) -> Option<GameEvent> {
    if state.phase == GamePhase::GameOver || state.time_left == Some(0) {
        return None;
    }

    if let Some(last) = state.last_shot_ms {
        if now_ms - last < state.tuning.fire_cooldown_ms {
            return None;
        }
    }
    state.last_shot_ms = Some(now_ms);

    state
        .bullets
        .push(Bullet::new(state.player.muzzle(), state.tuning.bullet_speed));
    Some(GameEvent::Fired)
}

/// Count the session clock down by one second (timed sessions only).
///
/// Does nothing once the game is over, so a late interval callback cannot
/// end a run twice.
pub fn tick_clock(state: &mut GameState) -> Option<GameEvent> {
    if state.phase == GamePhase::GameOver {
        return None;
    }

    let left = state.time_left.as_mut()?;
    *left = left.saturating_sub(1);
    if *left > 0 {
        return None;
    }

    state.phase = GamePhase::GameOver;
    log::info!("Time up, final score {}", state.score);
    Some(GameEvent::GameOver {
        cause: GameOverCause::OutOfTime,
    })
}

/// The formation reached the player: one life per tick at most
fn lose_life(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    log::debug!("Formation reached the player, {} lives left", state.lives);
    events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Out of lives, final score {}", state.score);
        events.push(GameEvent::GameOver {
            cause: GameOverCause::OutOfLives,
        });
    } else {
        state.reset_wave();
    }
}

/// Each bullet kills at most the first alive enemy it overlaps
fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let points = state.tuning.points_per_kill;
    let enemies = &mut state.enemies;
    let mut kills = 0u32;

    state.bullets.retain(|bullet| {
        let bounds = bullet.bounds();
        match enemies
            .iter_mut()
            .find(|e| e.alive && bounds.overlaps(&e.bounds()))
        {
            Some(enemy) => {
                enemy.alive = false;
                kills += 1;
                false
            }
            None => true,
        }
    });

    state.score = state.score.saturating_add(kills.saturating_mul(points));
    events.extend((0..kills).map(|_| GameEvent::EnemyDestroyed { points }));
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::consts::*;
    use crate::tuning::Tuning;

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Place a bullet that will overlap `enemies[index]` after one tick
    fn aim_at(state: &mut GameState, index: usize) {
        let enemy = &state.enemies[index];
        let x = enemy.pos.x + ENEMY_WIDTH / 2.0 - BULLET_WIDTH / 2.0;
        let y = enemy.pos.y + state.tuning.bullet_speed + 5.0;
        state
            .bullets
            .push(Bullet::new(Vec2::new(x, y), state.tuning.bullet_speed));
    }

    /// Kill every enemy except the first and park it one step from the right edge
    fn lone_enemy_near_edge(state: &mut GameState, y: f32) {
        for enemy in state.enemies.iter_mut().skip(1) {
            enemy.alive = false;
        }
        state.enemies[0].pos = Vec2::new(FIELD_WIDTH - ENEMY_WIDTH - 1.0, y);
    }

    #[test]
    fn test_tick_moves_player_and_formation() {
        let mut state = GameState::new(Tuning::timed());
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, 0.0);
        assert!(events.is_empty());
        assert_eq!(state.player.pos.x, 285.0);
        assert_eq!(state.enemies[0].pos.x, 81.0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_fire_spawns_bullet_and_event() {
        let mut state = GameState::new(Tuning::timed());
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, 1000.0);
        assert_eq!(events, vec![GameEvent::Fired]);
        assert_eq!(state.bullets.len(), 1);
        // Spawned at the muzzle, then advanced once
        assert_eq!(state.bullets[0].pos, Vec2::new(298.0, 364.0));
    }

    #[test]
    fn test_fire_cooldown() {
        let mut state = GameState::new(Tuning::timed());
        assert_eq!(fire(&mut state, 1000.0), Some(GameEvent::Fired));
        assert_eq!(fire(&mut state, 1179.0), None);
        assert_eq!(fire(&mut state, 1180.0), Some(GameEvent::Fired));
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_classic_has_no_cooldown() {
        let mut state = GameState::new(Tuning::classic());
        assert!(fire(&mut state, 5.0).is_some());
        assert!(fire(&mut state, 5.0).is_some());
        assert!(fire(&mut state, 5.0).is_some());
        assert_eq!(state.bullets.len(), 3);
    }

    #[test]
    fn test_fire_refused_when_out_of_time_or_over() {
        let mut state = GameState::new(Tuning::timed());
        state.time_left = Some(0);
        assert_eq!(fire(&mut state, 0.0), None);

        let mut state = GameState::new(Tuning::timed());
        state.phase = GamePhase::GameOver;
        assert_eq!(fire(&mut state, 0.0), None);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_pruned_off_top() {
        let mut state = GameState::new(Tuning::timed());
        // Keeps: -4 - 6 = -10, not yet fully above
        state.bullets.push(Bullet::new(Vec2::new(10.0, -4.0), 6.0));
        // Drops: -5 - 6 = -11
        state.bullets.push(Bullet::new(Vec2::new(20.0, -5.0), 6.0));
        tick(&mut state, &idle(), 0.0);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.x, 10.0);
    }

    #[test]
    fn test_pruned_bullet_never_collides() {
        let mut state = GameState::new(Tuning::timed());
        // An enemy straddling the top edge, and a bullet whose next position
        // would overlap it but is also fully above the field
        lone_enemy_near_edge(&mut state, -25.0);
        state.enemies[0].pos.x = 300.0;
        state.bullets.push(Bullet::new(Vec2::new(318.0, -5.0), 6.0));
        tick(&mut state, &idle(), 0.0);
        assert!(state.enemies[0].alive);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bullet_kills_one_enemy() {
        let mut state = GameState::new(Tuning::timed());
        aim_at(&mut state, 3);
        let events = tick(&mut state, &idle(), 0.0);
        assert_eq!(events, vec![GameEvent::EnemyDestroyed { points: 10 }]);
        assert!(!state.enemies[3].alive);
        assert_eq!(state.alive_enemies(), 20);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_bullet_overlapping_two_enemies_kills_first_only() {
        let mut state = GameState::new(Tuning::timed());
        // Stack enemy 1 onto enemy 0 so one bullet overlaps both
        state.enemies[1].pos = state.enemies[0].pos;
        aim_at(&mut state, 0);
        tick(&mut state, &idle(), 0.0);
        assert!(!state.enemies[0].alive);
        assert!(state.enemies[1].alive);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_two_bullets_one_enemy() {
        let mut state = GameState::new(Tuning::timed());
        aim_at(&mut state, 0);
        aim_at(&mut state, 0);
        tick(&mut state, &idle(), 0.0);
        assert_eq!(state.alive_enemies(), 20);
        // The second bullet found nothing alive and keeps flying
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_clearing_wave_of_21() {
        let mut state = GameState::new(Tuning::timed());
        let speed_before = state.enemy_speed;
        let mut cleared = 0;

        for index in 0..21 {
            aim_at(&mut state, index);
            let events = tick(&mut state, &idle(), 0.0);
            cleared += events
                .iter()
                .filter(|e| matches!(e, GameEvent::WaveCleared { .. }))
                .count();
        }

        assert_eq!(cleared, 1);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 21 * 10);
        assert_eq!(state.enemy_speed, speed_before + 0.5);
        assert_eq!(state.alive_enemies(), 21);
        assert!(state.bullets.is_empty());
        assert_eq!(state.direction, 1.0);
    }

    #[test]
    fn test_reach_costs_one_life_and_resets_wave() {
        let mut state = GameState::new(Tuning::timed());
        state.level = 3;
        state.enemy_speed = 2.0;
        // Two enemies reaching on the same tick still cost a single life
        lone_enemy_near_edge(&mut state, 340.0);
        state.enemies[1].alive = true;
        state.enemies[1].pos = Vec2::new(100.0, 345.0);
        state.bullets.push(Bullet::new(Vec2::new(10.0, 200.0), 6.0));

        let events = tick(&mut state, &idle(), 0.0);
        assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 2 }]);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 3);
        assert_eq!(state.enemy_speed, 2.0);
        assert_eq!(state.alive_enemies(), 21);
        assert!(state.bullets.is_empty());
        assert_eq!(state.direction, 1.0);
    }

    #[test]
    fn test_reach_with_last_life_ends_game() {
        let mut state = GameState::new(Tuning::timed());
        state.lives = 1;
        lone_enemy_near_edge(&mut state, 340.0);

        let events = tick(&mut state, &idle(), 0.0);
        assert_eq!(
            events,
            vec![
                GameEvent::LifeLost { lives_left: 0 },
                GameEvent::GameOver {
                    cause: GameOverCause::OutOfLives
                },
            ]
        );
        assert_eq!(state.phase, GamePhase::GameOver);

        // Movement input no longer has any effect
        let player = state.player.pos;
        let enemy = state.enemies[0].pos;
        let input = TickInput {
            move_left: true,
            fire: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &input, 10_000.0).is_empty());
        assert_eq!(state.player.pos, player);
        assert_eq!(state.enemies[0].pos, enemy);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_clock_counts_down_to_game_over() {
        let mut state = GameState::new(Tuning::timed());
        for _ in 0..59 {
            assert_eq!(tick_clock(&mut state), None);
        }
        assert_eq!(state.time_left, Some(1));
        assert_eq!(
            tick_clock(&mut state),
            Some(GameEvent::GameOver {
                cause: GameOverCause::OutOfTime
            })
        );
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 3);

        // Late interval callbacks are inert
        assert_eq!(tick_clock(&mut state), None);
        assert_eq!(state.time_left, Some(0));
    }

    #[test]
    fn test_clock_ignored_when_untimed() {
        let mut state = GameState::new(Tuning::classic());
        for _ in 0..120 {
            assert_eq!(tick_clock(&mut state), None);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = GameState::new(Tuning::timed());
        state.lives = 1;
        lone_enemy_near_edge(&mut state, 340.0);
        tick(&mut state, &idle(), 0.0);
        assert!(state.is_over());

        state.restart();
        let events = tick(
            &mut state,
            &TickInput {
                move_left: true,
                ..Default::default()
            },
            0.0,
        );
        assert!(events.is_empty());
        assert_eq!(state.player.pos.x, 275.0);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_zero_speed_step_still_speeds_up() {
        let tuning = Tuning::from_json(r#"{ "enemy_speed_step": 0.0 }"#).unwrap();
        let mut state = GameState::new(tuning);
        let speed_before = state.enemy_speed;
        for index in 0..state.enemies.len() {
            aim_at(&mut state, index);
            tick(&mut state, &idle(), 0.0);
        }
        assert_eq!(state.level, 2);
        assert!(state.enemy_speed > speed_before);
    }

    #[test]
    fn test_oversized_grid_is_capped() {
        let tuning = Tuning {
            enemy_rows: 70_000,
            enemy_cols: 70_000,
            ..Tuning::classic()
        };
        let mut state = GameState::new(tuning);
        assert_eq!(state.alive_enemies(), 64);
        // Bottom row still spawns above the player
        assert!(
            state
                .enemies
                .iter()
                .all(|e| e.bounds().bottom() < state.player.pos.y)
        );
        assert!(
            state
                .enemies
                .iter()
                .all(|e| e.bounds().right() < FIELD_WIDTH)
        );
        assert!(tick(&mut state, &idle(), 0.0).is_empty());
    }

    #[test]
    fn test_score_saturates() {
        let tuning = Tuning {
            points_per_kill: u32::MAX,
            ..Tuning::classic()
        };
        let mut state = GameState::new(tuning);
        state.score = 1;
        aim_at(&mut state, 0);
        aim_at(&mut state, 1);
        let events = tick(&mut state, &idle(), 0.0);
        assert_eq!(events.len(), 2);
        assert_eq!(state.score, u32::MAX);
    }

    fn arb_tuning() -> impl Strategy<Value = Tuning> {
        prop_oneof![Just(Tuning::classic()), Just(Tuning::timed())]
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(move_left, move_right, fire)| {
            TickInput {
                move_left,
                move_right,
                fire,
            }
        })
    }

    proptest! {
        #[test]
        fn prop_session_invariants(
            tuning in arb_tuning(),
            inputs in prop::collection::vec(arb_input(), 1..600),
        ) {
            let mut state = GameState::new(tuning);
            let wave_size = state.tuning.wave_size();

            for (i, input) in inputs.iter().enumerate() {
                let alive_before = state.alive_enemies();
                let bullets_before = state.bullets.len() + usize::from(input.fire);
                let (level, lives, speed) = (state.level, state.lives, state.enemy_speed);
                let score_before = state.score;
                let player_before = state.player.pos;
                let was_over = state.is_over();

                let events = tick(&mut state, input, i as f64 * 16.0);

                let kills = events
                    .iter()
                    .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
                    .count();
                prop_assert!(kills <= bullets_before);
                prop_assert_eq!(state.score - score_before, kills as u32 * state.tuning.points_per_kill);

                if was_over {
                    prop_assert!(events.is_empty());
                    prop_assert_eq!(state.player.pos, player_before);
                } else if state.level > level {
                    prop_assert_eq!(state.level, level + 1);
                    prop_assert!(state.enemy_speed > speed);
                    prop_assert_eq!(state.alive_enemies(), wave_size);
                } else if state.lives == lives {
                    prop_assert!(state.alive_enemies() <= alive_before);
                }

                prop_assert!(lives - state.lives <= 1);
                prop_assert_eq!(state.lives == 0, state.is_over());
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= FIELD_WIDTH - PLAYER_WIDTH);
                prop_assert!(state.bullets.iter().all(|b| !b.is_off_screen()));
            }
        }
    }
}
