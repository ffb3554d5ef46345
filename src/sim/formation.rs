//! Enemy formation: grid spawning and lockstep movement

use glam::Vec2;

use super::state::Enemy;
use crate::consts::*;

/// Build a full `rows` x `cols` wave, row-major, all alive
pub fn spawn_grid(rows: u32, cols: u32) -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(rows as usize * cols as usize);
    for r in 0..rows {
        for c in 0..cols {
            enemies.push(Enemy::new(Vec2::new(
                GRID_ORIGIN_X + c as f32 * GRID_PITCH_X,
                GRID_ORIGIN_Y + r as f32 * GRID_PITCH_Y,
            )));
        }
    }
    enemies
}

/// Advance every alive enemy by `direction * speed`.
///
/// The edge check is batched: one flag for the whole formation, one flip of
/// the shared `direction`, one drop for every alive enemy. Reaching the
/// player is only evaluated on ticks that dropped: returns true when some
/// alive enemy's bottom edge is then at or below `player_y`.
pub fn step(
    enemies: &mut [Enemy],
    direction: &mut f32,
    speed: f32,
    drop: f32,
    player_y: f32,
) -> bool {
    let mut hit_edge = false;
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.x += *direction * speed;
        if enemy.pos.x <= 0.0 || enemy.pos.x + enemy.size.x >= FIELD_WIDTH {
            hit_edge = true;
        }
    }

    if !hit_edge {
        return false;
    }

    *direction = -*direction;
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.y += drop;
    }

    enemies
        .iter()
        .filter(|e| e.alive)
        .any(|e| e.bounds().bottom() >= player_y)
}
