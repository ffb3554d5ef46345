//! Game state and core simulation types
//!
//! All counters that used to be page globals (score, lives, level, timer)
//! live on `GameState` so the tick can be driven and inspected in isolation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::formation;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; waiting for restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    OutOfLives,
    OutOfTime,
}

/// Things that happened during a tick, for the audio/log glue to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fresh session began (initial start or restart)
    Started,
    /// A shot was accepted
    Fired,
    /// A bullet destroyed an enemy
    EnemyDestroyed { points: u32 },
    /// Every enemy in the wave is dead; `level` is the new level
    WaveCleared { level: u32 },
    /// The formation reached the player; `lives_left` may be zero
    LifeLost { lives_left: u32 },
    GameOver { cause: GameOverCause },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Player {
    pub fn new(speed: f32) -> Self {
        Self {
            pos: Self::spawn_pos(),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed,
        }
    }

    /// Horizontally centred, just above the bottom edge
    pub fn spawn_pos() -> Vec2 {
        Vec2::new(
            FIELD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
            FIELD_HEIGHT - PLAYER_BOTTOM_OFFSET,
        )
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Apply held movement intents, keeping the ship on the field
    pub fn steer(&mut self, left: bool, right: bool) {
        let max_x = FIELD_WIDTH - self.size.x;
        if right && self.pos.x < max_x {
            self.pos.x = (self.pos.x + self.speed).min(max_x);
        }
        if left && self.pos.x > 0.0 {
            self.pos.x = (self.pos.x - self.speed).max(0.0);
        }
    }

    /// Where a new bullet's top-left corner goes
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.x / 2.0 - BULLET_WIDTH / 2.0,
            self.pos.y,
        )
    }
}

/// A player projectile travelling upward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Advance one tick upward
    pub fn advance(&mut self) {
        self.pos.y -= self.speed;
    }

    /// True once the whole bullet is above the top of the field
    pub fn is_off_screen(&self) -> bool {
        self.pos.y < -self.size.y
    }
}

/// One member of the formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Read-only values for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Seconds remaining, `None` for an untimed session
    pub time_left: Option<u32>,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance values this session was started with
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    /// 1-based level; increments on every cleared wave
    pub level: u32,
    /// Seconds remaining in a timed session
    pub time_left: Option<u32>,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    /// Spawn order is preserved; dead enemies stay until the next wave
    pub enemies: Vec<Enemy>,
    /// Shared formation heading: +1 right, -1 left
    pub direction: f32,
    /// Formation speed (px per tick)
    pub enemy_speed: f32,
    /// Host time (ms) of the last accepted shot
    pub last_shot_ms: Option<f64>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a fresh, playing session. `tuning` is sanitized first.
    pub fn new(tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut state = Self {
            phase: GamePhase::Playing,
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            time_left: tuning.time_limit_secs,
            player: Player::new(tuning.player_speed),
            bullets: Vec::new(),
            enemies: Vec::new(),
            direction: 1.0,
            enemy_speed: tuning.enemy_base_speed,
            last_shot_ms: None,
            time_ticks: 0,
            tuning,
        };
        state.reset_wave();
        state
    }

    /// Re-initialise every session counter and entity for a new run
    pub fn restart(&mut self) -> GameEvent {
        *self = Self::new(self.tuning.clone());
        GameEvent::Started
    }

    /// Fresh grid, no bullets, heading right. Level and speed are untouched.
    pub fn reset_wave(&mut self) {
        self.bullets.clear();
        self.direction = 1.0;
        self.enemies = formation::spawn_grid(self.tuning.enemy_rows, self.tuning.enemy_cols);
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            level: self.level,
            time_left: self.time_left,
        }
    }
}
