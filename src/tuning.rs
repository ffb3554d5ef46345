//! Data-driven game balance
//!
//! Every number the simulation consults that is not pure geometry lives
//! here, so a host can override it from JSON without recompiling.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Smallest per-wave speed increase; every cleared wave must be faster
pub const MIN_SPEED_STEP: f32 = 0.05;

/// Most formation columns that spawn clear of the right edge
pub fn max_enemy_cols() -> u32 {
    ((FIELD_WIDTH - GRID_ORIGIN_X - ENEMY_WIDTH) / GRID_PITCH_X).ceil() as u32
}

/// Most formation rows that spawn above the player's row
pub fn max_enemy_rows() -> u32 {
    let player_y = FIELD_HEIGHT - PLAYER_BOTTOM_OFFSET;
    ((player_y - GRID_ORIGIN_Y - ENEMY_HEIGHT) / GRID_PITCH_Y).ceil() as u32
}

/// Balance values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player horizontal speed (px per tick)
    pub player_speed: f32,
    /// Bullet vertical speed (px per tick)
    pub bullet_speed: f32,
    /// Minimum time between accepted shots (ms). 0 disables the cooldown.
    pub fire_cooldown_ms: f64,

    /// Formation rows
    pub enemy_rows: u32,
    /// Formation columns
    pub enemy_cols: u32,
    /// Formation speed on level 1 (px per tick)
    pub enemy_base_speed: f32,
    /// Speed added each time a wave is cleared
    pub enemy_speed_step: f32,
    /// Vertical drop when the formation bounces off an edge
    pub enemy_drop: f32,

    /// Lives at session start
    pub starting_lives: u32,
    /// Score per destroyed enemy
    pub points_per_kill: u32,
    /// Session countdown in seconds; `None` for an untimed game
    pub time_limit_secs: Option<u32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::timed()
    }
}

impl Tuning {
    /// Countdown session with a fire cooldown
    pub fn timed() -> Self {
        Self {
            player_speed: 5.0,
            bullet_speed: 6.0,
            fire_cooldown_ms: 180.0,

            enemy_rows: 3,
            enemy_cols: 7,
            enemy_base_speed: 1.0,
            enemy_speed_step: 0.5,
            enemy_drop: 20.0,

            starting_lives: 3,
            points_per_kill: 10,
            time_limit_secs: Some(60),
        }
    }

    /// Untimed session, every fire press shoots
    pub fn classic() -> Self {
        Self {
            fire_cooldown_ms: 0.0,
            time_limit_secs: None,
            ..Self::timed()
        }
    }

    /// Parse a (possibly partial) JSON object; missing fields use `timed()` values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Clamp values that would leave the simulation degenerate
    pub fn sanitized(mut self) -> Self {
        self.enemy_rows = self.enemy_rows.clamp(1, max_enemy_rows());
        self.enemy_cols = self.enemy_cols.clamp(1, max_enemy_cols());
        self.starting_lives = self.starting_lives.max(1);
        self.player_speed = self.player_speed.max(0.0);
        self.bullet_speed = self.bullet_speed.max(0.1);
        self.enemy_base_speed = self.enemy_base_speed.max(0.0);
        self.enemy_speed_step = self.enemy_speed_step.max(MIN_SPEED_STEP);
        self.enemy_drop = self.enemy_drop.max(0.0);
        self.fire_cooldown_ms = self.fire_cooldown_ms.max(0.0);
        self
    }

    /// Enemies in a full wave
    pub fn wave_size(&self) -> usize {
        self.enemy_rows as usize * self.enemy_cols as usize
    }
}
