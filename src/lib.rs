//! Canvas Invaders - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Per-frame simulation (formation, bullets, collisions, session state)
//! - `renderer`: Drawing surface abstraction and frame/HUD rendering
//! - `platform`: Input intents and browser event wiring
//! - `audio`: Sound cues and (on web) media element playback
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, Variant};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical playfield dimensions (canvas pixels)
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Player ship size
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;
    /// Distance from the player's top edge to the bottom of the field
    pub const PLAYER_BOTTOM_OFFSET: f32 = 30.0;

    /// Bullet size
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;

    /// Enemy size
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 20.0;

    /// Formation grid layout: top-left of the first enemy and cell pitch
    pub const GRID_ORIGIN_X: f32 = 80.0;
    pub const GRID_ORIGIN_Y: f32 = 30.0;
    pub const GRID_PITCH_X: f32 = 60.0;
    pub const GRID_PITCH_Y: f32 = 40.0;

    /// Countdown granularity (ms between `tick_clock` calls)
    pub const CLOCK_INTERVAL_MS: i32 = 1000;
}
