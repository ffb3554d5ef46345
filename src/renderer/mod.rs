//! Rendering module
//!
//! Frame, HUD and game-over drawing against an abstract 2D `Surface`.
//! The browser implementation lives in `canvas` (wasm only).

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{Aabb, GameState};

/// Image assets the renderer can blit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Enemy,
}

impl Sprite {
    /// Solid colour drawn while the image is not decoded yet
    pub fn fallback_color(&self) -> &'static str {
        match self {
            Sprite::Player => PLAYER_FALLBACK,
            Sprite::Enemy => ENEMY_FALLBACK,
        }
    }
}

pub const PLAYER_FALLBACK: &str = "lime";
pub const ENEMY_FALLBACK: &str = "white";
pub const BULLET_COLOR: &str = "red";
pub const HUD_COLOR: &str = "white";
pub const HUD_FONT: &str = "16px Arial";
pub const TITLE_COLOR: &str = "red";
pub const TITLE_FONT: &str = "30px Arial";

/// Drawing primitives the core needs from the host
pub trait Surface {
    /// Erase the whole logical field
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Aabb, color: &str);
    /// Whether `sprite` has loaded and decoded with a non-zero size
    fn sprite_ready(&self, sprite: Sprite) -> bool;
    fn draw_sprite(&mut self, sprite: Sprite, rect: Aabb);
    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: &str);
}

/// Draw one frame: the playing field while playing, the result screen after
pub fn render<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    surface.clear();

    if state.is_over() {
        draw_game_over(surface, state);
        return;
    }

    draw_sprite_or_rect(surface, Sprite::Player, state.player.bounds());

    for bullet in &state.bullets {
        surface.fill_rect(bullet.bounds(), BULLET_COLOR);
    }

    for enemy in state.enemies.iter().filter(|e| e.alive) {
        draw_sprite_or_rect(surface, Sprite::Enemy, enemy.bounds());
    }

    draw_hud(surface, state);
}

fn draw_sprite_or_rect<S: Surface + ?Sized>(surface: &mut S, sprite: Sprite, rect: Aabb) {
    if surface.sprite_ready(sprite) {
        surface.draw_sprite(sprite, rect);
    } else {
        surface.fill_rect(rect, sprite.fallback_color());
    }
}

/// HUD line at the top of the field
pub fn hud_lines(state: &GameState) -> Vec<(String, Vec2)> {
    let hud = state.hud();
    let mut lines = vec![
        (format!("Score: {}", hud.score), Vec2::new(10.0, 20.0)),
        (format!("Lives: {}", hud.lives), Vec2::new(130.0, 20.0)),
        (format!("Level: {}", hud.level), Vec2::new(220.0, 20.0)),
    ];
    if let Some(secs) = hud.time_left {
        lines.push((format!("Time: {}", secs), Vec2::new(320.0, 20.0)));
    }
    lines
}

fn draw_hud<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    for (text, pos) in hud_lines(state) {
        surface.fill_text(&text, pos, HUD_FONT, HUD_COLOR);
    }
}

fn draw_game_over<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    let cx = FIELD_WIDTH / 2.0;
    let cy = FIELD_HEIGHT / 2.0;

    surface.fill_text("GAME OVER", Vec2::new(cx - 100.0, cy - 10.0), TITLE_FONT, TITLE_COLOR);
    surface.fill_text(
        &format!("Final Score: {}", state.score),
        Vec2::new(cx - 60.0, cy + 20.0),
        HUD_FONT,
        HUD_COLOR,
    );
    surface.fill_text(
        "Press Enter / Tap to Restart",
        Vec2::new(cx - 120.0, cy + 45.0),
        HUD_FONT,
        HUD_COLOR,
    );
}
