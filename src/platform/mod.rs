//! Platform abstraction layer
//!
//! Input intents shared between event handlers and the frame loop, and the
//! mapping from keyboard keys to those intents. DOM listener wiring lives in
//! `web` (wasm only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::TickInput;

/// Canvas element id
pub const CANVAS_ID: &str = "gameCanvas";
/// On-screen control button ids
pub const LEFT_BUTTON_ID: &str = "leftBtn";
pub const RIGHT_BUTTON_ID: &str = "rightBtn";
pub const FIRE_BUTTON_ID: &str = "fireBtn";

/// What a key means in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveLeft,
    MoveRight,
    Fire,
    Restart,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value. While the game is over, Enter and
    /// Space restart instead of firing.
    pub fn from_key(key: &str, game_over: bool) -> Option<Self> {
        match key {
            "Enter" | " " if game_over => Some(KeyAction::Restart),
            "ArrowLeft" => Some(KeyAction::MoveLeft),
            "ArrowRight" => Some(KeyAction::MoveRight),
            " " => Some(KeyAction::Fire),
            _ => None,
        }
    }
}

/// Input state written by event handlers and read once per tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    /// Fire pressed since the last tick
    fire_latched: bool,
}

impl InputState {
    pub fn set_left(&mut self, held: bool) {
        self.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.right = held;
    }

    /// Latch a shot for the next tick
    pub fn fire(&mut self) {
        self.fire_latched = true;
    }

    /// Apply a key press or release. Returns true if a restart was requested.
    pub fn apply_key(&mut self, action: KeyAction, pressed: bool) -> bool {
        match action {
            KeyAction::MoveLeft => self.set_left(pressed),
            KeyAction::MoveRight => self.set_right(pressed),
            KeyAction::Fire if pressed => self.fire(),
            KeyAction::Fire => {}
            KeyAction::Restart => return pressed,
        }
        false
    }

    /// Snapshot for the tick; the fire latch is consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            move_left: self.left,
            move_right: self.right,
            fire: std::mem::take(&mut self.fire_latched),
        }
    }

    /// Forget a pending fire press; held movement keys stay held
    pub fn cancel_fire(&mut self) {
        self.fire_latched = false;
    }
}
