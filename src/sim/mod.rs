//! Simulation module
//!
//! All gameplay logic lives here. No rendering, input or platform
//! dependencies: the host feeds in `TickInput` and a clock, and reacts to
//! the returned `GameEvent`s.

pub mod collision;
pub mod formation;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{
    Bullet, Enemy, GameEvent, GameOverCause, GamePhase, GameState, Hud, Player,
};
pub use tick::{TickInput, fire, tick, tick_clock};
