//! Grid snake: a pure game engine plus a terminal front end that drives it.
//!
//! The [`engine`] owns the snake, the apple, the score and the speed. It is
//! advanced one tick at a time by whoever owns the clock; [`terminal`] is
//! one such owner.

pub mod coordinates;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod grid;
pub mod shared;
pub mod snake;
pub mod terminal;

pub use coordinates::Coordinates;
pub use difficulty::{GameDifficulty, ParseDifficultyError};
pub use engine::{
    ApplePlacement, Collision, EngineConfig, GameEngine, GameState, RunState, StepOutcome,
    DEFAULT_TICK_DELAY_MS, MIN_TICK_DELAY_MS,
};
pub use error::{ConfigError, EngineError};
pub use grid::GridConfig;
pub use shared::SharedEngine;
pub use snake::{Direction, Snake, INIT_SNAKE_SIZE};
