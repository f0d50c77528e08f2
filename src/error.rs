use thiserror::Error;

use crate::coordinates::Coordinates;
use crate::engine::GameState;

/// Rejected game setup. Returned by `start()` before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unit size must be positive, got {0}")]
    NonPositiveUnit(i32),
    #[error("grid dimensions must be positive, got {width}x{height}")]
    NonPositiveDimensions { width: i32, height: i32 },
    #[error("{dimension} {value} is not a multiple of unit size {unit}")]
    NotDivisible {
        dimension: &'static str,
        value: i32,
        unit: i32,
    },
    #[error("grid of {columns}x{rows} cells cannot hold the starting snake")]
    TooSmall { columns: i32, rows: i32 },
    #[error("tick delay {initial}ms must be at least the {min}ms floor, which must be positive")]
    InvalidTickDelay { initial: u64, min: u64 },
}

/// Calls the engine refuses because of the state it is in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("game is not running (state: {state:?})")]
    NotRunning { state: GameState },
    #[error("position {position} is off the grid or not aligned to the unit size")]
    InvalidPosition { position: Coordinates },
    #[error("a snake needs at least one segment")]
    EmptySnake,
}
