use crate::coordinates::Coordinates;
use crate::error::ConfigError;
use crate::snake::INIT_SNAKE_SIZE;

pub const DEFAULT_SCREEN_WIDTH: i32 = 800;
pub const DEFAULT_SCREEN_HEIGHT: i32 = 600;
pub const DEFAULT_UNIT_SIZE: i32 = 25;

/// Board geometry for one run. Width and height are in pixels and must be
/// whole multiples of the unit (cell) size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    width: i32,
    height: i32,
    unit: i32,
}

impl GridConfig {
    pub fn new(width: i32, height: i32, unit: i32) -> Result<Self, ConfigError> {
        let grid = GridConfig {
            width,
            height,
            unit,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit <= 0 {
            return Err(ConfigError::NonPositiveUnit(self.unit));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::NonPositiveDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width % self.unit != 0 {
            return Err(ConfigError::NotDivisible {
                dimension: "width",
                value: self.width,
                unit: self.unit,
            });
        }
        if self.height % self.unit != 0 {
            return Err(ConfigError::NotDivisible {
                dimension: "height",
                value: self.height,
                unit: self.unit,
            });
        }
        // the spawn snake is laid out horizontally on a single row
        if self.columns() < INIT_SNAKE_SIZE as i32 {
            return Err(ConfigError::TooSmall {
                columns: self.columns(),
                rows: self.rows(),
            });
        }
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn unit(&self) -> i32 {
        self.unit
    }

    pub fn columns(&self) -> i32 {
        self.width / self.unit
    }

    pub fn rows(&self) -> i32 {
        self.height / self.unit
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() as usize) * (self.rows() as usize)
    }

    pub fn is_in_bound(&self, position: &Coordinates) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    pub fn is_aligned(&self, position: &Coordinates) -> bool {
        position.x % self.unit == 0 && position.y % self.unit == 0
    }

    /// Pixel position of the cell at `(column, row)`.
    pub fn cell(&self, column: i32, row: i32) -> Coordinates {
        Coordinates::new(column * self.unit, row * self.unit)
    }

    /// Cell indices of a pixel position, if it lies on the board.
    pub fn cell_of(&self, position: &Coordinates) -> Option<(i32, i32)> {
        if !self.is_in_bound(position) {
            return None;
        }
        Some((position.x / self.unit, position.y / self.unit))
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            unit: DEFAULT_UNIT_SIZE,
        }
    }
}
