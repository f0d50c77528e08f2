use std::fmt;

use crate::snake::Direction;

/// Pixel-space position on the board. Cell `(c, r)` lives at `(c * unit, r * unit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub fn new(x: i32, y: i32) -> Coordinates {
        Coordinates { x, y }
    }

    pub fn move_left(&mut self, unit: i32) {
        self.x -= unit;
    }
    pub fn move_right(&mut self, unit: i32) {
        self.x += unit;
    }
    pub fn move_up(&mut self, unit: i32) {
        self.y -= unit;
    }
    pub fn move_down(&mut self, unit: i32) {
        self.y += unit;
    }

    pub fn move_towards(&mut self, direction: Direction, unit: i32) {
        match direction {
            Direction::Up => self.move_up(unit),
            Direction::Down => self.move_down(unit),
            Direction::Left => self.move_left(unit),
            Direction::Right => self.move_right(unit),
        }
    }

    /// Returns the neighbouring position one unit away, leaving `self` untouched.
    pub fn get_towards(&self, direction: Direction, unit: i32) -> Coordinates {
        let mut res = *self;
        res.move_towards(direction, unit);
        res
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
