// the snake moves head first: every segment takes the place of the one in front of it,
// and when food is eaten the old tail is kept so the body grows by one
use std::collections::VecDeque;

use crate::coordinates::Coordinates;

pub const INIT_SNAKE_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Coordinates>, // The head is the first element
}

impl Snake {
    /// Lays out `length` segments in a row, the head at `head` and the rest trailing to its left.
    pub fn spawn(head: Coordinates, length: usize, unit: i32) -> Snake {
        let mut body = VecDeque::with_capacity(length);
        let mut current_position = head;
        for _ in 0..length {
            body.push_back(current_position);
            current_position.move_left(unit);
        }
        Snake { body }
    }

    pub fn from_segments(segments: &[Coordinates]) -> Snake {
        Snake {
            body: segments.iter().copied().collect(),
        }
    }

    pub fn head(&self) -> Coordinates {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Coordinates> {
        self.body.iter()
    }

    pub fn to_vec(&self) -> Vec<Coordinates> {
        self.body.iter().copied().collect()
    }

    pub fn occupies(&self, position: &Coordinates) -> bool {
        self.body.contains(position)
    }

    /// Advances the snake one unit and returns the old tail position.
    ///
    /// Dropping the tail and pushing a new head is the same shift as copying
    /// every segment into its successor's slot, without touching the middle of the body.
    pub fn advance(&mut self, direction: Direction, unit: i32) -> Option<Coordinates> {
        let new_head = self.body.front()?.get_towards(direction, unit);
        let old_tail = self.body.pop_back();
        self.body.push_front(new_head);
        old_tail
    }

    /// Re-attaches the tail returned by [`Snake::advance`].
    pub fn grow(&mut self, old_tail: Coordinates) {
        self.body.push_back(old_tail);
    }

    pub fn bites_itself(&self) -> bool {
        // iter over the snake skipping the head, which is always at the front
        let head = self.head();
        self.body.iter().skip(1).any(|body_part| *body_part == head)
    }
}
