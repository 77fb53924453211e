//! Grid coordinates and headings.
//!
//! The robot moves on a rectangular grid of cells. A [`Point`] names a
//! cell by `(row, col)`, and a [`Direction`] names one of the four
//! headings the robot can face or move along.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell on the grid.
///
/// Rows grow downwards and columns grow to the right, so `(0, 0)` is the
/// top-left cell. A `Point` is a plain value: arithmetic returns a new
/// point and never mutates either operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    /// The top-left cell.
    pub const ORIGIN: Point = Point { row: 0, col: 0 };

    /// Creates a point from its row and column.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Clamps each coordinate into `[min, max]`, component-wise.
    ///
    /// If `min` exceeds `max` on an axis, the lower bound wins.
    pub fn clamp(self, min: Point, max: Point) -> Point {
        Point {
            row: clamp_axis(self.row, min.row, max.row),
            col: clamp_axis(self.col, min.col, max.col),
        }
    }

    /// The neighbouring cell one step towards `direction`.
    pub fn step(self, direction: Direction) -> Point {
        self + direction.offset()
    }
}

// Unlike `i32::clamp`, never panics when min > max.
fn clamp_axis(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max.max(min)
    } else {
        value
    }
}

/// Saturates at the `i32` bounds on each axis.
impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.row.saturating_add(rhs.row), self.col.saturating_add(rhs.col))
    }
}

/// Saturates at the `i32` bounds on each axis.
impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.row.saturating_sub(rhs.row), self.col.saturating_sub(rhs.col))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<row={}, col={}>", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the four headings on the grid.
///
/// The discriminants are the wire digits the robot firmware hard-codes
/// (`0=UP, 1=RIGHT, 2=DOWN, 3=LEFT`); they are not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

/// Reverse lookup, indexed by wire digit.
const DIRECTION_BY_DIGIT: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    /// All directions in wire-digit order.
    pub const ALL: [Direction; 4] = DIRECTION_BY_DIGIT;

    /// The single decimal digit used on the wire.
    pub fn digit(self) -> u8 {
        self as u8
    }

    /// Looks up the direction for a wire digit. `None` outside `0..=3`.
    pub fn from_digit(digit: u8) -> Option<Direction> {
        DIRECTION_BY_DIGIT.get(usize::from(digit)).copied()
    }

    /// Unit offset of one step in this direction.
    pub fn offset(self) -> Point {
        match self {
            Direction::Up => Point::new(-1, 0),
            Direction::Right => Point::new(0, 1),
            Direction::Down => Point::new(1, 0),
            Direction::Left => Point::new(0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// The heading after a quarter turn to the right.
    pub fn clockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
        };
        f.write_str(name)
    }
}
