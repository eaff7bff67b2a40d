use serde::{Deserialize, Serialize};

use crate::shape::SquareStep;

/// A number placed in a cell, in `1..=N` for a board of side `N`.
pub type Value = u8;

/// An inequality between a cell and one of its neighbors, read as "this cell is `<` / `>` the neighbor".
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Relation {
    /// This cell holds the smaller number.
    LessThan,
    /// This cell holds the larger number.
    GreaterThan,
}

impl Relation {
    /// The same relation as seen from the neighbor.
    pub fn invert(&self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::GreaterThan => Self::LessThan,
        }
    }

    /// Whether `this` and `neighbor` satisfy the relation numerically.
    pub fn holds(&self, this: Value, neighbor: Value) -> bool {
        match self {
            Self::LessThan => this < neighbor,
            Self::GreaterThan => this > neighbor,
        }
    }
}

/// One grid position.
///
/// Relations are fixed once the level is built; `value` and `blocked` change during play.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Cell {
    pub(crate) value: Option<Value>,
    pub(crate) blocked: bool,
    // indexed by SquareStep::slot
    pub(crate) relations: [Option<Relation>; 4],
}

impl Cell {
    pub fn value(&self) -> Option<Value> {
        self.value
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Open means neither blocked nor filled.
    pub fn is_open(&self) -> bool {
        !self.blocked && self.value.is_none()
    }

    /// The relation between this cell and its neighbor in `direction`, if one is printed there.
    pub fn relation(&self, direction: SquareStep) -> Option<Relation> {
        self.relations[direction.slot()]
    }

    pub(crate) fn display(&self) -> char {
        match (self.blocked, self.value) {
            (true, _) => '#',
            (false, None) => '.',
            (false, Some(value)) => char::from_digit(value as u32, 36).unwrap_or('?'),
        }
    }
}
