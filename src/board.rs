use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use ndarray::Array2;

use crate::cell::{Cell, Value};
use crate::location::{Dimension, Location};
use crate::moves::{IllegalMove, Move};
use crate::shape::SquareStep;

/// A square grid of [`Cell`]s.
///
/// [`Board`]s should be built using a [`LevelBuilder`](crate::builder::LevelBuilder), which guarantees the grid is at least 3 cells on a side and that every relation is mirrored on its neighbor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    // the board as the level was built, for reset
    pub(crate) level: Array2<Cell>,
    pub(crate) size: Dimension,
}

impl Board {
    /// The side length `N`.
    pub fn size(&self) -> Dimension {
        self.size
    }

    /// The cell at `location`, or [`None`] if `location` is off the board.
    pub fn get(&self, location: Location) -> Option<&Cell> {
        self.cells.get(location.as_index())
    }

    /// Every location on the board in row-major order.
    pub fn locations(&self) -> impl Iterator<Item=Location> + '_ {
        self.cells.indexed_iter().map(|(index, _)| Location::from(index))
    }

    /// Every location with its cell, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item=(Location, &Cell)> + '_ {
        self.cells.indexed_iter().map(|(index, cell)| (Location::from(index), cell))
    }

    /// The neighbor of `location` in `direction`, if it is on the board.
    pub fn neighbor(&self, location: Location, direction: SquareStep) -> Option<(Location, &Cell)> {
        let other = direction.attempt_from(location);
        self.get(other).map(|cell| (other, cell))
    }

    /// Apply `mv` for good, as the turn loop does once a side has decided.
    ///
    /// The move is checked against the current position first; an illegal move leaves the board untouched.
    /// Whether the acting side still holds a block token is the caller's business, see [`Tokens::after`](crate::game::Tokens::after).
    pub fn apply(&mut self, mv: Move) -> Result<(), IllegalMove> {
        if !mv.is_legal(self) {
            return Err(IllegalMove::from(mv));
        }

        self.write(mv);
        Ok(())
    }

    /// Clear every value and block placed since the level was built.
    pub fn reset(&mut self) {
        self.cells.clone_from(&self.level);
    }

    /// Apply `mv` without checking it, returning a guard that restores the previous cell when dropped.
    ///
    /// The guard derefs to the board, so hypothetical positions can be inspected and searched through it.
    pub(crate) fn scoped(&mut self, mv: Move) -> Applied<'_> {
        let undo = self.write(mv);
        Applied { board: self, undo }
    }

    fn write(&mut self, mv: Move) -> Undo {
        let location = mv.location();
        // moves only ever come from locations on this board
        let cell = &mut self.cells[location.as_index()];
        let undo = Undo { location, value: cell.value, blocked: cell.blocked };

        match mv {
            Move::Place { value, .. } => cell.value = Some(value),
            Move::Block { .. } => cell.blocked = true,
        }

        undo
    }
}

/// The prior state of the single cell a move touched.
struct Undo {
    location: Location,
    value: Option<Value>,
    blocked: bool,
}

/// A board with one move applied; dropping it reverts the move.
pub(crate) struct Applied<'a> {
    board: &'a mut Board,
    undo: Undo,
}

impl Deref for Applied<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Applied<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Applied<'_> {
    fn drop(&mut self) {
        let cell = &mut self.board.cells[self.undo.location.as_index()];
        cell.value = self.undo.value;
        cell.blocked = self.undo.blocked;
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", SquareStep::print(self.cells.map(|cell| cell.display())))
    }
}
