use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::Value;
use crate::graph::Structure;
use crate::location::Location;
use crate::rules;

/// A single turn: write a number into an open cell, or spend the side's block token on one.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Move {
    /// Write `value` into the open cell at `location`.
    Place { location: Location, value: Value },
    /// Block the open cell at `location`, spending the side's token.
    Block { location: Location },
}

impl Move {
    /// The cell this move touches.
    pub fn location(&self) -> Location {
        match self {
            Self::Place { location, .. } | Self::Block { location } => *location,
        }
    }

    #[inline]
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// Whether the board's rules allow this move right now, leaving aside who holds a block token.
    pub fn is_legal(&self, board: &Board) -> bool {
        match *self {
            Self::Place { location, value } => rules::can_place_number(board, location, value),
            Self::Block { location } => rules::can_place_block(board, location),
        }
    }

    // places before blocks, higher numbers first
    fn rank(&self) -> usize {
        match self {
            Self::Place { value, .. } => 100 + *value as usize,
            Self::Block { .. } => 10,
        }
    }
}

/// A move rejected by [`Board::apply`](crate::Board::apply).
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum IllegalMove {
    /// The number does not fit the cell, or the cell is not open.
    #[error("{value} cannot be placed at {location:?}")]
    Place { location: Location, value: Value },
    /// The cell is not open, touches a block, or holds the unblocked region together.
    #[error("{location:?} cannot be blocked")]
    Block { location: Location },
}

impl From<Move> for IllegalMove {
    fn from(value: Move) -> Self {
        match value {
            Move::Place { location, value } => Self::Place { location, value },
            Move::Block { location } => Self::Block { location },
        }
    }
}

/// Every legal move on `board` for a side that does or does not still hold its block token.
///
/// Moves come out in board order; callers must not rely on it.
pub fn legal_moves(board: &Board, has_token: bool) -> Vec<Move> {
    // one structure serves every block check of this position
    let structure = has_token.then(|| Structure::of(board));
    let mut moves = Vec::new();

    for (location, cell) in board.cells() {
        if !cell.is_open() {
            continue;
        }

        moves.extend(rules::valid_numbers(board, location).into_iter()
            .map(|value| Move::Place { location, value }));

        if let Some(structure) = &structure {
            if rules::can_place_block_with(board, structure, location) {
                moves.push(Move::Block { location });
            }
        }
    }

    moves
}

/// [`legal_moves`], with every [`Place`](Move::Place) ahead of every [`Block`](Move::Block) and larger numbers first.
/// Equally ranked moves keep board order, so the ranking is deterministic.
pub fn ranked_legal_moves(board: &Board, has_token: bool) -> Vec<Move> {
    let mut moves = legal_moves(board, has_token);
    moves.sort_by_key(|mv| Reverse(mv.rank()));
    moves
}
