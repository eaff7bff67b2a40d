//! Bookkeeping the turn loop needs around the engine: whose token is left, and whether the game is over.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::{legal_moves, Move};
use crate::rules;

/// Block token availability, seen from the side about to move.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    /// The side to move still holds its block token.
    pub acting: bool,
    /// The other side still holds its block token.
    pub opposing: bool,
}

impl Default for Tokens {
    fn default() -> Self {
        Self { acting: true, opposing: true }
    }
}

impl Tokens {
    /// The acting side's tokens once it has played `mv`: a block spends its token for good.
    pub fn after(self, mv: Move) -> Self {
        Self {
            acting: self.acting && !mv.is_block(),
            opposing: self.opposing,
        }
    }

    /// The same flags from the other side's point of view.
    pub fn swapped(self) -> Self {
        Self { acting: self.opposing, opposing: self.acting }
    }
}

/// The state of the game for the side about to move.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// Every unblocked cell is filled correctly.
    Complete,
    /// The side to move has no legal move and has lost.
    Stuck,
    /// Neither of the above.
    Ongoing,
}

/// Assess `board` for the side to move. Completion is checked before exhaustion.
pub fn assess(board: &Board, tokens: Tokens) -> Status {
    if rules::is_complete(board) {
        Status::Complete
    } else if legal_moves(board, tokens.acting).is_empty() {
        Status::Stuck
    } else {
        Status::Ongoing
    }
}
