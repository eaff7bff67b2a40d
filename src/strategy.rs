//! Move selection for the computer-controlled side.
//!
//! Each [`Strategy`] variant is a stateless algorithm: it borrows the board mutably while it explores hypothetical moves,
//! restores it exactly before returning, and keeps nothing between calls.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::game::Tokens;
use crate::moves::Move;

pub use adversarial::AdversarialConfig;
pub use greedy::GreedyConfig;

pub mod adversarial;
pub mod greedy;
pub mod quadrant;

/// The available computer opponents, with their parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// One-ply structural evaluation of every legal move, see [`greedy`].
    Greedy(GreedyConfig),
    /// The greedy evaluation run per board quadrant, see [`quadrant`].
    Quadrant(GreedyConfig),
    /// Depth-limited minimax with alpha-beta pruning, see [`adversarial`].
    Adversarial(AdversarialConfig),
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Greedy(GreedyConfig::default())
    }
}

impl Strategy {
    /// Choose a move for the side to move, or [`None`] if it has no legal move and so has lost.
    ///
    /// The returned move is legal on `board`, and is a [`Block`](Move::Block) only if `tokens.acting` is set.
    /// `board` is the same when this returns as when it was called.
    pub fn select_move(&self, board: &mut Board, tokens: Tokens) -> Option<Move> {
        let chosen = match self {
            Self::Greedy(config) => greedy::select(board, tokens.acting, config),
            Self::Quadrant(config) => quadrant::select(board, tokens.acting, config),
            Self::Adversarial(config) => adversarial::select(board, tokens, config),
        };

        debug_assert!(chosen.map_or(true, |mv| mv.is_legal(board) && (tokens.acting || !mv.is_block())));
        debug!("{:?} chose {:?}", self, chosen);
        chosen
    }
}
