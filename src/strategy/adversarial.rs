//! Depth-limited minimax with alpha-beta pruning.
//!
//! The side asked to move is the maximizing side and every score is "goodness" for it.
//! Positions seen once in a decision are memoized for the rest of that decision only;
//! the memo lives in a [`Search`] owned by one call of [`select`] and is dropped with it.
//!
//! Only the best-ranked [`AdversarialConfig::branch_limit`] moves of each node are explored.
//! This gives up completeness so that a decision takes bounded time on large, open boards.

use std::collections::HashMap;
use std::num::NonZero;

use log::{debug, trace};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::Cell;
use crate::game::Tokens;
use crate::moves::{legal_moves, ranked_legal_moves, Move};
use crate::rules::is_complete;

/// A side with no legal move loses; this outweighs any static evaluation.
pub(crate) const LOSS: i32 = 10_000;
const FILLED_CREDIT: i32 = 5;
const TOKEN_CREDIT: i32 = 10;
const MOBILITY_WEIGHT: i32 = 1;

/// Parameters of the adversarial selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarialConfig {
    /// Plies searched below the root.
    pub depth: NonZero<u8>,
    /// Moves explored per node, best-ranked first.
    pub branch_limit: usize,
}

impl Default for AdversarialConfig {
    fn default() -> Self {
        Self {
            depth: NonZero::<u8>::MIN.saturating_add(3),
            branch_limit: 20,
        }
    }
}

/// Everything that decides the value of a position within one search.
/// Each move fills or blocks exactly one cell, so the distance from the root follows from the cells.
#[derive(Clone, Eq, Hash, PartialEq)]
struct StateKey {
    cells: Array2<Cell>,
    maximizing: bool,
    tokens: Tokens,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Bound {
    Exact,
    // the true score is at least this
    Lower,
    // the true score is at most this
    Upper,
}

#[derive(Copy, Clone, Debug)]
struct Entry {
    score: i32,
    bound: Bound,
}

/// One decision's worth of search state.
struct Search<'c> {
    config: &'c AdversarialConfig,
    memo: HashMap<StateKey, Entry>,
    nodes: u64,
    memo_hits: u64,
    cutoffs: u64,
}

/// Search `config.depth` plies ahead and return the root move with the best minimax score,
/// or [`None`] if the side to move has no legal move.
///
/// `tokens` is seen from the side to move, which is the maximizing side.
pub fn select(board: &mut Board, tokens: Tokens, config: &AdversarialConfig) -> Option<Move> {
    let mut search = Search::new(config);
    let chosen = search.root(board, tokens);

    debug!(
        "searched {} nodes to depth {} ({} memo hits, {} cutoffs), best {:?}",
        search.nodes, config.depth, search.memo_hits, search.cutoffs, chosen,
    );
    chosen.map(|(mv, _)| mv)
}

/// The score [`select`] assigns to its chosen move, for inspecting the search.
pub fn score(board: &mut Board, tokens: Tokens, config: &AdversarialConfig) -> Option<i32> {
    Search::new(config).root(board, tokens).map(|(_, score)| score)
}

impl<'c> Search<'c> {
    fn new(config: &'c AdversarialConfig) -> Self {
        Self {
            config,
            memo: HashMap::new(),
            nodes: 0,
            memo_hits: 0,
            cutoffs: 0,
        }
    }

    fn root(&mut self, board: &mut Board, tokens: Tokens) -> Option<(Move, i32)> {
        let depth = self.config.depth.get();
        let mut alpha = i32::MIN;
        let mut best: Option<(Move, i32)> = None;

        for mv in ranked_legal_moves(board, tokens.acting).into_iter().take(self.config.branch_limit) {
            let score = {
                let mut applied = board.scoped(mv);
                self.minimax(&mut applied, tokens.after(mv).swapped(), depth - 1, false, alpha, i32::MAX)
            };
            trace!("root move {:?} scores {}", mv, score);

            // the first of equally good moves wins
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        best
    }

    /// The minimax value of `board` with `depth` plies left, `tokens` seen from the side to move.
    fn minimax(&mut self, board: &mut Board, tokens: Tokens, depth: u8, maximizing: bool, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;

        let key = StateKey { cells: board.cells.clone(), maximizing, tokens };
        if let Some(entry) = self.memo.get(&key) {
            let usable = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => entry.score >= beta,
                Bound::Upper => entry.score <= alpha,
            };
            if usable {
                self.memo_hits += 1;
                return entry.score;
            }
        }

        // a finished board ends the game before anyone can be stuck
        if is_complete(board) {
            let score = self.evaluate(board, tokens, maximizing);
            self.memo.insert(key, Entry { score, bound: Bound::Exact });
            return score;
        }

        let moves = ranked_legal_moves(board, tokens.acting);
        if moves.is_empty() {
            // losing later is better than losing now
            let ply = (self.config.depth.get() - depth) as i32;
            let score = if maximizing { -LOSS + ply } else { LOSS - ply };
            self.memo.insert(key, Entry { score, bound: Bound::Exact });
            return score;
        }

        if depth == 0 {
            let score = self.evaluate(board, tokens, maximizing);
            self.memo.insert(key, Entry { score, bound: Bound::Exact });
            return score;
        }

        let (alpha_before, beta_before) = (alpha, beta);
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves.into_iter().take(self.config.branch_limit) {
            let score = {
                let mut applied = board.scoped(mv);
                self.minimax(&mut applied, tokens.after(mv).swapped(), depth - 1, !maximizing, alpha, beta)
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if beta <= alpha {
                self.cutoffs += 1;
                break;
            }
        }

        let bound = if best <= alpha_before {
            Bound::Upper
        } else if best >= beta_before {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.memo.insert(key, Entry { score: best, bound });

        best
    }

    /// Static evaluation, always from the maximizing side's point of view.
    fn evaluate(&self, board: &Board, tokens: Tokens, maximizing: bool) -> i32 {
        let ours = if maximizing { tokens } else { tokens.swapped() };

        let filled = board.cells()
            .filter(|(_, cell)| !cell.is_blocked() && cell.value().is_some())
            .count() as i32;

        // both sides face the same cells; only their tokens differ
        let mobility = legal_moves(board, ours.acting).len() as i32 - legal_moves(board, ours.opposing).len() as i32;

        let mut score = filled * FILLED_CREDIT + mobility * MOBILITY_WEIGHT;
        if ours.acting {
            score += TOKEN_CREDIT;
        }
        if ours.opposing {
            score -= TOKEN_CREDIT;
        }

        score
    }
}
