//! One-ply structural evaluation.
//!
//! Every candidate is applied to the live board, scored, and reverted. The score adds up:
//! 1. the negated number of values still available to every open cell, or negative infinity if some open cell has none left,
//! 2. a heavy penalty per extra connected component a block creates (and a reward per component merged),
//! 3. a light penalty per new articulation point (and a reward per one removed), plus a bonus for a board without any,
//! 4. a bias for placing numbers over spending the block token,
//! 5. a bias towards the center of the board,
//! 6. a small bonus for the moved-on cell's remaining unblocked neighbors.

use std::cmp::Ordering;

use log::trace;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::graph::Structure;
use crate::location::Location;
use crate::moves::{legal_moves, Move};
use crate::rules::valid_numbers;

const FRAGMENT_PENALTY: f64 = 60.0;
const MERGE_REWARD: f64 = 30.0;
const CUT_VERTEX_PENALTY: f64 = 6.0;
const CUT_VERTEX_REWARD: f64 = 8.0;
const NO_CUT_VERTEX_BONUS: f64 = 6.0;
const PLACE_BIAS: f64 = 20.0;
const BLOCK_BIAS: f64 = 2.0;
const CENTER_REACH: f64 = 6.0;
const DEGREE_WEIGHT: f64 = 0.7;
const DEGREE_CAP: usize = 4;
// far below the smallest structural difference between two moves
const JITTER: f64 = 1e-6;

/// Parameters of the greedy selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreedyConfig {
    /// Above this many candidates, only the ones ranked best by type and center distance are evaluated.
    pub candidate_cap: usize,
    /// Seed of the tie-breaking noise. Each call reseeds, so a call is reproducible.
    pub seed: u64,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            candidate_cap: 120,
            seed: 0x52_554c_4552_4946,
        }
    }
}

/// The best move anywhere on the board.
pub fn select(board: &mut Board, has_token: bool, config: &GreedyConfig) -> Option<Move> {
    select_in(board, has_token, config, |_| true)
}

/// The best move whose cell satisfies `region`, or [`None`] if there is no legal move there.
///
/// If every candidate is a dead end, the first of them is still returned.
pub fn select_in(board: &mut Board, has_token: bool, config: &GreedyConfig, region: impl Fn(Location) -> bool) -> Option<Move> {
    let size = board.size();
    let mut candidates = legal_moves(board, has_token);
    candidates.retain(|mv| region(mv.location()));

    if candidates.len() > config.candidate_cap {
        candidates.sort_by(|a, b| match (a.is_block(), b.is_block()) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => a.location().center_distance(size).total_cmp(&b.location().center_distance(size)),
        });
        candidates.truncate(config.candidate_cap);
    }

    let mut rng = Pcg64::seed_from_u64(config.seed);
    candidates.shuffle(&mut rng);

    let before = Structure::of(board);
    let mut best: Option<(Move, f64)> = None;
    for candidate in candidates {
        let score = evaluate(board, candidate, &before) + rng.random::<f64>() * JITTER;
        trace!("{:?} scores {}", candidate, score);

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.map(|(mv, _)| mv)
}

/// Score `candidate` by applying it, inspecting the result and reverting it.
/// `before` must describe `board` as it is now.
pub(crate) fn evaluate(board: &mut Board, candidate: Move, before: &Structure) -> f64 {
    let size = board.size();
    let location = candidate.location();
    let applied = board.scoped(candidate);

    let Some(domain) = domain_score(&applied) else {
        return f64::NEG_INFINITY;
    };

    // numbers never change which cells are connected
    let rebuilt;
    let after = match candidate {
        Move::Place { .. } => before,
        Move::Block { .. } => {
            rebuilt = Structure::of(&applied);
            &rebuilt
        }
    };

    let mut score = domain;

    score += match after.components().cmp(&before.components()) {
        Ordering::Greater => -FRAGMENT_PENALTY * (after.components() - before.components()) as f64,
        Ordering::Less => MERGE_REWARD * (before.components() - after.components()) as f64,
        Ordering::Equal => 0.0,
    };

    score += match after.articulation_count().cmp(&before.articulation_count()) {
        Ordering::Greater => -CUT_VERTEX_PENALTY * (after.articulation_count() - before.articulation_count()) as f64,
        Ordering::Less => CUT_VERTEX_REWARD * (before.articulation_count() - after.articulation_count()) as f64,
        Ordering::Equal => 0.0,
    };
    if after.articulation_count() == 0 {
        score += NO_CUT_VERTEX_BONUS;
    }

    score += if candidate.is_block() { BLOCK_BIAS } else { PLACE_BIAS };
    score += (CENTER_REACH - location.center_distance(size)).max(0.0);
    score += after.degree(location).min(DEGREE_CAP) as f64 * DEGREE_WEIGHT;

    score
}

/// Minus the total number of values left to the open cells, or [`None`] if any open cell has none.
fn domain_score(board: &Board) -> Option<f64> {
    let mut score = 0.0;
    for (location, cell) in board.cells() {
        if !cell.is_open() {
            continue;
        }

        match valid_numbers(board, location).len() {
            0 => return None,
            options => score -= options as f64,
        }
    }

    Some(score)
}
