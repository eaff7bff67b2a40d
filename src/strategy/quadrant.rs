//! Divide and conquer: the greedy selector run separately on each quadrant of the board,
//! so play spreads over the whole grid rather than settling wherever the global best happens to be.

use std::ops::Range;

use log::trace;

use crate::board::Board;
use crate::location::{Coord, Dimension, Location};
use crate::moves::Move;
use crate::strategy::greedy::{self, GreedyConfig};

/// Boards smaller than this are searched whole.
pub const MIN_PARTITION_SIZE: Coord = 4;

const PLACE_RATING: f64 = 10.0;
const BLOCK_RATING: f64 = 3.0;
const CENTER_WEIGHT: f64 = 0.05;

/// An axis-aligned region of the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Quadrant {
    /// Columns covered.
    pub xs: Range<Coord>,
    /// Rows covered.
    pub ys: Range<Coord>,
}

impl Quadrant {
    pub fn contains(&self, location: Location) -> bool {
        self.xs.contains(&location.0) && self.ys.contains(&location.1)
    }
}

/// Split a board of side `size` at its midlines into top left, top right, bottom left and bottom right.
/// With an odd side the bottom and right quadrants take the middle row and column.
pub fn quadrants(size: Dimension) -> [Quadrant; 4] {
    let size = size.get();
    let mid = size / 2;
    let (low, high) = (0..mid, mid..size);

    [
        Quadrant { xs: low.clone(), ys: low.clone() },
        Quadrant { xs: high.clone(), ys: low.clone() },
        Quadrant { xs: low.clone(), ys: high.clone() },
        Quadrant { xs: high.clone(), ys: high },
    ]
}

fn rating(mv: &Move, size: Dimension) -> f64 {
    let base = if mv.is_block() { BLOCK_RATING } else { PLACE_RATING };
    base - mv.location().center_distance(size) * CENTER_WEIGHT
}

/// The best of the quadrants' greedy picks; the unrestricted greedy pick if no quadrant has one, or if the board is too small to split.
pub fn select(board: &mut Board, has_token: bool, config: &GreedyConfig) -> Option<Move> {
    let size = board.size();
    if size.get() < MIN_PARTITION_SIZE {
        return greedy::select(board, has_token, config);
    }

    let mut best: Option<(Move, f64)> = None;
    for quadrant in quadrants(size) {
        let Some(candidate) = greedy::select_in(board, has_token, config, |location| quadrant.contains(location)) else {
            continue;
        };

        let score = rating(&candidate, size);
        trace!("quadrant {:?} x {:?} offers {:?} rated {}", quadrant.xs, quadrant.ys, candidate, score);
        // ties go to the earlier quadrant
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.map(|(mv, _)| mv)
        .or_else(|| greedy::select(board, has_token, config))
}
