//! Legality predicates over a [`Board`].

use itertools::Itertools;
use strum::VariantArray;

use crate::board::Board;
use crate::cell::{Cell, Value};
use crate::graph::Structure;
use crate::location::Location;
use crate::shape::SquareStep;

/// Whether `value` may be written into the cell at `location`.
///
/// The cell must be on the board, open, and `value` must be in `1..=N`, unique among unblocked cells of its row and column,
/// and consistent with every relation whose other end is already filled.
pub fn can_place_number(board: &Board, location: Location, value: Value) -> bool {
    match board.get(location) {
        Some(cell) if cell.is_open() => fits(board, location, cell, value),
        _ => false,
    }
}

/// Check `value` at `location` against everything except the cell's own contents,
/// so a filled cell can be re-validated in place.
fn fits(board: &Board, location: Location, cell: &Cell, value: Value) -> bool {
    let size = board.size().get();
    if value == 0 || value as usize > size {
        return false;
    }

    let Location(x, y) = location;
    let row = (0..size).filter(|other| *other != x).map(|other| Location(other, y));
    let column = (0..size).filter(|other| *other != y).map(|other| Location(x, other));
    let duplicated = row.chain(column)
        .filter_map(|other| board.get(other))
        .any(|other| !other.blocked && other.value == Some(value));
    if duplicated {
        return false;
    }

    // an empty or blocked neighbor cannot violate a relation yet
    SquareStep::VARIANTS.iter().all(|direction| {
        match (cell.relation(*direction), board.neighbor(location, *direction)) {
            (Some(relation), Some((_, neighbor))) if !neighbor.blocked => neighbor.value
                .map_or(true, |neighbor_value| relation.holds(value, neighbor_value)),
            _ => true,
        }
    })
}

/// Every value in `1..=N` that [`can_place_number`] accepts at `location`.
pub fn valid_numbers(board: &Board, location: Location) -> Vec<Value> {
    (1..=board.size().get() as Value)
        .filter(|value| can_place_number(board, location, *value))
        .collect_vec()
}

/// The local half of block legality: the cell must be open and no orthogonal neighbor may be blocked.
pub(crate) fn block_fits_locally(board: &Board, location: Location) -> bool {
    match board.get(location) {
        Some(cell) if cell.is_open() => SquareStep::neighbors_of(location)
            .filter_map(|(_, neighbor)| board.get(neighbor))
            .all(|neighbor| !neighbor.blocked),
        _ => false,
    }
}

/// Whether the cell at `location` may be blocked.
///
/// On top of the local rules, blocking must leave the unblocked cells in a single connected region.
pub fn can_place_block(board: &Board, location: Location) -> bool {
    block_fits_locally(board, location) && Structure::of(board).can_remove(location)
}

/// [`can_place_block`] against a [`Structure`] already computed for `board`, for callers checking many cells of one position.
pub fn can_place_block_with(board: &Board, structure: &Structure, location: Location) -> bool {
    block_fits_locally(board, location) && structure.can_remove(location)
}

/// Whether every unblocked cell can reach every other one. Trivially true when nothing is unblocked.
pub fn region_connected(board: &Board) -> bool {
    Structure::of(board).is_connected()
}

/// Whether every unblocked cell is filled and each filled cell is still valid against its row, column and neighbors.
pub fn is_complete(board: &Board) -> bool {
    board.cells().all(|(location, cell)| match (cell.blocked, cell.value) {
        (true, _) => true,
        (false, None) => false,
        (false, Some(value)) => fits(board, location, cell, value),
    })
}
