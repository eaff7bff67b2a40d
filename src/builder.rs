use std::collections::HashMap;
use std::num::NonZero;

use ndarray::Array2;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::cell::{Cell, Relation, Value};
use crate::location::{Dimension, Location};
use crate::shape::SquareStep;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuilderInvalidReason {
    /// Boards must be at least 3 cells on a side.
    #[error("board is smaller than 3x3")]
    BoardTooSmall,
    /// A feature was placed outside the board, or a row of the wrong length was given.
    #[error("feature lies outside the board")]
    FeatureOutOfBounds,
    /// A preset value was outside `1..=N`.
    #[error("value lies outside 1..=N")]
    ValueOutOfRange,
    /// A relation was set on a pair of cells that already carry the opposite relation.
    #[error("relation contradicts one already set on the same pair of cells")]
    ConflictingRelation,
    /// A row passed to [`LevelBuilder::with_rows`] contained a character other than `.`, `#` or a digit.
    #[error("unknown symbol {0:?} in board row")]
    UnknownSymbol(char),
}

/// A builder for levels: the starting board of a game, with its relations, preset blocks and preset numbers.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once a problem is detected the builder records a [`BuilderInvalidReason`] and every later call does nothing.
#[derive(Clone)]
pub struct LevelBuilder {
    size: Dimension,
    cells: Array2<Cell>,
    invalid_reasons: Vec<BuilderInvalidReason>,
    // each relation is stored as seen from the lower of its two locations
    relations: HashMap<UnorderedPair<Location>, (Location, Relation)>,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::with_size(NonZero::new(5).unwrap_or(NonZero::<usize>::MIN))
    }
}

impl LevelBuilder {
    /// Construct a new, empty square board of side `size`.
    ///
    /// Sizes below 3 put the builder in a [`BoardTooSmall`](BuilderInvalidReason::BoardTooSmall) invalid state.
    pub fn with_size(size: Dimension) -> Self {
        let mut invalid_reasons = Vec::new();
        if size.get() < 3 {
            invalid_reasons.push(BuilderInvalidReason::BoardTooSmall);
        }

        Self {
            size,
            cells: Array2::from_shape_simple_fn((size.get(), size.get()), Cell::default),
            invalid_reasons,
            relations: Default::default(),
        }
    }

    /// The stock level: on boards of side 5 or more, one preset block and four relations; smaller boards start empty.
    pub fn preset(size: Dimension) -> Self {
        let mut builder = Self::with_size(size);
        if size.get() < 5 {
            return builder;
        }

        builder
            .add_block(Location(2, 1))
            .add_relation(Location(0, 0), SquareStep::Right, Relation::LessThan)
            .add_relation(Location(3, 2), SquareStep::Down, Relation::GreaterThan)
            .add_relation(Location(0, 4), SquareStep::Right, Relation::LessThan)
            .add_relation(Location(3, 3), SquareStep::Left, Relation::LessThan);

        builder
    }

    #[inline]
    fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.size.get() && location.1 < self.size.get()
    }

    fn invalidate(&mut self, reason: BuilderInvalidReason) -> &mut Self {
        self.invalid_reasons.push(reason);
        self
    }

    /// Require the cell at `location` to be `relation` compared to its neighbor in `direction`.
    /// The neighbor receives the inverse relation automatically.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if either cell is off the board,
    /// or a [`ConflictingRelation`](BuilderInvalidReason::ConflictingRelation) invalid state if the pair already carries the opposite relation.
    pub fn add_relation(&mut self, location: Location, direction: SquareStep, relation: Relation) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let neighbor = direction.attempt_from(location);
        if !self.in_bounds(location) || !self.in_bounds(neighbor) {
            return self.invalidate(BuilderInvalidReason::FeatureOutOfBounds);
        }

        let (from, normalized) = if location < neighbor {
            (location, relation)
        } else {
            (neighbor, relation.invert())
        };

        match self.relations.insert(UnorderedPair::from((location, neighbor)), (from, normalized)) {
            Some((_, existing)) if existing != normalized => self.invalidate(BuilderInvalidReason::ConflictingRelation),
            _ => self,
        }
    }

    /// Block the cell at `location` from the start of the game. Preset blocks survive [`Board::reset`].
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is off the board.
    pub fn add_block(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            return self.invalidate(BuilderInvalidReason::FeatureOutOfBounds);
        }

        self.cells[location.as_index()].blocked = true;
        self
    }

    /// Preset the number at `location`.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is off the board,
    /// or a [`ValueOutOfRange`](BuilderInvalidReason::ValueOutOfRange) invalid state if `value` is not in `1..=N`.
    pub fn set_value(&mut self, location: Location, value: Value) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            return self.invalidate(BuilderInvalidReason::FeatureOutOfBounds);
        }

        if value == 0 || value as usize > self.size.get() {
            return self.invalidate(BuilderInvalidReason::ValueOutOfRange);
        }

        self.cells[location.as_index()].value = Some(value);
        self
    }

    /// Lay out values and blocks row by row, top to bottom, in the same alphabet the board displays with:
    /// a digit for a number, `#` for a block and `.` for an empty cell.
    ///
    /// Shorter or longer rows, or too many rows, cause a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state.
    pub fn with_rows(&mut self, rows: &[&str]) -> &mut Self {
        if rows.len() > self.size.get() {
            return self.invalidate(BuilderInvalidReason::FeatureOutOfBounds);
        }

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != self.size.get() {
                return self.invalidate(BuilderInvalidReason::FeatureOutOfBounds);
            }

            for (x, symbol) in row.chars().enumerate() {
                match symbol {
                    '.' => {}
                    '#' => { self.add_block(Location(x, y)); }
                    _ => match symbol.to_digit(10) {
                        Some(digit) => { self.set_value(Location(x, y), digit as Value); }
                        None => return self.invalidate(BuilderInvalidReason::UnknownSymbol(symbol)),
                    }
                }
            }
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Board, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let mut cells = self.cells.clone();
        for (UnorderedPair(a, b), (from, relation)) in self.relations.iter() {
            let to = if a == from { *b } else { *a };
            // in bounds and adjacent, checked on insertion
            let Some(direction) = SquareStep::direction_to(*from, to) else { continue };

            cells[from.as_index()].relations[direction.slot()] = Some(*relation);
            cells[to.as_index()].relations[direction.invert().slot()] = Some(relation.invert());
        }

        Ok(Board {
            level: cells.clone(),
            cells,
            size: self.size,
        })
    }
}
