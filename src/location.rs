use std::num::NonZero;

use ndarray::Ix;
use serde::{Deserialize, Serialize};

pub type Coord = usize;
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
/// A location `(x, y)` on a board, i.e. `(column, row)`. The top left corner is `Location(0, 0)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    // steps off the top or left wrap to huge coordinates, which ndarray then refuses to index
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// Manhattan distance from the center of a board of side `size`.
    pub(crate) fn center_distance(&self, size: Dimension) -> f64 {
        let center = (size.get() as f64 - 1.0) / 2.0;
        (self.0 as f64 - center).abs() + (self.1 as f64 - center).abs()
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}
