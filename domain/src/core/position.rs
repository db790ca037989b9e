//! Grid coordinates.

use serde::{Serialize, Serializer};
use std::fmt;

/// A tile on the simulation grid.
///
/// Serializes as a two-element array `[x, y]`, which is the shape the
/// command schema uses for `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i64,
    pub y: i64,
}

impl GridPos {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Saturates at `u64::MAX` for positions at opposite ends of the range.
    pub fn manhattan(&self, other: &GridPos) -> u64 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// One tile toward `target` along the axis with the larger absolute
    /// delta. Equal deltas step along x. Returns `self` when already there.
    pub fn step_toward(&self, target: &GridPos) -> GridPos {
        let dx = self.x.abs_diff(target.x);
        let dy = self.y.abs_diff(target.y);
        if dx == 0 && dy == 0 {
            return *self;
        }
        if dx >= dy {
            GridPos::new(step(self.x, target.x), self.y)
        } else {
            GridPos::new(self.x, step(self.y, target.y))
        }
    }
}

// `to != from`, so the result stays strictly between the two and cannot overflow.
fn step(from: i64, to: i64) -> i64 {
    if to > from { from + 1 } else { from - 1 }
}

impl From<(i64, i64)> for GridPos {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Serialize for GridPos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}
