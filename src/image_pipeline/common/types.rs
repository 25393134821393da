//! Coordinate types shared by every stage

use std::fmt;

/// Integer pixel coordinate: `x` is the column, `y` the row.
///
/// Signed so that coordinates produced by a geometric transform can land
/// outside the canvas and still be represented until they are bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: i64,
    pub y: i64,
}

impl PixelCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
