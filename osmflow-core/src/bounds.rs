//! Bounding-box accumulator.

use geo::{Coord, Rect};

use crate::Position;

/// Minimal and maximal corners of every position seen so far.
///
/// A fresh accumulator is undefined; the first [`Bounds::extend`] call sets
/// both corners and later calls only ever grow the box.
///
/// # Examples
/// ```
/// use osmflow_core::{Bounds, Position};
///
/// let mut bounds = Bounds::new();
/// assert!(!bounds.is_defined());
///
/// bounds
///     .extend(Position::from_degrees(1.0, 1.0))
///     .extend(Position::from_degrees(2.0, 2.0))
///     .extend(Position::from_degrees(0.0, 3.0));
///
/// assert_eq!(bounds.min(), Some(Position::from_degrees(0.0, 1.0)));
/// assert_eq!(bounds.max(), Some(Position::from_degrees(2.0, 3.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    corners: Option<(Position, Position)>,
}

impl Bounds {
    /// Create an undefined accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { corners: None }
    }

    /// Grow the box so that it contains `position`.
    pub fn extend(&mut self, position: Position) -> &mut Self {
        self.corners = Some(match self.corners {
            None => (position, position),
            Some((min, max)) => (
                Position::from_fixed(min.x().min(position.x()), min.y().min(position.y())),
                Position::from_fixed(max.x().max(position.x()), max.y().max(position.y())),
            ),
        });
        self
    }

    /// Whether any position has been seen.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.corners.is_some()
    }

    /// South-west corner, if defined.
    #[must_use]
    pub fn min(&self) -> Option<Position> {
        self.corners.map(|(min, _)| min)
    }

    /// North-east corner, if defined.
    #[must_use]
    pub fn max(&self) -> Option<Position> {
        self.corners.map(|(_, max)| max)
    }

    /// The box as a `geo` rectangle (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn to_rect(&self) -> Option<Rect<f64>> {
        self.corners
            .map(|(min, max)| Rect::new(Coord::from(min), Coord::from(max)))
    }
}
