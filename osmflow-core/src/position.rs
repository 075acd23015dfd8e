//! Fixed-precision WGS84 positions.

use geo::Coord;

use crate::Bounds;

/// Number of fixed-point units per degree.
pub const COORDINATE_PRECISION: i32 = 10_000_000;

/// A longitude/latitude pair stored with seven decimal digits of precision.
///
/// Degrees are rounded to the nearest 1e-7 on construction, so two positions
/// parsed from the same decimal text always compare equal.
///
/// # Examples
/// ```
/// use osmflow_core::Position;
///
/// let position = Position::from_degrees(7.0, 52.0);
/// assert_eq!(position.lon(), 7.0);
/// assert_eq!(position.lat(), 52.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Build a position from raw fixed-point units.
    #[must_use]
    pub const fn from_fixed(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build a position from degrees, rounding to the fixed precision.
    ///
    /// Values outside [`Position::representable`] saturate; readers check
    /// coordinates with it before building a position.
    #[must_use]
    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self {
            x: degrees_to_fixed(lon),
            y: degrees_to_fixed(lat),
        }
    }

    /// Whether `degrees` is finite and fits the fixed-point range.
    ///
    /// ```
    /// use osmflow_core::Position;
    ///
    /// assert!(Position::representable(-180.0));
    /// assert!(!Position::representable(f64::NAN));
    /// assert!(!Position::representable(1e12));
    /// ```
    #[must_use]
    pub fn representable(degrees: f64) -> bool {
        let scaled = (degrees * f64::from(COORDINATE_PRECISION)).round();
        scaled.is_finite() && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&scaled)
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lon(self) -> f64 {
        fixed_to_degrees(self.x)
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat(self) -> f64 {
        fixed_to_degrees(self.y)
    }

    /// Raw fixed-point longitude.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    /// Raw fixed-point latitude.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Whether the position lies inside the WGS84 coordinate range.
    #[must_use]
    pub fn is_valid(self) -> bool {
        (-180.0..=180.0).contains(&self.lon()) && (-90.0..=90.0).contains(&self.lat())
    }

    /// Widen `bounds` so that it contains this position.
    pub fn extend(self, bounds: &mut Bounds) {
        bounds.extend(self);
    }
}

impl From<Position> for Coord<f64> {
    fn from(position: Position) -> Self {
        Self {
            x: position.lon(),
            y: position.lat(),
        }
    }
}

fn degrees_to_fixed(degrees: f64) -> i32 {
    let scaled = (degrees * f64::from(COORDINATE_PRECISION)).round();
    // Saturates; NaN becomes zero.
    scaled as i32
}

fn fixed_to_degrees(fixed: i32) -> f64 {
    f64::from(fixed) / f64::from(COORDINATE_PRECISION)
}
