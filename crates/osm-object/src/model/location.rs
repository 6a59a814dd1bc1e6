//! Fixed-point geographic coordinates.

use std::fmt;

use crate::limits::COORDINATE_PRECISION;

/// Sentinel for an unset coordinate.
pub const UNDEFINED_COORDINATE: i32 = i32::MAX;

/// Size of a location in a record: two `i32`.
pub const LOCATION_SIZE: usize = 8;

/// A longitude/latitude pair stored as integers in units of
/// 1 / [`COORDINATE_PRECISION`] degrees.
///
/// The default location is undefined on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Default for Location {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

fn double_to_fix(value: f64) -> i32 {
    (value * COORDINATE_PRECISION as f64).round() as i32
}

fn fix_to_double(value: i32) -> f64 {
    value as f64 / COORDINATE_PRECISION as f64
}

impl Location {
    pub const UNDEFINED: Location = Location {
        x: UNDEFINED_COORDINATE,
        y: UNDEFINED_COORDINATE,
    };

    /// Creates a location from degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            x: double_to_fix(lon),
            y: double_to_fix(lat),
        }
    }

    /// Creates a location from raw fixed-point values.
    pub const fn from_fixed(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn x(self) -> i32 {
        self.x
    }

    pub const fn y(self) -> i32 {
        self.y
    }

    /// True if either coordinate has been set.
    pub const fn is_defined(self) -> bool {
        self.x != UNDEFINED_COORDINATE || self.y != UNDEFINED_COORDINATE
    }

    /// True if both coordinates are within ±180 / ±90 degrees.
    pub const fn is_valid(self) -> bool {
        self.x >= -180 * COORDINATE_PRECISION
            && self.x <= 180 * COORDINATE_PRECISION
            && self.y >= -90 * COORDINATE_PRECISION
            && self.y <= 90 * COORDINATE_PRECISION
    }

    /// Longitude in degrees, if the location is valid.
    pub fn lon(self) -> Option<f64> {
        self.is_valid().then(|| fix_to_double(self.x))
    }

    /// Latitude in degrees, if the location is valid.
    pub fn lat(self) -> Option<f64> {
        self.is_valid().then(|| fix_to_double(self.y))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lon(), self.lat()) {
            (Some(lon), Some(lat)) => write!(f, "({:.7},{:.7})", lon, lat),
            _ => f.write_str("(undefined,undefined)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_undefined() {
        let loc = Location::default();
        assert!(!loc.is_defined());
        assert!(!loc.is_valid());
        assert_eq!(loc.lon(), None);
        assert_eq!(loc.to_string(), "(undefined,undefined)");
    }

    #[test]
    fn test_degrees() {
        let loc = Location::new(13.3888599, 52.5170365);
        assert_eq!(loc.x(), 133_888_599);
        assert_eq!(loc.y(), 525_170_365);
        assert!(loc.is_valid());
        assert!((loc.lon().unwrap() - 13.3888599).abs() < 1e-9);
        assert!((loc.lat().unwrap() - 52.5170365).abs() < 1e-9);
    }

    #[test]
    fn test_bounds() {
        assert!(Location::new(180.0, 90.0).is_valid());
        assert!(Location::new(-180.0, -90.0).is_valid());
        assert!(!Location::new(180.1, 0.0).is_valid());
        assert!(!Location::new(0.0, -90.1).is_valid());
        assert!(Location::new(200.0, 0.0).is_defined());
    }

    #[test]
    fn test_display() {
        assert_eq!(Location::new(1.5, -2.25).to_string(), "(1.5000000,-2.2500000)");
    }
}
