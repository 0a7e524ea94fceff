//! Validation for geographic coordinates.

use crate::error::{MapaError, Result};
use geo::Point;

/// Validates a point has a finite longitude in [-180, 180] and latitude in
/// [-90, 90].
///
/// # Examples
///
/// ```
/// use mapa::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// let cordoba = Point::new(-64.1888, -31.4201);
/// assert!(validate_geographic_point(&cordoba).is_ok());
///
/// // Latitude and longitude swapped on a point far from the equator
/// let swapped = Point::new(-31.4201, -164.1888);
/// assert!(validate_geographic_point(&swapped).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    check_axis("Longitude", point.x(), 180.0)?;
    check_axis("Latitude", point.y(), 90.0)
}

/// One coordinate must be finite and within `-limit..=limit` degrees.
fn check_axis(axis: &str, degrees: f64, limit: f64) -> Result<()> {
    if degrees.is_finite() && degrees.abs() <= limit {
        return Ok(());
    }
    Err(MapaError::InvalidInput(format!(
        "{} {} is not a finite value within ±{}°",
        axis, degrees, limit
    )))
}

/// Builds a point from a `[longitude, latitude]` coordinate array.
pub fn point_from_coordinates(coordinates: &[f64]) -> Result<Point> {
    if coordinates.len() != 2 {
        return Err(MapaError::InvalidInput(format!(
            "Point must have exactly 2 coordinates, got: {}",
            coordinates.len()
        )));
    }
    let point = Point::new(coordinates[0], coordinates[1]);
    validate_geographic_point(&point)?;
    Ok(point)
}
