//! Spherical Web Mercator projection onto the unit square.
//!
//! x grows eastward from 0 at -180° to 1 at 180°, y grows southward from
//! 0 at the northern mercator limit to 1 at the southern one. One tile at
//! zoom `z` covers `1 / 2^z` of the square on each axis.

use std::f64::consts::PI;

/// Project a longitude to x in [0, 1].
#[inline]
pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Project a latitude to y in [0, 1], clamping at the mercator limits.
#[inline]
pub fn lat_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Inverse of [`lng_x`].
#[inline]
pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Inverse of [`lat_y`].
#[inline]
pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

/// Normalise a longitude into [-180, 180).
#[inline]
pub fn wrap_lng(lng: f64) -> f64 {
    ((lng + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}

/// Clustering radius at `zoom` expressed in unit-square distance.
#[inline]
pub fn radius_at_zoom(radius: f64, extent: f64, zoom: u8) -> f64 {
    radius / (extent * 2f64.powi(i32::from(zoom)))
}
