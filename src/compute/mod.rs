//! Geometry helpers shared by the index and the query engine.

pub mod projection;
pub mod validation;

pub use validation::{point_from_coordinates, validate_geographic_point};
