use geo::Point;
use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// Unlike a `geo::Rect` the corners are not normalised: a box whose `west`
/// edge is greater than its `east` edge crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLatBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl LngLatBounds {
    /// Create a new bounding box from its edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapa_types::bbox::LngLatBounds;
    ///
    /// let buenos_aires = LngLatBounds::new(-58.53, -34.71, -58.33, -34.52);
    /// assert!(!buenos_aires.crosses_antimeridian());
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The whole world.
    pub fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Whether the box wraps past 180° longitude.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitudinal span in degrees, accounting for antimeridian wrap.
    pub fn width(&self) -> f64 {
        if self.crosses_antimeridian() {
            360.0 - (self.west - self.east)
        } else {
            self.east - self.west
        }
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center of the box, with longitude normalised to [-180, 180].
    pub fn center(&self) -> Point<f64> {
        let mut lng = self.west + self.width() / 2.0;
        if lng > 180.0 {
            lng -= 360.0;
        }
        Point::new(lng, (self.south + self.north) / 2.0)
    }

    /// Check if a point is contained within this bounding box.
    ///
    /// ```
    /// use mapa_types::bbox::LngLatBounds;
    /// use geo::Point;
    ///
    /// let pacific = LngLatBounds::new(170.0, -10.0, -170.0, 10.0);
    /// assert!(pacific.contains_point(&Point::new(179.5, 0.0)));
    /// assert!(pacific.contains_point(&Point::new(-175.0, 0.0)));
    /// assert!(!pacific.contains_point(&Point::new(0.0, 0.0)));
    /// ```
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        let (x, y) = (point.x(), point.y());
        if y < self.south || y > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            x >= self.west || x <= self.east
        } else {
            x >= self.west && x <= self.east
        }
    }
}

impl Default for LngLatBounds {
    fn default() -> Self {
        Self::world()
    }
}
