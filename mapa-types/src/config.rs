use serde::{Deserialize, Serialize};

/// Highest zoom level a cluster index may be built for.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Clustering parameters for the spatial index.
///
/// `radius` and `extent` are in pixels: two points closer than `radius`
/// pixels on a tile of `extent` pixels at a given zoom end up in the same
/// cluster. Above `max_zoom` every point is shown on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterOptions {
    #[serde(default = "ClusterOptions::default_min_zoom")]
    pub min_zoom: u8,

    #[serde(default = "ClusterOptions::default_max_zoom")]
    pub max_zoom: u8,

    #[serde(default = "ClusterOptions::default_min_points")]
    pub min_points: usize,

    #[serde(default = "ClusterOptions::default_radius")]
    pub radius: f64,

    #[serde(default = "ClusterOptions::default_extent")]
    pub extent: f64,
}

impl ClusterOptions {
    const fn default_min_zoom() -> u8 {
        0
    }

    const fn default_max_zoom() -> u8 {
        12
    }

    const fn default_min_points() -> usize {
        2
    }

    const fn default_radius() -> f64 {
        80.0
    }

    const fn default_extent() -> f64 {
        256.0
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Clamp a requested zoom into the range the index holds levels for.
    ///
    /// ```
    /// use mapa_types::config::ClusterOptions;
    ///
    /// let options = ClusterOptions::default();
    /// assert_eq!(options.clamp_zoom(-3.0), 0);
    /// assert_eq!(options.clamp_zoom(7.9), 7);
    /// assert_eq!(options.clamp_zoom(40.0), 13);
    /// assert_eq!(options.clamp_zoom(f64::NAN), 0);
    /// ```
    pub fn clamp_zoom(&self, zoom: f64) -> u8 {
        let lower = f64::from(self.min_zoom);
        let upper = f64::from(self.max_zoom) + 1.0;
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.floor().clamp(lower, upper) as u8
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(format!("Cluster radius must be positive, got: {}", self.radius));
        }
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(format!("Tile extent must be positive, got: {}", self.extent));
        }
        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(format!(
                "Maximum zoom must be at most {}, got: {}",
                MAX_SUPPORTED_ZOOM, self.max_zoom
            ));
        }
        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "Minimum zoom {} exceeds maximum zoom {}",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.min_points < 2 {
            return Err("A cluster needs at least two points".to_string());
        }
        Ok(())
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            min_zoom: Self::default_min_zoom(),
            max_zoom: Self::default_max_zoom(),
            min_points: Self::default_min_points(),
            radius: Self::default_radius(),
            extent: Self::default_extent(),
        }
    }
}
