//! Configuration for the map clustering library
//!
//! This module provides configuration types and re-exports the clustering
//! options from the `mapa-types` crate for convenience.
use serde::de::Error;

use crate::error::{MapaError, Result};

pub use mapa_types::config::ClusterOptions;

/// Library configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterOptions,

    /// Cluster and leaf marker appearance
    #[serde(default)]
    pub markers: MarkerStyle,

    /// Zoom range of the map view
    #[serde(default)]
    pub view: ViewLimits,
}

/// Sizing of rendered cluster markers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerStyle {
    /// Pixel size of a cluster marker before growth
    #[serde(default = "MarkerStyle::default_min_size")]
    pub min_size: f64,

    /// Growth per square root of the member count
    #[serde(default = "MarkerStyle::default_size_multiplier")]
    pub size_multiplier: f64,

    /// Avatars sampled per cluster marker
    #[serde(default = "MarkerStyle::default_max_avatars")]
    pub max_avatars: usize,
}

impl MarkerStyle {
    const fn default_min_size() -> f64 {
        48.0
    }

    const fn default_size_multiplier() -> f64 {
        2.0
    }

    const fn default_max_avatars() -> usize {
        3
    }

    /// Pixel size of a cluster marker with `count` members.
    ///
    /// ```
    /// use mapa::config::MarkerStyle;
    ///
    /// let style = MarkerStyle::default();
    /// assert_eq!(style.cluster_size(1), 50);
    /// assert_eq!(style.cluster_size(100), 68);
    /// ```
    pub fn cluster_size(&self, count: usize) -> u32 {
        (self.min_size + (count as f64).sqrt() * self.size_multiplier).floor() as u32
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            min_size: Self::default_min_size(),
            size_multiplier: Self::default_size_multiplier(),
            max_avatars: Self::default_max_avatars(),
        }
    }
}

/// Zoom range the map view allows.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewLimits {
    #[serde(default = "ViewLimits::default_min_zoom")]
    pub min_zoom: f64,

    #[serde(default = "ViewLimits::default_max_zoom")]
    pub max_zoom: f64,
}

impl ViewLimits {
    const fn default_min_zoom() -> f64 {
        3.0
    }

    const fn default_max_zoom() -> f64 {
        20.0
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            min_zoom: Self::default_min_zoom(),
            max_zoom: Self::default_max_zoom(),
        }
    }
}

impl Config {
    pub fn with_cluster_options(mut self, options: ClusterOptions) -> Self {
        self.cluster = options;
        self
    }

    pub fn with_marker_style(mut self, style: MarkerStyle) -> Self {
        self.markers = style;
        self
    }

    pub fn with_view_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.view = ViewLimits { min_zoom, max_zoom };
        self
    }

    pub fn with_max_avatars(mut self, max_avatars: usize) -> Self {
        if max_avatars > 10 {
            log::warn!(
                "Sampling {} avatars per cluster; markers usually show three",
                max_avatars
            );
        }
        self.markers.max_avatars = max_avatars;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.cluster.validate()?;

        if !(self.markers.min_size.is_finite() && self.markers.min_size >= 0.0) {
            return Err("Marker size must be a non-negative number".to_string());
        }

        if !(self.markers.size_multiplier.is_finite() && self.markers.size_multiplier >= 0.0) {
            return Err("Marker size multiplier must be a non-negative number".to_string());
        }

        if !(self.view.min_zoom.is_finite() && self.view.max_zoom.is_finite())
            || self.view.min_zoom > self.view.max_zoom
        {
            return Err(format!(
                "View zoom range is invalid: {}..{}",
                self.view.min_zoom, self.view.max_zoom
            ));
        }

        Ok(())
    }

    /// Validate, mapping failures into [`MapaError::InvalidConfig`].
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(MapaError::InvalidConfig)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
