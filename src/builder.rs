//! Index builder for flexible configuration
//!
//! This module provides a builder pattern for creating cluster indexes
//! without spelling out every clustering option.

use crate::error::Result;
use crate::index::ClusterIndex;
use mapa_types::config::ClusterOptions;
use mapa_types::point::UserPoint;

/// Builder for [`ClusterIndex`] with the directory defaults
/// (extent 256, radius 80, clustering up to zoom 12).
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    options: ClusterOptions,
}

impl IndexBuilder {
    /// Create a new builder with default clustering options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all clustering options at once.
    pub fn options(mut self, options: ClusterOptions) -> Self {
        self.options = options;
        self
    }

    /// Pixel radius within which points merge.
    pub fn radius(mut self, radius: f64) -> Self {
        self.options.radius = radius;
        self
    }

    /// Pixel size of one clustering tile.
    pub fn extent(mut self, extent: f64) -> Self {
        self.options.extent = extent;
        self
    }

    /// Lowest zoom level that gets its own clustering level.
    pub fn min_zoom(mut self, zoom: u8) -> Self {
        self.options.min_zoom = zoom;
        self
    }

    /// Highest zoom at which clustering applies.
    pub fn max_zoom(mut self, zoom: u8) -> Self {
        self.options.max_zoom = zoom;
        self
    }

    /// Minimum number of users that form a cluster.
    pub fn min_points(mut self, min_points: usize) -> Self {
        self.options.min_points = min_points;
        self
    }

    /// Build the index. Fails only when the options are inconsistent.
    pub fn build<I>(self, users: I) -> Result<ClusterIndex>
    where
        I: IntoIterator<Item = UserPoint>,
    {
        ClusterIndex::build(users, self.options)
    }
}
