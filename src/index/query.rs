//! Viewport queries against a [`ClusterIndex`].

use super::{ClusterId, ClusterIndex, NodeRef, ZoomLevel};
use crate::compute::projection::{lat_y, lng_x, wrap_lng, x_lng, y_lat};
use geo::Point;
use mapa_types::bbox::LngLatBounds;
use rstar::AABB;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A cluster visible at the queried zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterFeature {
    pub id: ClusterId,
    pub count: usize,
    /// Abbreviated count, e.g. `"1.2k"`
    pub label: String,
    /// Count-weighted centroid of the members
    pub location: Point<f64>,
}

/// A single user visible at the queried zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafFeature {
    pub user_id: String,
    pub location: Point<f64>,
}

/// One entry of a cluster query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapFeature {
    Cluster(ClusterFeature),
    Leaf(LeafFeature),
}

impl MapFeature {
    pub fn location(&self) -> Point<f64> {
        match self {
            MapFeature::Cluster(c) => c.location,
            MapFeature::Leaf(l) => l.location,
        }
    }

    /// Number of users represented.
    pub fn count(&self) -> usize {
        match self {
            MapFeature::Cluster(c) => c.count,
            MapFeature::Leaf(_) => 1,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, MapFeature::Cluster(_))
    }

    pub fn as_cluster(&self) -> Option<&ClusterFeature> {
        match self {
            MapFeature::Cluster(c) => Some(c),
            MapFeature::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafFeature> {
        match self {
            MapFeature::Leaf(l) => Some(l),
            MapFeature::Cluster(_) => None,
        }
    }
}

/// Short form of a member count as shown on cluster markers.
///
/// ```
/// use mapa::abbreviate_count;
///
/// assert_eq!(abbreviate_count(999), "999");
/// assert_eq!(abbreviate_count(1000), "1k");
/// assert_eq!(abbreviate_count(1540), "1.5k");
/// assert_eq!(abbreviate_count(12_345), "12k");
/// ```
pub fn abbreviate_count(count: usize) -> String {
    if count >= 10_000 {
        format!("{}k", (count as f64 / 1000.0).round() as u64)
    } else if count >= 1000 {
        let tenths = (count as f64 / 100.0).round() as u64;
        if tenths % 10 == 0 {
            format!("{}k", tenths / 10)
        } else {
            format!("{}.{}k", tenths / 10, tenths % 10)
        }
    } else {
        count.to_string()
    }
}

/// The outcome of one viewport query.
///
/// Lookups by cluster id or user id only succeed for features present in
/// this snapshot.
#[derive(Debug, Clone)]
pub struct QueryResult {
    zoom: f64,
    level: u8,
    bounds: LngLatBounds,
    features: Vec<MapFeature>,
    clusters: FxHashMap<ClusterId, usize>,
    leaves: FxHashMap<String, usize>,
}

impl QueryResult {
    fn new(zoom: f64, level: u8, bounds: LngLatBounds, features: Vec<MapFeature>) -> Self {
        let mut clusters = FxHashMap::default();
        let mut leaves = FxHashMap::default();
        for (i, feature) in features.iter().enumerate() {
            match feature {
                MapFeature::Cluster(c) => {
                    clusters.insert(c.id, i);
                }
                MapFeature::Leaf(l) => {
                    leaves.insert(l.user_id.clone(), i);
                }
            }
        }
        Self {
            zoom,
            level,
            bounds,
            features,
            clusters,
            leaves,
        }
    }

    /// Zoom requested by the caller.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Index level the features were drawn from.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn bounds(&self) -> &LngLatBounds {
        &self.bounds
    }

    pub fn features(&self) -> &[MapFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&ClusterFeature> {
        self.clusters
            .get(&id)
            .and_then(|&i| self.features[i].as_cluster())
    }

    pub fn leaf(&self, user_id: &str) -> Option<&LeafFeature> {
        self.leaves
            .get(user_id)
            .and_then(|&i| self.features[i].as_leaf())
    }

    /// Users represented by all features together.
    pub fn total_points(&self) -> usize {
        self.features.iter().map(MapFeature::count).sum()
    }
}

impl ClusterIndex {
    /// Clusters and leaves inside `bounds` (the whole world when `None`) at
    /// `zoom`.
    ///
    /// The zoom is floored and clamped to `min_zoom..=max_zoom + 1`.
    /// Result order is unspecified.
    pub fn clusters(&self, bounds: Option<&LngLatBounds>, zoom: f64) -> Vec<MapFeature> {
        let level = self.level(self.options.clamp_zoom(zoom));
        let bounds = bounds.copied().unwrap_or_default();

        if ![bounds.west, bounds.south, bounds.east, bounds.north]
            .iter()
            .all(|v| v.is_finite())
        {
            log::warn!("Rejecting cluster query with non-finite bounds");
            return Vec::new();
        }

        let south = bounds.south.clamp(-90.0, 90.0);
        let north = bounds.north.clamp(-90.0, 90.0);
        if south > north {
            return Vec::new();
        }

        if bounds.west == bounds.east {
            // A single meridian; ±180° are the same line
            let lng = wrap_lng(bounds.west);
            let mut features = self.range(level, lng, south, lng, north);
            if lng == -180.0 {
                features.extend(self.range(level, 180.0, south, 180.0, north));
            }
            return features;
        }

        let mut west = wrap_lng(bounds.west);
        let mut east = if bounds.east == 180.0 {
            180.0
        } else {
            wrap_lng(bounds.east)
        };

        if bounds.east - bounds.west >= 360.0 {
            west = -180.0;
            east = 180.0;
        } else if west > east {
            let mut features = self.range(level, west, south, 180.0, north);
            features.extend(self.range(level, -180.0, south, east, north));
            return features;
        }

        self.range(level, west, south, east, north)
    }

    /// Run [`ClusterIndex::clusters`] and keep the result as a snapshot.
    pub fn query(&self, bounds: Option<&LngLatBounds>, zoom: f64) -> QueryResult {
        let features = self.clusters(bounds, zoom);
        QueryResult::new(
            zoom,
            self.options.clamp_zoom(zoom),
            bounds.copied().unwrap_or_default(),
            features,
        )
    }

    fn range(
        &self,
        level: &ZoomLevel,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    ) -> Vec<MapFeature> {
        let envelope = AABB::from_corners(
            [lng_x(west), lat_y(north)],
            [lng_x(east), lat_y(south)],
        );
        level
            .tree
            .locate_in_envelope(&envelope)
            .map(|entry| self.feature(level.nodes[entry.data as usize]))
            .collect()
    }

    pub(crate) fn feature(&self, node: NodeRef) -> MapFeature {
        match node {
            NodeRef::Leaf(i) => {
                let point = &self.points[i as usize];
                MapFeature::Leaf(LeafFeature {
                    user_id: point.id.clone(),
                    location: point.location,
                })
            }
            NodeRef::Cluster(id) => {
                let record = &self.clusters[id.index()];
                MapFeature::Cluster(ClusterFeature {
                    id,
                    count: record.count,
                    label: abbreviate_count(record.count),
                    location: Point::new(x_lng(record.x), y_lat(record.y)),
                })
            }
        }
    }
}
