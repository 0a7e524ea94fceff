//! # Hierarchical cluster index
//!
//! The index keeps one R-tree per zoom level. Every user is projected onto
//! the unit Web-Mercator square and placed, as a leaf, in the level just
//! above `max_zoom`. Each lower level is derived from the one above it:
//!
//! ```text
//! for z in max_zoom..=min_zoom (descending):
//!     r = radius / (extent * 2^z)
//!     for each unvisited node n of level z+1:
//!         gather unvisited nodes within r of n
//!         if the group outnumbers n and reaches min_points:
//!             emit one cluster at the count-weighted centroid
//!         else:
//!             pass n (and the small group) through unchanged
//! ```
//!
//! Clusters live in a single arena and record their direct children, so
//! leaf enumeration walks down the arena without touching the trees. The
//! index is immutable once built; a new directory means a new index.
//!
//! ```rust
//! use mapa::{ClusterIndex, ClusterOptions, Point, UserPoint};
//!
//! let users = vec![
//!     UserPoint::new("a", "Ana", Point::new(-58.3816, -34.6037)),
//!     UserPoint::new("b", "Beto", Point::new(-58.3820, -34.6040)),
//!     UserPoint::new("c", "Caro", Point::new(139.6917, 35.6895)),
//! ];
//! let index = ClusterIndex::build(users, ClusterOptions::default())?;
//!
//! let world = index.clusters(None, 3.0);
//! assert_eq!(world.len(), 2);
//! # Ok::<(), mapa::MapaError>(())
//! ```

mod leaves;
mod query;

pub use query::{ClusterFeature, LeafFeature, MapFeature, QueryResult, abbreviate_count};

use crate::compute::projection::{lat_y, lng_x, radius_at_zoom};
use crate::compute::validation::validate_geographic_point;
use crate::error::{MapaError, Result};
use mapa_types::config::ClusterOptions;
use mapa_types::point::UserPoint;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Identifier of a cluster inside one [`ClusterIndex`].
///
/// Ids are reassigned on every rebuild; holding on to one across a
/// directory refresh is meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(u32);

impl ClusterId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of one zoom level: either a single user or a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeRef {
    Leaf(u32),
    Cluster(ClusterId),
}

#[derive(Debug, Clone)]
pub(crate) struct ClusterRecord {
    /// Projected centroid
    x: f64,
    y: f64,
    count: usize,
    /// Zoom level the cluster was formed at
    zoom: u8,
    /// Nodes of level `zoom + 1` merged into this cluster, origin first
    children: Vec<NodeRef>,
}

type LevelEntry = GeomWithData<[f64; 2], u32>;

pub(crate) struct ZoomLevel {
    nodes: Vec<NodeRef>,
    tree: RTree<LevelEntry>,
}

impl ZoomLevel {
    fn new(nodes: Vec<NodeRef>, position: impl Fn(NodeRef) -> [f64; 2]) -> Self {
        let entries = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| GeomWithData::new(position(*node), i as u32))
            .collect();
        Self {
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl fmt::Debug for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomLevel")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// Immutable multi-zoom clustering index over a set of users.
#[derive(Debug)]
pub struct ClusterIndex {
    options: ClusterOptions,
    points: Vec<UserPoint>,
    by_id: FxHashMap<String, u32>,
    clusters: Vec<ClusterRecord>,
    /// Levels `min_zoom..=max_zoom + 1`, lowest zoom first
    levels: Vec<ZoomLevel>,
}

impl ClusterIndex {
    /// Build an index from users.
    ///
    /// Users with unusable coordinates, and later duplicates of an id, are
    /// left out. Only inconsistent options are an error; an empty input
    /// gives an empty index.
    pub fn build<I>(users: I, options: ClusterOptions) -> Result<Self>
    where
        I: IntoIterator<Item = UserPoint>,
    {
        options.validate().map_err(MapaError::InvalidConfig)?;

        let mut points = Vec::new();
        let mut by_id = FxHashMap::default();
        let mut excluded = 0usize;

        for user in users {
            if let Err(e) = validate_geographic_point(&user.location) {
                log::debug!("Excluding user {} from cluster index: {}", user.id, e);
                excluded += 1;
                continue;
            }
            if by_id.contains_key(&user.id) {
                log::warn!("Duplicate user id {} in directory, keeping the first", user.id);
                excluded += 1;
                continue;
            }
            by_id.insert(user.id.clone(), points.len() as u32);
            points.push(user);
        }

        let positions: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [lng_x(p.longitude()), lat_y(p.latitude())])
            .collect();

        let mut clusterer = Clusterer {
            options: &options,
            positions: &positions,
            clusters: Vec::new(),
        };

        let leaf_nodes = (0..points.len() as u32).map(NodeRef::Leaf).collect();
        let mut levels = vec![ZoomLevel::new(leaf_nodes, |n| clusterer.position(n))];

        for zoom in (options.min_zoom..=options.max_zoom).rev() {
            let above = levels.last().map(|l| clusterer.cluster_level(l, zoom));
            if let Some(level) = above {
                levels.push(level);
            }
        }
        levels.reverse();

        let clusters = clusterer.clusters;

        log::debug!(
            "Built cluster index: {} points ({} excluded), {} clusters, zoom {}..={}",
            points.len(),
            excluded,
            clusters.len(),
            options.min_zoom,
            options.max_zoom
        );

        Ok(Self {
            options,
            points,
            by_id,
            clusters,
            levels,
        })
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    /// Number of users held by the index.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All indexed users, in input order.
    pub fn points(&self) -> &[UserPoint] {
        &self.points
    }

    /// Look up an indexed user by id.
    pub fn point(&self, user_id: &str) -> Option<&UserPoint> {
        self.by_id
            .get(user_id)
            .map(|&i| &self.points[i as usize])
    }

    /// Total number of clusters across all zoom levels.
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    fn level(&self, zoom: u8) -> &ZoomLevel {
        &self.levels[usize::from(zoom - self.options.min_zoom)]
    }

    fn cluster_record(&self, id: ClusterId) -> Result<&ClusterRecord> {
        self.clusters
            .get(id.index())
            .ok_or(MapaError::ClusterNotFound(id))
    }

    fn node_count(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(_) => 1,
            NodeRef::Cluster(id) => self.clusters[id.index()].count,
        }
    }
}

/// Mutable state while levels are being derived.
struct Clusterer<'a> {
    options: &'a ClusterOptions,
    positions: &'a [[f64; 2]],
    clusters: Vec<ClusterRecord>,
}

impl Clusterer<'_> {
    fn position(&self, node: NodeRef) -> [f64; 2] {
        match node {
            NodeRef::Leaf(i) => self.positions[i as usize],
            NodeRef::Cluster(id) => {
                let c = &self.clusters[id.index()];
                [c.x, c.y]
            }
        }
    }

    fn count(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(_) => 1,
            NodeRef::Cluster(id) => self.clusters[id.index()].count,
        }
    }

    /// Derive level `zoom` from level `zoom + 1`.
    fn cluster_level(&mut self, above: &ZoomLevel, zoom: u8) -> ZoomLevel {
        let r = radius_at_zoom(self.options.radius, self.options.extent, zoom);
        let mut visited = vec![false; above.len()];
        let mut nodes = Vec::with_capacity(above.len());

        for i in 0..above.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;

            let origin = above.nodes[i];
            let [x, y] = self.position(origin);
            let origin_count = self.count(origin);

            let neighbors: SmallVec<[usize; 16]> = above
                .tree
                .locate_within_distance([x, y], r * r)
                .map(|entry| entry.data as usize)
                .filter(|&k| !visited[k])
                .collect();

            let total = origin_count
                + neighbors
                    .iter()
                    .map(|&k| self.count(above.nodes[k]))
                    .sum::<usize>();

            if total > origin_count && total >= self.options.min_points {
                let mut wx = x * origin_count as f64;
                let mut wy = y * origin_count as f64;
                let mut children = Vec::with_capacity(neighbors.len() + 1);
                children.push(origin);

                for &k in &neighbors {
                    visited[k] = true;
                    let node = above.nodes[k];
                    let [nx, ny] = self.position(node);
                    let weight = self.count(node) as f64;
                    wx += nx * weight;
                    wy += ny * weight;
                    children.push(node);
                }

                let id = ClusterId(self.clusters.len() as u32);
                self.clusters.push(ClusterRecord {
                    x: wx / total as f64,
                    y: wy / total as f64,
                    count: total,
                    zoom,
                    children,
                });
                nodes.push(NodeRef::Cluster(id));
            } else {
                nodes.push(origin);
                if total > 1 {
                    for &k in &neighbors {
                        visited[k] = true;
                        nodes.push(above.nodes[k]);
                    }
                }
            }
        }

        ZoomLevel::new(nodes, |n| self.position(n))
    }
}
