//! Render instructions for the map surface.

use crate::config::MarkerStyle;
use crate::index::{ClusterId, ClusterIndex, MapFeature, QueryResult};
use geo::Point;
use mapa_types::point::Avatar;
use serde::Serialize;

/// What the map surface should draw for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerInstruction {
    Cluster {
        id: ClusterId,
        position: Point<f64>,
        /// Marker width and height in pixels
        size: u32,
        count: usize,
        label: String,
        avatars: Vec<Avatar>,
        /// Larger clusters draw on top
        z_index: usize,
    },
    Leaf {
        user_id: String,
        position: Point<f64>,
        avatar: Avatar,
    },
}

impl MarkerInstruction {
    pub fn position(&self) -> Point<f64> {
        match self {
            MarkerInstruction::Cluster { position, .. } | MarkerInstruction::Leaf { position, .. } => {
                *position
            }
        }
    }
}

/// Turn a query result into marker instructions.
///
/// Features that do not belong to `index` are skipped.
pub fn render_markers(
    index: &ClusterIndex,
    result: &QueryResult,
    style: &MarkerStyle,
) -> Vec<MarkerInstruction> {
    result
        .features()
        .iter()
        .filter_map(|feature| match feature {
            MapFeature::Cluster(cluster) => {
                match index.cluster_avatars(cluster.id, style.max_avatars) {
                    Ok(avatars) => Some(MarkerInstruction::Cluster {
                        id: cluster.id,
                        position: cluster.location,
                        size: style.cluster_size(cluster.count),
                        count: cluster.count,
                        label: cluster.label.clone(),
                        avatars,
                        z_index: cluster.count,
                    }),
                    Err(e) => {
                        log::debug!("Not rendering cluster marker: {}", e);
                        None
                    }
                }
            }
            MapFeature::Leaf(leaf) => match index.point(&leaf.user_id) {
                Some(user) => Some(MarkerInstruction::Leaf {
                    user_id: leaf.user_id.clone(),
                    position: leaf.location,
                    avatar: user.avatar(),
                }),
                None => {
                    log::debug!("Not rendering leaf marker for unknown user {}", leaf.user_id);
                    None
                }
            },
        })
        .collect()
}
