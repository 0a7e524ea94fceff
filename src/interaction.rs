//! Marker activation.
//!
//! Activations are checked against the [`QueryResult`] the markers were
//! rendered from. A cluster or user missing from that snapshot means the
//! marker is stale, and the activation does nothing.

use crate::index::{ClusterId, ClusterIndex, QueryResult};
use geo::Point;
use mapa_types::point::UserPoint;

/// Where the map should move to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTarget {
    pub center: Point<f64>,
    pub zoom: f64,
}

/// The map surface driven by marker activation.
pub trait MapView {
    /// Animate the viewport to `target`.
    fn fly_to(&mut self, target: ViewportTarget);

    /// Open the detail popup for a user.
    fn show_detail(&mut self, user: &UserPoint);

    /// Highest zoom the surface can display.
    fn max_zoom(&self) -> f64;
}

/// Zoom into a cluster until it splits apart.
///
/// The target zoom is the cluster's expansion zoom, at least one step past
/// the current zoom and never beyond what the view supports. Returns
/// `false` when the cluster is not part of `result`.
pub fn on_cluster_activate<V: MapView + ?Sized>(
    index: &ClusterIndex,
    result: &QueryResult,
    id: ClusterId,
    view: &mut V,
) -> bool {
    let Some(cluster) = result.cluster(id) else {
        log::debug!("Ignoring activation of stale cluster {}", id);
        return false;
    };

    let expansion = match index.expansion_zoom(id) {
        Ok(zoom) => f64::from(zoom),
        Err(e) => {
            log::debug!("Ignoring cluster activation: {}", e);
            return false;
        }
    };

    let zoom = expansion.max(result.zoom() + 1.0).min(view.max_zoom());
    view.fly_to(ViewportTarget {
        center: cluster.location,
        zoom,
    });
    true
}

/// Open the detail view for a single user marker.
///
/// Returns `false` when the user is not part of `result`.
pub fn on_leaf_activate<V: MapView + ?Sized>(
    index: &ClusterIndex,
    result: &QueryResult,
    user_id: &str,
    view: &mut V,
) -> bool {
    if result.leaf(user_id).is_none() {
        log::debug!("Ignoring activation of stale marker for user {}", user_id);
        return false;
    }

    match index.point(user_id) {
        Some(user) => {
            view.show_detail(user);
            true
        }
        None => {
            log::debug!("User {} is not in the index", user_id);
            false
        }
    }
}
