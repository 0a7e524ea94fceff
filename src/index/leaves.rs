//! Cluster expansion: children, member leaves and avatar samples.

use super::{ClusterId, ClusterIndex, ClusterRecord, NodeRef};
use crate::error::Result;
use crate::index::MapFeature;
use mapa_types::point::{Avatar, UserPoint};

impl ClusterIndex {
    /// Direct children of a cluster, one zoom level further in.
    pub fn children(&self, id: ClusterId) -> Result<Vec<MapFeature>> {
        let record = self.cluster_record(id)?;
        Ok(record.children.iter().map(|&n| self.feature(n)).collect())
    }

    /// Member users of a cluster, depth first, skipping `offset` and
    /// returning at most `limit`.
    ///
    /// The enumeration order is fixed for a given index.
    pub fn leaves(&self, id: ClusterId, limit: usize, offset: usize) -> Result<Vec<&UserPoint>> {
        let record = self.cluster_record(id)?;
        let mut leaves = Vec::with_capacity(limit.min(record.count));
        let mut skipped = 0;
        self.append_leaves(record, limit, offset, &mut skipped, &mut leaves);
        Ok(leaves)
    }

    fn append_leaves<'a>(
        &'a self,
        record: &ClusterRecord,
        limit: usize,
        offset: usize,
        skipped: &mut usize,
        leaves: &mut Vec<&'a UserPoint>,
    ) {
        for &child in &record.children {
            if leaves.len() >= limit {
                return;
            }
            match child {
                NodeRef::Cluster(id) => {
                    let count = self.node_count(child);
                    if *skipped + count <= offset {
                        *skipped += count;
                    } else {
                        self.append_leaves(
                            &self.clusters[id.index()],
                            limit,
                            offset,
                            skipped,
                            leaves,
                        );
                    }
                }
                NodeRef::Leaf(i) => {
                    if *skipped < offset {
                        *skipped += 1;
                    } else {
                        leaves.push(&self.points[i as usize]);
                    }
                }
            }
        }
    }

    /// Zoom at which the cluster breaks apart into several markers.
    ///
    /// Never exceeds `max_zoom + 1`, where every user stands alone.
    pub fn expansion_zoom(&self, id: ClusterId) -> Result<u8> {
        let mut record = self.cluster_record(id)?;
        let mut zoom = record.zoom;

        while zoom <= self.options.max_zoom {
            zoom += 1;
            match record.children.as_slice() {
                [NodeRef::Cluster(only)] => record = &self.clusters[only.index()],
                _ => break,
            }
        }
        Ok(zoom)
    }

    /// Up to `n` member avatars, the first `n` leaves in enumeration order.
    ///
    /// Members without a picture are included with no image.
    pub fn cluster_avatars(&self, id: ClusterId, n: usize) -> Result<Vec<Avatar>> {
        Ok(self
            .leaves(id, n, 0)?
            .into_iter()
            .map(UserPoint::avatar)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::MapaError;
    use crate::index::{ClusterId, ClusterIndex, MapFeature};
    use geo::Point;
    use mapa_types::config::ClusterOptions;
    use mapa_types::point::UserPoint;
    use std::collections::HashSet;

    fn cluster_of(n: usize) -> ClusterIndex {
        let users: Vec<_> = (0..n)
            .map(|i| {
                UserPoint::new(
                    format!("u{}", i),
                    format!("User {}", i),
                    Point::new(-58.38 + i as f64 * 0.0001, -34.60),
                )
                .with_avatar(format!("https://img.example/{}.webp", i))
            })
            .collect();
        ClusterIndex::build(users, ClusterOptions::default()).unwrap()
    }

    fn top_cluster(index: &ClusterIndex) -> ClusterId {
        index
            .clusters(None, 0.0)
            .iter()
            .find_map(MapFeature::as_cluster)
            .map(|c| c.id)
            .unwrap()
    }

    #[test]
    fn test_leaves_cover_all_members() {
        let index = cluster_of(25);
        let id = top_cluster(&index);

        let leaves = index.leaves(id, usize::MAX, 0).unwrap();
        assert_eq!(leaves.len(), 25);
        let ids: HashSet<_> = leaves.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn test_leaves_pagination() {
        let index = cluster_of(12);
        let id = top_cluster(&index);

        let all: Vec<_> = index
            .leaves(id, usize::MAX, 0)
            .unwrap()
            .into_iter()
            .map(|u| u.id.clone())
            .collect();
        let page: Vec<_> = index
            .leaves(id, 5, 4)
            .unwrap()
            .into_iter()
            .map(|u| u.id.clone())
            .collect();
        assert_eq!(page, all[4..9].to_vec());

        assert!(index.leaves(id, 5, 20).unwrap().is_empty());
    }

    #[test]
    fn test_children_sum_to_count() {
        let index = cluster_of(30);
        let id = top_cluster(&index);
        let children = index.children(id).unwrap();
        assert!(children.len() >= 2);
        assert_eq!(children.iter().map(MapFeature::count).sum::<usize>(), 30);
    }

    #[test]
    fn test_expansion_zoom_splits_cluster() {
        let index = cluster_of(10);
        let id = top_cluster(&index);

        // Ten users a few metres apart only separate once clustering stops
        let zoom = index.expansion_zoom(id).unwrap();
        assert_eq!(zoom, index.options().max_zoom + 1);

        let at_expansion = index.clusters(None, f64::from(zoom));
        assert_eq!(at_expansion.len(), 10);
        assert!(at_expansion.iter().all(|f| !f.is_cluster()));
    }

    #[test]
    fn test_avatars_are_first_leaves() {
        let index = cluster_of(8);
        let id = top_cluster(&index);

        let avatars = index.cluster_avatars(id, 3).unwrap();
        let leaves = index.leaves(id, 3, 0).unwrap();
        assert_eq!(avatars.len(), 3);
        for (avatar, leaf) in avatars.iter().zip(leaves) {
            assert_eq!(avatar.user_id, leaf.id);
            assert_eq!(avatar.image, leaf.avatar);
        }

        assert_eq!(index.cluster_avatars(id, 50).unwrap().len(), 8);
        assert!(index.cluster_avatars(id, 0).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_cluster() {
        let index = cluster_of(3);
        let missing = ClusterId::new(9_999);
        assert!(matches!(index.leaves(missing, 1, 0), Err(MapaError::ClusterNotFound(_))));
        assert!(matches!(index.children(missing), Err(MapaError::ClusterNotFound(_))));
        assert!(matches!(index.expansion_zoom(missing), Err(MapaError::ClusterNotFound(_))));
    }
}
