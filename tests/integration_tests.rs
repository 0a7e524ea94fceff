use mapa::{
    ClusterIndex, ClusterOptions, IndexBuilder, LngLatBounds, MapFeature, Membership, Point,
    UserPoint,
};
use std::collections::BTreeSet;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Users spread over three cities plus a few scattered points.
fn community() -> Vec<UserPoint> {
    let cities = [(-58.3816, -34.6037), (-3.7038, 40.4168), (-99.1332, 19.4326)];
    let mut users = Vec::new();
    for (c, (lng, lat)) in cities.iter().enumerate() {
        for i in 0..40 {
            let dx = (i % 8) as f64 * 0.004;
            let dy = (i / 8) as f64 * 0.004;
            users.push(
                UserPoint::new(
                    format!("city{}-{}", c, i),
                    format!("Member {}", i),
                    Point::new(lng + dx, lat + dy),
                )
                .with_avatar(format!("https://img.example/{}/{}.webp", c, i)),
            );
        }
    }
    users.push(UserPoint::new("lone-1", "Lone", Point::new(151.2093, -33.8688)));
    users.push(UserPoint::new("lone-2", "Lone", Point::new(-122.4194, 37.7749)));
    users
}

/// Five members a few hundred metres apart and one on the opposite side of
/// the world.
fn tight_group_and_antipode() -> Vec<UserPoint> {
    let mut users: Vec<_> = (0..5)
        .map(|i| {
            UserPoint::new(
                format!("near-{}", i),
                "Near",
                Point::new(-58.3816 + i as f64 * 0.0004, -34.6037 + i as f64 * 0.0002),
            )
            .with_membership(Membership::Student)
        })
        .collect();
    users.push(UserPoint::new("far", "Far", Point::new(121.6184, 34.6037)));
    users
}

fn membership(index: &ClusterIndex, features: &[MapFeature]) -> BTreeSet<Vec<String>> {
    features
        .iter()
        .map(|feature| match feature {
            MapFeature::Cluster(c) => {
                let mut ids: Vec<String> = index
                    .leaves(c.id, usize::MAX, 0)
                    .expect("cluster from query must exist")
                    .into_iter()
                    .map(|u| u.id.clone())
                    .collect();
                ids.sort();
                ids
            }
            MapFeature::Leaf(l) => vec![l.user_id.clone()],
        })
        .collect()
}

/// Test 1: Above max_zoom every user is its own leaf
#[test]
fn test_leaves_above_max_zoom() {
    init_logging();
    let users = community();
    let n = users.len();
    let index = ClusterIndex::build(users, ClusterOptions::default()).expect("build failed");

    let features = index.clusters(None, 13.0);
    assert_eq!(features.len(), n);
    assert!(features.iter().all(|f| !f.is_cluster()));

    // Fractional zooms floor to the same level
    assert_eq!(index.clusters(None, 13.7).len(), n);
}

/// Test 2: Zooming out never adds markers
#[test]
fn test_feature_count_is_monotonic() {
    let index = ClusterIndex::build(community(), ClusterOptions::default()).expect("build failed");

    let mut previous = usize::MAX;
    for zoom in (0..=13).rev() {
        let count = index.clusters(None, f64::from(zoom)).len();
        assert!(
            count <= previous,
            "zoom {} has {} features, zoom {} had {}",
            zoom,
            count,
            zoom + 1,
            previous
        );
        previous = count;
    }
}

/// Test 3: Every user is represented exactly once at every zoom
#[test]
fn test_counts_are_conserved() {
    let users = community();
    let n = users.len();
    let index = ClusterIndex::build(users, ClusterOptions::default()).expect("build failed");

    for zoom in 0..=13 {
        let result = index.query(None, f64::from(zoom));
        assert_eq!(result.total_points(), n, "zoom {}", zoom);

        let members = membership(&index, result.features());
        let flattened: BTreeSet<_> = members.iter().flatten().collect();
        assert_eq!(flattened.len(), n, "zoom {}", zoom);
    }
}

/// Test 4: Counts inside a viewport match the users inside it
#[test]
fn test_bounded_query_counts() {
    let index = ClusterIndex::build(community(), ClusterOptions::default()).expect("build failed");

    // South America only
    let bbox = LngLatBounds::new(-80.0, -56.0, -34.0, 13.0);
    let result = index.query(Some(&bbox), 13.0);
    assert_eq!(result.total_points(), 40);
    assert!(
        result
            .features()
            .iter()
            .all(|f| bbox.contains_point(&f.location()))
    );
}

/// Test 4b: Bounded queries pick clusters by centroid, members and all
#[test]
fn test_bounded_query_selects_clusters_by_centroid() {
    let users = vec![
        UserPoint::new("west", "West", Point::new(-0.5, 0.0)),
        UserPoint::new("east", "East", Point::new(0.5, 0.0)),
    ];
    let index = ClusterIndex::build(users, ClusterOptions::default()).expect("build failed");

    // The pair merges at zoom 2 with its centroid on the prime meridian
    let world = index.query(None, 2.0);
    assert_eq!(world.len(), 1);
    assert_eq!(world.total_points(), 2);
    let centroid = world.features()[0].location();
    assert!(centroid.x().abs() < 1e-9);

    // Holds "east" but not the centroid: the cluster is left out
    let right = LngLatBounds::new(0.1, -10.0, 10.0, 10.0);
    assert!(right.contains_point(&Point::new(0.5, 0.0)));
    assert_eq!(right.height(), 20.0);
    assert_eq!(index.query(Some(&right), 2.0).total_points(), 0);

    // Holds the centroid but only "west": the whole cluster comes back
    let left = LngLatBounds::new(-10.0, -10.0, 0.01, 10.0);
    assert!(!left.contains_point(&Point::new(0.5, 0.0)));
    let result = index.query(Some(&left), 2.0);
    assert_eq!(result.total_points(), 2);
    assert!(result.features()[0].is_cluster());

    // Once the pair splits, each member follows its own position
    assert_eq!(index.query(Some(&right), 13.0).total_points(), 1);
    assert_eq!(index.query(Some(&left), 13.0).total_points(), 1);
}

/// Test 5: Avatar samples are bounded and come from the cluster
#[test]
fn test_avatar_samples() {
    let index = ClusterIndex::build(community(), ClusterOptions::default()).expect("build failed");

    for feature in index.clusters(None, 2.0) {
        let Some(cluster) = feature.as_cluster() else {
            continue;
        };
        let members: BTreeSet<String> = index
            .leaves(cluster.id, usize::MAX, 0)
            .expect("leaves")
            .into_iter()
            .map(|u| u.id.clone())
            .collect();

        for n in [0, 1, 3, 1000] {
            let avatars = index.cluster_avatars(cluster.id, n).expect("avatars");
            assert_eq!(avatars.len(), n.min(cluster.count));
            assert!(avatars.iter().all(|a| members.contains(&a.user_id)));
            assert!(avatars.iter().all(|a| a.image.is_some()));
        }
    }
}

/// Test 6: Identical queries group the same users together
#[test]
fn test_repeated_queries_agree() {
    let index = ClusterIndex::build(community(), ClusterOptions::default()).expect("build failed");

    for zoom in [1.0, 4.0, 9.0] {
        let first = index.query(None, zoom);
        if let Some(cluster) = first.features().iter().find_map(MapFeature::as_cluster) {
            index.expansion_zoom(cluster.id).expect("expansion zoom");
            index.children(cluster.id).expect("children");
        }
        let second = index.query(None, zoom);
        assert_eq!(
            membership(&index, first.features()),
            membership(&index, second.features())
        );
    }

    // A rebuild from the same input groups users the same way
    let rebuilt = ClusterIndex::build(community(), ClusterOptions::default()).expect("build failed");
    assert_eq!(
        membership(&index, &index.clusters(None, 5.0)),
        membership(&rebuilt, &rebuilt.clusters(None, 5.0))
    );
}

/// Test 7: Tight group and antipode across zoom levels
#[test]
fn test_tight_group_and_antipode() {
    let index =
        ClusterIndex::build(tight_group_and_antipode(), ClusterOptions::default()).expect("build");

    let at_3 = index.query(None, 3.0);
    assert_eq!(at_3.len(), 2);
    let cluster = at_3
        .features()
        .iter()
        .find_map(MapFeature::as_cluster)
        .expect("cluster at zoom 3");
    assert_eq!(cluster.count, 5);
    assert!(at_3.leaf("far").is_some());

    // Clustering still applies at max_zoom; the group is well inside ~3 km
    let at_12 = index.query(None, 12.0);
    assert_eq!(at_12.len(), 2);
    assert_eq!(
        at_12
            .features()
            .iter()
            .find_map(MapFeature::as_cluster)
            .map(|c| c.count),
        Some(5)
    );

    let at_13 = index.query(None, 13.0);
    assert_eq!(at_13.len(), 6);
    assert!(at_13.features().iter().all(|f| !f.is_cluster()));
}

/// Test 8: An empty directory answers every query with nothing
#[test]
fn test_empty_directory() {
    let index = IndexBuilder::new().build(Vec::new()).expect("empty build");
    assert!(index.is_empty());

    for zoom in [-3.0, 0.0, 7.5, 12.0, 13.0, 40.0] {
        assert!(index.clusters(None, zoom).is_empty());
    }
    let bbox = LngLatBounds::new(170.0, -10.0, -170.0, 10.0);
    assert!(index.query(Some(&bbox), 4.0).is_empty());
}

/// Test 9: Smaller radius keeps more markers apart
#[test]
fn test_radius_controls_granularity() {
    let coarse = IndexBuilder::new().radius(120.0).build(community()).expect("build");
    let fine = IndexBuilder::new().radius(10.0).build(community()).expect("build");

    for zoom in [6.0, 9.0, 11.0] {
        assert!(coarse.clusters(None, zoom).len() <= fine.clusters(None, zoom).len());
    }
}

/// Test 10: min_zoom bounds the lowest level
#[test]
fn test_min_zoom_clamps_queries() {
    let index = IndexBuilder::new()
        .min_zoom(4)
        .build(community())
        .expect("build");

    assert_eq!(index.query(None, 0.0).level(), 4);
    assert_eq!(index.clusters(None, 0.0), index.clusters(None, 4.0));
}
