use mapa::ingest::parse_directory;
use mapa::{
    ClusterIndex, ClusterOptions, Config, DirectoryFilter, LngLatBounds, MapFeature, MapSession,
    MapView, MapaError, MarkerInstruction, Point, Role, TenureStatus, UserPoint, ViewportTarget,
};

#[derive(Default)]
struct RecordingView {
    flights: Vec<ViewportTarget>,
    details: Vec<String>,
}

impl MapView for RecordingView {
    fn fly_to(&mut self, target: ViewportTarget) {
        self.flights.push(target);
    }

    fn show_detail(&mut self, user: &UserPoint) {
        self.details.push(user.id.clone());
    }

    fn max_zoom(&self) -> f64 {
        20.0
    }
}

fn pin(id: &str, lng: f64, lat: f64) -> UserPoint {
    UserPoint::new(id, id, Point::new(lng, lat))
}

/// Test 1: Extreme coordinate values
#[test]
fn test_extreme_coordinates() {
    let users = vec![
        pin("north", 0.0, 90.0),
        pin("south", 0.0, -90.0),
        pin("dateline-east", 180.0, 0.0),
        pin("dateline-west", -180.0, 0.0),
    ];
    let index = ClusterIndex::build(users, ClusterOptions::default()).expect("build failed");
    assert_eq!(index.len(), 4);

    let features = index.clusters(None, 13.0);
    assert_eq!(features.len(), 4);
    for zoom in 0..13 {
        let total: usize = index.clusters(None, f64::from(zoom)).iter().map(MapFeature::count).sum();
        assert_eq!(total, 4);
    }
}

/// Test 2: Several users at exactly the same spot
#[test]
fn test_identical_coordinates() {
    let users: Vec<_> = (0..4).map(|i| pin(&format!("same-{}", i), 13.405, 52.52)).collect();
    let index = ClusterIndex::build(users, ClusterOptions::default()).expect("build failed");

    let cluster = index
        .clusters(None, 12.0)
        .into_iter()
        .find_map(|f| f.as_cluster().cloned())
        .expect("cluster at max zoom");
    assert_eq!(cluster.count, 4);
    assert_eq!(index.expansion_zoom(cluster.id).expect("expansion"), 13);

    // Past max_zoom they are drawn as stacked leaves
    assert_eq!(index.clusters(None, 13.0).len(), 4);
}

/// Test 3: Unusable coordinates never reach the index
#[test]
fn test_invalid_coordinates_are_dropped() {
    let users = vec![
        pin("ok", 2.35, 48.85),
        pin("inf", f64::INFINITY, 0.0),
        pin("lat", 10.0, 91.0),
        pin("lng", -181.0, 0.0),
    ];
    let index = ClusterIndex::build(users, ClusterOptions::default()).expect("build failed");
    assert_eq!(index.len(), 1);
    assert_eq!(index.clusters(None, 0.0).len(), 1);
}

/// Test 4: Degenerate and inverted viewports
#[test]
fn test_unusual_bounds() {
    let users = vec![pin("a", 179.5, 0.0), pin("b", -179.5, 0.0), pin("c", 0.0, 0.0)];
    let index = ClusterIndex::build(users, ClusterOptions::default()).expect("build failed");

    // A single meridian only sees points on it
    let line = LngLatBounds::new(0.0, -10.0, 0.0, 10.0);
    assert_eq!(index.clusters(Some(&line), 13.0).len(), 1);

    // Crossing the antimeridian through wrapped longitudes
    let wrapped = LngLatBounds::new(179.0, -1.0, 181.0, 1.0);
    let features = index.query(Some(&wrapped), 13.0);
    assert!(features.leaf("a").is_some());
    assert!(features.leaf("b").is_some());
    assert!(features.leaf("c").is_none());

    // South above north selects nothing
    let upside_down = LngLatBounds::new(-10.0, 10.0, 10.0, -10.0);
    assert!(index.clusters(Some(&upside_down), 13.0).is_empty());
}

/// Test 5: Invalid cluster options are reported, not clamped
#[test]
fn test_invalid_options() {
    for options in [
        ClusterOptions::default().with_radius(0.0),
        ClusterOptions::default().with_extent(-1.0),
        ClusterOptions::default().with_zoom_range(8, 4),
        ClusterOptions::default().with_min_points(1),
    ] {
        let result = ClusterIndex::build(Vec::new(), options);
        assert!(matches!(result, Err(MapaError::InvalidConfig(_))));
    }
}

/// Test 6: Mixed role encodings and partial records from the directory
#[test]
fn test_directory_edge_cases() {
    let _ = env_logger::builder().is_test(true).try_init();

    let body = r#"{
      "success": true,
      "message": "ok",
      "data": {
        "users": [
          { "_id": "1", "name": "Single", "role": "teacher", "workStartYear": 1995,
            "workEndYear": 2010, "location": { "type": "Point", "coordinates": [-58.4, -34.6] } },
          { "_id": "2", "name": "Many", "role": ["student", "familia", "astronaut"],
            "profileImage": "", "location": { "coordinates": [-58.41, -34.61] } },
          { "_id": "3", "name": "Nowhere", "role": "student" },
          { "_id": "4", "name": "Short", "location": { "type": "Point", "coordinates": [1.0] } },
          { "_id": "5", "name": "Swapped", "location": { "type": "Point", "coordinates": [-34.6, -158.4] } },
          { "_id": "6", "name": "Nobody", "location": { "type": "Point", "coordinates": [0.0, 0.0] } }
        ],
        "totalUsers": 6
      }
    }"#;

    let users = parse_directory(body).expect("directory parses");
    let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "6"]);

    let teacher = &users[0];
    assert!(teacher.has_role(Role::Teacher));
    let tenure = teacher
        .membership(Role::Teacher)
        .and_then(|m| m.tenure())
        .copied()
        .expect("teacher tenure");
    assert_eq!(tenure.start_year, Some(1995));
    assert_eq!(tenure.status, TenureStatus::Ended(2010));

    let many = &users[1];
    assert_eq!(many.roles().len(), 2);
    assert!(many.has_role(Role::Family));
    assert!(many.avatar.is_none());

    assert_eq!(users[2].role_labels(), vec![mapa::COMMUNITY_LABEL.to_string()]);
}

/// Test 7: A failed directory response is an error, not an empty map
#[test]
fn test_failed_directory_response() {
    let body = r#"{ "success": false, "message": "Error al obtener usuarios" }"#;
    match parse_directory(body) {
        Err(MapaError::InvalidInput(msg)) => assert!(msg.contains("Error al obtener usuarios")),
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(matches!(parse_directory("not json"), Err(MapaError::Serialization(_))));
}

/// Test 8: Clicks on markers from before a refresh do nothing
#[test]
fn test_stale_activation_after_refresh() {
    let users = vec![
        pin("a", -58.3816, -34.6037),
        pin("b", -58.3817, -34.6038),
        pin("c", 2.35, 48.85),
    ];
    let mut session = MapSession::new(Config::default()).expect("session");
    session.apply_directory(users.clone()).expect("directory");
    session.query(None, 4.0);

    let markers = session.markers();
    let cluster_id = markers
        .iter()
        .find_map(|m| match m {
            MarkerInstruction::Cluster { id, .. } => Some(*id),
            MarkerInstruction::Leaf { .. } => None,
        })
        .expect("cluster marker");

    let mut view = RecordingView::default();
    assert!(session.on_cluster_activate(cluster_id, &mut view));
    assert!(session.on_leaf_activate("c", &mut view));
    assert_eq!(view.flights.len(), 1);
    assert_eq!(view.details, vec!["c".to_string()]);

    session.apply_directory(users).expect("refresh");
    assert!(!session.on_cluster_activate(cluster_id, &mut view));
    assert!(!session.on_leaf_activate("c", &mut view));
    assert_eq!(view.flights.len(), 1);
    assert_eq!(view.details.len(), 1);
}

/// Test 9: Activation leaves the index untouched
#[test]
fn test_activation_does_not_mutate() {
    let users: Vec<_> = (0..6)
        .map(|i| pin(&format!("u{}", i), 10.0 + i as f64 * 0.001, 45.0))
        .collect();
    let mut session = MapSession::new(Config::default()).expect("session");
    session.apply_directory(users).expect("directory");

    let before = session.query(None, 5.0).features().to_vec();
    let id = before
        .iter()
        .find_map(MapFeature::as_cluster)
        .map(|c| c.id)
        .expect("cluster");

    let mut view = RecordingView::default();
    for _ in 0..3 {
        assert!(session.on_cluster_activate(id, &mut view));
    }
    assert!(view.flights.windows(2).all(|w| w[0] == w[1]));

    let after = session.query(None, 5.0).features().to_vec();
    assert_eq!(before, after);
}

/// Test 10: Filtering to a role with nobody in it gives an empty map
#[test]
fn test_filter_with_no_matches() {
    let mut session = MapSession::new(Config::default()).expect("session");
    session
        .apply_directory(vec![pin("a", 0.0, 0.0), pin("b", 1.0, 1.0)])
        .expect("directory");

    session
        .set_filter(DirectoryFilter::role(Role::NonTeachingStaff))
        .expect("filter");
    assert!(session.index().is_empty());
    assert!(session.query(None, 10.0).is_empty());
    assert!(session.markers().is_empty());
}
