//! People Map Example
//!
//! This example loads a small community directory, clusters it, and walks
//! through what a map screen does: query a viewport, draw markers, and react
//! to clicks.

use mapa::ingest::parse_directory;
use mapa::{
    Config, DirectoryFilter, LngLatBounds, MapSession, MapView, MarkerInstruction, Role,
    UserPoint, ViewportTarget,
};
use std::error::Error;

const DIRECTORY: &str = r#"{
  "success": true,
  "message": "Usuarios obtenidos exitosamente",
  "data": {
    "users": [
      { "_id": "1", "name": "Lucía", "role": ["exstudent"], "graduationYear": 1998,
        "profileImage": "https://img.example/lucia.webp",
        "location": { "type": "Point", "coordinates": [-58.3816, -34.6037] } },
      { "_id": "2", "name": "Tomás", "role": "teacher", "workStartYear": 2004, "isCurrentlyWorking": true,
        "location": { "type": "Point", "coordinates": [-58.3830, -34.6050] } },
      { "_id": "3", "name": "Inés", "role": ["student", "familia"],
        "profileImage": "https://img.example/ines.webp",
        "location": { "type": "Point", "coordinates": [-58.3790, -34.6010] } },
      { "_id": "4", "name": "Pablo", "role": "employee", "workStartYear": 1990, "workEndYear": 2015,
        "location": { "type": "Point", "coordinates": [-3.7038, 40.4168] } },
      { "_id": "5", "name": "Sofía", "role": ["exstudent"], "graduationYear": 2010,
        "location": { "type": "Point", "coordinates": [-122.4194, 37.7749] } }
    ],
    "totalUsers": 5
  }
}"#;

/// Prints what a real map widget would animate.
struct ConsoleView;

impl MapView for ConsoleView {
    fn fly_to(&mut self, target: ViewportTarget) {
        println!(
            "   -> fly to ({:.4}, {:.4}) at zoom {}",
            target.center.x(),
            target.center.y(),
            target.zoom
        );
    }

    fn show_detail(&mut self, user: &UserPoint) {
        println!("   -> {} ({})", user.name, user.role_labels().join(", "));
    }

    fn max_zoom(&self) -> f64 {
        20.0
    }
}

fn print_markers(markers: &[MarkerInstruction]) {
    for marker in markers {
        match marker {
            MarkerInstruction::Cluster {
                id,
                label,
                size,
                avatars,
                ..
            } => println!(
                "   cluster {} [{}] {}px, {} avatar(s)",
                id,
                label,
                size,
                avatars.len()
            ),
            MarkerInstruction::Leaf {
                user_id, position, ..
            } => println!(
                "   user {} at ({:.4}, {:.4})",
                user_id,
                position.x(),
                position.y()
            ),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== mapa - People Map ===\n");

    let users = parse_directory(DIRECTORY)?;
    println!("Loaded {} users\n", users.len());

    let mut session = MapSession::new(Config::default())?;
    session.apply_directory(users)?;

    if !session.state().intro_dismissed() {
        println!("(intro banner shown)");
        session.state_mut().dismiss_intro();
    }

    println!("\n1. World view at zoom 3");
    session.query(None, 3.0);
    let markers = session.markers();
    print_markers(&markers);

    let mut view = ConsoleView;
    if let Some(MarkerInstruction::Cluster { id, .. }) = markers
        .iter()
        .find(|m| matches!(m, MarkerInstruction::Cluster { .. }))
    {
        println!("\n2. Clicking cluster {}", id);
        session.on_cluster_activate(*id, &mut view);
    }

    println!("\n3. Buenos Aires at zoom 16");
    let city = LngLatBounds::new(-58.40, -34.62, -58.36, -34.59);
    session.query(Some(&city), 16.0);
    print_markers(&session.markers());

    println!("\n4. Clicking user 2");
    session.on_leaf_activate("2", &mut view);

    println!("\n5. Only ex-students");
    session.set_filter(DirectoryFilter::role(Role::ExStudent))?;
    session.query(None, 3.0);
    print_markers(&session.markers());

    println!("\n6. Stale click after the filter changed");
    let handled = session.on_leaf_activate("2", &mut view);
    println!("   handled: {}", handled);

    Ok(())
}
