//! Clustering and marker interaction for a community pin map.
//!
//! ```rust
//! use mapa::{ClusterIndex, ClusterOptions, Membership, Point, UserPoint};
//!
//! let users = vec![
//!     UserPoint::new("1", "Ana", Point::new(-58.3816, -34.6037))
//!         .with_membership(Membership::Student),
//!     UserPoint::new("2", "Beto", Point::new(-58.3817, -34.6038))
//!         .with_avatar("https://img.example/beto.webp"),
//!     UserPoint::new("3", "Caro", Point::new(2.3522, 48.8566)),
//! ];
//!
//! let index = ClusterIndex::build(users, ClusterOptions::default())?;
//! let result = index.query(None, 4.0);
//! assert_eq!(result.len(), 2);
//! assert_eq!(result.total_points(), 3);
//! # Ok::<(), mapa::MapaError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod filter;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod index;
pub mod ingest;
pub mod interaction;
pub mod markers;
pub mod session;

pub use builder::IndexBuilder;
pub use config::{Config, MarkerStyle, ViewLimits};
pub use error::{MapaError, Result};

pub use geo::Point;

pub use index::{
    ClusterFeature, ClusterId, ClusterIndex, LeafFeature, MapFeature, QueryResult,
    abbreviate_count,
};

pub use mapa_types::bbox::LngLatBounds;
pub use mapa_types::config::ClusterOptions;
pub use mapa_types::point::{Avatar, UserPoint};
pub use mapa_types::role::{COMMUNITY_LABEL, Membership, Role, RoleSet, Tenure, TenureStatus};

pub use filter::DirectoryFilter;
pub use interaction::{MapView, ViewportTarget, on_cluster_activate, on_leaf_activate};
pub use markers::{MarkerInstruction, render_markers};
pub use session::{KeyValueStore, MapSession, MemoryStore, SessionState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterIndex, IndexBuilder, MapaError, Result};

    pub use geo::Point;

    pub use crate::{ClusterId, ClusterOptions, LngLatBounds, MapFeature, QueryResult};

    pub use crate::{Avatar, Membership, Role, UserPoint};

    pub use crate::{Config, DirectoryFilter, MapSession, MapView, MarkerInstruction, ViewportTarget};
}
