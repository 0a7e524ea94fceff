//! # mapa-types
//!
//! Core directory and geographic types for the mapa community pin map.
//!
//! - **Directory types**: `UserPoint`, `Avatar`
//! - **Role types**: `Role`, `RoleSet`, `Membership`, `Tenure`
//! - **Geographic types**: `LngLatBounds`
//! - **Configuration**: `ClusterOptions`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives. Coordinates are always (longitude, latitude).
//!
//! ## Examples
//!
//! ```rust
//! use mapa_types::point::UserPoint;
//! use mapa_types::role::{Membership, Role};
//! use geo::Point;
//!
//! let user = UserPoint::new("u-1", "Ana", Point::new(-58.38, -34.60))
//!     .with_membership(Membership::ExStudent { graduation_year: Some(1998) });
//! assert!(user.has_role(Role::ExStudent));
//! ```

pub mod bbox;
pub mod config;
pub mod point;
pub mod role;

pub use geo;
