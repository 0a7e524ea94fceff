use crate::role::{COMMUNITY_LABEL, Membership, Role, RoleSet};
use geo::Point;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A directory member pinned on the map.
///
/// The location is a `geo::Point` whose x is the longitude and y the
/// latitude. Role-specific attributes live inside each [`Membership`], so a
/// user that is not an ex-student has no graduation year to read.
///
/// # Examples
///
/// ```
/// use mapa_types::point::UserPoint;
/// use mapa_types::role::{Membership, Role};
/// use geo::Point;
///
/// let user = UserPoint::new("64f0", "Lucía", Point::new(-58.45, -34.58))
///     .with_membership(Membership::Student)
///     .with_membership(Membership::Family)
///     .with_avatar("https://cdn.example.org/lucia.webp");
///
/// assert!(user.has_role(Role::Family));
/// assert_eq!(user.longitude(), -58.45);
/// assert_eq!(user.avatar().image.as_deref(), Some("https://cdn.example.org/lucia.webp"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPoint {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Point<f64>,
    #[serde(default)]
    pub memberships: SmallVec<[Membership; 2]>,
}

impl UserPoint {
    /// Create a user with no roles and no avatar.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Point<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            description: None,
            location,
            memberships: SmallVec::new(),
        }
    }

    pub fn with_avatar(mut self, image: impl Into<String>) -> Self {
        self.avatar = Some(image.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a membership. A second membership for an already held role
    /// replaces the first.
    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.add_membership(membership);
        self
    }

    pub fn add_membership(&mut self, membership: Membership) {
        let role = membership.role();
        match self.memberships.iter_mut().find(|m| m.role() == role) {
            Some(existing) => *existing = membership,
            None => self.memberships.push(membership),
        }
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn roles(&self) -> RoleSet {
        self.memberships.iter().map(Membership::role).collect()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.memberships.iter().any(|m| m.role() == role)
    }

    pub fn membership(&self, role: Role) -> Option<&Membership> {
        self.memberships.iter().find(|m| m.role() == role)
    }

    /// Detail-view labels, one per membership.
    pub fn role_labels(&self) -> Vec<String> {
        if self.memberships.is_empty() {
            return vec![COMMUNITY_LABEL.to_string()];
        }
        self.memberships.iter().map(Membership::label).collect()
    }

    pub fn avatar(&self) -> Avatar {
        Avatar {
            user_id: self.id.clone(),
            image: self.avatar.clone(),
        }
    }
}

/// Identity plus optional image reference, used by markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Avatar {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
