//! Conversion of the user directory's "list all users" response into
//! [`UserPoint`]s.
//!
//! The directory has shipped two role encodings over time, a single tag
//! and a list of tags; both are accepted here and resolved into
//! memberships once, so nothing downstream inspects raw role strings.
//! Coordinates are `[longitude, latitude]` as in GeoJSON.
//!
//! ```rust
//! use mapa::ingest::parse_directory;
//! use mapa::Role;
//!
//! let body = r#"{
//!   "success": true,
//!   "message": "Usuarios obtenidos exitosamente",
//!   "data": {
//!     "users": [{
//!       "_id": "665f1c",
//!       "name": "Marta",
//!       "role": ["exstudent", "familia"],
//!       "graduationYear": 1987,
//!       "location": { "type": "Point", "coordinates": [-58.44, -34.59] }
//!     }],
//!     "totalUsers": 1
//!   }
//! }"#;
//!
//! let users = parse_directory(body)?;
//! assert_eq!(users.len(), 1);
//! assert!(users[0].has_role(Role::Family));
//! # Ok::<(), mapa::MapaError>(())
//! ```

use crate::compute::validation::point_from_coordinates;
use crate::error::{MapaError, Result};
use mapa_types::point::UserPoint;
use mapa_types::role::{Membership, Role, RoleSet, Tenure};
use serde::{Deserialize, Serialize};

/// Role field as sent by the directory: one tag or several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleField {
    One(String),
    Many(Vec<String>),
}

impl RoleField {
    fn tags(&self) -> Vec<&str> {
        match self {
            RoleField::One(tag) => vec![tag.as_str()],
            RoleField::Many(tags) => tags.iter().map(String::as_str).collect(),
        }
    }
}

/// GeoJSON-style point location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLocation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// One user as returned by the directory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_start_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_end_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_currently_working: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<RecordLocation>,
}

impl UserRecord {
    /// Resolve roles. Unknown tags are skipped.
    pub fn roles(&self) -> RoleSet {
        let Some(field) = &self.role else {
            return RoleSet::empty();
        };
        field
            .tags()
            .into_iter()
            .filter_map(|tag| {
                let role = Role::from_tag(tag);
                if role.is_none() {
                    log::warn!("Ignoring unknown role '{}' on user {}", tag, self.id);
                }
                role
            })
            .collect()
    }

    /// Validate the record and turn it into a map point.
    pub fn into_user_point(self) -> Result<UserPoint> {
        let location = self.location.as_ref().ok_or_else(|| {
            MapaError::InvalidInput(format!("User {} has no location", self.id))
        })?;

        if let Some(kind) = &location.kind
            && kind != "Point"
        {
            return Err(MapaError::InvalidInput(format!(
                "User {} location is a {}, expected a Point",
                self.id, kind
            )));
        }

        let point = point_from_coordinates(&location.coordinates)
            .map_err(|e| MapaError::InvalidInput(format!("User {}: {}", self.id, e)))?;

        let tenure = Tenure::from_parts(
            self.work_start_year,
            self.work_end_year,
            self.is_currently_working,
        );

        let mut user = UserPoint::new(self.id.clone(), self.name.clone(), point);
        for role in self.roles().iter() {
            user.add_membership(match role {
                Role::Student => Membership::Student,
                Role::ExStudent => Membership::ExStudent {
                    graduation_year: self.graduation_year,
                },
                Role::Teacher => Membership::Teacher(tenure),
                Role::NonTeachingStaff => Membership::NonTeachingStaff(tenure),
                Role::Family => Membership::Family,
            });
        }
        user.avatar = self.profile_image.filter(|s| !s.trim().is_empty());
        user.description = self.description;

        Ok(user)
    }
}

impl From<&UserPoint> for UserRecord {
    /// Flatten a user back into the directory's shape. The flat record has
    /// room for one set of work years; the first staff membership wins.
    fn from(user: &UserPoint) -> Self {
        let tags: Vec<String> = user.roles().iter().map(|r| r.tag().to_string()).collect();
        let graduation_year = user
            .memberships
            .iter()
            .find_map(Membership::graduation_year);
        let tenure = user.memberships.iter().find_map(Membership::tenure);

        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            profile_image: user.avatar.clone(),
            description: user.description.clone(),
            role: Some(RoleField::Many(tags)),
            graduation_year,
            work_start_year: tenure.and_then(|t| t.start_year),
            work_end_year: tenure.and_then(Tenure::end_year),
            is_currently_working: tenure.map(Tenure::is_current),
            location: Some(RecordLocation {
                kind: Some("Point".to_string()),
                coordinates: vec![user.longitude(), user.latitude()],
            }),
        }
    }
}

/// Payload of the directory listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryData {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub total_users: usize,
}

/// Envelope of the directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<DirectoryData>,
}

/// Convert records, dropping the ones that cannot be placed on the map.
pub fn ingest_records<I>(records: I) -> Vec<UserPoint>
where
    I: IntoIterator<Item = UserRecord>,
{
    let mut users = Vec::new();
    let mut rejected = 0usize;
    for record in records {
        match record.into_user_point() {
            Ok(user) => users.push(user),
            Err(e) => {
                log::debug!("Skipping directory record: {}", e);
                rejected += 1;
            }
        }
    }
    if rejected > 0 {
        log::debug!(
            "Ingested {} directory users, skipped {} without a usable pin",
            users.len(),
            rejected
        );
    }
    users
}

/// Convert a whole directory response.
pub fn ingest_directory(response: DirectoryResponse) -> Result<Vec<UserPoint>> {
    if !response.success {
        return Err(MapaError::InvalidInput(format!(
            "Directory request failed: {}",
            response.message
        )));
    }
    let data = response.data.unwrap_or_default();
    if data.total_users != data.users.len() {
        log::debug!(
            "Directory reports {} users but listed {}",
            data.total_users,
            data.users.len()
        );
    }
    Ok(ingest_records(data.users))
}

/// Parse and convert a directory response body.
pub fn parse_directory(json: &str) -> Result<Vec<UserPoint>> {
    let response: DirectoryResponse = serde_json::from_str(json)?;
    ingest_directory(response)
}
