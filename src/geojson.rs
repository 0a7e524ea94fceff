//! GeoJSON conversion for directory users.
//!
//! Each user becomes a `Point` feature whose id is the user id and whose
//! properties are the directory record fields.

use crate::error::{MapaError, Result};
use crate::ingest::{RecordLocation, UserRecord};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use mapa_types::point::UserPoint;
use serde_json::Value as JsonValue;

/// Converts a user to a GeoJSON feature.
pub fn user_to_feature(user: &UserPoint) -> Result<Feature> {
    let mut record = UserRecord::from(user);
    record.location = None;

    let properties = match serde_json::to_value(&record)? {
        JsonValue::Object(map) => Some(map),
        _ => None,
    };

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            user.longitude(),
            user.latitude(),
        ]))),
        id: Some(Id::String(user.id.clone())),
        properties,
        foreign_members: None,
    })
}

/// Parses a GeoJSON feature into a user.
pub fn feature_to_user(feature: Feature) -> Result<UserPoint> {
    let coordinates = match feature.geometry.map(|g| g.value) {
        Some(Value::Point(coords)) => coords,
        Some(_) => {
            return Err(MapaError::InvalidInput(
                "GeoJSON geometry is not a Point".to_string(),
            ));
        }
        None => {
            return Err(MapaError::InvalidInput(
                "GeoJSON feature has no geometry".to_string(),
            ));
        }
    };

    let mut properties = feature.properties.unwrap_or_default();
    properties.remove("location");
    if !properties.contains_key("_id") && !properties.contains_key("id") {
        let id = match feature.id {
            Some(Id::String(s)) => s,
            Some(Id::Number(n)) => n.to_string(),
            None => {
                return Err(MapaError::InvalidInput(
                    "GeoJSON feature has no user id".to_string(),
                ));
            }
        };
        properties.insert("_id".to_string(), JsonValue::String(id));
    }

    let mut record: UserRecord = serde_json::from_value(JsonValue::Object(properties))?;
    record.location = Some(RecordLocation {
        kind: Some("Point".to_string()),
        coordinates,
    });
    record.into_user_point()
}

/// Converts users to a GeoJSON feature collection.
pub fn to_feature_collection(users: &[UserPoint]) -> Result<FeatureCollection> {
    let features = users
        .iter()
        .map(user_to_feature)
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Converts a feature collection to users, skipping features that cannot
/// be placed on the map.
pub fn from_feature_collection(collection: FeatureCollection) -> Vec<UserPoint> {
    collection
        .features
        .into_iter()
        .filter_map(|feature| match feature_to_user(feature) {
            Ok(user) => Some(user),
            Err(e) => {
                log::debug!("Skipping GeoJSON feature: {}", e);
                None
            }
        })
        .collect()
}

/// Parses a GeoJSON feature collection string into users.
pub fn parse_feature_collection(json: &str) -> Result<Vec<UserPoint>> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    Ok(from_feature_collection(collection))
}
