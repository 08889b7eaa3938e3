use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to places the grounding service could not structure.
pub const CUSTOM_LOCATION: &str = "Custom Location";

/// A WGS84 point.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Wraps longitude back into [-180, 180]. Map widgets report clicks on
    /// repeated world copies with longitudes past the antimeridian.
    pub fn normalized(&self) -> Self {
        let mut lng = (self.lng + 180.0).rem_euclid(360.0) - 180.0;
        if lng == -180.0 && self.lng > 0.0 {
            lng = 180.0;
        }
        Self { lat: self.lat, lng }
    }
}

/// A resolved, human meaningful description of a location.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub formatted_address: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "googleMapsUri", skip_serializing_if = "Option::is_none")]
    pub map_link_uri: Option<String>,
}

impl Place {
    /// Degraded place built from unstructured service output.
    pub fn custom(formatted_address: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            summary: summary.into(),
            place_type: Some(CUSTOM_LOCATION.to_string()),
            coordinates: None,
            map_link_uri: None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.place_type.as_deref() == Some(CUSTOM_LOCATION)
    }
}

/// A directory member.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub location: Place,
    pub joined_at: DateTime<Utc>,
}

impl Entry {
    /// Creates an entry with a fresh v4 id, joined now.
    pub fn new(name: impl Into<String>, location: Place) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            location,
            joined_at: Utc::now(),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.coordinates
    }

    /// Avatar letter shown in the member list.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().and_then(|c| c.to_uppercase().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_validate_wgs84_ranges() {
        assert!(Coordinates::new(48.8584, 2.2945).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn normalized_wraps_longitude() {
        assert_eq!(Coordinates::new(10.0, 190.0).normalized().lng, -170.0);
        assert_eq!(Coordinates::new(10.0, -190.0).normalized().lng, 170.0);
        assert_eq!(Coordinates::new(10.0, 180.0).normalized().lng, 180.0);
        assert_eq!(Coordinates::new(10.0, 20.0).normalized().lng, 20.0);
    }

    #[test]
    fn place_decodes_camel_case_payload() {
        let place: Place = serde_json::from_str(
            r#"{
                "formattedAddress": "Champ de Mars, 75007 Paris, France",
                "summary": "A wrought-iron lattice tower.",
                "placeType": "Monument",
                "coordinates": { "lat": 48.8584, "lng": 2.2945 },
                "googleMapsUri": "https://maps.google.com/?q=Eiffel+Tower"
            }"#,
        )
        .unwrap();

        assert_eq!(place.place_type.as_deref(), Some("Monument"));
        assert_eq!(place.coordinates, Some(Coordinates::new(48.8584, 2.2945)));
        assert_eq!(
            place.map_link_uri.as_deref(),
            Some("https://maps.google.com/?q=Eiffel+Tower")
        );
    }

    #[test]
    fn place_requires_address_and_summary() {
        let result = serde_json::from_str::<Place>(r#"{"summary": "no address"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn custom_place_has_no_coordinates() {
        let place = Place::custom("somewhere", "raw text");
        assert!(place.is_custom());
        assert_eq!(place.coordinates, None);
        assert_eq!(place.map_link_uri, None);
    }

    #[test]
    fn entry_initial_is_uppercase() {
        let entry = Entry::new("alice", Place::custom("x", "y"));
        assert_eq!(entry.initial(), Some('A'));
        assert!(!entry.id.is_empty());
    }
}
