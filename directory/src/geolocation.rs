use async_trait::async_trait;
use shared_types::Coordinates;
use thiserror::Error;

pub const LOCATE_FAILED: &str = "Could not detect your location.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,
    #[error("device location unavailable")]
    Unavailable,
}

/// One-shot device position lookup.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Reports a configured position, or nothing.
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }

    /// Parses `"lat,lng"`; anything else yields an unavailable locator.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(',').map(|p| p.trim().parse::<f64>());
        let position = match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(lat)), Some(Ok(lng)), None) => {
                Some(Coordinates::new(lat, lng)).filter(Coordinates::is_valid)
            }
            _ => None,
        };
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.position.ok_or(GeolocationError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lng_pair() {
        let locator = FixedGeolocator::parse(" 48.8584, 2.2945 ");
        assert_eq!(locator.position, Some(Coordinates::new(48.8584, 2.2945)));
    }

    #[test]
    fn rejects_garbage_and_out_of_range() {
        assert_eq!(FixedGeolocator::parse("paris").position, None);
        assert_eq!(FixedGeolocator::parse("95.0,10.0").position, None);
        assert_eq!(FixedGeolocator::parse("1,2,3").position, None);
    }

    #[tokio::test]
    async fn unconfigured_locator_is_unavailable() {
        let result = FixedGeolocator::default().current_position().await;
        assert_eq!(result, Err(GeolocationError::Unavailable));
    }
}
