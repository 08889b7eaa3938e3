use std::{sync::Arc, time::Duration};

use shared_types::{Coordinates, Place};
use tracing::{debug, error, info, warn};

use crate::{
    config::{ResolverConfig, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS},
    error::ResolutionError,
    parser::parse_place,
    services::{GeminiClient, GenerateRequest, GroundedResponse, GroundingClient},
};

/// Turns free-text queries or raw coordinates into [`Place`] records using an
/// AI grounding service.
#[derive(Clone)]
pub struct PlaceResolver {
    client: Arc<dyn GroundingClient>,
    model: String,
    timeout: Duration,
}

impl PlaceResolver {
    pub fn new(client: impl GroundingClient + 'static) -> Self {
        Self {
            client: Arc::new(client),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self, ResolutionError> {
        Ok(Self::new(GeminiClient::from_config(config)?)
            .with_model(config.model.clone())
            .with_timeout(config.timeout))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn resolve_by_address(&self, query: &str) -> Result<Place, ResolutionError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ResolutionError::EmptyQuery);
        }

        info!(query = trimmed, "resolving address");
        let response = self.generate(address_prompt(trimmed)).await?;
        let text = reply_text(&response)?;

        // Unparseable replies keep the caller's query as typed
        let mut place = parse_place(text, query).into_place();

        // Grounding citations beat whatever link the model wrote itself
        if let Some(uri) = response.maps_uri() {
            place.map_link_uri = Some(uri.to_string());
        }

        Ok(place)
    }

    pub async fn resolve_by_coordinates(&self, coords: Coordinates) -> Result<Place, ResolutionError> {
        info!(lat = coords.lat, lng = coords.lng, "resolving coordinates");
        let response = self.generate(coordinates_prompt(coords)).await?;
        let text = reply_text(&response)?;

        let mut place = parse_place(text, &fallback_address(coords)).into_place();
        if place.coordinates.is_some_and(|c| c != coords) {
            debug!("ignoring model supplied coordinates for reverse lookup");
        }
        place.coordinates = Some(coords);

        Ok(place)
    }

    async fn generate(&self, prompt: String) -> Result<GroundedResponse, ResolutionError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            maps_grounding: true,
        };

        match tokio::time::timeout(self.timeout, self.client.generate(&request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                error!(error = %e, "grounding request failed");
                Err(e)
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "grounding request timed out");
                Err(ResolutionError::Timeout(self.timeout))
            }
        }
    }
}

fn reply_text(response: &GroundedResponse) -> Result<&str, ResolutionError> {
    response
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ResolutionError::EmptyResponse)
}

pub fn fallback_address(coords: Coordinates) -> String {
    format!("{:.6}, {:.6}", coords.lat, coords.lng)
}

fn address_prompt(query: &str) -> String {
    format!(
        "Locate the address or place: \"{query}\".

        1. Verify this location exists using Google Maps.
        2. Provide a JSON response with the following fields:
           - \"formattedAddress\": The official, complete address found on Maps.
           - \"coordinates\": {{ \"lat\": number, \"lng\": number }} - The precise latitude and longitude.
           - \"summary\": A 2-3 sentence engaging description of what this place is.
           - \"placeType\": A short string describing the type of place (e.g., \"Restaurant\", \"Corporate Office\").

        Return ONLY the JSON object. Do not include markdown formatting."
    )
}

fn coordinates_prompt(coords: Coordinates) -> String {
    let Coordinates { lat, lng } = coords;
    format!(
        "Identify the location at Latitude: {lat}, Longitude: {lng}.

        1. Determine the nearest address or landmark.
        2. Provide a JSON response with:
           - \"formattedAddress\": The nearest readable address.
           - \"coordinates\": {{ \"lat\": {lat}, \"lng\": {lng} }}
           - \"summary\": A brief description of this area or landmark.
           - \"placeType\": The type of location (e.g. \"Park\", \"Street\", \"Building\").

        Return ONLY the JSON object. Do not include markdown formatting."
    )
}
