use once_cell::sync::Lazy;
use regex::Regex;
use shared_types::Place;
use tracing::warn;
use url::Url;

// Models wrap JSON in markdown fences even when told not to
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json|JSON)?").unwrap());

/// Outcome of decoding a grounding reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPlace {
    Structured(Place),
    /// The reply was not a structured payload; the raw text became the summary.
    Fallback(Place),
}

impl ParsedPlace {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn into_place(self) -> Place {
        match self {
            Self::Structured(place) | Self::Fallback(place) => place,
        }
    }
}

pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Decodes a reply into a [`Place`], degrading to a custom place addressed by
/// `default_address` when the payload cannot be read.
pub fn parse_place(text: &str, default_address: &str) -> ParsedPlace {
    let cleaned = strip_code_fences(text);

    match serde_json::from_str::<Place>(&cleaned) {
        Ok(place) => ParsedPlace::Structured(sanitize(place)),
        Err(err) => {
            warn!(%err, "failed to parse place payload, using fallback");
            ParsedPlace::Fallback(Place::custom(default_address, text))
        }
    }
}

fn sanitize(mut place: Place) -> Place {
    if let Some(coords) = place.coordinates {
        if !coords.is_valid() {
            warn!(lat = coords.lat, lng = coords.lng, "discarding out of range coordinates");
            place.coordinates = None;
        }
    }

    if let Some(uri) = place.map_link_uri.as_deref() {
        if Url::parse(uri).is_err() {
            warn!(uri, "discarding malformed map link");
            place.map_link_uri = None;
        }
    }

    place
}
