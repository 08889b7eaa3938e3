// Gemini "generateContent" client with Google Maps grounding
// Request/response shapes follow the public v1beta REST API

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::{GenerateRequest, GroundedResponse, GroundingClient, GroundingSource, SourceKind};
use crate::{config::ResolverConfig, error::ResolutionError};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ResolutionError> {
        Ok(Self {
            http: Client::builder().build()?,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self, ResolutionError> {
        Self::new(config.api_key.clone(), config.base_url.clone())
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GroundingClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GroundedResponse, ResolutionError> {
        let url = self.endpoint(&request.model);
        let body = request_body(request);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key).map_err(|_| ResolutionError::Api {
                status: 401,
                body: "API key contains characters not allowed in a header".to_string(),
            })?,
        );

        debug!(model = %request.model, "sending generateContent request");
        let response = self.http.post(&url).headers(headers).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "generateContent failed");
            return Err(ResolutionError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let raw = response.text().await?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| ResolutionError::InvalidResponse(e.to_string()))?;
        Ok(parse_generate_response(&value))
    }
}

fn request_body(request: &GenerateRequest) -> Value {
    let contents = json!([{
        "role": "user",
        "parts": [{ "text": request.prompt }]
    }]);

    if request.maps_grounding {
        json!({
            "contents": contents,
            "tools": [{ "googleMaps": {} }]
        })
    } else {
        json!({ "contents": contents })
    }
}

/// Pulls the reply text and grounding citations out of the first candidate.
pub fn parse_generate_response(value: &Value) -> GroundedResponse {
    let candidate = match value.get("candidates").and_then(|c| c.get(0)) {
        Some(c) => c,
        None => return GroundedResponse::default(),
    };

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(|p| p.get("text")?.as_str()).collect())
        .unwrap_or_default();

    let sources: Vec<GroundingSource> = candidate
        .get("groundingMetadata")
        .and_then(|m| m.get("groundingChunks"))
        .and_then(Value::as_array)
        .map(|chunks| chunks.iter().filter_map(convert_chunk).collect())
        .unwrap_or_default();

    GroundedResponse {
        text: if text.is_empty() { None } else { Some(text) },
        sources,
    }
}

fn convert_chunk(chunk: &Value) -> Option<GroundingSource> {
    let (kind, source) = if let Some(maps) = chunk.get("maps") {
        (SourceKind::Maps, maps)
    } else {
        (SourceKind::Web, chunk.get("web")?)
    };

    Some(GroundingSource {
        kind,
        uri: source.get("uri")?.as_str()?.to_string(),
        title: source.get("title").and_then(Value::as_str).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_and_maps_chunks() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"formatted" }, { "text": "Address\": \"x\"}" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com", "title": "Example" } },
                        { "maps": { "uri": "https://maps.google.com/?cid=7", "title": "Eiffel Tower" } }
                    ]
                }
            }]
        });

        let response = parse_generate_response(&value);

        assert_eq!(response.text.as_deref(), Some("{\"formattedAddress\": \"x\"}"));
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.maps_uri(), Some("https://maps.google.com/?cid=7"));
        assert_eq!(response.sources[1].title.as_deref(), Some("Eiffel Tower"));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let value = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let response = parse_generate_response(&value);
        assert_eq!(response.text, None);
        assert!(response.sources.is_empty());
    }

    #[test]
    fn chunk_without_uri_is_skipped() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hi" }] },
                "groundingMetadata": { "groundingChunks": [{ "maps": { "title": "No link" } }] }
            }]
        });
        assert!(parse_generate_response(&value).sources.is_empty());
    }

    #[test]
    fn body_enables_maps_tool_only_when_requested() {
        let mut request = GenerateRequest {
            model: "gemini-2.5-flash".to_string(),
            prompt: "Locate".to_string(),
            maps_grounding: true,
        };
        assert_eq!(request_body(&request)["tools"][0], json!({ "googleMaps": {} }));

        request.maps_grounding = false;
        assert!(request_body(&request).get("tools").is_none());
        assert_eq!(request_body(&request)["contents"][0]["parts"][0]["text"], "Locate");
    }

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let client = GeminiClient::new("key", "https://example.test/v1beta/").unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
