// Clients for the external AI grounding service

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ResolutionError;

pub mod gemini;

pub use gemini::GeminiClient;

/// One "generate content" call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub maps_grounding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Web,
    Maps,
}

/// A citation attached to a grounded reply.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundingSource {
    pub kind: SourceKind,
    pub uri: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundedResponse {
    pub text: Option<String>,
    pub sources: Vec<GroundingSource>,
}

impl GroundedResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, kind: SourceKind, uri: impl Into<String>) -> Self {
        self.sources.push(GroundingSource {
            kind,
            uri: uri.into(),
            title: None,
        });
        self
    }

    /// First map-source link among the grounding citations.
    pub fn maps_uri(&self) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.kind == SourceKind::Maps && !s.uri.is_empty())
            .map(|s| s.uri.as_str())
    }
}

#[async_trait]
pub trait GroundingClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GroundedResponse, ResolutionError>;
}

#[async_trait]
impl<T: GroundingClient + ?Sized> GroundingClient for Arc<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<GroundedResponse, ResolutionError> {
        (**self).generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_uri_skips_web_sources() {
        let response = GroundedResponse::text("{}")
            .with_source(SourceKind::Web, "https://example.com/article")
            .with_source(SourceKind::Maps, "https://maps.google.com/?cid=42");

        assert_eq!(response.maps_uri(), Some("https://maps.google.com/?cid=42"));
    }

    #[test]
    fn maps_uri_absent_without_maps_chunk() {
        let response = GroundedResponse::text("{}").with_source(SourceKind::Web, "https://example.com");
        assert_eq!(response.maps_uri(), None);
    }
}
