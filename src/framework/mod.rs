//! Internal framework shared by the gateway and its transports

pub mod errors;

pub use errors::Error;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

impl ResponseFormat {
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            ResponseFormat::Text => None,
            ResponseFormat::Json => Some("application/json"),
        }
    }
}

/// A single prompt bound for the generative endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub format: ResponseFormat,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Text,
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Json,
        }
    }
}

/// Performs exactly one attempt against a generative backend and returns the
/// raw generated text.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, Error>;
}
