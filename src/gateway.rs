//! Single entry point for every generative call made by the features.
//!
//! A call is attempted up to the retry policy's limit. Each attempt waits for
//! its turn in the shared [`Throttler`] queue, so the spacing guarantee holds
//! across all features at once. User text is checked with
//! [`Gateway::validate`] before any prompt is built from it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::{
    config::ConfigRoot,
    framework::*,
    gemini::GeminiClient,
    utils::{
        retry::{self, retry_operation},
        throttle::Throttler,
    },
    validate,
};

pub struct Gateway {
    backend: Option<Arc<dyn Generate>>,
    throttler: Throttler,
    retries: retry::Policy,
    max_input_length: usize,
}

impl Gateway {
    /// Builds the Gemini-backed gateway. A missing API key is not an error:
    /// it is reported once and the gateway runs in demo mode.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &ConfigRoot) -> Result<Self, Error> {
        let backend: Option<Arc<dyn Generate>> = match GeminiClient::new(&config.gemini) {
            Ok(client) => {
                info!(endpoint = client.endpoint(), "using gemini backend");
                Some(Arc::new(client))
            }
            Err(Error::NotConfigured) => {
                warn!("gemini api key not configured, running in demo mode with fallback responses");
                None
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            backend,
            throttler: Throttler::from(config.throttle),
            retries: config.retries,
            max_input_length: config.validation.max_length,
        })
    }

    pub fn with_backend(backend: Arc<dyn Generate>, throttler: Throttler, retries: retry::Policy) -> Self {
        Self {
            backend: Some(backend),
            throttler,
            retries,
            max_input_length: validate::DEFAULT_MAX_LENGTH,
        }
    }

    pub fn demo(throttler: Throttler) -> Self {
        Self {
            backend: None,
            throttler,
            retries: retry::Policy::default(),
            max_input_length: validate::DEFAULT_MAX_LENGTH,
        }
    }

    pub fn with_max_input_length(self, max_input_length: usize) -> Self {
        Self {
            max_input_length,
            ..self
        }
    }

    pub fn is_demo(&self) -> bool {
        self.backend.is_none()
    }

    /// Validates user text against this gateway's input limit.
    pub fn validate(&self, text: &str) -> Result<String, Error> {
        validate::validate_input(text, self.max_input_length)
    }

    pub async fn generate_text(&self, prompt: impl Into<String>) -> Result<String, Error> {
        self.generate(GenerationRequest::text(prompt), Ok).await
    }

    /// Asks for a JSON answer and decodes it into `T`. An answer that does
    /// not decode counts as a malformed response and is retried.
    pub async fn generate_json<T>(&self, prompt: impl Into<String>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.generate(GenerationRequest::json(prompt), |text| parse_structured(&text))
            .await
    }

    async fn generate<T>(
        &self,
        request: GenerationRequest,
        decode: fn(String) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let backend = self.backend.clone().ok_or(Error::NotConfigured)?;
        let request = Arc::new(request);

        let attempt = || {
            let backend = backend.clone();
            let request = request.clone();

            let dispatched = self
                .throttler
                .submit(move || async move { backend.generate(&request).await });

            async move { decode(dispatched.await?) }
        };

        retry_operation(attempt, &self.retries).await
    }
}

/// Decodes a structured answer, tolerating a markdown code fence around it.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    let trimmed = text.trim();

    let unfenced = trimmed
        .strip_prefix("```")
        .map(|rest| match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        })
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim()).map_err(Error::malformed)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Mood {
        score: i32,
    }

    #[test]
    fn parses_plain_json() {
        let mood: Mood = parse_structured(r#"{ "score": 4 }"#).unwrap();
        assert_eq!(mood, Mood { score: 4 });
    }

    #[test]
    fn parses_fenced_json() {
        let mood: Mood = parse_structured("```json\n{ \"score\": -2 }\n```").unwrap();
        assert_eq!(mood, Mood { score: -2 });
    }

    #[test]
    fn fence_tag_is_case_insensitive() {
        let answers = [
            "```JSON\n{ \"score\": 1 }\n```",
            "```Json { \"score\": 1 } ```",
            "```\n{ \"score\": 1 }\n```",
        ];

        for fenced in answers {
            let mood: Mood = parse_structured(fenced).unwrap();
            assert_eq!(mood, Mood { score: 1 }, "{fenced}");
        }
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let result = parse_structured::<Mood>(r#"{ "feeling": "ok" }"#);
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn demo_mode_fails_fast() {
        let gateway = Gateway::demo(Throttler::new(std::time::Duration::from_secs(1)));

        assert!(gateway.is_demo());
        assert!(matches!(
            gateway.generate_text("hello").await,
            Err(Error::NotConfigured)
        ));
    }
}
