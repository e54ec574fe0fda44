//! Client for the Gemini `generateContent` endpoint.
//!
//! One call to [`GeminiClient::generate`] is one HTTP attempt. Spacing and
//! retries are the gateway's business.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::framework::*;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub headers: Option<HashMap<String, String>>,

    /// per-attempt timeout, in milliseconds
    pub timeout: u64,

    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            headers: None,
            timeout: 30_000,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug, PartialEq)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug, PartialEq)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize, Debug, Default)]
struct ResponseBody {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

fn extract_text(body: ResponseBody) -> Result<String, Error> {
    body.candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::malformed("missing candidates[0].content.parts[0].text"))
}

pub fn build_headers_map(extra: Option<&HashMap<String, String>>) -> Result<header::HeaderMap, Error> {
    let mut headers = header::HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::try_from("application/json").map_err(Error::config)?,
    );

    if let Some(custom) = &extra {
        for (name, value) in custom.iter() {
            let name = header::HeaderName::try_from(name).map_err(Error::config)?;
            let value = header::HeaderValue::try_from(value).map_err(Error::config)?;
            headers.insert(name, value);
        }
    }

    Ok(headers)
}

pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
    generation: Config,
}

impl GeminiClient {
    /// Fails with [`Error::NotConfigured`] when the config carries no API key.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::NotConfigured)?;

        let client = reqwest::ClientBuilder::new()
            .user_agent(APP_USER_AGENT)
            .default_headers(build_headers_map(config.headers.as_ref())?)
            .build()
            .map_err(Error::config)?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
            timeout: Duration::from_millis(config.timeout),
            generation: config.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&self, request: &'a GenerationRequest) -> RequestBody<'a> {
        RequestBody {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.generation.temperature,
                top_k: self.generation.top_k,
                top_p: self.generation.top_p,
                max_output_tokens: self.generation.max_output_tokens,
                response_mime_type: request.format.mime_type(),
            },
        }
    }

    async fn execute(&self, body: &RequestBody<'_>) -> Result<String, Error> {
        // reqwest errors carry the request url, keep it out of logs
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| Error::Http(err.without_url()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ResponseBody = response
            .json()
            .await
            .map_err(|err| Error::malformed(err.without_url()))?;

        extract_text(body)
    }
}

#[async_trait]
impl Generate for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, Error> {
        let body = self.request_body(request);

        debug!(model = %self.generation.model, format = ?request.format, "calling generative endpoint");

        tokio::time::timeout(self.timeout, self.execute(&body)).await?
    }
}
