//! Reqwest-backed chat completion adapter.
//!
//! Owns transport only: request serialisation, bearer auth, the client-level
//! timeout, status mapping and envelope decoding. Parsing the card payload
//! out of the completion text stays in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::dto::{ChatCompletionRequestDto, ChatCompletionResponseDto};
use crate::domain::ports::{TextGenerationError, TextGenerationRequest, TextGenerationSource};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// `TextGenerationSource` that calls `{base_url}/chat/completions`.
pub struct OpenAiChatSource {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenAiChatSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatSource")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Failures raised while constructing [`OpenAiChatSource`].
#[derive(Debug, thiserror::Error)]
pub enum OpenAiSourceBuildError {
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl OpenAiChatSource {
    /// Build an adapter for one endpoint and model.
    ///
    /// ```
    /// use std::time::Duration;
    /// use moodshift::outbound::text_generation::OpenAiChatSource;
    ///
    /// let source = OpenAiChatSource::new(
    ///     "https://api.openai.com/v1",
    ///     "sk-test",
    ///     "gpt-4o-mini",
    ///     Duration::from_secs(20),
    /// )
    /// .expect("valid base url");
    /// assert_eq!(source.endpoint().as_str(), "https://api.openai.com/v1/chat/completions");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL does not parse or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OpenAiSourceBuildError> {
        let endpoint = completions_endpoint(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn completions_endpoint(base_url: &str) -> Result<Url, url::ParseError> {
    // A base without a trailing slash would have its last segment replaced.
    let mut base = base_url.trim().to_owned();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)?.join(CHAT_COMPLETIONS_PATH)
}

#[async_trait]
impl TextGenerationSource for OpenAiChatSource {
    async fn complete(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<String, TextGenerationError> {
        let payload = ChatCompletionRequestDto::new(&self.model, request);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        debug!(bytes = body.len(), model = %self.model, "chat completion received");
        parse_completion(body.as_ref())
    }
}

fn parse_completion(body: &[u8]) -> Result<String, TextGenerationError> {
    let decoded: ChatCompletionResponseDto = serde_json::from_slice(body).map_err(|error| {
        TextGenerationError::decode(format!("invalid chat completion payload: {error}"))
    })?;
    decoded
        .into_first_content()
        .ok_or_else(TextGenerationError::empty)
}

fn map_transport_error(error: reqwest::Error) -> TextGenerationError {
    if error.is_timeout() {
        TextGenerationError::timeout(error.to_string())
    } else {
        TextGenerationError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TextGenerationError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TextGenerationError::timeout(format!("status {}", status.as_u16()))
        }
        _ => TextGenerationError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else {
        compact
    }
}
