//! Content generator.
//!
//! [`CardGenerator::generate`] is infallible: any failure from the text
//! generation source, a timeout, an unparseable reply or a bound violation
//! is logged and replaced by the fixed fallback payload for the mode.

mod fallback;
mod prompt;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::ports::{TextGenerationError, TextGenerationSource};
use super::{Audience, CardContent, CardContentError, GeneratedCard, MoodMode, Tone};

pub use fallback::fallback_content;
pub use prompt::{MAX_TOKENS, TEMPERATURE, build_request};

/// Inputs for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams<'a> {
    pub mode: MoodMode,
    pub themes: &'a [String],
    pub language: &'a str,
    pub tone: Tone,
    pub audience: Audience,
    /// Only flavours phrasing; never changes the output structure.
    pub streak_length: u32,
}

#[derive(Debug, thiserror::Error)]
enum GenerationFailure {
    #[error(transparent)]
    Source(#[from] TextGenerationError),
    #[error("no completion within {0:?}")]
    TimedOut(Duration),
    #[error("completion is not a card object: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("completion violates content bounds: {0}")]
    OutOfBounds(#[from] CardContentError),
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    text: String,
    #[serde(default)]
    author: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    quote: RawQuote,
    reflection: String,
    action: String,
    mantra: String,
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse and validate a completion. Any defect rejects the whole payload.
fn parse_completion(raw: &str) -> Result<CardContent, GenerationFailure> {
    let card: RawCard = serde_json::from_str(strip_code_fence(raw))?;
    Ok(CardContent::new(
        &card.quote.text,
        card.quote.author.as_deref(),
        &card.reflection,
        &card.action,
        &card.mantra,
    )?)
}

/// Produces card content from an injected text generation source.
#[derive(Clone)]
pub struct CardGenerator {
    source: Arc<dyn TextGenerationSource>,
    timeout: Duration,
}

impl CardGenerator {
    /// Create a generator bounding each source call by `timeout`.
    pub fn new(source: Arc<dyn TextGenerationSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Generate content for `params`, falling back on any failure.
    pub async fn generate(&self, params: &GenerationParams<'_>) -> GeneratedCard {
        let content = match self.try_generate(params).await {
            Ok(content) => content,
            Err(error) => {
                warn!(mode = %params.mode, reason = %error, "card generation failed; serving fallback");
                fallback_content(params.mode)
            }
        };
        GeneratedCard {
            content,
            mode: params.mode,
            audience_used: params.audience,
        }
    }

    async fn try_generate(
        &self,
        params: &GenerationParams<'_>,
    ) -> Result<CardContent, GenerationFailure> {
        let request = build_request(params);
        let raw = tokio::time::timeout(self.timeout, self.source.complete(&request))
            .await
            .map_err(|_| GenerationFailure::TimedOut(self.timeout))??;
        debug!(mode = %params.mode, bytes = raw.len(), "received completion");
        parse_completion(&raw)
    }
}
