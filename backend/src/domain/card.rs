//! Daily cards and their bounded content.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Audience, MoodMode, UserId};

/// Maximum quote length, in characters.
pub const QUOTE_MAX_CHARS: usize = 160;
/// Maximum reflection length, in characters.
pub const REFLECTION_MAX_CHARS: usize = 500;
/// Maximum action length, in characters.
pub const ACTION_MAX_CHARS: usize = 140;
/// Maximum mantra length, in characters.
pub const MANTRA_MAX_CHARS: usize = 60;
/// Author recorded when a quote carries no attribution.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Reasons a content payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CardContentError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// A quote and its attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

/// Validated card text.
///
/// Every field is non-blank and within its bound, so anything holding a
/// `CardContent` may persist it without re-checking. Deserialisation goes
/// through the same checks.
///
/// Leading and trailing whitespace is normalised away before the bounds are
/// applied; nothing else is altered. A blank or over-long field rejects the
/// whole payload rather than being shortened.
///
/// # Examples
/// ```
/// use moodshift::domain::CardContent;
///
/// let content = CardContent::new(
///     "Breathe.",
///     None,
///     "Notice the air moving.",
///     "Take three slow breaths.",
///     "I am here.",
/// )
/// .expect("content within bounds");
/// assert_eq!(content.quote().author, "Unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardContentFields")]
pub struct CardContent {
    quote: Quote,
    reflection: String,
    action: String,
    mantra: String,
}

/// Unchecked wire shape of [`CardContent`].
#[derive(Deserialize)]
struct CardContentFields {
    quote: Quote,
    reflection: String,
    action: String,
    mantra: String,
}

impl TryFrom<CardContentFields> for CardContent {
    type Error = CardContentError;

    fn try_from(fields: CardContentFields) -> Result<Self, Self::Error> {
        Self::new(
            &fields.quote.text,
            Some(&fields.quote.author),
            &fields.reflection,
            &fields.action,
            &fields.mantra,
        )
    }
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, CardContentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CardContentError::Blank { field });
    }
    if trimmed.chars().count() > max {
        return Err(CardContentError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

impl CardContent {
    /// Validate every field; a blank or missing author becomes `"Unknown"`.
    pub fn new(
        quote_text: &str,
        quote_author: Option<&str>,
        reflection: &str,
        action: &str,
        mantra: &str,
    ) -> Result<Self, CardContentError> {
        let author = quote_author
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_owned();
        Ok(Self {
            quote: Quote {
                text: bounded("quote", quote_text, QUOTE_MAX_CHARS)?,
                author,
            },
            reflection: bounded("reflection", reflection, REFLECTION_MAX_CHARS)?,
            action: bounded("action", action, ACTION_MAX_CHARS)?,
            mantra: bounded("mantra", mantra, MANTRA_MAX_CHARS)?,
        })
    }

    /// Assemble content from literals already known to satisfy every bound.
    pub(crate) fn from_static(
        quote_text: &str,
        quote_author: &str,
        reflection: &str,
        action: &str,
        mantra: &str,
    ) -> Self {
        Self {
            quote: Quote {
                text: quote_text.to_owned(),
                author: quote_author.to_owned(),
            },
            reflection: reflection.to_owned(),
            action: action.to_owned(),
            mantra: mantra.to_owned(),
        }
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn reflection(&self) -> &str {
        &self.reflection
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn mantra(&self) -> &str {
        &self.mantra
    }
}

/// Content produced for one card, echoing the parameters used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCard {
    pub content: CardContent,
    pub mode: MoodMode,
    pub audience_used: Audience,
}

/// Values written when a card is created or regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub mode: MoodMode,
    pub content: CardContent,
    pub audience_used: Audience,
    pub themes: Vec<String>,
}

/// A persisted daily card keyed by `(user_id, date, mode)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub mode: MoodMode,
    pub content: CardContent,
    pub audience_used: Audience,
    pub themes: Vec<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Whether `user_id` owns this card.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
