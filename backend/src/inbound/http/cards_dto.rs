//! Card DTOs shared by the card handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Audience, Card, GenerationQuota, MoodMode, StreakState};

/// Request payload for `POST /cards/generate`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCardBody {
    /// `zen` or `warrior`; defaults to the mode stored in settings.
    #[schema(example = "zen")]
    pub mode: Option<String>,
    /// Replace today's card instead of reporting a conflict.
    pub regenerate: Option<bool>,
}

/// Query string for `GET /cards/today`.
#[derive(Debug, Default, Deserialize)]
pub struct TodayParams {
    pub mode: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub text: String,
    pub author: String,
}

/// A persisted daily card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: String,
    pub user_id: String,
    /// Calendar date in the user's timezone, `YYYY-MM-DD`.
    pub date: String,
    pub mode: MoodMode,
    pub quote: QuoteResponse,
    pub reflection: String,
    pub action: String,
    pub mantra: String,
    pub audience_used: Audience,
    pub themes: Vec<String>,
    pub completed: bool,
    pub created_at: String,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        let quote = card.content.quote();
        Self {
            id: card.id.to_string(),
            user_id: card.user_id.to_string(),
            date: card.date.to_string(),
            mode: card.mode,
            quote: QuoteResponse {
                text: quote.text.clone(),
                author: quote.author.clone(),
            },
            reflection: card.content.reflection().to_owned(),
            action: card.content.action().to_owned(),
            mantra: card.content.mantra().to_owned(),
            audience_used: card.audience_used,
            themes: card.themes,
            completed: card.completed,
            created_at: card.created_at.to_rfc3339(),
        }
    }
}

/// A day's generation allowance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotaResponse {
    pub date: String,
    pub generations_used: u32,
    pub max_generations: u32,
    pub remaining: u32,
}

impl From<GenerationQuota> for QuotaResponse {
    fn from(quota: GenerationQuota) -> Self {
        Self {
            date: quota.date.to_string(),
            generations_used: quota.generations_used,
            max_generations: quota.max_generations,
            remaining: quota.remaining(),
        }
    }
}

/// Completion streak as of the caller's today.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completion_date: Option<String>,
}

impl From<StreakState> for StreakResponse {
    fn from(state: StreakState) -> Self {
        Self {
            current_streak: state.current_streak,
            longest_streak: state.longest_streak,
            last_completion_date: state.last_completion_date.map(|date| date.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateCardResponse {
    pub card: CardResponse,
    pub quota: QuotaResponse,
}

/// Body of the 409 returned when today's card already exists.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardConflictResponse {
    #[schema(example = "Card already generated for today")]
    pub error: String,
    pub card: CardResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompleteCardResponse {
    pub card: CardResponse,
    pub streak: StreakResponse,
}

/// Combined view for rendering today's screen; absent entities are `null`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodayResponse {
    pub card: Option<CardResponse>,
    pub quota: Option<QuotaResponse>,
    pub streak: Option<StreakResponse>,
}
