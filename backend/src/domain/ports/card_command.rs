//! Driving port for card generation and completion.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Audience, Card, Error, GenerationQuota, MoodMode, StreakState, Themes, UserId,
    generation::fallback_content, quota::DEFAULT_MAX_GENERATIONS,
};

/// Request to produce today's card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCardRequest {
    pub user_id: UserId,
    /// Mode to generate; `None` uses the mode stored in settings.
    pub mode: Option<MoodMode>,
    /// Replace an existing card instead of reporting a conflict.
    pub regenerate: bool,
}

/// Result of a generation request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateCardOutcome {
    /// New content was generated and persisted.
    Generated {
        card: Card,
        quota: GenerationQuota,
    },
    /// A card already exists and regeneration was not requested; no quota
    /// was consumed.
    Existing { card: Card },
}

/// Request to mark a card's action as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteCardRequest {
    pub user_id: UserId,
    pub card_id: Uuid,
}

/// Completed card plus the streak as it reads afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteCardResponse {
    pub card: Card,
    pub streak: StreakState,
}

/// Driving port for card mutations.
///
/// # Errors
///
/// `generate` fails with `quota_exceeded` when the day's allowance is used up
/// and with `not_found` when the caller has no profile. `complete` fails with
/// `not_found` when the card is missing or owned by someone else. Completing
/// an already completed card succeeds and changes nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardCommand: Send + Sync {
    async fn generate(&self, request: GenerateCardRequest) -> Result<GenerateCardOutcome, Error>;

    async fn complete(&self, request: CompleteCardRequest) -> Result<CompleteCardResponse, Error>;
}

/// Fixture implementation serving fallback content without persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCardCommand;

#[async_trait]
impl CardCommand for FixtureCardCommand {
    async fn generate(&self, request: GenerateCardRequest) -> Result<GenerateCardOutcome, Error> {
        let now = Utc::now();
        let mode = request.mode.unwrap_or_default();
        let card = Card {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            date: now.date_naive(),
            mode,
            content: fallback_content(mode),
            audience_used: Audience::default(),
            themes: Themes::default().into(),
            completed: false,
            created_at: now,
        };
        let quota = GenerationQuota::unused(request.user_id, card.date, DEFAULT_MAX_GENERATIONS)
            .record_generation();
        Ok(GenerateCardOutcome::Generated { card, quota })
    }

    async fn complete(&self, request: CompleteCardRequest) -> Result<CompleteCardResponse, Error> {
        Err(Error::not_found(format!("card {} not found", request.card_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_generates_fallback_for_requested_mode() {
        let outcome = FixtureCardCommand
            .generate(GenerateCardRequest {
                user_id: UserId::random(),
                mode: Some(MoodMode::Warrior),
                regenerate: false,
            })
            .await
            .expect("fixture generation succeeds");

        let GenerateCardOutcome::Generated { card, quota } = outcome else {
            panic!("fixture always generates");
        };
        assert_eq!(card.content, fallback_content(MoodMode::Warrior));
        assert_eq!(quota.generations_used, 1);
    }
}
