//! Port for daily card persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Card, CardDraft, MoodMode, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by card repository adapters.
    pub enum CardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "card repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "card repository query failed: {message}",
        /// The owning profile row does not exist.
        ProfileMissing { user_id: String } =>
            "no profile exists for user {user_id}",
    }
}

/// Port for cards keyed by `(user_id, date, mode)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Fetch the card for one user, day and mode.
    async fn find_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        mode: MoodMode,
    ) -> Result<Option<Card>, CardRepositoryError>;

    /// Fetch a card by id regardless of owner.
    async fn find_by_id(&self, card_id: Uuid) -> Result<Option<Card>, CardRepositoryError>;

    /// Insert the card or replace its content in place.
    ///
    /// Replacing content keeps the card id and resets `completed` to false.
    async fn upsert_for_day(&self, draft: &CardDraft) -> Result<Card, CardRepositoryError>;

    /// Set `completed` on a card owned by `user_id`.
    ///
    /// Returns `None` when no such card is owned by the user.
    async fn mark_completed(
        &self,
        card_id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Card>, CardRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCardRepository;

#[async_trait]
impl CardRepository for FixtureCardRepository {
    async fn find_for_day(
        &self,
        _user_id: &UserId,
        _date: NaiveDate,
        _mode: MoodMode,
    ) -> Result<Option<Card>, CardRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _card_id: Uuid) -> Result<Option<Card>, CardRepositoryError> {
        Ok(None)
    }

    async fn upsert_for_day(&self, draft: &CardDraft) -> Result<Card, CardRepositoryError> {
        Ok(Card {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            date: draft.date,
            mode: draft.mode,
            content: draft.content.clone(),
            audience_used: draft.audience_used,
            themes: draft.themes.clone(),
            completed: false,
            created_at: chrono::Utc::now(),
        })
    }

    async fn mark_completed(
        &self,
        _card_id: Uuid,
        _user_id: &UserId,
    ) -> Result<Option<Card>, CardRepositoryError> {
        Ok(None)
    }
}
