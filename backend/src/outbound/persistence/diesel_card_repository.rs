//! PostgreSQL-backed `CardRepository`.
//!
//! Regeneration relies on `ON CONFLICT (user_id, date, mode) DO UPDATE`, so
//! the card id survives and `completed` is cleared in the same statement.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{CardRepository, CardRepositoryError};
use crate::domain::{Card, CardDraft, MoodMode, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{CardContentUpdate, CardRow, NewCardRow};
use super::pg_enums::{PgAudience, PgMoodMode};
use super::pool::{DbPool, PoolError};
use super::schema::cards;

/// Diesel implementation of [`CardRepository`].
#[derive(Clone)]
pub struct DieselCardRepository {
    pool: DbPool,
}

impl DieselCardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CardRepositoryError {
    CardRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error, user_id: Option<&UserId>) -> CardRepositoryError {
    match (classify_diesel_error(error), user_id) {
        (DieselFailure::Connection(message), _) => CardRepositoryError::connection(message),
        (DieselFailure::MissingProfile, Some(user_id)) => {
            CardRepositoryError::profile_missing(user_id.to_string())
        }
        (DieselFailure::MissingProfile, None) => {
            CardRepositoryError::query("referenced profile does not exist")
        }
        (DieselFailure::Query(message), _) => CardRepositoryError::query(message),
    }
}

fn row_to_card(row: CardRow) -> Result<Card, CardRepositoryError> {
    let card_id = row.id;
    Card::try_from(row).map_err(|err| {
        warn!(%card_id, error = %err, "stored card violates content bounds");
        CardRepositoryError::query(format!("stored card {card_id} is invalid: {err}"))
    })
}

#[async_trait]
impl CardRepository for DieselCardRepository {
    async fn find_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        mode: MoodMode,
    ) -> Result<Option<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = cards::table
            .filter(cards::user_id.eq(user_id.as_uuid()))
            .filter(cards::date.eq(date))
            .filter(cards::mode.eq(PgMoodMode(mode)))
            .select(CardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, Some(user_id)))?;

        row.map(row_to_card).transpose()
    }

    async fn find_by_id(&self, card_id: Uuid) -> Result<Option<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = cards::table
            .find(card_id)
            .select(CardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, None))?;

        row.map(row_to_card).transpose()
    }

    async fn upsert_for_day(&self, draft: &CardDraft) -> Result<Card, CardRepositoryError> {
        let quote = draft.content.quote();
        let audience_used = PgAudience(draft.audience_used);
        let new_row = NewCardRow {
            user_id: *draft.user_id.as_uuid(),
            date: draft.date,
            mode: PgMoodMode(draft.mode),
            quote_text: &quote.text,
            quote_author: &quote.author,
            reflection: draft.content.reflection(),
            action: draft.content.action(),
            mantra: draft.content.mantra(),
            audience_used,
            themes: &draft.themes,
        };
        let update = CardContentUpdate {
            quote_text: &quote.text,
            quote_author: &quote.author,
            reflection: draft.content.reflection(),
            action: draft.content.action(),
            mantra: draft.content.mantra(),
            audience_used,
            themes: &draft.themes,
            completed: false,
            updated_at: Utc::now(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(cards::table)
            .values(&new_row)
            .on_conflict((cards::user_id, cards::date, cards::mode))
            .do_update()
            .set(&update)
            .returning(CardRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, Some(&draft.user_id)))?;

        row_to_card(row)
    }

    async fn mark_completed(
        &self,
        card_id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Card>, CardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            cards::table
                .filter(cards::id.eq(card_id))
                .filter(cards::user_id.eq(user_id.as_uuid())),
        )
        .set((cards::completed.eq(true), cards::updated_at.eq(Utc::now())))
        .returning(CardRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(&err, Some(user_id)))?;

        row.map(row_to_card).transpose()
    }
}
