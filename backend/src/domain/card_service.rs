//! Card workflow orchestrator implementing the card driving ports.
//!
//! Every call reloads state through the driven ports; the service holds no
//! durable state of its own. The quota is best effort: the exhaustion check
//! and the atomic increment are separate round trips, so concurrent requests
//! may overshoot by a small margin but never lose an increment.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CardCommand, CardQuery, CardRepository, CardRepositoryError, CompleteCardRequest,
    CompleteCardResponse, GenerateCardOutcome, GenerateCardRequest, QuotaRepository,
    QuotaRepositoryError, SettingsRepository, StreakRepository, StreakRepositoryError,
    TelemetryRepository, TodayRequest, TodaySnapshot,
};
use crate::domain::settings_service::{load_or_create_settings, map_settings_error};
use crate::domain::telemetry::record_event;
use crate::domain::{
    Card, CardDraft, CardGenerator, DEFAULT_MAX_GENERATIONS, Error, GenerationParams,
    GenerationQuota, MoodMode, Settings, Streak, StreakState, TelemetryEvent,
    TelemetryEventType, UserId,
};

/// Driven ports consumed by [`CardService`].
#[derive(Clone)]
pub struct CardWorkflowPorts {
    pub settings: Arc<dyn SettingsRepository>,
    pub cards: Arc<dyn CardRepository>,
    pub quotas: Arc<dyn QuotaRepository>,
    pub streaks: Arc<dyn StreakRepository>,
    pub telemetry: Arc<dyn TelemetryRepository>,
}

/// Orchestrates generation, completion and today's view.
#[derive(Clone)]
pub struct CardService {
    ports: CardWorkflowPorts,
    generator: CardGenerator,
    clock: Arc<dyn Clock>,
    max_generations: u32,
}

fn map_card_error(error: CardRepositoryError) -> Error {
    match error {
        CardRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("card repository unavailable: {message}"))
        }
        CardRepositoryError::Query { message } => {
            Error::internal(format!("card repository error: {message}"))
        }
        CardRepositoryError::ProfileMissing { user_id } => {
            Error::not_found(format!("profile not found for user {user_id}"))
        }
    }
}

fn map_quota_error(error: QuotaRepositoryError) -> Error {
    match error {
        QuotaRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("quota repository unavailable: {message}"))
        }
        QuotaRepositoryError::Query { message } => {
            Error::internal(format!("quota repository error: {message}"))
        }
    }
}

fn map_streak_error(error: StreakRepositoryError) -> Error {
    match error {
        StreakRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("streak repository unavailable: {message}"))
        }
        StreakRepositoryError::Query { message } => {
            Error::internal(format!("streak repository error: {message}"))
        }
    }
}

fn card_not_found() -> Error {
    Error::not_found("Card not found")
}

fn quota_exceeded(quota: &GenerationQuota) -> Error {
    Error::quota_exceeded("Daily generation limit reached").with_details(json!({
        "generationsUsed": quota.generations_used,
        "maxGenerations": quota.max_generations,
    }))
}

impl CardService {
    /// Create a service allowing [`DEFAULT_MAX_GENERATIONS`] per day.
    pub fn new(ports: CardWorkflowPorts, generator: CardGenerator, clock: Arc<dyn Clock>) -> Self {
        Self {
            ports,
            generator,
            clock,
            max_generations: DEFAULT_MAX_GENERATIONS,
        }
    }

    /// Allowance written to quota rows created from now on.
    #[must_use]
    pub fn with_max_generations(mut self, max_generations: u32) -> Self {
        self.max_generations = max_generations;
        self
    }

    async fn load_quota(
        &self,
        user_id: &UserId,
        today: NaiveDate,
    ) -> Result<GenerationQuota, Error> {
        let stored = self
            .ports
            .quotas
            .find_for_day(user_id, today)
            .await
            .map_err(map_quota_error)?;
        Ok(stored
            .unwrap_or_else(|| GenerationQuota::unused(*user_id, today, self.max_generations)))
    }

    async fn load_streak(&self, user_id: &UserId) -> Result<Option<StreakState>, Error> {
        let stored = self
            .ports
            .streaks
            .find_by_user_id(user_id)
            .await
            .map_err(map_streak_error)?;
        Ok(stored.map(|streak| streak.state))
    }

    async fn produce_card(
        &self,
        settings: &Settings,
        mode: MoodMode,
        today: NaiveDate,
        regenerating: bool,
    ) -> Result<(Card, GenerationQuota), Error> {
        let user_id = settings.user_id;
        let streak_length = self
            .load_streak(&user_id)
            .await?
            .map_or(0, |state| state.as_of(today).current_streak);

        let generated = self
            .generator
            .generate(&GenerationParams {
                mode,
                themes: settings.themes.as_slice(),
                language: &settings.language,
                tone: settings.tone,
                audience: settings.audience,
                streak_length,
            })
            .await;

        let card = self
            .ports
            .cards
            .upsert_for_day(&CardDraft {
                user_id,
                date: today,
                mode,
                content: generated.content,
                audience_used: generated.audience_used,
                themes: settings.themes.as_slice().to_vec(),
            })
            .await
            .map_err(map_card_error)?;
        let quota = self
            .ports
            .quotas
            .increment(&user_id, today, self.max_generations)
            .await
            .map_err(map_quota_error)?;

        let event_type = if regenerating {
            TelemetryEventType::CardRegenerated
        } else {
            TelemetryEventType::CardGenerated
        };
        record_event(
            self.ports.telemetry.as_ref(),
            TelemetryEvent {
                user_id,
                event_type,
                event_data: json!({
                    "cardId": card.id,
                    "mode": card.mode,
                    "date": card.date,
                    "generationsUsed": quota.generations_used,
                }),
                created_at: self.clock.utc(),
            },
        )
        .await;
        info!(
            %user_id,
            card_id = %card.id,
            mode = %card.mode,
            date = %today,
            generations_used = quota.generations_used,
            "card generated"
        );
        Ok((card, quota))
    }

    async fn record_completion(
        &self,
        user_id: UserId,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<StreakState, Error> {
        let prior = self.load_streak(&user_id).await?.unwrap_or_default();
        let state = prior.record_completion(today);
        self.ports
            .streaks
            .save(&Streak {
                user_id,
                state,
                updated_at: now,
            })
            .await
            .map_err(map_streak_error)?;
        Ok(state)
    }
}

#[async_trait]
impl CardCommand for CardService {
    async fn generate(&self, request: GenerateCardRequest) -> Result<GenerateCardOutcome, Error> {
        let now = self.clock.utc();
        let user_id = request.user_id;
        let settings =
            load_or_create_settings(self.ports.settings.as_ref(), &user_id, now).await?;
        let today = settings.local_date(now);
        let mode = request.mode.unwrap_or(settings.mode);

        let quota = self.load_quota(&user_id, today).await?;
        let existing = self
            .ports
            .cards
            .find_for_day(&user_id, today, mode)
            .await
            .map_err(map_card_error)?;

        if let Some(card) = existing.as_ref().filter(|_| !request.regenerate) {
            debug!(%user_id, card_id = %card.id, %mode, "card already generated today");
            return Ok(GenerateCardOutcome::Existing { card: card.clone() });
        }
        if quota.is_exhausted() {
            info!(
                %user_id,
                generations_used = quota.generations_used,
                max_generations = quota.max_generations,
                "daily generation quota exhausted"
            );
            return Err(quota_exceeded(&quota));
        }

        let (card, quota) = self
            .produce_card(&settings, mode, today, existing.is_some())
            .await?;
        Ok(GenerateCardOutcome::Generated { card, quota })
    }

    async fn complete(&self, request: CompleteCardRequest) -> Result<CompleteCardResponse, Error> {
        let CompleteCardRequest { user_id, card_id } = request;
        let card = self
            .ports
            .cards
            .find_by_id(card_id)
            .await
            .map_err(map_card_error)?
            .filter(|card| card.is_owned_by(&user_id))
            .ok_or_else(card_not_found)?;

        let now = self.clock.utc();
        let settings =
            load_or_create_settings(self.ports.settings.as_ref(), &user_id, now).await?;
        let today = settings.local_date(now);

        if card.completed {
            debug!(%user_id, %card_id, "card already completed");
            let streak = self.load_streak(&user_id).await?.unwrap_or_default();
            return Ok(CompleteCardResponse {
                card,
                streak: streak.as_of(today),
            });
        }

        // Streak first: a same-day repeat is a no-op, so a retry after a
        // failed flag write cannot double count, while the reverse order
        // would let a retry skip the streak entirely.
        let streak = self.record_completion(user_id, today, now).await?;
        let card = self
            .ports
            .cards
            .mark_completed(card_id, &user_id)
            .await
            .map_err(map_card_error)?
            .ok_or_else(card_not_found)?;

        record_event(
            self.ports.telemetry.as_ref(),
            TelemetryEvent {
                user_id,
                event_type: TelemetryEventType::ActionCompleted,
                event_data: json!({
                    "cardId": card.id,
                    "mode": card.mode,
                    "action": card.content.action(),
                }),
                created_at: now,
            },
        )
        .await;
        info!(
            %user_id,
            %card_id,
            current_streak = streak.current_streak,
            "card completed"
        );
        Ok(CompleteCardResponse { card, streak })
    }
}

#[async_trait]
impl CardQuery for CardService {
    async fn today(&self, request: TodayRequest) -> Result<TodaySnapshot, Error> {
        let TodayRequest { user_id, mode } = request;
        let now = self.clock.utc();
        let settings = self
            .ports
            .settings
            .find_by_user_id(&user_id)
            .await
            .map_err(map_settings_error)?;
        let today = settings
            .as_ref()
            .map_or_else(|| now.date_naive(), |settings| settings.local_date(now));
        let mode = mode
            .or_else(|| settings.as_ref().map(|settings| settings.mode))
            .unwrap_or_default();

        let card = self
            .ports
            .cards
            .find_for_day(&user_id, today, mode)
            .await
            .map_err(map_card_error)?;
        let quota = self
            .ports
            .quotas
            .find_for_day(&user_id, today)
            .await
            .map_err(map_quota_error)?;
        let streak = self
            .load_streak(&user_id)
            .await?
            .map(|state| state.as_of(today));

        Ok(TodaySnapshot {
            card,
            quota,
            streak,
        })
    }
}

#[cfg(test)]
#[path = "card_service_tests.rs"]
mod tests;
