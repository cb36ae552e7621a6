//! In-memory implementation of every driven persistence port.
//!
//! Mirrors the keys and conflict rules of the PostgreSQL schema so
//! service-level and HTTP-level tests exercise the same semantics without a
//! database.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    CardRepository, CardRepositoryError, ProfileRepository, ProfileRepositoryError,
    QuotaRepository, QuotaRepositoryError, SettingsRepository, SettingsRepositoryError,
    StreakRepository, StreakRepositoryError, TelemetryRepository, TelemetryRepositoryError,
};
use crate::domain::{
    Card, CardDraft, GenerationQuota, MoodMode, Profile, Settings, Streak, TelemetryEvent,
    UserId,
};

#[derive(Default)]
struct Tables {
    profiles: HashSet<UserId>,
    settings: HashMap<UserId, Settings>,
    cards: Vec<Card>,
    quotas: HashMap<(UserId, NaiveDate), GenerationQuota>,
    streaks: HashMap<UserId, Streak>,
    telemetry: Vec<TelemetryEvent>,
}

/// Shared in-memory tables.
///
/// By default writes do not require a profile row. Use
/// [`InMemoryStore::enforcing_profiles`] to reproduce the foreign keys.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    enforce_profiles: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose settings and card writes fail without a profile.
    pub fn enforcing_profiles() -> Self {
        Self {
            enforce_profiles: true,
            ..Self::default()
        }
    }

    pub fn add_profile(&self, user_id: UserId) {
        self.lock().profiles.insert(user_id);
    }

    pub fn has_profile(&self, user_id: &UserId) -> bool {
        self.lock().profiles.contains(user_id)
    }

    pub fn put_settings(&self, settings: Settings) {
        self.lock().settings.insert(settings.user_id, settings);
    }

    pub fn put_quota(&self, quota: GenerationQuota) {
        self.lock().quotas.insert((quota.user_id, quota.date), quota);
    }

    pub fn put_streak(&self, streak: Streak) {
        self.lock().streaks.insert(streak.user_id, streak);
    }

    pub fn quota(&self, user_id: &UserId, date: NaiveDate) -> Option<GenerationQuota> {
        self.lock().quotas.get(&(*user_id, date)).cloned()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.lock().cards.clone()
    }

    pub fn settings_rows(&self) -> usize {
        self.lock().settings.len()
    }

    pub fn telemetry(&self) -> Vec<TelemetryEvent> {
        self.lock().telemetry.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn profile_exists(&self, tables: &Tables, user_id: &UserId) -> bool {
        !self.enforce_profiles || tables.profiles.contains(user_id)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn ensure_profile(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        self.lock().profiles.insert(*profile.id());
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Settings>, SettingsRepositoryError> {
        Ok(self.lock().settings.get(user_id).cloned())
    }

    async fn insert_default_if_absent(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, SettingsRepositoryError> {
        let mut tables = self.lock();
        if !self.profile_exists(&tables, &defaults.user_id) {
            return Err(SettingsRepositoryError::profile_missing(
                defaults.user_id.to_string(),
            ));
        }
        Ok(tables
            .settings
            .entry(defaults.user_id)
            .or_insert_with(|| defaults.clone())
            .clone())
    }

    async fn replace(&self, settings: &Settings) -> Result<Settings, SettingsRepositoryError> {
        let mut tables = self.lock();
        match tables.settings.get_mut(&settings.user_id) {
            Some(row) => {
                *row = settings.clone();
                Ok(settings.clone())
            }
            None => Err(SettingsRepositoryError::query("settings row not found")),
        }
    }
}

#[async_trait]
impl CardRepository for InMemoryStore {
    async fn find_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        mode: MoodMode,
    ) -> Result<Option<Card>, CardRepositoryError> {
        Ok(self
            .lock()
            .cards
            .iter()
            .find(|card| &card.user_id == user_id && card.date == date && card.mode == mode)
            .cloned())
    }

    async fn find_by_id(&self, card_id: Uuid) -> Result<Option<Card>, CardRepositoryError> {
        Ok(self
            .lock()
            .cards
            .iter()
            .find(|card| card.id == card_id)
            .cloned())
    }

    async fn upsert_for_day(&self, draft: &CardDraft) -> Result<Card, CardRepositoryError> {
        let mut tables = self.lock();
        if !self.profile_exists(&tables, &draft.user_id) {
            return Err(CardRepositoryError::profile_missing(draft.user_id.to_string()));
        }
        let existing = tables.cards.iter_mut().find(|card| {
            card.user_id == draft.user_id && card.date == draft.date && card.mode == draft.mode
        });
        if let Some(card) = existing {
            card.content = draft.content.clone();
            card.audience_used = draft.audience_used;
            card.themes = draft.themes.clone();
            card.completed = false;
            return Ok(card.clone());
        }
        let card = Card {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            date: draft.date,
            mode: draft.mode,
            content: draft.content.clone(),
            audience_used: draft.audience_used,
            themes: draft.themes.clone(),
            completed: false,
            created_at: Utc::now(),
        };
        tables.cards.push(card.clone());
        Ok(card)
    }

    async fn mark_completed(
        &self,
        card_id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Card>, CardRepositoryError> {
        let mut tables = self.lock();
        Ok(tables
            .cards
            .iter_mut()
            .find(|card| card.id == card_id && &card.user_id == user_id)
            .map(|card| {
                card.completed = true;
                card.clone()
            }))
    }
}

#[async_trait]
impl QuotaRepository for InMemoryStore {
    async fn find_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<GenerationQuota>, QuotaRepositoryError> {
        Ok(self.quota(user_id, date))
    }

    async fn increment(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        default_max: u32,
    ) -> Result<GenerationQuota, QuotaRepositoryError> {
        let mut tables = self.lock();
        let row = tables
            .quotas
            .entry((*user_id, date))
            .or_insert_with(|| GenerationQuota::unused(*user_id, date, default_max));
        *row = row.clone().record_generation();
        Ok(row.clone())
    }
}

#[async_trait]
impl StreakRepository for InMemoryStore {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Streak>, StreakRepositoryError> {
        Ok(self.lock().streaks.get(user_id).cloned())
    }

    async fn save(&self, streak: &Streak) -> Result<(), StreakRepositoryError> {
        self.lock().streaks.insert(streak.user_id, streak.clone());
        Ok(())
    }
}

#[async_trait]
impl TelemetryRepository for InMemoryStore {
    async fn append(&self, event: &TelemetryEvent) -> Result<(), TelemetryRepositoryError> {
        self.lock().telemetry.push(event.clone());
        Ok(())
    }
}
