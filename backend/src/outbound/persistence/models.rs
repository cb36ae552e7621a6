//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain values at the boundary.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    Card, CardContent, CardContentError, GenerationQuota, Settings, Streak, StreakState, Themes,
    UserId,
};

use super::pg_enums::{PgAudience, PgMoodMode, PgTone};
use super::schema::{cards, generation_quotas, profiles, settings, streaks, telemetry};

/// Counters are stored as `INTEGER` guarded by `CHECK (>= 0)`.
pub(crate) fn counter_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

pub(crate) fn counter_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SettingsRow {
    pub user_id: Uuid,
    pub mode: PgMoodMode,
    pub tone: PgTone,
    pub audience: PgAudience,
    pub delivery_time: NaiveTime,
    pub timezone: String,
    pub themes: Vec<String>,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        let themes = Themes::new(row.themes).unwrap_or_else(|error| {
            warn!(user_id = %row.user_id, %error, "stored themes invalid, using defaults");
            Themes::default()
        });
        Self {
            user_id: UserId::from_uuid(row.user_id),
            mode: row.mode.0,
            tone: row.tone.0,
            audience: row.audience.0,
            delivery_time: row.delivery_time,
            timezone: row.timezone,
            themes,
            language: row.language,
            updated_at: row.updated_at,
        }
    }
}

/// Every settings column; inserted on first access and set on replace.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = settings)]
pub(crate) struct SettingsWrite<'a> {
    pub user_id: Uuid,
    pub mode: PgMoodMode,
    pub tone: PgTone,
    pub audience: PgAudience,
    pub delivery_time: NaiveTime,
    pub timezone: &'a str,
    pub themes: &'a [String],
    pub language: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Settings> for SettingsWrite<'a> {
    fn from(settings: &'a Settings) -> Self {
        Self {
            user_id: *settings.user_id.as_uuid(),
            mode: settings.mode.into(),
            tone: settings.tone.into(),
            audience: settings.audience.into(),
            delivery_time: settings.delivery_time,
            timezone: &settings.timezone,
            themes: settings.themes.as_slice(),
            language: &settings.language,
            updated_at: settings.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CardRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mode: PgMoodMode,
    pub quote_text: String,
    pub quote_author: String,
    pub reflection: String,
    pub action: String,
    pub mantra: String,
    pub audience_used: PgAudience,
    pub themes: Vec<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CardRow> for Card {
    type Error = CardContentError;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let content = CardContent::new(
            &row.quote_text,
            Some(&row.quote_author),
            &row.reflection,
            &row.action,
            &row.mantra,
        )?;
        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            date: row.date,
            mode: row.mode.0,
            content,
            audience_used: row.audience_used.0,
            themes: row.themes,
            completed: row.completed,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub(crate) struct NewCardRow<'a> {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mode: PgMoodMode,
    pub quote_text: &'a str,
    pub quote_author: &'a str,
    pub reflection: &'a str,
    pub action: &'a str,
    pub mantra: &'a str,
    pub audience_used: PgAudience,
    pub themes: &'a [String],
}

/// Columns replaced when a card is regenerated in place.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cards)]
pub(crate) struct CardContentUpdate<'a> {
    pub quote_text: &'a str,
    pub quote_author: &'a str,
    pub reflection: &'a str,
    pub action: &'a str,
    pub mantra: &'a str,
    pub audience_used: PgAudience,
    pub themes: &'a [String],
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = streaks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StreakRow {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_completion_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl From<StreakRow> for Streak {
    fn from(row: StreakRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            state: StreakState {
                current_streak: counter_from_db(row.current_streak),
                longest_streak: counter_from_db(row.longest_streak),
                last_completion_date: row.last_completion_date,
            },
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = streaks)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct StreakWrite {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_completion_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Streak> for StreakWrite {
    fn from(streak: &Streak) -> Self {
        Self {
            user_id: *streak.user_id.as_uuid(),
            current_streak: counter_to_db(streak.state.current_streak),
            longest_streak: counter_to_db(streak.state.longest_streak),
            last_completion_date: streak.state.last_completion_date,
            updated_at: streak.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Generation quotas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = generation_quotas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuotaRow {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub generations_used: i32,
    pub max_generations: i32,
}

impl From<QuotaRow> for GenerationQuota {
    fn from(row: QuotaRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            date: row.date,
            generations_used: counter_from_db(row.generations_used),
            max_generations: counter_from_db(row.max_generations),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = generation_quotas)]
pub(crate) struct NewQuotaRow {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub generations_used: i32,
    pub max_generations: i32,
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = telemetry)]
pub(crate) struct NewTelemetryRow<'a> {
    pub user_id: Uuid,
    pub event_type: &'a str,
    pub event_data: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::{Audience, MoodMode};

    #[rstest]
    #[case::zero(0, 0)]
    #[case::positive(7, 7)]
    #[case::negative(-1, 0)]
    fn counters_never_go_negative(#[case] stored: i32, #[case] expected: u32) {
        assert_eq!(counter_from_db(stored), expected);
    }

    #[rstest]
    fn counters_saturate_when_written() {
        assert_eq!(counter_to_db(u32::MAX), i32::MAX);
    }

    fn card_row(author: &str, mantra: &str) -> CardRow {
        CardRow {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date"),
            mode: PgMoodMode(MoodMode::Warrior),
            quote_text: "Keep going.".to_owned(),
            quote_author: author.to_owned(),
            reflection: "You are further along than you think.".to_owned(),
            action: "Do ten squats.".to_owned(),
            mantra: mantra.to_owned(),
            audience_used: PgAudience(Audience::Man),
            themes: vec!["grit".to_owned()],
            completed: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn card_rows_convert_to_domain() {
        let card = Card::try_from(card_row("", "I persist.")).expect("valid row");

        assert_eq!(card.mode, MoodMode::Warrior);
        assert_eq!(card.audience_used, Audience::Man);
        assert_eq!(card.content.quote().author, "Unknown");
        assert!(card.completed);
    }

    #[rstest]
    fn oversized_stored_content_is_rejected() {
        let result = Card::try_from(card_row("Anon", &"m".repeat(61)));
        assert!(result.is_err());
    }

    #[rstest]
    fn invalid_stored_themes_fall_back_to_defaults() {
        let row = SettingsRow {
            user_id: Uuid::nil(),
            mode: PgMoodMode(MoodMode::Zen),
            tone: PgTone(crate::domain::Tone::Soft),
            audience: PgAudience(Audience::Custom),
            delivery_time: NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
            timezone: "UTC".to_owned(),
            themes: Vec::new(),
            language: "en".to_owned(),
            updated_at: Utc::now(),
        };

        let settings = Settings::from(row);
        assert_eq!(settings.themes, Themes::default());
        assert_eq!(settings.audience, Audience::Custom);
    }
}
