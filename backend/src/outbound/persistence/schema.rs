//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; `diesel print-schema`
//! regenerates them from a live database.

pub mod sql_types {
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "mood_mode"))]
    pub struct MoodMode;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "tone_type"))]
    pub struct ToneType;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "audience_type"))]
    pub struct AudienceType;
}

diesel::table! {
    /// One row per user; written by the auth service or the demo bootstrap.
    profiles (id) {
        id -> Uuid,
        email -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{AudienceType, MoodMode, ToneType};

    /// Generation settings; unique per `user_id`.
    settings (id) {
        id -> Uuid,
        user_id -> Uuid,
        mode -> MoodMode,
        tone -> ToneType,
        audience -> AudienceType,
        delivery_time -> Time,
        timezone -> Text,
        themes -> Array<Text>,
        language -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{AudienceType, MoodMode};

    /// Daily cards; unique per `(user_id, date, mode)`.
    cards (id) {
        id -> Uuid,
        user_id -> Uuid,
        date -> Date,
        mode -> MoodMode,
        quote_text -> Text,
        quote_author -> Text,
        reflection -> Text,
        action -> Text,
        mantra -> Text,
        audience_used -> AudienceType,
        themes -> Array<Text>,
        completed -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Completion streak; unique per `user_id`.
    streaks (id) {
        id -> Uuid,
        user_id -> Uuid,
        current_streak -> Int4,
        longest_streak -> Int4,
        last_completion_date -> Nullable<Date>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Daily generation counters; unique per `(user_id, date)`.
    generation_quotas (id) {
        id -> Uuid,
        user_id -> Uuid,
        date -> Date,
        generations_used -> Int4,
        max_generations -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only analytics events.
    telemetry (id) {
        id -> Uuid,
        user_id -> Uuid,
        event_type -> Text,
        event_data -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(settings -> profiles (user_id));
diesel::joinable!(cards -> profiles (user_id));
diesel::joinable!(streaks -> profiles (user_id));
diesel::joinable!(generation_quotas -> profiles (user_id));
diesel::joinable!(telemetry -> profiles (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    profiles,
    settings,
    cards,
    streaks,
    generation_quotas,
    telemetry,
);
