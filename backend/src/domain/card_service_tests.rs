//! Orchestrator coverage against the in-memory gateway.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::generation::fallback_content;
use crate::domain::ports::{
    MockTelemetryRepository, MockTextGenerationSource, TelemetryRepositoryError,
    TextGenerationError, TextGenerationSource,
};
use crate::domain::{ErrorCode, MoodMode};
use crate::test_support::{InMemoryStore, MutableClock, ScriptedTextSource};

fn noon(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, day, 12, 0, 0)
        .single()
        .expect("valid instant")
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).expect("valid date")
}

fn completion(quote: &str) -> Result<String, TextGenerationError> {
    Ok(json!({
        "quote": { "text": quote, "author": "Anon" },
        "reflection": "Pause and notice.",
        "action": "Stretch your arms overhead.",
        "mantra": "I begin again."
    })
    .to_string())
}

struct Harness {
    store: Arc<InMemoryStore>,
    clock: Arc<MutableClock>,
    service: CardService,
}

impl Harness {
    fn with_source(source: Arc<dyn TextGenerationSource>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::assemble(store, source, Arc::new(DiscardTelemetry))
    }

    fn assemble(
        store: Arc<InMemoryStore>,
        source: Arc<dyn TextGenerationSource>,
        telemetry: Arc<dyn TelemetryRepository>,
    ) -> Self {
        let clock = Arc::new(MutableClock::new(noon(10)));
        let ports = CardWorkflowPorts {
            settings: store.clone(),
            cards: store.clone(),
            quotas: store.clone(),
            streaks: store.clone(),
            telemetry,
        };
        let generator = CardGenerator::new(source, Duration::from_secs(5));
        let service = CardService::new(ports, generator, clock.clone());
        Self {
            store,
            clock,
            service,
        }
    }

    fn with_store_telemetry(source: Arc<dyn TextGenerationSource>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::assemble(store.clone(), source, store)
    }

    async fn generate(
        &self,
        user_id: UserId,
        mode: MoodMode,
        regenerate: bool,
    ) -> Result<GenerateCardOutcome, Error> {
        self.service
            .generate(GenerateCardRequest {
                user_id,
                mode: Some(mode),
                regenerate,
            })
            .await
    }

    async fn complete(
        &self,
        user_id: UserId,
        card_id: uuid::Uuid,
    ) -> Result<CompleteCardResponse, Error> {
        self.service
            .complete(CompleteCardRequest { user_id, card_id })
            .await
    }
}

/// Telemetry sink that drops every event.
struct DiscardTelemetry;

#[async_trait]
impl TelemetryRepository for DiscardTelemetry {
    async fn append(&self, _event: &TelemetryEvent) -> Result<(), TelemetryRepositoryError> {
        Ok(())
    }
}

fn generated(outcome: GenerateCardOutcome) -> (Card, GenerationQuota) {
    match outcome {
        GenerateCardOutcome::Generated { card, quota } => (card, quota),
        GenerateCardOutcome::Existing { .. } => panic!("expected a generated card"),
    }
}

#[fixture]
fn user_id() -> UserId {
    UserId::random()
}

#[rstest]
#[tokio::test]
async fn first_generation_creates_card_defaults_and_quota(user_id: UserId) {
    let harness = Harness::with_store_telemetry(Arc::new(ScriptedTextSource::new([completion(
        "Start where you are.",
    )])));

    let (card, quota) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation succeeds"),
    );

    assert_eq!(card.content.quote().text, "Start where you are.");
    assert_eq!(card.date, date(10));
    assert_eq!(card.themes, vec!["focus".to_owned(), "creativity".to_owned()]);
    assert!(!card.completed);
    assert_eq!(quota.generations_used, 1);
    assert_eq!(quota.max_generations, DEFAULT_MAX_GENERATIONS);
    assert_eq!(harness.store.settings_rows(), 1);
    let events = harness.store.telemetry();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, TelemetryEventType::CardGenerated);
}

#[rstest]
#[tokio::test]
async fn second_request_without_regenerate_returns_existing_card(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::new([completion("One.")])));
    let (first, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("first generation"),
    );

    let outcome = harness
        .generate(user_id, MoodMode::Zen, false)
        .await
        .expect("second request");

    assert_eq!(outcome, GenerateCardOutcome::Existing { card: first });
    let quota = harness.store.quota(&user_id, date(10)).expect("quota row");
    assert_eq!(quota.generations_used, 1);
}

#[rstest]
#[tokio::test]
async fn regeneration_replaces_content_in_place(user_id: UserId) {
    let harness = Harness::with_store_telemetry(Arc::new(ScriptedTextSource::new([
        completion("First."),
        completion("Second."),
    ])));
    let (first, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("first generation"),
    );
    harness
        .complete(user_id, first.id)
        .await
        .expect("completion succeeds");

    let (second, quota) = generated(
        harness
            .generate(user_id, MoodMode::Zen, true)
            .await
            .expect("regeneration"),
    );

    assert_eq!(second.id, first.id);
    assert_eq!(second.content.quote().text, "Second.");
    assert!(!second.completed, "regeneration resets completion");
    assert_eq!(quota.generations_used, 2);
    assert_eq!(harness.store.cards().len(), 1);
    let last = harness.store.telemetry().pop().expect("telemetry recorded");
    assert_eq!(last.event_type, TelemetryEventType::CardRegenerated);
}

#[rstest]
#[tokio::test]
async fn third_generation_is_rejected_without_touching_card_or_quota(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::new([
        completion("First."),
        completion("Second."),
        completion("Third."),
    ])));
    harness
        .generate(user_id, MoodMode::Zen, false)
        .await
        .expect("first generation");
    let (second, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, true)
            .await
            .expect("second generation"),
    );

    let error = harness
        .generate(user_id, MoodMode::Zen, true)
        .await
        .expect_err("quota exhausted");

    assert_eq!(error.code(), ErrorCode::QuotaExceeded);
    assert_eq!(
        error.details(),
        Some(&json!({ "generationsUsed": 2, "maxGenerations": 2 }))
    );
    let quota = harness.store.quota(&user_id, date(10)).expect("quota row");
    assert_eq!(quota.generations_used, 2);
    assert_eq!(harness.store.cards(), vec![second]);
}

#[rstest]
#[tokio::test]
async fn exhausted_quota_never_calls_the_generator(user_id: UserId) {
    let mut source = MockTextGenerationSource::new();
    source.expect_complete().never();
    let harness = Harness::with_source(Arc::new(source));
    harness.store.put_quota(GenerationQuota {
        generations_used: 2,
        ..GenerationQuota::unused(user_id, date(10), 2)
    });

    let error = harness
        .generate(user_id, MoodMode::Warrior, false)
        .await
        .expect_err("quota exhausted");

    assert_eq!(error.code(), ErrorCode::QuotaExceeded);
    assert!(harness.store.cards().is_empty());
}

#[rstest]
#[tokio::test]
async fn modes_are_keyed_independently(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::new([
        completion("Calm."),
        completion("Bold."),
    ])));

    harness
        .generate(user_id, MoodMode::Zen, false)
        .await
        .expect("zen card");
    let (warrior, quota) = generated(
        harness
            .generate(user_id, MoodMode::Warrior, false)
            .await
            .expect("warrior card"),
    );

    assert_eq!(warrior.mode, MoodMode::Warrior);
    assert_eq!(quota.generations_used, 2);
    assert_eq!(harness.store.cards().len(), 2);
}

#[rstest]
#[tokio::test]
async fn generator_failure_persists_the_fallback(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::new([Err(
        TextGenerationError::timeout("deadline elapsed"),
    )])));

    let (card, _) = generated(
        harness
            .generate(user_id, MoodMode::Warrior, false)
            .await
            .expect("generation absorbs failures"),
    );

    assert_eq!(card.content, fallback_content(MoodMode::Warrior));
}

#[rstest]
#[tokio::test]
async fn omitted_mode_uses_stored_settings_mode(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::default()));
    let mut settings = Settings::defaults(user_id, noon(1));
    settings.mode = MoodMode::Warrior;
    harness.store.put_settings(settings);

    let (card, _) = generated(
        harness
            .service
            .generate(GenerateCardRequest {
                user_id,
                mode: None,
                regenerate: false,
            })
            .await
            .expect("generation"),
    );

    assert_eq!(card.mode, MoodMode::Warrior);
}

#[rstest]
#[tokio::test]
async fn missing_profile_maps_to_not_found(user_id: UserId) {
    let store = Arc::new(InMemoryStore::enforcing_profiles());
    let harness = Harness::assemble(
        store,
        Arc::new(ScriptedTextSource::default()),
        Arc::new(DiscardTelemetry),
    );

    let error = harness
        .generate(user_id, MoodMode::Zen, false)
        .await
        .expect_err("no profile");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn completion_marks_card_and_starts_streak(user_id: UserId) {
    let harness = Harness::with_store_telemetry(Arc::new(ScriptedTextSource::default()));
    let (card, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation"),
    );

    let response = harness
        .complete(user_id, card.id)
        .await
        .expect("completion succeeds");

    assert!(response.card.completed);
    assert_eq!(response.streak.current_streak, 1);
    assert_eq!(response.streak.last_completion_date, Some(date(10)));
    let last = harness.store.telemetry().pop().expect("telemetry recorded");
    assert_eq!(last.event_type, TelemetryEventType::ActionCompleted);
    assert_eq!(last.event_data["action"], card.content.action());
}

#[rstest]
#[tokio::test]
async fn completing_twice_is_a_no_op(user_id: UserId) {
    let harness = Harness::with_store_telemetry(Arc::new(ScriptedTextSource::default()));
    let (card, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation"),
    );
    let first = harness.complete(user_id, card.id).await.expect("first");
    let events_after_first = harness.store.telemetry().len();

    let second = harness.complete(user_id, card.id).await.expect("second");

    assert_eq!(second, first);
    assert_eq!(harness.store.telemetry().len(), events_after_first);
}

#[rstest]
#[tokio::test]
async fn consecutive_days_extend_the_streak(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::default()));
    let mut last = None;
    for _ in 0..3 {
        let (card, _) = generated(
            harness
                .generate(user_id, MoodMode::Zen, false)
                .await
                .expect("generation"),
        );
        last = Some(harness.complete(user_id, card.id).await.expect("completion"));
        harness.clock.advance_days(1);
    }

    let streak = last.expect("three completions").streak;
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.longest_streak, 3);
}

#[rstest]
#[tokio::test]
async fn skipped_day_resets_the_streak(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::default()));
    harness.store.put_streak(Streak {
        user_id,
        state: StreakState {
            current_streak: 5,
            longest_streak: 5,
            last_completion_date: Some(date(8)),
        },
        updated_at: noon(8),
    });
    let (card, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation"),
    );

    let response = harness.complete(user_id, card.id).await.expect("completion");

    assert_eq!(response.streak.current_streak, 1);
    assert_eq!(response.streak.longest_streak, 5);
}

#[rstest]
#[tokio::test]
async fn completing_someone_elses_card_is_not_found(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::default()));
    let (card, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation"),
    );

    let error = harness
        .complete(UserId::random(), card.id)
        .await
        .expect_err("not owned");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Card not found");
}

#[rstest]
#[tokio::test]
async fn telemetry_failures_do_not_fail_requests(user_id: UserId) {
    let mut telemetry = MockTelemetryRepository::new();
    telemetry
        .expect_append()
        .times(2)
        .returning(|_| Err(TelemetryRepositoryError::connection("offline")));
    let harness = Harness::assemble(
        Arc::new(InMemoryStore::new()),
        Arc::new(ScriptedTextSource::default()),
        Arc::new(telemetry),
    );

    let (card, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation"),
    );
    harness
        .complete(user_id, card.id)
        .await
        .expect("completion");
}

#[rstest]
#[tokio::test]
async fn today_is_empty_before_any_activity(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::default()));

    let snapshot = harness
        .service
        .today(TodayRequest {
            user_id,
            mode: None,
        })
        .await
        .expect("today succeeds");

    assert_eq!(snapshot, TodaySnapshot::default());
    assert_eq!(harness.store.settings_rows(), 0, "reads never create rows");
}

#[rstest]
#[tokio::test]
async fn today_combines_card_quota_and_effective_streak(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::default()));
    let (card, _) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation"),
    );
    harness.complete(user_id, card.id).await.expect("completion");

    harness.clock.set(noon(13));
    let later = harness
        .service
        .today(TodayRequest {
            user_id,
            mode: Some(MoodMode::Zen),
        })
        .await
        .expect("today succeeds");

    assert!(later.card.is_none(), "a new day has no card yet");
    assert!(later.quota.is_none());
    let streak = later.streak.expect("streak row exists");
    assert_eq!(streak.current_streak, 0, "lapsed streak reads as zero");
    assert_eq!(streak.longest_streak, 1);
}

#[rstest]
#[tokio::test]
async fn generation_uses_the_users_timezone_for_today(user_id: UserId) {
    let harness = Harness::with_source(Arc::new(ScriptedTextSource::default()));
    let mut settings = Settings::defaults(user_id, noon(1));
    settings.timezone = "Pacific/Kiritimati".to_owned();
    harness.store.put_settings(settings);
    harness.clock.set(
        Utc.with_ymd_and_hms(2026, 6, 10, 23, 0, 0)
            .single()
            .expect("valid instant"),
    );

    let (card, quota) = generated(
        harness
            .generate(user_id, MoodMode::Zen, false)
            .await
            .expect("generation"),
    );

    assert_eq!(card.date, date(11));
    assert_eq!(quota.date, date(11));
}

/// Streak store whose first save fails with a connection error.
struct StreakSaveFailsOnce {
    inner: Arc<InMemoryStore>,
    failed: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl StreakRepository for StreakSaveFailsOnce {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Streak>, StreakRepositoryError> {
        StreakRepository::find_by_user_id(self.inner.as_ref(), user_id).await
    }

    async fn save(&self, streak: &Streak) -> Result<(), StreakRepositoryError> {
        if !self.failed.swap(true, std::sync::atomic::Ordering::SeqCst) {
            return Err(StreakRepositoryError::connection("connection reset"));
        }
        StreakRepository::save(self.inner.as_ref(), streak).await
    }
}

#[rstest]
#[tokio::test]
async fn retrying_after_a_failed_streak_write_still_counts_the_day(user_id: UserId) {
    let store = Arc::new(InMemoryStore::new());
    let streaks = Arc::new(StreakSaveFailsOnce {
        inner: store.clone(),
        failed: std::sync::atomic::AtomicBool::new(false),
    });
    let ports = CardWorkflowPorts {
        settings: store.clone(),
        cards: store.clone(),
        quotas: store.clone(),
        streaks: streaks.clone(),
        telemetry: Arc::new(DiscardTelemetry),
    };
    let service = CardService::new(
        ports,
        CardGenerator::new(Arc::new(ScriptedTextSource::default()), Duration::from_secs(5)),
        Arc::new(MutableClock::new(noon(10))),
    );
    let (card, _) = generated(
        service
            .generate(GenerateCardRequest {
                user_id,
                mode: Some(MoodMode::Zen),
                regenerate: false,
            })
            .await
            .expect("generation"),
    );

    let first = service
        .complete(CompleteCardRequest { user_id, card_id: card.id })
        .await
        .expect_err("streak write fails");
    assert_eq!(first.code(), ErrorCode::ServiceUnavailable);
    assert!(
        store.cards().iter().all(|stored| !stored.completed),
        "card must stay open until the streak is saved"
    );

    let retried = service
        .complete(CompleteCardRequest { user_id, card_id: card.id })
        .await
        .expect("retry succeeds");

    assert!(retried.card.completed);
    assert_eq!(retried.streak.current_streak, 1);
    let stored = StreakRepository::find_by_user_id(store.as_ref(), &user_id)
        .await
        .expect("streak read")
        .expect("streak saved");
    assert_eq!(stored.state.last_completion_date, Some(date(10)));
}
