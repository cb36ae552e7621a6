//! Handler tests for the card endpoints, driven through mocked ports.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::generation::fallback_content;
use crate::domain::ports::{MockCardCommand, MockCardQuery, TodaySnapshot};
use crate::domain::{Audience, Card, GenerationQuota, StreakState};
use crate::inbound::http::identity::{DEMO_USER_ID, FixedIdentity, SessionIdentity};
use crate::inbound::http::state::HttpStatePorts;
use crate::test_support::test_session_middleware;

#[fixture]
fn card() -> Card {
    Card {
        id: Uuid::from_u128(7),
        user_id: DEMO_USER_ID,
        date: NaiveDate::from_ymd_opt(2026, 6, 10).expect("valid date"),
        mode: MoodMode::Zen,
        content: fallback_content(MoodMode::Zen),
        audience_used: Audience::PreferNotToSay,
        themes: vec!["focus".to_owned()],
        completed: false,
        created_at: Utc
            .with_ymd_and_hms(2026, 6, 10, 8, 0, 0)
            .single()
            .expect("valid instant"),
    }
}

fn quota(used: u32) -> GenerationQuota {
    GenerationQuota {
        generations_used: used,
        ..GenerationQuota::unused(
            DEMO_USER_ID,
            NaiveDate::from_ymd_opt(2026, 6, 10).expect("valid date"),
            2,
        )
    }
}

fn state_with(cards: MockCardCommand, query: MockCardQuery) -> HttpState {
    HttpState::new(
        HttpStatePorts {
            cards: Arc::new(cards),
            cards_query: Arc::new(query),
            ..HttpStatePorts::default()
        },
        Arc::new(FixedIdentity::demo()),
    )
}

async fn call(state: HttpState, request: actix_test::TestRequest) -> ServiceResponse {
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .service(
                web::scope("/api/v1")
                    .service(generate_card)
                    .service(complete_card)
                    .service(today_card),
            ),
    )
    .await;
    actix_test::call_service(&app, request.to_request()).await
}

async fn json_body(response: ServiceResponse) -> Value {
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}

#[rstest]
#[actix_web::test]
async fn generate_returns_card_and_quota(card: Card) {
    let mut cards = MockCardCommand::new();
    let generated = card.clone();
    cards
        .expect_generate()
        .withf(|request| {
            request.user_id == DEMO_USER_ID
                && request.mode == Some(MoodMode::Warrior)
                && !request.regenerate
        })
        .times(1)
        .returning(move |_| {
            Ok(GenerateCardOutcome::Generated {
                card: generated.clone(),
                quota: quota(1),
            })
        });

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/v1/cards/generate")
            .set_json(json!({ "mode": "warrior" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["card"]["quote"]["text"], "Peace begins with a smile.");
    assert_eq!(body["card"]["audienceUsed"], "prefer_not_to_say");
    assert_eq!(body["card"]["date"], "2026-06-10");
    assert_eq!(body["quota"]["generationsUsed"], 1);
    assert_eq!(body["quota"]["remaining"], 1);
}

#[rstest]
#[actix_web::test]
async fn generate_without_body_uses_defaults(card: Card) {
    let mut cards = MockCardCommand::new();
    cards
        .expect_generate()
        .withf(|request| request.mode.is_none() && !request.regenerate)
        .times(1)
        .returning(move |_| {
            Ok(GenerateCardOutcome::Generated {
                card: card.clone(),
                quota: quota(1),
            })
        });

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post().uri("/api/v1/cards/generate"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn existing_card_is_a_conflict_carrying_the_card(card: Card) {
    let mut cards = MockCardCommand::new();
    let existing = card.clone();
    cards
        .expect_generate()
        .returning(move |_| Ok(GenerateCardOutcome::Existing { card: existing.clone() }));

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/v1/cards/generate")
            .set_json(json!({ "mode": "zen", "regenerate": false })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Card already generated for today");
    assert_eq!(body["card"]["id"], card.id.to_string());
}

#[rstest]
#[actix_web::test]
async fn invalid_mode_is_rejected_before_the_service() {
    let mut cards = MockCardCommand::new();
    cards.expect_generate().never();

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/v1/cards/generate")
            .set_json(json!({ "mode": "sleepy" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid mode");
    assert_eq!(body["details"]["field"], "mode");
}

#[rstest]
#[actix_web::test]
async fn exhausted_quota_maps_to_too_many_requests() {
    let mut cards = MockCardCommand::new();
    cards.expect_generate().returning(|_| {
        Err(Error::quota_exceeded("Daily generation limit reached")
            .with_details(json!({ "generationsUsed": 2, "maxGenerations": 2 })))
    });

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/v1/cards/generate")
            .set_json(json!({ "regenerate": true })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = json_body(response).await;
    assert_eq!(body["code"], "quota_exceeded");
    assert_eq!(body["details"]["maxGenerations"], 2);
}

#[rstest]
#[actix_web::test]
async fn complete_returns_card_and_streak(card: Card) {
    let mut cards = MockCardCommand::new();
    let card_id = card.id;
    cards
        .expect_complete()
        .withf(move |request| request.card_id == card_id && request.user_id == DEMO_USER_ID)
        .returning(move |_| {
            Ok(crate::domain::ports::CompleteCardResponse {
                card: Card {
                    completed: true,
                    ..card.clone()
                },
                streak: StreakState {
                    current_streak: 3,
                    longest_streak: 5,
                    last_completion_date: NaiveDate::from_ymd_opt(2026, 6, 10),
                },
            })
        });

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post().uri(&format!("/api/v1/cards/{card_id}/complete")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["card"]["completed"], true);
    assert_eq!(body["streak"]["currentStreak"], 3);
    assert_eq!(body["streak"]["longestStreak"], 5);
    assert_eq!(body["streak"]["lastCompletionDate"], "2026-06-10");
}

#[rstest]
#[case::malformed("not-a-uuid", StatusCode::BAD_REQUEST)]
#[case::missing("00000000-0000-0000-0000-000000000009", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn complete_rejects_unknown_cards(#[case] card_id: &str, #[case] status: StatusCode) {
    let mut cards = MockCardCommand::new();
    cards
        .expect_complete()
        .returning(|_| Err(Error::not_found("Card not found")));

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post().uri(&format!("/api/v1/cards/{card_id}/complete")),
    )
    .await;

    assert_eq!(response.status(), status);
}

#[rstest]
#[actix_web::test]
async fn today_renders_nulls_before_any_activity() {
    let mut query = MockCardQuery::new();
    query
        .expect_today()
        .withf(|request| request.mode.is_none())
        .returning(|_| Ok(TodaySnapshot::default()));

    let response = call(
        state_with(MockCardCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/v1/cards/today"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "card": null, "quota": null, "streak": null }));
}

#[rstest]
#[actix_web::test]
async fn today_forwards_the_requested_mode() {
    let mut query = MockCardQuery::new();
    query
        .expect_today()
        .withf(|request| request.mode == Some(MoodMode::Warrior))
        .times(1)
        .returning(|_| Ok(TodaySnapshot::default()));

    let response = call(
        state_with(MockCardCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/v1/cards/today?mode=warrior"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn session_identity_without_login_is_unauthorised() {
    let mut cards = MockCardCommand::new();
    cards.expect_generate().never();
    let state = HttpState::new(
        HttpStatePorts {
            cards: Arc::new(cards),
            ..HttpStatePorts::default()
        },
        Arc::new(SessionIdentity),
    );

    let response = call(
        state,
        actix_test::TestRequest::post().uri("/api/v1/cards/generate"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::empty(b"".as_slice())]
#[case::whitespace(b" \n".as_slice())]
fn generate_body_defaults_to_no_regeneration(#[case] raw: &[u8]) {
    let parsed = parse_generate_body(raw).expect("empty body is valid");

    assert_eq!(parsed.mode, None);
    assert!(!parsed.regenerate);
}

#[rstest]
#[case::wrong_flag_type(json!({ "mode": "warrior", "regenerate": "yes" }))]
#[case::unknown_mode(json!({ "mode": "lava", "regenerate": true }))]
#[case::numeric_mode(json!({ "mode": 1 }))]
#[actix_web::test]
async fn malformed_generate_bodies_are_rejected_before_generation(#[case] body: Value) {
    let mut cards = MockCardCommand::new();
    cards.expect_generate().never();

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/v1/cards/generate")
            .set_json(body),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn non_json_generate_bodies_are_rejected() {
    let mut cards = MockCardCommand::new();
    cards.expect_generate().never();

    let response = call(
        state_with(cards, MockCardQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/v1/cards/generate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
