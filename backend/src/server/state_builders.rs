//! Builders for HTTP state from configured repositories.
//!
//! With a pool, every driven port is backed by Diesel. Without one the
//! services run over stateless fixtures so the API stays explorable.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use moodshift::config::IdentityMode;
use moodshift::domain::ports::{
    CardRepository, FixtureCardRepository, FixtureProfileRepository, FixtureQuotaRepository,
    FixtureSettingsRepository, FixtureStreakRepository, FixtureTelemetryRepository,
    ProfileRepository, QuotaRepository, SettingsRepository, StreakRepository, TelemetryRepository,
};
use moodshift::domain::{CardGenerator, CardService, CardWorkflowPorts, Profile, SettingsService};
use moodshift::inbound::http::identity::{
    DEMO_USER_EMAIL, DEMO_USER_ID, FixedIdentity, IdentityResolver, SessionIdentity,
};
use moodshift::inbound::http::state::{HttpState, HttpStatePorts};
use moodshift::outbound::persistence::{
    DbPool, DieselCardRepository, DieselProfileRepository, DieselQuotaRepository,
    DieselSettingsRepository, DieselStreakRepository, DieselTelemetryRepository,
};

use super::ServerConfig;
use super::config::GenerationConfig;

/// Repositories whose concrete types the services need.
struct Repositories<S, T> {
    settings: Arc<S>,
    telemetry: Arc<T>,
    cards: Arc<dyn CardRepository>,
    quotas: Arc<dyn QuotaRepository>,
    streaks: Arc<dyn StreakRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<DieselSettingsRepository, DieselTelemetryRepository> {
    Repositories {
        settings: Arc::new(DieselSettingsRepository::new(pool.clone())),
        telemetry: Arc::new(DieselTelemetryRepository::new(pool.clone())),
        cards: Arc::new(DieselCardRepository::new(pool.clone())),
        quotas: Arc::new(DieselQuotaRepository::new(pool.clone())),
        streaks: Arc::new(DieselStreakRepository::new(pool.clone())),
        profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
    }
}

fn fixture_repositories() -> Repositories<FixtureSettingsRepository, FixtureTelemetryRepository> {
    Repositories {
        settings: Arc::new(FixtureSettingsRepository),
        telemetry: Arc::new(FixtureTelemetryRepository),
        cards: Arc::new(FixtureCardRepository),
        quotas: Arc::new(FixtureQuotaRepository),
        streaks: Arc::new(FixtureStreakRepository),
        profiles: Arc::new(FixtureProfileRepository),
    }
}

fn build_ports<S, T>(
    repos: &Repositories<S, T>,
    generation: &GenerationConfig,
    clock: &Arc<dyn Clock>,
) -> HttpStatePorts
where
    S: SettingsRepository + 'static,
    T: TelemetryRepository + 'static,
{
    let workflow = CardWorkflowPorts {
        settings: repos.settings.clone(),
        cards: repos.cards.clone(),
        quotas: repos.quotas.clone(),
        streaks: repos.streaks.clone(),
        telemetry: repos.telemetry.clone(),
    };
    let generator = CardGenerator::new(generation.source.clone(), generation.timeout);
    let cards = Arc::new(
        CardService::new(workflow, generator, clock.clone())
            .with_max_generations(generation.max_per_day),
    );
    let settings = Arc::new(SettingsService::new(
        repos.settings.clone(),
        repos.telemetry.clone(),
        clock.clone(),
    ));

    HttpStatePorts {
        cards: cards.clone(),
        cards_query: cards,
        settings: settings.clone(),
        settings_query: settings,
    }
}

/// Ensure the demo profile exists so demo-mode writes satisfy foreign keys.
async fn ensure_demo_profile(profiles: &dyn ProfileRepository) -> std::io::Result<()> {
    let profile = Profile::new(DEMO_USER_ID, DEMO_USER_EMAIL)
        .map_err(|error| std::io::Error::other(error.to_string()))?;
    profiles
        .ensure_profile(&profile)
        .await
        .map_err(|error| std::io::Error::other(format!("demo profile setup failed: {error}")))?;
    info!(user_id = %DEMO_USER_ID, "demo profile ready");
    Ok(())
}

fn identity_resolver(mode: IdentityMode) -> Arc<dyn IdentityResolver> {
    match mode {
        IdentityMode::Session => Arc::new(SessionIdentity),
        IdentityMode::Demo => Arc::new(FixedIdentity::demo()),
    }
}

async fn finish<S, T>(
    repos: Repositories<S, T>,
    config: &ServerConfig,
    clock: &Arc<dyn Clock>,
) -> std::io::Result<HttpState>
where
    S: SettingsRepository + 'static,
    T: TelemetryRepository + 'static,
{
    if config.identity_mode == IdentityMode::Demo {
        ensure_demo_profile(repos.profiles.as_ref()).await?;
    }
    let ports = build_ports(&repos, &config.generation, clock);
    Ok(HttpState::new(ports, identity_resolver(config.identity_mode)))
}

/// Build handler state from the server configuration.
///
/// # Errors
///
/// Returns an error when the demo profile cannot be created.
pub(crate) async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => finish(diesel_repositories(pool), config, &clock).await,
        None => finish(fixture_repositories(), config, &clock).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodshift::test_support::{InMemoryStore, MutableClock};
    use rstest::rstest;

    #[tokio::test]
    async fn demo_profile_is_created_once() {
        let store = InMemoryStore::enforcing_profiles();

        ensure_demo_profile(&store).await.expect("first insert");
        ensure_demo_profile(&store).await.expect("second insert is a no-op");

        assert!(store.has_profile(&DEMO_USER_ID));
    }

    #[rstest]
    fn fixture_ports_build_without_a_database() {
        let repos = fixture_repositories();
        let generation = GenerationConfig {
            source: Arc::new(moodshift::domain::ports::DisabledTextGenerationSource),
            timeout: std::time::Duration::from_secs(1),
            max_per_day: 2,
        };
        let clock: Arc<dyn Clock> = Arc::new(MutableClock::new(chrono::Utc::now()));

        let ports = build_ports(&repos, &generation, &clock);
        let state = HttpState::new(ports, identity_resolver(IdentityMode::Demo));
        let _ = state.cards_query;
    }
}
