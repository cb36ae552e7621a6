//! Server configuration assembled from [`ServiceSettings`] at startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use tracing::{info, warn};

use moodshift::config::{IdentityMode, ServiceSettings};
use moodshift::domain::ports::{DisabledTextGenerationSource, TextGenerationSource};
use moodshift::inbound::http::session_config::{BuildMode, SessionSettings, session_settings};
use moodshift::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use moodshift::outbound::text_generation::OpenAiChatSource;

/// Content generation wiring shared by every worker.
#[derive(Clone)]
pub(crate) struct GenerationConfig {
    pub(crate) source: Arc<dyn TextGenerationSource>,
    pub(crate) timeout: Duration,
    pub(crate) max_per_day: u32,
}

/// Everything `create_server` needs, resolved and validated.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity_mode: IdentityMode,
    pub(crate) generation: GenerationConfig,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: PrometheusMetrics,
}

fn startup_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(error.to_string())
}

impl ServerConfig {
    /// Validate settings, load the session key, connect and migrate the
    /// database and build the text generation source.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] describing the first failing step.
    pub async fn from_settings(settings: &ServiceSettings) -> std::io::Result<Self> {
        settings.validate().map_err(startup_error)?;
        let session = session_settings(settings, BuildMode::from_debug_assertions())
            .map_err(startup_error)?;
        let timeout = settings.generation_timeout().map_err(startup_error)?;

        Ok(Self {
            session,
            bind_addr: settings.bind_addr().map_err(startup_error)?,
            db_pool: connect_database(settings).await?,
            identity_mode: settings.identity_mode().map_err(startup_error)?,
            generation: GenerationConfig {
                source: text_generation_source(settings, timeout)?,
                timeout,
                max_per_day: settings.max_generations_per_day(),
            },
            #[cfg(feature = "metrics")]
            prometheus: super::metrics::build_metrics()?,
        })
    }
}

async fn connect_database(settings: &ServiceSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.as_deref() else {
        warn!("no database configured; serving from in-process fixtures");
        return Ok(None);
    };
    if settings.run_migrations() {
        run_pending_migrations(url).await.map_err(startup_error)?;
    }
    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .map_err(startup_error)?;
    Ok(Some(pool))
}

fn text_generation_source(
    settings: &ServiceSettings,
    timeout: Duration,
) -> std::io::Result<Arc<dyn TextGenerationSource>> {
    match settings.openai_api_key() {
        Some(api_key) => {
            let source = OpenAiChatSource::new(
                settings.openai_base_url(),
                api_key,
                settings.openai_model(),
                timeout,
            )
            .map_err(startup_error)?;
            info!(model = settings.openai_model(), "text generation enabled");
            Ok(Arc::new(source))
        }
        None => {
            warn!("no text generation key configured; every card uses fallback content");
            Ok(Arc::new(DisabledTextGenerationSource))
        }
    }
}
