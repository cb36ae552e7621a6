//! MoodShift HTTP service entry point.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use moodshift::config::ServiceSettings;
use moodshift::inbound::http::health::HealthState;

use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|error| std::io::Error::other(format!("configuration error: {error}")))?;
    let config = ServerConfig::from_settings(&settings).await?;
    let bind_addr = config.bind_addr;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    info!(%bind_addr, "moodshift listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
