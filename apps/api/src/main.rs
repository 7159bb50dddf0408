mod auth;
mod config;
mod errors;
mod extract;
mod mailer;
mod media_client;
mod models;
mod routes;
mod state;
mod studio;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::codes::{CodeStore, MemoryCodeStore, RedisCodeStore};
use crate::config::Config;
use crate::mailer::{LogMailer, Mailer, ResendMailer};
use crate::media_client::OpenAiVideoClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Studio API v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.app_env
    );

    let codes = build_code_store(&config).await?;
    let mailer = build_mailer(&config)?;

    let video = OpenAiVideoClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
    )?;
    info!("Video client initialized (model: {})", media_client::MODEL);

    if config.expose_dev_codes {
        warn!("Verification codes are echoed in responses (EXPOSE_DEV_CODES)");
    }

    let state = AppState {
        config: config.clone(),
        codes,
        mailer,
        video: Arc::new(video),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when configured, otherwise process memory.
async fn build_code_store(config: &Config) -> Result<Arc<dyn CodeStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisCodeStore::connect(url)
                .await
                .context("Failed to connect to Redis for verification codes")?;
            info!("Verification codes stored in Redis");
            Ok(Arc::new(store))
        }
        None => {
            info!("Verification codes stored in memory; they are lost on restart");
            Ok(Arc::new(MemoryCodeStore::new()))
        }
    }
}

fn build_mailer(config: &Config) -> Result<Arc<dyn Mailer>> {
    match &config.resend_api_key {
        Some(key) => {
            info!("Email delivery via Resend (from: {})", config.email_from);
            Ok(Arc::new(ResendMailer::new(
                key.clone(),
                config.email_from.clone(),
                config.resend_base_url.clone(),
            )?))
        }
        None => {
            warn!("RESEND_API_KEY not set; verification emails are only logged");
            Ok(Arc::new(LogMailer))
        }
    }
}
