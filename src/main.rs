//! Parley - voice chat relay
//!
//! Serves a single page that listens through the browser's speech
//! recognition, relays what was said to an OpenAI-compatible completion API
//! and reads the reply aloud. Conversation history lives server-side, one per
//! browser session.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod conversation;
mod core;
mod error;
mod providers;
mod routes;

use config::Config;
use crate::core::{ChatEngine, SessionStore};
use providers::{OpenAICompatConfig, OpenAICompatProvider};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat_engine: Arc<ChatEngine>,
    pub sessions: SessionStore,
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set, requests go out unauthenticated");
    }

    let provider = OpenAICompatProvider::new(OpenAICompatConfig::from(&config))?;
    tracing::info!(
        base_url = %config.openai_base_url,
        model = provider.model(),
        max_turns = config.max_turns,
        "completion provider ready"
    );

    let chat_engine = Arc::new(
        ChatEngine::new(Arc::new(provider), config.system_prompt.clone())
            .with_max_turns(config.max_turns),
    );

    let ttl = (config.session_ttl_secs > 0).then(|| Duration::from_secs(config.session_ttl_secs));
    let sessions = SessionStore::new(ttl);
    let _sweeper = sessions.spawn_sweeper(SWEEP_INTERVAL);

    let state = AppState {
        chat_engine,
        sessions,
    };

    let app = Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("🎙️ Parley running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
