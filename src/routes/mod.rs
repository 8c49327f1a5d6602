//! HTTP routes

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{SessionContext, SESSION_COOKIE};
use crate::error::AppError;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Body of `POST /chat`. Anything unreadable counts as an empty message.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

impl ChatRequest {
    fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unreadable chat body, using empty message");
            Self::default()
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat(
    State(state): State<AppState>,
    session: SessionContext,
    body: Bytes,
) -> Result<(CookieJar, Json<ChatReply>), AppError> {
    let request = ChatRequest::from_body(&body);
    if session.is_new {
        tracing::info!(session = %session.id, "new chat session");
    }

    let reply = match state.chat_engine.reply(&session, &request.message).await {
        Ok(reply) => reply,
        Err(e) => {
            // the error response carries no cookie, so a fresh session is unreachable
            if session.is_new {
                state.sessions.remove(session.id).await;
            }
            return Err(e.into());
        }
    };

    let jar = CookieJar::new().add(session.cookie());
    Ok((jar, Json(ChatReply { reply })))
}

async fn clear(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        if state.sessions.remove(id).await {
            tracing::debug!(session = %id, "cleared session");
        }
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/chat", post(chat).delete(clear))
}
