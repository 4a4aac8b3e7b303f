//! HTTP server
//!
//! Exposes family chat sessions via REST:
//! - GET    /api/status                   - Health check + resolved model
//! - GET    /api/personas                 - Selectable personas
//! - POST   /api/sessions                 - Create a session bound to a persona
//! - GET    /api/sessions/{id}            - Session state + transcript
//! - PUT    /api/sessions/{id}/persona    - Switch persona (clears transcript)
//! - POST   /api/sessions/{id}/messages   - Send a message, get the reply
//! - DELETE /api/sessions/{id}            - Close a session

mod error;
mod store;

pub use error::{ApiError, ApiResult};
pub use store::{SessionStore, SharedSession};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::persona::{PersonaCatalog, PersonaKey};
use crate::provider::{ChatGateway, ModelHandle};
use crate::resolver::ModelResolver;
use crate::session::{ConversationSession, Message, SessionState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PersonaRequest {
    pub persona: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PersonaView {
    pub key: PersonaKey,
    pub label: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub persona: Option<PersonaKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ReplyView {
    pub reply: Message,
    pub transcript_len: usize,
}

// ============================================================================
// Server State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub resolver: Arc<ModelResolver>,
    pub catalog: Arc<PersonaCatalog>,
    pub gateway: Arc<dyn ChatGateway>,
}

impl AppState {
    pub fn new(
        resolver: Arc<ModelResolver>,
        catalog: Arc<PersonaCatalog>,
        gateway: Arc<dyn ChatGateway>,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            resolver,
            catalog,
            gateway,
        }
    }

    fn new_session(&self) -> ConversationSession {
        ConversationSession::new(
            Arc::clone(&self.resolver),
            Arc::clone(&self.catalog),
            Arc::clone(&self.gateway),
        )
    }

    async fn session(&self, id: &str) -> ApiResult<SharedSession> {
        self.sessions
            .get(id)
            .await
            .ok_or_else(|| ApiError::not_found(format!("Session not found: {}", id)))
    }

    fn view(&self, id: String, session: &ConversationSession) -> SessionView {
        SessionView {
            id,
            persona: session.persona(),
            title: session.persona().map(|key| self.catalog.get(key).title()),
            state: session.state(),
            model: session.model().cloned(),
            failure: session.failure_reason().map(str::to_string),
            messages: session.transcript().to_vec(),
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/personas", get(personas_handler))
        .route("/api/sessions", post(create_session_handler))
        .route(
            "/api/sessions/{id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/api/sessions/{id}/persona", put(switch_persona_handler))
        .route("/api/sessions/{id}/messages", post(send_message_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(port: u16, state: AppState) -> Result<()> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

async fn status_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.resolver.cached(),
        "sessions": state.sessions.len().await,
    }))
}

async fn personas_handler(State(state): State<AppState>) -> Json<Vec<PersonaView>> {
    Json(
        state
            .catalog
            .iter()
            .map(|p| PersonaView {
                key: p.key,
                label: p.label,
                name: p.name,
            })
            .collect(),
    )
}

async fn create_session_handler(
    State(state): State<AppState>,
    Json(request): Json<PersonaRequest>,
) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let key: PersonaKey = request
        .persona
        .parse()
        .map_err(|e: crate::error::InvalidPersona| ApiError::bad_request(e.to_string()))?;

    let mut session = state.new_session();
    // A failed binding still yields a session the client can retry on
    if let Err(e) = session.select_persona(key).await {
        tracing::warn!("New session failed to bind: {}", e);
    }

    let id = Uuid::new_v4().to_string();
    let view = state.view(id.clone(), &session);
    state.sessions.insert(id, session).await;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionView>> {
    let shared = state.session(&id).await?;
    let session = shared.lock().await;
    Ok(Json(state.view(id, &session)))
}

async fn switch_persona_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PersonaRequest>,
) -> ApiResult<Json<SessionView>> {
    let shared = state.session(&id).await?;
    let mut session = shared.lock().await;
    session.select_persona_label(&request.persona).await?;
    Ok(Json(state.view(id, &session)))
}

async fn send_message_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<ReplyView>> {
    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message must not be empty"));
    }

    let shared = state.session(&id).await?;
    let mut session = shared.lock().await;
    let reply = session.send_message(&request.message).await?.clone();

    Ok(Json(ReplyView {
        reply,
        transcript_len: session.transcript().len(),
    }))
}

async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Session not found: {}", id)))
    }
}
