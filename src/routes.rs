//! REST endpoints so a browser front end can drive the wizard, intro gate,
//! and consent banner.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::{ConsentConfig, IntroConfig, WizardConfig};
use crate::consent::ConsentBanner;
use crate::error::{AnswerError, HandoffError};
use crate::intro::{IntroEvent, IntroGate, IntroState};
use crate::store::Flags;
use crate::wizard::{
    Navigator, ResultsHandler, StepController, StepPatch, Toggle, WizardDraft, WizardStep,
};

/// Navigation happens client-side; the host only logs it.
struct HostNavigator;

impl Navigator for HostNavigator {
    fn go_to_step(&self, step: WizardStep) {
        debug!(step = %step, "Navigate to step");
    }
    fn go_to_results(&self) {
        debug!("Navigate to results");
    }
}

/// Keeps the most recently completed draft for `GET /api/results`.
#[derive(Default)]
pub struct ResultsSlot {
    latest: RwLock<Option<WizardDraft>>,
}

impl ResultsSlot {
    pub async fn latest(&self) -> Option<WizardDraft> {
        self.latest.read().await.clone()
    }
}

#[async_trait]
impl ResultsHandler for ResultsSlot {
    async fn receive(&self, draft: WizardDraft) -> Result<(), HandoffError> {
        *self.latest.write().await = Some(draft);
        Ok(())
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub wizard: Arc<RwLock<StepController>>,
    pub intro: Arc<RwLock<IntroGate>>,
    pub consent: ConsentBanner,
    pub results: Arc<ResultsSlot>,
    pub flags: Flags,
}

impl AppState {
    /// Build every component over one flag store.
    pub async fn new(flags: Flags, wizard_config: WizardConfig) -> Self {
        let results = Arc::new(ResultsSlot::default());
        let wizard = StepController::start(
            wizard_config,
            flags.clone(),
            Arc::new(HostNavigator),
            results.clone(),
        )
        .await;
        let intro = IntroGate::load(flags.clone(), IntroConfig::default()).await;

        Self {
            wizard: Arc::new(RwLock::new(wizard)),
            intro: Arc::new(RwLock::new(intro)),
            consent: ConsentBanner::new(flags.clone(), ConsentConfig::default()),
            results,
            flags,
        }
    }
}

/// Build the Axum router.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/wizard", get(get_wizard))
        .route("/api/wizard/answers", post(post_answers))
        .route("/api/wizard/toggle/ingredient", post(toggle_ingredient))
        .route("/api/wizard/toggle/priority", post(toggle_priority))
        .route("/api/wizard/next", post(next_step))
        .route("/api/wizard/back", post(previous_step))
        .route("/api/wizard/reset", post(reset_wizard))
        .route("/api/results", get(get_results))
        .route("/api/intro", get(get_intro).delete(forget_intro))
        .route("/api/intro/event", post(post_intro_event))
        .route("/api/consent", get(get_consent).post(post_consent))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "kibble-wizard"
    }))
}

// ── Wizard ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TagRequest {
    tag: String,
}

/// GET /api/wizard
async fn get_wizard(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.wizard.read().await.status())
}

/// POST /api/wizard/answers
///
/// Accepts answers for the step currently on screen only. Off-step answers
/// are a 409; tag sets breaking the selection rules are a 422.
async fn post_answers(
    State(state): State<AppState>,
    Json(patch): Json<StepPatch>,
) -> axum::response::Response {
    let mut wizard = state.wizard.write().await;
    match wizard.update(patch).await {
        Ok(()) => Json(wizard.status()).into_response(),
        Err(e @ AnswerError::NotOnScreen { .. }) => error_response(StatusCode::CONFLICT, e.to_string()),
        Err(e @ AnswerError::TooManyPriorities { .. }) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

fn toggle_response(toggle: Toggle, wizard: &StepController) -> axum::response::Response {
    let body = Json(serde_json::json!({ "toggle": toggle, "status": wizard.status() }));
    if toggle == Toggle::NotOnScreen {
        return (StatusCode::CONFLICT, body).into_response();
    }
    body.into_response()
}

/// POST /api/wizard/toggle/ingredient
async fn toggle_ingredient(
    State(state): State<AppState>,
    Json(req): Json<TagRequest>,
) -> axum::response::Response {
    let mut wizard = state.wizard.write().await;
    let toggle = wizard.toggle_ingredient(&req.tag).await;
    toggle_response(toggle, &wizard)
}

/// POST /api/wizard/toggle/priority
async fn toggle_priority(
    State(state): State<AppState>,
    Json(req): Json<TagRequest>,
) -> axum::response::Response {
    let mut wizard = state.wizard.write().await;
    let toggle = wizard.toggle_priority(&req.tag).await;
    toggle_response(toggle, &wizard)
}

/// POST /api/wizard/next
async fn next_step(State(state): State<AppState>) -> axum::response::Response {
    let mut wizard = state.wizard.write().await;
    match wizard.advance().await {
        Ok(outcome) => {
            Json(serde_json::json!({ "outcome": outcome, "status": wizard.status() })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Results handoff failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// POST /api/wizard/back
async fn previous_step(State(state): State<AppState>) -> impl IntoResponse {
    let mut wizard = state.wizard.write().await;
    wizard.retreat().await;
    Json(wizard.status())
}

/// POST /api/wizard/reset
async fn reset_wizard(State(state): State<AppState>) -> impl IntoResponse {
    let mut wizard = state.wizard.write().await;
    wizard.reset().await;
    Json(wizard.status())
}

/// GET /api/results
///
/// The last handed-off draft, or 404 if the wizard was never completed.
async fn get_results(State(state): State<AppState>) -> axum::response::Response {
    match state.results.latest().await {
        Some(draft) => Json(draft).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No completed questionnaire yet"),
    }
}

// ── Intro gate ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct IntroEventRequest {
    event: IntroEvent,
}

fn intro_body(state: IntroState) -> serde_json::Value {
    serde_json::json!({
        "state": state,
        "overlay_visible": state.overlay_visible(),
        "content_visible": state.content_visible(),
    })
}

/// GET /api/intro
async fn get_intro(State(state): State<AppState>) -> impl IntoResponse {
    Json(intro_body(state.intro.read().await.state()))
}

/// POST /api/intro/event
///
/// A natural end returns `transitioning`; the gate finishes on its own
/// after the exit animation.
async fn post_intro_event(
    State(state): State<AppState>,
    Json(req): Json<IntroEventRequest>,
) -> impl IntoResponse {
    let mut gate = state.intro.write().await;
    let next = gate.handle(req.event).await;

    if next == IntroState::Transitioning {
        let intro = Arc::clone(&state.intro);
        let delay = gate.exit_animation();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            intro.write().await.finish_exit();
        });
    }

    Json(intro_body(next))
}

/// DELETE /api/intro
///
/// Clears the completion flag so the intro plays on the next load.
async fn forget_intro(State(state): State<AppState>) -> axum::response::Response {
    match IntroGate::forget(&state.flags).await {
        Ok(cleared) => {
            info!(cleared = cleared, "Intro completion flag cleared");
            Json(serde_json::json!({ "cleared": cleared })).into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// ── Consent ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ConsentRequest {
    accepted: bool,
}

/// GET /api/consent
async fn get_consent(State(state): State<AppState>) -> impl IntoResponse {
    let record = state.consent.current(Utc::now()).await;
    Json(serde_json::json!({
        "show_banner": record.is_none(),
        "record": record,
    }))
}

/// POST /api/consent
async fn post_consent(
    State(state): State<AppState>,
    Json(req): Json<ConsentRequest>,
) -> axum::response::Response {
    match state.consent.record(req.accepted, Utc::now()).await {
        Ok(record) => Json(serde_json::json!({
            "show_banner": false,
            "record": record,
        }))
        .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
