//! HTTP routes.
//!
//! | Method | Path                   | Handler            |
//! |--------|------------------------|--------------------|
//! | GET    | `/healthz`             | liveness, no auth  |
//! | GET    | `/clients`             | list known clients |
//! | PUT    | `/clients/{mac}/alias` | set client alias   |
//! | GET    | `/ppsk`                | list PPSKs         |
//! | POST   | `/ppsk/create`         | add a PPSK         |
//! | POST   | `/ppsk/revoke`         | remove a PPSK      |

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use unigate_core::{ClientDirectory, ClientSummary, PpskDescriptor, PpskManager};

use crate::auth::require_bearer;
use crate::error::ApiError;

const REQUIRED_FIELDS: &str = "wlan_id and password are required";

#[derive(Clone)]
pub struct AppState {
    pub ppsk: Arc<PpskManager>,
    pub clients: Arc<ClientDirectory>,
    pub bearer_token: Arc<SecretString>,
}

impl AppState {
    pub fn new(ppsk: PpskManager, clients: ClientDirectory, bearer_token: SecretString) -> Self {
        Self {
            ppsk: Arc::new(ppsk),
            clients: Arc::new(clients),
            bearer_token: Arc::new(bearer_token),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/clients", get(list_clients))
        .route("/clients/{mac}/alias", put(set_client_alias))
        .route("/ppsk", get(list_ppsks))
        .route("/ppsk/create", post(create_ppsk))
        .route("/ppsk/revoke", post(revoke_ppsk))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Request bodies ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct AliasRequest {
    #[serde(default)]
    alias: String,
}

#[derive(Debug, Default, Deserialize)]
struct PpskQuery {
    wlan_id: Option<String>,
    ssid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CreatePpskRequest {
    #[serde(default)]
    wlan_id: String,
    #[serde(default)]
    password: String,
    networkconf_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RevokePpskRequest {
    #[serde(default)]
    wlan_id: String,
    #[serde(default)]
    password: String,
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// ── Handlers ────────────────────────────────────────────────────────

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<ClientSummary>>, ApiError> {
    Ok(Json(state.clients.list_clients().await?))
}

async fn set_client_alias(
    State(state): State<AppState>,
    Path(mac): Path<String>,
    body: Result<Json<AliasRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = parse_body(body)?;
    let updated = state.clients.rename_by_mac(&mac, &request.alias).await?;
    Ok(Json(json!({ "updated": updated })))
}

async fn list_ppsks(
    State(state): State<AppState>,
    Query(query): Query<PpskQuery>,
) -> Result<Json<Vec<PpskDescriptor>>, ApiError> {
    let listed = state
        .ppsk
        .list_ppsks(query.wlan_id.as_deref(), query.ssid.as_deref())
        .await?;
    Ok(Json(listed))
}

async fn create_ppsk(
    State(state): State<AppState>,
    body: Result<Json<CreatePpskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_body(body)?;
    let wlan_id = request.wlan_id.trim();
    let password = request.password.trim();
    if wlan_id.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(REQUIRED_FIELDS.into()));
    }

    let created = state
        .ppsk
        .create_ppsk(wlan_id, password, request.networkconf_id.as_deref().map(str::trim))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn revoke_ppsk(
    State(state): State<AppState>,
    body: Result<Json<RevokePpskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_body(body)?;
    let wlan_id = request.wlan_id.trim();
    let password = request.password.trim();
    if wlan_id.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(REQUIRED_FIELDS.into()));
    }

    let result = state.ppsk.remove_ppsk(wlan_id, password).await?;
    Ok(Json(result))
}
