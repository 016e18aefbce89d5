// handlers.rs
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::connect_info::ClientAddr;
use crate::error::{PollError, PollResult};
use crate::models::{CreatePollRequest, MessageResponse, PollResponse, PollResults, VoteRequest};
use crate::store::EntityStore;
use crate::{poll, results, vote};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }
}

/// `Json` whose rejections use the same error envelope as every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PollError))]
pub struct ValidatedJson<T>(pub T);

// Malformed ids cannot name an existing poll.
fn parse_poll_id(raw: &str) -> PollResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| PollError::NotFound("Poll".into()))
}

/// Liveness plus a round trip to the store
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

/// List all polls, newest first
pub async fn list_polls(State(state): State<AppState>) -> PollResult<Json<Vec<PollResponse>>> {
    let now = Utc::now();
    let polls = poll::list_polls(state.store.as_ref())
        .await?
        .into_iter()
        .map(|detail| PollResponse::from_detail(detail, now))
        .collect();
    Ok(Json(polls))
}

/// Create a poll with its options
pub async fn create_poll(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePollRequest>,
) -> PollResult<(StatusCode, Json<PollResponse>)> {
    let detail = poll::create_poll(
        state.store.as_ref(),
        payload.question,
        payload.options,
        payload.expires_at,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(PollResponse::from_detail(detail, Utc::now())),
    ))
}

pub async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> PollResult<Json<PollResponse>> {
    let detail = poll::get_poll(state.store.as_ref(), parse_poll_id(&poll_id)?).await?;
    Ok(Json(PollResponse::from_detail(detail, Utc::now())))
}

/// Vote for an option; the client address stands in for a missing voter id
pub async fn vote(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    ClientAddr(addr): ClientAddr,
    ValidatedJson(payload): ValidatedJson<VoteRequest>,
) -> PollResult<(StatusCode, Json<MessageResponse>)> {
    let fallback = addr.map(|addr| addr.ip().to_string());

    vote::cast_vote(
        state.store.as_ref(),
        parse_poll_id(&poll_id)?,
        payload.option_id,
        payload.voter_identifier.as_deref(),
        fallback.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Vote recorded successfully.".to_string(),
        }),
    ))
}

pub async fn get_results(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> PollResult<Json<PollResults>> {
    let results = results::get_results(state.store.as_ref(), parse_poll_id(&poll_id)?).await?;
    Ok(Json(results))
}
