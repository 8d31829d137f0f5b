//! HTTP Handlers

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use serde::{Deserialize, Serialize};

use gram_core::{PostId, SubscriptionStatus, VoteDirection, VoteTally};

use crate::page::{self, PageContext};
use crate::state::AppState;
use crate::store::{StoreError, UserId};

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub posts: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub csrfmiddlewaretoken: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub csrfmiddlewaretoken: Option<String>,
    #[serde(default)]
    pub is_like: String,
}

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::PostNotFound(_) => api_error(StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
        StoreError::SelfSubscription => {
            api_error(StatusCode::BAD_REQUEST, "SELF_SUBSCRIPTION", e.to_string())
        }
        StoreError::Poisoned => {
            tracing::error!("Store error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", "Internal error")
        }
    }
}

fn verify_csrf(state: &AppState, token: Option<&str>) -> Result<(), ApiError> {
    match token {
        Some(token) if token == &*state.csrf_token => Ok(()),
        Some(_) => {
            tracing::warn!("Rejected request with stale CSRF token");
            Err(api_error(StatusCode::FORBIDDEN, "CSRF_FAILED", "CSRF token incorrect"))
        }
        None => {
            tracing::warn!("Rejected request without CSRF token");
            Err(api_error(StatusCode::FORBIDDEN, "CSRF_FAILED", "CSRF token missing"))
        }
    }
}

/// Profile shown on the demo page: the next user after the current one
fn demo_profile(user: UserId) -> UserId {
    user.wrapping_add(1)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let posts = state.store.posts().map(|p| p.len()).unwrap_or(0);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        posts,
    })
}

/// Demo page carrying the bundle
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let profile_id = demo_profile(state.user_id);
    let posts = state.store.posts().map_err(store_error)?;
    let is_subscribed = state
        .store
        .is_subscribed(state.user_id, profile_id)
        .map_err(store_error)?;

    Ok(Html(page::render(&PageContext {
        csrf_token: &state.csrf_token,
        profile_id,
        subscription: SubscriptionStatus { is_subscribed },
        posts: &posts,
    })))
}

/// Like or dislike a post
pub async fn like_dislike(
    State(state): State<AppState>,
    Path(pk): Path<u64>,
    Form(form): Form<VoteForm>,
) -> Result<Json<VoteTally>, ApiError> {
    verify_csrf(&state, form.csrfmiddlewaretoken.as_deref())?;

    let direction = VoteDirection::from_form_value(&form.is_like);
    let tally = state
        .store
        .vote(state.user_id, PostId(pk), direction)
        .map_err(store_error)?;

    tracing::info!(post = pk, ?direction, likes = tally.likes_count, dislikes = tally.dislikes_count, "Vote recorded");
    Ok(Json(tally))
}

/// Toggle the current user's subscription to a profile
pub async fn subscribe(
    State(state): State<AppState>,
    Path(pk): Path<UserId>,
    Form(form): Form<SubscribeForm>,
) -> Result<Json<SubscriptionStatus>, ApiError> {
    verify_csrf(&state, form.csrfmiddlewaretoken.as_deref())?;

    let status = state
        .store
        .toggle_subscription(state.user_id, pk)
        .map_err(store_error)?;

    tracing::info!(profile = pk, is_subscribed = status.is_subscribed, "Subscription toggled");
    Ok(Json(status))
}
