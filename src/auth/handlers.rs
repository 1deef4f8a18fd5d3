use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{normalize_email, AuthTokens, LoginRequest, PublicUser, RefreshRequest, SignupRequest},
        extractors::CurrentUser,
        services,
    },
    error::{AppError, AppResult, AuthFailure},
    state::AppState,
    validation::Validate,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/users", get(list_users))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> AppResult<Json<AuthTokens>> {
    payload.email = normalize_email(&payload.email);
    let payload = payload.validated()?;
    Ok(Json(services::signup(&state, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<Json<AuthTokens>> {
    payload.email = normalize_email(&payload.email);
    let payload = payload.validated()?;
    Ok(Json(services::login(&state, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthTokens>> {
    let payload = payload.validated()?;
    Ok(Json(services::refresh(&state, &payload.refresh_token).await?))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<PublicUser>>> {
    Ok(Json(services::list_users(&state).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<PublicUser>> {
    let record = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or(AppError::Unauthorized(AuthFailure::UserNotFound))?;
    Ok(Json(record.into()))
}
