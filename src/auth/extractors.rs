use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::{AppError, AppResult, AuthFailure};
use crate::state::AppState;

/// Identity resolved from a valid access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers.get(AUTHORIZATION)?.to_str().ok()?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> AppResult<CurrentUser> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized(AuthFailure::MissingToken))?;
    let claims = keys.verify_access(token).map_err(AppError::Unauthorized)?;
    Ok(CurrentUser {
        id: claims.sub,
        username: claims.username,
    })
}

/// Route guard: rejects the request unless it carries a valid access token,
/// and makes the caller's identity available to the handler.
pub async fn require_access_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(req.headers(), &state.keys)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }
        let keys = JwtKeys::from_ref(state);
        authenticate(&parts.headers, &keys)
    }
}
