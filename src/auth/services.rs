use tracing::{info, warn};

use crate::auth::{
    dto::{AuthTokens, LoginRequest, PublicUser, SignupRequest},
    password::{hash_password, verify_dummy, verify_password},
    repo::SIGNUP_REJECTED,
    repo_types::{NewUser, User},
};
use crate::config::TokenMode;
use crate::error::{AppError, AppResult, AuthFailure};
use crate::state::AppState;

/// Mints the tokens for a fresh session and records the refresh token, if
/// any, as the user's only accepted one.
async fn start_session(st: &AppState, user: &User) -> AppResult<AuthTokens> {
    let access_token = st.keys.sign_access(user.id, &user.username)?;
    let refresh_token = match st.config.jwt.mode {
        TokenMode::Dual => Some(st.keys.sign_refresh(user.id, &user.username)?),
        TokenMode::Single => None,
    };
    st.users
        .set_refresh_token(user.id, refresh_token.as_deref())
        .await?;
    Ok(AuthTokens {
        access_token,
        refresh_token,
    })
}

pub async fn signup(st: &AppState, req: SignupRequest) -> AppResult<AuthTokens> {
    if st.users.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "signup with existing email");
        return Err(AppError::InvalidRequest(SIGNUP_REJECTED.into()));
    }

    let password_hash = hash_password(&req.password).await?;
    let user = st
        .users
        .create(NewUser {
            username: req.username.trim().to_string(),
            email: req.email,
            password_hash,
        })
        .await?;

    let tokens = start_session(st, &user).await?;
    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(tokens)
}

pub async fn login(st: &AppState, req: LoginRequest) -> AppResult<AuthTokens> {
    let Some(user) = st.users.find_by_email(&req.email).await? else {
        verify_dummy(&req.password).await;
        warn!(email = %req.email, "login unknown email");
        return Err(AppError::Unauthorized(AuthFailure::BadCredentials));
    };

    if !verify_password(&req.password, &user.password_hash).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(AuthFailure::BadCredentials));
    }

    let tokens = start_session(st, &user).await?;
    info!(user_id = %user.id, "user logged in");
    Ok(tokens)
}

/// Exchanges the user's current refresh token for a new access token.
pub async fn refresh(st: &AppState, refresh_token: &str) -> AppResult<AuthTokens> {
    if st.config.jwt.mode == TokenMode::Single {
        return Err(AppError::Unauthorized(AuthFailure::RefreshDisabled));
    }

    let claims = st
        .keys
        .verify_refresh(refresh_token)
        .map_err(AppError::Unauthorized)?;

    let user = st
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(AppError::Unauthorized(AuthFailure::UserNotFound))?;

    if user.refresh_token.as_deref() != Some(refresh_token) {
        warn!(user_id = %user.id, "stale refresh token presented");
        return Err(AppError::Unauthorized(AuthFailure::TokenMismatch));
    }

    let access_token = st.keys.sign_access(user.id, &user.username)?;
    let refresh_token = if st.config.jwt.rotate_refresh {
        let rotated = st.keys.sign_refresh(user.id, &user.username)?;
        st.users.set_refresh_token(user.id, Some(&rotated)).await?;
        Some(rotated)
    } else {
        None
    };

    info!(user_id = %user.id, rotated = refresh_token.is_some(), "access token refreshed");
    Ok(AuthTokens {
        access_token,
        refresh_token,
    })
}

pub async fn list_users(st: &AppState) -> AppResult<Vec<PublicUser>> {
    let users = st.users.list().await?;
    Ok(users.into_iter().map(PublicUser::from).collect())
}
