use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{normalize_email, SigninRequest, SignupRequest, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::{ApiError, StoreError},
    state::AppState,
    validation::ValidJson,
};

const SIGNUP_FAILED: &str = "error while signing up";
const SIGNIN_FAILED: &str = "error while signing in";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(signup))
        .route("/user/signin", post(signin))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SignupRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Forbidden(SIGNUP_FAILED)
    })?;

    let user = match state.users.create(&email, &hash, payload.name.trim()).await {
        Ok(u) => u,
        Err(StoreError::Conflict) => {
            warn!(email = %email, "email already registered");
            return Err(ApiError::Forbidden(SIGNUP_FAILED));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::Forbidden(SIGNUP_FAILED));
        }
    };

    let token = JwtKeys::from_ref(&state).sign(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Forbidden(SIGNUP_FAILED)
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SigninRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let user = match state.users.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "signin unknown email");
            return Err(ApiError::Forbidden("User not found"));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::Forbidden(SIGNIN_FAILED));
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(ApiError::Forbidden("Invalid password"));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Forbidden(SIGNIN_FAILED)
    })?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(TokenResponse { token }))
}
