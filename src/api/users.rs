//! Account endpoints.
//!
//! - POST `/register` - Create a user and return a token pair
//! - POST `/login` - Exchange email and password for a token pair
//! - GET `/me` - Current user, requires an access token

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{ApiError, ApiResponse, ResultExt};
use crate::auth::{AuthContext, AuthErrorKind, require_access_token};
use crate::db::Database;
use crate::impl_has_token_codec;
use crate::jwt::{TokenCodec, TokenLifetimes, TokenType};
use crate::password::{hash_password, verify_password};

const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub tokens: Arc<dyn TokenCodec>,
    pub lifetimes: TokenLifetimes,
    pub bcrypt_cost: u32,
}

impl_has_token_codec!(UsersState);

pub fn router(state: UsersState) -> Router {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token::<UsersState>,
        ))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenPairData {
    access_token: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct MeData {
    uuid: String,
    email: String,
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::bad_request("Email is required"));
    }

    let valid = email.len() <= MAX_EMAIL_LENGTH
        && !email.chars().any(char::is_whitespace)
        && matches!(
            email.split_once('@'),
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        );

    if !valid {
        return Err(ApiError::bad_request("Email is invalid"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn parse_credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, ApiError> {
    payload.map(|Json(body)| body).map_err(|e| {
        warn!(error = %e, "Rejected request body");
        ApiError::bad_request("Invalid request body")
    })
}

fn issue_pair(state: &UsersState, subject: &str) -> Result<TokenPairData, ApiError> {
    let issue = |token_type: TokenType| {
        state
            .tokens
            .issue(subject, token_type, state.lifetimes.for_type(token_type))
    };
    let access = issue(TokenType::Access).internal_err("Failed to generate access token")?;
    let refresh = issue(TokenType::Refresh).internal_err("Failed to generate refresh token")?;

    Ok(TokenPairData {
        access_token: access.token,
        refresh_token: refresh.token,
    })
}

async fn register(
    State(state): State<UsersState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = parse_credentials(payload)?;
    let email = payload.email.trim();

    validate_email(email)?;
    validate_password(&payload.password)?;

    let available = state
        .db
        .users()
        .is_email_available(email)
        .await
        .db_err("Failed to check email availability")?;

    if !available {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = hash_password(&payload.password, state.bcrypt_cost)
        .await
        .internal_err("Failed to hash password")?;

    // A concurrent registration can claim the email after the check above
    let uuid = uuid::Uuid::new_v4().to_string();
    match state.db.users().create(&uuid, email, &password_hash).await {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::conflict("User already exists"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to create user", e)),
    }

    info!(user = %uuid, "User registered");

    let tokens = issue_pair(&state, &uuid)?;
    Ok(ApiResponse::with_message(
        "User successfully registered",
        tokens,
    ))
}

async fn login(
    State(state): State<UsersState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = parse_credentials(payload)?;

    let user = state
        .db
        .users()
        .get_by_email(payload.email.trim())
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let matches = verify_password(&payload.password, &user.password_hash)
        .await
        .internal_err("Failed to verify password")?;

    if !matches {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let tokens = issue_pair(&state, &user.uuid)?;
    Ok(ApiResponse::new(tokens))
}

async fn me(
    State(state): State<UsersState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_uuid(auth.subject())
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::unauthorized(AuthErrorKind::InvalidToken.message()))?;

    Ok(ApiResponse::new(MeData {
        uuid: user.uuid,
        email: user.email,
    }))
}
