//! Token refresh endpoint.
//!
//! - POST `/token` - Exchange a bearer refresh token for a new access token

use axum::{
    Extension, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::error::{ApiError, ApiResponse, ResultExt};
use crate::auth::{AuthContext, AuthErrorKind, require_refresh_token};
use crate::db::Database;
use crate::impl_has_token_codec;
use crate::jwt::{TokenCodec, TokenLifetimes, TokenType};

#[derive(Clone)]
pub struct TokensState {
    pub db: Database,
    pub tokens: Arc<dyn TokenCodec>,
    pub lifetimes: TokenLifetimes,
}

impl_has_token_codec!(TokensState);

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/token", post(refresh_access_token))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_refresh_token::<TokensState>,
        ))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenData {
    access_token: String,
}

/// Issue a new access token for the subject of a verified refresh token.
async fn refresh_access_token(
    State(state): State<TokensState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_uuid(auth.subject())
        .await
        .db_err("Failed to get user")?;

    if user.is_none() {
        warn!(subject = %auth.subject(), "Refresh token presented for unknown user");
        return Err(ApiError::unauthorized(
            AuthErrorKind::InvalidToken.message(),
        ));
    }

    let access = state
        .tokens
        .issue(
            auth.subject(),
            TokenType::Access,
            state.lifetimes.for_type(TokenType::Access),
        )
        .internal_err("Failed to generate access token")?;

    Ok(ApiResponse::new(AccessTokenData {
        access_token: access.token,
    }))
}
