//! Axum middleware gating routes on a verified bearer token.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::bearer::bearer_token;
use super::errors::{AuthError, AuthErrorKind};
use super::state::HasTokenCodec;
use super::types::AuthContext;
use crate::jwt::{TokenCodec, TokenType};

/// Core authentication logic shared by the middleware variants.
///
/// Verification failures are collapsed into `InvalidToken`; the underlying
/// reason is only logged.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &dyn TokenCodec,
    expected: TokenType,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = tokens.verify(token, expected).map_err(|e| {
        tracing::debug!(
            expected = expected.as_str(),
            reason = %e,
            "Rejected bearer token"
        );
        AuthErrorKind::InvalidToken
    })?;

    Ok(AuthContext { claims })
}

async fn require_token<S>(
    state: &S,
    expected: TokenType,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: HasTokenCodec,
{
    let context = authenticate(request.headers(), state.tokens(), expected)?;
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Middleware for routes that accept a refresh token.
pub async fn require_refresh_token<S>(
    State(state): State<S>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: HasTokenCodec + Clone + Send + Sync + 'static,
{
    require_token(&state, TokenType::Refresh, request, next).await
}

/// Middleware for routes that accept an access token.
pub async fn require_access_token<S>(
    State(state): State<S>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: HasTokenCodec + Clone + Send + Sync + 'static,
{
    require_token(&state, TokenType::Access, request, next).await
}
