//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Reason a request was rejected by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MissingAuthHeader,
    MalformedHeader,
    InvalidToken,
}

impl AuthErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorKind::MissingAuthHeader => "Authorization header not found",
            AuthErrorKind::MalformedHeader => "Bearer token malformed",
            AuthErrorKind::InvalidToken => "Invalid token",
        }
    }
}

/// Rejection produced by the auth middleware. Always a 401 with a fixed message.
#[derive(Debug)]
pub struct AuthError {
    pub(super) kind: AuthErrorKind,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }
}

impl From<AuthErrorKind> for AuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self { kind }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                success: false,
                message: self.kind.message(),
            }),
        )
            .into_response()
    }
}
