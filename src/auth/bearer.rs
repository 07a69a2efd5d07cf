//! Bearer credential parsing for the `Authorization` header.

use axum::http::{HeaderMap, header};

use super::errors::AuthErrorKind;

/// Authentication scheme expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The header value must be exactly the scheme and a non-empty token
/// separated by a single space.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthErrorKind> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthErrorKind::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthErrorKind::MalformedHeader)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthErrorKind::MalformedHeader),
    }
}
