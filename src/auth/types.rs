//! Authentication context types.

use crate::jwt::Claims;

/// Request-scoped result of a successful bearer verification.
///
/// Inserted into the request extensions by the auth middleware and read by
/// handlers through `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Verified claims of the presented token
    pub claims: Claims,
}

impl AuthContext {
    /// The authenticated subject (user UUID).
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }
}
