//! Bearer-token authentication.
//!
//! Requests carry `Authorization: Bearer <token>`. The middleware checks the
//! header shape, verifies the token with the configured [`TokenCodec`] and
//! either rejects with a 401 or attaches an [`AuthContext`] for the handler.
//!
//! [`TokenCodec`]: crate::jwt::TokenCodec

mod bearer;
mod errors;
mod middleware;
mod state;
mod types;

pub use bearer::{BEARER_SCHEME, bearer_token};
pub use errors::{AuthError, AuthErrorKind};
pub use middleware::{authenticate, require_access_token, require_refresh_token};
pub use state::HasTokenCodec;
pub use types::AuthContext;
