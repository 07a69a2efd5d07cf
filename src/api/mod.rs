mod error;
mod tokens;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::{TokenCodec, TokenLifetimes};

pub use error::{ApiError, ApiResponse, panic_response};
pub use tokens::TokensState;
pub use users::UsersState;

/// Create the versioned API router (mounted under `/v1`).
pub fn create_api_router(
    db: Database,
    tokens: Arc<dyn TokenCodec>,
    lifetimes: TokenLifetimes,
    bcrypt_cost: u32,
) -> Router {
    let tokens_state = tokens::TokensState {
        db: db.clone(),
        tokens: tokens.clone(),
        lifetimes,
    };

    let users_state = users::UsersState {
        db,
        tokens,
        lifetimes,
        bcrypt_cost,
    };

    Router::new()
        .merge(tokens::router(tokens_state))
        .merge(users::router(users_state))
}
