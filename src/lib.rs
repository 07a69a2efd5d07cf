pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod password;

use api::{create_api_router, panic_response};
use axum::Router;
use db::Database;
use jwt::{JwtConfig, TokenCodec, TokenLifetimes};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Path prefix of the versioned API.
pub const API_PREFIX: &str = "/v1";

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Access and refresh token lifetimes
    pub lifetimes: TokenLifetimes,
    /// bcrypt cost factor for password hashes
    pub bcrypt_cost: u32,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let tokens: Arc<dyn TokenCodec> = Arc::new(JwtConfig::new(&config.jwt_secret));
    create_app_with_codec(config, tokens)
}

/// Create the application router with a caller-supplied token codec.
/// `config.jwt_secret` is ignored.
pub fn create_app_with_codec(config: &ServerConfig, tokens: Arc<dyn TokenCodec>) -> Router {
    let api_router = create_api_router(
        config.db.clone(),
        tokens,
        config.lifetimes,
        config.bcrypt_cost,
    );

    Router::new()
        .nest(API_PREFIX, api_router)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
