//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use crate::jwt::{
    ACCESS_TOKEN_DURATION_SECS, MAX_TOKEN_DURATION_SECS, REFRESH_TOKEN_DURATION_SECS,
    TokenLifetimes,
};
use crate::password;
use clap::Parser;
use tracing::{error, info};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tokengate",
    about = "Bearer-token authentication with refresh token exchange"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "TOKENGATE_PORT", default_value = "7292")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "TOKENGATE_DATABASE", default_value = "tokengate.db")]
    pub database: String,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Access token lifetime in seconds
    #[arg(long, default_value_t = ACCESS_TOKEN_DURATION_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_DURATION_SECS))]
    pub access_token_ttl: u64,

    /// Refresh token lifetime in seconds
    #[arg(long, default_value_t = REFRESH_TOKEN_DURATION_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_DURATION_SECS))]
    pub refresh_token_ttl: u64,

    /// bcrypt cost factor for password hashes (4-31)
    #[arg(long, default_value_t = password::DEFAULT_COST, value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: main calls this before the async runtime starts, while the
        // process has a single thread.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    validate_jwt_secret(secret)
}

fn validate_jwt_secret(secret: String) -> Option<String> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: String,
    access_token_ttl: u64,
    refresh_token_ttl: u64,
    bcrypt_cost: u32,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        lifetimes: TokenLifetimes {
            access_secs: access_token_ttl,
            refresh_secs: refresh_token_ttl,
        },
        bcrypt_cost,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tokengate"]).unwrap();
        assert_eq!(args.port, 7292);
        assert_eq!(args.access_token_ttl, ACCESS_TOKEN_DURATION_SECS);
        assert_eq!(args.refresh_token_ttl, REFRESH_TOKEN_DURATION_SECS);
        assert_eq!(args.bcrypt_cost, password::DEFAULT_COST);
        assert!(matches!(args.log_format, LogFormat::Pretty));
    }

    #[test]
    fn test_custom_lifetimes() {
        let args = Args::try_parse_from([
            "tokengate",
            "--access-token-ttl",
            "60",
            "--refresh-token-ttl",
            "3600",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.access_token_ttl, 60);
        assert_eq!(args.refresh_token_ttl, 3600);
        assert!(matches!(args.log_format, LogFormat::Json));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert!(Args::try_parse_from(["tokengate", "--access-token-ttl", "0"]).is_err());
        assert!(Args::try_parse_from(["tokengate", "--bcrypt-cost", "3"]).is_err());
    }

    #[test]
    fn test_ttl_above_maximum_rejected() {
        let too_long = (MAX_TOKEN_DURATION_SECS + 1).to_string();
        assert!(Args::try_parse_from(["tokengate", "--refresh-token-ttl", too_long.as_str()]).is_err());
        let overflow = u64::MAX.to_string();
        assert!(Args::try_parse_from(["tokengate", "--access-token-ttl", overflow.as_str()]).is_err());

        let max = MAX_TOKEN_DURATION_SECS.to_string();
        let args = Args::try_parse_from(["tokengate", "--refresh-token-ttl", max.as_str()]).unwrap();
        assert_eq!(args.refresh_token_ttl, MAX_TOKEN_DURATION_SECS);
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(validate_jwt_secret("short".to_string()).is_none());
        assert!(validate_jwt_secret("x".repeat(MIN_JWT_SECRET_LENGTH)).is_some());
    }

    #[tokio::test]
    async fn test_build_config() {
        let db = Database::open(":memory:").await.unwrap();
        let config = build_config(db, "s".repeat(32), 10, 20, password::MIN_COST);

        assert_eq!(config.jwt_secret, "s".repeat(32).into_bytes());
        assert_eq!(config.lifetimes.access_secs, 10);
        assert_eq!(config.lifetimes.refresh_secs, 20);
        assert_eq!(config.bcrypt_cost, password::MIN_COST);
    }
}
