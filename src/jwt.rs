//! JWT token generation and validation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token type for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented to protected routes
    Access,
    /// Long-lived token exchanged for new access tokens
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID, unique per issued token
    pub jti: String,
    /// Subject (user UUID)
    pub sub: String,
    /// Token type
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Access token duration: 5 minutes
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 5 * 60;

/// Refresh token duration: 2 weeks
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 14 * 24 * 60 * 60;

/// Longest lifetime accepted from configuration: 1 year
pub const MAX_TOKEN_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Lifetimes used when issuing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access_secs: u64,
    pub refresh_secs: u64,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access_secs: ACCESS_TOKEN_DURATION_SECS,
            refresh_secs: REFRESH_TOKEN_DURATION_SECS,
        }
    }
}

impl TokenLifetimes {
    pub fn for_type(&self, token_type: TokenType) -> u64 {
        match token_type {
            TokenType::Access => self.access_secs,
            TokenType::Refresh => self.refresh_secs,
        }
    }
}

/// Result of issuing a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The JWT token string
    pub token: String,
    /// JWT ID
    pub jti: String,
    /// Issued at timestamp (Unix seconds)
    pub issued_at: u64,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: u64,
    /// Token duration in seconds
    pub duration: u64,
}

/// Signs and verifies tokens.
///
/// Handlers and the auth middleware only see this trait, so the signing
/// backend can be swapped (for instance with a failing stub in tests).
pub trait TokenCodec: Send + Sync {
    /// Issue a token of the given type for `subject`, valid for `ttl` seconds.
    fn issue(&self, subject: &str, token_type: TokenType, ttl: u64)
    -> Result<IssuedToken, JwtError>;

    /// Verify a token's signature, expiry and type, returning its claims.
    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError>;
}

/// HS256 token codec keyed by a shared secret.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }
}

fn now_secs() -> Result<u64, JwtError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::TimeError)?
        .as_secs())
}

impl TokenCodec for JwtConfig {
    fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        ttl: u64,
    ) -> Result<IssuedToken, JwtError> {
        let now = now_secs()?;
        let exp = now
            .checked_add(ttl)
            .ok_or(JwtError::LifetimeOverflow(ttl))?;
        let jti = uuid::Uuid::new_v4().to_string();

        let claims = Claims {
            jti: jti.clone(),
            sub: subject.to_string(),
            token_type,
            iat: now,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            jti,
            issued_at: now,
            expires_at: exp,
            duration: ttl,
        })
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed(e),
            })?;

        if token_data.claims.token_type != expected {
            return Err(JwtError::TypeMismatch {
                expected,
                found: token_data.claims.token_type,
            });
        }

        Ok(token_data.claims)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Signature does not match the configured key
    InvalidSignature,
    /// Token is past its expiry
    Expired,
    /// Token was issued for another purpose
    TypeMismatch {
        expected: TokenType,
        found: TokenType,
    },
    /// Token could not be decoded at all
    Malformed(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
    /// Expiry does not fit in a Unix timestamp
    LifetimeOverflow(u64),
    /// Signing backend failure reported by another codec implementation
    Backend(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::InvalidSignature => write!(f, "Invalid token signature"),
            JwtError::Expired => write!(f, "Token expired"),
            JwtError::TypeMismatch { expected, found } => write!(
                f,
                "Wrong token type: expected {}, found {}",
                expected.as_str(),
                found.as_str()
            ),
            JwtError::Malformed(e) => write!(f, "Malformed token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
            JwtError::LifetimeOverflow(ttl) => {
                write!(f, "Token lifetime of {} seconds is out of range", ttl)
            }
            JwtError::Backend(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for JwtError {}
