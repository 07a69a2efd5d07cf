//! Password hashing with bcrypt.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking pool.

use tokio::task;

/// Minimum cost accepted by bcrypt. Only suitable for tests.
pub const MIN_COST: u32 = 4;

/// Cost used when none is configured.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug)]
pub enum PasswordError {
    Hash(bcrypt::BcryptError),
    Join(task::JoinError),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::Hash(e) => write!(f, "Password hashing failed: {}", e),
            PasswordError::Join(e) => write!(f, "Password hashing task failed: {}", e),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Hash a password with the given bcrypt cost.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_owned();
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(PasswordError::Join)?
        .map_err(PasswordError::Hash)
}

/// Check a password against a stored hash.
/// A hash that cannot be parsed counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let result = task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(PasswordError::Join)?;

    match result {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is unreadable");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("test123", MIN_COST).await.unwrap();
        assert_ne!(hash, "test123");

        assert!(verify_password("test123", &hash).await.unwrap());
        assert!(!verify_password("test124", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("same", MIN_COST).await.unwrap();
        let b = hash_password("same", MIN_COST).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_garbage_hash_is_mismatch() {
        assert!(!verify_password("test123", "not-a-hash").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_cost_is_error() {
        assert!(matches!(
            hash_password("test123", 1).await,
            Err(PasswordError::Hash(_))
        ));
    }
}
