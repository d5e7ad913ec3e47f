//! Password hashing shared by the local session and the API server.

use std::sync::OnceLock;

use dashmap::DashMap;

use crate::error::AppError;

/// Cost used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
/// Cheapest cost bcrypt accepts; tests use it to stay fast.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is unreadable");
            false
        }
    }
}

/// One throwaway hash per cost, made on first use.
static DUMMY_HASHES: OnceLock<DashMap<u32, String>> = OnceLock::new();

/// Spend the same bcrypt work as a real verification, then fail.
///
/// Login calls this when the email is unknown so that a missing account
/// takes as long to reject as a wrong password.
pub fn verify_unknown_user(password: &str, cost: u32) -> bool {
    let hashes = DUMMY_HASHES.get_or_init(DashMap::new);
    let cached = hashes.get(&cost).map(|hash| hash.value().clone());
    let hash = match cached {
        Some(hash) => hash,
        None => match bcrypt::hash("imagify-unknown-user", cost) {
            Ok(hash) => {
                hashes.insert(cost, hash.clone());
                hash
            }
            Err(e) => {
                tracing::warn!(error = %e, cost, "Failed to build dummy password hash");
                return false;
            }
        },
    };

    let _ = verify_password(password, &hash);
    false
}
