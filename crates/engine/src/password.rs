//! Password hashing and verification with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
//! parameters, so verification needs nothing but the stored string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{EngineError, ResultEngine};

/// Hash a password using a fresh random salt.
pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::Hashing(err.to_string()))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub(crate) fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    let parsed = PasswordHash::new(hash).map_err(|err| EngineError::Hashing(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
