//! Secret hashing using Argon2id
//!
//! Secrets are stored as PHC strings (`$argon2id$v=19$...`) that carry their
//! own salt and parameters, so verification never needs extra state.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{LedgerError, LedgerResult};

/// Cost parameters for hashing new secrets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 2)
    pub time_cost: u32,
    /// Parallelism degree (default: 1)
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_cost: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    fn argon2(&self) -> LedgerResult<Argon2<'static>> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| LedgerError::Security(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a secret with a fresh random salt
pub fn hash_secret(secret: &str, params: &HashParams) -> LedgerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .argon2()?
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| LedgerError::Security(format!("Hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a secret against a stored PHC string
pub fn verify_secret(secret: &str, stored: &str) -> LedgerResult<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| LedgerError::Security(format!("Stored hash is corrupt: {}", e)))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(LedgerError::Security(format!("Verification failed: {}", e))),
    }
}
