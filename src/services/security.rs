//! Security service
//!
//! Manages the app passcode and the memorable word used to recover it.
//! Only Argon2id hashes reach the secret store.

use std::sync::Arc;

use tracing::{info, warn};

use crate::crypto::{hash_secret, verify_secret, HashParams, SecureString};
use crate::error::{LedgerError, LedgerResult};
use crate::storage::{SecretStore, Storage};

const PASSCODE_KEY: &str = "passcode";
const MEMORABLE_WORD_KEY: &str = "memorable_word";

const PASSCODE_MIN_DIGITS: usize = 4;
const PASSCODE_MAX_DIGITS: usize = 8;
const MEMORABLE_WORD_MIN_CHARS: usize = 4;

/// Which secrets are currently set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityStatus {
    pub passcode: bool,
    pub memorable_word: bool,
}

/// Service for passcode and memorable word management
pub struct SecurityService {
    secrets: Arc<dyn SecretStore>,
    params: HashParams,
}

impl SecurityService {
    pub fn new(secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            secrets,
            params: HashParams::default(),
        }
    }

    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(storage.secrets.clone())
    }

    /// Override the Argon2 cost parameters used for new hashes
    pub fn with_params(mut self, params: HashParams) -> Self {
        self.params = params;
        self
    }

    pub async fn has_passcode(&self) -> LedgerResult<bool> {
        Ok(self.secrets.get(PASSCODE_KEY).await?.is_some())
    }

    pub async fn has_memorable_word(&self) -> LedgerResult<bool> {
        Ok(self.secrets.get(MEMORABLE_WORD_KEY).await?.is_some())
    }

    pub async fn status(&self) -> LedgerResult<SecurityStatus> {
        Ok(SecurityStatus {
            passcode: self.has_passcode().await?,
            memorable_word: self.has_memorable_word().await?,
        })
    }

    /// Set or replace the passcode (4 to 8 digits)
    pub async fn set_passcode(&self, passcode: &SecureString) -> LedgerResult<()> {
        validate_passcode(passcode)?;
        let hash = hash_secret(passcode, &self.params)?;
        self.secrets.put(PASSCODE_KEY, hash).await?;
        info!("passcode updated");
        Ok(())
    }

    /// Set or replace the memorable word
    pub async fn set_memorable_word(&self, word: &SecureString) -> LedgerResult<()> {
        let normalized = normalize_word(word)?;
        let hash = hash_secret(&normalized, &self.params)?;
        self.secrets.put(MEMORABLE_WORD_KEY, hash).await?;
        info!("memorable word updated");
        Ok(())
    }

    /// False when no passcode is set
    pub async fn verify_passcode(&self, passcode: &SecureString) -> LedgerResult<bool> {
        match self.secrets.get(PASSCODE_KEY).await? {
            Some(hash) => {
                let ok = verify_secret(passcode, &hash)?;
                if !ok {
                    warn!("passcode verification failed");
                }
                Ok(ok)
            }
            None => Ok(false),
        }
    }

    /// Case-insensitive; false when no word is set
    pub async fn verify_memorable_word(&self, word: &SecureString) -> LedgerResult<bool> {
        let Some(hash) = self.secrets.get(MEMORABLE_WORD_KEY).await? else {
            return Ok(false);
        };
        let normalized = word.trimmed().to_lowercase();
        verify_secret(&normalized, &hash)
    }

    /// Forget the passcode and the memorable word
    pub async fn reset_all_security_state(&self) -> LedgerResult<()> {
        self.secrets.clear().await?;
        info!("security state reset");
        Ok(())
    }
}

fn validate_passcode(passcode: &str) -> LedgerResult<()> {
    let len = passcode.len();
    if !(PASSCODE_MIN_DIGITS..=PASSCODE_MAX_DIGITS).contains(&len)
        || !passcode.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(LedgerError::Validation(format!(
            "Passcode must be {} to {} digits",
            PASSCODE_MIN_DIGITS, PASSCODE_MAX_DIGITS
        )));
    }
    Ok(())
}

fn normalize_word(word: &SecureString) -> LedgerResult<SecureString> {
    let trimmed = word.trimmed();
    if trimmed.chars().count() < MEMORABLE_WORD_MIN_CHARS {
        return Err(LedgerError::Validation(format!(
            "Memorable word must be at least {} characters",
            MEMORABLE_WORD_MIN_CHARS
        )));
    }
    Ok(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileSecretStore;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> (Arc<FileSecretStore>, SecurityService) {
        let store = Arc::new(FileSecretStore::new(temp_dir.path().join("security.json")));
        let service = SecurityService::new(store.clone()).with_params(HashParams {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        });
        (store, service)
    }

    #[tokio::test]
    async fn test_passcode_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let (store, service) = service(&temp_dir);
        assert!(!service.has_passcode().await.unwrap());

        service.set_passcode(&"1234".into()).await.unwrap();
        assert!(service.has_passcode().await.unwrap());
        assert!(service.verify_passcode(&"1234".into()).await.unwrap());
        assert!(!service.verify_passcode(&"4321".into()).await.unwrap());

        let stored = store.get("passcode").await.unwrap().unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("1234"));
    }

    #[tokio::test]
    async fn test_passcode_rules() {
        let temp_dir = TempDir::new().unwrap();
        let (_store, service) = service(&temp_dir);

        for bad in ["123", "123456789", "12a4", ""] {
            let err = service.set_passcode(&bad.into()).await.unwrap_err();
            assert!(err.is_validation(), "{bad} should be rejected");
        }
        service.set_passcode(&"12345678".into()).await.unwrap();
    }

    #[tokio::test]
    async fn test_memorable_word_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let (_store, service) = service(&temp_dir);

        service.set_memorable_word(&"  Lighthouse ".into()).await.unwrap();
        assert!(service.verify_memorable_word(&"LIGHTHOUSE".into()).await.unwrap());
        assert!(service.verify_memorable_word(&"lighthouse".into()).await.unwrap());
        assert!(!service.verify_memorable_word(&"harbour".into()).await.unwrap());

        let err = service.set_memorable_word(&" ab ".into()).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_verify_without_secret_is_false() {
        let temp_dir = TempDir::new().unwrap();
        let (_store, service) = service(&temp_dir);
        assert!(!service.verify_passcode(&"1234".into()).await.unwrap());
        assert!(!service.verify_memorable_word(&"word".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let temp_dir = TempDir::new().unwrap();
        let (_store, service) = service(&temp_dir);
        service.set_passcode(&"2468".into()).await.unwrap();
        service.set_memorable_word(&"harbour".into()).await.unwrap();

        service.reset_all_security_state().await.unwrap();
        assert_eq!(
            service.status().await.unwrap(),
            SecurityStatus {
                passcode: false,
                memorable_word: false
            }
        );
    }
}
