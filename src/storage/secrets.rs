//! Secret store backed by security.json
//!
//! Holds opaque strings (Argon2 PHC hashes in practice). Nothing in here
//! knows how the values were produced.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::LedgerResult;

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::traits::SecretStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SecretData {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// File-backed secret store
pub struct FileSecretStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileSecretStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load entries from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: SecretData = read_json(&self.path)?;
        *self.entries.write().map_err(lock_error)? = file_data.entries;
        Ok(())
    }

    fn save(&self) -> LedgerResult<()> {
        let entries = self.entries.read().map_err(lock_error)?.clone();
        write_json_atomic(&self.path, &SecretData { entries })
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        Ok(self.entries.read().map_err(lock_error)?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> LedgerResult<()> {
        self.entries
            .write()
            .map_err(lock_error)?
            .insert(key.to_string(), value);
        self.save()
    }

    async fn delete(&self, key: &str) -> LedgerResult<bool> {
        let existed = self.entries.write().map_err(lock_error)?.remove(key).is_some();
        if existed {
            self.save()?;
        }
        Ok(existed)
    }

    async fn clear(&self) -> LedgerResult<()> {
        self.entries.write().map_err(lock_error)?.clear();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_delete() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("security.json");
        let store = FileSecretStore::new(path.clone());
        store.load().unwrap();

        store.put("passcode", "hash".into()).await.unwrap();
        assert_eq!(store.get("passcode").await.unwrap().as_deref(), Some("hash"));

        let reloaded = FileSecretStore::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get("passcode").await.unwrap().as_deref(), Some("hash"));

        assert!(store.delete("passcode").await.unwrap());
        assert!(!store.delete("passcode").await.unwrap());
        assert_eq!(store.get("passcode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSecretStore::new(temp_dir.path().join("security.json"));

        store.put("a", "1".into()).await.unwrap();
        store.put("b", "2".into()).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), None);
    }
}
