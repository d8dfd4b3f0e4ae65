//! Notification profile repository
//!
//! Stores sparse per-bill notification overrides in
//! notification_profiles.json, keyed by bill id.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{BillId, BillNotificationProfile};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::traits::NotificationProfileStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ProfileData {
    #[serde(default)]
    profiles: Vec<BillNotificationProfile>,
}

/// Repository for bill notification profiles
pub struct NotificationProfileRepository {
    path: PathBuf,
    profiles: RwLock<HashMap<BillId, BillNotificationProfile>>,
}

impl NotificationProfileRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Load profiles from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: ProfileData = read_json(&self.path)?;

        let mut profiles = self.profiles.write().map_err(lock_error)?;
        profiles.clear();
        for profile in file_data.profiles {
            profiles.insert(profile.bill_id, profile);
        }

        debug!(count = profiles.len(), "loaded notification profiles");
        Ok(())
    }

    /// Save profiles to disk
    pub fn save(&self) -> LedgerResult<()> {
        let profiles = self.profiles.read().map_err(lock_error)?;

        let mut list: Vec<_> = profiles.values().cloned().collect();
        list.sort_by(|a, b| a.bill_id.cmp(&b.bill_id));

        write_json_atomic(&self.path, &ProfileData { profiles: list })
    }
}

#[async_trait]
impl NotificationProfileStore for NotificationProfileRepository {
    async fn load_all(&self) -> LedgerResult<HashMap<BillId, BillNotificationProfile>> {
        Ok(self.profiles.read().map_err(lock_error)?.clone())
    }

    async fn save_profile(&self, profile: BillNotificationProfile) -> LedgerResult<()> {
        {
            let mut profiles = self.profiles.write().map_err(lock_error)?;
            profiles.insert(profile.bill_id, profile);
        }
        self.save()
    }

    async fn remove_profile(&self, bill_id: BillId) -> LedgerResult<bool> {
        let removed = {
            let mut profiles = self.profiles.write().map_err(lock_error)?;
            profiles.remove(&bill_id).is_some()
        };
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReminderKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_remove_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notification_profiles.json");
        let repo = NotificationProfileRepository::new(path.clone());
        repo.load().unwrap();

        let bill_id = BillId::new();
        let mut profile = BillNotificationProfile::default_for(bill_id);
        profile.type_override = Some(ReminderKind::Alarm);
        repo.save_profile(profile.clone()).await.unwrap();

        let repo2 = NotificationProfileRepository::new(path.clone());
        repo2.load().unwrap();
        assert_eq!(repo2.load_all().await.unwrap().get(&bill_id), Some(&profile));

        assert!(repo.remove_profile(bill_id).await.unwrap());
        assert!(!repo.remove_profile(bill_id).await.unwrap());

        let repo3 = NotificationProfileRepository::new(path);
        repo3.load().unwrap();
        assert!(repo3.load_all().await.unwrap().is_empty());
    }
}
