//! Bill notification preferences
//!
//! Saves per-bill notification profiles. Profiles that end up equal to the
//! system default are deleted instead of stored, so "no profile" and
//! "default profile" are the same state. Every change requests a silent
//! reminder resync.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BillId, BillNotificationProfile, ReminderKind, ReminderTemplate};
use crate::storage::{NotificationProfileStore, Storage, TransactionStore};

use super::sync::{ScheduleSync, SyncMode, SyncOutcome};

/// What a profile save did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSaved {
    /// The profile as it now applies to the bill
    pub profile: BillNotificationProfile,
    /// False when the profile collapsed to the default and was removed
    pub stored: bool,
    pub sync: SyncOutcome,
}

/// Partial update applied on top of a bill's current profile
#[derive(Debug, Clone, Default)]
pub struct ProfileChange {
    pub template: Option<ReminderTemplate>,
    /// `Some("")` clears the channel
    pub channel_key: Option<String>,
    /// `Some("")` clears the sound
    pub sound_key: Option<String>,
    /// `Some(None)` clears the override
    pub type_override: Option<Option<ReminderKind>>,
}

/// Service for bill notification profiles
pub struct BillNotificationService {
    profiles: Arc<dyn NotificationProfileStore>,
    bills: Arc<dyn TransactionStore>,
    sync: Arc<ScheduleSync>,
}

impl BillNotificationService {
    pub fn new(
        profiles: Arc<dyn NotificationProfileStore>,
        bills: Arc<dyn TransactionStore>,
        sync: Arc<ScheduleSync>,
    ) -> Self {
        Self {
            profiles,
            bills,
            sync,
        }
    }

    pub fn from_storage(storage: &Storage, sync: Arc<ScheduleSync>) -> Self {
        Self::new(storage.profiles.clone(), storage.transactions.clone(), sync)
    }

    /// Stored profiles keyed by bill
    pub async fn profiles(&self) -> LedgerResult<HashMap<BillId, BillNotificationProfile>> {
        self.profiles.load_all().await
    }

    /// The profile that applies to a bill (the default when none is stored)
    pub async fn profile_for(&self, bill_id: BillId) -> LedgerResult<BillNotificationProfile> {
        Ok(self
            .profiles
            .load_all()
            .await?
            .remove(&bill_id)
            .unwrap_or_else(|| BillNotificationProfile::default_for(bill_id)))
    }

    /// Normalize and persist a profile, then request a silent resync
    pub async fn save(&self, profile: BillNotificationProfile) -> LedgerResult<ProfileSaved> {
        let profile = profile.normalized();
        profile
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if self.bills.bill(profile.bill_id).await?.is_none() {
            return Err(LedgerError::bill_not_found(profile.bill_id.to_string()));
        }

        let stored = if profile.is_default() {
            let removed = self.profiles.remove_profile(profile.bill_id).await?;
            info!(bill = %profile.bill_id, removed, "notification profile reset to default");
            false
        } else {
            self.profiles.save_profile(profile.clone()).await?;
            info!(
                bill = %profile.bill_id,
                template = %profile.template_key,
                "notification profile saved"
            );
            true
        };

        let sync = self.sync.request(SyncMode::Silent).await?;
        Ok(ProfileSaved {
            profile,
            stored,
            sync,
        })
    }

    /// Apply a partial change to the bill's current profile and save it
    pub async fn update(&self, bill_id: BillId, change: ProfileChange) -> LedgerResult<ProfileSaved> {
        let mut profile = self.profile_for(bill_id).await?;

        if let Some(template) = change.template {
            profile.template_key = template.key().to_string();
        }
        if let Some(channel) = change.channel_key {
            profile.channel_key = Some(channel);
        }
        if let Some(sound) = change.sound_key {
            profile.sound_key = Some(sound);
        }
        if let Some(kind) = change.type_override {
            profile.type_override = kind;
        }

        self.save(profile).await
    }

    /// Drop every override for a bill
    pub async fn reset(&self, bill_id: BillId) -> LedgerResult<ProfileSaved> {
        self.save(BillNotificationProfile::default_for(bill_id)).await
    }
}
