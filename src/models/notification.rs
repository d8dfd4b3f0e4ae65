//! Bill notification profiles
//!
//! A profile overrides how reminders for one bill are delivered. Storage is
//! kept sparse: a profile whose every field equals the system default is
//! never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BillId;

/// Template key used when a bill has no profile
pub const DEFAULT_TEMPLATE_KEY: &str = "standard";

/// Reminder templates, keyed by a stable string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderTemplate {
    /// Three days before the due date
    Standard,
    /// A week before the due date
    Early,
    /// On the due date itself
    DayOf,
}

impl ReminderTemplate {
    pub fn all() -> [ReminderTemplate; 3] {
        [Self::Standard, Self::Early, Self::DayOf]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Standard => DEFAULT_TEMPLATE_KEY,
            Self::Early => "early",
            Self::DayOf => "day_of",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.key() == key.trim())
    }

    /// How many days before the due date the reminder fires
    pub fn lead_days(&self) -> i64 {
        match self {
            Self::Standard => 3,
            Self::Early => 7,
            Self::DayOf => 0,
        }
    }
}

impl fmt::Display for ReminderTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Delivery style override for a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Silent,
    Alert,
    Alarm,
}

impl ReminderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Some(Self::Silent),
            "alert" => Some(Self::Alert),
            "alarm" => Some(Self::Alarm),
            _ => None,
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::Alert => write!(f, "alert"),
            Self::Alarm => write!(f, "alarm"),
        }
    }
}

/// Per-bill notification overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillNotificationProfile {
    pub bill_id: BillId,

    #[serde(default = "default_template_key")]
    pub template_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_override: Option<ReminderKind>,
}

fn default_template_key() -> String {
    DEFAULT_TEMPLATE_KEY.to_string()
}

impl BillNotificationProfile {
    /// A profile with every field at its default
    pub fn default_for(bill_id: BillId) -> Self {
        Self {
            bill_id,
            template_key: default_template_key(),
            channel_key: None,
            sound_key: None,
            type_override: None,
        }
    }

    /// Trim keys, turning blank strings into "not set"
    pub fn normalized(mut self) -> Self {
        let template = self.template_key.trim();
        self.template_key = if template.is_empty() {
            default_template_key()
        } else {
            template.to_string()
        };
        self.channel_key = non_blank(self.channel_key);
        self.sound_key = non_blank(self.sound_key);
        self
    }

    /// True when nothing differs from the system default
    pub fn is_default(&self) -> bool {
        self.template_key == DEFAULT_TEMPLATE_KEY
            && self.channel_key.is_none()
            && self.sound_key.is_none()
            && self.type_override.is_none()
    }

    /// The template this profile selects; unknown keys fall back to standard
    pub fn template(&self) -> ReminderTemplate {
        ReminderTemplate::from_key(&self.template_key).unwrap_or(ReminderTemplate::Standard)
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if ReminderTemplate::from_key(&self.template_key).is_none() {
            return Err(ProfileValidationError::UnknownTemplate(
                self.template_key.clone(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validation errors for notification profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    UnknownTemplate(String),
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTemplate(key) => write!(
                f,
                "Unknown reminder template '{}'. Valid templates: standard, early, day_of",
                key
            ),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_default() {
        let profile = BillNotificationProfile::default_for(BillId::new());
        assert!(profile.is_default());
        assert_eq!(profile.template(), ReminderTemplate::Standard);
    }

    #[test]
    fn test_blank_overrides_normalize_to_default() {
        let mut profile = BillNotificationProfile::default_for(BillId::new());
        profile.template_key = "  ".into();
        profile.channel_key = Some("".into());
        profile.sound_key = Some("   ".into());

        let profile = profile.normalized();
        assert!(profile.is_default());
    }

    #[test]
    fn test_any_override_is_not_default() {
        let bill_id = BillId::new();

        let mut profile = BillNotificationProfile::default_for(bill_id);
        profile.sound_key = Some("chime".into());
        assert!(!profile.is_default());

        let mut profile = BillNotificationProfile::default_for(bill_id);
        profile.template_key = "early".into();
        assert!(!profile.is_default());

        let mut profile = BillNotificationProfile::default_for(bill_id);
        profile.type_override = Some(ReminderKind::Alarm);
        assert!(!profile.is_default());
    }

    #[test]
    fn test_validate_template() {
        let mut profile = BillNotificationProfile::default_for(BillId::new());
        profile.template_key = "yearly".into();
        assert!(matches!(
            profile.validate(),
            Err(ProfileValidationError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_lead_days() {
        assert_eq!(ReminderTemplate::Standard.lead_days(), 3);
        assert_eq!(ReminderTemplate::from_key("early"), Some(ReminderTemplate::Early));
        assert_eq!(ReminderTemplate::from_key("day_of").map(|t| t.lead_days()), Some(0));
    }

    #[test]
    fn test_serialization_skips_empty_overrides() {
        let profile = BillNotificationProfile::default_for(BillId::new());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("channel_key").is_none());
        assert_eq!(json["template_key"], "standard");
    }
}
