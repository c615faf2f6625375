//! User profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Language tag assigned to new profiles.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Timezone assigned to new profiles.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Per-user settings, created when the account is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider user id.
    pub user_id: String,
    /// Display name.
    pub user_name: String,
    /// Preferred language tag.
    pub language: String,
    /// Preferred timezone.
    pub timezone: String,
    /// Whether the user accepts notifications.
    pub allow_notifications: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
