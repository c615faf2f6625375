//! Commands for the User Profile context.

use uuid::Uuid;

/// Command to create the profile of a newly registered account.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The identity-provider user id.
    pub user_id: String,
    /// Display name reported by the identity provider.
    pub display_name: Option<String>,
    /// E-mail address reported by the identity provider.
    pub email: Option<String>,
}

/// Command to change the caller's preferences. Absent fields are kept.
#[derive(Debug, Clone)]
pub struct UpdatePreferences {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The caller whose profile is updated.
    pub user_id: String,
    /// New language tag.
    pub language: Option<String>,
    /// New timezone.
    pub timezone: Option<String>,
    /// New notification preference.
    pub allow_notifications: Option<bool>,
}
