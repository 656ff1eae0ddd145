use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proof that a user is currently signed in, as reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Name used in greetings: the display name, else the local part of the
    /// e-mail address, else a generic "Reader".
    pub fn display_name(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }

        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "Reader".to_string())
    }
}
