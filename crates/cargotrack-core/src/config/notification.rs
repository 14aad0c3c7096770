//! Notification feed configuration.

use serde::{Deserialize, Serialize};

/// Notification feed limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Maximum notifications retained (and listed) per recipient.
    #[serde(default = "default_max_per_recipient")]
    pub max_per_recipient: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_per_recipient: default_max_per_recipient(),
        }
    }
}

fn default_max_per_recipient() -> i64 {
    50
}
