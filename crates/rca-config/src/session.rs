//! Defaults for unsaved investigation sessions.

use serde::{Deserialize, Serialize};

fn default_permissions() -> String {
    "READ_WRITE".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Owner recorded on new investigations (the authenticated user name).
    #[serde(default)]
    pub owner: String,

    /// Permission level recorded on new investigations.
    #[serde(default = "default_permissions")]
    pub permissions: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            permissions: default_permissions(),
        }
    }
}
