//! Access attribute configuration.

use serde::{Deserialize, Serialize};

/// Settings for the principal attributes handed to the policy engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Attribute key under which the caller's access profiles are placed.
    #[serde(default = "default_profiles_attribute")]
    pub profiles_attribute: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            profiles_attribute: default_profiles_attribute(),
        }
    }
}

/// Default attribute key for access profiles.
pub const ACCESS_PROFILES_ATTRIBUTE: &str = "accessProfiles";

fn default_profiles_attribute() -> String {
    ACCESS_PROFILES_ATTRIBUTE.to_string()
}
