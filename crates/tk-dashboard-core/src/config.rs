//! Runtime configuration supplied by the hosting page.
//!
//! Loaded from `dashboard-config.json`. Only the organization id is required;
//! the endpoints default to the hosted backend.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://api.turnkey.com";
pub const DEFAULT_AUTH_IFRAME_URL: &str = "https://auth.turnkey.com";
pub const DEFAULT_IMPORT_IFRAME_URL: &str = "https://import.turnkey.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub default_organization_id: String,
    /// WebAuthn relying party; passed through to the auth widget.
    #[serde(default)]
    pub rp_id: Option<String>,
    #[serde(default = "default_auth_iframe_url")]
    pub auth_iframe_url: String,
    #[serde(default = "default_import_iframe_url")]
    pub import_iframe_url: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_auth_iframe_url() -> String {
    DEFAULT_AUTH_IFRAME_URL.to_owned()
}

fn default_import_iframe_url() -> String {
    DEFAULT_IMPORT_IFRAME_URL.to_owned()
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: DashboardConfig = serde_json::from_str(raw)
            .map_err(|err| DashboardError::InvalidConfig(err.to_string()))?;
        config.api_base_url = config.api_base_url.trim().trim_end_matches('/').to_owned();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_organization_id.trim().is_empty() {
            return Err(DashboardError::InvalidConfig(
                "defaultOrganizationId is required".to_owned(),
            ));
        }
        for (field, value) in [
            ("apiBaseUrl", &self.api_base_url),
            ("authIframeUrl", &self.auth_iframe_url),
            ("importIframeUrl", &self.import_iframe_url),
        ] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(DashboardError::InvalidConfig(format!(
                    "{field} must be an http(s) URL, got '{value}'"
                )));
            }
        }
        Ok(())
    }
}
