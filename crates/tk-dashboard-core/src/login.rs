//! Login screen logic. The authentication itself happens in the external
//! auth widget; this module only decides whether to show it and where to go
//! afterwards.

use crate::error::Result;
use crate::route::Route;
use serde::Serialize;
use tk_client::SessionStore;
use tracing::{error, info};

/// Methods the auth widget offers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    pub email_enabled: bool,
    pub passkey_enabled: bool,
    pub phone_enabled: bool,
    pub google_enabled: bool,
    pub apple_enabled: bool,
    pub facebook_enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email_enabled: true,
            passkey_enabled: true,
            phone_enabled: true,
            google_enabled: false,
            apple_enabled: false,
            facebook_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethodGroup {
    Socials,
    Email,
    Phone,
    Passkey,
}

/// Display order of the method groups in the widget.
pub const CONFIG_ORDER: [AuthMethodGroup; 4] = [
    AuthMethodGroup::Socials,
    AuthMethodGroup::Email,
    AuthMethodGroup::Phone,
    AuthMethodGroup::Passkey,
];

/// Everything handed to the widget when it is mounted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthWidgetOptions {
    pub auth_config: AuthConfig,
    pub config_order: Vec<AuthMethodGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    pub organization_id: String,
}

impl AuthWidgetOptions {
    pub fn new(organization_id: &str, rp_id: Option<String>) -> Self {
        Self {
            auth_config: AuthConfig::default(),
            config_order: CONFIG_ORDER.to_vec(),
            rp_id,
            organization_id: organization_id.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDecision {
    /// A live session exists; skip the widget.
    ProceedTo(Route),
    ShowAuth,
}

/// Decide, before the widget is mounted, whether the user is already logged in.
pub async fn check_existing_session<S>(store: &S, now_epoch_ms: u64) -> Result<LoginDecision>
where
    S: SessionStore + ?Sized,
{
    match store.read_write_session().await? {
        Some(session) if session.is_live(now_epoch_ms) => {
            info!("live session found, skipping login");
            Ok(LoginDecision::ProceedTo(Route::Dashboard))
        }
        _ => Ok(LoginDecision::ShowAuth),
    }
}

pub fn on_auth_success() -> Route {
    info!("authentication succeeded");
    Route::Dashboard
}

/// Widget errors are only logged; the widget stays mounted for another try.
pub fn on_auth_error(message: &str) {
    error!("authentication failed: {message}");
}
