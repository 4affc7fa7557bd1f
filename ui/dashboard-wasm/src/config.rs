//! Loads `dashboard-config.json` served next to `index.html`.

use tk_dashboard_core::DashboardConfig;

use crate::api;

pub const CONFIG_URL: &str = "/dashboard-config.json";

pub async fn load() -> Result<DashboardConfig, String> {
    let raw = api::fetch_text(CONFIG_URL)
        .await
        .map_err(|e| format!("loading {CONFIG_URL}: {e}"))?;
    DashboardConfig::from_json(&raw).map_err(|e| e.to_string())
}
