//! Wallet dashboard WASM front-end.
//!
//! Boots the screen matching the current path. The login screen mounts the
//! auth widget; the dashboard lists, creates, imports and deletes wallets
//! through the stamped wallet API.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod dom;
pub mod events;
pub mod icons;
pub mod login;
pub mod router;
pub mod sdk;
pub mod stamper;
pub mod state;
pub mod wallet_ops;

use tk_dashboard_core::Route;
use wasm_bindgen::prelude::*;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if let Err(err) = init().await {
        gloo_console::error!(err.clone());
        if let Some(slot) = dom::by_id("fatalError") {
            let text = err.as_string().unwrap_or_else(|| format!("{err:?}"));
            dom::set_message(&slot, Some(&text));
        }
        return Err(err);
    }
    Ok(())
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = config::load().await.map_err(|e| JsValue::from_str(&e))?;

    match router::current_route() {
        Route::Login => login::mount(&els, &config).await,
        Route::Dashboard => dashboard::mount(els, &config).await,
    }
}
