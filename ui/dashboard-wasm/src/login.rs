//! Login screen. Hosts the auth widget provided by the page as
//! `window.turnkeyAuth`.

use js_sys::Function;
use serde::Serialize;
use tk_dashboard_core::DashboardConfig;
use tk_dashboard_core::login::{self, AuthWidgetOptions, LoginDecision};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{self, Elements};
use crate::router;
use crate::sdk::{self, LocalSessionStore};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = turnkeyAuth, js_name = mount, catch)]
    fn mount_auth_widget(
        container: &Element,
        options: &JsValue,
        on_success: &Function,
        on_error: &Function,
    ) -> Result<(), JsValue>;
}

/// Skip straight to the dashboard when a live session exists; otherwise
/// mount the widget.
pub async fn mount(els: &Elements, config: &DashboardConfig) -> Result<(), JsValue> {
    match login::check_existing_session(&LocalSessionStore, sdk::now_ms()).await {
        Ok(LoginDecision::ProceedTo(route)) => {
            router::navigate(route);
            return Ok(());
        }
        Ok(LoginDecision::ShowAuth) => {}
        Err(err) => gloo_console::warn!(format!("session check failed: {err}")),
    }
    dom::set_visible(&els.login_screen, true);

    let options = AuthWidgetOptions::new(&config.default_organization_id, config.rp_id.clone());
    let options = options.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;

    let on_success = Closure::<dyn FnMut()>::new(|| {
        router::navigate(login::on_auth_success());
    });
    let on_error = Closure::<dyn FnMut(JsValue)>::new(|err: JsValue| {
        let message = err.as_string().unwrap_or_else(|| format!("{err:?}"));
        gloo_console::error!(format!("Auth error: {message}"));
        login::on_auth_error(&message);
    });

    mount_auth_widget(
        &els.auth_container,
        &options,
        on_success.as_ref().unchecked_ref(),
        on_error.as_ref().unchecked_ref(),
    )?;
    on_success.forget();
    on_error.forget();
    Ok(())
}
