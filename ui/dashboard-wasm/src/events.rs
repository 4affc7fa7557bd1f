//! Event binding for the dashboard screen.
//!
//! Async handlers are spawned with `wasm_bindgen_futures::spawn_local`; each
//! receives its own clone of the screen context.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget};

use crate::dashboard;
use crate::state::DashboardCtx;
use crate::wallet_ops;

fn listen<T>(target: &EventTarget, event: &str, cb: Closure<T>)
where
    T: ?Sized + WasmClosure,
{
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        gloo_console::error!(format!("binding {event} listener failed: {err:?}"));
    }
    cb.forget();
}

/// Helper: attach an async handler.
macro_rules! on_async {
    ($el:expr, $event:expr, $ctx:expr, $handler:path) => {{
        let ctx = $ctx.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let ctx = ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&ctx).await;
            });
        }) as Box<dyn FnMut(_)>);
        listen(&$el, $event, cb);
    }};
}

/// Helper: attach a sync handler.
macro_rules! on_sync {
    ($el:expr, $event:expr, $ctx:expr, $handler:path) => {{
        let ctx = $ctx.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            $handler(&ctx);
        }) as Box<dyn FnMut(_)>);
        listen(&$el, $event, cb);
    }};
}

/// Bind all dashboard listeners. Call once after the context is built.
pub fn bind_dashboard(ctx: &DashboardCtx) {
    let els = &ctx.els;

    // ── Header ──
    on_async!(els.logout_btn, "click", ctx, dashboard::on_logout);
    on_sync!(els.wallet_menu_btn, "click", ctx, dashboard::toggle_wallet_menu);
    on_sync!(els.more_menu_btn, "click", ctx, dashboard::toggle_more_menu);

    // ── Wallet menu ──
    {
        let ctx2 = ctx.clone();
        let cb = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(wallet_id) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-wallet-id]").ok().flatten())
                .and_then(|el| el.get_attribute("data-wallet-id"))
            else {
                return;
            };
            let ctx3 = ctx2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                dashboard::on_select_wallet(&ctx3, wallet_id).await;
            });
        }) as Box<dyn FnMut(_)>);
        listen(&els.wallet_menu_items, "click", cb);
    }
    on_sync!(els.add_wallet_item, "click", ctx, wallet_ops::open_create_dialog);
    on_sync!(els.delete_wallet_item, "click", ctx, wallet_ops::open_delete_dialog);

    // ── Create dialog ──
    on_sync!(els.wallet_name_input, "input", ctx, wallet_ops::on_name_input);
    on_sync!(els.generate_seed_checkbox, "change", ctx, wallet_ops::on_mode_change);
    on_sync!(els.create_cancel_btn, "click", ctx, wallet_ops::close_create_dialog);
    on_async!(els.create_submit_btn, "click", ctx, wallet_ops::on_submit_create);

    // ── Delete dialog ──
    on_sync!(els.delete_cancel_btn, "click", ctx, wallet_ops::close_delete_dialog);
    on_async!(els.delete_confirm_btn, "click", ctx, wallet_ops::on_confirm_delete);
}
