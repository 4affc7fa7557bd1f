//! Create and delete dialogs.
//!
//! Failures are logged, shown inline in the dialog and the buttons are
//! re-enabled so the user can retry or cancel.

use std::rc::Rc;

use tk_client::{IMPORT_FRAME_ELEMENT_ID, ImportFrameFactory};
use tk_dashboard_core::create::{self, CreateMode};
use tk_dashboard_core::delete;
use tk_dashboard_core::import_frame::FrameClaim;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dashboard;
use crate::dom;
use crate::state::DashboardCtx;

// ── Create dialog ──

pub fn open_create_dialog(ctx: &DashboardCtx) {
    dashboard::close_menus(&ctx.els);
    ctx.with_mut(|s| s.create_open = true);
    dom::set_message(&ctx.els.create_error, None);
    render_create_dialog(ctx);
    dom::set_visible(&ctx.els.create_dialog, true);
    schedule_import_frame(ctx);
}

pub fn close_create_dialog(ctx: &DashboardCtx) {
    let closed = ctx.with_mut(|s| {
        if s.create_form.busy {
            return false;
        }
        s.create_open = false;
        true
    });
    if closed {
        dom::set_visible(&ctx.els.create_dialog, false);
        release_import_frame(ctx);
    }
}

fn render_create_dialog(ctx: &DashboardCtx) {
    let els = &ctx.els;
    ctx.with(|s| {
        let form = &s.create_form;
        if els.wallet_name_input.value() != form.name {
            els.wallet_name_input.set_value(&form.name);
        }
        els.generate_seed_checkbox
            .set_checked(form.mode == CreateMode::Generate);
        els.wallet_name_input.set_disabled(form.busy);
        els.generate_seed_checkbox.set_disabled(form.busy);
        els.create_cancel_btn.set_disabled(form.busy);
        dom::set_visible(&els.import_section, form.mode == CreateMode::Import);
        dom::set_text(&els.create_submit_label, form.mode.submit_label());
        dom::set_busy(&els.create_submit_btn, &els.create_spinner, form.busy);
    });
}

pub fn on_name_input(ctx: &DashboardCtx) {
    let name = ctx.els.wallet_name_input.value();
    ctx.with_mut(|s| s.create_form.name = name);
}

pub fn on_mode_change(ctx: &DashboardCtx) {
    let mode = CreateMode::from_generate_checkbox(ctx.els.generate_seed_checkbox.checked());
    ctx.with_mut(|s| {
        if s.create_form.mode != mode {
            s.create_form.toggle_mode();
        }
    });
    render_create_dialog(ctx);
    match mode {
        CreateMode::Import => schedule_import_frame(ctx),
        CreateMode::Generate => release_import_frame(ctx),
    }
}

/// Build the import frame on the next animation frame, once its container is laid out.
fn schedule_import_frame(ctx: &DashboardCtx) {
    let ctx = ctx.clone();
    let cb = Closure::once_into_js(move || {
        wasm_bindgen_futures::spawn_local(async move {
            init_import_frame(&ctx).await;
        });
    });
    if let Err(err) = dom::window().request_animation_frame(cb.unchecked_ref()) {
        gloo_console::error!(format!("could not schedule import frame: {err:?}"));
    }
}

async fn init_import_frame(ctx: &DashboardCtx) {
    let present = ctx.frames.frame_exists(IMPORT_FRAME_ELEMENT_ID);
    let claim = ctx.with_mut(|s| {
        s.import_frame
            .claim(s.create_open, s.create_form.mode, present)
    });
    if claim != FrameClaim::Construct {
        return;
    }

    let created = ctx.frames.create_frame(IMPORT_FRAME_ELEMENT_ID).await;
    if let Err(err) = &created {
        gloo_console::error!(format!("Error initializing import iframe: {err:#}"));
    }
    // Dropping a stale frame removes its element from the document.
    let stale = ctx.with_mut(|s| {
        s.import_frame
            .install(created.map(Rc::new), s.create_open, s.create_form.mode)
    });
    drop(stale);
}

/// Drop the frame; its element leaves the document with it.
fn release_import_frame(ctx: &DashboardCtx) {
    let frame = ctx.with_mut(|s| s.import_frame.reset());
    drop(frame);
}

pub async fn on_submit_create(ctx: &DashboardCtx) {
    let Some(user) = ctx.user() else {
        return;
    };
    let Some((form, frame)) = ctx.with_mut(|s| {
        if s.create_form.busy {
            return None;
        }
        s.create_form.busy = true;
        Some((s.create_form.clone(), s.import_frame.frame().cloned()))
    }) else {
        return;
    };
    dom::set_message(&ctx.els.create_error, None);
    render_create_dialog(ctx);

    let result = create::submit(&form, &*ctx.client, frame.as_deref(), &user).await;
    drop(frame);

    match result {
        Ok(wallet_id) => {
            gloo_console::log!(format!("wallet {wallet_id} ready"));
            dashboard::refresh_wallets(ctx).await;
            ctx.with_mut(|s| s.create_form.busy = false);
            render_create_dialog(ctx);
            close_create_dialog(ctx);
        }
        Err(err) => {
            gloo_console::error!(format!("Error creating wallet: {err}"));
            ctx.with_mut(|s| s.create_form.busy = false);
            render_create_dialog(ctx);
            dom::set_message(&ctx.els.create_error, Some(&err.to_string()));
        }
    }
}

// ── Delete dialog ──

pub fn open_delete_dialog(ctx: &DashboardCtx) {
    dashboard::close_menus(&ctx.els);
    let Some(name) = ctx.with(|s| {
        s.wallets
            .delete_dialog_wallet()
            .map(|w| w.display_name().to_owned())
    }) else {
        return;
    };
    dom::set_text(&ctx.els.delete_wallet_name, &name);
    dom::set_message(&ctx.els.delete_error, None);
    set_delete_busy(ctx, false);
    dom::set_visible(&ctx.els.delete_dialog, true);
}

pub fn close_delete_dialog(ctx: &DashboardCtx) {
    if !ctx.with(|s| s.delete_busy) {
        dom::set_visible(&ctx.els.delete_dialog, false);
    }
}

fn set_delete_busy(ctx: &DashboardCtx, busy: bool) {
    ctx.with_mut(|s| s.delete_busy = busy);
    ctx.els.delete_cancel_btn.set_disabled(busy);
    dom::set_busy(&ctx.els.delete_confirm_btn, &ctx.els.delete_spinner, busy);
}

pub async fn on_confirm_delete(ctx: &DashboardCtx) {
    let Some(user) = ctx.user() else {
        return;
    };
    let target = ctx.with(|s| {
        if s.delete_busy {
            return None;
        }
        s.wallets.delete_dialog_wallet().map(|w| w.wallet_id.clone())
    });
    let Some(wallet_id) = target else {
        close_delete_dialog(ctx);
        return;
    };

    set_delete_busy(ctx, true);
    dom::set_message(&ctx.els.delete_error, None);
    let result = delete::delete_wallets(&*ctx.client, user.organization_id(), vec![wallet_id]).await;
    dashboard::refresh_wallets(ctx).await;
    set_delete_busy(ctx, false);

    match result {
        Ok(_) => close_delete_dialog(ctx),
        Err(err) => {
            gloo_console::error!(format!("Error deleting wallet: {err}"));
            dom::set_message(&ctx.els.delete_error, Some(&err.to_string()));
        }
    }
}
