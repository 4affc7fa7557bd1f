//! Dashboard screen: session check, wallet menu and account rows.

use tk_api_types::{User, Wallet, WalletAccount};
use tk_dashboard_core::session::{self, SessionCheck};
use tk_dashboard_core::wallets::{self, WalletsState};
use tk_dashboard_core::DashboardConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use crate::dom::{self, Elements};
use crate::events;
use crate::icons;
use crate::router;
use crate::sdk::{self, IframeFrameFactory, LocalSessionStore, TurnkeyClient};
use crate::state::{DashboardCtx, DashboardState};

/// Read the stored session first; only a live one connects the auth frame
/// and injects its credential before anything is fetched.
pub async fn mount(els: Elements, config: &DashboardConfig) -> Result<(), JsValue> {
    let user = match session::check_session(&LocalSessionStore, sdk::now_ms()).await {
        Ok(SessionCheck::Live(user)) => user,
        Ok(SessionCheck::Redirect(route)) => {
            router::navigate(route);
            return Ok(());
        }
        Err(err) => return Err(JsValue::from_str(&err.to_string())),
    };

    dom::set_visible(&els.dashboard_screen, true);
    dom::set_text(&els.welcome_text, "Welcome, loading...");

    let client = TurnkeyClient::connect(config, &els.auth_iframe_container)
        .await
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    let frames = IframeFrameFactory::new(els.import_iframe_container.clone(), &config.import_iframe_url);
    let ctx = DashboardCtx::new(els, client, frames);
    events::bind_dashboard(&ctx);

    let user = session::authenticate(&*ctx.client, user)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    ctx.with_mut(|s| s.user = Some(user));
    render(&ctx);
    refresh_wallets(&ctx).await;
    Ok(())
}

/// Refetch the wallet list, select the first wallet and load its accounts.
pub async fn refresh_wallets(ctx: &DashboardCtx) {
    let Some(user) = ctx.user() else {
        return;
    };
    let fetched = wallets::fetch_wallets(&*ctx.client, &user).await;
    if let Err(err) = &fetched {
        gloo_console::error!(format!("Error fetching wallets: {err}"));
    }
    let next = ctx.with_mut(|s| s.wallets.apply_wallets(fetched));
    render(ctx);
    if let Some(wallet_id) = next {
        refresh_accounts(ctx, &user, &wallet_id).await;
    }
}

async fn refresh_accounts(ctx: &DashboardCtx, user: &User, wallet_id: &str) {
    let fetched = wallets::fetch_wallet_accounts(&*ctx.client, user, wallet_id).await;
    if let Err(err) = &fetched {
        gloo_console::error!(format!("Error fetching accounts of {wallet_id}: {err}"));
    }
    if ctx.with_mut(|s| s.wallets.apply_accounts(wallet_id, fetched)) {
        render(ctx);
    }
}

pub async fn on_select_wallet(ctx: &DashboardCtx, wallet_id: String) {
    close_menus(&ctx.els);
    let Some(user) = ctx.user() else {
        return;
    };
    let changed = ctx.with_mut(|s| s.wallets.select(&wallet_id));
    render(ctx);
    if let Some(wallet_id) = changed {
        refresh_accounts(ctx, &user, &wallet_id).await;
    }
}

pub async fn on_logout(ctx: &DashboardCtx) {
    close_menus(&ctx.els);
    match session::logout(&LocalSessionStore).await {
        Ok(route) => router::navigate(route),
        Err(err) => gloo_console::error!(format!("Error logging out: {err}")),
    }
}

// ── Menus ──

pub fn toggle_wallet_menu(ctx: &DashboardCtx) {
    let open = dom::is_visible(&ctx.els.wallet_menu);
    close_menus(&ctx.els);
    dom::set_visible(&ctx.els.wallet_menu, !open);
}

pub fn toggle_more_menu(ctx: &DashboardCtx) {
    let open = dom::is_visible(&ctx.els.more_menu);
    close_menus(&ctx.els);
    dom::set_visible(&ctx.els.more_menu, !open);
}

pub fn close_menus(els: &Elements) {
    dom::set_visible(&els.wallet_menu, false);
    dom::set_visible(&els.more_menu, false);
}

// ── Rendering ──

pub fn render(ctx: &DashboardCtx) {
    if let Err(err) = ctx.with(|s| render_state(&ctx.els, s)) {
        gloo_console::error!(format!("render failed: {err:?}"));
    }
}

fn render_state(els: &Elements, s: &DashboardState) -> Result<(), JsValue> {
    let username = s.user.as_ref().map_or("loading...", |u| u.username.as_str());
    dom::set_text(&els.welcome_text, &format!("Welcome, {username}"));

    let selected = s.wallets.selected();
    dom::set_text(&els.selected_wallet_name, selector_label(selected));

    let entry = s.wallets.delete_menu_entry();
    els.delete_wallet_item.set_disabled(!entry.enabled);
    dom::set_message(&els.delete_wallet_hint, entry.hint);

    match s.wallets.state() {
        WalletsState::NotLoaded => dom::set_message(&els.wallet_status, Some("Loading wallets...")),
        WalletsState::Loaded(list) if list.is_empty() => {
            dom::set_message(&els.wallet_status, Some("No wallets yet."))
        }
        WalletsState::Loaded(_) => dom::set_message(&els.wallet_status, None),
        WalletsState::Failed(reason) => dom::set_message(
            &els.wallet_status,
            Some(&format!("Could not load wallets: {reason}")),
        ),
    }

    render_wallet_menu(els, s.wallets.wallets().unwrap_or_default(), selected)?;
    render_accounts(els, s.wallets.accounts())
}

/// The selector shows the bare name; only menu entries fall back to the id.
fn selector_label(selected: Option<&Wallet>) -> &str {
    selected
        .map(|w| w.wallet_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("-")
}

/// Wallet entries carry `data-wallet-id`; clicks are delegated from the container.
fn render_wallet_menu(
    els: &Elements,
    wallets: &[Wallet],
    selected: Option<&Wallet>,
) -> Result<(), JsValue> {
    dom::clear(&els.wallet_menu_items);
    for wallet in wallets {
        let item = dom::create_element("button")?;
        item.set_class_name("menu-item");
        item.set_attribute("type", "button")?;
        item.set_attribute("data-wallet-id", &wallet.wallet_id)?;
        if selected.is_some_and(|w| w.wallet_id == wallet.wallet_id) {
            dom::add_class(&item, "menu-item--active");
        }
        dom::set_text(&item, wallet.display_name());
        els.wallet_menu_items.append_child(&item)?;
    }
    Ok(())
}

fn render_accounts(els: &Elements, accounts: &[WalletAccount]) -> Result<(), JsValue> {
    dom::clear(&els.account_list);
    for account in accounts {
        let row = dom::create_element("li")?;
        row.set_class_name("account-row");

        if let Some(src) = icons::address_icon(account.address_format) {
            let icon: HtmlImageElement = dom::create_element("img")?.dyn_into()?;
            icon.set_src(src);
            icon.set_alt(icons::chain_label(account.address_format));
            icon.set_class_name("account-icon");
            row.append_child(&icon)?;
        }

        let address = dom::create_element("span")?;
        address.set_class_name("account-address");
        address.set_attribute("title", &account.address)?;
        dom::set_text(&address, &account.short_address());
        row.append_child(&address)?;

        els.account_list.append_child(&row)?;
    }
    Ok(())
}
