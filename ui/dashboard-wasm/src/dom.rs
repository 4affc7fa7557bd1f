//! DOM element bindings.
//!
//! Both screens live in `index.html`; only the one matching the route is
//! shown. All fields are resolved once at startup.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_inner_html("");
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_visible(el: &Element, visible: bool) {
    toggle_class(el, "hidden", !visible);
}

pub fn is_visible(el: &Element) -> bool {
    !el.class_list().contains("hidden")
}

pub fn set_busy(btn: &HtmlButtonElement, spinner: &Element, busy: bool) {
    btn.set_disabled(busy);
    set_visible(spinner, busy);
}

/// Show `message` in an inline slot, or hide the slot when `None`.
pub fn set_message(el: &Element, message: Option<&str>) {
    match message {
        Some(msg) => {
            set_text(el, msg);
            set_visible(el, true);
        }
        None => {
            set_text(el, "");
            set_visible(el, false);
        }
    }
}

// ── Elements struct ──

/// All DOM element references used by the dashboard shell.
#[derive(Clone)]
pub struct Elements {
    // Login
    pub login_screen: Element,
    pub auth_container: Element,

    // Dashboard
    pub dashboard_screen: Element,
    pub auth_iframe_container: Element,
    pub logout_btn: HtmlButtonElement,
    pub welcome_text: Element,
    pub wallet_menu_btn: HtmlButtonElement,
    pub selected_wallet_name: Element,
    pub wallet_menu: Element,
    pub wallet_menu_items: Element,
    pub add_wallet_item: HtmlElement,
    pub more_menu_btn: HtmlButtonElement,
    pub more_menu: Element,
    pub delete_wallet_item: HtmlButtonElement,
    pub delete_wallet_hint: Element,
    pub wallet_status: Element,
    pub account_list: Element,

    // Create wallet dialog
    pub create_dialog: Element,
    pub wallet_name_input: HtmlInputElement,
    pub generate_seed_checkbox: HtmlInputElement,
    pub import_section: Element,
    pub import_iframe_container: Element,
    pub create_cancel_btn: HtmlButtonElement,
    pub create_submit_btn: HtmlButtonElement,
    pub create_submit_label: Element,
    pub create_spinner: Element,
    pub create_error: Element,

    // Delete wallet dialog
    pub delete_dialog: Element,
    pub delete_wallet_name: Element,
    pub delete_cancel_btn: HtmlButtonElement,
    pub delete_confirm_btn: HtmlButtonElement,
    pub delete_spinner: Element,
    pub delete_error: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id))
        })?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document has loaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            login_screen: get_el!("loginScreen"),
            auth_container: get_el!("authContainer"),

            dashboard_screen: get_el!("dashboardScreen"),
            auth_iframe_container: get_el!("authIframeContainer"),
            logout_btn: get_typed!(HtmlButtonElement, "logoutBtn"),
            welcome_text: get_el!("welcomeText"),
            wallet_menu_btn: get_typed!(HtmlButtonElement, "walletMenuBtn"),
            selected_wallet_name: get_el!("selectedWalletName"),
            wallet_menu: get_el!("walletMenu"),
            wallet_menu_items: get_el!("walletMenuItems"),
            add_wallet_item: get_typed!(HtmlElement, "addWalletItem"),
            more_menu_btn: get_typed!(HtmlButtonElement, "moreMenuBtn"),
            more_menu: get_el!("moreMenu"),
            delete_wallet_item: get_typed!(HtmlButtonElement, "deleteWalletItem"),
            delete_wallet_hint: get_el!("deleteWalletHint"),
            wallet_status: get_el!("walletStatus"),
            account_list: get_el!("accountList"),

            create_dialog: get_el!("createWalletDialog"),
            wallet_name_input: get_typed!(HtmlInputElement, "walletNameInput"),
            generate_seed_checkbox: get_typed!(HtmlInputElement, "generateSeedCheckbox"),
            import_section: get_el!("importSection"),
            import_iframe_container: get_el!("importIframeContainer"),
            create_cancel_btn: get_typed!(HtmlButtonElement, "createCancelBtn"),
            create_submit_btn: get_typed!(HtmlButtonElement, "createSubmitBtn"),
            create_submit_label: get_el!("createSubmitLabel"),
            create_spinner: get_el!("createSpinner"),
            create_error: get_el!("createError"),

            delete_dialog: get_el!("deleteWalletDialog"),
            delete_wallet_name: get_el!("deleteWalletName"),
            delete_cancel_btn: get_typed!(HtmlButtonElement, "deleteCancelBtn"),
            delete_confirm_btn: get_typed!(HtmlButtonElement, "deleteConfirmBtn"),
            delete_spinner: get_el!("deleteSpinner"),
            delete_error: get_el!("deleteError"),
        })
    }
}
