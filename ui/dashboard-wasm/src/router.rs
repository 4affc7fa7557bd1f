//! Path-based routing between the login and dashboard screens.

use tk_dashboard_core::Route;

use crate::dom;

pub fn current_route() -> Route {
    let path = dom::window().location().pathname().unwrap_or_default();
    Route::from_path(&path)
}

/// Full page navigation; the new page boots the other screen.
pub fn navigate(route: Route) {
    if let Err(err) = dom::window().location().assign(route.path()) {
        gloo_console::error!(format!("navigation to {} failed: {err:?}", route.path()));
    }
}
