//! Dashboard orchestration independent of the rendering target.
//!
//! Every operation here is a short sequence of client calls. Network calls
//! and state changes are kept apart: the `fetch_*` functions only talk to the
//! client, the `apply_*` methods only mutate state, so a UI never needs to
//! hold a state borrow across an `.await`.

pub mod config;
pub mod create;
pub mod delete;
pub mod error;
pub mod import_frame;
pub mod login;
pub mod route;
pub mod session;
pub mod wallets;

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use route::Route;
