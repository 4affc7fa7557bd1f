//! Dashboard screen state.
//!
//! One `DashboardCtx` is built when the dashboard mounts and cloned into every
//! event handler. Borrows of the state never span an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use tk_api_types::User;
use tk_dashboard_core::create::CreateWalletForm;
use tk_dashboard_core::import_frame::ImportFrameSlot;
use tk_dashboard_core::wallets::WalletList;

use crate::dom::Elements;
use crate::sdk::{IframeFrameFactory, ImportFrameHandle, TurnkeyClient};

#[derive(Default)]
pub struct DashboardState {
    /// Set once credentials are injected; wallet fetches key on it.
    pub user: Option<User>,
    pub wallets: WalletList,
    pub create_form: CreateWalletForm,
    pub create_open: bool,
    pub delete_busy: bool,
    pub import_frame: ImportFrameSlot<Rc<ImportFrameHandle>>,
}

#[derive(Clone)]
pub struct DashboardCtx {
    pub els: Elements,
    pub client: Rc<TurnkeyClient>,
    pub frames: Rc<IframeFrameFactory>,
    state: Rc<RefCell<DashboardState>>,
}

impl DashboardCtx {
    pub fn new(els: Elements, client: TurnkeyClient, frames: IframeFrameFactory) -> Self {
        Self {
            els,
            client: Rc::new(client),
            frames: Rc::new(frames),
            state: Rc::new(RefCell::new(DashboardState::default())),
        }
    }

    /// Run a closure with shared read access to the state.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DashboardState) -> R,
    {
        f(&self.state.borrow())
    }

    /// Run a closure with mutable access to the state.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DashboardState) -> R,
    {
        f(&mut self.state.borrow_mut())
    }

    pub fn user(&self) -> Option<User> {
        self.with(|s| s.user.clone())
    }
}
