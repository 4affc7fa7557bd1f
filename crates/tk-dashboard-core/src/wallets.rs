//! Wallet list, selection and accounts of the selected wallet.

use crate::error::Result;
use tk_api_types::{User, Wallet, WalletAccount};
use tk_client::WalletClient;
use tracing::{debug, info, warn};

pub const ONLY_WALLET_HINT: &str = "You cannot delete your only wallet!";

/// What the last wallet fetch produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WalletsState {
    #[default]
    NotLoaded,
    Loaded(Vec<Wallet>),
    /// The fetch failed; kept apart from an empty list.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMenuEntry {
    pub enabled: bool,
    pub hint: Option<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct WalletList {
    wallets: WalletsState,
    selected: Option<Wallet>,
    accounts: Vec<WalletAccount>,
}

/// List every wallet of the user's organization. A missing payload is an empty list.
pub async fn fetch_wallets<C>(client: &C, user: &User) -> Result<Vec<Wallet>>
where
    C: WalletClient + ?Sized,
{
    debug!(organization_id = %user.organization_id(), "fetching wallets");
    let wallets = client.get_wallets(user.organization_id()).await?;
    Ok(wallets.unwrap_or_default())
}

pub async fn fetch_wallet_accounts<C>(
    client: &C,
    user: &User,
    wallet_id: &str,
) -> Result<Vec<WalletAccount>>
where
    C: WalletClient + ?Sized,
{
    debug!(wallet_id, "fetching wallet accounts");
    let accounts = client
        .get_wallet_accounts(wallet_id, user.organization_id())
        .await?;
    Ok(accounts.unwrap_or_default())
}

impl WalletList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WalletsState {
        &self.wallets
    }

    /// Wallets from the last successful fetch, `None` before one or after a failure.
    pub fn wallets(&self) -> Option<&[Wallet]> {
        match &self.wallets {
            WalletsState::Loaded(wallets) => Some(wallets),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&Wallet> {
        self.selected.as_ref()
    }

    pub fn accounts(&self) -> &[WalletAccount] {
        &self.accounts
    }

    /// Replace the list with a fetch result and reset the selection to the
    /// first wallet. Returns the wallet whose accounts should be fetched next.
    pub fn apply_wallets(&mut self, result: Result<Vec<Wallet>>) -> Option<String> {
        self.accounts.clear();
        match result {
            Ok(wallets) => {
                self.selected = wallets.first().cloned();
                info!(
                    count = wallets.len(),
                    selected = ?self.selected.as_ref().map(|w| w.wallet_id.as_str()),
                    "wallet list refreshed"
                );
                self.wallets = WalletsState::Loaded(wallets);
            }
            Err(err) => {
                warn!("wallet fetch failed: {err}");
                self.selected = None;
                self.wallets = WalletsState::Failed(err.to_string());
            }
        }
        self.selected.as_ref().map(|w| w.wallet_id.clone())
    }

    /// Select a wallet from the current list. Returns its id when the
    /// selection changed and its accounts need fetching.
    pub fn select(&mut self, wallet_id: &str) -> Option<String> {
        if self.selected.as_ref().is_some_and(|w| w.wallet_id == wallet_id) {
            return None;
        }
        let wallet = self
            .wallets()?
            .iter()
            .find(|w| w.wallet_id == wallet_id)?
            .clone();
        info!(wallet_id, "wallet selected");
        self.selected = Some(wallet);
        self.accounts.clear();
        Some(wallet_id.to_owned())
    }

    /// Store accounts fetched for `wallet_id`. Results for a wallet that is no
    /// longer selected are dropped. A failed fetch leaves the list empty.
    pub fn apply_accounts(&mut self, wallet_id: &str, result: Result<Vec<WalletAccount>>) -> bool {
        if self.selected.as_ref().map(|w| w.wallet_id.as_str()) != Some(wallet_id) {
            debug!(wallet_id, "dropping accounts for deselected wallet");
            return false;
        }
        match result {
            Ok(accounts) => self.accounts = accounts,
            Err(err) => {
                warn!(wallet_id, "wallet accounts fetch failed: {err}");
                self.accounts.clear();
            }
        }
        true
    }

    /// Delete is offered only while more than one wallet exists.
    pub fn delete_menu_entry(&self) -> DeleteMenuEntry {
        let count = self.wallets().map_or(0, <[Wallet]>::len);
        if count > 1 {
            DeleteMenuEntry {
                enabled: true,
                hint: None,
            }
        } else {
            DeleteMenuEntry {
                enabled: false,
                hint: Some(ONLY_WALLET_HINT),
            }
        }
    }

    /// Wallet to confirm in the delete dialog; the dialog is not rendered otherwise.
    pub fn delete_dialog_wallet(&self) -> Option<&Wallet> {
        let selected = self.selected.as_ref()?;
        (self.wallets()?.len() > 1).then_some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::test_support::{NOW_MS, live_user, user_with_expiry};
    use crate::{delete, route::Route, session};
    use tk_client::memory::{ClientCall, InMemoryWalletClient, MemorySessionStore};

    fn wallet(id: &str, name: &str) -> Wallet {
        Wallet {
            wallet_id: id.to_owned(),
            wallet_name: name.to_owned(),
            exported: false,
            imported: false,
        }
    }

    async fn refresh(list: &mut WalletList, client: &InMemoryWalletClient, user: &User) {
        let fetched = fetch_wallets(client, user).await;
        if let Some(wallet_id) = list.apply_wallets(fetched) {
            let accounts = fetch_wallet_accounts(client, user, &wallet_id).await;
            list.apply_accounts(&wallet_id, accounts);
        }
    }

    #[test]
    fn non_empty_fetch_selects_first_wallet() {
        let mut list = WalletList::new();
        let next = list.apply_wallets(Ok(vec![wallet("w1", "Main"), wallet("w2", "Secondary")]));
        assert_eq!(next.as_deref(), Some("w1"));
        assert_eq!(list.selected().map(|w| w.wallet_id.as_str()), Some("w1"));
    }

    #[test]
    fn empty_fetch_clears_selection_and_skips_accounts() {
        let mut list = WalletList::new();
        list.apply_wallets(Ok(vec![wallet("w1", "Main")]));
        let next = list.apply_wallets(Ok(Vec::new()));
        assert_eq!(next, None);
        assert!(list.selected().is_none());
        assert_eq!(list.wallets().map(<[Wallet]>::len), Some(0));
    }

    #[test]
    fn failed_fetch_is_distinguishable_from_empty() {
        let mut list = WalletList::new();
        let next = list.apply_wallets(Err(DashboardError::Client(anyhow::anyhow!("timeout"))));
        assert_eq!(next, None);
        assert!(list.selected().is_none());
        assert!(list.wallets().is_none());
        assert!(matches!(list.state(), WalletsState::Failed(msg) if msg.contains("timeout")));
    }

    #[test]
    fn delete_entry_needs_more_than_one_wallet() {
        let mut list = WalletList::new();
        assert_eq!(
            list.delete_menu_entry(),
            DeleteMenuEntry {
                enabled: false,
                hint: Some(ONLY_WALLET_HINT)
            }
        );

        for count in 0..4 {
            let wallets = (0..count)
                .map(|i| wallet(&format!("w{i}"), "W"))
                .collect::<Vec<_>>();
            list.apply_wallets(Ok(wallets));
            let entry = list.delete_menu_entry();
            assert_eq!(entry.enabled, count > 1, "count = {count}");
            assert_eq!(entry.hint.is_none(), count > 1, "count = {count}");
            assert_eq!(list.delete_dialog_wallet().is_some(), count > 1, "count = {count}");
        }
    }

    #[test]
    fn select_ignores_unknown_and_current_wallet() {
        let mut list = WalletList::new();
        list.apply_wallets(Ok(vec![wallet("w1", "Main"), wallet("w2", "Secondary")]));
        assert_eq!(list.select("w1"), None);
        assert_eq!(list.select("nope"), None);
        assert_eq!(list.select("w2").as_deref(), Some("w2"));
        assert_eq!(list.selected().map(|w| w.wallet_id.as_str()), Some("w2"));
    }

    #[test]
    fn stale_accounts_are_dropped() {
        let mut list = WalletList::new();
        list.apply_wallets(Ok(vec![wallet("w1", "Main"), wallet("w2", "Secondary")]));
        list.select("w2");
        assert!(!list.apply_accounts("w1", Ok(Vec::new())));
        assert!(list.apply_accounts("w2", Ok(Vec::new())));
    }

    #[tokio::test]
    async fn undefined_response_fetches_no_accounts() -> anyhow::Result<()> {
        let user = live_user();
        let client = InMemoryWalletClient::with_wallets([("w1", "Main")]);
        client.inject_credential_bundle("cred").await?;
        client.respond_without_wallets(true);
        client.clear_calls();

        let mut list = WalletList::new();
        refresh(&mut list, &client, &user).await;

        assert!(list.selected().is_none());
        assert_eq!(client.calls(), vec![ClientCall::GetWallets("org-1".into())]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_listing_clears_wallets_and_disables_delete() -> anyhow::Result<()> {
        let user = live_user();
        let client = InMemoryWalletClient::with_wallets([("w1", "Main"), ("w2", "Secondary")]);
        client.inject_credential_bundle("cred").await?;

        let mut list = WalletList::new();
        refresh(&mut list, &client, &user).await;
        assert!(list.delete_menu_entry().enabled);

        client.fail_wallet_listing(true);
        client.clear_calls();
        refresh(&mut list, &client, &user).await;

        assert!(matches!(list.state(), WalletsState::Failed(msg) if msg.contains("connection reset")));
        assert!(list.selected().is_none());
        assert!(list.accounts().is_empty());
        assert_eq!(client.calls(), vec![ClientCall::GetWallets("org-1".into())]);
        assert_eq!(
            list.delete_menu_entry(),
            DeleteMenuEntry {
                enabled: false,
                hint: Some(ONLY_WALLET_HINT)
            }
        );
        assert!(list.delete_dialog_wallet().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_first_of_two_wallets_scenario() -> anyhow::Result<()> {
        let user = live_user();
        let store = MemorySessionStore::logged_in(user.clone());
        let client = InMemoryWalletClient::with_wallets([("w1", "Main"), ("w2", "Secondary")]);

        let session::SessionOutcome::Authenticated(user) =
            session::manage_session(&store, &client, NOW_MS).await?
        else {
            panic!("expected an authenticated session");
        };

        let mut list = WalletList::new();
        refresh(&mut list, &client, &user).await;
        assert_eq!(list.selected().map(|w| w.wallet_id.as_str()), Some("w1"));
        assert_eq!(list.accounts().len(), 2);
        assert!(list.delete_menu_entry().enabled);

        let target = list.delete_dialog_wallet().map(|w| w.wallet_id.clone());
        assert_eq!(target.as_deref(), Some("w1"));
        delete::delete_wallets(&client, user.organization_id(), vec!["w1".to_owned()]).await?;
        refresh(&mut list, &client, &user).await;

        assert_eq!(list.selected().map(|w| w.wallet_id.as_str()), Some("w2"));
        let entry = list.delete_menu_entry();
        assert!(!entry.enabled);
        assert_eq!(entry.hint, Some(ONLY_WALLET_HINT));
        assert!(list.delete_dialog_wallet().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn expired_session_scenario_performs_no_wallet_fetch() -> anyhow::Result<()> {
        let store = MemorySessionStore::logged_in(user_with_expiry(NOW_MS - 1000));
        let client = InMemoryWalletClient::with_wallets([("w1", "Main")]);

        let outcome = session::manage_session(&store, &client, NOW_MS).await?;

        assert_eq!(outcome, session::SessionOutcome::Redirect(Route::Login));
        assert!(
            !client
                .calls()
                .iter()
                .any(|c| matches!(c, ClientCall::GetWallets(_)))
        );
        Ok(())
    }
}
