//! In-memory implementations of the client traits.
//!
//! Used by the dashboard tests and for running the flows without a backend.
//! Every call is recorded so tests can assert on ordering.

use crate::{ImportFrame, ImportFrameFactory, SessionStore, WalletClient};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tk_api_types::{
    AddressFormat, CreateWalletRequest, CreateWalletResult, DeleteWalletsRequest,
    DeleteWalletsResult, ImportWalletRequest, ImportWalletResult, InitImportWalletResult,
    ReadWriteSession, User, Wallet, WalletAccount, WalletAccountParams,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    InjectCredentialBundle(String),
    GetWallets(String),
    GetWalletAccounts {
        wallet_id: String,
        organization_id: String,
    },
    CreateWallet(CreateWalletRequest),
    InitImportWallet {
        organization_id: String,
        user_id: String,
    },
    ImportWallet(ImportWalletRequest),
    DeleteWallets(DeleteWalletsRequest),
}

#[derive(Default)]
struct Backend {
    wallets: Vec<Wallet>,
    accounts: HashMap<String, Vec<WalletAccount>>,
    credential: Option<String>,
    calls: Vec<ClientCall>,
    fail_listing: bool,
    empty_response: bool,
    reject_credential: bool,
}

/// Wallet backend kept in memory. Wallet queries and mutations require an
/// injected credential, mirroring the real authenticated client.
#[derive(Default)]
pub struct InMemoryWalletClient {
    backend: RefCell<Backend>,
}

impl InMemoryWalletClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with `(wallet_id, wallet_name)` pairs, each holding the
    /// default account pair.
    pub fn with_wallets<'a>(wallets: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let client = Self::new();
        {
            let mut backend = client.backend.borrow_mut();
            for (wallet_id, wallet_name) in wallets {
                backend.wallets.push(Wallet {
                    wallet_id: wallet_id.to_owned(),
                    wallet_name: wallet_name.to_owned(),
                    exported: false,
                    imported: false,
                });
                let accounts = derive_accounts(wallet_id, "", &tk_api_types::default_accounts());
                backend.accounts.insert(wallet_id.to_owned(), accounts);
            }
        }
        client
    }

    /// Make `get_wallets` fail with a transport error.
    pub fn fail_wallet_listing(&self, fail: bool) {
        self.backend.borrow_mut().fail_listing = fail;
    }

    /// Make `get_wallets` answer with no payload at all.
    pub fn respond_without_wallets(&self, empty: bool) {
        self.backend.borrow_mut().empty_response = empty;
    }

    /// Make `inject_credential_bundle` report `false`.
    pub fn reject_credentials(&self, reject: bool) {
        self.backend.borrow_mut().reject_credential = reject;
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.backend.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.backend.borrow_mut().calls.clear();
    }

    pub fn wallets(&self) -> Vec<Wallet> {
        self.backend.borrow().wallets.clone()
    }

    pub fn injected_credential(&self) -> Option<String> {
        self.backend.borrow().credential.clone()
    }

    fn record(&self, call: ClientCall) {
        self.backend.borrow_mut().calls.push(call);
    }

    fn require_credential(&self) -> Result<()> {
        if self.backend.borrow().credential.is_none() {
            bail!("no credential bundle injected");
        }
        Ok(())
    }

    fn insert_wallet(
        &self,
        wallet_name: &str,
        organization_id: &str,
        accounts: &[WalletAccountParams],
        imported: bool,
    ) -> (String, Vec<String>) {
        let wallet_id = Uuid::new_v4().to_string();
        let derived = derive_accounts(&wallet_id, organization_id, accounts);
        let addresses = derived.iter().map(|a| a.address.clone()).collect();

        let mut backend = self.backend.borrow_mut();
        backend.wallets.push(Wallet {
            wallet_id: wallet_id.clone(),
            wallet_name: wallet_name.to_owned(),
            exported: false,
            imported,
        });
        backend.accounts.insert(wallet_id.clone(), derived);
        (wallet_id, addresses)
    }
}

#[async_trait(?Send)]
impl WalletClient for InMemoryWalletClient {
    async fn inject_credential_bundle(&self, credential_bundle: &str) -> Result<bool> {
        self.record(ClientCall::InjectCredentialBundle(credential_bundle.to_owned()));
        let mut backend = self.backend.borrow_mut();
        if backend.reject_credential {
            return Ok(false);
        }
        backend.credential = Some(credential_bundle.to_owned());
        Ok(true)
    }

    async fn get_wallets(&self, organization_id: &str) -> Result<Option<Vec<Wallet>>> {
        self.record(ClientCall::GetWallets(organization_id.to_owned()));
        self.require_credential()?;
        let backend = self.backend.borrow();
        if backend.fail_listing {
            bail!("list_wallets: connection reset");
        }
        if backend.empty_response {
            return Ok(None);
        }
        Ok(Some(backend.wallets.clone()))
    }

    async fn get_wallet_accounts(
        &self,
        wallet_id: &str,
        organization_id: &str,
    ) -> Result<Option<Vec<WalletAccount>>> {
        self.record(ClientCall::GetWalletAccounts {
            wallet_id: wallet_id.to_owned(),
            organization_id: organization_id.to_owned(),
        });
        self.require_credential()?;
        Ok(self.backend.borrow().accounts.get(wallet_id).cloned())
    }

    async fn create_wallet(&self, req: CreateWalletRequest) -> Result<CreateWalletResult> {
        self.record(ClientCall::CreateWallet(req.clone()));
        self.require_credential()?;
        let (wallet_id, addresses) =
            self.insert_wallet(&req.wallet_name, &req.organization_id, &req.accounts, false);
        Ok(CreateWalletResult {
            wallet_id,
            addresses,
        })
    }

    async fn init_import_wallet(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<InitImportWalletResult> {
        self.record(ClientCall::InitImportWallet {
            organization_id: organization_id.to_owned(),
            user_id: user_id.to_owned(),
        });
        self.require_credential()?;
        Ok(InitImportWalletResult {
            import_bundle: format!("import-bundle:{organization_id}:{user_id}"),
        })
    }

    async fn import_wallet(&self, req: ImportWalletRequest) -> Result<ImportWalletResult> {
        self.record(ClientCall::ImportWallet(req.clone()));
        self.require_credential()?;
        if req.encrypted_bundle.trim().is_empty() {
            return Err(anyhow!("encrypted bundle is required"));
        }
        let (wallet_id, addresses) =
            self.insert_wallet(&req.wallet_name, &req.organization_id, &req.accounts, true);
        Ok(ImportWalletResult {
            wallet_id,
            addresses,
        })
    }

    async fn delete_wallets(&self, req: DeleteWalletsRequest) -> Result<DeleteWalletsResult> {
        self.record(ClientCall::DeleteWallets(req.clone()));
        self.require_credential()?;
        let mut backend = self.backend.borrow_mut();
        backend.wallets.retain(|w| !req.wallet_ids.contains(&w.wallet_id));
        for wallet_id in &req.wallet_ids {
            backend.accounts.remove(wallet_id);
        }
        Ok(DeleteWalletsResult {
            wallet_ids: req.wallet_ids,
        })
    }
}

fn derive_accounts(
    wallet_id: &str,
    organization_id: &str,
    params: &[WalletAccountParams],
) -> Vec<WalletAccount> {
    params
        .iter()
        .map(|p| {
            let raw = Uuid::new_v4().simple().to_string();
            let address = match p.address_format {
                AddressFormat::Ethereum => format!("0x{raw}"),
                _ => raw,
            };
            WalletAccount {
                wallet_account_id: Uuid::new_v4().to_string(),
                organization_id: organization_id.to_owned(),
                wallet_id: wallet_id.to_owned(),
                curve: p.curve,
                path_format: p.path_format,
                path: p.path.clone(),
                address_format: p.address_format,
                address,
            }
        })
        .collect()
}

// ── Session store ──

#[derive(Default)]
pub struct MemorySessionStore {
    user: RefCell<Option<User>>,
    session: RefCell<Option<ReadWriteSession>>,
    logged_out: Cell<bool>,
}

impl MemorySessionStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store holding `user`; the read-write session mirrors the user's write session.
    pub fn logged_in(user: User) -> Self {
        let session = user.write_session().cloned();
        Self {
            user: RefCell::new(Some(user)),
            session: RefCell::new(session),
            logged_out: Cell::new(false),
        }
    }

    pub fn with_session(session: ReadWriteSession) -> Self {
        Self {
            user: RefCell::new(None),
            session: RefCell::new(Some(session)),
            logged_out: Cell::new(false),
        }
    }

    pub fn is_logged_out(&self) -> bool {
        self.logged_out.get()
    }
}

#[async_trait(?Send)]
impl SessionStore for MemorySessionStore {
    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.user.borrow().clone())
    }

    async fn read_write_session(&self) -> Result<Option<ReadWriteSession>> {
        Ok(self.session.borrow().clone())
    }

    async fn logout_user(&self) -> Result<()> {
        self.user.borrow_mut().take();
        self.session.borrow_mut().take();
        self.logged_out.set(true);
        Ok(())
    }
}

// ── Import frame ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameCall {
    InjectImportBundle {
        import_bundle: String,
        organization_id: String,
        user_id: String,
    },
    ExtractWalletEncryptedBundle,
}

/// Frame whose answers are fixed up front. Clones share the call log.
#[derive(Debug, Clone)]
pub struct ScriptedImportFrame {
    inject_result: bool,
    encrypted_bundle: String,
    calls: Rc<RefCell<Vec<FrameCall>>>,
}

impl ScriptedImportFrame {
    pub fn new(inject_result: bool, encrypted_bundle: &str) -> Self {
        Self {
            inject_result,
            encrypted_bundle: encrypted_bundle.to_owned(),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<FrameCall> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ImportFrame for ScriptedImportFrame {
    async fn inject_import_bundle(
        &self,
        import_bundle: &str,
        organization_id: &str,
        user_id: &str,
    ) -> Result<bool> {
        self.calls.borrow_mut().push(FrameCall::InjectImportBundle {
            import_bundle: import_bundle.to_owned(),
            organization_id: organization_id.to_owned(),
            user_id: user_id.to_owned(),
        });
        Ok(self.inject_result)
    }

    async fn extract_wallet_encrypted_bundle(&self) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(FrameCall::ExtractWalletEncryptedBundle);
        Ok(self.encrypted_bundle.clone())
    }
}

/// Factory tracking which frame element ids are present in the "document".
pub struct MemoryFrameFactory {
    template: ScriptedImportFrame,
    present: RefCell<HashSet<String>>,
    created: Cell<usize>,
}

impl MemoryFrameFactory {
    pub fn new(template: ScriptedImportFrame) -> Self {
        Self {
            template,
            present: RefCell::new(HashSet::new()),
            created: Cell::new(0),
        }
    }

    /// Pretend another component already mounted a frame with this id.
    pub fn mark_present(&self, element_id: &str) {
        self.present.borrow_mut().insert(element_id.to_owned());
    }

    pub fn remove(&self, element_id: &str) {
        self.present.borrow_mut().remove(element_id);
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }
}

#[async_trait(?Send)]
impl ImportFrameFactory for MemoryFrameFactory {
    type Frame = ScriptedImportFrame;

    fn frame_exists(&self, element_id: &str) -> bool {
        self.present.borrow().contains(element_id)
    }

    async fn create_frame(&self, element_id: &str) -> Result<Self::Frame> {
        if self.frame_exists(element_id) {
            bail!("frame #{element_id} already mounted");
        }
        self.present.borrow_mut().insert(element_id.to_owned());
        self.created.set(self.created.get() + 1);
        Ok(self.template.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queries_require_injected_credential() -> anyhow::Result<()> {
        let client = InMemoryWalletClient::with_wallets([("w1", "Main")]);
        assert!(client.get_wallets("org-1").await.is_err());

        assert!(client.inject_credential_bundle("cred").await?);
        let wallets = client.get_wallets("org-1").await?.unwrap_or_default();
        assert_eq!(wallets.len(), 1);
        assert_eq!(client.injected_credential().as_deref(), Some("cred"));
        Ok(())
    }

    #[tokio::test]
    async fn create_then_delete_round_trip() -> anyhow::Result<()> {
        let client = InMemoryWalletClient::new();
        client.inject_credential_bundle("cred").await?;

        let created = client
            .create_wallet(CreateWalletRequest {
                organization_id: "org-1".into(),
                wallet_name: "Savings".into(),
                accounts: tk_api_types::default_accounts(),
            })
            .await?;
        assert_eq!(created.addresses.len(), 2);

        let accounts = client
            .get_wallet_accounts(&created.wallet_id, "org-1")
            .await?
            .unwrap_or_default();
        assert_eq!(accounts[0].address_format, AddressFormat::Ethereum);
        assert!(accounts[0].address.starts_with("0x"));
        assert_eq!(accounts[1].address_format, AddressFormat::Solana);

        client
            .delete_wallets(DeleteWalletsRequest {
                organization_id: "org-1".into(),
                wallet_ids: vec![created.wallet_id.clone()],
                delete_without_export: true,
            })
            .await?;
        assert!(client.wallets().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn factory_refuses_duplicate_frames() -> anyhow::Result<()> {
        let factory = MemoryFrameFactory::new(ScriptedImportFrame::new(true, "enc"));
        factory.create_frame("frame").await?;
        assert!(factory.frame_exists("frame"));
        assert!(factory.create_frame("frame").await.is_err());
        assert_eq!(factory.created(), 1);
        Ok(())
    }
}
