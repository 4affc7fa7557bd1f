//! Client seams between the dashboard and the wallet backend.
//!
//! Browser handles are `!Send`, so every trait here is `?Send`.

use anyhow::Result;
use async_trait::async_trait;
use tk_api_types::{
    CreateWalletRequest, CreateWalletResult, DeleteWalletsRequest, DeleteWalletsResult,
    ImportWalletRequest, ImportWalletResult, InitImportWalletResult, ReadWriteSession, User,
    Wallet, WalletAccount,
};

#[cfg(any(test, feature = "memory"))]
pub mod memory;

/// Element id of the isolated seed-phrase frame. At most one may exist per document.
pub const IMPORT_FRAME_ELEMENT_ID: &str = "turnkey-default-iframe-element-id";

/// Element id of the frame that holds the session credential and stamps requests.
pub const AUTH_FRAME_ELEMENT_ID: &str = "turnkey-auth-iframe-element-id";

/// Where the auth widget leaves the logged-in user and session.
#[async_trait(?Send)]
pub trait SessionStore {
    async fn current_user(&self) -> Result<Option<User>>;
    async fn read_write_session(&self) -> Result<Option<ReadWriteSession>>;
    async fn logout_user(&self) -> Result<()>;
}

/// Authenticated wallet API. `None` from a query means the backend returned nothing.
#[async_trait(?Send)]
pub trait WalletClient {
    async fn inject_credential_bundle(&self, credential_bundle: &str) -> Result<bool>;
    async fn get_wallets(&self, organization_id: &str) -> Result<Option<Vec<Wallet>>>;
    async fn get_wallet_accounts(
        &self,
        wallet_id: &str,
        organization_id: &str,
    ) -> Result<Option<Vec<WalletAccount>>>;
    async fn create_wallet(&self, req: CreateWalletRequest) -> Result<CreateWalletResult>;
    async fn init_import_wallet(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<InitImportWalletResult>;
    async fn import_wallet(&self, req: ImportWalletRequest) -> Result<ImportWalletResult>;
    async fn delete_wallets(&self, req: DeleteWalletsRequest) -> Result<DeleteWalletsResult>;
}

/// Isolated input context collecting the seed phrase.
#[async_trait(?Send)]
pub trait ImportFrame {
    async fn inject_import_bundle(
        &self,
        import_bundle: &str,
        organization_id: &str,
        user_id: &str,
    ) -> Result<bool>;
    async fn extract_wallet_encrypted_bundle(&self) -> Result<String>;
}

#[async_trait(?Send)]
pub trait ImportFrameFactory {
    type Frame: ImportFrame;

    fn frame_exists(&self, element_id: &str) -> bool;
    async fn create_frame(&self, element_id: &str) -> Result<Self::Frame>;
}
