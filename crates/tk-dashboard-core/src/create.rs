//! Wallet creation: generate a fresh seed or import one through the isolated frame.

use crate::error::{DashboardError, Result};
use tk_api_types::{CreateWalletRequest, ImportWalletRequest, User, default_accounts};
use tk_client::{ImportFrame, WalletClient};
use tracing::{debug, info};

pub const DEFAULT_WALLET_NAME: &str = "My Wallet";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateMode {
    /// "Automatically generate seed phrase" checked.
    #[default]
    Generate,
    Import,
}

impl CreateMode {
    pub fn from_generate_checkbox(checked: bool) -> Self {
        if checked {
            CreateMode::Generate
        } else {
            CreateMode::Import
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            CreateMode::Generate => "Create",
            CreateMode::Import => "Import",
        }
    }
}

/// State of the "Add Wallet" dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWalletForm {
    pub name: String,
    pub mode: CreateMode,
    pub busy: bool,
}

impl Default for CreateWalletForm {
    fn default() -> Self {
        Self {
            name: DEFAULT_WALLET_NAME.to_owned(),
            mode: CreateMode::Generate,
            busy: false,
        }
    }
}

impl CreateWalletForm {
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            CreateMode::Generate => CreateMode::Import,
            CreateMode::Import => CreateMode::Generate,
        };
    }
}

/// Create a wallet holding the default Ethereum + Solana account pair.
pub async fn create_wallet<C>(client: &C, user: &User, name: &str) -> Result<String>
where
    C: WalletClient + ?Sized,
{
    info!(wallet_name = name, "creating wallet");
    let created = client
        .create_wallet(CreateWalletRequest {
            organization_id: user.organization_id().to_owned(),
            wallet_name: name.to_owned(),
            accounts: default_accounts(),
        })
        .await?;
    Ok(created.wallet_id)
}

/// Import the seed phrase typed into `frame` as a new wallet.
///
/// The import bundle travels backend → frame, the encrypted wallet bundle
/// frame → backend; neither is inspected here.
pub async fn import_wallet<C, F>(client: &C, frame: Option<&F>, user: &User, name: &str) -> Result<String>
where
    C: WalletClient + ?Sized,
    F: ImportFrame + ?Sized,
{
    let frame = frame.ok_or(DashboardError::ImportFrameUnavailable)?;
    let organization_id = user.organization_id();

    debug!(user_id = %user.user_id, "requesting import bundle");
    let init = client
        .init_import_wallet(organization_id, &user.user_id)
        .await?;

    let injected = frame
        .inject_import_bundle(&init.import_bundle, organization_id, &user.user_id)
        .await?;
    if !injected {
        return Err(DashboardError::ImportBundleRejected);
    }

    let encrypted_bundle = frame.extract_wallet_encrypted_bundle().await?;
    if encrypted_bundle.trim().is_empty() {
        return Err(DashboardError::EmptyEncryptedBundle);
    }

    info!(wallet_name = name, "importing wallet");
    let imported = client
        .import_wallet(ImportWalletRequest {
            organization_id: organization_id.to_owned(),
            user_id: user.user_id.clone(),
            wallet_name: name.to_owned(),
            encrypted_bundle,
            accounts: default_accounts(),
        })
        .await?;
    Ok(imported.wallet_id)
}

/// Submit the dialog in its current mode. Returns the new wallet id; the
/// caller refreshes the wallet list.
pub async fn submit<C, F>(form: &CreateWalletForm, client: &C, frame: Option<&F>, user: &User) -> Result<String>
where
    C: WalletClient + ?Sized,
    F: ImportFrame + ?Sized,
{
    match form.mode {
        CreateMode::Generate => create_wallet(client, user, &form.name).await,
        CreateMode::Import => import_wallet(client, frame, user, &form.name).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::live_user;
    use tk_client::memory::{ClientCall, FrameCall, InMemoryWalletClient, ScriptedImportFrame};

    async fn authed_client() -> anyhow::Result<InMemoryWalletClient> {
        let client = InMemoryWalletClient::new();
        client.inject_credential_bundle("cred").await?;
        client.clear_calls();
        Ok(client)
    }

    fn import_calls(client: &InMemoryWalletClient) -> usize {
        client
            .calls()
            .iter()
            .filter(|c| matches!(c, ClientCall::ImportWallet(_)))
            .count()
    }

    #[tokio::test]
    async fn generate_requests_exactly_the_default_pair() -> anyhow::Result<()> {
        let user = live_user();
        for name in ["My Wallet", "", "  spaced  ", "ünïcode"] {
            let client = authed_client().await?;
            let form = CreateWalletForm {
                name: name.to_owned(),
                ..CreateWalletForm::default()
            };
            submit::<_, ScriptedImportFrame>(&form, &client, None, &user).await?;

            assert_eq!(
                client.calls(),
                vec![ClientCall::CreateWallet(CreateWalletRequest {
                    organization_id: "org-1".into(),
                    wallet_name: name.into(),
                    accounts: default_accounts(),
                })]
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn import_runs_the_four_steps_in_order() -> anyhow::Result<()> {
        let user = live_user();
        let client = authed_client().await?;
        let frame = ScriptedImportFrame::new(true, "encrypted-wallet-bundle");
        let form = CreateWalletForm {
            name: "Imported".into(),
            mode: CreateMode::Import,
            busy: false,
        };

        let wallet_id = submit(&form, &client, Some(&frame), &user).await?;

        assert_eq!(
            frame.calls(),
            vec![
                FrameCall::InjectImportBundle {
                    import_bundle: "import-bundle:org-1:user-1".into(),
                    organization_id: "org-1".into(),
                    user_id: "user-1".into(),
                },
                FrameCall::ExtractWalletEncryptedBundle,
            ]
        );
        let calls = client.calls();
        assert_eq!(
            calls[0],
            ClientCall::InitImportWallet {
                organization_id: "org-1".into(),
                user_id: "user-1".into()
            }
        );
        assert_eq!(
            calls[1],
            ClientCall::ImportWallet(ImportWalletRequest {
                organization_id: "org-1".into(),
                user_id: "user-1".into(),
                wallet_name: "Imported".into(),
                encrypted_bundle: "encrypted-wallet-bundle".into(),
                accounts: default_accounts(),
            })
        );
        assert!(client.wallets().iter().any(|w| w.wallet_id == wallet_id && w.imported));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_import_bundle_stops_before_extraction() -> anyhow::Result<()> {
        let user = live_user();
        let client = authed_client().await?;
        let frame = ScriptedImportFrame::new(false, "encrypted");

        let result = import_wallet(&client, Some(&frame), &user, "W").await;

        assert!(matches!(result, Err(DashboardError::ImportBundleRejected)));
        assert!(!frame.calls().contains(&FrameCall::ExtractWalletEncryptedBundle));
        assert_eq!(import_calls(&client), 0);
        Ok(())
    }

    #[tokio::test]
    async fn blank_encrypted_bundle_stops_before_import() -> anyhow::Result<()> {
        let user = live_user();
        for bundle in ["", "   ", "\n\t "] {
            let client = authed_client().await?;
            let frame = ScriptedImportFrame::new(true, bundle);

            let result = import_wallet(&client, Some(&frame), &user, "W").await;

            assert!(matches!(result, Err(DashboardError::EmptyEncryptedBundle)));
            assert_eq!(import_calls(&client), 0);
        }
        Ok(())
    }

    #[tokio::test]
    async fn import_without_frame_makes_no_calls() -> anyhow::Result<()> {
        let client = authed_client().await?;
        let result = import_wallet::<_, ScriptedImportFrame>(&client, None, &live_user(), "W").await;
        assert!(matches!(result, Err(DashboardError::ImportFrameUnavailable)));
        assert!(client.calls().is_empty());
        Ok(())
    }

    #[test]
    fn form_defaults_and_toggle() {
        let mut form = CreateWalletForm::default();
        assert_eq!(form.name, "My Wallet");
        assert_eq!(form.mode, CreateMode::Generate);
        assert_eq!(form.mode.submit_label(), "Create");
        form.toggle_mode();
        assert_eq!(form.mode, CreateMode::Import);
        assert_eq!(form.mode.submit_label(), "Import");
        assert_eq!(CreateMode::from_generate_checkbox(true), CreateMode::Generate);
    }
}
