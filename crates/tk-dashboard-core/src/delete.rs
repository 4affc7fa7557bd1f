//! Wallet deletion.
//!
//! Guarding against deleting the last wallet is the shell's job, see
//! [`crate::wallets::WalletList::delete_dialog_wallet`].

use crate::error::Result;
use tk_api_types::{DeleteWalletsRequest, DeleteWalletsResult};
use tk_client::WalletClient;
use tracing::info;

/// Delete `wallet_ids` without requiring a prior export. The caller refreshes
/// the wallet list afterwards.
pub async fn delete_wallets<C>(
    client: &C,
    organization_id: &str,
    wallet_ids: Vec<String>,
) -> Result<DeleteWalletsResult>
where
    C: WalletClient + ?Sized,
{
    info!(?wallet_ids, "deleting wallets");
    let result = client
        .delete_wallets(DeleteWalletsRequest {
            organization_id: organization_id.to_owned(),
            wallet_ids,
            delete_without_export: true,
        })
        .await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_client::memory::{ClientCall, InMemoryWalletClient};

    #[tokio::test]
    async fn deletes_without_export() -> anyhow::Result<()> {
        let client = InMemoryWalletClient::with_wallets([("w1", "Main"), ("w2", "Secondary")]);
        client.inject_credential_bundle("cred").await?;

        let result = delete_wallets(&client, "org-1", vec!["w1".to_owned()]).await?;

        assert_eq!(result.wallet_ids, vec!["w1".to_owned()]);
        assert!(client.calls().contains(&ClientCall::DeleteWallets(DeleteWalletsRequest {
            organization_id: "org-1".into(),
            wallet_ids: vec!["w1".into()],
            delete_without_export: true,
        })));
        let remaining: Vec<_> = client.wallets().into_iter().map(|w| w.wallet_id).collect();
        assert_eq!(remaining, vec!["w2".to_owned()]);
        Ok(())
    }
}
