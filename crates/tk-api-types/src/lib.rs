use serde::{Deserialize, Serialize};

// ── Identity & session ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub organization_id: String,
    #[serde(default)]
    pub organization_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadSession {
    pub token: String,
    pub expiry: u64,
}

/// Session able to sign mutations. `expiry` is in epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadWriteSession {
    #[serde(alias = "authBundle")]
    pub credential_bundle: String,
    pub expiry: u64,
}

impl ReadWriteSession {
    /// The expiry instant itself already counts as expired.
    pub fn is_live(&self, now_epoch_ms: u64) -> bool {
        now_epoch_ms < self.expiry
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default)]
    pub read: Option<ReadSession>,
    #[serde(default)]
    pub write: Option<ReadWriteSession>,
    #[serde(default)]
    pub auth_client: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    pub organization: Organization,
    #[serde(default)]
    pub session: Option<UserSession>,
}

impl User {
    pub fn organization_id(&self) -> &str {
        &self.organization.organization_id
    }

    pub fn write_session(&self) -> Option<&ReadWriteSession> {
        self.session.as_ref()?.write.as_ref()
    }
}

// ── Wallets ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub wallet_id: String,
    #[serde(default)]
    pub wallet_name: String,
    #[serde(default)]
    pub exported: bool,
    #[serde(default)]
    pub imported: bool,
}

impl Wallet {
    /// Name shown in menus; falls back to the id for unnamed wallets.
    pub fn display_name(&self) -> &str {
        if self.wallet_name.is_empty() {
            &self.wallet_id
        } else {
            &self.wallet_name
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Curve {
    #[serde(rename = "CURVE_SECP256K1")]
    Secp256k1,
    #[serde(rename = "CURVE_ED25519")]
    Ed25519,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PathFormat {
    #[serde(rename = "PATH_FORMAT_BIP32")]
    Bip32,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AddressFormat {
    #[serde(rename = "ADDRESS_FORMAT_ETHEREUM")]
    Ethereum,
    #[serde(rename = "ADDRESS_FORMAT_SOLANA")]
    Solana,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    pub wallet_account_id: String,
    #[serde(default)]
    pub organization_id: String,
    pub wallet_id: String,
    pub curve: Curve,
    pub path_format: PathFormat,
    pub path: String,
    pub address_format: AddressFormat,
    pub address: String,
}

impl WalletAccount {
    /// `0x12a...9bc3d` style abbreviation: first five and last five characters.
    pub fn short_address(&self) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= 10 {
            return self.address.clone();
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{head}...{tail}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccountParams {
    pub curve: Curve,
    pub path_format: PathFormat,
    pub path: String,
    pub address_format: AddressFormat,
}

pub const DEFAULT_ETHEREUM_PATH: &str = "m/44'/60'/0'/0/0";
pub const DEFAULT_SOLANA_PATH: &str = "m/44'/501'/0'/0'";

pub fn default_ethereum_account() -> WalletAccountParams {
    WalletAccountParams {
        curve: Curve::Secp256k1,
        path_format: PathFormat::Bip32,
        path: DEFAULT_ETHEREUM_PATH.to_owned(),
        address_format: AddressFormat::Ethereum,
    }
}

pub fn default_solana_account() -> WalletAccountParams {
    WalletAccountParams {
        curve: Curve::Ed25519,
        path_format: PathFormat::Bip32,
        path: DEFAULT_SOLANA_PATH.to_owned(),
        address_format: AddressFormat::Solana,
    }
}

/// The fixed account pair every created or imported wallet starts with.
pub fn default_accounts() -> Vec<WalletAccountParams> {
    vec![default_ethereum_account(), default_solana_account()]
}

// ── Client requests ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWalletRequest {
    pub organization_id: String,
    pub wallet_name: String,
    pub accounts: Vec<WalletAccountParams>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportWalletRequest {
    pub organization_id: String,
    pub user_id: String,
    pub wallet_name: String,
    pub encrypted_bundle: String,
    pub accounts: Vec<WalletAccountParams>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteWalletsRequest {
    pub organization_id: String,
    pub wallet_ids: Vec<String>,
    pub delete_without_export: bool,
}

// ── Wire: queries ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWalletsBody {
    pub organization_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetWalletsResponse {
    #[serde(default)]
    pub wallets: Vec<Wallet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWalletAccountsBody {
    pub organization_id: String,
    pub wallet_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetWalletAccountsResponse {
    #[serde(default)]
    pub accounts: Vec<WalletAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetActivityBody {
    pub organization_id: String,
    pub activity_id: String,
}

// ── Wire: activities ──

pub const ACTIVITY_TYPE_CREATE_WALLET: &str = "ACTIVITY_TYPE_CREATE_WALLET";
pub const ACTIVITY_TYPE_INIT_IMPORT_WALLET: &str = "ACTIVITY_TYPE_INIT_IMPORT_WALLET";
pub const ACTIVITY_TYPE_IMPORT_WALLET: &str = "ACTIVITY_TYPE_IMPORT_WALLET";
pub const ACTIVITY_TYPE_DELETE_WALLETS: &str = "ACTIVITY_TYPE_DELETE_WALLETS";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBody<P> {
    #[serde(rename = "type")]
    pub activity_type: &'static str,
    pub timestamp_ms: String,
    pub organization_id: String,
    pub parameters: P,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletParameters {
    pub wallet_name: String,
    pub accounts: Vec<WalletAccountParams>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitImportWalletParameters {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportWalletParameters {
    pub user_id: String,
    pub wallet_name: String,
    pub encrypted_bundle: String,
    pub accounts: Vec<WalletAccountParams>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWalletsParameters {
    pub wallet_ids: Vec<String>,
    pub delete_without_export: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityStatus {
    #[serde(rename = "ACTIVITY_STATUS_CREATED")]
    Created,
    #[serde(rename = "ACTIVITY_STATUS_PENDING")]
    Pending,
    #[serde(rename = "ACTIVITY_STATUS_COMPLETED")]
    Completed,
    #[serde(rename = "ACTIVITY_STATUS_FAILED")]
    Failed,
    #[serde(rename = "ACTIVITY_STATUS_CONSENSUS_NEEDED")]
    ConsensusNeeded,
    #[serde(rename = "ACTIVITY_STATUS_REJECTED")]
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ActivityStatus {
    /// Whether polling can stop.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Rejected | Self::ConsensusNeeded
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletResult {
    pub wallet_id: String,
    #[serde(default)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InitImportWalletResult {
    pub import_bundle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportWalletResult {
    pub wallet_id: String,
    #[serde(default)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWalletsResult {
    #[serde(default)]
    pub wallet_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    #[serde(default)]
    pub create_wallet_result: Option<CreateWalletResult>,
    #[serde(default)]
    pub init_import_wallet_result: Option<InitImportWalletResult>,
    #[serde(default)]
    pub import_wallet_result: Option<ImportWalletResult>,
    #[serde(default)]
    pub delete_wallets_result: Option<DeleteWalletsResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityFailure {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub status: ActivityStatus,
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub result: Option<ActivityResult>,
    #[serde(default)]
    pub failure: Option<ActivityFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub activity: Activity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pair_is_ethereum_then_solana() {
        let accounts = default_accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].address_format, AddressFormat::Ethereum);
        assert_eq!(accounts[0].curve, Curve::Secp256k1);
        assert_eq!(accounts[0].path, "m/44'/60'/0'/0/0");
        assert_eq!(accounts[1].address_format, AddressFormat::Solana);
        assert_eq!(accounts[1].curve, Curve::Ed25519);
        assert_eq!(accounts[1].path, "m/44'/501'/0'/0'");
    }

    #[test]
    fn account_params_use_backend_enum_names() {
        let json = serde_json::to_value(default_ethereum_account()).unwrap();
        assert_eq!(json["curve"], "CURVE_SECP256K1");
        assert_eq!(json["pathFormat"], "PATH_FORMAT_BIP32");
        assert_eq!(json["addressFormat"], "ADDRESS_FORMAT_ETHEREUM");
    }

    #[test]
    fn unknown_address_format_is_kept_as_other() {
        let raw = r#"{
            "walletAccountId": "acc-1",
            "organizationId": "org-1",
            "walletId": "w1",
            "curve": "CURVE_SECP256K1",
            "pathFormat": "PATH_FORMAT_BIP32",
            "path": "m/44'/0'/0'/0/0",
            "addressFormat": "ADDRESS_FORMAT_BITCOIN_MAINNET_P2WPKH",
            "address": "bc1qxyz"
        }"#;
        let account: WalletAccount = serde_json::from_str(raw).unwrap();
        assert_eq!(account.address_format, AddressFormat::Other);
    }

    #[test]
    fn short_address_keeps_five_chars_each_side() {
        let account = WalletAccount {
            wallet_account_id: "a".into(),
            organization_id: "o".into(),
            wallet_id: "w".into(),
            curve: Curve::Secp256k1,
            path_format: PathFormat::Bip32,
            path: DEFAULT_ETHEREUM_PATH.into(),
            address_format: AddressFormat::Ethereum,
            address: "0x1234567890abcdef".into(),
        };
        assert_eq!(account.short_address(), "0x123...bcdef");

        let tiny = WalletAccount {
            address: "0xabc".into(),
            ..account
        };
        assert_eq!(tiny.short_address(), "0xabc");
    }

    #[test]
    fn user_parses_stored_session_shape() {
        let raw = r#"{
            "userId": "u1",
            "username": "alice",
            "organization": { "organizationId": "org-1", "organizationName": "Alice Org" },
            "session": {
                "write": { "credentialBundle": "bundle-1", "expiry": 1700000000000 },
                "authClient": "passkey"
            }
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.organization_id(), "org-1");
        let write = user.write_session().unwrap();
        assert_eq!(write.credential_bundle, "bundle-1");
        assert!(write.is_live(1_699_999_999_999));
        assert!(!write.is_live(1_700_000_000_000));
    }

    #[test]
    fn wallet_display_name_falls_back_to_id() {
        let wallet: Wallet = serde_json::from_str(r#"{ "walletId": "w9" }"#).unwrap();
        assert_eq!(wallet.display_name(), "w9");
    }

    #[test]
    fn activity_response_exposes_nested_result() {
        let raw = r#"{
            "activity": {
                "id": "act-1",
                "status": "ACTIVITY_STATUS_COMPLETED",
                "type": "ACTIVITY_TYPE_INIT_IMPORT_WALLET",
                "result": { "initImportWalletResult": { "importBundle": "ib-1" } }
            }
        }"#;
        let response: ActivityResponse = serde_json::from_str(raw).unwrap();
        assert!(response.activity.status.is_terminal());
        let bundle = response
            .activity
            .result
            .and_then(|r| r.init_import_wallet_result)
            .map(|r| r.import_bundle);
        assert_eq!(bundle.as_deref(), Some("ib-1"));
    }
}
