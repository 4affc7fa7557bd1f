//! Browser implementations of the client seams.
//!
//! `TurnkeyClient` stamps every request through the auth frame and polls
//! submitted activities until they settle. `LocalSessionStore` reads what the
//! auth widget left in `localStorage`.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::Element;

use tk_api_types::{
    ACTIVITY_TYPE_CREATE_WALLET, ACTIVITY_TYPE_DELETE_WALLETS, ACTIVITY_TYPE_IMPORT_WALLET,
    ACTIVITY_TYPE_INIT_IMPORT_WALLET, ActivityBody, ActivityResponse, ActivityResult,
    ActivityStatus, CreateWalletParameters, CreateWalletRequest, CreateWalletResult,
    DeleteWalletsParameters, DeleteWalletsRequest, DeleteWalletsResult, GetActivityBody,
    GetWalletAccountsBody, GetWalletsBody, ImportWalletParameters, ImportWalletRequest,
    ImportWalletResult, InitImportWalletParameters, InitImportWalletResult, ReadWriteSession,
    User, Wallet, WalletAccount,
};
use tk_client::{AUTH_FRAME_ELEMENT_ID, ImportFrame, ImportFrameFactory, SessionStore, WalletClient};
use tk_dashboard_core::DashboardConfig;

use crate::api;
use crate::dom;
use crate::stamper::IframeStamper;

pub const CURRENT_USER_KEY: &str = "@turnkey/current_user";
pub const READ_WRITE_SESSION_KEY: &str = "@turnkey/read_write_session";
pub const AUTH_BUNDLE_KEY: &str = "@turnkey/auth_bundle";

const ACTIVITY_POLL_INTERVAL_MS: u32 = 1_000;
const MAX_ACTIVITY_POLLS: u32 = 30;

const GET_ACTIVITY_PATH: &str = "/public/v1/query/get_activity";

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

pub fn js_err(err: JsValue) -> anyhow::Error {
    anyhow!(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

// ── Session store ──

pub struct LocalSessionStore;

fn read_key<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
    match LocalStorage::get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::KeyNotFound(_)) => Ok(None),
        Err(err) => Err(anyhow!("reading {key}: {err}")),
    }
}

#[async_trait(?Send)]
impl SessionStore for LocalSessionStore {
    async fn current_user(&self) -> Result<Option<User>> {
        read_key(CURRENT_USER_KEY)
    }

    async fn read_write_session(&self) -> Result<Option<ReadWriteSession>> {
        read_key(READ_WRITE_SESSION_KEY)
    }

    async fn logout_user(&self) -> Result<()> {
        for key in [CURRENT_USER_KEY, READ_WRITE_SESSION_KEY, AUTH_BUNDLE_KEY] {
            LocalStorage::delete(key);
        }
        Ok(())
    }
}

// ── Wallet client ──

pub struct TurnkeyClient {
    api_base_url: String,
    stamper: IframeStamper,
}

impl TurnkeyClient {
    /// Mount the auth frame in `container` and wait until it can stamp.
    pub async fn connect(config: &DashboardConfig, container: &Element) -> Result<Self> {
        let stamper = IframeStamper::init(container, &config.auth_iframe_url, AUTH_FRAME_ELEMENT_ID)
            .await
            .map_err(js_err)
            .context("auth frame failed to start")?;
        gloo_console::debug!(format!(
            "auth frame ready, public key {}",
            stamper.public_key().unwrap_or_default()
        ));
        Ok(Self {
            api_base_url: config.api_base_url.clone(),
            stamper,
        })
    }

    async fn post_raw<B: Serialize>(&self, path: &str, body: &B) -> Result<String> {
        let body = serde_json::to_string(body)?;
        let stamp = self.stamper.stamp(&body).await.map_err(js_err)?;
        let url = format!("{}{}", self.api_base_url, path);
        api::post_stamped(&url, body, &stamp)
            .await
            .map_err(|e| anyhow!("{path}: {e}"))
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let text = self.post_raw(path, body).await?;
        serde_json::from_str(&text).with_context(|| format!("{path}: unexpected response"))
    }

    /// Query whose payload sits under `field`; `None` when the field is absent.
    async fn query_list<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        field: &str,
    ) -> Result<Option<Vec<T>>> {
        let mut value: serde_json::Value = self.post(path, body).await?;
        match value.get_mut(field).map(serde_json::Value::take) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(list) => Ok(Some(serde_json::from_value(list)?)),
        }
    }

    /// Submit an activity and poll it until it leaves the pending states.
    async fn submit<P: Serialize>(
        &self,
        path: &str,
        activity_type: &'static str,
        organization_id: &str,
        parameters: P,
    ) -> Result<ActivityResult> {
        let body = ActivityBody {
            activity_type,
            timestamp_ms: now_ms().to_string(),
            organization_id: organization_id.to_owned(),
            parameters,
        };
        let mut activity = self.post::<_, ActivityResponse>(path, &body).await?.activity;

        let mut polls = 0;
        while !activity.status.is_terminal() {
            if polls >= MAX_ACTIVITY_POLLS {
                bail!(
                    "{activity_type} {} still {:?} after {polls} polls",
                    activity.id,
                    activity.status
                );
            }
            TimeoutFuture::new(ACTIVITY_POLL_INTERVAL_MS).await;
            polls += 1;
            let poll = GetActivityBody {
                organization_id: organization_id.to_owned(),
                activity_id: activity.id.clone(),
            };
            activity = self
                .post::<_, ActivityResponse>(GET_ACTIVITY_PATH, &poll)
                .await?
                .activity;
        }

        match activity.status {
            ActivityStatus::Completed => activity
                .result
                .with_context(|| format!("{activity_type} {} has no result", activity.id)),
            status => {
                let reason = activity.failure.map(|f| f.message).unwrap_or_default();
                bail!("{activity_type} {} ended {status:?}: {reason}", activity.id)
            }
        }
    }
}

#[async_trait(?Send)]
impl WalletClient for TurnkeyClient {
    async fn inject_credential_bundle(&self, credential_bundle: &str) -> Result<bool> {
        self.stamper
            .inject_credential_bundle(credential_bundle)
            .await
            .map_err(js_err)
    }

    async fn get_wallets(&self, organization_id: &str) -> Result<Option<Vec<Wallet>>> {
        let body = GetWalletsBody {
            organization_id: organization_id.to_owned(),
        };
        self.query_list("/public/v1/query/list_wallets", &body, "wallets")
            .await
    }

    async fn get_wallet_accounts(
        &self,
        wallet_id: &str,
        organization_id: &str,
    ) -> Result<Option<Vec<WalletAccount>>> {
        let body = GetWalletAccountsBody {
            organization_id: organization_id.to_owned(),
            wallet_id: wallet_id.to_owned(),
        };
        self.query_list("/public/v1/query/list_wallet_accounts", &body, "accounts")
            .await
    }

    async fn create_wallet(&self, req: CreateWalletRequest) -> Result<CreateWalletResult> {
        let result = self
            .submit(
                "/public/v1/submit/create_wallet",
                ACTIVITY_TYPE_CREATE_WALLET,
                &req.organization_id,
                CreateWalletParameters {
                    wallet_name: req.wallet_name,
                    accounts: req.accounts,
                },
            )
            .await?;
        result
            .create_wallet_result
            .context("missing createWalletResult")
    }

    async fn init_import_wallet(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<InitImportWalletResult> {
        let result = self
            .submit(
                "/public/v1/submit/init_import_wallet",
                ACTIVITY_TYPE_INIT_IMPORT_WALLET,
                organization_id,
                InitImportWalletParameters {
                    user_id: user_id.to_owned(),
                },
            )
            .await?;
        result
            .init_import_wallet_result
            .context("missing initImportWalletResult")
    }

    async fn import_wallet(&self, req: ImportWalletRequest) -> Result<ImportWalletResult> {
        let result = self
            .submit(
                "/public/v1/submit/import_wallet",
                ACTIVITY_TYPE_IMPORT_WALLET,
                &req.organization_id,
                ImportWalletParameters {
                    user_id: req.user_id,
                    wallet_name: req.wallet_name,
                    encrypted_bundle: req.encrypted_bundle,
                    accounts: req.accounts,
                },
            )
            .await?;
        result
            .import_wallet_result
            .context("missing importWalletResult")
    }

    async fn delete_wallets(&self, req: DeleteWalletsRequest) -> Result<DeleteWalletsResult> {
        let result = self
            .submit(
                "/public/v1/submit/delete_wallets",
                ACTIVITY_TYPE_DELETE_WALLETS,
                &req.organization_id,
                DeleteWalletsParameters {
                    wallet_ids: req.wallet_ids,
                    delete_without_export: req.delete_without_export,
                },
            )
            .await?;
        result
            .delete_wallets_result
            .context("missing deleteWalletsResult")
    }
}

// ── Import frame ──

/// The seed-phrase frame. Dropping it removes the iframe.
pub struct ImportFrameHandle(IframeStamper);

#[async_trait(?Send)]
impl ImportFrame for ImportFrameHandle {
    async fn inject_import_bundle(
        &self,
        import_bundle: &str,
        organization_id: &str,
        user_id: &str,
    ) -> Result<bool> {
        self.0
            .inject_import_bundle(import_bundle, organization_id, user_id)
            .await
            .map_err(js_err)
    }

    async fn extract_wallet_encrypted_bundle(&self) -> Result<String> {
        self.0
            .extract_wallet_encrypted_bundle()
            .await
            .map_err(js_err)
    }
}

pub struct IframeFrameFactory {
    container: Element,
    iframe_url: String,
}

impl IframeFrameFactory {
    pub fn new(container: Element, iframe_url: &str) -> Self {
        Self {
            container,
            iframe_url: iframe_url.to_owned(),
        }
    }
}

#[async_trait(?Send)]
impl ImportFrameFactory for IframeFrameFactory {
    type Frame = ImportFrameHandle;

    fn frame_exists(&self, element_id: &str) -> bool {
        dom::by_id(element_id).is_some()
    }

    async fn create_frame(&self, element_id: &str) -> Result<ImportFrameHandle> {
        IframeStamper::init(&self.container, &self.iframe_url, element_id)
            .await
            .map(ImportFrameHandle)
            .map_err(js_err)
    }
}
