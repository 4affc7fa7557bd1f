use thiserror::Error;

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("credential bundle was not accepted by the auth frame")]
    CredentialInjection,
    #[error("import frame is not ready")]
    ImportFrameUnavailable,
    #[error("Failed to inject import bundle")]
    ImportBundleRejected,
    #[error("Encrypted wallet bundle is empty or invalid")]
    EmptyEncryptedBundle,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Client(#[from] anyhow::Error),
}
