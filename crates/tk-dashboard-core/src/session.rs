//! Session check run when the dashboard mounts.

use crate::error::{DashboardError, Result};
use crate::route::Route;
use tk_api_types::User;
use tk_client::{SessionStore, WalletClient};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Not authenticated: navigate away and do nothing else.
    Redirect(Route),
    /// Credentials are injected; dependent fetches may start.
    Authenticated(User),
}

/// Result of reading the store alone, before any client exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Redirect(Route),
    /// The stored user holds a live read-write session. Nothing is injected yet.
    Live(User),
}

/// Decide from the store whether the dashboard may proceed.
///
/// Never touches the network, so callers can redirect before connecting
/// anything.
pub async fn check_session<S>(store: &S, now_epoch_ms: u64) -> Result<SessionCheck>
where
    S: SessionStore + ?Sized,
{
    let Some(user) = store.current_user().await? else {
        info!("no current user, redirecting to login");
        return Ok(SessionCheck::Redirect(Route::Login));
    };

    let Some(write) = user.write_session() else {
        info!(user_id = %user.user_id, "user has no read-write session, redirecting to login");
        return Ok(SessionCheck::Redirect(Route::Login));
    };

    // Exclusive expiry: a session is already dead at its expiry instant.
    if !write.is_live(now_epoch_ms) {
        info!(
            user_id = %user.user_id,
            expiry = write.expiry,
            now = now_epoch_ms,
            "session expired, redirecting to login"
        );
        return Ok(SessionCheck::Redirect(Route::Login));
    }

    Ok(SessionCheck::Live(user))
}

/// Hand the live user's credential to `client`.
///
/// The user is only returned once injection has completed, so anything keyed
/// on the user (wallet fetches) cannot race ahead of the credential.
pub async fn authenticate<C>(client: &C, user: User) -> Result<User>
where
    C: WalletClient + ?Sized,
{
    let Some(write) = user.write_session() else {
        return Err(DashboardError::CredentialInjection);
    };
    debug!(user_id = %user.user_id, "injecting credential bundle");
    if !client.inject_credential_bundle(&write.credential_bundle).await? {
        return Err(DashboardError::CredentialInjection);
    }
    Ok(user)
}

/// [`check_session`] followed by [`authenticate`].
pub async fn manage_session<S, C>(store: &S, client: &C, now_epoch_ms: u64) -> Result<SessionOutcome>
where
    S: SessionStore + ?Sized,
    C: WalletClient + ?Sized,
{
    match check_session(store, now_epoch_ms).await? {
        SessionCheck::Redirect(route) => Ok(SessionOutcome::Redirect(route)),
        SessionCheck::Live(user) => Ok(SessionOutcome::Authenticated(authenticate(client, user).await?)),
    }
}

/// Clear the stored session; the caller navigates to the returned route.
pub async fn logout<S>(store: &S) -> Result<Route>
where
    S: SessionStore + ?Sized,
{
    store.logout_user().await?;
    info!("user logged out");
    Ok(Route::Login)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{NOW_MS, init_tracing, live_user, user_with_expiry};
    use tk_api_types::UserSession;
    use tk_client::memory::{ClientCall, InMemoryWalletClient, MemorySessionStore};

    #[tokio::test]
    async fn live_session_injects_before_returning_user() -> anyhow::Result<()> {
        init_tracing();
        let store = MemorySessionStore::logged_in(live_user());
        let client = InMemoryWalletClient::new();

        let outcome = manage_session(&store, &client, NOW_MS).await?;

        assert_eq!(outcome, SessionOutcome::Authenticated(live_user()));
        assert_eq!(
            client.calls(),
            vec![ClientCall::InjectCredentialBundle("credential-bundle-1".into())]
        );
        assert_eq!(client.injected_credential().as_deref(), Some("credential-bundle-1"));
        Ok(())
    }

    #[tokio::test]
    async fn expired_session_redirects_without_any_client_call() -> anyhow::Result<()> {
        let store = MemorySessionStore::logged_in(user_with_expiry(NOW_MS - 1000));
        let client = InMemoryWalletClient::with_wallets([("w1", "Main")]);

        let outcome = manage_session(&store, &client, NOW_MS).await?;

        assert_eq!(outcome, SessionOutcome::Redirect(Route::Login));
        assert_eq!(Route::Login.path(), "/");
        assert!(client.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn expiry_instant_counts_as_expired() -> anyhow::Result<()> {
        let store = MemorySessionStore::logged_in(user_with_expiry(NOW_MS));
        let client = InMemoryWalletClient::new();

        let outcome = manage_session(&store, &client, NOW_MS).await?;
        assert_eq!(outcome, SessionOutcome::Redirect(Route::Login));
        Ok(())
    }

    #[tokio::test]
    async fn store_check_decides_before_any_client_exists() -> anyhow::Result<()> {
        let expired = MemorySessionStore::logged_in(user_with_expiry(NOW_MS - 1000));
        assert_eq!(check_session(&expired, NOW_MS).await?, SessionCheck::Redirect(Route::Login));
        assert_eq!(
            check_session(&MemorySessionStore::empty(), NOW_MS).await?,
            SessionCheck::Redirect(Route::Login)
        );

        let live = MemorySessionStore::logged_in(live_user());
        let SessionCheck::Live(user) = check_session(&live, NOW_MS).await? else {
            panic!("expected a live session");
        };

        let client = InMemoryWalletClient::new();
        assert!(client.calls().is_empty());
        assert_eq!(authenticate(&client, user).await?, live_user());
        assert_eq!(
            client.calls(),
            vec![ClientCall::InjectCredentialBundle("credential-bundle-1".into())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_user_or_write_session_redirects() -> anyhow::Result<()> {
        let client = InMemoryWalletClient::new();

        let outcome = manage_session(&MemorySessionStore::empty(), &client, NOW_MS).await?;
        assert_eq!(outcome, SessionOutcome::Redirect(Route::Login));

        let mut user = live_user();
        user.session = Some(UserSession::default());
        let outcome = manage_session(&MemorySessionStore::logged_in(user), &client, NOW_MS).await?;
        assert_eq!(outcome, SessionOutcome::Redirect(Route::Login));

        assert!(client.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credential_is_an_error() {
        let store = MemorySessionStore::logged_in(live_user());
        let client = InMemoryWalletClient::new();
        client.reject_credentials(true);

        let result = manage_session(&store, &client, NOW_MS).await;
        assert!(matches!(result, Err(DashboardError::CredentialInjection)));
    }

    #[tokio::test]
    async fn logout_clears_store() -> anyhow::Result<()> {
        let store = MemorySessionStore::logged_in(live_user());
        assert_eq!(logout(&store).await?, Route::Login);
        assert!(store.is_logged_out());
        assert!(store.current_user().await?.is_none());
        Ok(())
    }
}
