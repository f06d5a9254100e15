//! Session context manager.
//!
//! Single source of truth for who owns the current tab, and the orchestrator
//! that points every scoped store and the inbox at the right namespace when
//! the identity changes.

use super::gateway::AuthGateway;
use super::models::{decode_identity, SessionState, SignUpRequest, TokenPair, UserProfile};
use crate::collections::{FavoritesStore, PurchasesStore, WatchlistStore};
use crate::notifications::NotificationCenter;
use crate::profile::{keys, StorageHandle};
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct SessionManager {
    storage: StorageHandle,
    gateway: Arc<dyn AuthGateway>,
    favorites: Arc<FavoritesStore>,
    watchlist: Arc<WatchlistStore>,
    purchases: Arc<PurchasesStore>,
    notifications: Arc<NotificationCenter>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    /// Builds the manager and immediately attempts to restore a persisted
    /// session. Missing or malformed persisted state leaves the tab
    /// anonymous on the guest namespace; malformed state also erases the
    /// credential keys so the next restore starts clean.
    pub fn new(
        storage: StorageHandle,
        gateway: Arc<dyn AuthGateway>,
        favorites: Arc<FavoritesStore>,
        watchlist: Arc<WatchlistStore>,
        purchases: Arc<PurchasesStore>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        let manager = Self {
            storage,
            gateway,
            favorites,
            watchlist,
            purchases,
            notifications,
            state: Mutex::new(SessionState::Anonymous),
        };
        manager.restore();
        manager
    }

    fn restore(&self) {
        let stored_user = self.storage.get(keys::CURRENT_USER_KEY).unwrap_or(None);
        let stored_token = self.storage.get(keys::ACCESS_TOKEN_KEY).unwrap_or(None);

        let raw = match (stored_user, stored_token) {
            (Some(raw), Some(_)) => raw,
            (None, None) => return,
            // Half a session is no session
            _ => {
                self.erase_credentials();
                return;
            }
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => {
                info!("Restored session for {}", profile.id);
                self.select_namespaces(Some(&profile.id));
                *self.state.lock().unwrap() = SessionState::Authenticated(profile);
            }
            Err(err) => {
                warn!("Malformed persisted session, clearing: {}", err);
                self.erase_credentials();
            }
        }
    }

    /// Signs in against the auth gateway, then brings every store onto the
    /// new identity's namespace.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile> {
        let tokens = self.gateway.sign_in(email, password).await?;
        self.complete_authentication(tokens, email).await
    }

    /// Registers a new account and signs it in.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<UserProfile> {
        let email = request.email.clone();
        let tokens = self.gateway.sign_up(&request).await?;
        self.complete_authentication(tokens, &email).await
    }

    async fn complete_authentication(
        &self,
        tokens: TokenPair,
        email: &str,
    ) -> Result<UserProfile> {
        let profile = match decode_identity(&tokens.access_token) {
            Some(id) => match self.gateway.fetch_user(&id, &tokens.access_token).await {
                Ok(profile) => profile,
                Err(err) => {
                    warn!("Profile fetch failed for {}, using minimal profile: {}", id, err);
                    UserProfile::minimal(id, email)
                }
            },
            None => UserProfile::minimal("unknown", email),
        };

        self.storage
            .set(keys::ACCESS_TOKEN_KEY, &tokens.access_token)
            .context("Failed to persist access token")?;
        self.storage
            .set(keys::REFRESH_TOKEN_KEY, &tokens.refresh_token)
            .context("Failed to persist refresh token")?;
        let raw = serde_json::to_string(&profile).context("Failed to serialize user profile")?;
        self.storage
            .set(keys::CURRENT_USER_KEY, &raw)
            .context("Failed to persist user profile")?;

        self.select_namespaces(Some(&profile.id));
        *self.state.lock().unwrap() = SessionState::Authenticated(profile.clone());
        info!("Signed in as {}", profile.id);
        Ok(profile)
    }

    /// Signs out. The remote call is best-effort; local state transitions
    /// to anonymous no matter what the backend says.
    pub async fn sign_out(&self) {
        if let Ok(Some(token)) = self.storage.get(keys::ACCESS_TOKEN_KEY) {
            if let Err(err) = self.gateway.sign_out(&token).await {
                warn!("Remote sign-out failed, signing out locally anyway: {}", err);
            }
        }
        self.teardown();
        info!("Signed out");
    }

    /// Deletes the account remotely, then tears the local session down.
    /// Unlike sign-out, a remote failure leaves the session intact.
    pub async fn delete_account(&self) -> Result<()> {
        let token = self
            .storage
            .get(keys::ACCESS_TOKEN_KEY)?
            .context("No active session")?;
        self.gateway.delete_account(&token).await?;
        self.teardown();
        info!("Account deleted");
        Ok(())
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        match &*self.state.lock().unwrap() {
            SessionState::Authenticated(profile) => Some(profile.clone()),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    // Order is fixed for test determinism; the stores are independent.
    fn select_namespaces(&self, namespace: Option<&str>) {
        self.favorites.select_namespace(namespace);
        self.watchlist.select_namespace(namespace);
        self.purchases.select_namespace(namespace);
        self.notifications.select_namespace(namespace);
    }

    fn teardown(&self) {
        self.favorites.reset();
        self.watchlist.reset();
        self.purchases.reset();
        self.notifications.reset();
        self.erase_credentials();
        *self.state.lock().unwrap() = SessionState::Anonymous;
    }

    fn erase_credentials(&self) {
        for key in [
            keys::CURRENT_USER_KEY,
            keys::ACCESS_TOKEN_KEY,
            keys::REFRESH_TOKEN_KEY,
        ] {
            if let Err(err) = self.storage.remove(key) {
                warn!("Failed to erase {}: {}", key, err);
            }
        }
    }
}
