use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reelvault::collections::{FavoritesStore, PurchasesStore, WatchlistStore};
use reelvault::notifications::NotificationCenter;
use reelvault::profile::{MemoryStorage, ProfileStorage, SqliteStorage, StorageHub};
use reelvault::session::{AuthGateway, SessionManager, SignUpRequest, TokenPair, UserProfile};
use reelvault::support::SupportDesk;
use std::path::Path;
use std::sync::Arc;

pub const SUPPORT_ID: &str = "admin";

/// A fully wired engine over one profile storage backend, standing in for
/// one browser tab.
pub struct Engine {
    pub hub: Arc<StorageHub>,
    pub notifications: Arc<NotificationCenter>,
    pub favorites: Arc<FavoritesStore>,
    pub watchlist: Arc<WatchlistStore>,
    pub purchases: Arc<PurchasesStore>,
    pub desk: SupportDesk,
    pub session: SessionManager,
}

impl Engine {
    pub fn over(backend: Arc<dyn ProfileStorage>, gateway: Arc<dyn AuthGateway>) -> Self {
        Self::over_hub(StorageHub::new(backend), gateway)
    }

    /// Wires a second engine onto an existing hub, modeling another tab of
    /// the same profile.
    pub fn over_hub(hub: Arc<StorageHub>, gateway: Arc<dyn AuthGateway>) -> Self {
        let notifications = NotificationCenter::new(hub.handle());
        let favorites = Arc::new(FavoritesStore::new(hub.handle(), notifications.clone()));
        let watchlist = Arc::new(WatchlistStore::new(hub.handle()));
        let purchases = Arc::new(PurchasesStore::new(hub.handle()));
        let desk = SupportDesk::new(hub.handle(), notifications.clone(), SUPPORT_ID);
        let session = SessionManager::new(
            hub.handle(),
            gateway,
            favorites.clone(),
            watchlist.clone(),
            purchases.clone(),
            notifications.clone(),
        );
        Self {
            hub,
            notifications,
            favorites,
            watchlist,
            purchases,
            desk,
            session,
        }
    }

    pub fn in_memory() -> Self {
        Self::over(Arc::new(MemoryStorage::new()), Arc::new(StubGateway::for_user("u1")))
    }

    pub fn on_file(path: &Path) -> Self {
        let backend = SqliteStorage::open(path).unwrap();
        Self::over(Arc::new(backend), Arc::new(StubGateway::for_user("u1")))
    }
}

/// Builds an unsigned JWT-shaped token whose payload carries the given id.
pub fn token_for(id: &str) -> String {
    let payload = format!(r#"{{"_id":"{}"}}"#, id);
    format!("header.{}.sig", URL_SAFE_NO_PAD.encode(payload))
}

/// In-process auth backend accepting any credentials for one known user.
pub struct StubGateway {
    user: UserProfile,
}

impl StubGateway {
    pub fn for_user(id: &str) -> Self {
        Self {
            user: UserProfile {
                id: id.to_string(),
                email: format!("{}@example.com", id),
                first_name: Some("Test".to_string()),
                last_name: Some("User".to_string()),
            },
        }
    }

    fn tokens(&self) -> TokenPair {
        TokenPair {
            access_token: token_for(&self.user.id),
            refresh_token: "refresh".to_string(),
        }
    }
}

#[async_trait]
impl AuthGateway for StubGateway {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<TokenPair> {
        if email == self.user.email {
            Ok(self.tokens())
        } else {
            Err(anyhow!("unknown user"))
        }
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> Result<TokenPair> {
        Ok(self.tokens())
    }

    async fn sign_out(&self, _access_token: &str) -> Result<()> {
        Ok(())
    }

    async fn fetch_user(&self, id: &str, _access_token: &str) -> Result<UserProfile> {
        if id == self.user.id {
            Ok(self.user.clone())
        } else {
            Err(anyhow!("not found"))
        }
    }

    async fn delete_account(&self, _access_token: &str) -> Result<()> {
        Ok(())
    }
}
