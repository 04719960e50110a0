//! Per-shop session storage.
//!
//! Access credentials are keyed by shop domain so that concurrent installs
//! from different shops never clobber each other. The [`SessionStore`]
//! trait is the seam where a persistent backend would plug in; the app
//! ships with the in-memory [`MemoryStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::Session;
use crate::config::ShopDomain;

/// Abstracts session storage (insert, lookup, invalidate).
///
/// Sessions are created on a successful token exchange and removed when a
/// shop uninstalls the app.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a session under its shop domain, replacing any previous one.
    async fn insert(&self, session: Session);

    /// Returns the session for a shop, if one is stored.
    async fn get(&self, shop: &ShopDomain) -> Option<Session>;

    /// Removes and returns the session for a shop.
    async fn remove(&self, shop: &ShopDomain) -> Option<Session>;
}

/// In-memory session store.
///
/// # Example
///
/// ```rust
/// use storecredit::auth::{MemoryStore, Session, SessionStore};
/// use storecredit::ShopDomain;
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new();
/// let shop = ShopDomain::new("my-store").unwrap();
/// store
///     .insert(Session::new(shop.clone(), "tok".into(), "read_customers".parse().unwrap()))
///     .await;
///
/// assert!(store.get(&shop).await.is_some());
/// assert!(store.remove(&shop).await.is_some());
/// assert!(store.get(&shop).await.is_none());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<ShopDomain, Session>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: Session) {
        debug!(shop = %session.shop, "storing session");
        self.sessions
            .write()
            .await
            .insert(session.shop.clone(), session);
    }

    async fn get(&self, shop: &ShopDomain) -> Option<Session> {
        self.sessions.read().await.get(shop).cloned()
    }

    async fn remove(&self, shop: &ShopDomain) -> Option<Session> {
        debug!(shop = %shop, "removing session");
        self.sessions.write().await.remove(shop)
    }
}
