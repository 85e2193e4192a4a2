//! Client-side token cache
//!
//! Holds the token pair the callback redirect delivered, under a single
//! local storage key. Tokens never live on the server. Interested parts of
//! the client subscribe to changes instead of polling the store.

use anyhow::Result;
use common::storage::LocalStorage;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::constants::TOKEN_CACHE_KEY;
use crate::tokens::TokenPair;

pub struct TokenCache {
    storage: LocalStorage,
    tx: watch::Sender<Option<TokenPair>>,
}

impl TokenCache {
    pub fn new(storage: LocalStorage) -> Self {
        let (tx, _) = watch::channel(None);
        let cache = Self { storage, tx };
        let current = cache.load();
        cache.tx.send_replace(current);
        cache
    }

    /// Reads the stored pair; an unreadable entry is dropped
    pub fn load(&self) -> Option<TokenPair> {
        let raw = match self.storage.get(TOKEN_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No cached calendar tokens");
                return None;
            }
            Err(e) => {
                warn!("Failed to read cached tokens: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                warn!("Discarding corrupt cached tokens: {}", e);
                if let Err(e) = self.storage.remove(TOKEN_CACHE_KEY) {
                    warn!("Failed to remove corrupt tokens: {}", e);
                }
                None
            }
        }
    }

    pub fn save(&self, tokens: &TokenPair) -> Result<()> {
        let content = serde_json::to_string(tokens)?;
        self.storage.set(TOKEN_CACHE_KEY, &content)?;
        info!("Cached calendar tokens");
        self.tx.send_replace(Some(tokens.clone()));
        Ok(())
    }

    /// Forgets the tokens; returns whether any were stored
    pub fn clear(&self) -> Result<bool> {
        let removed = self.storage.remove(TOKEN_CACHE_KEY)?;
        if removed {
            info!("Cleared cached calendar tokens");
        }
        self.tx.send_replace(None);
        Ok(removed)
    }

    /// A stored pair that has not passed its expiry
    pub fn is_connected_at(&self, now_ms: i64) -> bool {
        self.load()
            .map(|tokens| !tokens.is_expired_at(now_ms))
            .unwrap_or(false)
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected_at(chrono::Utc::now().timestamp_millis())
    }

    /// Observer hook for embedders that show connection state live; every
    /// `save` and `clear` through this cache is published. The one-shot
    /// `greta` CLI calls `load` instead.
    pub fn subscribe(&self) -> watch::Receiver<Option<TokenPair>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (TokenCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).unwrap();
        (TokenCache::new(storage), temp_dir)
    }

    fn token(expiry_date: Option<i64>) -> TokenPair {
        TokenPair {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expiry_date,
        }
    }

    #[test]
    fn test_save_and_load() {
        let (cache, _temp) = create_test_cache();
        assert!(cache.load().is_none());

        cache.save(&token(Some(42))).unwrap();
        assert_eq!(cache.load(), Some(token(Some(42))));
    }

    #[test]
    fn test_connected_respects_expiry() {
        let (cache, _temp) = create_test_cache();
        assert!(!cache.is_connected_at(1_000));

        cache.save(&token(Some(2_000))).unwrap();
        assert!(cache.is_connected_at(1_000));
        assert!(!cache.is_connected_at(2_000));

        cache.save(&token(None)).unwrap();
        assert!(cache.is_connected_at(i64::MAX));
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let (cache, temp) = create_test_cache();
        std::fs::write(temp.path().join(TOKEN_CACHE_KEY), "{not json").unwrap();

        assert!(cache.load().is_none());
        assert!(!temp.path().join(TOKEN_CACHE_KEY).exists());
    }

    #[test]
    fn test_subscribers_observe_save_and_clear() {
        let (cache, _temp) = create_test_cache();
        let mut rx = cache.subscribe();
        assert!(rx.borrow().is_none());

        cache.save(&token(None)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&token(None)));

        assert!(cache.clear().unwrap());
        assert!(rx.borrow_and_update().is_none());
        assert!(!cache.clear().unwrap());
    }

    #[test]
    fn test_initial_value_comes_from_storage() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path()).unwrap();
        TokenCache::new(storage.clone()).save(&token(Some(7))).unwrap();

        let reopened = TokenCache::new(storage);
        assert_eq!(*reopened.subscribe().borrow(), Some(token(Some(7))));
    }
}
