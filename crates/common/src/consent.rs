//! Ad consent flag with change notifications
//!
//! The flag is persisted as `"1"`/`"0"` under a single storage key. Readers
//! that care about changes hold a `watch::Receiver` from [`ConsentStore::subscribe`].

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::LocalStorage;

/// Storage key for the consent flag
pub const CONSENT_KEY: &str = "ff_ads_consent";

pub struct ConsentStore {
    storage: LocalStorage,
    tx: watch::Sender<Option<bool>>,
}

impl ConsentStore {
    pub fn new(storage: LocalStorage) -> Self {
        let current = read_flag(&storage);
        let (tx, _) = watch::channel(current);
        Self { storage, tx }
    }

    /// `None` until the user has answered the banner
    pub fn read(&self) -> Option<bool> {
        read_flag(&self.storage)
    }

    /// Persists the answer and notifies every subscriber
    pub fn write(&self, consent: bool) -> Result<()> {
        self.storage
            .set(CONSENT_KEY, if consent { "1" } else { "0" })?;
        info!("Ad consent set to {}", consent);
        self.tx.send_replace(Some(consent));
        Ok(())
    }

    /// Observer hook for embedders (a long-running UI, say) that render ad
    /// slots and must react when the answer changes. The one-shot `greta`
    /// CLI reads the flag directly instead.
    pub fn subscribe(&self) -> watch::Receiver<Option<bool>> {
        self.tx.subscribe()
    }
}

fn read_flag(storage: &LocalStorage) -> Option<bool> {
    match storage.get(CONSENT_KEY) {
        Ok(value) => value.map(|v| v.trim() == "1"),
        Err(e) => {
            warn!("Failed to read ad consent: {}", e);
            None
        }
    }
}

/// Placement rules for a single ad slot
#[derive(Debug, Clone)]
pub struct AdSlot {
    pub id: String,
    pub label: String,
    /// Characters of page content required before an ad is shown
    pub min_content_length: usize,
    /// Admin override that ignores consent and content checks
    pub force_show: bool,
}

impl Default for AdSlot {
    fn default() -> Self {
        Self {
            id: "ad-default".to_string(),
            label: "Sponsored".to_string(),
            min_content_length: crate::config::DEFAULT_MIN_CONTENT_LENGTH,
            force_show: false,
        }
    }
}

impl AdSlot {
    /// Ads need an explicit opt-in and a content-rich page
    pub fn is_visible(&self, consent: Option<bool>, page_content: &str) -> bool {
        if self.force_show {
            return true;
        }
        if consent != Some(true) {
            return false;
        }
        page_content.trim().chars().count() >= self.min_content_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (ConsentStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path()).unwrap();
        (ConsentStore::new(storage), temp)
    }

    #[test]
    fn test_unanswered_is_none() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_write_persists_flag() {
        let (store, temp) = create_test_store();

        store.write(true).unwrap();
        assert_eq!(store.read(), Some(true));
        assert_eq!(
            std::fs::read_to_string(temp.path().join(CONSENT_KEY)).unwrap(),
            "1"
        );

        store.write(false).unwrap();
        assert_eq!(store.read(), Some(false));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let (store, _temp) = create_test_store();
        let mut rx = store.subscribe();
        assert_eq!(*rx.borrow(), None);

        store.write(true).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Some(true));

        store.write(false).unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(false));
    }

    #[test]
    fn test_ad_slot_visibility() {
        let slot = AdSlot {
            min_content_length: 10,
            ..AdSlot::default()
        };
        let rich = "plenty of publisher content";

        assert!(!slot.is_visible(None, rich));
        assert!(!slot.is_visible(Some(false), rich));
        assert!(!slot.is_visible(Some(true), "   short   "));
        assert!(slot.is_visible(Some(true), rich));

        let forced = AdSlot {
            force_show: true,
            ..AdSlot::default()
        };
        assert!(forced.is_visible(Some(false), ""));
    }
}
