//! Latest projected menu, shared between the poller and request handlers.

use crate::error::MenuError;
use crate::i18n::Language;
use crate::menu::ResolvedCategory;
use crate::projector::project;
use crate::store::MenuStore;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Published {
    /// Sequence number of the fetch these views came from (0 = never).
    seq: u64,
    views: HashMap<Language, Vec<ResolvedCategory>>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// The storefront's view of the menu.
///
/// Each refresh takes a ticket before fetching. Fetches may overlap (a slow
/// poll can still be running when the next one starts), and a response is
/// only published if nothing newer has been published already. A failed
/// refresh leaves the previous views in place.
pub struct MenuSnapshot {
    store: MenuStore,
    next_seq: AtomicU64,
    published: RwLock<Published>,
}

/// What a reader gets for one language.
#[derive(Debug, Clone)]
pub struct MenuView {
    pub categories: Vec<ResolvedCategory>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl MenuSnapshot {
    pub fn new(store: MenuStore) -> Self {
        Self {
            store,
            next_seq: AtomicU64::new(0),
            published: RwLock::new(Published::default()),
        }
    }

    /// Re-fetch and re-project the menu for every language.
    ///
    /// Returns `Ok(false)` when the fetch completed but a newer one had
    /// already been published.
    pub async fn refresh(&self) -> Result<bool, MenuError> {
        let ticket = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let raw = match self.store.fetch_menu().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Menu refresh #{} failed, keeping previous view: {}", ticket, e);
                return Err(e);
            }
        };

        let views: HashMap<Language, Vec<ResolvedCategory>> = Language::all()
            .into_iter()
            .map(|language| (language, project(&raw, language)))
            .collect();

        Ok(self.publish(ticket, views).await)
    }

    async fn publish(&self, ticket: u64, views: HashMap<Language, Vec<ResolvedCategory>>) -> bool {
        let mut published = self.published.write().await;
        if ticket < published.seq {
            debug!(
                "Discarding stale menu refresh #{} (already at #{})",
                ticket, published.seq
            );
            return false;
        }

        published.seq = ticket;
        published.views = views;
        published.refreshed_at = Some(Utc::now());
        true
    }

    /// Latest view for `language`. Empty until the first successful refresh.
    pub async fn view(&self, language: Language) -> MenuView {
        let published = self.published.read().await;
        MenuView {
            categories: published.views.get(&language).cloned().unwrap_or_default(),
            refreshed_at: published.refreshed_at,
        }
    }

    #[cfg(test)]
    async fn published_seq(&self) -> u64 {
        self.published.read().await.seq
    }
}
