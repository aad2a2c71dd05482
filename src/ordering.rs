//! Manual ordering of items within a category.

use crate::error::MenuError;
use crate::i18n::Language;
use crate::menu::ItemId;
use crate::projector::project_category;
use crate::store::MenuStore;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Rewrites the `order` field of a category's items.
#[derive(Clone)]
pub struct OrderingService {
    store: MenuStore,
}

impl OrderingService {
    pub fn new(store: MenuStore) -> Self {
        Self { store }
    }

    /// Give each item in `item_ids` the order of its position in the slice.
    ///
    /// The updates are issued concurrently and independently. If any of them
    /// fails the whole call fails with `PartialReorder`, and the updates that
    /// did land stay in place until the next successful reorder.
    pub async fn reorder(&self, category_id: &str, item_ids: &[ItemId]) -> Result<(), MenuError> {
        if !self.store.category_exists(category_id).await? {
            return Err(MenuError::category_not_found(category_id));
        }

        let mut seen = HashSet::with_capacity(item_ids.len());
        if let Some(duplicate) = item_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(MenuError::Validation(format!(
                "Item {} appears more than once in the new order",
                duplicate
            )));
        }

        let updates = item_ids.iter().enumerate().map(|(position, item_id)| {
            self.store
                .set_item_order(category_id, *item_id, position as i64)
        });

        let results = join_all(updates).await;

        let failed: Vec<_> = results
            .iter()
            .zip(item_ids)
            .filter_map(|(result, item_id)| result.as_ref().err().map(|e| (item_id, e)))
            .collect();

        if !failed.is_empty() {
            for (item_id, e) in &failed {
                warn!(
                    "Failed to set order of item {} in '{}': {}",
                    item_id, category_id, e
                );
            }
            return Err(MenuError::PartialReorder {
                failed: failed.len(),
                total: item_ids.len(),
            });
        }

        info!("Reordered {} items in '{}'", item_ids.len(), category_id);
        Ok(())
    }

    /// Swap an item with its neighbour in the current display order, then
    /// rewrite the order of the whole category.
    ///
    /// Moving the first item up or the last item down does nothing and
    /// succeeds.
    pub async fn move_item(
        &self,
        category_id: &str,
        item_id: ItemId,
        direction: MoveDirection,
    ) -> Result<(), MenuError> {
        let raw = self
            .store
            .fetch_category(category_id)
            .await?
            .ok_or_else(|| MenuError::category_not_found(category_id))?;

        // Display order is language independent except for unordered items;
        // the admin works in the canonical language.
        let mut item_ids: Vec<ItemId> = project_category(&raw, Language::canonical())
            .items
            .into_iter()
            .map(|item| item.id)
            .collect();

        let position = item_ids
            .iter()
            .position(|id| *id == item_id)
            .ok_or_else(|| MenuError::item_not_found(category_id, item_id))?;

        let neighbour = match direction {
            MoveDirection::Up => position.checked_sub(1),
            MoveDirection::Down => Some(position + 1).filter(|next| *next < item_ids.len()),
        };

        let Some(neighbour) = neighbour else {
            debug!(
                "Item {} already at {:?} boundary of '{}'",
                item_id, direction, category_id
            );
            return Ok(());
        };

        item_ids.swap(position, neighbour);
        self.reorder(category_id, &item_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{RawCategory, RawItem, TranslatedText};
    use crate::store::{DocumentStore, MemoryStore};
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::Arc;

    fn item(id: ItemId, name: &str, order: Option<i64>) -> RawItem {
        RawItem {
            id,
            name: Some(TranslatedText::from(name)),
            description: None,
            price: 3.0,
            tags: None,
            image_url: None,
            order,
        }
    }

    async fn seeded(store: &MenuStore, items: Vec<RawItem>) {
        store
            .put_category(&RawCategory {
                id: "drinks".to_string(),
                title: Some(TranslatedText::from("Drinks")),
                icon: "Coffee".to_string(),
                items: Vec::new(),
            })
            .await
            .unwrap();
        for item in items {
            store.put_item("drinks", &item).await.unwrap();
        }
    }

    async fn display_ids(store: &MenuStore) -> Vec<ItemId> {
        let raw = store.fetch_category("drinks").await.unwrap().unwrap();
        project_category(&raw, Language::ENGLISH)
            .items
            .iter()
            .map(|i| i.id)
            .collect()
    }

    /// Fails every order update for one item id.
    struct FailingStore {
        inner: MemoryStore,
        poisoned_key: String,
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn list(&self, c: &str) -> Result<Vec<crate::store::Document>, MenuError> {
            self.inner.list(c).await
        }
        async fn get(&self, c: &str, k: &str) -> Result<Option<Value>, MenuError> {
            self.inner.get(c, k).await
        }
        async fn set(&self, c: &str, k: &str, d: Value) -> Result<(), MenuError> {
            self.inner.set(c, k, d).await
        }
        async fn update(&self, c: &str, k: &str, f: Map<String, Value>) -> Result<(), MenuError> {
            if k == self.poisoned_key {
                return Err(MenuError::Store("permission denied".to_string()));
            }
            self.inner.update(c, k, f).await
        }
        async fn delete(&self, c: &str, k: &str) -> Result<(), MenuError> {
            self.inner.delete(c, k).await
        }
        async fn find_by_field(
            &self,
            c: &str,
            f: &str,
            v: &Value,
        ) -> Result<Vec<crate::store::Document>, MenuError> {
            self.inner.find_by_field(c, f, v).await
        }
    }

    // ==================== reorder Tests ====================

    #[tokio::test]
    async fn test_reorder_then_projection_follows_new_order() {
        let store = MenuStore::in_memory();
        seeded(
            &store,
            vec![item(1, "Tea", None), item(2, "Coffee", None), item(3, "Juice", None)],
        )
        .await;

        let service = OrderingService::new(store.clone());
        service.reorder("drinks", &[3, 1, 2]).await.unwrap();

        assert_eq!(display_ids(&store).await, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_reorder_empty_list_succeeds() {
        let store = MenuStore::in_memory();
        seeded(&store, vec![]).await;
        OrderingService::new(store).reorder("drinks", &[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_reorder_unknown_item_reports_partial_failure() {
        let store = MenuStore::in_memory();
        seeded(&store, vec![item(1, "Tea", None), item(2, "Coffee", None)]).await;

        let result = OrderingService::new(store.clone())
            .reorder("drinks", &[2, 99, 1])
            .await;

        assert!(matches!(
            result,
            Err(MenuError::PartialReorder { failed: 1, total: 3 })
        ));
        // Updates that succeeded are not rolled back
        let items = store.fetch_items("drinks").await.unwrap();
        let tea = items.iter().find(|i| i.id == 1).unwrap();
        assert_eq!(tea.order, Some(2));
    }

    #[tokio::test]
    async fn test_reorder_store_failure_is_single_error() {
        let store = MenuStore::new(Arc::new(FailingStore {
            inner: MemoryStore::new(),
            poisoned_key: "2".to_string(),
        }));
        seeded(
            &store,
            vec![item(1, "Tea", None), item(2, "Coffee", None), item(3, "Juice", None)],
        )
        .await;

        let result = OrderingService::new(store.clone())
            .reorder("drinks", &[1, 2, 3])
            .await;

        assert!(matches!(
            result,
            Err(MenuError::PartialReorder { failed: 1, total: 3 })
        ));
        let items = store.fetch_items("drinks").await.unwrap();
        let coffee = items.iter().find(|i| i.id == 2).unwrap();
        assert_eq!(coffee.order, None);
    }

    #[tokio::test]
    async fn test_reorder_unknown_category_is_not_found() {
        let store = MenuStore::in_memory();
        let result = OrderingService::new(store.clone())
            .reorder("ghost", &[1, 2])
            .await;

        assert!(matches!(result, Err(MenuError::NotFound(_))));
        assert!(store.fetch_items("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reorder_rejects_repeated_item() {
        let store = MenuStore::in_memory();
        seeded(&store, vec![item(1, "Tea", Some(0)), item(2, "Coffee", Some(1))]).await;

        let result = OrderingService::new(store.clone())
            .reorder("drinks", &[2, 1, 2])
            .await;

        assert!(matches!(result, Err(MenuError::Validation(_))));
        assert_eq!(display_ids(&store).await, vec![1, 2]);
    }

    // ==================== move_item Tests ====================

    #[tokio::test]
    async fn test_move_item_up_swaps_with_previous() {
        let store = MenuStore::in_memory();
        seeded(
            &store,
            vec![item(1, "A", Some(0)), item(2, "B", Some(1)), item(3, "C", Some(2))],
        )
        .await;

        OrderingService::new(store.clone())
            .move_item("drinks", 3, MoveDirection::Up)
            .await
            .unwrap();

        assert_eq!(display_ids(&store).await, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn test_move_item_down_from_alphabetical_order() {
        let store = MenuStore::in_memory();
        // No explicit orders: display order is alphabetical (Apple, Banana, Cherry)
        seeded(
            &store,
            vec![item(1, "Cherry", None), item(2, "Apple", None), item(3, "Banana", None)],
        )
        .await;

        OrderingService::new(store.clone())
            .move_item("drinks", 2, MoveDirection::Down)
            .await
            .unwrap();

        assert_eq!(display_ids(&store).await, vec![3, 2, 1]);
        let items = store.fetch_items("drinks").await.unwrap();
        assert!(items.iter().all(|i| i.order.is_some()));
    }

    #[tokio::test]
    async fn test_move_first_item_up_is_noop() {
        let store = MenuStore::in_memory();
        seeded(&store, vec![item(1, "A", Some(0)), item(2, "B", Some(1))]).await;
        let before = store.fetch_items("drinks").await.unwrap();

        OrderingService::new(store.clone())
            .move_item("drinks", 1, MoveDirection::Up)
            .await
            .unwrap();

        assert_eq!(store.fetch_items("drinks").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_move_last_item_down_is_noop() {
        let store = MenuStore::in_memory();
        seeded(&store, vec![item(1, "A", Some(0)), item(2, "B", Some(1))]).await;

        OrderingService::new(store.clone())
            .move_item("drinks", 2, MoveDirection::Down)
            .await
            .unwrap();

        assert_eq!(display_ids(&store).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_move_unknown_item_is_not_found() {
        let store = MenuStore::in_memory();
        seeded(&store, vec![item(1, "A", Some(0))]).await;

        let result = OrderingService::new(store)
            .move_item("drinks", 42, MoveDirection::Up)
            .await;
        assert!(matches!(result, Err(MenuError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_move_in_unknown_category_is_not_found() {
        let result = OrderingService::new(MenuStore::in_memory())
            .move_item("ghost", 1, MoveDirection::Down)
            .await;
        assert!(matches!(result, Err(MenuError::NotFound(_))));
    }

    #[test]
    fn test_direction_deserializes_lowercase() {
        let up: MoveDirection = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(up, MoveDirection::Up);
    }
}
