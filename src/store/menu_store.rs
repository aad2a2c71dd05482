use super::{DocumentStore, MemoryStore};
use crate::error::MenuError;
use crate::menu::{ItemId, RawCategory, RawItem};
use futures::future::try_join_all;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

const CATEGORIES: &str = "categories";

fn items_collection(category_id: &str) -> String {
    format!("{}/{}/items", CATEGORIES, category_id)
}

/// Typed access to the menu collections.
///
/// Cheap to clone; every clone talks to the same underlying store.
#[derive(Clone)]
pub struct MenuStore {
    docs: Arc<dyn DocumentStore>,
}

impl MenuStore {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    // ==================== Reads ====================

    /// Every category with its items, in store key order.
    ///
    /// Documents that do not parse are skipped with a warning so one bad
    /// document cannot blank the whole menu.
    pub async fn fetch_menu(&self) -> Result<Vec<RawCategory>, MenuError> {
        let docs = self.docs.list(CATEGORIES).await?;

        let categories = try_join_all(docs.into_iter().filter_map(|doc| {
            match serde_json::from_value::<RawCategory>(doc.data) {
                Ok(category) => Some(self.with_items(doc.key, category)),
                Err(e) => {
                    warn!("Skipping malformed category '{}': {}", doc.key, e);
                    None
                }
            }
        }))
        .await?;

        debug!("Fetched {} categories", categories.len());
        Ok(categories)
    }

    /// One category with its items, or `None` if it does not exist.
    pub async fn fetch_category(&self, id: &str) -> Result<Option<RawCategory>, MenuError> {
        match self.docs.get(CATEGORIES, id).await? {
            Some(data) => {
                let category: RawCategory = serde_json::from_value(data)?;
                Ok(Some(self.with_items(id.to_string(), category).await?))
            }
            None => Ok(None),
        }
    }

    pub async fn category_exists(&self, id: &str) -> Result<bool, MenuError> {
        Ok(self.docs.get(CATEGORIES, id).await?.is_some())
    }

    pub async fn fetch_items(&self, category_id: &str) -> Result<Vec<RawItem>, MenuError> {
        let docs = self.docs.list(&items_collection(category_id)).await?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<RawItem>(doc.data) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(
                        "Skipping malformed item '{}' in category '{}': {}",
                        doc.key, category_id, e
                    );
                    None
                }
            })
            .collect())
    }

    async fn with_items(
        &self,
        id: String,
        mut category: RawCategory,
    ) -> Result<RawCategory, MenuError> {
        category.items = self.fetch_items(&id).await?;
        category.id = id;
        Ok(category)
    }

    /// Key of the document holding item `item_id`, located by its `id` field.
    pub async fn find_item_key(
        &self,
        category_id: &str,
        item_id: ItemId,
    ) -> Result<Option<String>, MenuError> {
        let found = self
            .docs
            .find_by_field(&items_collection(category_id), "id", &json!(item_id))
            .await?;

        Ok(found.into_iter().next().map(|doc| doc.key))
    }

    // ==================== Category Writes ====================

    /// Create or overwrite the category document. Items are not touched.
    pub async fn put_category(&self, category: &RawCategory) -> Result<(), MenuError> {
        let data = serde_json::to_value(category)?;
        self.docs.set(CATEGORIES, &category.id, data).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), MenuError> {
        self.docs
            .update(CATEGORIES, id, fields)
            .await
            .map_err(|e| match e {
                MenuError::NotFound(_) => MenuError::category_not_found(id),
                other => other,
            })
    }

    /// Delete a category and every item in it.
    ///
    /// Items go first so a failure part way leaves the category visible
    /// rather than orphaned items.
    pub async fn delete_category(&self, id: &str) -> Result<(), MenuError> {
        let collection = items_collection(id);
        for doc in self.docs.list(&collection).await? {
            self.docs.delete(&collection, &doc.key).await?;
        }
        self.docs.delete(CATEGORIES, id).await
    }

    // ==================== Item Writes ====================

    /// Create or overwrite an item, keyed by the string form of its id.
    pub async fn put_item(&self, category_id: &str, item: &RawItem) -> Result<(), MenuError> {
        let data = serde_json::to_value(item)?;
        self.docs
            .set(&items_collection(category_id), &item.id.to_string(), data)
            .await
    }

    pub async fn update_item(
        &self,
        category_id: &str,
        item_id: ItemId,
        fields: Map<String, Value>,
    ) -> Result<(), MenuError> {
        let key = self
            .find_item_key(category_id, item_id)
            .await?
            .ok_or_else(|| MenuError::item_not_found(category_id, item_id))?;

        self.docs
            .update(&items_collection(category_id), &key, fields)
            .await
    }

    pub async fn delete_item(&self, category_id: &str, item_id: ItemId) -> Result<(), MenuError> {
        let key = self
            .find_item_key(category_id, item_id)
            .await?
            .ok_or_else(|| MenuError::item_not_found(category_id, item_id))?;

        self.docs.delete(&items_collection(category_id), &key).await
    }

    pub async fn set_item_order(
        &self,
        category_id: &str,
        item_id: ItemId,
        order: i64,
    ) -> Result<(), MenuError> {
        let mut fields = Map::new();
        fields.insert("order".to_string(), json!(order));
        self.update_item(category_id, item_id, fields).await
    }
}
