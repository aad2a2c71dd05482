//! Administrative create/update/delete of categories and items.
//!
//! Every operation validates its input before touching the store, so a
//! rejected request has no effect.

use crate::error::MenuError;
use crate::i18n::Language;
use crate::menu::{CategoryIcon, ItemId, RawCategory, RawItem, TranslatedList, TranslatedText};
use crate::resolve::resolve;
use crate::store::MenuStore;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::info;

// ==================== Requests ====================

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDraft {
    pub title: TranslatedText,
    #[serde(default)]
    pub icon: CategoryIcon,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub title: Option<TranslatedText>,
    #[serde(default)]
    pub icon: Option<CategoryIcon>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: TranslatedText,
    #[serde(default)]
    pub description: Option<TranslatedText>,
    pub price: f64,
    #[serde(default)]
    pub tags: Option<TranslatedList>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Explicit position; defaults to the end of the category.
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<TranslatedText>,
    #[serde(default)]
    pub description: Option<TranslatedText>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub tags: Option<TranslatedList>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

// ==================== Stats ====================

/// Dashboard summary of the whole menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuStats {
    pub total_items: usize,
    pub categories: usize,
    /// Mean item price, 0 when the menu has no items.
    pub avg_price: f64,
}

impl MenuStats {
    pub fn from_menu(categories: &[RawCategory]) -> Self {
        let prices: Vec<f64> = categories
            .iter()
            .flat_map(|category| category.items.iter().map(|item| item.price))
            .collect();

        let avg_price = if prices.is_empty() {
            0.0
        } else {
            prices.iter().sum::<f64>() / prices.len() as f64
        };

        Self {
            total_items: prices.len(),
            categories: categories.len(),
            avg_price,
        }
    }
}

// ==================== Validation ====================

fn validate_title(title: &TranslatedText) -> Result<(), MenuError> {
    if !title.has_content() {
        return Err(MenuError::Validation("Category name is required".to_string()));
    }
    Ok(())
}

fn validate_name(name: &TranslatedText) -> Result<(), MenuError> {
    if !name.has_content() {
        return Err(MenuError::Validation("Item name is required".to_string()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), MenuError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(MenuError::Validation("Please enter a valid price".to_string()));
    }
    Ok(())
}

static NON_SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Document key for a new category: lowercase, whitespace runs become `-`,
/// anything outside `[a-z0-9-]` is dropped.
pub fn category_slug(title: &str) -> String {
    let whitespace = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    let non_slug = NON_SLUG_REGEX.get_or_init(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

    let lowered = title.trim().to_lowercase();
    let dashed = whitespace.replace_all(&lowered, "-");
    non_slug.replace_all(&dashed, "").into_owned()
}

/// Split comma-separated tag input, dropping blanks.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Order that places a new item after every existing one.
fn next_order(items: &[RawItem]) -> i64 {
    items
        .iter()
        .filter_map(|item| item.order)
        .max()
        .map_or(0, |last| last + 1)
}

// ==================== Item Ids ====================

/// Wall-clock millisecond ids, forced strictly increasing within the process.
#[derive(Debug, Default)]
pub struct ItemIdGenerator {
    last: AtomicU64,
}

impl ItemIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> ItemId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            });
        match previous {
            Ok(last) | Err(last) => now.max(last + 1),
        }
    }
}

// ==================== Service ====================

/// Category and item management.
#[derive(Clone)]
pub struct MenuAdmin {
    store: MenuStore,
    ids: Arc<ItemIdGenerator>,
}

impl MenuAdmin {
    pub fn new(store: MenuStore) -> Self {
        Self {
            store,
            ids: Arc::new(ItemIdGenerator::new()),
        }
    }

    pub fn store(&self) -> &MenuStore {
        &self.store
    }

    /// Raw categories with all translations, for editing.
    pub async fn list_raw(&self) -> Result<Vec<RawCategory>, MenuError> {
        self.store.fetch_menu().await
    }

    pub async fn stats(&self) -> Result<MenuStats, MenuError> {
        Ok(MenuStats::from_menu(&self.store.fetch_menu().await?))
    }

    /// Create a category keyed by the slug of its English title.
    pub async fn add_category(&self, draft: CategoryDraft) -> Result<String, MenuError> {
        validate_title(&draft.title)?;

        let id = category_slug(&resolve(Some(&draft.title), Language::ENGLISH, ""));
        if id.is_empty() {
            return Err(MenuError::Validation(
                "Invalid category name. Please use letters, numbers, and spaces only.".to_string(),
            ));
        }

        self.add_category_with_id(&id, draft).await?;
        Ok(id)
    }

    /// Create a category under an explicit key.
    pub async fn add_category_with_id(
        &self,
        id: &str,
        draft: CategoryDraft,
    ) -> Result<(), MenuError> {
        validate_title(&draft.title)?;
        if id.trim().is_empty() || id.contains('/') {
            return Err(MenuError::Validation(format!("Invalid category id '{}'", id)));
        }
        if self.store.category_exists(id).await? {
            return Err(MenuError::Validation(format!(
                "Category '{}' already exists",
                id
            )));
        }

        self.store
            .put_category(&RawCategory {
                id: id.to_string(),
                title: Some(draft.title),
                icon: draft.icon.as_str().to_string(),
                items: Vec::new(),
            })
            .await?;

        info!("Added category '{}'", id);
        Ok(())
    }

    pub async fn update_category(&self, id: &str, patch: CategoryPatch) -> Result<(), MenuError> {
        let mut fields = Map::new();
        if let Some(title) = patch.title {
            validate_title(&title)?;
            fields.insert("title".to_string(), serde_json::to_value(title)?);
        }
        if let Some(icon) = patch.icon {
            fields.insert("icon".to_string(), Value::from(icon.as_str()));
        }
        if fields.is_empty() {
            return Err(MenuError::Validation("Nothing to update".to_string()));
        }

        self.store.update_category(id, fields).await?;
        info!("Updated category '{}'", id);
        Ok(())
    }

    /// Delete a category together with all of its items.
    pub async fn delete_category(&self, id: &str) -> Result<(), MenuError> {
        if !self.store.category_exists(id).await? {
            return Err(MenuError::category_not_found(id));
        }
        self.store.delete_category(id).await?;
        info!("Deleted category '{}'", id);
        Ok(())
    }

    /// Add an item at the end of a category and return its new id.
    pub async fn add_item(&self, category_id: &str, draft: ItemDraft) -> Result<ItemId, MenuError> {
        validate_name(&draft.name)?;
        validate_price(draft.price)?;

        if !self.store.category_exists(category_id).await? {
            return Err(MenuError::category_not_found(category_id));
        }

        let mut id = self.ids.next_id();
        while self.store.find_item_key(category_id, id).await?.is_some() {
            id = self.ids.next_id();
        }

        let order = match draft.order {
            Some(order) => order,
            None => next_order(&self.store.fetch_items(category_id).await?),
        };

        self.store
            .put_item(
                category_id,
                &RawItem {
                    id,
                    name: Some(draft.name),
                    description: draft.description,
                    price: draft.price,
                    tags: draft.tags,
                    image_url: draft.image_url.filter(|url| !url.trim().is_empty()),
                    order: Some(order),
                },
            )
            .await?;

        info!("Added item {} to '{}'", id, category_id);
        Ok(id)
    }

    pub async fn update_item(
        &self,
        category_id: &str,
        item_id: ItemId,
        patch: ItemPatch,
    ) -> Result<(), MenuError> {
        let mut fields = Map::new();
        if let Some(name) = patch.name {
            validate_name(&name)?;
            fields.insert("name".to_string(), serde_json::to_value(name)?);
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
            fields.insert("price".to_string(), Value::from(price));
        }
        if let Some(description) = patch.description {
            fields.insert("description".to_string(), serde_json::to_value(description)?);
        }
        if let Some(tags) = patch.tags {
            fields.insert("tags".to_string(), serde_json::to_value(tags)?);
        }
        if let Some(image_url) = patch.image_url {
            let image_url = Some(image_url).filter(|url| !url.trim().is_empty());
            fields.insert("imageUrl".to_string(), serde_json::to_value(image_url)?);
        }
        if let Some(order) = patch.order {
            fields.insert("order".to_string(), Value::from(order));
        }
        if fields.is_empty() {
            return Err(MenuError::Validation("Nothing to update".to_string()));
        }

        self.store.update_item(category_id, item_id, fields).await?;
        info!("Updated item {} in '{}'", item_id, category_id);
        Ok(())
    }

    pub async fn delete_item(&self, category_id: &str, item_id: ItemId) -> Result<(), MenuError> {
        self.store.delete_item(category_id, item_id).await?;
        info!("Deleted item {} from '{}'", item_id, category_id);
        Ok(())
    }
}
