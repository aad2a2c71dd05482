//! Sample menu and store seeding.

use crate::admin::{CategoryDraft, CategoryPatch, ItemDraft, MenuAdmin};
use crate::error::MenuError;
use crate::menu::{CategoryIcon, TranslatedList, TranslatedText};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const SAMPLE_MENU_JSON: &str = include_str!("../data/sample_menu.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub id: String,
    pub title: TranslatedText,
    #[serde(default)]
    pub icon: CategoryIcon,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedItem {
    pub name: TranslatedText,
    #[serde(default)]
    pub description: Option<TranslatedText>,
    pub price: f64,
    #[serde(default)]
    pub tags: Option<TranslatedList>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub categories: usize,
    pub items: usize,
}

/// The bundled four-category menu in English, Turkish and Russian.
pub fn sample_menu() -> Result<Vec<SeedCategory>> {
    serde_json::from_str(SAMPLE_MENU_JSON).context("Bundled sample menu is malformed")
}

/// Read a menu in the sample menu's JSON shape.
pub fn load_menu_file(path: &Path) -> Result<Vec<SeedCategory>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read menu file {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse menu file {}", path.display()))
}

/// Write `menu` into the store, items ordered as listed.
///
/// Refuses when any category already has items. Categories that exist but
/// are empty get their title and icon overwritten.
pub async fn seed_store(admin: &MenuAdmin, menu: &[SeedCategory]) -> Result<SeedReport, MenuError> {
    let existing = admin.list_raw().await?;
    if existing.iter().any(|category| !category.items.is_empty()) {
        return Err(MenuError::Validation("Menu data already exists".to_string()));
    }

    let mut report = SeedReport::default();

    for category in menu {
        if existing.iter().any(|c| c.id == category.id) {
            admin
                .update_category(
                    &category.id,
                    CategoryPatch {
                        title: Some(category.title.clone()),
                        icon: Some(category.icon),
                    },
                )
                .await?;
        } else {
            admin
                .add_category_with_id(
                    &category.id,
                    CategoryDraft {
                        title: category.title.clone(),
                        icon: category.icon,
                    },
                )
                .await?;
        }
        report.categories += 1;

        for (position, item) in category.items.iter().enumerate() {
            admin
                .add_item(
                    &category.id,
                    ItemDraft {
                        name: item.name.clone(),
                        description: item.description.clone(),
                        price: item.price,
                        tags: item.tags.clone(),
                        image_url: item.image_url.clone(),
                        order: Some(position as i64),
                    },
                )
                .await?;
            report.items += 1;
        }
    }

    info!(
        "✓ Seeded {} categories with {} items",
        report.categories, report.items
    );
    Ok(report)
}
