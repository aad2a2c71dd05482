//! Projection of stored categories into single-language view models.

use crate::i18n::Language;
use crate::menu::{CategoryIcon, RawCategory, RawItem, ResolvedCategory, ResolvedItem};
use crate::resolve::{resolve, resolve_tags};
use icu::collator::{Collator, CollatorOptions, Strength};
use icu::locid::Locale;
use std::cmp::Ordering;
use tracing::warn;

/// Project all categories into `language`, sorted by resolved title.
pub fn project(raw_categories: &[RawCategory], language: Language) -> Vec<ResolvedCategory> {
    let collation = Collation::for_language(language);

    let mut categories: Vec<ResolvedCategory> = raw_categories
        .iter()
        .map(|category| project_with(category, language, &collation))
        .collect();

    categories.sort_by(|a, b| collation.compare(&a.title, &b.title));
    categories
}

/// Project one category, sorting its items into display order.
///
/// The title falls back to the document key, so a resolved category always
/// has a title.
pub fn project_category(raw: &RawCategory, language: Language) -> ResolvedCategory {
    project_with(raw, language, &Collation::for_language(language))
}

fn project_with(raw: &RawCategory, language: Language, collation: &Collation) -> ResolvedCategory {
    let mut items: Vec<ResolvedItem> = raw
        .items
        .iter()
        .map(|item| project_item(item, language))
        .collect();

    // sort_by is stable: equal orders keep their stored order
    items.sort_by(|a, b| compare_items(a, b, collation));

    ResolvedCategory {
        id: raw.id.clone(),
        title: resolve(raw.title.as_ref(), language, &raw.id),
        icon: CategoryIcon::from_stored(&raw.icon),
        items,
    }
}

fn project_item(raw: &RawItem, language: Language) -> ResolvedItem {
    ResolvedItem {
        id: raw.id,
        name: resolve(raw.name.as_ref(), language, ""),
        description: resolve(raw.description.as_ref(), language, ""),
        price: raw.price,
        tags: resolve_tags(raw.tags.as_ref(), language),
        image_url: raw.image_url.clone(),
        order: raw.order,
    }
}

/// Explicitly ordered items first (ascending), then the rest by name.
fn compare_items(a: &ResolvedItem, b: &ResolvedItem, collation: &Collation) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collation.compare(&a.name, &b.name),
    }
}

/// Alphabetical order of the projected language: Turkish `Ç` sorts between
/// `C` and `D`, Russian `Ё` next to `Е`.
struct Collation {
    collator: Option<Collator>,
}

impl Collation {
    fn for_language(language: Language) -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);

        let collator = language
            .code()
            .parse::<Locale>()
            .map_err(|e| e.to_string())
            .and_then(|locale| {
                Collator::try_new(&locale.into(), options).map_err(|e| e.to_string())
            });

        match collator {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(e) => {
                warn!("No collation data for '{}', sorting case-insensitively: {}", language, e);
                Self { collator: None }
            }
        }
    }

    /// Total order: collation first, exact text as tie-break.
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        collated.then_with(|| a.cmp(b))
    }
}
