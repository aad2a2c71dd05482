//! Stored menu documents and their resolved, single-language view models.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item identifier, unique within its owning category.
pub type ItemId = u64;

/// A text field that is either a plain string (documents written before
/// translations existed) or a map from language code to string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslatedText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl TranslatedText {
    /// Build a localized value from `(language, text)` pairs.
    pub fn localized<'a>(entries: impl IntoIterator<Item = (Language, &'a str)>) -> Self {
        TranslatedText::Localized(
            entries
                .into_iter()
                .map(|(lang, text)| (lang.code().to_string(), text.to_string()))
                .collect(),
        )
    }

    /// Get the text stored for exactly this language, if any.
    pub fn get(&self, language: Language) -> Option<&str> {
        match self {
            TranslatedText::Plain(_) => None,
            TranslatedText::Localized(map) => map.get(language.code()).map(String::as_str),
        }
    }

    /// True when at least one variant has non-whitespace content.
    pub fn has_content(&self) -> bool {
        match self {
            TranslatedText::Plain(text) => !text.trim().is_empty(),
            TranslatedText::Localized(map) => map.values().any(|text| !text.trim().is_empty()),
        }
    }
}

impl From<&str> for TranslatedText {
    fn from(text: &str) -> Self {
        TranslatedText::Plain(text.to_string())
    }
}

/// A tag list that is either a plain list or a map from language code to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslatedList {
    Plain(Vec<String>),
    Localized(BTreeMap<String, Vec<String>>),
}

impl TranslatedList {
    pub fn localized<'a>(entries: impl IntoIterator<Item = (Language, Vec<&'a str>)>) -> Self {
        TranslatedList::Localized(
            entries
                .into_iter()
                .map(|(lang, tags)| {
                    (
                        lang.code().to_string(),
                        tags.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Icons a category can display. Stored as the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryIcon {
    #[default]
    Leaf,
    Sparkles,
    Coffee,
    UtensilsCrossed,
}

impl CategoryIcon {
    pub const ALL: [CategoryIcon; 4] = [
        CategoryIcon::Leaf,
        CategoryIcon::Sparkles,
        CategoryIcon::Coffee,
        CategoryIcon::UtensilsCrossed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryIcon::Leaf => "Leaf",
            CategoryIcon::Sparkles => "Sparkles",
            CategoryIcon::Coffee => "Coffee",
            CategoryIcon::UtensilsCrossed => "UtensilsCrossed",
        }
    }

    pub fn parse(name: &str) -> Option<CategoryIcon> {
        Self::ALL.into_iter().find(|icon| icon.as_str() == name)
    }

    /// Icon for a stored name; unknown names render as the default icon.
    pub fn from_stored(name: &str) -> CategoryIcon {
        Self::parse(name).unwrap_or_default()
    }
}

/// A category document as stored, plus the items loaded from its
/// sub-collection.
///
/// `id` is the document key and `items` live in their own collection, so
/// neither is part of the serialized document body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(skip)]
    pub id: String,

    #[serde(default)]
    pub title: Option<TranslatedText>,

    #[serde(default)]
    pub icon: String,

    #[serde(skip)]
    pub items: Vec<RawItem>,
}

/// An item document as stored in `categories/{id}/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: ItemId,

    #[serde(default)]
    pub name: Option<TranslatedText>,

    #[serde(default)]
    pub description: Option<TranslatedText>,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub tags: Option<TranslatedList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// A category resolved to a single language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCategory {
    pub id: String,
    pub title: String,
    pub icon: CategoryIcon,
    pub items: Vec<ResolvedItem>,
}

/// An item resolved to a single language.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}
