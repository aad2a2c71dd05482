//! Collapsing translated fields to a single language.
//!
//! Both resolvers are total: whatever shape the stored field has, they return
//! a value. The lookup order is the requested language, then
//! `Language::FALLBACK_ORDER` (English, Turkish, Russian).

use crate::i18n::Language;
use crate::menu::{TranslatedList, TranslatedText};

/// Languages to try for `language`, requested one first.
fn lookup_chain(language: Language) -> impl Iterator<Item = Language> {
    std::iter::once(language).chain(Language::FALLBACK_ORDER)
}

/// Resolve a text field for `language`.
///
/// A plain string is returned as-is. For a translation map, empty strings
/// count as missing and the chain moves on. `fallback` is returned when the
/// field is absent or no language in the chain has text.
pub fn resolve(field: Option<&TranslatedText>, language: Language, fallback: &str) -> String {
    match field {
        None => fallback.to_string(),
        Some(TranslatedText::Plain(text)) => text.clone(),
        Some(TranslatedText::Localized(map)) => lookup_chain(language)
            .filter_map(|lang| map.get(lang.code()))
            .find(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| fallback.to_string()),
    }
}

/// Resolve a tag list for `language`.
///
/// Unlike [`resolve`], only a missing key moves the chain on. A language
/// stored with an empty list means "no tags in this language" and is
/// returned as an empty list.
pub fn resolve_tags(field: Option<&TranslatedList>, language: Language) -> Vec<String> {
    match field {
        None => Vec::new(),
        Some(TranslatedList::Plain(tags)) => tags.clone(),
        Some(TranslatedList::Localized(map)) => lookup_chain(language)
            .find_map(|lang| map.get(lang.code()))
            .cloned()
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn text(entries: &[(&str, &str)]) -> TranslatedText {
        TranslatedText::Localized(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn tags(entries: &[(&str, &[&str])]) -> TranslatedList {
        TranslatedList::Localized(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|t| t.to_string()).collect()))
                .collect(),
        )
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_plain_string_unchanged() {
        let field = TranslatedText::from("Tea");
        assert_eq!(resolve(Some(&field), Language::RUSSIAN, "x"), "Tea");
    }

    #[test]
    fn test_resolve_plain_empty_string_is_not_replaced_by_fallback() {
        let field = TranslatedText::from("");
        assert_eq!(resolve(Some(&field), Language::ENGLISH, "fallback"), "");
    }

    #[test]
    fn test_resolve_absent_returns_fallback() {
        assert_eq!(resolve(None, Language::ENGLISH, "drinks"), "drinks");
        assert_eq!(resolve(None, Language::ENGLISH, ""), "");
    }

    #[test]
    fn test_resolve_requested_language_wins() {
        let field = text(&[("en", "Tea"), ("tr", "Çay"), ("ru", "Чай")]);
        assert_eq!(resolve(Some(&field), Language::TURKISH, ""), "Çay");
        assert_eq!(resolve(Some(&field), Language::RUSSIAN, ""), "Чай");
    }

    #[test]
    fn test_resolve_falls_back_to_english() {
        let field = text(&[("en", "A")]);
        assert_eq!(resolve(Some(&field), Language::TURKISH, ""), "A");
    }

    #[test]
    fn test_resolve_falls_back_to_turkish_when_no_english() {
        let field = text(&[("tr", "B")]);
        assert_eq!(resolve(Some(&field), Language::ENGLISH, ""), "B");
    }

    #[test]
    fn test_resolve_prefers_turkish_over_russian() {
        let field = text(&[("ru", "Чай"), ("tr", "Çay")]);
        assert_eq!(resolve(Some(&field), Language::ENGLISH, ""), "Çay");
    }

    #[test]
    fn test_resolve_empty_map_returns_fallback() {
        let field = TranslatedText::Localized(BTreeMap::new());
        assert_eq!(resolve(Some(&field), Language::ENGLISH, "X"), "X");
    }

    #[test]
    fn test_resolve_skips_empty_strings() {
        let field = text(&[("en", ""), ("tr", ""), ("ru", "Чай")]);
        assert_eq!(resolve(Some(&field), Language::ENGLISH, ""), "Чай");
    }

    #[test]
    fn test_resolve_unknown_keys_only_degrades_to_fallback() {
        let field = text(&[("de", "Tee"), ("fr", "Thé")]);
        assert_eq!(resolve(Some(&field), Language::ENGLISH, ""), "");
    }

    // ==================== resolve_tags Tests ====================

    #[test]
    fn test_resolve_tags_plain_list_unchanged() {
        let field = TranslatedList::Plain(vec!["Vegan".to_string()]);
        assert_eq!(resolve_tags(Some(&field), Language::TURKISH), vec!["Vegan"]);
    }

    #[test]
    fn test_resolve_tags_absent_is_empty() {
        assert!(resolve_tags(None, Language::ENGLISH).is_empty());
    }

    #[test]
    fn test_resolve_tags_present_empty_list_does_not_fall_through() {
        let field = tags(&[("en", &[]), ("tr", &["Spicy"])]);
        assert!(resolve_tags(Some(&field), Language::ENGLISH).is_empty());
    }

    #[test]
    fn test_resolve_tags_missing_key_falls_through() {
        let field = tags(&[("tr", &["Spicy"])]);
        assert_eq!(resolve_tags(Some(&field), Language::ENGLISH), vec!["Spicy"]);
    }

    #[test]
    fn test_resolve_tags_requested_language() {
        let field = tags(&[("en", &["Vegan"]), ("ru", &["Веганское"])]);
        assert_eq!(resolve_tags(Some(&field), Language::RUSSIAN), vec!["Веганское"]);
    }

    #[test]
    fn test_resolve_tags_no_usable_key() {
        let field = tags(&[("de", &["Scharf"])]);
        assert!(resolve_tags(Some(&field), Language::TURKISH).is_empty());
    }

    // ==================== Property Tests ====================

    fn language_strategy() -> impl Strategy<Value = Language> {
        prop::sample::select(Language::FALLBACK_ORDER.to_vec())
    }

    fn text_strategy() -> impl Strategy<Value = TranslatedText> {
        prop_oneof![
            ".{0,12}".prop_map(TranslatedText::Plain),
            prop::collection::btree_map("(en|tr|ru|de)", ".{0,12}", 0..4)
                .prop_map(TranslatedText::Localized),
        ]
    }

    proptest! {
        #[test]
        fn prop_resolve_is_deterministic(field in text_strategy(), lang in language_strategy(), fallback in ".{0,8}") {
            let first = resolve(Some(&field), lang, &fallback);
            let second = resolve(Some(&field), lang, &fallback);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_resolve_returns_fallback_or_stored_text(field in text_strategy(), lang in language_strategy(), fallback in ".{0,8}") {
            let resolved = resolve(Some(&field), lang, &fallback);
            let stored = match &field {
                TranslatedText::Plain(text) => vec![text.clone()],
                TranslatedText::Localized(map) => map.values().cloned().collect(),
            };
            prop_assert!(resolved == fallback || stored.contains(&resolved));
        }

        #[test]
        fn prop_resolve_is_non_empty_when_any_known_language_has_text(field in text_strategy(), lang in language_strategy()) {
            if let TranslatedText::Localized(map) = &field {
                let any_known = Language::FALLBACK_ORDER
                    .iter()
                    .any(|l| map.get(l.code()).map(|t| !t.is_empty()).unwrap_or(false));
                if any_known {
                    prop_assert!(!resolve(Some(&field), lang, "").is_empty());
                }
            }
        }
    }
}
