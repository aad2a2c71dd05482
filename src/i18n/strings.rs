use crate::i18n::Language;
use serde::Serialize;

/// Localized storefront chrome for one language.
///
/// Menu content itself lives in the store; these are the fixed strings
/// surrounding it.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageStrings {
    /// Page heading (e.g., "Menu")
    pub menu: &'static str,

    /// Tagline shown under the heading
    pub subtitle: &'static str,

    /// Footer line
    pub footer: &'static str,
}

impl LanguageStrings {
    /// Strings for a language. Every registered language has a table.
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        match language.code() {
            "tr" => &TURKISH_STRINGS,
            "ru" => &RUSSIAN_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    menu: "Menu",
    subtitle: "A curated selection of culinary excellence, crafted with care and served with passion",
    footer: "Crafted with care • Made with passion",
};

// ==================== Turkish Strings ====================

pub const TURKISH_STRINGS: LanguageStrings = LanguageStrings {
    menu: "Menü",
    subtitle: "Özenle seçilmiş ve tutkuyla servis edilen mutfak mükemmelliği",
    footer: "Özenle hazırlandı • Tutkuyla yapıldı",
};

// ==================== Russian Strings ====================

pub const RUSSIAN_STRINGS: LanguageStrings = LanguageStrings {
    menu: "Меню",
    subtitle: "Кураторская подборка кулинарного совершенства, созданная с заботой и подаваемая со страстью",
    footer: "Создано с заботой • Сделано со страстью",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_non_empty_strings() {
        for language in Language::all() {
            let strings = LanguageStrings::for_language(language);
            assert!(!strings.menu.is_empty(), "{} menu", language);
            assert!(!strings.subtitle.is_empty(), "{} subtitle", language);
            assert!(!strings.footer.is_empty(), "{} footer", language);
        }
    }

    #[test]
    fn test_for_language_turkish() {
        assert_eq!(LanguageStrings::for_language(Language::TURKISH).menu, "Menü");
    }
}
