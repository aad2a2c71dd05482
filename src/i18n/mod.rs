//! Internationalization (i18n) for the menu.
//!
//! - `registry`: the closed set of supported languages and their metadata
//! - `language`: validated `Language` handle, fallback order and browser detection
//! - `strings`: localized storefront chrome (heading, subtitle, footer)
//!
//! # Example
//!
//! ```rust,ignore
//! use menu_service::i18n::{Language, LanguageStrings};
//!
//! let turkish = Language::from_code("tr")?;
//! let heading = LanguageStrings::for_language(turkish).menu;
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
