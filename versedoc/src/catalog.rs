//! Translation metadata lookups
//!
//! Book titles, the reference separator, the chapter label and the module
//! description all come from the Bible module and the localization layer.
//! The [`TranslationCatalog`] trait is the seam to those services; lookup
//! failures are returned to the caller without fallback.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by catalog lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No metadata is known for the translation
    #[error("Unknown translation '{0}'")]
    UnknownTranslation(String),
}

/// Descriptive metadata of a translation module
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleInfo {
    /// Full name of the translation
    pub description: String,

    /// Reference separator between chapter and verse (e.g. ":")
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Localized word for "chapter"
    #[serde(default = "default_chapter_label")]
    pub chapter_label: String,

    /// Distribution license (e.g. "Public Domain")
    pub distribution_license: Option<String>,

    /// Full copyright statement
    pub copyright: Option<String>,

    /// Short copyright statement, preferred over `copyright`
    pub short_copyright: Option<String>,
}

impl ModuleInfo {
    /// Copyright line to print, short form first
    pub fn copyright_line(&self) -> Option<&str> {
        fn non_empty(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|c| !c.is_empty())
        }

        non_empty(&self.short_copyright).or_else(|| non_empty(&self.copyright))
    }
}

fn default_separator() -> String {
    ":".to_string()
}

fn default_chapter_label() -> String {
    "Chapter".to_string()
}

/// Lookups needed to lay out an export
pub trait TranslationCatalog {
    /// Display title for an untranslated long book title
    fn book_title(&self, long_title: &str) -> Result<String, CatalogError>;

    /// Chapter/verse separator of a translation
    fn reference_separator(&self, translation_id: &str) -> Result<String, CatalogError>;

    /// Localized chapter label for a translation
    fn chapter_label(&self, translation_id: &str) -> Result<String, CatalogError>;

    /// Module metadata of a translation
    fn module_info(&self, translation_id: &str) -> Result<ModuleInfo, CatalogError>;
}

/// Catalog backed by the export configuration file
#[derive(Debug, Clone, Default)]
pub struct ConfigCatalog {
    translations: BTreeMap<String, ModuleInfo>,
    book_titles: BTreeMap<String, String>,
}

impl ConfigCatalog {
    pub fn new(
        translations: BTreeMap<String, ModuleInfo>,
        book_titles: BTreeMap<String, String>,
    ) -> Self {
        Self {
            translations,
            book_titles,
        }
    }

    fn translation(&self, translation_id: &str) -> Result<&ModuleInfo, CatalogError> {
        self.translations
            .get(translation_id)
            .ok_or_else(|| CatalogError::UnknownTranslation(translation_id.to_string()))
    }
}

impl TranslationCatalog for ConfigCatalog {
    /// Titles without a configured translation are shown as given
    fn book_title(&self, long_title: &str) -> Result<String, CatalogError> {
        Ok(self
            .book_titles
            .get(long_title)
            .cloned()
            .unwrap_or_else(|| long_title.to_string()))
    }

    fn reference_separator(&self, translation_id: &str) -> Result<String, CatalogError> {
        Ok(self.translation(translation_id)?.separator.clone())
    }

    fn chapter_label(&self, translation_id: &str) -> Result<String, CatalogError> {
        Ok(self.translation(translation_id)?.chapter_label.clone())
    }

    fn module_info(&self, translation_id: &str) -> Result<ModuleInfo, CatalogError> {
        self.translation(translation_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ConfigCatalog {
        let mut translations = BTreeMap::new();
        translations.insert(
            "KJV".to_string(),
            ModuleInfo {
                description: "King James Version".to_string(),
                separator: ":".to_string(),
                chapter_label: "Chapter".to_string(),
                ..ModuleInfo::default()
            },
        );
        let mut titles = BTreeMap::new();
        titles.insert("Genesis".to_string(), "1. Mose".to_string());
        ConfigCatalog::new(translations, titles)
    }

    #[test]
    fn test_unknown_translation_is_an_error() {
        let result = catalog().reference_separator("XYZ");

        assert_eq!(
            result,
            Err(CatalogError::UnknownTranslation("XYZ".to_string()))
        );
    }

    #[test]
    fn test_book_title_falls_back_to_long_title() {
        let catalog = catalog();

        assert_eq!(catalog.book_title("Genesis").unwrap(), "1. Mose");
        assert_eq!(catalog.book_title("Exodus").unwrap(), "Exodus");
    }

    #[test]
    fn test_copyright_line_prefers_short_form() {
        let info = ModuleInfo {
            copyright: Some("Long copyright".to_string()),
            short_copyright: Some("(c) Short".to_string()),
            ..ModuleInfo::default()
        };

        assert_eq!(info.copyright_line(), Some("(c) Short"));
        assert_eq!(ModuleInfo::default().copyright_line(), None);
    }
}
