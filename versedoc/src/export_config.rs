//! Export configuration from versedoc.toml
//!
//! An export directory holds a `versedoc.toml` describing the export, a CSV
//! file with the selected verses and, optionally, a TOML file with notes.

use crate::catalog::{ConfigCatalog, ModuleInfo};
use crate::verse::{Book, NotesMap, Verse};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file inside an export directory
pub const CONFIG_FILE_NAME: &str = "versedoc.toml";

/// Main export configuration from versedoc.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Document title (markdown allowed)
    pub title: String,

    /// Identifier of the translation the verses were taken from
    pub translation: String,

    /// Path of the verse CSV, relative to the export directory
    pub verses: PathBuf,

    /// Path of the notes TOML, relative to the export directory
    pub notes: Option<PathBuf>,

    /// Books of a tag export; a notes export when empty
    #[serde(default)]
    pub books: Vec<Book>,

    /// Metadata of known translations, keyed by translation identifier
    #[serde(default)]
    pub translations: BTreeMap<String, ModuleInfo>,

    /// Display titles keyed by untranslated long book title
    #[serde(default)]
    pub book_titles: BTreeMap<String, String>,

    /// Footer lead-in text before the translation name
    #[serde(default = "default_scripture_quote_from")]
    pub scripture_quote_from: String,
}

fn default_scripture_quote_from() -> String {
    "Scripture quoted from".to_string()
}

impl ExportConfig {
    /// Load configuration from a versedoc.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ExportConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        Self::parse(&content).map_err(|e| ConfigError::Toml(path.to_path_buf(), e))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Catalog answering lookups from this configuration
    pub fn catalog(&self) -> ConfigCatalog {
        ConfigCatalog::new(self.translations.clone(), self.book_titles.clone())
    }

    /// Whether this is a tag export (verses grouped per book)
    pub fn is_tag_export(&self) -> bool {
        !self.books.is_empty()
    }
}

/// Everything needed to build one export
#[derive(Debug, Clone)]
pub struct ExportInput {
    pub config: ExportConfig,
    pub verses: Vec<Verse>,
    pub notes: NotesMap,
}

impl ExportInput {
    /// Load the configuration, verses and notes of an export directory
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config = ExportConfig::load(root.join(CONFIG_FILE_NAME))?;

        let verses = load_verses(&root.join(&config.verses))?;

        let notes = match &config.notes {
            Some(notes_path) => load_notes(&root.join(notes_path))?,
            None => NotesMap::new(),
        };

        log::info!(
            "Loaded {} verses and {} notes from {}",
            verses.len(),
            notes.len(),
            root.display()
        );

        Ok(Self {
            config,
            verses,
            notes,
        })
    }
}

/// Load verses from a CSV file with columns `book,chapter,verse,absolute,content`
pub fn load_verses(path: &Path) -> Result<Vec<Verse>, ConfigError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| ConfigError::Csv(path.to_path_buf(), e))?;

    let verses = reader
        .deserialize()
        .collect::<Result<Vec<Verse>, _>>()
        .map_err(|e| ConfigError::Csv(path.to_path_buf(), e))?;

    if !verses
        .windows(2)
        .all(|pair| pair[0].absolute_verse_nr <= pair[1].absolute_verse_nr)
    {
        log::warn!(
            "Verses in {} are not sorted by absolute verse number",
            path.display()
        );
    }

    Ok(verses)
}

/// Load notes from a TOML file of `key = { text = "..." }` entries
pub fn load_notes(path: &Path) -> Result<NotesMap, ConfigError> {
    let content =
        fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

    toml::from_str(&content).map_err(|e| ConfigError::Toml(path.to_path_buf(), e))
}

/// Errors that can occur when loading export input
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("TOML parse error in {}: {}", .0.display(), .1)]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("CSV error in {}: {}", .0.display(), .1)]
    Csv(PathBuf, #[source] csv::Error),
}
