//! versedoc - export selected Bible verses and notes to Word documents
//!
//! Verses are grouped into blocks, notes written in markdown are rendered
//! into styled paragraphs, and the result is laid out either as a tagged
//! verse list or as a verse/notes table before being written as .docx.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod blocker;
pub mod catalog;
pub mod document_model;
pub mod export_config;
pub mod layout;
pub mod markup;
pub mod pipeline;
pub mod verse;
pub mod verse_content;

// DOCX serializer
pub mod docx_rs_exporter;

pub use blocker::{block_by_chapter, block_by_contiguity, VerseBlock};
pub use catalog::{CatalogError, ConfigCatalog, ModuleInfo, TranslationCatalog};
pub use document_model::DocumentNode;
pub use export_config::{ConfigError, ExportConfig, ExportInput};
pub use pipeline::{build_document, ExportDocument, ExportError, ExportRequest};
pub use verse::{Book, Note, NotesMap, Verse};
