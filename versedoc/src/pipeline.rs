//! Export pipeline
//!
//! Assembles the complete node sequence of an export:
//! 1. **Blocking**: group the verse list into blocks (per book or per chapter)
//! 2. **Layout**: render each block, with notes, into document nodes
//! 3. **Attribution**: build the footer from the translation's metadata
//!
//! The result is an [`ExportDocument`] that the docx exporter serializes.

use crate::blocker::{block_by_chapter, block_by_contiguity};
use crate::catalog::{CatalogError, ModuleInfo, TranslationCatalog};
use crate::document_model::{DocumentNode, Inline, Paragraph, ParagraphKind, RunFormat, StyledRun};
use crate::export_config::ExportInput;
use crate::layout::{layout_notes_view, layout_tag_view};
use crate::markup::render;
use crate::verse::{Book, NotesMap, Verse};
use thiserror::Error;

/// A fully laid out export, ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Plain-text title (document metadata)
    pub title: String,

    /// Body nodes in order
    pub body: Vec<DocumentNode>,

    /// Footer nodes
    pub footer: Vec<DocumentNode>,
}

impl ExportDocument {
    /// Number of tables in the body
    pub fn table_count(&self) -> usize {
        self.body.iter().filter(|n| n.as_table().is_some()).count()
    }
}

/// What to export and how
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Document title (markdown allowed)
    pub title: &'a str,

    /// Translation the verses come from
    pub translation_id: &'a str,

    /// Verses sorted by absolute verse number
    pub verses: &'a [Verse],

    /// Books of a tag export; `None` for a notes export
    pub books: Option<&'a [Book]>,

    /// Book and verse notes
    pub notes: &'a NotesMap,

    /// Footer lead-in text before the translation name
    pub scripture_quote_from: &'a str,
}

impl<'a> ExportRequest<'a> {
    /// Build a request from loaded export input
    pub fn from_input(input: &'a ExportInput) -> Self {
        let config = &input.config;
        Self {
            title: &config.title,
            translation_id: &config.translation,
            verses: &input.verses,
            books: config.is_tag_export().then_some(config.books.as_slice()),
            notes: &input.notes,
            scripture_quote_from: &config.scripture_quote_from,
        }
    }
}

/// Build the export document
///
/// # Parameters
/// * `request` - Verses, notes and title of the export
/// * `catalog` - Source of book titles, separators and module metadata
///
/// # Returns
/// * `Ok(ExportDocument)` - The laid out document
/// * `Err(ExportError)` - A catalog lookup failed
pub fn build_document(
    request: &ExportRequest<'_>,
    catalog: &dyn TranslationCatalog,
) -> Result<ExportDocument, ExportError> {
    let separator = catalog.reference_separator(request.translation_id)?;

    let body = match request.books {
        Some(books) => build_tag_export(request, books, catalog, &separator)?,
        None => build_notes_export(request, catalog)?,
    };

    let module = catalog.module_info(request.translation_id)?;
    let footer = vec![attribution_paragraph(&module, request.scripture_quote_from).into()];

    let title = plain_title(request.title);
    log::info!("Built '{}' with {} body nodes", title, body.len());

    Ok(ExportDocument {
        title,
        body,
        footer,
    })
}

/// Title heading, then per book a book heading and one section per verse block
fn build_tag_export(
    request: &ExportRequest<'_>,
    books: &[Book],
    catalog: &dyn TranslationCatalog,
    separator: &str,
) -> Result<Vec<DocumentNode>, ExportError> {
    let mut body = render(&format!("# {}", request.title), None);

    for book in books {
        let book_title = catalog.book_title(&book.long_title)?;
        let blocks = block_by_contiguity(request.verses, &book.short_title);

        log::info!("{}: {} verse blocks", book_title, blocks.len());

        body.push(
            Paragraph::heading(2, vec![Inline::Run(StyledRun::new(book_title.clone()))]).into(),
        );

        for block in &blocks {
            body.extend(layout_tag_view(block, &book_title, separator));
        }
    }

    Ok(body)
}

/// Title, then one verse/notes table per chapter
fn build_notes_export(
    request: &ExportRequest<'_>,
    catalog: &dyn TranslationCatalog,
) -> Result<Vec<DocumentNode>, ExportError> {
    let chapter_label = catalog.chapter_label(request.translation_id)?;
    let blocks = block_by_chapter(request.verses);
    let has_multiple_chapters = blocks.len() > 1;

    log::info!("Notes export: {} chapter blocks", blocks.len());

    let mut body = vec![Paragraph::from_text(request.title)
        .kind(ParagraphKind::Title)
        .into()];

    for (index, block) in blocks.iter().enumerate() {
        body.extend(layout_notes_view(
            block,
            request.notes,
            index == 0,
            has_multiple_chapters,
            &chapter_label,
        ));
    }

    Ok(body)
}

/// Footer paragraph naming the translation and its license
fn attribution_paragraph(module: &ModuleInfo, scripture_quote_from: &str) -> Paragraph {
    let mut runs = vec![
        StyledRun::new(format!("{} ", scripture_quote_from)),
        StyledRun::with_format(module.description.clone(), RunFormat::bold()),
    ];

    if let Some(license) = module
        .distribution_license
        .as_deref()
        .filter(|l| !l.is_empty())
    {
        runs.push(StyledRun::new(format!(" ({})", license)));
    }

    if let Some(copyright) = module.copyright_line() {
        runs.push(StyledRun::new(copyright).after_break());
    }

    Paragraph::new(runs.into_iter().map(Inline::Run).collect())
}

/// Plain text of a markdown title
fn plain_title(title: &str) -> String {
    render(title, None)
        .iter()
        .filter_map(DocumentNode::as_paragraph)
        .map(Paragraph::plain_text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Translation lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write DOCX: {0}")]
    Pack(String),
}
