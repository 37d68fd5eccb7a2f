//! Verse and notes layout
//!
//! Turns verse blocks into document nodes. The tag view lists each block
//! under a reference heading; the notes view puts verses and their notes
//! side by side in a two-column table.

use crate::blocker::VerseBlock;
use crate::document_model::{
    mm_to_twips, DocumentNode, Inline, Paragraph, RunFormat, StyledRun, Table, TableCell,
    TableRow,
};
use crate::markup::render;
use crate::verse::{book_note_key, NotesMap, Verse};
use crate::verse_content::strip_verse_markup;

/// Paragraph style used for rendered notes
pub const NOTES_STYLE: &str = "notes";

/// Heading level of block references and chapter headings
const REFERENCE_HEADING_LEVEL: u8 = 3;

/// Spacing above a block reference heading, in twips
const REFERENCE_SPACING_BEFORE: u32 = 200;

/// Width of each notes table column
const NOTES_COLUMN_WIDTH_MM: f64 = 95.0;

/// Cell margin of the notes table
const NOTES_CELL_MARGIN_MM: f64 = 2.0;

/// Render a single verse as a paragraph
///
/// The verse number is set in superscript, followed by the verse text with
/// its markup stripped.
pub fn render_verse(verse: &Verse) -> Paragraph {
    let content = strip_verse_markup(&verse.content);

    Paragraph::new(vec![
        Inline::Run(StyledRun::with_format(
            verse.verse_nr.to_string(),
            RunFormat::superscript(),
        )),
        Inline::Run(StyledRun::new(format!(" {}", content))),
    ])
}

/// Reference text of a block, e.g. "Genesis 3:5-7"
///
/// # Returns
/// * `Some(String)` - The reference for a non-empty block
/// * `None` - The block is empty
pub fn reference_heading(block: &VerseBlock<'_>, book_title: &str, separator: &str) -> Option<String> {
    let first = block.first()?;
    let last = block.last()?;

    let mut reference = format!(
        "{} {}{}{}",
        book_title, first.chapter, separator, first.verse_nr
    );

    if block.len() >= 2 {
        if last.chapter == first.chapter {
            reference.push_str(&format!("-{}", last.verse_nr));
        } else {
            reference.push_str(&format!(" - {}{}{}", last.chapter, separator, last.verse_nr));
        }
    }

    Some(reference)
}

/// Lay out a block as a reference heading followed by one paragraph per verse
///
/// # Parameters
/// * `block` - Verses to lay out
/// * `book_title` - Display title of the block's book
/// * `separator` - Chapter/verse separator of the translation (e.g. ":")
///
/// # Returns
/// * `Vec<DocumentNode>` - Heading and verse paragraphs (empty for an empty block)
pub fn layout_tag_view(block: &VerseBlock<'_>, book_title: &str, separator: &str) -> Vec<DocumentNode> {
    let Some(reference) = reference_heading(block, book_title, separator) else {
        return Vec::new();
    };

    let heading = Paragraph::heading(
        REFERENCE_HEADING_LEVEL,
        vec![Inline::Run(StyledRun::new(reference))],
    )
    .spacing_before(REFERENCE_SPACING_BEFORE);

    std::iter::once(heading)
        .chain(block.verses().iter().map(|verse| render_verse(verse)))
        .map(DocumentNode::from)
        .collect()
}

/// Lay out a chapter block as a verse/notes table
///
/// # Parameters
/// * `block` - Verses of one chapter
/// * `notes` - Book and verse notes
/// * `is_first_chapter` - Prepend the book-level note, if any
/// * `has_multiple_chapters` - Insert a chapter heading before the table
/// * `chapter_label` - Localized word for "chapter"
///
/// # Returns
/// * `Vec<DocumentNode>` - Optional book note, optional heading, and the table
pub fn layout_notes_view(
    block: &VerseBlock<'_>,
    notes: &NotesMap,
    is_first_chapter: bool,
    has_multiple_chapters: bool,
    chapter_label: &str,
) -> Vec<DocumentNode> {
    let Some(first) = block.first() else {
        return Vec::new();
    };

    let mut nodes = Vec::new();

    if is_first_chapter {
        if let Some(book_note) = notes.get(&book_note_key(&first.book_short_title)) {
            nodes.extend(render(&book_note.text, Some(NOTES_STYLE)));
        }
    }

    if has_multiple_chapters {
        let label = format!("{} {}", chapter_label, first.chapter);
        nodes.push(
            Paragraph::heading(
                REFERENCE_HEADING_LEVEL,
                vec![Inline::Run(StyledRun::new(label))],
            )
            .into(),
        );
    }

    let rows = block
        .verses()
        .iter()
        .map(|verse| notes_row(verse, notes))
        .collect();

    let column_width = mm_to_twips(NOTES_COLUMN_WIDTH_MM);
    nodes.push(
        Table {
            column_widths: vec![column_width, column_width],
            cell_margin: mm_to_twips(NOTES_CELL_MARGIN_MM),
            rows,
        }
        .into(),
    );

    nodes
}

/// Table row pairing a verse with its note
fn notes_row(verse: &Verse, notes: &NotesMap) -> TableRow {
    let note_content = notes
        .get(&verse.note_key())
        .map(|note| render(&note.text, Some(NOTES_STYLE)))
        .unwrap_or_default();

    TableRow {
        cells: vec![
            TableCell::new(vec![render_verse(verse).into()]),
            TableCell::new(note_content),
        ],
        cant_split: true,
    }
}
