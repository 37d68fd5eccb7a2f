//! Verse, book and note records
//!
//! These are the inputs of an export. They are produced outside of this crate
//! (a Bible module and the user's note store) and are never modified here.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A single verse of a translation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verse {
    /// Short identifier of the owning book (e.g. "Gen")
    #[serde(rename = "book")]
    pub book_short_title: String,

    /// Chapter number (1-based)
    pub chapter: u32,

    /// Verse number within the chapter (1-based)
    #[serde(rename = "verse")]
    pub verse_nr: u32,

    /// Position of the verse within the whole translation
    ///
    /// Consecutive verses have consecutive absolute numbers, which is what the
    /// blocker relies on to detect gaps.
    #[serde(rename = "absolute")]
    pub absolute_verse_nr: u32,

    /// Raw verse content as delivered by the module (contains inline markup)
    pub content: String,
}

impl Verse {
    /// Create a new verse record
    pub fn new(
        book_short_title: impl Into<String>,
        chapter: u32,
        verse_nr: u32,
        absolute_verse_nr: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            book_short_title: book_short_title.into(),
            chapter,
            verse_nr,
            absolute_verse_nr,
            content: content.into(),
        }
    }

    /// Key under which a note for this verse is stored
    pub fn note_key(&self) -> String {
        verse_note_key(&self.book_short_title, self.absolute_verse_nr)
    }
}

/// A book of the Bible selected for a tag export
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Book {
    /// Short identifier, matched against [`Verse::book_short_title`]
    pub short_title: String,

    /// Untranslated long title, resolved to a display title by the catalog
    pub long_title: String,
}

/// A user note in markdown
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Note {
    /// Raw markdown text of the note
    pub text: String,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Notes keyed by book (`"gen"`) or by verse (`"gen-42"`)
pub type NotesMap = BTreeMap<String, Note>;

/// Key of a book-level note
pub fn book_note_key(book_short_title: &str) -> String {
    book_short_title.to_lowercase()
}

/// Key of a verse-level note
pub fn verse_note_key(book_short_title: &str, absolute_verse_nr: u32) -> String {
    format!("{}-{}", book_note_key(book_short_title), absolute_verse_nr)
}
