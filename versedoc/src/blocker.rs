//! Partitioning of verse lists into display blocks
//!
//! A block is a maximal run of verses that belong together, either because
//! their absolute numbers are consecutive or because they share a chapter.
//! Empty blocks are never returned.

use crate::verse::Verse;
use itertools::Itertools;

/// An ordered, non-empty run of verses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseBlock<'a> {
    verses: Vec<&'a Verse>,
}

impl<'a> VerseBlock<'a> {
    fn new(verses: Vec<&'a Verse>) -> Self {
        Self { verses }
    }

    /// Verses of this block in input order
    pub fn verses(&self) -> &[&'a Verse] {
        &self.verses
    }

    pub fn first(&self) -> Option<&'a Verse> {
        self.verses.first().copied()
    }

    pub fn last(&self) -> Option<&'a Verse> {
        self.verses.last().copied()
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Absolute verse numbers of the block, mostly useful for diagnostics
    pub fn absolute_numbers(&self) -> Vec<u32> {
        self.verses.iter().map(|v| v.absolute_verse_nr).collect()
    }
}

impl<'a> From<Vec<&'a Verse>> for VerseBlock<'a> {
    fn from(verses: Vec<&'a Verse>) -> Self {
        Self::new(verses)
    }
}

/// Group the verses of one book into runs of consecutive verses
///
/// Verses of other books are skipped. A new block starts whenever the
/// absolute verse number jumps by more than one.
///
/// # Parameters
/// * `verses` - Verse list, sorted by absolute verse number
/// * `book_short_title` - Book whose verses are grouped
///
/// # Returns
/// * `Vec<VerseBlock>` - Blocks in input order (empty if the book has no verses)
pub fn block_by_contiguity<'a>(verses: &'a [Verse], book_short_title: &str) -> Vec<VerseBlock<'a>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&'a Verse> = Vec::new();
    let mut last_verse_nr: u32 = 0;

    for verse in verses
        .iter()
        .filter(|v| v.book_short_title == book_short_title)
    {
        if verse.absolute_verse_nr > last_verse_nr.saturating_add(1) && !current.is_empty() {
            blocks.push(VerseBlock::new(std::mem::take(&mut current)));
        }

        current.push(verse);
        last_verse_nr = verse.absolute_verse_nr;
    }

    if !current.is_empty() {
        blocks.push(VerseBlock::new(current));
    }

    log::debug!(
        "Grouped verses of {} into {} blocks by contiguity",
        book_short_title,
        blocks.len()
    );

    blocks
}

/// Group a verse list into one block per chapter run
///
/// No book filtering is applied; a new block starts whenever the chapter
/// number differs from the previous verse's chapter.
pub fn block_by_chapter(verses: &[Verse]) -> Vec<VerseBlock<'_>> {
    let blocks: Vec<VerseBlock<'_>> = verses
        .iter()
        .chunk_by(|v| v.chapter)
        .into_iter()
        .map(|(_, chunk)| VerseBlock::new(chunk.collect()))
        .collect();

    log::debug!("Grouped verses into {} chapter blocks", blocks.len());

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn verse(book: &str, chapter: u32, verse_nr: u32, absolute: u32) -> Verse {
        Verse::new(book, chapter, verse_nr, absolute, format!("text {}", absolute))
    }

    fn genesis(absolutes: &[u32]) -> Vec<Verse> {
        absolutes
            .iter()
            .map(|&a| verse("Gen", 1, a, a))
            .collect()
    }

    #[test]
    fn test_consecutive_verses_form_one_block() {
        // Arrange
        let verses = genesis(&[4, 5, 6, 7]);

        // Act
        let blocks = block_by_contiguity(&verses, "Gen");

        // Assert
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].absolute_numbers(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_gap_starts_new_block() {
        let verses = genesis(&[1, 2, 3, 7, 8]);

        let blocks = block_by_contiguity(&verses, "Gen");

        let numbers: Vec<Vec<u32>> = blocks.iter().map(|b| b.absolute_numbers()).collect();
        assert_eq!(numbers, vec![vec![1, 2, 3], vec![7, 8]]);
    }

    #[test]
    fn test_other_books_are_filtered_out() {
        let verses = vec![
            verse("Gen", 1, 1, 1),
            verse("Exo", 1, 1, 1534),
            verse("Gen", 1, 2, 2),
        ];

        let blocks = block_by_contiguity(&verses, "Gen");

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0]
            .verses()
            .iter()
            .all(|v| v.book_short_title == "Gen"));
        assert_eq!(blocks[0].absolute_numbers(), vec![1, 2]);
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        assert!(block_by_contiguity(&[], "Gen").is_empty());
        assert!(block_by_chapter(&[]).is_empty());
    }

    #[test]
    fn test_book_without_verses_yields_no_blocks() {
        let verses = genesis(&[1, 2]);

        assert!(block_by_contiguity(&verses, "Rev").is_empty());
    }

    #[test]
    fn test_block_by_chapter_splits_on_chapter_change() {
        // Arrange: chapters [1, 1, 2, 2, 3]
        let verses = vec![
            verse("Gen", 1, 1, 1),
            verse("Gen", 1, 2, 2),
            verse("Gen", 2, 1, 32),
            verse("Gen", 2, 2, 33),
            verse("Gen", 3, 1, 57),
        ];

        // Act
        let blocks = block_by_chapter(&verses);

        // Assert
        let sizes: Vec<usize> = blocks.iter().map(VerseBlock::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(blocks[1].absolute_numbers(), vec![32, 33]);
    }

    #[test]
    fn test_block_by_chapter_ignores_numeric_gaps() {
        let verses = vec![verse("Gen", 1, 1, 1), verse("Gen", 1, 20, 20)];

        let blocks = block_by_chapter(&verses);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].first().map(|v| v.verse_nr), Some(1));
        assert_eq!(blocks[0].last().map(|v| v.verse_nr), Some(20));
    }
}
