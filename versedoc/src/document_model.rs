//! Output document tree
//!
//! The renderer and the layout functions produce a flat sequence of
//! [`DocumentNode`]s. The docx exporter turns that sequence into a Word
//! document; nothing in this module knows about the file format.

/// Inline formatting flags of a text run
///
/// Formatting is inherited: a nested token's format is its parent's format
/// merged with its own overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFormat {
    /// Bold formatting
    pub bold: bool,

    /// Italic formatting
    pub italic: bool,

    /// Yellow highlight (used for inline code)
    pub highlight: bool,

    /// Superscript (used for verse numbers)
    pub superscript: bool,
}

impl RunFormat {
    /// Create a format with no flags set
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `overrides` into this format, returning the combined value
    ///
    /// A flag set in either value is set in the result.
    pub fn merge(self, overrides: RunFormat) -> Self {
        Self {
            bold: self.bold || overrides.bold,
            italic: self.italic || overrides.italic,
            highlight: self.highlight || overrides.highlight,
            superscript: self.superscript || overrides.superscript,
        }
    }

    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }

    pub fn highlight() -> Self {
        Self {
            highlight: true,
            ..Self::default()
        }
    }

    pub fn superscript() -> Self {
        Self {
            superscript: true,
            ..Self::default()
        }
    }

    /// Check if any formatting is active
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.highlight || self.superscript
    }
}

/// A span of text with consistent formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    /// The text content
    pub text: String,

    /// Formatting flags
    pub format: RunFormat,

    /// Start the run on a new line
    pub break_before: bool,

    /// Character style id (e.g. "Hyperlink")
    pub char_style: Option<String>,
}

impl StyledRun {
    /// Create a new plain text run
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_format(text, RunFormat::default())
    }

    /// Create a new text run with the specified formatting
    pub fn with_format(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
            break_before: false,
            char_style: None,
        }
    }

    /// Create an empty run that only carries a line break
    pub fn line_break() -> Self {
        Self::new("").after_break()
    }

    /// Mark this run as starting on a new line
    pub fn after_break(mut self) -> Self {
        self.break_before = true;
        self
    }

    /// Apply a character style to this run
    pub fn char_style(mut self, style: impl Into<String>) -> Self {
        self.char_style = Some(style.into());
        self
    }
}

/// An external hyperlink wrapping one or more runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    /// Link target URL
    pub target: String,

    /// Visible runs of the link
    pub runs: Vec<StyledRun>,
}

/// Paragraph content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Run(StyledRun),
    Hyperlink(Hyperlink),
}

impl Inline {
    /// Concatenated text of this inline
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Run(run) => run.text.clone(),
            Inline::Hyperlink(link) => link.runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

impl From<StyledRun> for Inline {
    fn from(run: StyledRun) -> Self {
        Inline::Run(run)
    }
}

/// Numbering definition referenced by a list paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingRef {
    /// Bullet list ("custom-bullets")
    Bullets,
    /// Decimal list ("custom-numbers")
    Numbers,
}

impl NumberingRef {
    /// Reference name of the numbering definition
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberingRef::Bullets => "custom-bullets",
            NumberingRef::Numbers => "custom-numbers",
        }
    }
}

/// Structural role of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    /// Ordinary body text
    Body,
    /// Document title
    Title,
    /// Heading with level 1..=6
    Heading(u8),
    /// Numbered or bulleted list entry
    ListItem {
        /// Numbering definition to use
        numbering: NumberingRef,
        /// Nesting level (always 0 for now)
        level: u8,
    },
    /// Horizontal rule: no text, bottom border only
    Rule,
}

/// A paragraph of inline content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Structural role
    pub kind: ParagraphKind,

    /// Paragraph style id (e.g. "notes", "blockquote")
    pub style: Option<String>,

    /// Runs and hyperlinks in order
    pub children: Vec<Inline>,

    /// Extra spacing before the paragraph, in twips
    pub spacing_before: Option<u32>,
}

impl Paragraph {
    /// Create a body paragraph from inline content
    pub fn new(children: Vec<Inline>) -> Self {
        Self {
            kind: ParagraphKind::Body,
            style: None,
            children,
            spacing_before: None,
        }
    }

    /// Create an empty body paragraph
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Create a paragraph holding a single plain run
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Inline::Run(StyledRun::new(text))])
    }

    /// Create a heading paragraph
    pub fn heading(level: u8, children: Vec<Inline>) -> Self {
        Self::new(children).kind(ParagraphKind::Heading(level))
    }

    /// Create a horizontal rule
    pub fn rule() -> Self {
        Self::empty().kind(ParagraphKind::Rule)
    }

    pub fn kind(mut self, kind: ParagraphKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn style(mut self, style: Option<&str>) -> Self {
        self.style = style.map(str::to_string);
        self
    }

    pub fn spacing_before(mut self, twips: u32) -> Self {
        self.spacing_before = Some(twips);
        self
    }

    /// Concatenated text of all runs
    pub fn plain_text(&self) -> String {
        self.children.iter().map(Inline::plain_text).collect()
    }

    /// Text runs of this paragraph, hyperlink runs included
    pub fn runs(&self) -> Vec<&StyledRun> {
        self.children
            .iter()
            .flat_map(|inline| match inline {
                Inline::Run(run) => std::slice::from_ref(run).iter(),
                Inline::Hyperlink(link) => link.runs.iter(),
            })
            .collect()
    }
}

/// A table cell holding nested nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub content: Vec<DocumentNode>,
}

impl TableCell {
    pub fn new(content: Vec<DocumentNode>) -> Self {
        Self { content }
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,

    /// Keep the row on one page
    pub cant_split: bool,
}

/// A table with fixed column widths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column widths in twips
    pub column_widths: Vec<u32>,

    /// Cell margin on every side, in twips
    pub cell_margin: u32,

    pub rows: Vec<TableRow>,
}

/// A block-level node of the output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Paragraph(Paragraph),
    Table(Table),
}

impl DocumentNode {
    /// The paragraph, if this node is one
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            DocumentNode::Paragraph(p) => Some(p),
            DocumentNode::Table(_) => None,
        }
    }

    /// The table, if this node is one
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DocumentNode::Table(t) => Some(t),
            DocumentNode::Paragraph(_) => None,
        }
    }
}

impl From<Paragraph> for DocumentNode {
    fn from(paragraph: Paragraph) -> Self {
        DocumentNode::Paragraph(paragraph)
    }
}

impl From<Table> for DocumentNode {
    fn from(table: Table) -> Self {
        DocumentNode::Table(table)
    }
}

/// Convert millimetres to twips (1/20 pt)
pub fn mm_to_twips(mm: f64) -> u32 {
    (mm * 1440.0 / 25.4).round() as u32
}
