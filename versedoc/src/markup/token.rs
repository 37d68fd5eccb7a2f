//! Markup token tree
//!
//! The lexer produces a tree of [`MarkupToken`]s which the renderer walks.
//! The vocabulary mirrors the block and inline constructs of markdown that
//! notes are written in.

/// Kind of a markup token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Paragraph,
    Heading {
        /// Heading depth (1..=6)
        depth: u8,
    },
    List {
        ordered: bool,
    },
    ListItem,
    Blockquote,
    HorizontalRule,
    /// Blank line between blocks
    Space,
    Link {
        href: String,
    },
    Emphasis,
    Strong,
    CodeSpan,
    /// Fenced or indented code block
    CodeBlock,
    /// Hard line break
    LineBreak,
    /// Plain text leaf
    Text,
    /// Any construct without a dedicated kind (strikethrough, image, ...)
    Other(String),
}

/// Payload of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenContent {
    /// Nested inline or block tokens
    Tokens(Vec<MarkupToken>),
    /// List items of a list token
    Items(Vec<MarkupToken>),
    /// Literal text
    Text(String),
    None,
}

/// A node of the markup token tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupToken {
    pub kind: TokenKind,
    pub content: TokenContent,
}

impl MarkupToken {
    /// Create a token with nested tokens
    pub fn with_tokens(kind: TokenKind, tokens: Vec<MarkupToken>) -> Self {
        Self {
            kind,
            content: TokenContent::Tokens(tokens),
        }
    }

    /// Create a list token with its items
    pub fn list(ordered: bool, items: Vec<MarkupToken>) -> Self {
        Self {
            kind: TokenKind::List { ordered },
            content: TokenContent::Items(items),
        }
    }

    /// Create a token holding literal text
    pub fn with_text(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            content: TokenContent::Text(text.into()),
        }
    }

    /// Create a plain text leaf
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_text(TokenKind::Text, text)
    }

    /// Create a token without content
    pub fn leaf(kind: TokenKind) -> Self {
        Self {
            kind,
            content: TokenContent::None,
        }
    }

    /// Nested tokens or items, whichever this token carries
    pub fn children(&self) -> Option<&[MarkupToken]> {
        match &self.content {
            TokenContent::Tokens(tokens) | TokenContent::Items(tokens) => Some(tokens),
            TokenContent::Text(_) | TokenContent::None => None,
        }
    }

    /// Concatenated literal text of this token and its descendants
    pub fn plain_text(&self) -> String {
        match &self.content {
            TokenContent::Text(text) => text.clone(),
            TokenContent::Tokens(tokens) | TokenContent::Items(tokens) => {
                tokens.iter().map(MarkupToken::plain_text).collect()
            }
            TokenContent::None => String::new(),
        }
    }
}
