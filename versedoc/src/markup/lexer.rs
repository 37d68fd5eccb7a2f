//! Markdown lexer
//!
//! Converts pulldown-cmark's event stream into a [`MarkupToken`] tree. Each
//! start event opens a frame on a stack; the matching end event closes it
//! and attaches the finished token to its parent.

use super::token::{MarkupToken, TokenKind};
use pulldown_cmark::{Event, Parser, Tag};
use std::ops::Range;

/// Lex markdown text into a token tree
///
/// # Parameters
/// * `text` - Raw markdown
///
/// # Returns
/// * `Vec<MarkupToken>` - Top-level block tokens in document order
pub fn lex(text: &str) -> Vec<MarkupToken> {
    let mut builder = TokenTreeBuilder::new(text);

    for (event, range) in Parser::new(text).into_offset_iter() {
        builder.process_event(event, range);
    }

    builder.finish()
}

/// A token whose children are still being collected
struct Frame {
    kind: TokenKind,
    children: Vec<MarkupToken>,
}

struct TokenTreeBuilder<'s> {
    source: &'s str,

    /// Open tokens, innermost last
    stack: Vec<Frame>,

    /// Finished top-level tokens
    root: Vec<MarkupToken>,

    /// End of the previous top-level block, trailing whitespace excluded
    last_block_end: Option<usize>,
}

impl<'s> TokenTreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            stack: Vec::new(),
            root: Vec::new(),
            last_block_end: None,
        }
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                if self.stack.is_empty() {
                    self.begin_top_level_block(range.start);
                }
                self.stack.push(Frame {
                    kind: token_kind(&tag),
                    children: Vec::new(),
                });
            }
            Event::End(_) => self.close_frame(range),
            Event::Text(text) => self.push(MarkupToken::text(text.to_string())),
            Event::Code(code) => {
                self.push(MarkupToken::with_text(TokenKind::CodeSpan, code.to_string()))
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push(MarkupToken::with_text(TokenKind::CodeSpan, math.to_string()))
            }
            Event::SoftBreak => self.push(MarkupToken::text(" ")),
            Event::HardBreak => self.push(MarkupToken::leaf(TokenKind::LineBreak)),
            Event::Rule => {
                if self.stack.is_empty() {
                    self.begin_top_level_block(range.start);
                }
                self.push(MarkupToken::leaf(TokenKind::HorizontalRule));
                if self.stack.is_empty() {
                    self.end_top_level_block(range);
                }
            }
            Event::Html(_) | Event::InlineHtml(_) => {
                self.push(MarkupToken::leaf(TokenKind::Other("html".to_string())))
            }
            Event::FootnoteReference(_) | Event::TaskListMarker(_) => {}
        }
    }

    /// Emit a space token if a blank line separates this block from the previous one
    fn begin_top_level_block(&mut self, start: usize) {
        let Some(previous_end) = self.last_block_end else {
            return;
        };

        let gap = self.source.get(previous_end..start).unwrap_or_default();
        if gap.matches('\n').count() >= 2 {
            self.root.push(MarkupToken::leaf(TokenKind::Space));
        }
    }

    fn end_top_level_block(&mut self, range: Range<usize>) {
        let block = self.source.get(range.clone()).unwrap_or_default();
        self.last_block_end = Some(range.start + block.trim_end().len());
    }

    fn close_frame(&mut self, range: Range<usize>) {
        let Some(frame) = self.stack.pop() else {
            log::warn!("Unbalanced end event at offset {}", range.start);
            return;
        };

        let token = match frame.kind {
            TokenKind::List { ordered } => MarkupToken::list(ordered, frame.children),
            kind @ (TokenKind::Link { .. } | TokenKind::CodeBlock) => {
                let text: String = frame.children.iter().map(MarkupToken::plain_text).collect();
                MarkupToken::with_text(kind, text)
            }
            kind => MarkupToken::with_tokens(kind, frame.children),
        };

        self.push(token);

        if self.stack.is_empty() {
            self.end_top_level_block(range);
        }
    }

    /// Attach a finished token to the innermost open frame
    fn push(&mut self, token: MarkupToken) {
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(token),
            None => self.root.push(token),
        }
    }

    fn finish(mut self) -> Vec<MarkupToken> {
        // Close anything left open by a truncated event stream
        while !self.stack.is_empty() {
            let end = self.source.len();
            self.close_frame(end..end);
        }
        self.root
    }
}

/// Map an opening tag to its token kind
fn token_kind(tag: &Tag<'_>) -> TokenKind {
    match tag {
        Tag::Paragraph => TokenKind::Paragraph,
        Tag::Heading { level, .. } => TokenKind::Heading {
            depth: *level as u8,
        },
        Tag::BlockQuote(_) => TokenKind::Blockquote,
        Tag::CodeBlock(_) => TokenKind::CodeBlock,
        Tag::List(start) => TokenKind::List {
            ordered: start.is_some(),
        },
        Tag::Item => TokenKind::ListItem,
        Tag::Emphasis => TokenKind::Emphasis,
        Tag::Strong => TokenKind::Strong,
        Tag::Link { dest_url, .. } => TokenKind::Link {
            href: dest_url.to_string(),
        },
        Tag::Strikethrough => TokenKind::Other("strikethrough".to_string()),
        Tag::Image { .. } => TokenKind::Other("image".to_string()),
        Tag::HtmlBlock => TokenKind::Other("html".to_string()),
        Tag::Table(_) | Tag::TableHead | Tag::TableRow | Tag::TableCell => {
            TokenKind::Other("table".to_string())
        }
        _ => TokenKind::Other("unsupported".to_string()),
    }
}
