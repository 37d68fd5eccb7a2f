//! Markup to document node conversion
//!
//! The renderer walks a token tree depth-first. Inline tokens add styled
//! runs to a pending buffer; block tokens close the buffer into a paragraph
//! once their children have been walked.
//!
//! Formatting and list/blockquote context travel down the recursion as a
//! copied [`RenderContext`], so a token only ever sees the context of its
//! ancestors and never that of an earlier sibling.
//!
//! pulldown-cmark already decodes entities in text and leaves code literal,
//! so only token trees built by hand have their text entity-decoded.

use super::lexer::lex;
use super::token::{MarkupToken, TokenContent, TokenKind};
use crate::document_model::{
    DocumentNode, Hyperlink, Inline, NumberingRef, Paragraph, ParagraphKind, RunFormat,
    StyledRun,
};

/// Paragraph style applied to paragraphs inside a blockquote
pub const BLOCKQUOTE_STYLE: &str = "blockquote";

/// Character style applied to hyperlink runs
pub const HYPERLINK_STYLE: &str = "Hyperlink";

/// Render markdown text into document nodes
///
/// # Parameters
/// * `markdown` - Raw markdown text
/// * `style` - Paragraph style for body paragraphs and list items
///
/// # Returns
/// * `Vec<DocumentNode>` - Paragraph nodes in document order
pub fn render(markdown: &str, style: Option<&str>) -> Vec<DocumentNode> {
    render_root(&lex(markdown), RenderContext::root(style, false))
}

/// Render a hand-built token tree whose text may still contain HTML entities
pub fn render_token_tree(tokens: &[MarkupToken], style: Option<&str>) -> Vec<DocumentNode> {
    render_root(tokens, RenderContext::root(style, true))
}

fn render_root(tokens: &[MarkupToken], ctx: RenderContext<'_>) -> Vec<DocumentNode> {
    let style = ctx.style;
    let rendered = render_tokens(tokens, ctx, Vec::new());
    let mut nodes = rendered.nodes;

    // Inline content outside of any block (e.g. a bare top-level text token)
    if !rendered.pending.is_empty() {
        nodes.push(Paragraph::new(rendered.pending).style(style).into());
    }

    nodes
}

/// Context inherited from the enclosing tokens
#[derive(Debug, Clone, Copy)]
struct RenderContext<'a> {
    format: RunFormat,
    ordered_list: bool,
    blockquote: bool,
    in_list_item: bool,
    top_level: bool,
    decode_entities: bool,
    style: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    fn root(style: Option<&'a str>, decode_entities: bool) -> Self {
        Self {
            format: RunFormat::default(),
            ordered_list: false,
            blockquote: false,
            in_list_item: false,
            top_level: true,
            decode_entities,
            style,
        }
    }

    /// Context seen by the children of a token of the given kind
    fn enter(self, kind: &TokenKind) -> Self {
        let mut inner = Self {
            top_level: false,
            in_list_item: matches!(kind, TokenKind::ListItem),
            ..self
        };

        match kind {
            TokenKind::Emphasis => inner.format = self.format.merge(RunFormat::italic()),
            TokenKind::Strong => inner.format = self.format.merge(RunFormat::bold()),
            TokenKind::CodeSpan | TokenKind::CodeBlock => {
                inner.format = self.format.merge(RunFormat::highlight())
            }
            TokenKind::List { ordered } => inner.ordered_list = *ordered,
            TokenKind::Blockquote => inner.blockquote = true,
            _ => {}
        }

        inner
    }

    fn paragraph_style(&self) -> Option<&'a str> {
        if self.blockquote {
            Some(BLOCKQUOTE_STYLE)
        } else {
            self.style
        }
    }
}

/// Output of one recursion step: finished nodes plus the still-open run buffer
#[derive(Debug, Default)]
struct Rendered {
    nodes: Vec<DocumentNode>,
    pending: Vec<Inline>,
}

impl Rendered {
    /// Close the pending runs into a paragraph built by `build`
    fn flush(&mut self, build: impl FnOnce(Vec<Inline>) -> Paragraph) {
        let children = std::mem::take(&mut self.pending);
        self.nodes.push(build(children).into());
    }
}

fn render_tokens(tokens: &[MarkupToken], ctx: RenderContext<'_>, pending: Vec<Inline>) -> Rendered {
    tokens.iter().fold(
        Rendered {
            nodes: Vec::new(),
            pending,
        },
        |mut acc, token| {
            let step = render_token(token, ctx, std::mem::take(&mut acc.pending));
            acc.nodes.extend(step.nodes);
            acc.pending = step.pending;
            acc
        },
    )
}

fn render_token(token: &MarkupToken, ctx: RenderContext<'_>, pending: Vec<Inline>) -> Rendered {
    let inner = ctx.enter(&token.kind);
    let mut out = Rendered {
        nodes: Vec::new(),
        pending,
    };

    // Inline links become a single hyperlink run
    if let (TokenKind::Link { href }, false) = (&token.kind, ctx.top_level) {
        out.pending.push(Inline::Hyperlink(Hyperlink {
            target: href.clone(),
            runs: vec![hyperlink_run(&token.plain_text(), inner)],
        }));
        return out;
    }

    // Loose list items wrap their text in paragraphs; the item itself is the paragraph
    let item_paragraph = token.kind == TokenKind::Paragraph && ctx.in_list_item;
    if item_paragraph && !out.pending.is_empty() {
        out.pending.push(StyledRun::line_break().into());
    }

    match &token.content {
        TokenContent::Tokens(children) | TokenContent::Items(children) => {
            let child = render_tokens(children, inner, std::mem::take(&mut out.pending));
            out.nodes.extend(child.nodes);
            out.pending = child.pending;
        }
        TokenContent::Text(text) => match token.kind {
            TokenKind::CodeBlock => out.pending.push(text_run(text, inner)),
            TokenKind::Link { .. } => out.pending.push(hyperlink_run(text, inner).into()),
            _ => {
                out.pending.push(text_run(text, inner));
                return out;
            }
        },
        TokenContent::None => {}
    }

    match &token.kind {
        TokenKind::Paragraph if item_paragraph => {}
        TokenKind::Paragraph | TokenKind::CodeBlock => {
            let style = ctx.paragraph_style();
            out.flush(|children| Paragraph::new(children).style(style));
        }
        TokenKind::Heading { depth } => {
            let level = *depth;
            out.flush(|children| Paragraph::heading(level, children));
        }
        TokenKind::ListItem => {
            let numbering = if ctx.ordered_list {
                NumberingRef::Numbers
            } else {
                NumberingRef::Bullets
            };
            let style = ctx.style;
            out.flush(|children| {
                Paragraph::new(children)
                    .kind(ParagraphKind::ListItem {
                        numbering,
                        level: 0,
                    })
                    .style(style)
            });
        }
        TokenKind::HorizontalRule => out.nodes.push(Paragraph::rule().into()),
        TokenKind::Space => out.nodes.push(Paragraph::empty().into()),
        TokenKind::LineBreak => out.pending.push(StyledRun::line_break().into()),
        TokenKind::Link { href } => {
            // Top-level link: the pending runs become the link's content
            let target = href.clone();
            out.flush(|children| {
                Paragraph::new(vec![Inline::Hyperlink(Hyperlink {
                    target,
                    runs: into_runs(children),
                })])
            });
        }
        TokenKind::Other(name) => log::debug!("Ignoring markup token '{}'", name),
        TokenKind::Blockquote
        | TokenKind::List { .. }
        | TokenKind::Emphasis
        | TokenKind::Strong
        | TokenKind::CodeSpan
        | TokenKind::Text => {}
    }

    out
}

fn text_run(text: &str, ctx: RenderContext<'_>) -> Inline {
    StyledRun::with_format(decoded(text, ctx), ctx.format).into()
}

fn hyperlink_run(text: &str, ctx: RenderContext<'_>) -> StyledRun {
    StyledRun::new(decoded(text, ctx)).char_style(HYPERLINK_STYLE)
}

fn decoded(text: &str, ctx: RenderContext<'_>) -> String {
    if ctx.decode_entities {
        html_escape::decode_html_entities(text).into_owned()
    } else {
        text.to_string()
    }
}

fn into_runs(children: Vec<Inline>) -> Vec<StyledRun> {
    children
        .into_iter()
        .flat_map(|inline| match inline {
            Inline::Run(run) => vec![run],
            Inline::Hyperlink(link) => link.runs,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraphs(nodes: &[DocumentNode]) -> Vec<&Paragraph> {
        nodes.iter().filter_map(DocumentNode::as_paragraph).collect()
    }

    #[test]
    fn test_plain_text_yields_one_unformatted_paragraph() {
        // Act
        let nodes = render("hello world", None);

        // Assert
        let paras = paragraphs(&nodes);
        assert_eq!(nodes.len(), 1);
        assert_eq!(paras[0].kind, ParagraphKind::Body);
        assert_eq!(paras[0].plain_text(), "hello world");
        assert!(paras[0].runs().iter().all(|r| !r.format.has_formatting()));
    }

    #[test]
    fn test_emphasis_inside_strong_inherits_bold() {
        let nodes = render("**bold *and italic* text**", None);

        let runs: Vec<(String, RunFormat)> = paragraphs(&nodes)[0]
            .runs()
            .into_iter()
            .map(|r| (r.text.clone(), r.format))
            .collect();
        assert_eq!(
            runs,
            vec![
                ("bold ".to_string(), RunFormat::bold()),
                (
                    "and italic".to_string(),
                    RunFormat::bold().merge(RunFormat::italic())
                ),
                (" text".to_string(), RunFormat::bold()),
            ]
        );
    }

    #[test]
    fn test_code_span_is_highlighted() {
        let nodes = render("run `cargo` now", Some("notes"));

        let paragraph = paragraphs(&nodes)[0];
        let runs = paragraph.runs();
        assert_eq!(runs[1].text, "cargo");
        assert!(runs[1].format.highlight);
        assert!(!runs[0].format.highlight);
        assert_eq!(paragraph.style.as_deref(), Some("notes"));
    }

    #[test]
    fn test_unordered_list_items_use_bullets() {
        let nodes = render("- first\n- second\n", Some("notes"));

        let paras = paragraphs(&nodes);
        assert_eq!(paras.len(), 2);
        for paragraph in &paras {
            assert_eq!(
                paragraph.kind,
                ParagraphKind::ListItem {
                    numbering: NumberingRef::Bullets,
                    level: 0
                }
            );
            assert_eq!(paragraph.style.as_deref(), Some("notes"));
        }
        assert_eq!(paras[1].plain_text(), "second");
    }

    #[test]
    fn test_ordered_list_does_not_leak_into_following_list() {
        // Arrange: an ordered list followed by a bullet list token, built directly
        let tokens = vec![
            MarkupToken::list(
                true,
                vec![MarkupToken::with_tokens(
                    TokenKind::ListItem,
                    vec![MarkupToken::text("one")],
                )],
            ),
            MarkupToken::with_tokens(TokenKind::ListItem, vec![MarkupToken::text("stray")]),
        ];

        // Act
        let nodes = render_token_tree(&tokens, None);

        // Assert
        let kinds: Vec<ParagraphKind> = paragraphs(&nodes).iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParagraphKind::ListItem {
                    numbering: NumberingRef::Numbers,
                    level: 0
                },
                ParagraphKind::ListItem {
                    numbering: NumberingRef::Bullets,
                    level: 0
                },
            ]
        );
    }

    #[test]
    fn test_render_calls_do_not_share_state() {
        let _ = render("1. numbered\n", None);

        let nodes = render("- bullet\n", None);

        assert_eq!(
            paragraphs(&nodes)[0].kind,
            ParagraphKind::ListItem {
                numbering: NumberingRef::Bullets,
                level: 0
            }
        );
    }

    #[test]
    fn test_blockquote_style_is_scoped_to_quote() {
        let nodes = render("> quoted\n\nafter", Some("notes"));

        let styles: Vec<Option<&str>> = paragraphs(&nodes)
            .iter()
            .map(|p| p.style.as_deref())
            .collect();
        // quoted paragraph, blank-line spacer, following paragraph
        assert_eq!(styles, vec![Some("blockquote"), None, Some("notes")]);
    }

    #[test]
    fn test_heading_depth() {
        let nodes = render("### Section", None);

        let paragraph = paragraphs(&nodes)[0];
        assert_eq!(paragraph.kind, ParagraphKind::Heading(3));
        assert_eq!(paragraph.plain_text(), "Section");
    }

    #[test]
    fn test_inline_link_becomes_hyperlink() {
        let nodes = render("see [docs](https://example.com/docs) here", None);

        let paragraph = paragraphs(&nodes)[0];
        assert_eq!(paragraph.children.len(), 3);
        match &paragraph.children[1] {
            Inline::Hyperlink(link) => {
                assert_eq!(link.target, "https://example.com/docs");
                assert_eq!(link.runs[0].text, "docs");
                assert_eq!(link.runs[0].char_style.as_deref(), Some(HYPERLINK_STYLE));
            }
            other => panic!("expected hyperlink, got {:?}", other),
        }
    }

    #[test]
    fn test_top_level_link_wraps_paragraph() {
        let tokens = vec![MarkupToken::with_text(
            TokenKind::Link {
                href: "https://example.com".to_string(),
            },
            "example",
        )];

        let nodes = render_token_tree(&tokens, None);

        let paragraph = paragraphs(&nodes)[0];
        assert_eq!(paragraph.children.len(), 1);
        assert!(matches!(
            &paragraph.children[0],
            Inline::Hyperlink(link) if link.target == "https://example.com"
        ));
        assert_eq!(paragraph.plain_text(), "example");
    }

    #[test]
    fn test_rule_and_space_paragraphs() {
        let nodes = render("above\n\n---\n", None);

        let kinds: Vec<ParagraphKind> = paragraphs(&nodes).iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ParagraphKind::Body, ParagraphKind::Body, ParagraphKind::Rule]
        );
        assert!(paragraphs(&nodes)[1].children.is_empty());
    }

    #[test]
    fn test_entities_are_decoded() {
        let tokens = vec![MarkupToken::with_tokens(
            TokenKind::Paragraph,
            vec![MarkupToken::text("Fish &amp; Chips")],
        )];

        let nodes = render_token_tree(&tokens, None);

        assert_eq!(paragraphs(&nodes)[0].plain_text(), "Fish & Chips");
    }

    #[test]
    fn test_lexed_text_is_not_decoded_twice() {
        let nodes = render("use `&amp;` here, not &amp;lt;", None);

        let paragraph = paragraphs(&nodes)[0];
        assert_eq!(paragraph.runs()[1].text, "&amp;");
        assert_eq!(paragraph.plain_text(), "use &amp; here, not &lt;");
    }

    #[test]
    fn test_loose_list_items_are_single_list_paragraphs() {
        // Arrange
        let markdown = "- first\n\n- second\n";

        // Act
        let nodes = render(markdown, Some("notes"));

        // Assert
        let paras = paragraphs(&nodes);
        assert_eq!(nodes.len(), 2);
        let texts: Vec<String> = paras.iter().map(|p| p.plain_text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        for paragraph in &paras {
            assert_eq!(
                paragraph.kind,
                ParagraphKind::ListItem {
                    numbering: NumberingRef::Bullets,
                    level: 0
                }
            );
            assert_eq!(paragraph.style.as_deref(), Some("notes"));
        }
    }

    #[test]
    fn test_loose_list_item_paragraphs_are_joined_by_line_break() {
        let nodes = render("1. first\n\n   more\n2. second\n", None);

        let paras = paragraphs(&nodes);
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].plain_text(), "firstmore");
        assert!(paras[0].runs()[1].break_before);
        assert!(matches!(
            paras[1].kind,
            ParagraphKind::ListItem {
                numbering: NumberingRef::Numbers,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_token_is_ignored() {
        let tokens = vec![MarkupToken::leaf(TokenKind::Other("footnote".to_string()))];

        assert!(render_token_tree(&tokens, None).is_empty());
    }

    #[test]
    fn test_hard_break_inserts_line_break_run() {
        let nodes = render("line one  \nline two", None);

        let runs = paragraphs(&nodes)[0].runs();
        assert!(runs.iter().any(|r| r.break_before));
        assert_eq!(paragraphs(&nodes)[0].plain_text(), "line oneline two");
    }
}
