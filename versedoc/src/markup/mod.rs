//! Markdown notes: lexing into a token tree and rendering into document nodes

mod lexer;
mod renderer;
mod token;

pub use lexer::lex;
pub use renderer::{render, render_token_tree, BLOCKQUOTE_STYLE, HYPERLINK_STYLE};
pub use token::{MarkupToken, TokenContent, TokenKind};
