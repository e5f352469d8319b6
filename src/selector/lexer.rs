//! Logos-based lexer for embedded selectors
//!
//! Splits a text string into the few characters that carry meaning inside
//! `~...~` and runs of everything else.

use logos::Logos;

/// A token with its kind, text, and byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SelectorToken,
    pub text: &'a str,
    pub offset: usize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, SelectorToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: SelectorToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.inner.span().start;

        // Every input byte matches some token; keep anything odd as text.
        let kind = logos_token.unwrap_or(SelectorToken::Text);

        Some(Token { kind, text, offset })
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorToken {
    /// `~~`: a literal tilde outside a selector, close-and-reopen inside one.
    #[token("~~")]
    EscapedTilde,

    #[token("~")]
    Tilde,

    #[token("|")]
    Pipe,

    #[token(":")]
    Colon,

    #[regex(r"[^~|:]+")]
    Text,
}
