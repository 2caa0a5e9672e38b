//! Lexer for C--.
//!
//! Whitespace and comments are skipped. Runs of characters the lexer does not
//! recognise are coalesced into one `Garbage` token so the parser reports a
//! single error for them.

use logos::Logos;

use crate::diagnostics::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    #[token("int")]
    Int,

    #[token("void")]
    Void,

    #[token("return")]
    Return,

    #[token("read")]
    Read,

    #[token("write")]
    Write,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Equals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    /// Start of a block comment that never ends. A complete comment is a
    /// longer match and gets skipped instead.
    #[token("/*")]
    UnclosedComment,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// Coalesced unrecognised characters.
    Garbage,
}

impl TokenKind {
    /// How the token is named in "expected ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Int => "`int`",
            Self::Void => "`void`",
            Self::Return => "`return`",
            Self::Read => "`read`",
            Self::Write => "`write`",
            Self::ParenOpen => "`(`",
            Self::ParenClose => "`)`",
            Self::BraceOpen => "`{`",
            Self::BraceClose => "`}`",
            Self::Comma => "`,`",
            Self::Semicolon => "`;`",
            Self::Equals => "`=`",
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::UnclosedComment => "`/*`",
            Self::Number => "a number",
            Self::Ident => "an identifier",
            Self::Garbage => "unknown characters",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tokenizes source into span-based tokens.
///
/// A `Garbage` token covers unrecognised characters only, not the whitespace
/// that follows them.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut garbage: Option<Span> = None;

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => {
                if let Some(span) = garbage.take() {
                    tokens.push(Token::new(TokenKind::Garbage, span));
                }
                tokens.push(Token::new(kind, lexer.span()));
            }
            Err(()) => {
                let span = lexer.span();
                garbage = Some(match garbage.take() {
                    Some(open) => open.start..span.end,
                    None => span,
                });
            }
        }
    }
    if let Some(span) = garbage {
        tokens.push(Token::new(TokenKind::Garbage, span));
    }

    tokens
}

/// Source text of a token.
#[inline]
pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[token.span.clone()]
}
