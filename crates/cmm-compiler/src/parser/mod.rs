//! C-- front-end.
//!
//! The lexer produces span-based tokens; the translator parses them and emits
//! quads in the same pass.

mod lexer;
mod scope;
mod translate;


pub use lexer::{Token, TokenKind, lex, token_text};
pub use scope::ReturnType;

pub(crate) use translate::{Abort, Translator};
