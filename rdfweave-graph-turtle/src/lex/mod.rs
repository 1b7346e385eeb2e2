//! Turtle lexer module.
//!
//! Tokenizes Turtle (and N-Triples, which is a subset of its token grammar)
//! using winnow.

pub mod chars;
pub mod lexer;
pub mod token;

pub(crate) use lexer::single_token;
pub use lexer::{tokenize, LineIndex, Lexer};
pub use token::{Token, TokenKind};
