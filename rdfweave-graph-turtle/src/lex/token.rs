//! Turtle token types.
//!
//! Numeric tokens keep their lexical form; the literal built from them must
//! carry exactly what the document said.

use std::fmt;
use std::sync::Arc;

/// A token with its byte span in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Token kinds for Turtle.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Full IRI reference with escapes decoded: `<http://example.org/>`
    Iri(Arc<str>),

    /// Prefix namespace alone: `prefix:`
    PrefixedNameNs(Arc<str>),

    /// Prefixed name: `prefix:local`
    PrefixedName { prefix: Arc<str>, local: Arc<str> },

    /// Labeled blank node: `_:name`
    BlankNodeLabel(Arc<str>),

    /// Anonymous blank node: `[]`
    Anon,

    /// Empty collection: `()`
    Nil,

    /// String literal with escapes decoded
    String(Arc<str>),

    /// Integer literal, lexical form
    Integer(Arc<str>),

    /// Decimal literal, lexical form
    Decimal(Arc<str>),

    /// Double literal (with exponent), lexical form
    Double(Arc<str>),

    /// Language tag without the `@`
    LangTag(Arc<str>),

    KwPrefix,
    KwBase,
    KwSparqlPrefix,
    KwSparqlBase,
    KwA,
    KwTrue,
    KwFalse,

    Dot,
    Comma,
    Semicolon,
    DoubleCaret,
    LBracket,
    RBracket,
    LParen,
    RParen,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Iri(s) => write!(f, "<{}>", s),
            TokenKind::PrefixedNameNs(s) => write!(f, "{}:", s),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{}:{}", prefix, local),
            TokenKind::BlankNodeLabel(s) => write!(f, "_:{}", s),
            TokenKind::Anon => f.write_str("[]"),
            TokenKind::Nil => f.write_str("()"),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                f.write_str(s)
            }
            TokenKind::LangTag(s) => write!(f, "@{}", s),
            TokenKind::KwPrefix => f.write_str("@prefix"),
            TokenKind::KwBase => f.write_str("@base"),
            TokenKind::KwSparqlPrefix => f.write_str("PREFIX"),
            TokenKind::KwSparqlBase => f.write_str("BASE"),
            TokenKind::KwA => f.write_str("a"),
            TokenKind::KwTrue => f.write_str("true"),
            TokenKind::KwFalse => f.write_str("false"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::DoubleCaret => f.write_str("'^^'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
