//! Strict N-Triples parser
//!
//! One statement per line: `<s> <p> <o> .`, with blank nodes allowed in subject
//! and object position and literals in object position. Only absolute IRIs,
//! double-quoted single-line strings and comments are accepted; every Turtle
//! abbreviation is an error.

use std::collections::HashMap;
use std::sync::Arc;

use rdfweave_graph_ir::{BlankIdAllocator, Iri, TripleSink};
use tracing::debug;

use crate::error::{Result, TurtleError};
use crate::lex::{Lexer, LineIndex, Token, TokenKind};

/// Line-oriented N-Triples parser
pub struct NTriplesParser<'a, S: ?Sized> {
    sink: &'a mut S,
    allocator: BlankIdAllocator,
    labels: HashMap<Arc<str>, Iri>,
}

/// Object of one line before it is emitted
enum Object {
    Resource(Iri),
    Plain(Arc<str>, Option<Arc<str>>),
    Typed(Arc<str>, Iri),
}

/// Tokens of one line with the context needed for error positions
struct Line<'l> {
    text: &'l str,
    number: usize,
    /// The line is the last one and has no terminator
    at_eof: bool,
    tokens: Vec<Token>,
    pos: usize,
}

impl Line<'_> {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if !self.current().is_eof() {
            self.pos += 1;
        }
    }

    fn column(&self, position: usize) -> usize {
        LineIndex::new(self.text).line_col(self.text, position).1
    }

    fn error(&self, expected: &str) -> TurtleError {
        let token = self.current();
        if token.is_eof() {
            let message = format!("expected {}", expected);
            if self.at_eof {
                return TurtleError::UnexpectedEof {
                    line: self.number,
                    message,
                };
            }
            return TurtleError::parse(self.number, self.column(token.start), message);
        }
        TurtleError::parse(
            self.number,
            self.column(token.start),
            format!("expected {}, found {}", expected, token.kind),
        )
    }

    fn absolute_iri(&self, reference: &str) -> Result<Iri> {
        let column = self.column(self.current().start);
        let iri = Iri::parse(reference)
            .map_err(|e| TurtleError::parse(self.number, column, e.to_string()))?;
        if !iri.is_absolute() {
            return Err(TurtleError::parse(
                self.number,
                column,
                format!("relative IRI <{}> is not allowed in N-Triples", reference),
            ));
        }
        Ok(iri)
    }

    /// Raw source of the current token
    fn raw(&self) -> &str {
        let token = self.current();
        &self.text[token.start..token.end]
    }
}

impl<'a, S: TripleSink + ?Sized> NTriplesParser<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            allocator: BlankIdAllocator::new(),
            labels: HashMap::new(),
        }
    }

    /// Issue blank node identifiers from `allocator`
    pub fn with_allocator(mut self, allocator: BlankIdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Parse a whole document, returning the number of triples emitted.
    pub fn parse(&mut self, input: &str) -> Result<usize> {
        let mut statements = 0;
        let mut rest = input;
        let mut number = 0;

        while !rest.is_empty() {
            number += 1;
            let (text, at_eof) = match rest.find('\n') {
                Some(end) => {
                    let text = &rest[..end];
                    rest = &rest[end + 1..];
                    (text, false)
                }
                None => {
                    let text = rest;
                    rest = "";
                    (text, true)
                }
            };
            let text = text.strip_suffix('\r').unwrap_or(text);

            let tokens = Lexer::new(text)
                .tokenize()
                .map_err(|e| relocate(e, number, at_eof))?;
            if tokens.len() == 1 {
                continue;
            }

            let mut line = Line {
                text,
                number,
                at_eof,
                tokens,
                pos: 0,
            };
            self.parse_line(&mut line)?;
            statements += 1;
        }

        debug!(triples = statements, lines = number, "parsed n-triples document");
        Ok(statements)
    }

    fn parse_line(&mut self, line: &mut Line<'_>) -> Result<()> {
        let subject = match line.current().kind.clone() {
            TokenKind::Iri(reference) => line.absolute_iri(&reference)?,
            TokenKind::BlankNodeLabel(label) => self.labeled_blank(&label),
            _ => return Err(line.error("subject IRI or blank node")),
        };
        line.advance();

        let predicate = match line.current().kind.clone() {
            TokenKind::Iri(reference) => line.absolute_iri(&reference)?,
            _ => return Err(line.error("predicate IRI")),
        };
        line.advance();

        let object = self.parse_object(line)?;

        if !matches!(line.current().kind, TokenKind::Dot) {
            return Err(line.error("'.' at end of statement"));
        }
        line.advance();
        if !line.current().is_eof() {
            return Err(line.error("end of line after '.'"));
        }

        match object {
            Object::Resource(iri) => self.sink.add_non_literal(&subject, &predicate, &iri)?,
            Object::Plain(value, language) => {
                self.sink
                    .add_plain_literal(&subject, &predicate, &value, language.as_deref())?
            }
            Object::Typed(value, datatype) => {
                self.sink
                    .add_typed_literal(&subject, &predicate, &value, &datatype)?
            }
        }
        Ok(())
    }

    fn parse_object(&mut self, line: &mut Line<'_>) -> Result<Object> {
        let object = match line.current().kind.clone() {
            TokenKind::Iri(reference) => Object::Resource(line.absolute_iri(&reference)?),
            TokenKind::BlankNodeLabel(label) => Object::Resource(self.labeled_blank(&label)),
            TokenKind::String(value) => {
                let raw = line.raw();
                if !raw.starts_with('"') || raw.starts_with("\"\"\"") {
                    return Err(line.error("double-quoted string"));
                }
                line.advance();
                return match line.current().kind.clone() {
                    TokenKind::LangTag(language) => {
                        line.advance();
                        Ok(Object::Plain(value, Some(language)))
                    }
                    TokenKind::DoubleCaret => {
                        line.advance();
                        let datatype = match line.current().kind.clone() {
                            TokenKind::Iri(reference) => line.absolute_iri(&reference)?,
                            _ => return Err(line.error("datatype IRI after '^^'")),
                        };
                        line.advance();
                        Ok(Object::Typed(value, datatype))
                    }
                    _ => Ok(Object::Plain(value, None)),
                };
            }
            _ => return Err(line.error("object IRI, blank node or literal")),
        };
        line.advance();
        Ok(object)
    }

    fn labeled_blank(&mut self, label: &Arc<str>) -> Iri {
        let allocator = &self.allocator;
        self.labels
            .entry(label.clone())
            .or_insert_with(|| allocator.next())
            .clone()
    }
}

/// Give a lexer error from a single line its document line number
///
/// A token cut off by the end of a line only means end of input on the
/// last line; elsewhere the statement is malformed.
fn relocate(error: TurtleError, number: usize, at_eof: bool) -> TurtleError {
    match error {
        TurtleError::UnexpectedEof { message, .. } if !at_eof => {
            TurtleError::parse(number, 1, format!("statement broken across lines: {}", message))
        }
        other => other.at_line(number),
    }
}

/// Parse an N-Triples document into sink events.
pub fn parse_ntriples<S: TripleSink + ?Sized>(input: &str, sink: &mut S) -> Result<usize> {
    NTriplesParser::new(sink).parse(input)
}
