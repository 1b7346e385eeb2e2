//! Character-stream sources for Turtle and N-Triples
//!
//! Both read the whole stream, normalise its encoding with
//! [`read_text`], then parse into the sink they own.

use std::io::Read;

use rdfweave_graph_ir::{read_text, BlankIdAllocator, Sink, Source, TripleSink};
use tracing::debug;

use crate::error::TurtleError;
use crate::ntriples::NTriplesParser;
use crate::parser::Parser;

/// Drives a Turtle document into a [`TripleSink`]
#[derive(Debug)]
pub struct TurtleSource<S> {
    sink: S,
    base: Option<String>,
    allocator: BlankIdAllocator,
    statements: usize,
}

impl<S: TripleSink> TurtleSource<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            base: None,
            allocator: BlankIdAllocator::new(),
            statements: 0,
        }
    }

    /// Resolve relative IRIs against `base`
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_allocator(mut self, allocator: BlankIdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Triples emitted by the last `drive`
    pub fn statements(&self) -> usize {
        self.statements
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: TripleSink> Source for TurtleSource<S> {
    type Error = TurtleError;

    fn sink(&mut self) -> &mut dyn Sink {
        &mut self.sink
    }

    fn drive(&mut self, input: &mut dyn Read) -> Result<(), TurtleError> {
        let text = read_text(input)?;
        if let Some(base) = &self.base {
            self.sink.set_base_uri(base);
        }
        let mut parser =
            Parser::new(&text, &mut self.sink)?.with_allocator(self.allocator.clone());
        if let Some(base) = &self.base {
            parser = parser.with_base(base)?;
        }
        self.statements = parser.parse()?;
        debug!(bytes = text.len(), triples = self.statements, "turtle source drained");
        Ok(())
    }
}

/// Drives an N-Triples document into a [`TripleSink`]
#[derive(Debug)]
pub struct NTriplesSource<S> {
    sink: S,
    allocator: BlankIdAllocator,
    statements: usize,
}

impl<S: TripleSink> NTriplesSource<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            allocator: BlankIdAllocator::new(),
            statements: 0,
        }
    }

    pub fn with_allocator(mut self, allocator: BlankIdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn statements(&self) -> usize {
        self.statements
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: TripleSink> Source for NTriplesSource<S> {
    type Error = TurtleError;

    fn sink(&mut self) -> &mut dyn Sink {
        &mut self.sink
    }

    fn drive(&mut self, input: &mut dyn Read) -> Result<(), TurtleError> {
        let text = read_text(input)?;
        self.statements = NTriplesParser::new(&mut self.sink)
            .with_allocator(self.allocator.clone())
            .parse(&text)?;
        debug!(bytes = text.len(), triples = self.statements, "n-triples source drained");
        Ok(())
    }
}
