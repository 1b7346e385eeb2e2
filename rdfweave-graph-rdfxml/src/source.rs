//! Character-stream source for RDF/XML

use std::io::Read;

use rdfweave_graph_ir::{read_text, BlankIdAllocator, Sink, Source, TripleSink};
use tracing::debug;

use crate::error::RdfXmlError;
use crate::parser::RdfXmlParser;

/// Drives an RDF/XML document into a [`TripleSink`]
#[derive(Debug)]
pub struct RdfXmlSource<S> {
    sink: S,
    base: Option<String>,
    allocator: BlankIdAllocator,
    statements: usize,
}

impl<S: TripleSink> RdfXmlSource<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            base: None,
            allocator: BlankIdAllocator::new(),
            statements: 0,
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
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

impl<S: TripleSink> Source for RdfXmlSource<S> {
    type Error = RdfXmlError;

    fn sink(&mut self) -> &mut dyn Sink {
        &mut self.sink
    }

    fn drive(&mut self, input: &mut dyn Read) -> Result<(), RdfXmlError> {
        let text = read_text(input)?;
        let mut parser = RdfXmlParser::new(&mut self.sink).with_allocator(self.allocator.clone());
        if let Some(base) = &self.base {
            parser = parser.with_base(base)?;
        }
        self.statements = parser.parse(&text)?;
        debug!(bytes = text.len(), triples = self.statements, "rdf/xml source drained");
        Ok(())
    }
}
