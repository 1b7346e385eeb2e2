//! Generator chosen at runtime by [`Syntax`]

use std::io::Write;

use rdfweave_graph_ir::{Generator, Iri, Node, Result};
use rdfweave_graph_rdfxml::RdfXmlGenerator;
use rdfweave_graph_turtle::{NTriplesGenerator, TurtleGenerator};

use crate::config::WriterConfig;
use crate::json::JsonGenerator;
use crate::syntax::Syntax;

/// One of the concrete generators
pub enum AnyGenerator<W: Write> {
    Turtle(TurtleGenerator<W>),
    NTriples(NTriplesGenerator<W>),
    RdfXml(RdfXmlGenerator<W>),
    Json(JsonGenerator<W>),
}

macro_rules! dispatch {
    ($self:expr, $generator:ident => $body:expr) => {
        match $self {
            AnyGenerator::Turtle($generator) => $body,
            AnyGenerator::NTriples($generator) => $body,
            AnyGenerator::RdfXml($generator) => $body,
            AnyGenerator::Json($generator) => $body,
        }
    };
}

impl<W: Write> AnyGenerator<W> {
    pub fn new(syntax: Syntax, writer: W, config: &WriterConfig) -> Self {
        let context = config.context();
        let indent = config.indent_for(syntax);
        match syntax {
            Syntax::Turtle => AnyGenerator::Turtle(
                TurtleGenerator::new(writer, context, config.pretty).with_indent(indent),
            ),
            Syntax::NTriples => AnyGenerator::NTriples(NTriplesGenerator::new(writer)),
            Syntax::RdfXml => AnyGenerator::RdfXml(
                RdfXmlGenerator::new(writer, context, config.pretty).with_indent(indent),
            ),
            Syntax::Json => AnyGenerator::Json(JsonGenerator::new(writer, context, config.pretty)),
        }
    }

    pub fn syntax(&self) -> Syntax {
        match self {
            AnyGenerator::Turtle(_) => Syntax::Turtle,
            AnyGenerator::NTriples(_) => Syntax::NTriples,
            AnyGenerator::RdfXml(_) => Syntax::RdfXml,
            AnyGenerator::Json(_) => Syntax::Json,
        }
    }

    pub fn into_inner(self) -> W {
        dispatch!(self, generator => generator.into_inner())
    }
}

impl<W: Write> Generator for AnyGenerator<W> {
    fn register_namespace(&mut self, prefix: &str, namespace: &str) {
        dispatch!(self, generator => generator.register_namespace(prefix, namespace))
    }

    fn open_subject(&self) -> Option<&Iri> {
        dispatch!(self, generator => generator.open_subject())
    }

    fn begin_resource(&mut self, id: &Iri) -> Result<()> {
        dispatch!(self, generator => generator.begin_resource(id))
    }

    fn statement(&mut self, predicate: &Iri, object: &Node) -> Result<()> {
        dispatch!(self, generator => generator.statement(predicate, object))
    }

    fn begin_embedded(&mut self, predicate: &Iri, id: &Iri) -> Result<()> {
        dispatch!(self, generator => generator.begin_embedded(predicate, id))
    }

    fn end_embedded(&mut self) -> Result<()> {
        dispatch!(self, generator => generator.end_embedded())
    }

    fn end_resource(&mut self) -> Result<()> {
        dispatch!(self, generator => generator.end_resource())
    }

    fn close(&mut self) -> Result<()> {
        dispatch!(self, generator => generator.close())
    }
}
