//! Any-syntax-in, any-syntax-out conversion
//!
//! Compact output streams straight from the parser into the generator.
//! Pretty output first collects a [`Graph`] so blank nodes referenced once
//! can be nested under their parent.

use std::io::{Read, Write};

use rdfweave_graph_ir::{
    BlankIdAllocator, Generator, GeneratorSink, Graph, GraphCollectorSink, StreamProcessor,
    TripleSink,
};
use rdfweave_graph_rdfxml::{RdfXmlParser, RdfXmlSource};
use rdfweave_graph_turtle::{NTriplesParser, NTriplesSource, Parser, TurtleSource};
use tracing::debug;

use crate::any::AnyGenerator;
use crate::builder::ContentBuilder;
use crate::config::WriterConfig;
use crate::error::{FormatError, Result};
use crate::syntax::Syntax;

/// Options for reading a document
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Base IRI for relative references
    pub base: Option<String>,
    /// Blank node numbering shared with the caller
    pub allocator: BlankIdAllocator,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_allocator(mut self, allocator: BlankIdAllocator) -> Self {
        self.allocator = allocator;
        self
    }
}

fn readable(syntax: Syntax) -> Result<()> {
    if syntax.is_readable() {
        Ok(())
    } else {
        Err(FormatError::UnsupportedSyntax(format!(
            "{} can be written but not read",
            syntax
        )))
    }
}

/// Parse `input` into any triple sink, returning the statement count
pub fn parse_into<S: TripleSink + ?Sized>(
    syntax: Syntax,
    input: &str,
    sink: &mut S,
    options: &ParseOptions,
) -> Result<usize> {
    readable(syntax)?;
    let allocator = options.allocator.clone();
    if let Some(base) = &options.base {
        sink.set_base_uri(base);
    }
    let statements = match syntax {
        Syntax::Turtle => {
            let mut parser = Parser::new(input, sink)?.with_allocator(allocator);
            if let Some(base) = &options.base {
                parser = parser.with_base(base)?;
            }
            parser.parse()?
        }
        Syntax::NTriples => NTriplesParser::new(sink).with_allocator(allocator).parse(input)?,
        Syntax::RdfXml => {
            let mut parser = RdfXmlParser::new(sink).with_allocator(allocator);
            if let Some(base) = &options.base {
                parser = parser.with_base(base)?;
            }
            parser.parse(input)?
        }
        Syntax::Json => 0,
    };
    Ok(statements)
}

/// Parse `input` into a [`Graph`]
pub fn read_graph(syntax: Syntax, input: &str, options: &ParseOptions) -> Result<Graph> {
    let mut sink = GraphCollectorSink::with_allocator(options.allocator.clone());
    parse_into(syntax, input, &mut sink, options)?;
    Ok(sink.finish())
}

/// Write a graph in `syntax`
pub fn write_graph(graph: &Graph, syntax: Syntax, config: &WriterConfig) -> Result<String> {
    let mut builder = ContentBuilder::new(syntax, config);
    if config.pretty {
        builder.receive_graph(&graph.clone().nest_blank_nodes())?;
    } else {
        builder.receive_graph(graph)?;
    }
    Ok(builder.string()?)
}

/// Convert a document held in memory
pub fn convert(input: &str, from: Syntax, to: Syntax, config: &WriterConfig) -> Result<String> {
    let options = ParseOptions {
        base: config.base.clone(),
        ..ParseOptions::default()
    };
    if config.pretty {
        let graph = read_graph(from, input, &options)?;
        return write_graph(&graph, to, config);
    }
    let mut builder = ContentBuilder::new(to, config);
    parse_into(from, input, &mut builder, &options)?;
    Ok(builder.string()?)
}

/// Convert a byte stream into a writer
///
/// The input goes through the syntax's [`Source`](rdfweave_graph_ir::Source)
/// under a [`StreamProcessor`], so encoding detection and stream lifecycle
/// hooks apply. Returns the number of statements read.
pub fn convert_stream<R: Read, W: Write>(
    input: R,
    from: Syntax,
    to: Syntax,
    config: &WriterConfig,
    output: W,
) -> Result<usize> {
    readable(from)?;
    let base = config.base.clone();
    let statements = if config.pretty {
        let (graph, statements) = collect(input, from, base)?;
        let mut generator = AnyGenerator::new(to, output, config);
        generator.receive_graph(&graph.nest_blank_nodes())?;
        generator.close()?;
        statements
    } else {
        let sink = GeneratorSink::new(AnyGenerator::new(to, output, config));
        let (mut sink, statements) = drive(input, from, base, sink)?;
        sink.generator_mut().close()?;
        statements
    };
    debug!(%from, %to, statements, "converted stream");
    Ok(statements)
}

fn collect<R: Read>(input: R, from: Syntax, base: Option<String>) -> Result<(Graph, usize)> {
    let (sink, statements) = drive(input, from, base, GraphCollectorSink::new())?;
    Ok((sink.finish(), statements))
}

/// Run the source for `from` over `input`, returning the sink afterwards
fn drive<R: Read, S: TripleSink>(
    input: R,
    from: Syntax,
    base: Option<String>,
    sink: S,
) -> Result<(S, usize)> {
    match from {
        Syntax::Turtle => {
            let mut source = TurtleSource::new(sink);
            if let Some(base) = base {
                source = source.with_base(base);
            }
            let mut processor = StreamProcessor::new(source);
            processor.process(input)?;
            let statements = processor.source().statements();
            Ok((processor.into_source().into_sink(), statements))
        }
        Syntax::NTriples => {
            let mut processor = StreamProcessor::new(NTriplesSource::new(sink));
            processor.process(input)?;
            let statements = processor.source().statements();
            Ok((processor.into_source().into_sink(), statements))
        }
        Syntax::RdfXml => {
            let mut source = RdfXmlSource::new(sink);
            if let Some(base) = base {
                source = source.with_base(base);
            }
            let mut processor = StreamProcessor::new(source);
            processor.process(input)?;
            let statements = processor.source().statements();
            Ok((processor.into_source().into_sink(), statements))
        }
        Syntax::Json => Err(FormatError::UnsupportedSyntax(from.to_string())),
    }
}
