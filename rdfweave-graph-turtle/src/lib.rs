//! Turtle and N-Triples for rdfweave graphs.
//!
//! Parsers emit to any `rdfweave_graph_ir::TripleSink`; generators implement
//! `rdfweave_graph_ir::Generator`.
//!
//! # Example
//!
//! ```
//! use rdfweave_graph_ir::{GeneratorSink, Generator};
//! use rdfweave_graph_turtle::{parse, NTriplesGenerator};
//!
//! let turtle = r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:alice ex:name "Alice" ;
//!              ex:age 30 .
//! "#;
//!
//! let mut sink = GeneratorSink::new(NTriplesGenerator::new(Vec::new()));
//! parse(turtle, &mut sink).unwrap();
//! let mut generator = sink.into_inner();
//! generator.close().unwrap();
//!
//! let text = String::from_utf8(generator.into_inner()).unwrap();
//! assert_eq!(text.lines().count(), 2);
//! ```

pub mod error;
pub mod generate;
pub mod lex;
pub mod ntriples;
pub mod parser;
pub mod source;

pub use error::{Result, TurtleError};
pub use generate::{NTriplesGenerator, TurtleGenerator};
pub use lex::{tokenize, Lexer, Token, TokenKind};
pub use ntriples::{parse_ntriples, NTriplesParser};
pub use parser::{parse, parse_with_base, Parser};
pub use source::{NTriplesSource, TurtleSource};

use rdfweave_graph_ir::{Graph, GraphCollectorSink};

/// Parse a Turtle document into a [`Graph`], keeping its prefixes and base.
pub fn parse_to_graph(input: &str) -> Result<Graph> {
    let mut sink = GraphCollectorSink::new();
    parse(input, &mut sink)?;
    Ok(sink.finish())
}
