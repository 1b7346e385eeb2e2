//! # rdfweave-graph-rdfxml
//!
//! RDF/XML support for rdfweave graphs.
//!
//! - [`RdfXmlParser`] turns namespace-resolved [`XmlEvent`]s into
//!   [`TripleSink`](rdfweave_graph_ir::TripleSink) calls; [`XmlEventReader`]
//!   produces those events from text with quick-xml
//! - [`RdfXmlGenerator`] writes resources as `rdf:Description` elements
//! - [`RdfXmlSource`] plugs the parser into a
//!   [`StreamProcessor`](rdfweave_graph_ir::StreamProcessor)
//!
//! ```
//! use rdfweave_graph_ir::GraphCollectorSink;
//! use rdfweave_graph_rdfxml::parse_rdfxml;
//!
//! let input = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!                         xmlns:dc="http://purl.org/dc/elements/1.1/">
//!   <rdf:Description rdf:about="urn:doc">
//!     <dc:title>Hello</dc:title>
//!   </rdf:Description>
//! </rdf:RDF>"#;
//!
//! let mut sink = GraphCollectorSink::new();
//! assert_eq!(parse_rdfxml(input, &mut sink).unwrap(), 1);
//! assert_eq!(sink.finish().len(), 1);
//! ```

pub mod error;
pub mod event;
pub mod generator;
pub mod parser;
pub mod reader;
pub mod source;

pub use error::{RdfXmlError, Result};
pub use event::{XmlAttribute, XmlEvent, XmlName};
pub use generator::RdfXmlGenerator;
pub use parser::{parse_rdfxml, parse_rdfxml_with_base, RdfXmlParser};
pub use reader::XmlEventReader;
pub use source::RdfXmlSource;
