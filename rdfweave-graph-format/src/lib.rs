//! # rdfweave-graph-format
//!
//! Syntax selection and output plumbing on top of the rdfweave parsers and
//! generators:
//!
//! - [`Syntax`] names each supported syntax and detects it from file names
//! - [`JsonGenerator`] renders resources as nested JSON objects
//! - [`AnyGenerator`] picks a generator at runtime
//! - [`ContentBuilder`] and [`RoutingContentBuilder`] turn triples or
//!   resources into finished documents
//! - [`convert`] and [`convert_stream`] read one syntax and write another
//!
//! ```
//! use rdfweave_graph_format::{convert, Syntax, WriterConfig};
//!
//! let nt = convert(
//!     "@prefix dc: <http://purl.org/dc/elements/1.1/> . <urn:doc> dc:title \"Hi\" .",
//!     Syntax::Turtle,
//!     Syntax::NTriples,
//!     &WriterConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(nt, "<urn:doc> <http://purl.org/dc/elements/1.1/title> \"Hi\" .\n");
//! ```

mod any;
mod builder;
mod config;
mod convert;
mod error;
mod json;
mod syntax;

pub use any::AnyGenerator;
pub use builder::{ContentBuilder, RoutedDocument, RoutingContentBuilder};
pub use config::WriterConfig;
pub use convert::{convert, convert_stream, parse_into, read_graph, write_graph, ParseOptions};
pub use error::{FormatError, Result};
pub use json::JsonGenerator;
pub use syntax::Syntax;
