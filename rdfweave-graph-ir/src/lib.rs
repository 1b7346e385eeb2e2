//! # rdfweave-graph-ir
//!
//! Format-agnostic RDF resource graph.
//!
//! This crate is the common currency of the rdfweave parsers and generators:
//! - [`Iri`], [`NamespaceContext`], [`Literal`], [`Node`] and [`Triple`] values
//! - [`Resource`] trees and the [`Graph`] that holds them
//! - the [`Sink`]/[`Source`] streaming pipeline driven by [`StreamProcessor`]
//! - the [`Generator`] trait every output syntax implements
//!
//! Parsers know nothing about generators and vice versa; everything meets
//! at the sink traits defined here.

pub mod blank;
pub mod error;
pub mod generator;
pub mod graph;
pub mod iri;
pub mod literal;
pub mod namespace;
pub mod resource;
pub mod sink;
pub mod source;
pub mod term;

pub use blank::BlankIdAllocator;
pub use error::{GraphError, IriError, Result};
pub use generator::{referenced_blank_nodes, write_resource, write_resource_with, Generator};
pub use graph::Graph;
pub use iri::{Iri, IriBuilder};
pub use literal::{escape_string, Literal};
pub use namespace::NamespaceContext;
pub use resource::{Entry, Resource, ResourceMut, ResourceRef, Triples, Value};
pub use sink::{
    CharBufferSink, CharSink, FilterSink, GeneratorSink, GraphCollectorSink, GraphSelector,
    QuadSink, QuadToTripleSink, Sink, TripleSink,
};
pub use source::{decode_text, read_text, CharSource, Source, StreamProcessor};
pub use term::{Node, Quad, Triple};
