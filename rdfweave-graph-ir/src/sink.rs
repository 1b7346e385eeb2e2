//! Sink traits for event-driven graph construction
//!
//! Parsers push statements into a sink without knowing what the sink does
//! with them. The sink can be:
//! - `GraphCollectorSink`: collects statements into a `Graph`
//! - `GeneratorSink`: forwards them to a syntax generator as they arrive
//! - `FilterSink`: drops statements before they reach another sink
//!
//! Every sink sees the same lifecycle: `start_stream`, any number of
//! `begin_document`/`end_document` pairs and statements, then `end_stream`.

use crate::error::Result;
use crate::generator::Generator;
use crate::graph::Graph;
use crate::iri::Iri;
use crate::literal::Literal;
use crate::term::{Node, Triple};
use crate::BlankIdAllocator;
use tracing::debug;

/// Stream lifecycle shared by every sink
pub trait Sink {
    /// Called when a base IRI is declared (`@base`, `xml:base` on the root)
    fn set_base_uri(&mut self, base: &str) {
        let _ = base;
    }

    fn start_stream(&mut self) -> Result<()> {
        Ok(())
    }

    fn end_stream(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_document(&mut self, id: &str) -> Result<()> {
        let _ = id;
        Ok(())
    }

    fn end_document(&mut self, id: &str) -> Result<()> {
        let _ = id;
        Ok(())
    }
}

/// Receiver of triples
pub trait TripleSink: Sink {
    /// Called when a prefix is declared
    fn on_prefix(&mut self, prefix: &str, namespace: &str) {
        let _ = (prefix, namespace);
    }

    /// Statement whose object is an IRI or blank node
    fn add_non_literal(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()>;

    /// Statement whose object is a plain (optionally language-tagged) literal
    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
    ) -> Result<()>;

    /// Statement whose object is a datatyped literal
    fn add_typed_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        datatype: &Iri,
    ) -> Result<()>;

    /// Dispatch a whole triple to the matching `add_*` method
    fn add_triple(&mut self, triple: &Triple) -> Result<()> {
        let (s, p) = (&triple.subject, &triple.predicate);
        match &triple.object {
            Node::Iri(object) => self.add_non_literal(s, p, object),
            Node::Literal(lit) => match lit.datatype() {
                Some(dt) => self.add_typed_literal(s, p, lit.value(), dt),
                None => self.add_plain_literal(s, p, lit.value(), lit.language()),
            },
        }
    }
}

/// Receiver of quads: triples with an optional named graph
pub trait QuadSink: Sink {
    fn add_non_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        object: &Iri,
        graph: Option<&Iri>,
    ) -> Result<()>;

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
        graph: Option<&Iri>,
    ) -> Result<()>;

    fn add_typed_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        datatype: &Iri,
        graph: Option<&Iri>,
    ) -> Result<()>;
}

/// Receiver of raw character data
pub trait CharSink: Sink {
    fn characters(&mut self, chunk: &str) -> Result<()>;
}

impl<T: Sink + ?Sized> Sink for &mut T {
    fn set_base_uri(&mut self, base: &str) {
        (**self).set_base_uri(base)
    }

    fn start_stream(&mut self) -> Result<()> {
        (**self).start_stream()
    }

    fn end_stream(&mut self) -> Result<()> {
        (**self).end_stream()
    }

    fn begin_document(&mut self, id: &str) -> Result<()> {
        (**self).begin_document(id)
    }

    fn end_document(&mut self, id: &str) -> Result<()> {
        (**self).end_document(id)
    }
}

impl<T: TripleSink + ?Sized> TripleSink for &mut T {
    fn on_prefix(&mut self, prefix: &str, namespace: &str) {
        (**self).on_prefix(prefix, namespace)
    }

    fn add_non_literal(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()> {
        (**self).add_non_literal(subject, predicate, object)
    }

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
    ) -> Result<()> {
        (**self).add_plain_literal(subject, predicate, content, language)
    }

    fn add_typed_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        datatype: &Iri,
    ) -> Result<()> {
        (**self).add_typed_literal(subject, predicate, content, datatype)
    }

    fn add_triple(&mut self, triple: &Triple) -> Result<()> {
        (**self).add_triple(triple)
    }
}

fn plain_literal(content: &str, language: Option<&str>) -> Literal {
    match language {
        Some(lang) => Literal::lang_string(content, lang),
        None => Literal::new(content),
    }
}

/// Sink that collects triples into a [`Graph`]
///
/// Triples are grouped into top-level resources by subject, in first-seen
/// order. Declared prefixes and the base IRI are recorded on the graph.
///
/// # Example
///
/// ```
/// use rdfweave_graph_ir::{GraphCollectorSink, Iri, TripleSink};
///
/// let mut sink = GraphCollectorSink::new();
/// sink.on_prefix("foaf", "http://xmlns.com/foaf/0.1/");
///
/// let alice = Iri::parse("http://example.org/alice").unwrap();
/// let name = Iri::parse("http://xmlns.com/foaf/0.1/name").unwrap();
/// sink.add_plain_literal(&alice, &name, "Alice", None).unwrap();
///
/// let graph = sink.finish();
/// assert_eq!(graph.len(), 1);
/// assert_eq!(graph.namespaces().namespace_uri("foaf"), Some("http://xmlns.com/foaf/0.1/"));
/// ```
#[derive(Debug, Default)]
pub struct GraphCollectorSink {
    graph: Graph,
}

impl GraphCollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect into a graph whose resources share `allocator`
    pub fn with_allocator(allocator: BlankIdAllocator) -> Self {
        Self {
            graph: Graph::with_allocator(allocator),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn finish(self) -> Graph {
        self.graph
    }
}

impl Sink for GraphCollectorSink {
    fn set_base_uri(&mut self, base: &str) {
        self.graph.set_base(base);
    }

    fn end_stream(&mut self) -> Result<()> {
        debug!(resources = self.graph.len(), "collected graph");
        Ok(())
    }
}

impl TripleSink for GraphCollectorSink {
    fn on_prefix(&mut self, prefix: &str, namespace: &str) {
        self.graph.namespaces_mut().add_namespace(prefix, namespace);
    }

    fn add_non_literal(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()> {
        self.graph.add_triple(Triple::new(
            subject.clone(),
            predicate.clone(),
            object.clone(),
        ));
        Ok(())
    }

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
    ) -> Result<()> {
        self.graph.add_triple(Triple::new(
            subject.clone(),
            predicate.clone(),
            plain_literal(content, language),
        ));
        Ok(())
    }

    fn add_typed_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        datatype: &Iri,
    ) -> Result<()> {
        self.graph.add_triple(Triple::new(
            subject.clone(),
            predicate.clone(),
            Literal::typed(content, datatype.clone()),
        ));
        Ok(())
    }
}

/// Sink that streams triples straight into a [`Generator`]
#[derive(Debug)]
pub struct GeneratorSink<G> {
    generator: G,
}

impl<G: Generator> GeneratorSink<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn into_inner(self) -> G {
        self.generator
    }
}

impl<G: Generator> Sink for GeneratorSink<G> {}

impl<G: Generator> TripleSink for GeneratorSink<G> {
    fn on_prefix(&mut self, prefix: &str, namespace: &str) {
        self.generator.register_namespace(prefix, namespace);
    }

    fn add_non_literal(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()> {
        self.add_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            object.clone(),
        ))
    }

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
    ) -> Result<()> {
        self.add_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            plain_literal(content, language),
        ))
    }

    fn add_typed_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        datatype: &Iri,
    ) -> Result<()> {
        self.add_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            Literal::typed(content, datatype.clone()),
        ))
    }

    fn add_triple(&mut self, triple: &Triple) -> Result<()> {
        self.generator.receive_triple(triple)
    }
}

/// Sink that forwards only the triples accepted by a predicate closure
pub struct FilterSink<S, F> {
    inner: S,
    keep: F,
    dropped: usize,
}

impl<S, F> FilterSink<S, F>
where
    S: TripleSink,
    F: FnMut(&Triple) -> bool,
{
    pub fn new(inner: S, keep: F) -> Self {
        Self {
            inner,
            keep,
            dropped: 0,
        }
    }

    /// Number of triples rejected so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TripleSink, F: FnMut(&Triple) -> bool> Sink for FilterSink<S, F> {
    fn set_base_uri(&mut self, base: &str) {
        self.inner.set_base_uri(base)
    }

    fn start_stream(&mut self) -> Result<()> {
        self.inner.start_stream()
    }

    fn end_stream(&mut self) -> Result<()> {
        debug!(dropped = self.dropped, "filter finished");
        self.inner.end_stream()
    }

    fn begin_document(&mut self, id: &str) -> Result<()> {
        self.inner.begin_document(id)
    }

    fn end_document(&mut self, id: &str) -> Result<()> {
        self.inner.end_document(id)
    }
}

impl<S: TripleSink, F: FnMut(&Triple) -> bool> TripleSink for FilterSink<S, F> {
    fn on_prefix(&mut self, prefix: &str, namespace: &str) {
        self.inner.on_prefix(prefix, namespace)
    }

    fn add_non_literal(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()> {
        self.add_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            object.clone(),
        ))
    }

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
    ) -> Result<()> {
        self.add_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            plain_literal(content, language),
        ))
    }

    fn add_typed_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        datatype: &Iri,
    ) -> Result<()> {
        self.add_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            Literal::typed(content, datatype.clone()),
        ))
    }

    fn add_triple(&mut self, triple: &Triple) -> Result<()> {
        if (self.keep)(triple) {
            self.inner.add_triple(triple)
        } else {
            self.dropped += 1;
            Ok(())
        }
    }
}

/// Which quads a [`QuadToTripleSink`] passes on
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GraphSelector {
    /// Every quad, with the graph component dropped
    #[default]
    All,
    /// Only quads in the default graph
    Default,
    /// Only quads in the given named graph
    Named(Iri),
}

impl GraphSelector {
    fn accepts(&self, graph: Option<&Iri>) -> bool {
        match self {
            GraphSelector::All => true,
            GraphSelector::Default => graph.is_none(),
            GraphSelector::Named(name) => graph == Some(name),
        }
    }
}

/// Adapter presenting a [`TripleSink`] as a [`QuadSink`]
#[derive(Debug)]
pub struct QuadToTripleSink<S> {
    inner: S,
    selector: GraphSelector,
}

impl<S: TripleSink> QuadToTripleSink<S> {
    pub fn new(inner: S) -> Self {
        Self::with_selector(inner, GraphSelector::All)
    }

    pub fn with_selector(inner: S, selector: GraphSelector) -> Self {
        Self { inner, selector }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TripleSink> Sink for QuadToTripleSink<S> {
    fn set_base_uri(&mut self, base: &str) {
        self.inner.set_base_uri(base)
    }

    fn start_stream(&mut self) -> Result<()> {
        self.inner.start_stream()
    }

    fn end_stream(&mut self) -> Result<()> {
        self.inner.end_stream()
    }

    fn begin_document(&mut self, id: &str) -> Result<()> {
        self.inner.begin_document(id)
    }

    fn end_document(&mut self, id: &str) -> Result<()> {
        self.inner.end_document(id)
    }
}

impl<S: TripleSink> QuadSink for QuadToTripleSink<S> {
    fn add_non_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        object: &Iri,
        graph: Option<&Iri>,
    ) -> Result<()> {
        if !self.selector.accepts(graph) {
            return Ok(());
        }
        self.inner.add_non_literal(subject, predicate, object)
    }

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
        graph: Option<&Iri>,
    ) -> Result<()> {
        if !self.selector.accepts(graph) {
            return Ok(());
        }
        self.inner
            .add_plain_literal(subject, predicate, content, language)
    }

    fn add_typed_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        datatype: &Iri,
        graph: Option<&Iri>,
    ) -> Result<()> {
        if !self.selector.accepts(graph) {
            return Ok(());
        }
        self.inner
            .add_typed_literal(subject, predicate, content, datatype)
    }
}

/// Character sink that accumulates everything it receives
#[derive(Debug, Default)]
pub struct CharBufferSink {
    buffer: String,
    chunks: usize,
}

impl CharBufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Number of `characters` calls received
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Sink for CharBufferSink {}

impl CharSink for CharBufferSink {
    fn characters(&mut self, chunk: &str) -> Result<()> {
        self.buffer.push_str(chunk);
        self.chunks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn test_graph_collector_sink() {
        let mut sink = GraphCollectorSink::new();
        sink.set_base_uri("http://example.org/");
        sink.on_prefix("ex", "http://example.org/");

        let s = iri("http://example.org/s");
        let p = iri("http://example.org/p");
        sink.add_plain_literal(&s, &p, "hello", Some("en")).unwrap();
        sink.add_typed_literal(&s, &p, "5", &iri(rdfweave_vocab::xsd::INTEGER))
            .unwrap();
        sink.add_non_literal(&s, &p, &Iri::blank("b1")).unwrap();

        let graph = sink.finish();
        assert_eq!(graph.base(), Some("http://example.org/"));
        assert_eq!(graph.len(), 1);
        let objects = graph.resource(&s).unwrap().objects(&p);
        assert_eq!(objects.len(), 3);
        assert_eq!(
            objects[0].as_literal().and_then(|l| l.language()),
            Some("en")
        );
    }

    #[test]
    fn test_filter_sink_drops_predicates() {
        let keep = iri("urn:keep");
        let mut sink = FilterSink::new(GraphCollectorSink::new(), |t: &Triple| {
            t.predicate.to_string() == "urn:keep"
        });
        let s = iri("urn:s");
        sink.add_plain_literal(&s, &keep, "a", None).unwrap();
        sink.add_plain_literal(&s, &iri("urn:drop"), "b", None).unwrap();
        assert_eq!(sink.dropped(), 1);
        assert_eq!(sink.into_inner().finish().triples().count(), 1);
    }

    #[test]
    fn test_quad_to_triple_selects_graph() {
        let named = iri("urn:g");
        let mut sink =
            QuadToTripleSink::with_selector(GraphCollectorSink::new(), GraphSelector::Named(named.clone()));
        let (s, p) = (iri("urn:s"), iri("urn:p"));
        QuadSink::add_plain_literal(&mut sink, &s, &p, "in", None, Some(&named)).unwrap();
        QuadSink::add_plain_literal(&mut sink, &s, &p, "out", None, None).unwrap();
        QuadSink::add_non_literal(&mut sink, &s, &p, &iri("urn:o"), Some(&named)).unwrap();
        assert_eq!(sink.into_inner().finish().triples().count(), 2);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn feed<S: TripleSink>(mut sink: S) {
            sink.start_stream().unwrap();
            sink.add_non_literal(&iri("urn:s"), &iri("urn:p"), &iri("urn:o"))
                .unwrap();
            sink.end_stream().unwrap();
        }

        let mut collector = GraphCollectorSink::new();
        feed(&mut collector);
        assert_eq!(collector.graph().len(), 1);
    }

    #[test]
    fn test_char_buffer_sink() {
        let mut sink = CharBufferSink::new();
        sink.characters("ab").unwrap();
        sink.characters("c").unwrap();
        assert_eq!(sink.as_str(), "abc");
        assert_eq!(sink.chunks(), 2);
    }
}
