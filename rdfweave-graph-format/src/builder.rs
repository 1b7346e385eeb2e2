//! Content builders
//!
//! [`ContentBuilder`] feeds triples or resource trees into the generator for
//! one syntax and hands back the finished document. It is single-use: once
//! the output has been taken, every further `receive_*` call fails with
//! [`GraphError::Finalized`].
//!
//! [`RoutingContentBuilder`] renders each completed top-level resource as a
//! document of its own and passes it, with caller-supplied routing data, to
//! a callback instead of buffering the whole output.

use std::io::Cursor;

use rdfweave_graph_ir::{
    Generator, Graph, GraphError, Iri, Literal, NamespaceContext, Resource, Result, Sink, Triple,
    TripleSink,
};
use tracing::{debug, trace};

use crate::any::AnyGenerator;
use crate::config::WriterConfig;
use crate::syntax::Syntax;

/// Builds one document in a chosen syntax
pub struct ContentBuilder {
    generator: Option<AnyGenerator<Vec<u8>>>,
    output: Vec<u8>,
    syntax: Syntax,
}

impl ContentBuilder {
    pub fn new(syntax: Syntax, config: &WriterConfig) -> Self {
        Self {
            generator: Some(AnyGenerator::new(syntax, Vec::new(), config)),
            output: Vec::new(),
            syntax,
        }
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn is_finalized(&self) -> bool {
        self.generator.is_none()
    }

    fn generator(&mut self) -> Result<&mut AnyGenerator<Vec<u8>>> {
        self.generator.as_mut().ok_or(GraphError::Finalized)
    }

    /// Declare a prefix for compact output
    pub fn register_namespace(&mut self, prefix: &str, namespace: &str) -> Result<()> {
        self.generator()?.register_namespace(prefix, namespace);
        Ok(())
    }

    pub fn receive_triple(&mut self, triple: &Triple) -> Result<()> {
        self.generator()?.receive_triple(triple)
    }

    /// Write a resource tree; empty embedded resources are skipped
    pub fn receive_resource(&mut self, resource: &Resource) -> Result<()> {
        self.generator()?.receive_resource(resource)
    }

    /// Write every resource of a graph, declaring its prefixes first
    pub fn receive_graph(&mut self, graph: &Graph) -> Result<()> {
        self.generator()?.receive_graph(graph)
    }

    /// Close the generator; later calls are no-ops
    pub fn finalize(&mut self) -> Result<()> {
        if let Some(mut generator) = self.generator.take() {
            generator.close()?;
            self.output = generator.into_inner();
            debug!(syntax = %self.syntax, bytes = self.output.len(), "content finalized");
        }
        Ok(())
    }

    /// Finalized output as bytes
    pub fn bytes(&mut self) -> Result<&[u8]> {
        self.finalize()?;
        Ok(&self.output)
    }

    /// Finalized output as a string
    pub fn string(&mut self) -> Result<String> {
        self.finalize()?;
        String::from_utf8(self.output.clone()).map_err(|e| GraphError::Encoding {
            encoding: "UTF-8",
            message: e.to_string(),
        })
    }

    /// Finalized output as a readable stream
    pub fn reader(&mut self) -> Result<Cursor<Vec<u8>>> {
        self.finalize()?;
        Ok(Cursor::new(self.output.clone()))
    }

    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        Ok(self.output)
    }
}

impl Sink for ContentBuilder {}

impl TripleSink for ContentBuilder {
    fn on_prefix(&mut self, prefix: &str, namespace: &str) {
        if let Some(generator) = self.generator.as_mut() {
            generator.register_namespace(prefix, namespace);
        }
    }

    fn add_non_literal(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()> {
        self.receive_triple(&Triple::new(subject.clone(), predicate.clone(), object.clone()))
    }

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
    ) -> Result<()> {
        self.receive_triple(&Triple::new(
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
        self.receive_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            Literal::typed(content, datatype.clone()),
        ))
    }

    fn add_triple(&mut self, triple: &Triple) -> Result<()> {
        self.receive_triple(triple)
    }
}

fn plain_literal(content: &str, language: Option<&str>) -> Literal {
    match language {
        Some(language) => Literal::lang_string(content, language),
        None => Literal::new(content),
    }
}

/// One rendered top-level resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutedDocument<R> {
    pub route: R,
    pub subject: Iri,
    pub content: Vec<u8>,
}

impl<R> RoutedDocument<R> {
    pub fn text(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.content)
    }
}

/// Resource being collected from flat triples
struct Pending<R> {
    resource: Resource,
    route: R,
}

/// Renders and hands off one document per top-level resource
pub struct RoutingContentBuilder<R, F> {
    syntax: Syntax,
    config: WriterConfig,
    /// Prefixes declared by the stream, applied to every document
    declared: NamespaceContext,
    route: R,
    callback: F,
    pending: Option<Pending<R>>,
    emitted: usize,
    finished: bool,
}

impl<R, F> RoutingContentBuilder<R, F>
where
    R: Clone,
    F: FnMut(RoutedDocument<R>) -> Result<()>,
{
    /// Builder tagging documents with `route` until [`set_route`](Self::set_route)
    pub fn new(syntax: Syntax, config: WriterConfig, route: R, callback: F) -> Self {
        Self {
            syntax,
            config,
            declared: NamespaceContext::new(),
            route,
            callback,
            pending: None,
            emitted: 0,
            finished: false,
        }
    }

    /// Routing data for resources started from now on
    pub fn set_route(&mut self, route: R) {
        self.route = route;
    }

    /// Documents handed to the callback so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Render `resource` with the current route
    pub fn receive_resource(&mut self, resource: &Resource) -> Result<()> {
        let route = self.route.clone();
        self.receive_routed(resource, route)
    }

    /// Render `resource` with an explicit route
    pub fn receive_routed(&mut self, resource: &Resource, route: R) -> Result<()> {
        self.check_open()?;
        self.flush_pending()?;
        self.emit(resource, route)
    }

    /// Collect a flat triple; a change of subject completes the previous resource
    pub fn receive_triple(&mut self, triple: &Triple) -> Result<()> {
        self.check_open()?;
        let same_subject = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.resource.id() == &triple.subject);
        if !same_subject {
            self.flush_pending()?;
            self.pending = Some(Pending {
                resource: Resource::new(triple.subject.clone()),
                route: self.route.clone(),
            });
        }
        if let Some(pending) = self.pending.as_mut() {
            pending
                .resource
                .add(triple.predicate.clone(), triple.object.clone());
        }
        Ok(())
    }

    /// Emit the last pending resource and return the document count
    pub fn finish(&mut self) -> Result<usize> {
        if !self.finished {
            self.flush_pending()?;
            self.finished = true;
            debug!(documents = self.emitted, "routing builder finished");
        }
        Ok(self.emitted)
    }

    fn check_open(&self) -> Result<()> {
        if self.finished {
            Err(GraphError::Finalized)
        } else {
            Ok(())
        }
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(Pending { resource, route }) = self.pending.take() {
            self.emit(&resource, route)?;
        }
        Ok(())
    }

    fn emit(&mut self, resource: &Resource, route: R) -> Result<()> {
        if resource.root().is_empty() {
            return Ok(());
        }
        let mut builder = ContentBuilder::new(self.syntax, &self.config);
        for (prefix, namespace) in self.declared.iter() {
            builder.register_namespace(prefix, namespace)?;
        }
        builder.receive_resource(resource)?;
        let content = builder.into_bytes()?;
        trace!(subject = %resource.id(), bytes = content.len(), "routed document");
        self.emitted += 1;
        (self.callback)(RoutedDocument {
            route,
            subject: resource.id().clone(),
            content,
        })
    }
}

impl<R, F> Sink for RoutingContentBuilder<R, F>
where
    R: Clone,
    F: FnMut(RoutedDocument<R>) -> Result<()>,
{
    fn end_stream(&mut self) -> Result<()> {
        self.finish().map(|_| ())
    }
}

impl<R, F> TripleSink for RoutingContentBuilder<R, F>
where
    R: Clone,
    F: FnMut(RoutedDocument<R>) -> Result<()>,
{
    fn on_prefix(&mut self, prefix: &str, namespace: &str) {
        self.declared.add_namespace(prefix, namespace);
    }

    fn add_non_literal(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()> {
        self.receive_triple(&Triple::new(subject.clone(), predicate.clone(), object.clone()))
    }

    fn add_plain_literal(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        content: &str,
        language: Option<&str>,
    ) -> Result<()> {
        self.receive_triple(&Triple::new(
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
        self.receive_triple(&Triple::new(
            subject.clone(),
            predicate.clone(),
            Literal::typed(content, datatype.clone()),
        ))
    }
}
