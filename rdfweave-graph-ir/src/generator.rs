//! Syntax generator capability
//!
//! A generator turns a stream of resource events into one concrete syntax.
//! Callers either push whole resource trees (`receive_resource`) or flat
//! triples (`receive_triple`); flat triples with the same subject that arrive
//! consecutively are written as one resource block.

use std::collections::HashSet;

use crate::error::Result;
use crate::graph::Graph;
use crate::iri::Iri;
use crate::resource::{Entry, Resource, ResourceRef};
use crate::term::{Node, Triple};

/// Event sink for one output syntax
pub trait Generator {
    /// Register a prefix for compact output. Generators without prefix
    /// support ignore it.
    fn register_namespace(&mut self, prefix: &str, namespace: &str) {
        let _ = (prefix, namespace);
    }

    /// Subject of the resource block currently open, if any
    fn open_subject(&self) -> Option<&Iri>;

    /// Open a top-level resource block
    fn begin_resource(&mut self, id: &Iri) -> Result<()>;

    /// Write one statement of the innermost open resource
    fn statement(&mut self, predicate: &Iri, object: &Node) -> Result<()>;

    /// Open an embedded resource as the object of `predicate`
    fn begin_embedded(&mut self, predicate: &Iri, id: &Iri) -> Result<()>;

    /// Close the innermost embedded resource
    fn end_embedded(&mut self) -> Result<()>;

    /// Close the top-level resource block
    fn end_resource(&mut self) -> Result<()>;

    /// Flush everything and finish the document. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Write a flat triple
    fn receive_triple(&mut self, triple: &Triple) -> Result<()> {
        if self.open_subject() != Some(&triple.subject) {
            if self.open_subject().is_some() {
                self.end_resource()?;
            }
            self.begin_resource(&triple.subject)?;
        }
        self.statement(&triple.predicate, &triple.object)
    }

    /// Write a resource tree
    fn receive_resource(&mut self, resource: &Resource) -> Result<()> {
        write_resource(self, resource)
    }

    /// Write every resource of a graph after registering its prefixes
    ///
    /// A blank node that is embedded somewhere and also referenced by label
    /// from anywhere in the graph is written as its own block.
    fn receive_graph(&mut self, graph: &Graph) -> Result<()> {
        for (prefix, namespace) in graph.namespaces().iter() {
            self.register_namespace(prefix, namespace);
        }
        let shared = referenced_blank_nodes(graph.resources());
        for resource in graph.resources() {
            write_resource_with(self, resource, &shared)?;
        }
        Ok(())
    }
}

/// Blank node ids used as plain statement objects in `resources`
pub fn referenced_blank_nodes<'a>(
    resources: impl IntoIterator<Item = &'a Resource>,
) -> HashSet<Iri> {
    fn collect(node: ResourceRef<'_>, ids: &mut HashSet<Iri>) {
        for entry in node.entries() {
            match entry {
                Entry::Value {
                    object: Node::Iri(id),
                    ..
                } if id.is_blank() => {
                    ids.insert(id.clone());
                }
                Entry::Value { .. } => {}
                Entry::Embedded { resource, .. } => collect(resource, ids),
            }
        }
    }

    let mut ids = HashSet::new();
    for resource in resources {
        collect(resource.root(), &mut ids);
    }
    ids
}

/// Walk a resource tree into a generator, skipping embedded resources that
/// produce no triples
pub fn write_resource<G: Generator + ?Sized>(generator: &mut G, resource: &Resource) -> Result<()> {
    let shared = referenced_blank_nodes([resource]);
    write_resource_with(generator, resource, &shared)
}

/// [`write_resource`] with an explicit set of blank ids that must not be
/// inlined
///
/// An embedded blank child whose id is in `shared` becomes a labelled
/// statement, and the child follows as a separate top-level block.
pub fn write_resource_with<G: Generator + ?Sized>(
    generator: &mut G,
    resource: &Resource,
    shared: &HashSet<Iri>,
) -> Result<()> {
    if generator.open_subject().is_some() {
        generator.end_resource()?;
    }
    let mut blocks = vec![resource.root()];
    let mut next = 0;
    while let Some(&node) = blocks.get(next) {
        next += 1;
        if node.is_empty() {
            continue;
        }
        generator.begin_resource(node.id())?;
        write_entries(generator, node, shared, &mut blocks)?;
        generator.end_resource()?;
    }
    Ok(())
}

fn write_entries<'a, G: Generator + ?Sized>(
    generator: &mut G,
    node: ResourceRef<'a>,
    shared: &HashSet<Iri>,
    deferred: &mut Vec<ResourceRef<'a>>,
) -> Result<()> {
    for entry in node.entries() {
        match entry {
            Entry::Value { predicate, object } => generator.statement(predicate, object)?,
            Entry::Embedded { predicate, resource } => {
                if resource.is_empty() {
                    continue;
                }
                let id = resource.id();
                if id.is_blank() && shared.contains(id) {
                    generator.statement(predicate, &Node::Iri(id.clone()))?;
                    deferred.push(resource);
                    continue;
                }
                generator.begin_embedded(predicate, id)?;
                write_entries(generator, resource, shared, deferred)?;
                generator.end_embedded()?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the event sequence as strings
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        subject: Option<Iri>,
    }

    impl Generator for Recorder {
        fn open_subject(&self) -> Option<&Iri> {
            self.subject.as_ref()
        }

        fn begin_resource(&mut self, id: &Iri) -> Result<()> {
            self.subject = Some(id.clone());
            self.events.push(format!("begin {}", id));
            Ok(())
        }

        fn statement(&mut self, predicate: &Iri, object: &Node) -> Result<()> {
            self.events.push(format!("{} {}", predicate, object));
            Ok(())
        }

        fn begin_embedded(&mut self, predicate: &Iri, id: &Iri) -> Result<()> {
            self.events.push(format!("embed {} {}", predicate, id));
            Ok(())
        }

        fn end_embedded(&mut self) -> Result<()> {
            self.events.push("unembed".to_string());
            Ok(())
        }

        fn end_resource(&mut self) -> Result<()> {
            self.subject = None;
            self.events.push("end".to_string());
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            if self.subject.is_some() {
                self.end_resource()?;
            }
            Ok(())
        }
    }

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn test_resource_walk_skips_empty_children() {
        let mut doc = Resource::new(iri("urn:doc"));
        doc.add(iri("urn:p"), "v");
        doc.new_resource(iri("urn:empty"));
        doc.new_resource(iri("urn:full")).add(iri("urn:q"), "w");

        let mut rec = Recorder::default();
        rec.receive_resource(&doc).unwrap();
        assert_eq!(
            rec.events,
            vec![
                "begin urn:doc",
                "urn:p \"v\"",
                "embed urn:full _:b2",
                "urn:q \"w\"",
                "unembed",
                "end",
            ]
        );
    }

    #[test]
    fn test_flat_triples_grouped_by_consecutive_subject() {
        let mut rec = Recorder::default();
        let (a, b, p) = (iri("urn:a"), iri("urn:b"), iri("urn:p"));
        rec.receive_triple(&Triple::new(a.clone(), p.clone(), "1")).unwrap();
        rec.receive_triple(&Triple::new(a.clone(), p.clone(), "2")).unwrap();
        rec.receive_triple(&Triple::new(b.clone(), p.clone(), "3")).unwrap();
        rec.close().unwrap();
        assert_eq!(
            rec.events,
            vec![
                "begin urn:a",
                "urn:p \"1\"",
                "urn:p \"2\"",
                "end",
                "begin urn:b",
                "urn:p \"3\"",
                "end",
            ]
        );
    }

    #[test]
    fn test_referenced_blank_child_written_as_own_block() {
        let mut doc = Resource::new(iri("urn:a"));
        let friend = doc
            .new_resource(iri("urn:knows"))
            .add(iri("urn:name"), "x")
            .id()
            .clone();
        doc.add(iri("urn:also"), friend);

        let mut rec = Recorder::default();
        rec.receive_resource(&doc).unwrap();
        assert_eq!(
            rec.events,
            vec![
                "begin urn:a",
                "urn:knows _:b1",
                "urn:also _:b1",
                "end",
                "begin _:b1",
                "urn:name \"x\"",
                "end",
            ]
        );
    }

    #[test]
    fn test_graph_wide_reference_prevents_inlining() {
        let mut graph = Graph::new();
        let friend = graph
            .new_resource(iri("urn:a"))
            .new_resource(iri("urn:knows"))
            .add(iri("urn:name"), "x")
            .id()
            .clone();
        graph.new_resource(iri("urn:c")).add(iri("urn:also"), friend);

        let mut rec = Recorder::default();
        rec.receive_graph(&graph).unwrap();
        assert_eq!(
            rec.events,
            vec![
                "begin urn:a",
                "urn:knows _:b1",
                "end",
                "begin _:b1",
                "urn:name \"x\"",
                "end",
                "begin urn:c",
                "urn:also _:b1",
                "end",
            ]
        );
    }

    #[test]
    fn test_empty_resource_writes_nothing() {
        let mut rec = Recorder::default();
        rec.receive_resource(&Resource::new(iri("urn:none"))).unwrap();
        assert!(rec.events.is_empty());
    }
}
