//! Resource graph container
//!
//! A `Graph` is an ordered collection of top-level resources sharing one
//! namespace context and one blank node allocator.

use crate::blank::BlankIdAllocator;
use crate::iri::Iri;
use crate::namespace::NamespaceContext;
use crate::resource::{Entry, Resource, ResourceMut, ResourceRef};
use crate::term::{Node, Triple};
use std::collections::HashMap;
use tracing::debug;

/// Ordered collection of top-level resources
#[derive(Clone, Debug, Default)]
pub struct Graph {
    resources: Vec<Resource>,
    /// First resource index per subject
    index: HashMap<Iri, usize>,
    namespaces: NamespaceContext,
    base: Option<String>,
    allocator: BlankIdAllocator,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph whose resources draw blank labels from `allocator`
    pub fn with_allocator(allocator: BlankIdAllocator) -> Self {
        Self {
            allocator,
            ..Default::default()
        }
    }

    pub fn allocator(&self) -> &BlankIdAllocator {
        &self.allocator
    }

    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceContext {
        &mut self.namespaces
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = Some(base.into());
    }

    /// Append a top-level resource
    ///
    /// A resource built on another allocator has its embedded blank nodes
    /// relabelled from this graph's allocator. Its own id is kept, since
    /// other resources may refer to it.
    pub fn add_resource(&mut self, mut resource: Resource) {
        resource.relabel(&self.allocator, false);
        let idx = self.resources.len();
        self.index.entry(resource.id().clone()).or_insert(idx);
        self.resources.push(resource);
    }

    /// Append an empty top-level resource and return it for population.
    ///
    /// Lookups by id use the id given here.
    pub fn new_resource(&mut self, id: Iri) -> &mut Resource {
        let resource = Resource::with_allocator(id, self.allocator.clone());
        let idx = self.resources.len();
        self.add_resource(resource);
        &mut self.resources[idx]
    }

    /// Append a top-level resource identified by a fresh blank node
    pub fn new_blank_resource(&mut self) -> &mut Resource {
        let id = self.allocator.next();
        self.new_resource(id)
    }

    /// First top-level resource with the given id
    pub fn resource(&self, id: &Iri) -> Option<&Resource> {
        self.index.get(id).map(|&idx| &self.resources[idx])
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Number of top-level resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Add a flat triple to the resource for its subject, creating it on first use
    pub fn add_triple(&mut self, triple: Triple) {
        let idx = match self.index.get(&triple.subject) {
            Some(&idx) => idx,
            None => {
                let idx = self.resources.len();
                self.add_resource(Resource::with_allocator(
                    triple.subject,
                    self.allocator.clone(),
                ));
                idx
            }
        };
        self.resources[idx].add(triple.predicate, triple.object);
    }

    /// All triples, resource by resource
    pub fn triples(&self) -> impl Iterator<Item = Triple> + '_ {
        self.resources.iter().flat_map(|r| r.triples())
    }

    /// Keep only the resources matching `keep`
    pub fn retain<F: FnMut(&Resource) -> bool>(&mut self, keep: F) {
        self.resources.retain(keep);
        self.index.clear();
        for (idx, resource) in self.resources.iter().enumerate() {
            self.index.entry(resource.id().clone()).or_insert(idx);
        }
    }

    /// Re-embed blank top-level resources that are referenced exactly once
    ///
    /// A blank resource whose identifier appears as the object of exactly one
    /// statement (in a different resource) is moved under that statement as
    /// an embedded child. Resources on reference cycles stay top-level at the
    /// point where the cycle is entered, so no resource is lost or duplicated.
    pub fn nest_blank_nodes(self) -> Graph {
        let mut counts: HashMap<&Iri, (usize, usize)> = HashMap::new();
        for (ri, resource) in self.resources.iter().enumerate() {
            count_references(resource.root(), ri, &mut counts);
        }

        let candidates: HashMap<Iri, usize> = self
            .resources
            .iter()
            .enumerate()
            .filter(|(ri, r)| {
                r.id().is_blank()
                    && self.index.get(r.id()) == Some(ri)
                    && matches!(counts.get(r.id()), Some(&(1, referrer)) if referrer != *ri)
            })
            .map(|(ri, r)| (r.id().clone(), ri))
            .collect();

        let mut consumed = vec![false; self.resources.len()];
        let mut nested = Graph {
            namespaces: self.namespaces.clone(),
            base: self.base.clone(),
            allocator: self.allocator.clone(),
            ..Default::default()
        };

        let is_candidate = |ri: usize| candidates.values().any(|&c| c == ri);
        let roots = (0..self.resources.len())
            .filter(|&ri| !is_candidate(ri))
            .chain((0..self.resources.len()).filter(|&ri| is_candidate(ri)));

        for ri in roots.collect::<Vec<_>>() {
            if consumed[ri] {
                continue;
            }
            consumed[ri] = true;
            let source = &self.resources[ri];
            let mut target = Resource::with_allocator(source.id().clone(), self.allocator.clone());
            copy_nested(
                &self.resources,
                source.root(),
                &mut target.root_mut(),
                &candidates,
                &mut consumed,
            );
            nested.add_resource(target);
        }

        debug!(
            before = self.resources.len(),
            after = nested.len(),
            "nested blank resources"
        );
        nested
    }
}

fn count_references<'a>(
    node: ResourceRef<'a>,
    referrer: usize,
    counts: &mut HashMap<&'a Iri, (usize, usize)>,
) {
    for entry in node.entries() {
        match entry {
            Entry::Value {
                object: Node::Iri(object),
                ..
            } if object.is_blank() => {
                let slot = counts.entry(object).or_insert((0, referrer));
                slot.0 += 1;
                slot.1 = referrer;
            }
            Entry::Value { .. } => {}
            Entry::Embedded { resource, .. } => count_references(resource, referrer, counts),
        }
    }
}

fn copy_nested(
    resources: &[Resource],
    source: ResourceRef<'_>,
    target: &mut ResourceMut<'_>,
    candidates: &HashMap<Iri, usize>,
    consumed: &mut [bool],
) {
    for entry in source.entries() {
        match entry {
            Entry::Value { predicate, object } => {
                if let Node::Iri(id) = object {
                    if let Some(&ci) = candidates.get(id) {
                        if !consumed[ci] {
                            consumed[ci] = true;
                            let mut child = target.new_resource_with_id(predicate.clone(), id.clone());
                            copy_nested(resources, resources[ci].root(), &mut child, candidates, consumed);
                            continue;
                        }
                    }
                }
                target.add(predicate.clone(), object.clone());
            }
            Entry::Embedded { predicate, resource } => {
                let mut child = target.new_resource_with_id(predicate.clone(), resource.id().clone());
                copy_nested(resources, resource, &mut child, candidates, consumed);
            }
        }
    }
}
