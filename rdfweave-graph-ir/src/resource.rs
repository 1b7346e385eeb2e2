//! Resource trees
//!
//! A `Resource` is an identified node with an ordered list of statements.
//! Statement objects are either plain values (IRIs, literals) or embedded
//! child resources, which turns a resource into a tree. The tree is stored
//! as an arena: child nodes always sit at a higher index than their parent.
//!
//! # Example
//!
//! ```
//! use rdfweave_graph_ir::{Iri, Resource};
//!
//! let iri = |s: &str| Iri::parse(s).unwrap();
//! let mut doc = Resource::new(iri("urn:doc1"));
//! doc.add(iri("urn:title"), "Hello");
//! doc.new_resource(iri("urn:author")).add(iri("urn:name"), "Ann");
//!
//! assert_eq!(doc.triples().count(), 3);
//! ```

use std::collections::HashMap;

use crate::blank::BlankIdAllocator;
use crate::iri::Iri;
use crate::literal::Literal;
use crate::term::{Node, Triple};

#[derive(Clone, Debug, PartialEq)]
enum Statement {
    Value { predicate: Iri, object: Node },
    Embedded { predicate: Iri, child: usize },
}

#[derive(Clone, Debug, PartialEq)]
struct ResourceNode {
    id: Iri,
    statements: Vec<Statement>,
}

impl ResourceNode {
    fn new(id: Iri) -> Self {
        Self {
            id,
            statements: Vec::new(),
        }
    }
}

/// Anything that can be the object of [`Resource::add`]
#[derive(Clone, Debug)]
pub enum Value {
    Node(Node),
    Resource(Resource),
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Value::Node(Node::Iri(iri))
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Value::Node(Node::Literal(lit))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Node(Node::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Node(Node::from(value))
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        Value::Resource(resource)
    }
}

/// An identified node with ordered statements and embedded children
#[derive(Clone, Debug)]
pub struct Resource {
    nodes: Vec<ResourceNode>,
    allocator: BlankIdAllocator,
}

impl Resource {
    /// Create a resource with its own blank node allocator
    pub fn new(id: Iri) -> Self {
        Self::with_allocator(id, BlankIdAllocator::new())
    }

    /// Create a resource whose anonymous children draw labels from `allocator`
    pub fn with_allocator(id: Iri, allocator: BlankIdAllocator) -> Self {
        Self {
            nodes: vec![ResourceNode::new(id)],
            allocator,
        }
    }

    /// Create a resource identified by a fresh blank node
    pub fn anonymous(allocator: &BlankIdAllocator) -> Self {
        Self::with_allocator(allocator.next(), allocator.clone())
    }

    pub fn id(&self) -> &Iri {
        &self.nodes[0].id
    }

    pub fn set_id(&mut self, id: Iri) {
        self.nodes[0].id = id;
    }

    pub fn allocator(&self) -> &BlankIdAllocator {
        &self.allocator
    }

    /// Append a statement. Adding a `Resource` embeds it as a child.
    pub fn add(&mut self, predicate: Iri, value: impl Into<Value>) -> &mut Self {
        self.add_at(0, predicate, value.into());
        self
    }

    /// Embed a new anonymous child under `predicate` and return a handle to it
    pub fn new_resource(&mut self, predicate: Iri) -> ResourceMut<'_> {
        let id = self.allocator.next();
        self.new_resource_with_id(predicate, id)
    }

    /// Embed a new child with the given identifier
    pub fn new_resource_with_id(&mut self, predicate: Iri, id: Iri) -> ResourceMut<'_> {
        let index = self.embed(0, predicate, id);
        ResourceMut {
            resource: self,
            index,
        }
    }

    /// Read-only view of this resource as a tree
    pub fn root(&self) -> ResourceRef<'_> {
        ResourceRef {
            resource: self,
            index: 0,
        }
    }

    /// Mutable handle on the root node
    pub fn root_mut(&mut self) -> ResourceMut<'_> {
        ResourceMut {
            resource: self,
            index: 0,
        }
    }

    /// True when no triple would be produced, counting embedded children
    /// that are themselves empty as absent
    pub fn is_empty(&self) -> bool {
        self.root().is_empty()
    }

    /// Number of triples this resource produces
    pub fn len(&self) -> usize {
        self.triples().count()
    }

    /// Direct (non-embedded) objects of `predicate`
    pub fn objects(&self, predicate: &Iri) -> Vec<&Node> {
        self.root().objects(predicate)
    }

    /// Predicates used at the top level, in first-insertion order
    pub fn predicates(&self) -> Vec<&Iri> {
        let mut seen: Vec<&Iri> = Vec::new();
        for statement in &self.nodes[0].statements {
            let predicate = match statement {
                Statement::Value { predicate, .. } | Statement::Embedded { predicate, .. } => {
                    predicate
                }
            };
            if !seen.contains(&predicate) {
                seen.push(predicate);
            }
        }
        seen
    }

    /// Embedded children of the root, in insertion order
    pub fn embedded(&self) -> Vec<ResourceRef<'_>> {
        self.root().embedded()
    }

    /// Triples in depth-first pre-order: a parent's statements in order, each
    /// embedded child's link triple immediately followed by the child's own
    /// triples. Empty children (and links to them) are skipped.
    pub fn triples(&self) -> Triples<'_> {
        Triples {
            resource: self,
            live: self.live_mask(),
            stack: vec![(0, 0)],
        }
    }

    fn add_at(&mut self, index: usize, predicate: Iri, value: Value) {
        match value {
            Value::Node(object) => self.nodes[index]
                .statements
                .push(Statement::Value { predicate, object }),
            Value::Resource(other) => self.graft(index, predicate, other),
        }
    }

    fn embed(&mut self, parent: usize, predicate: Iri, id: Iri) -> usize {
        let child = self.nodes.len();
        self.nodes.push(ResourceNode::new(id));
        self.nodes[parent]
            .statements
            .push(Statement::Embedded { predicate, child });
        child
    }

    fn graft(&mut self, parent: usize, predicate: Iri, mut other: Resource) {
        let allocator = self.allocator.clone();
        other.relabel(&allocator, true);
        let offset = self.nodes.len();
        for mut node in other.nodes {
            for statement in &mut node.statements {
                if let Statement::Embedded { child, .. } = statement {
                    *child += offset;
                }
            }
            self.nodes.push(node);
        }
        self.nodes[parent].statements.push(Statement::Embedded {
            predicate,
            child: offset,
        });
    }

    /// Move this resource onto `allocator`, issuing fresh labels for the
    /// blank nodes it allocated elsewhere
    ///
    /// Embedded children with blank ids are relabelled, and so is the root
    /// when `include_root` is set. Object references inside this resource
    /// follow the new labels. Nothing changes when the allocators already
    /// share a counter.
    pub(crate) fn relabel(&mut self, allocator: &BlankIdAllocator, include_root: bool) {
        if self.allocator.shares_counter(allocator) {
            return;
        }
        let start = usize::from(!include_root);
        let mut labels: HashMap<Iri, Iri> = HashMap::new();
        for node in self.nodes.iter_mut().skip(start) {
            if node.id.is_blank() {
                node.id = labels
                    .entry(node.id.clone())
                    .or_insert_with(|| allocator.next())
                    .clone();
            }
        }
        if !labels.is_empty() {
            for statement in self.nodes.iter_mut().flat_map(|n| n.statements.iter_mut()) {
                if let Statement::Value {
                    object: Node::Iri(object),
                    ..
                } = statement
                {
                    if let Some(fresh) = labels.get(&*object) {
                        *object = fresh.clone();
                    }
                }
            }
        }
        self.allocator = allocator.clone();
    }

    /// `live[i]` is true when node `i` produces at least one triple
    fn live_mask(&self) -> Vec<bool> {
        let mut live = vec![false; self.nodes.len()];
        for idx in (0..self.nodes.len()).rev() {
            let alive = self.nodes[idx].statements.iter().any(|s| match s {
                Statement::Value { .. } => true,
                Statement::Embedded { child, .. } => live[*child],
            });
            live[idx] = alive;
        }
        live
    }
}

/// One statement of a resource node, as seen through [`ResourceRef::entries`]
#[derive(Clone, Copy, Debug)]
pub enum Entry<'a> {
    Value {
        predicate: &'a Iri,
        object: &'a Node,
    },
    Embedded {
        predicate: &'a Iri,
        resource: ResourceRef<'a>,
    },
}

/// Borrowed view of one node of a resource tree
#[derive(Clone, Copy, Debug)]
pub struct ResourceRef<'a> {
    resource: &'a Resource,
    index: usize,
}

impl<'a> ResourceRef<'a> {
    pub fn id(&self) -> &'a Iri {
        &self.node().id
    }

    pub fn is_empty(&self) -> bool {
        !self.node().statements.iter().any(|s| match s {
            Statement::Value { .. } => true,
            Statement::Embedded { child, .. } => !self.at(*child).is_empty(),
        })
    }

    /// Statements in insertion order
    pub fn entries(&self) -> impl Iterator<Item = Entry<'a>> + 'a {
        let resource = self.resource;
        self.node().statements.iter().map(move |s| match s {
            Statement::Value { predicate, object } => Entry::Value { predicate, object },
            Statement::Embedded { predicate, child } => Entry::Embedded {
                predicate,
                resource: ResourceRef {
                    resource,
                    index: *child,
                },
            },
        })
    }

    pub fn objects(&self, predicate: &Iri) -> Vec<&'a Node> {
        self.entries()
            .filter_map(|e| match e {
                Entry::Value { predicate: p, object } if p == predicate => Some(object),
                _ => None,
            })
            .collect()
    }

    pub fn embedded(&self) -> Vec<ResourceRef<'a>> {
        self.entries()
            .filter_map(|e| match e {
                Entry::Embedded { resource, .. } => Some(resource),
                Entry::Value { .. } => None,
            })
            .collect()
    }

    fn node(&self) -> &'a ResourceNode {
        &self.resource.nodes[self.index]
    }

    fn at(&self, index: usize) -> ResourceRef<'a> {
        ResourceRef {
            resource: self.resource,
            index,
        }
    }
}

/// Mutable handle on one node of a resource tree
///
/// Returned by [`Resource::new_resource`]; statements added through the
/// handle land on the child it points at.
#[derive(Debug)]
pub struct ResourceMut<'a> {
    resource: &'a mut Resource,
    index: usize,
}

impl ResourceMut<'_> {
    pub fn id(&self) -> &Iri {
        &self.resource.nodes[self.index].id
    }

    pub fn set_id(&mut self, id: Iri) -> &mut Self {
        self.resource.nodes[self.index].id = id;
        self
    }

    pub fn add(&mut self, predicate: Iri, value: impl Into<Value>) -> &mut Self {
        self.resource.add_at(self.index, predicate, value.into());
        self
    }

    pub fn new_resource(&mut self, predicate: Iri) -> ResourceMut<'_> {
        let id = self.resource.allocator.next();
        self.new_resource_with_id(predicate, id)
    }

    pub fn new_resource_with_id(&mut self, predicate: Iri, id: Iri) -> ResourceMut<'_> {
        let index = self.resource.embed(self.index, predicate, id);
        ResourceMut {
            resource: &mut *self.resource,
            index,
        }
    }
}

/// Lazy pre-order triple iterator over a resource tree
#[derive(Debug)]
pub struct Triples<'a> {
    resource: &'a Resource,
    live: Vec<bool>,
    /// (node index, next statement position)
    stack: Vec<(usize, usize)>,
}

impl Iterator for Triples<'_> {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        let resource = self.resource;
        loop {
            let (node_idx, pos) = *self.stack.last()?;
            let node = &resource.nodes[node_idx];
            let Some(statement) = node.statements.get(pos) else {
                self.stack.pop();
                continue;
            };
            if let Some(top) = self.stack.last_mut() {
                top.1 += 1;
            }

            match statement {
                Statement::Value { predicate, object } => {
                    return Some(Triple::new(
                        node.id.clone(),
                        predicate.clone(),
                        object.clone(),
                    ));
                }
                Statement::Embedded { predicate, child } => {
                    if !self.live[*child] {
                        continue;
                    }
                    self.stack.push((*child, 0));
                    return Some(Triple::new(
                        node.id.clone(),
                        predicate.clone(),
                        resource.nodes[*child].id.clone(),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn lines(resource: &Resource) -> Vec<String> {
        resource.triples().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_preorder_with_embedded() {
        let alloc = BlankIdAllocator::new();
        let mut doc = Resource::with_allocator(iri("urn:doc"), alloc);
        doc.add(iri("urn:a"), "1");
        doc.new_resource(iri("urn:child"))
            .add(iri("urn:b"), "2")
            .add(iri("urn:c"), iri("urn:x"));
        doc.add(iri("urn:d"), "3");

        assert_eq!(
            lines(&doc),
            vec![
                "<urn:doc> <urn:a> \"1\" .",
                "<urn:doc> <urn:child> _:b1 .",
                "_:b1 <urn:b> \"2\" .",
                "_:b1 <urn:c> <urn:x> .",
                "<urn:doc> <urn:d> \"3\" .",
            ]
        );
    }

    #[test]
    fn test_empty_embedded_resources_are_pruned() {
        let mut doc = Resource::new(iri("urn:res"));
        doc.add(iri("urn:p"), "v");
        {
            let mut empty = doc.new_resource(iri("urn:empty"));
            // nested but still empty
            empty.new_resource(iri("urn:deeper"));
        }
        assert_eq!(lines(&doc), vec!["<urn:res> <urn:p> \"v\" ."]);
        assert_eq!(doc.embedded().len(), 1);
        assert!(doc.embedded()[0].is_empty());
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_add_resource_value_embeds_copy() {
        let mut child = Resource::new(iri("urn:child"));
        child.new_resource(iri("urn:inner")).add(iri("urn:q"), "deep");

        let mut parent = Resource::new(iri("urn:parent"));
        parent.add(iri("urn:has"), child);

        let out = lines(&parent);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], "<urn:parent> <urn:has> <urn:child> .");
        assert_eq!(out[1], "<urn:child> <urn:inner> _:b1 .");
        assert_eq!(out[2], "_:b1 <urn:q> \"deep\" .");
        assert_eq!(parent.allocator().issued(), 1);
    }

    #[test]
    fn test_grafted_blank_nodes_get_distinct_labels() {
        let mut parent = Resource::new(iri("urn:root"));
        parent.new_resource(iri("urn:x")).add(iri("urn:px"), "1");

        let mut child = Resource::new(iri("urn:c"));
        child.new_resource(iri("urn:y")).add(iri("urn:py"), "2");
        parent.add(iri("urn:has"), child);

        let mut by_subject: HashMap<String, Vec<String>> = HashMap::new();
        for t in parent.triples() {
            by_subject
                .entry(t.subject.to_string())
                .or_default()
                .push(t.predicate.to_string());
        }
        assert_eq!(by_subject["_:b1"], vec!["urn:px"]);
        assert_eq!(by_subject["_:b2"], vec!["urn:py"]);
    }

    #[test]
    fn test_graft_keeps_internal_references() {
        let mut child = Resource::new(iri("urn:c"));
        let inner = child.new_resource(iri("urn:y")).add(iri("urn:v"), "x").id().clone();
        child.add(iri("urn:same"), inner);

        let mut parent = Resource::new(iri("urn:root"));
        parent.new_resource(iri("urn:x")).add(iri("urn:v"), "y");
        parent.add(iri("urn:has"), child);

        let triples: Vec<Triple> = parent.triples().collect();
        let embedded = triples
            .iter()
            .find(|t| t.predicate == iri("urn:y"))
            .map(|t| t.object.clone())
            .unwrap();
        let referenced = triples
            .iter()
            .find(|t| t.predicate == iri("urn:same"))
            .map(|t| t.object.clone())
            .unwrap();
        assert_eq!(embedded, referenced);
        assert_eq!(embedded.to_string(), "_:b2");
    }

    #[test]
    fn test_accessors() {
        let mut doc = Resource::new(iri("urn:doc"));
        doc.add(iri("urn:tag"), "a")
            .add(iri("urn:tag"), "b")
            .add(iri("urn:link"), iri("urn:x"));
        doc.set_id(iri("urn:doc2"));

        assert_eq!(doc.id(), &iri("urn:doc2"));
        assert_eq!(doc.objects(&iri("urn:tag")).len(), 2);
        assert_eq!(doc.predicates(), vec![&iri("urn:tag"), &iri("urn:link")]);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_shared_allocator_across_resources() {
        let alloc = BlankIdAllocator::new();
        let mut a = Resource::with_allocator(iri("urn:a"), alloc.clone());
        let mut b = Resource::with_allocator(iri("urn:b"), alloc.clone());
        let first = a.new_resource(iri("urn:p")).id().clone();
        let second = b.new_resource(iri("urn:p")).id().clone();
        assert_eq!(first.to_string(), "_:b1");
        assert_eq!(second.to_string(), "_:b2");
    }

    #[test]
    fn test_empty_resource() {
        let doc = Resource::new(iri("urn:none"));
        assert!(doc.is_empty());
        assert_eq!(doc.triples().count(), 0);
    }
}
