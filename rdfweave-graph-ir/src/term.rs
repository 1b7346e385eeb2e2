//! Statement objects, triples and quads

use crate::iri::Iri;
use crate::literal::Literal;
use std::fmt;

/// The object of a statement: an IRI (possibly blank) or a literal
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(Iri),
    Literal(Literal),
}

impl Node {
    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Iri(iri) if iri.is_blank())
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            Node::Iri(_) => None,
        }
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Iri(iri)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

/// Plain strings become plain literals
impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Literal(Literal::new(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Literal(Literal::new(value))
    }
}

/// N-Triples term form: `<iri>`, `_:label` or a quoted literal
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) if iri.is_blank() => write!(f, "{}", iri),
            Node::Iri(iri) => write!(f, "<{}>", iri),
            Node::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// A single statement
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Node>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} .",
            Node::Iri(self.subject.clone()),
            Node::Iri(self.predicate.clone()),
            self.object
        )
    }
}

/// A triple with an optional named graph
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    pub triple: Triple,
    pub graph: Option<Iri>,
}

impl Quad {
    pub fn new(triple: Triple, graph: Option<Iri>) -> Self {
        Self { triple, graph }
    }
}
