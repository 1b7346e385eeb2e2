//! Namespace-resolved XML events
//!
//! The parser consumes these rather than reader-specific types, so it can be
//! driven by any XML reader or by a hand-built event sequence.

use rdfweave_vocab::{rdf, xml};

/// Element or attribute name with its namespace resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlName {
    /// Prefix as written in the document
    pub prefix: Option<String>,
    pub namespace: Option<String>,
    pub local: String,
}

impl XmlName {
    pub fn new(prefix: Option<&str>, namespace: Option<&str>, local: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
        }
    }

    /// Name in the RDF namespace, written with the `rdf` prefix
    pub fn rdf(local: &str) -> Self {
        Self::new(Some("rdf"), Some(rdf::NS), local)
    }

    /// Name without a namespace
    pub fn unqualified(local: &str) -> Self {
        Self::new(None, None, local)
    }

    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local == local
    }

    pub fn is_rdf(&self, local: &str) -> bool {
        self.is(rdf::NS, local)
    }

    pub fn is_xml(&self) -> bool {
        self.namespace.as_deref() == Some(xml::NS)
    }

    /// Namespace and local name concatenated, for qualified names
    pub fn iri(&self) -> Option<String> {
        self.namespace
            .as_ref()
            .map(|namespace| format!("{}{}", namespace, self.local))
    }

    /// Name as written: `prefix:local` or `local`
    pub fn qname(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    /// Value with entity references expanded
    pub value: String,
}

impl XmlAttribute {
    pub fn new(name: XmlName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// SAX-style document events
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlEvent {
    StartElement {
        name: XmlName,
        /// Attributes other than namespace declarations
        attributes: Vec<XmlAttribute>,
        /// `(prefix, namespace)` declared on this element; the default
        /// namespace has an empty prefix
        namespaces: Vec<(String, String)>,
    },
    EndElement {
        name: XmlName,
    },
    /// Character data with entities expanded
    Characters(String),
}

impl XmlEvent {
    /// Start event without namespace declarations
    pub fn start(name: XmlName, attributes: Vec<XmlAttribute>) -> Self {
        XmlEvent::StartElement {
            name,
            attributes,
            namespaces: Vec::new(),
        }
    }

    pub fn end(name: XmlName) -> Self {
        XmlEvent::EndElement { name }
    }

    pub fn text(text: impl Into<String>) -> Self {
        XmlEvent::Characters(text.into())
    }
}
