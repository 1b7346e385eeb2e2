//! Generator configuration
//!
//! Every option is fixed when the generator is built; nothing toggles
//! between calls.

use std::collections::BTreeMap;

use rdfweave_graph_ir::NamespaceContext;
use serde::{Deserialize, Serialize};

use crate::syntax::Syntax;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Nest blank nodes inline and indent JSON output
    pub pretty: bool,

    /// Spaces per nesting level; the syntax default when unset
    pub indent: Option<usize>,

    /// Extra prefixes, layered over the defaults
    pub namespaces: BTreeMap<String, String>,

    /// Start from the well-known prefixes (dc, foaf, rdf, xsd, ...)
    pub use_default_namespaces: bool,

    /// Base IRI assumed for input documents when the caller supplies none
    pub base: Option<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: None,
            namespaces: BTreeMap::new(),
            use_default_namespaces: true,
            base: None,
        }
    }
}

impl WriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_namespace(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), namespace.into());
        self
    }

    pub fn without_default_namespaces(mut self) -> Self {
        self.use_default_namespaces = false;
        self
    }

    /// Namespace context a generator starts from
    pub fn context(&self) -> NamespaceContext {
        let mut context = if self.use_default_namespaces {
            NamespaceContext::with_defaults()
        } else {
            NamespaceContext::new()
        };
        for (prefix, namespace) in &self.namespaces {
            context.add_namespace(prefix.as_str(), namespace.as_str());
        }
        context
    }

    pub fn indent_for(&self, syntax: Syntax) -> usize {
        self.indent.unwrap_or(match syntax {
            Syntax::Turtle => 4,
            Syntax::NTriples => 0,
            Syntax::RdfXml | Syntax::Json => 2,
        })
    }
}
