//! Prefix ↔ namespace mapping
//!
//! A `NamespaceContext` keeps prefixes in registration order. Forward lookup
//! (prefix → namespace) sees the most recent registration for a prefix;
//! reverse lookup (namespace → prefix) returns the first prefix registered for
//! that namespace.

use crate::error::IriError;
use crate::iri::Iri;
use once_cell::sync::Lazy;
use rdfweave_vocab::namespaces::WELL_KNOWN;

static DEFAULT_CONTEXT: Lazy<NamespaceContext> = Lazy::new(|| {
    let mut ctx = NamespaceContext::new();
    for (prefix, ns) in WELL_KNOWN {
        ctx.add_namespace(*prefix, *ns);
    }
    ctx
});

/// Ordered prefix table used for IRI compaction and expansion
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    entries: Vec<(String, String)>,
}

impl NamespaceContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide context pre-seeded with the well-known vocabularies
    /// (rdf, rdfs, owl, xsd, dc, dcterms, foaf, skos, geo)
    pub fn default_context() -> &'static NamespaceContext {
        &DEFAULT_CONTEXT
    }

    /// An owned copy of the default context, for callers that want to extend it
    pub fn with_defaults() -> Self {
        DEFAULT_CONTEXT.clone()
    }

    /// Register a prefix. Re-registering a prefix replaces its namespace.
    pub fn add_namespace(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = namespace,
            None => self.entries.push((prefix, namespace)),
        }
    }

    /// Remove a prefix, returning its namespace
    pub fn remove_namespace(&mut self, prefix: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(p, _)| p == prefix)?;
        Some(self.entries.remove(idx).1)
    }

    /// Namespace registered for `prefix`
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }

    /// First prefix registered for `namespace`
    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, ns)| ns == namespace)
            .map(|(p, _)| p.as_str())
    }

    /// Register every entry of `other` (later entries win on prefix clashes)
    pub fn merge(&mut self, other: &NamespaceContext) {
        for (prefix, ns) in &other.entries {
            self.add_namespace(prefix.clone(), ns.clone());
        }
    }

    /// Iterate `(prefix, namespace)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the longest registered namespace that is a proper prefix of `iri`
    ///
    /// Returns `(prefix, local_part)`. On equal-length matches the earlier
    /// registration wins.
    pub fn split<'a>(&self, iri: &'a str) -> Option<(&str, &'a str)> {
        let mut best: Option<(&str, usize)> = None;
        for (prefix, ns) in &self.entries {
            if ns.is_empty() || iri.len() <= ns.len() || !iri.starts_with(ns.as_str()) {
                continue;
            }
            match best {
                Some((_, len)) if len >= ns.len() => {}
                _ => best = Some((prefix.as_str(), ns.len())),
            }
        }
        best.map(|(prefix, len)| (prefix, &iri[len..]))
    }

    /// Compact an IRI to `prefix:local` form when a namespace matches,
    /// otherwise return its full string form
    pub fn compact(&self, iri: &Iri) -> String {
        self.compact_str(&iri.to_string())
    }

    /// String form of [`compact`](Self::compact)
    pub fn compact_str(&self, iri: &str) -> String {
        match self.split(iri) {
            Some((prefix, local)) => format!("{}:{}", prefix, local),
            None => iri.to_string(),
        }
    }

    /// Expand a compact IRI (`dc:creator`) against this context
    ///
    /// Strings whose prefix is not registered are parsed as-is, so absolute
    /// IRIs pass through. `<...>` wrapping is stripped.
    pub fn expand_iri(&self, value: &str) -> Result<Iri, IriError> {
        let value = value
            .strip_prefix('<')
            .and_then(|v| v.strip_suffix('>'))
            .unwrap_or(value);

        if value.starts_with("_:") {
            return Iri::parse(value);
        }

        if let Some((prefix, local)) = value.split_once(':') {
            if !local.starts_with("//") {
                if let Some(ns) = self.namespace_uri(prefix) {
                    return Iri::parse(&format!("{}{}", ns, local));
                }
            }
        }

        Iri::parse(value)
    }

    /// Expand a compact IRI, failing when the prefix is not registered
    pub fn expand_strict(&self, value: &str) -> Result<Iri, IriError> {
        match value.split_once(':') {
            Some((prefix, local)) if !local.starts_with("//") => {
                let ns = self
                    .namespace_uri(prefix)
                    .ok_or_else(|| IriError::UndefinedPrefix {
                        prefix: prefix.to_string(),
                    })?;
                Iri::parse(&format!("{}{}", ns, local))
            }
            _ => Iri::parse(value),
        }
    }
}
