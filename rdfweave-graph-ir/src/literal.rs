//! RDF literals
//!
//! A literal is a lexical value with at most one of a language tag or a
//! datatype. Plain literals carry neither.

use crate::error::{GraphError, Result};
use crate::iri::Iri;
use crate::namespace::NamespaceContext;
use bigdecimal::BigDecimal;
use rdfweave_vocab::xsd;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// An RDF literal
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: Option<Iri>,
}

impl Literal {
    /// Create a plain literal
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Create a datatyped literal
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype),
        }
    }

    /// Create a language-tagged literal
    pub fn lang_string(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Create an xsd:integer literal
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), xsd_iri(xsd::INTEGER))
    }

    /// Create an xsd:decimal literal
    pub fn decimal(value: &BigDecimal) -> Self {
        Self::typed(value.to_string(), xsd_iri(xsd::DECIMAL))
    }

    /// Create an xsd:double literal
    pub fn double(value: f64) -> Self {
        let lexical = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            (if value > 0.0 { "INF" } else { "-INF" }).to_string()
        } else {
            format!("{:E}", value)
        };
        Self::typed(lexical, xsd_iri(xsd::DOUBLE))
    }

    /// Create an xsd:boolean literal
    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), xsd_iri(xsd::BOOLEAN))
    }

    /// Lexical content
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }

    /// Neither language nor datatype
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.is_none()
    }

    /// Set the language tag. Fails if a datatype is already present.
    pub fn set_language(&mut self, language: impl Into<String>) -> Result<&mut Self> {
        if self.datatype.is_some() {
            return Err(GraphError::LiteralConflict);
        }
        self.language = Some(language.into());
        Ok(self)
    }

    /// Set the datatype. Fails if a language tag is already present.
    pub fn set_datatype(&mut self, datatype: Iri) -> Result<&mut Self> {
        if self.language.is_some() {
            return Err(GraphError::LiteralConflict);
        }
        self.datatype = Some(datatype);
        Ok(self)
    }

    /// Owned form of [`set_language`](Self::set_language)
    pub fn with_language(mut self, language: impl Into<String>) -> Result<Self> {
        self.set_language(language)?;
        Ok(self)
    }

    /// Owned form of [`set_datatype`](Self::set_datatype)
    pub fn with_datatype(mut self, datatype: Iri) -> Result<Self> {
        self.set_datatype(datatype)?;
        Ok(self)
    }

    /// Datatype as a full IRI string, expanding compact forms such as
    /// `xsd:integer` through the default context
    pub fn expanded_datatype(&self) -> Option<Cow<'_, str>> {
        let datatype = self.datatype.as_ref()?;
        if datatype.is_opaque() {
            if let (Some(prefix), Some(local)) = (datatype.scheme(), datatype.path()) {
                if let Some(ns) = NamespaceContext::default_context().namespace_uri(prefix) {
                    return Some(Cow::Owned(format!("{}{}", ns, local)));
                }
            }
        }
        Some(Cow::Owned(datatype.to_string()))
    }

    /// Check whether the datatype is one of the XSD numeric types
    pub fn is_numeric(&self) -> bool {
        self.expanded_datatype()
            .is_some_and(|dt| xsd::is_numeric_datatype(&dt))
    }

    /// Check whether the value renders as a bare number (numeric types and gYear)
    pub fn is_number_like(&self) -> bool {
        self.expanded_datatype()
            .is_some_and(|dt| xsd::is_number_like(&dt))
    }

    /// Value equivalence
    ///
    /// Numeric literals compare by value (`"1"^^xsd:integer` ≡ `"1.0"^^xsd:decimal`);
    /// when either side fails to parse, comparison falls back to the lexical form.
    /// Everything else compares structurally, so a plain literal is never
    /// equivalent to a typed one.
    pub fn equivalent(&self, other: &Literal) -> bool {
        if self.is_numeric() && other.is_numeric() {
            if let (Ok(a), Ok(b)) = (
                BigDecimal::from_str(&self.value),
                BigDecimal::from_str(&other.value),
            ) {
                return a == b;
            }
            return self.value == other.value;
        }
        self == other
    }
}

fn xsd_iri(iri: &'static str) -> Iri {
    Iri::constant(iri)
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::new(value)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::new(value)
    }
}

/// Escape a literal value for the N-Triples family of syntaxes
pub fn escape_string(value: &str) -> Cow<'_, str> {
    let needs_escape = value
        .chars()
        .any(|c| matches!(c, '"' | '\\') || c.is_control());
    if !needs_escape {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_string(&self.value))?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{}>", dt)?;
        }
        Ok(())
    }
}
