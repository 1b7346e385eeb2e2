//! Concrete syntaxes and their names

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Output or input syntax
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    Turtle,
    #[serde(alias = "nt", alias = "n-triples")]
    NTriples,
    #[serde(alias = "rdf", alias = "xml")]
    RdfXml,
    Json,
}

impl Syntax {
    pub const ALL: [Syntax; 4] = [Syntax::Turtle, Syntax::NTriples, Syntax::RdfXml, Syntax::Json];

    pub fn name(self) -> &'static str {
        match self {
            Syntax::Turtle => "turtle",
            Syntax::NTriples => "ntriples",
            Syntax::RdfXml => "rdfxml",
            Syntax::Json => "json",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Syntax::Turtle => "text/turtle",
            Syntax::NTriples => "application/n-triples",
            Syntax::RdfXml => "application/rdf+xml",
            Syntax::Json => "application/json",
        }
    }

    /// File extensions, preferred first
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Syntax::Turtle => &["ttl", "turtle"],
            Syntax::NTriples => &["nt"],
            Syntax::RdfXml => &["rdf", "xml", "owl"],
            Syntax::Json => &["json"],
        }
    }

    /// JSON is output-only
    pub fn is_readable(self) -> bool {
        !matches!(self, Syntax::Json)
    }

    pub fn from_extension(extension: &str) -> Option<Syntax> {
        let extension = extension.to_ascii_lowercase();
        Syntax::ALL
            .into_iter()
            .find(|syntax| syntax.extensions().contains(&extension.as_str()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Syntax> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Syntax::from_extension)
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Syntax {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Syntax::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(Syntax::NTriples),
            "rdfxml" | "rdf/xml" | "rdf" | "xml" => Ok(Syntax::RdfXml),
            "json" => Ok(Syntax::Json),
            _ => Err(FormatError::UnsupportedSyntax(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_aliases() {
        for syntax in Syntax::ALL {
            assert_eq!(syntax.name().parse::<Syntax>().unwrap(), syntax);
        }
        assert_eq!("TTL".parse::<Syntax>().unwrap(), Syntax::Turtle);
        assert_eq!("RDF/XML".parse::<Syntax>().unwrap(), Syntax::RdfXml);
        assert!(matches!(
            "yaml".parse::<Syntax>(),
            Err(FormatError::UnsupportedSyntax(name)) if name == "yaml"
        ));
    }

    #[test]
    fn test_detection_from_path() {
        assert_eq!(Syntax::from_path("data/file.ttl"), Some(Syntax::Turtle));
        assert_eq!(Syntax::from_path("dump.NT"), Some(Syntax::NTriples));
        assert_eq!(Syntax::from_path("onto.owl"), Some(Syntax::RdfXml));
        assert_eq!(Syntax::from_path("out.json"), Some(Syntax::Json));
        assert_eq!(Syntax::from_path("README"), None);
    }
}
