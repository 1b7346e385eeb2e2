//! Error types for RDF/XML parsing

use rdfweave_graph_ir::GraphError;

/// Error type for RDF/XML operations
#[derive(Debug, thiserror::Error)]
pub enum RdfXmlError {
    /// Well-formed XML that is not valid RDF/XML
    #[error("RDF/XML error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Malformed XML reported by the reader
    #[error("XML error at line {line}: {message}")]
    Xml { line: usize, message: String },

    /// Document ended with elements still open
    #[error("unexpected end of document inside <{element}>")]
    UnexpectedEof { element: String },

    /// Sink, encoding or I/O failure
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for RDF/XML operations
pub type Result<T> = std::result::Result<T, RdfXmlError>;

impl RdfXmlError {
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Line the error was raised at, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } | Self::Xml { line, .. } => Some(*line),
            Self::UnexpectedEof { .. } | Self::Graph(_) => None,
        }
    }
}
