//! Error type shared by the conversion helpers

use rdfweave_graph_ir::GraphError;
use rdfweave_graph_rdfxml::RdfXmlError;
use rdfweave_graph_turtle::TurtleError;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Turtle(#[from] TurtleError),

    #[error(transparent)]
    RdfXml(#[from] RdfXmlError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Syntax name not recognised, or not readable
    #[error("unsupported syntax: {0}")]
    UnsupportedSyntax(String),
}

pub type Result<T> = std::result::Result<T, FormatError>;

impl From<std::io::Error> for FormatError {
    fn from(err: std::io::Error) -> Self {
        FormatError::Graph(GraphError::Io(err))
    }
}

impl FormatError {
    /// Source line of a parse error, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::Turtle(e) => e.line(),
            FormatError::RdfXml(e) => e.line(),
            FormatError::Graph(_) | FormatError::UnsupportedSyntax(_) => None,
        }
    }
}
