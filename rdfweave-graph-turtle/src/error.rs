//! Error types for Turtle and N-Triples parsing

use rdfweave_graph_ir::GraphError;

/// Error type for Turtle and N-Triples operations
///
/// Lines and columns are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum TurtleError {
    /// Lexer error (invalid token)
    #[error("lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parser error (unexpected token or invalid structure)
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Input ended in the middle of a token or statement
    #[error("unexpected end of input at line {line}: {message}")]
    UnexpectedEof { line: usize, message: String },

    /// Invalid escape sequence in a string or IRI
    #[error("invalid escape sequence '{sequence}' at line {line}")]
    InvalidEscape { line: usize, sequence: String },

    /// Prefix not defined
    #[error("undefined prefix '{prefix}' at line {line}")]
    UndefinedPrefix { line: usize, prefix: String },

    /// IRI resolution error (relative IRI without base)
    #[error("IRI resolution error: {0}")]
    IriResolution(String),

    /// Sink, encoding or I/O failure
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for Turtle operations
pub type Result<T> = std::result::Result<T, TurtleError>;

impl TurtleError {
    /// Create a parse error
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Line the error was raised at, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lexer { line, .. }
            | Self::Parse { line, .. }
            | Self::UnexpectedEof { line, .. }
            | Self::InvalidEscape { line, .. }
            | Self::UndefinedPrefix { line, .. } => Some(*line),
            Self::IriResolution(_) | Self::Graph(_) => None,
        }
    }

    /// Move a positioned error to another line
    ///
    /// Used when a fragment of a larger document was parsed on its own.
    pub(crate) fn at_line(mut self, actual: usize) -> Self {
        match &mut self {
            Self::Lexer { line, .. }
            | Self::Parse { line, .. }
            | Self::UnexpectedEof { line, .. }
            | Self::InvalidEscape { line, .. }
            | Self::UndefinedPrefix { line, .. } => *line = actual,
            Self::IriResolution(_) | Self::Graph(_) => {}
        }
        self
    }
}
