//! Error types for the resource graph

use thiserror::Error;

/// Errors raised while parsing or building an IRI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IriError {
    /// Scheme contains characters outside `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
    #[error("invalid scheme in '{iri}'")]
    InvalidScheme { iri: String },

    /// Port is not a decimal number in 0..=65535
    #[error("invalid port '{port}' in '{iri}'")]
    InvalidPort { iri: String, port: String },

    /// Character that may not appear anywhere in an IRI
    #[error("invalid character {character:?} at position {position} in '{iri}'")]
    InvalidCharacter {
        iri: String,
        position: usize,
        character: char,
    },

    /// `%` not followed by two hex digits
    #[error("invalid percent-encoding at position {position} in '{iri}'")]
    InvalidPercentEncoding { iri: String, position: usize },

    /// IP-literal host with a missing `[` or `]`
    #[error("unbalanced brackets in authority of '{iri}'")]
    UnbalancedBracket { iri: String },

    /// Compact IRI uses a prefix the namespace context does not define
    #[error("undefined prefix '{prefix}'")]
    UndefinedPrefix { prefix: String },
}

/// Errors raised by the graph model and the streaming pipeline
#[derive(Error, Debug)]
pub enum GraphError {
    /// Invalid IRI
    #[error(transparent)]
    Iri(#[from] IriError),

    /// A literal may carry a language tag or a datatype, never both
    #[error("literal cannot carry both a language tag and a datatype")]
    LiteralConflict,

    /// Content was requested (or more content received) after finalization
    #[error("content builder already finalized")]
    Finalized,

    /// I/O failure reading input or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input bytes are not valid in the detected encoding
    #[error("input is not valid {encoding}: {message}")]
    Encoding {
        encoding: &'static str,
        message: String,
    },

    /// The target syntax cannot express the statement
    #[error("cannot serialize: {0}")]
    Unserializable(String),

    /// Failure reported by a downstream sink
    #[error("sink error: {0}")]
    Sink(String),
}

impl GraphError {
    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink(message.into())
    }
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
