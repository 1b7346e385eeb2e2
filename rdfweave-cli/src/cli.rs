use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rdfweave", about = "Convert RDF between Turtle, N-Triples, RDF/XML and JSON", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a TOML config file with [output] and [namespaces] tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a document from one syntax to another
    Convert {
        /// Input file ('-' or omitted reads stdin)
        input: Option<PathBuf>,

        /// Input syntax (detected from the file extension or content when omitted)
        #[arg(long, short = 'f')]
        from: Option<String>,

        /// Output syntax (detected from --output, otherwise turtle)
        #[arg(long, short = 't')]
        to: Option<String>,

        /// Nest blank nodes and indent the output
        #[arg(long)]
        pretty: bool,

        /// Base IRI for relative references in the input
        #[arg(long)]
        base: Option<String>,

        /// Extra prefix declaration, as PREFIX=NAMESPACE (repeatable)
        #[arg(long = "prefix", value_name = "PREFIX=NAMESPACE")]
        prefixes: Vec<String>,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List supported syntaxes
    Syntaxes,
}
