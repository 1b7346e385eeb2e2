use crate::error::{CliError, CliResult};
use rdfweave_graph_format::Syntax;
use std::path::Path;

fn unknown_syntax(name: &str) -> CliError {
    let valid: Vec<&str> = Syntax::ALL.iter().map(|s| s.name()).collect();
    CliError::Usage(format!(
        "unknown syntax '{name}'\n  {} valid syntaxes: {}",
        colored::Colorize::bold(colored::Colorize::cyan("help:")),
        valid.join(", ")
    ))
}

/// Detect the input syntax.
///
/// Priority: explicit `--from` flag > file extension > content sniffing.
pub fn detect_input_syntax(
    path: Option<&Path>,
    content: &[u8],
    explicit: Option<&str>,
) -> CliResult<Syntax> {
    let syntax = if let Some(name) = explicit {
        name.parse::<Syntax>().map_err(|_| unknown_syntax(name))?
    } else if let Some(syntax) = path.and_then(Syntax::from_path) {
        syntax
    } else {
        sniff(content)
    };
    if !syntax.is_readable() {
        return Err(CliError::Usage(format!(
            "{syntax} is an output-only syntax\n  {} read turtle, ntriples or rdfxml instead",
            colored::Colorize::bold(colored::Colorize::cyan("help:"))
        )));
    }
    Ok(syntax)
}

/// Detect the output syntax: explicit `--to` > output file extension > turtle.
pub fn detect_output_syntax(path: Option<&Path>, explicit: Option<&str>) -> CliResult<Syntax> {
    if let Some(name) = explicit {
        return name.parse().map_err(|_| unknown_syntax(name));
    }
    Ok(path.and_then(Syntax::from_path).unwrap_or(Syntax::Turtle))
}

/// XML documents open with a declaration, comment or element; anything
/// else is read as Turtle, which also accepts N-Triples.
fn sniff(content: &[u8]) -> Syntax {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    let start = content
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(content.len());
    let head = &content[start..];
    let xml = head.starts_with(b"<?xml")
        || head.starts_with(b"<!--")
        || head.starts_with(b"<!DOCTYPE")
        || head.starts_with(b"<rdf:");
    if xml {
        Syntax::RdfXml
    } else {
        Syntax::Turtle
    }
}
