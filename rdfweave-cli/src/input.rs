use crate::error::{CliError, CliResult};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Where the input document comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum InputSource {
    /// From a file on disk.
    File(PathBuf),
    /// From stdin (piped).
    Stdin,
}

impl InputSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            InputSource::File(path) => Some(path),
            InputSource::Stdin => None,
        }
    }
}

/// Resolve the input: a file path, `-` for stdin, or piped stdin when omitted.
pub fn resolve_input(positional: Option<&Path>) -> CliResult<InputSource> {
    match positional {
        Some(path) if path == Path::new("-") => Ok(InputSource::Stdin),
        Some(path) => Ok(InputSource::File(path.to_path_buf())),
        None if !io::stdin().is_terminal() => Ok(InputSource::Stdin),
        None => Err(CliError::Usage(format!(
            "no input provided\n  {} pass a file path or pipe a document via stdin",
            colored::Colorize::bold(colored::Colorize::cyan("help:"))
        ))),
    }
}

/// Read raw bytes; encoding is detected by the parser.
pub fn read_input(source: &InputSource) -> CliResult<Vec<u8>> {
    match source {
        InputSource::File(path) => std::fs::read(path)
            .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display()))),
        InputSource::Stdin => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
