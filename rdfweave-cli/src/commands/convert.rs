use crate::config::{self, Overrides};
use crate::detect::{detect_input_syntax, detect_output_syntax};
use crate::error::{CliError, CliResult};
use crate::input::{read_input, resolve_input};
use rdfweave_graph_format::convert_stream;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ConvertArgs {
    pub input: Option<PathBuf>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub pretty: bool,
    pub base: Option<String>,
    pub prefixes: Vec<String>,
    pub output: Option<PathBuf>,
}

pub fn run(args: ConvertArgs, config_path: Option<&Path>) -> CliResult<()> {
    let prefixes = args
        .prefixes
        .iter()
        .map(|p| config::parse_prefix(p))
        .collect::<CliResult<Vec<_>>>()?;
    let writer_config = config::load(config_path)?.writer_config(Overrides {
        pretty: args.pretty,
        base: args.base,
        prefixes,
    });

    let source = resolve_input(args.input.as_deref())?;
    let content = read_input(&source)?;
    let from = detect_input_syntax(source.path(), &content, args.from.as_deref())?;
    let to = detect_output_syntax(args.output.as_deref(), args.to.as_deref())?;

    let mut rendered = Vec::new();
    let statements = convert_stream(content.as_slice(), from, to, &writer_config, &mut rendered)?;
    if !rendered.is_empty() && !rendered.ends_with(b"\n") {
        rendered.push(b'\n');
    }

    match &args.output {
        Some(path) => fs::write(path, &rendered).map_err(|e| {
            CliError::Input(format!("failed to write {}: {e}", path.display()))
        })?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
    }

    info!(%from, %to, statements, bytes = rendered.len(), "conversion finished");
    Ok(())
}
