mod cli;
mod commands;
mod config;
mod detect;
mod error;
mod input;

use clap::Parser;
use cli::{Cli, Commands};
use error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // --quiet   -> "off"
    // --verbose -> RUST_LOG when set, otherwise "info"
    // default   -> "warn", enough to surface tolerated input oddities
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Errors go to stderr, so a piped stdout keeps colored messages.
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli) {
        exit_with_error(e);
    }
}

fn run(cli: Cli) -> error::CliResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            pretty,
            base,
            prefixes,
            output,
        } => commands::convert::run(
            commands::convert::ConvertArgs {
                input,
                from,
                to,
                pretty,
                base,
                prefixes,
                output,
            },
            config_path,
        ),
        Commands::Syntaxes => {
            commands::syntaxes::run();
            Ok(())
        }
    }
}
