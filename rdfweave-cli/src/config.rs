//! `--config` file handling
//!
//! ```toml
//! [output]
//! pretty = true
//! indent = 2
//! base = "http://example.org/"
//!
//! [namespaces]
//! ex = "http://example.org/ns#"
//! ```

use crate::error::{CliError, CliResult};
use rdfweave_graph_format::WriterConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output: OutputSection,
    pub namespaces: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub pretty: Option<bool>,
    pub indent: Option<usize>,
    pub base: Option<String>,
    pub use_default_namespaces: Option<bool>,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Default)]
pub struct Overrides {
    pub pretty: bool,
    pub base: Option<String>,
    pub prefixes: Vec<(String, String)>,
}

pub fn load(path: Option<&Path>) -> CliResult<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("failed to read config {}: {e}", path.display()))
    })?;
    let config: FileConfig = toml::from_str(&text)?;
    debug!(
        path = %path.display(),
        namespaces = config.namespaces.len(),
        "loaded config"
    );
    Ok(config)
}

impl FileConfig {
    pub fn writer_config(self, overrides: Overrides) -> WriterConfig {
        let mut config = WriterConfig::default();
        let output = self.output;
        config.pretty = overrides.pretty || output.pretty.unwrap_or(false);
        config.indent = output.indent;
        config.base = overrides.base.or(output.base);
        if let Some(defaults) = output.use_default_namespaces {
            config.use_default_namespaces = defaults;
        }
        config.namespaces = self.namespaces;
        for (prefix, namespace) in overrides.prefixes {
            config.namespaces.insert(prefix, namespace);
        }
        config
    }
}

/// Split a `PREFIX=NAMESPACE` argument
pub fn parse_prefix(arg: &str) -> CliResult<(String, String)> {
    match arg.split_once('=') {
        Some((prefix, namespace)) if !namespace.is_empty() => {
            Ok((prefix.trim().to_string(), namespace.trim().to_string()))
        }
        _ => Err(CliError::Usage(format!(
            "invalid prefix '{arg}'\n  {} expected PREFIX=NAMESPACE, e.g. ex=http://example.org/",
            colored::Colorize::bold(colored::Colorize::cyan("help:"))
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [output]
            pretty = false
            indent = 3
            base = "http://file/"
            use_default_namespaces = false

            [namespaces]
            ex = "http://example.org/"
            "#,
        )
        .unwrap();

        let config = file.writer_config(Overrides {
            pretty: true,
            base: Some("http://flag/".to_string()),
            prefixes: vec![("ex".to_string(), "http://override/".to_string())],
        });
        assert!(config.pretty);
        assert_eq!(config.indent, Some(3));
        assert_eq!(config.base.as_deref(), Some("http://flag/"));
        assert!(!config.use_default_namespaces);
        assert_eq!(config.namespaces["ex"], "http://override/");
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let file: FileConfig = toml::from_str("").unwrap();
        let config = file.writer_config(Overrides::default());
        assert_eq!(config, WriterConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<FileConfig>("[output]\ncolour = true\n").is_err());
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(
            parse_prefix("ex=http://example.org/").unwrap(),
            ("ex".to_string(), "http://example.org/".to_string())
        );
        assert!(matches!(parse_prefix("ex"), Err(CliError::Usage(_))));
        assert!(matches!(parse_prefix("ex="), Err(CliError::Usage(_))));
    }
}
