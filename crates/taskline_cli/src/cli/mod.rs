use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use taskline_core::config::{ConfigOverrides, canonical_key};
use taskline_core::error::AppError;
use taskline_core::parser::tokenize;

#[derive(Parser, Debug)]
#[command(name = "taskline", author, version, about, long_about = None)]
pub struct Cli {
    /// Task file to use instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,

    /// Run a single command and exit, e.g. taskline add "Buy milk".
    /// Without a command an interactive session starts.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    StoreDir,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = canonical_key(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    match (canonical_field.as_str(), remainder) {
        ("theme", None) => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::Theme,
            value,
        }),
        ("store_dir", None) => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::StoreDir,
            value,
        }),
        ("theme" | "store_dir", Some(_)) => {
            Err(format!("{canonical_field} override cannot have subfields"))
        }
        ("aliases" | "alias", remainder) => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_lowercase()),
                value,
            })
        }
        (other, _) => Err(format!("unknown config field '{other}'")),
    }
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::StoreDir => {
                overrides.store_dir = Some(PathBuf::from(parsed.value));
            }
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }
    Ok(overrides)
}

/// Applies a configured alias to the first word of an already split
/// command line.
pub fn expand_alias_tokens(
    tokens: &[String],
    aliases: &HashMap<String, String>,
) -> Result<Vec<String>, AppError> {
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(Vec::new());
    };

    match aliases.get(&head.to_lowercase()) {
        Some(expansion) => {
            let mut expanded = tokenize(expansion)?;
            expanded.extend(rest.iter().cloned());
            Ok(expanded)
        }
        None => Ok(tokens.to_vec()),
    }
}
