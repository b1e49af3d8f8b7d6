//! Command execution.
//!
//! Commands:
//! - `get <key>` - Print the value at key (subtrees as TOML)
//! - `set <key> <value>` - Store a TOML literal, or a plain string
//! - `delete <key>` - Remove the entry at key
//! - `keys` - List top-level keys
//! - `count` - Count entries at every depth
//! - `show` - Print the whole file as TOML

use clap::Subcommand;
use zettings::{Codec, Settings, TomlCodec, Value};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value stored at KEY
    Get { key: String },
    /// Store VALUE at KEY, creating intermediate tables
    Set { key: String, value: String },
    /// Remove the entry at KEY
    Delete { key: String },
    /// List top-level keys
    Keys,
    /// Count entries at every depth
    Count,
    /// Print all settings as TOML
    Show,
}

/// Run a command against open settings, returning what to print.
pub fn execute(command: &Command, settings: &Settings) -> Result<Option<String>, zettings::Error> {
    match command {
        Command::Get { key } => match settings.get(key)? {
            Some(value) => render(&value).map(Some),
            None => Err(zettings_core::Error::KeyNotFound { key: key.clone() }.into()),
        },
        Command::Set { key, value } => {
            settings.set(key, zettings_serde::parse_literal(value))?;
            Ok(None)
        }
        Command::Delete { key } => {
            settings.delete(key)?;
            Ok(None)
        }
        Command::Keys => {
            let keys: Vec<String> = settings.keys()?.collect();
            Ok(Some(keys.join("\n")))
        }
        Command::Count => Ok(Some(settings.count()?.to_string())),
        Command::Show => render(&Value::Tree(settings.tree()?)).map(Some),
    }
}

fn render(value: &Value) -> Result<String, zettings::Error> {
    match value {
        Value::Tree(tree) => {
            let bytes = TomlCodec.encode(tree)?;
            Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
        }
        Value::String(s) => Ok(s.clone()),
        other => Ok(other.to_string()),
    }
}
