//! Options for the `csv` crate source.
//!
//! Values come from code, from a serialized config, or from the environment:
//!
//! | Variable           | Meaning                                  | Default |
//! |--------------------|------------------------------------------|---------|
//! | `CSVTAG_DELIMITER` | field delimiter, one ASCII character     | `,`     |
//! | `CSVTAG_FLEXIBLE`  | allow rows of differing lengths          | `false` |
//! | `CSVTAG_COMMENT`   | lines starting with this byte are skipped| unset   |
//! | `CSVTAG_QUOTING`   | honour double quotes                     | `true`  |
//!
//! The command line tool loads a `.env` file before reading these.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_DELIMITER: &str = "CSVTAG_DELIMITER";
pub const ENV_FLEXIBLE: &str = "CSVTAG_FLEXIBLE";
pub const ENV_COMMENT: &str = "CSVTAG_COMMENT";
pub const ENV_QUOTING: &str = "CSVTAG_QUOTING";

/// Tokenizer settings for a CSV row source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    pub delimiter: u8,
    /// Accept rows whose length differs from the first row.
    pub flexible: bool,
    pub comment: Option<u8>,
    pub quoting: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            flexible: false,
            comment: None,
            quoting: true,
        }
    }
}

impl SourceOptions {
    /// Read options from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read options through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(value) = lookup(ENV_DELIMITER) {
            options.delimiter = parse_byte(ENV_DELIMITER, &value)?;
        }
        if let Some(value) = lookup(ENV_FLEXIBLE) {
            options.flexible = parse_bool(ENV_FLEXIBLE, &value)?;
        }
        if let Some(value) = lookup(ENV_COMMENT) {
            options.comment = if value.is_empty() {
                None
            } else {
                Some(parse_byte(ENV_COMMENT, &value)?)
            };
        }
        if let Some(value) = lookup(ENV_QUOTING) {
            options.quoting = parse_bool(ENV_QUOTING, &value)?;
        }
        Ok(options)
    }

    /// A `csv` builder with these options. The csv crate's own header
    /// handling is always off: the header row belongs to the binder.
    pub fn builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter)
            .flexible(self.flexible)
            .comment(self.comment)
            .quoting(self.quoting);
        builder
    }
}

/// Parse a one-character setting. `\t` and `tab` are accepted for tabs.
pub fn parse_byte(key: &str, value: &str) -> Result<u8, ConfigError> {
    match value {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConfigError::NotSingleByte {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::NotBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
