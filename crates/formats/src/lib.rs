// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Configuration-file format collaborators. Each parser turns a file's
//! raw text into the same canonical `serde_json::Value` representation,
//! so a watcher callback can treat every watched format identically once
//! parsing succeeds.

use std::path::Path;
use thiserror::Error;

/// The config-file formats Argus recognizes by extension. `Ini` and
/// `Properties` are recognized but not parseable — no parser crate for
/// either exists in this dependency stack, so both route to
/// [`FormatError::Unsupported`] rather than a hand-rolled parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
    Hcl,
    Ini,
    Properties,
}

impl Format {
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            "hcl" | "tf" => Some(Format::Hcl),
            "ini" | "cfg" => Some(Format::Ini),
            "properties" => Some(Format::Properties),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Toml => "toml",
            Format::Yaml => "yaml",
            Format::Hcl => "hcl",
            Format::Ini => "ini",
            Format::Properties => "properties",
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("HCL parse error: {0}")]
    Hcl(#[from] hcl::Error),
    #[error("{format} is recognized but has no parser in this build")]
    Unsupported { format: Format },
    #[error("could not determine a config format from the file extension")]
    UnknownExtension,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parser for one config-file format, turning raw text into the
/// canonical JSON value representation external collaborators consume.
pub trait ConfigParser {
    fn format(&self) -> Format;
    fn parse(&self, content: &str) -> Result<serde_json::Value, FormatError>;
}

pub struct JsonParser;
impl ConfigParser for JsonParser {
    fn format(&self) -> Format {
        Format::Json
    }
    fn parse(&self, content: &str) -> Result<serde_json::Value, FormatError> {
        Ok(serde_json::from_str(content)?)
    }
}

pub struct TomlParser;
impl ConfigParser for TomlParser {
    fn format(&self) -> Format {
        Format::Toml
    }
    fn parse(&self, content: &str) -> Result<serde_json::Value, FormatError> {
        let value: toml::Value = toml::from_str(content)?;
        Ok(serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
    }
}

pub struct YamlParser;
impl ConfigParser for YamlParser {
    fn format(&self) -> Format {
        Format::Yaml
    }
    fn parse(&self, content: &str) -> Result<serde_json::Value, FormatError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        Ok(serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
    }
}

pub struct HclParser;
impl ConfigParser for HclParser {
    fn format(&self) -> Format {
        Format::Hcl
    }
    fn parse(&self, content: &str) -> Result<serde_json::Value, FormatError> {
        let value: hcl::Value = hcl::from_str(content)?;
        Ok(serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
    }
}

/// Looks up the parser for `format`, or `None` for the two recognized
/// but unsupported formats.
pub fn parser_for(format: Format) -> Option<Box<dyn ConfigParser>> {
    match format {
        Format::Json => Some(Box::new(JsonParser)),
        Format::Toml => Some(Box::new(TomlParser)),
        Format::Yaml => Some(Box::new(YamlParser)),
        Format::Hcl => Some(Box::new(HclParser)),
        Format::Ini | Format::Properties => None,
    }
}

/// Parses `content` after detecting its format from `path`'s extension.
pub fn parse_file(path: &Path, content: &str) -> Result<serde_json::Value, FormatError> {
    let format = Format::from_extension(path).ok_or(FormatError::UnknownExtension)?;
    match parser_for(format) {
        Some(parser) => parser.parse(content),
        None => Err(FormatError::Unsupported { format }),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
