//! Macro libraries: text-template macros declared in TOML.
//!
//! ```toml
//! [macros.note]
//! template = "<aside class=\"{1}\">{content}</aside>"
//! ```
//!
//! `{content}` is the resolved content of the invocation and `{1}`, `{2}`, ...
//! are its positional arguments. Arguments that were not supplied expand to
//! nothing.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroLibrary {
    #[serde(default)]
    pub macros: BTreeMap<String, MacroTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTemplate {
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MacroLibrary {
    /// Loads a library file. Unlike the config file, a library that was asked
    /// for must exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::LibraryNotFound(path.to_path_buf()));
        }

        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
                config_path: path.to_path_buf(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MacroTemplate)> {
        self.macros.iter().map(|(id, t)| (id.as_str(), t))
    }
}

impl MacroTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            description: None,
        }
    }

    pub fn expand(&self, content: &str, args: &[String]) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\{(content|\d+)\}").expect("Invalid template regex"));

        re.replace_all(&self.template, |caps: &Captures| match &caps[1] {
            "content" => content.to_string(),
            n => n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_default(),
        })
        .into_owned()
    }
}
