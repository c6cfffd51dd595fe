use crate::domain::model::MalformedPolicy;
use crate::utils::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional settings file. Every key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    pub on_malformed: Option<MalformedPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub normalize_urls: Option<bool>,
    /// Directory for the derived output file, instead of next to the input.
    pub directory: Option<PathBuf>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::ConfigError {
            message: format!("cannot read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConvertError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn malformed_policy(&self) -> Option<MalformedPolicy> {
        self.parser.on_malformed
    }

    pub fn normalize_urls(&self) -> Option<bool> {
        self.output.normalize_urls
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.output.directory.as_deref()
    }
}
