pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::MalformedPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "kpm-export-csv")]
#[command(version, about = "Convert a Kaspersky Password Manager text export into a Google Passwords CSV")]
pub struct CliConfig {
    /// Exported .txt file
    pub input: PathBuf,

    /// Output CSV path [default: input path with a .csv extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// What to do with an entry block that cannot be parsed
    #[arg(long, value_enum)]
    pub on_malformed: Option<MalformedPolicy>,

    /// Write website URLs exactly as exported
    #[arg(long)]
    pub keep_raw_urls: bool,

    /// Parse and report without writing the CSV file
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Defaults, then the optional config file, then command-line flags.
    pub fn resolve(&self) -> Result<ConvertSettings> {
        let mut settings = ConvertSettings::new(&self.input);

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration from {}", path.display());
            settings.apply_file_config(&TomlConfig::from_file(path)?);
        }
        if let Some(output) = &self.output {
            settings.output_path = output.clone();
        }
        if let Some(policy) = self.on_malformed {
            settings.malformed_policy = policy;
        }
        if self.keep_raw_urls {
            settings.normalize_urls = false;
        }

        Ok(settings)
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSettings {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub malformed_policy: MalformedPolicy,
    pub normalize_urls: bool,
}

impl ConvertSettings {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        Self {
            output_path: derive_output_path(&input_path),
            input_path,
            malformed_policy: MalformedPolicy::default(),
            normalize_urls: true,
        }
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    pub fn with_normalize_urls(mut self, normalize_urls: bool) -> Self {
        self.normalize_urls = normalize_urls;
        self
    }

    pub fn apply_file_config(&mut self, config: &TomlConfig) {
        if let Some(policy) = config.malformed_policy() {
            self.malformed_policy = policy;
        }
        if let Some(normalize) = config.normalize_urls() {
            self.normalize_urls = normalize;
        }
        if let Some(dir) = config.output_directory() {
            if let Some(file_name) = self.output_path.file_name() {
                self.output_path = dir.join(file_name);
            }
        }
    }
}

/// `export.txt` becomes `export.csv` in the same directory.
pub fn derive_output_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

impl ConfigProvider for ConvertSettings {
    fn input_path(&self) -> &Path {
        &self.input_path
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn malformed_policy(&self) -> MalformedPolicy {
        self.malformed_policy
    }

    fn normalize_urls(&self) -> bool {
        self.normalize_urls
    }
}

impl Validate for ConvertSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_path("output", &self.output_path)?;
        validation::validate_file_extension("output", &self.output_path, &["csv"])?;
        validation::validate_distinct_paths(&self.input_path, &self.output_path)
    }
}
