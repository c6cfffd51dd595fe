use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Cannot read input file {}: {reason}", path.display())]
    ReadError { path: PathBuf, reason: String },

    #[error("Malformed entry block #{block} (line {line}): {reason}")]
    MalformedBlock {
        block: usize,
        line: usize,
        reason: String,
    },

    #[error("Cannot write output file {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Parse,
    Output,
}

impl ConvertError {
    pub fn malformed(block: usize, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedBlock {
            block,
            line,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::InputNotFound { .. } | Self::ReadError { .. } => ErrorCategory::Input,
            Self::MalformedBlock { .. } => ErrorCategory::Parse,
            Self::WriteError { .. } | Self::CsvError(_) => ErrorCategory::Output,
        }
    }

    /// Process exit code. 2 matches clap's usage-error code.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Input => 3,
            ErrorCategory::Parse => 4,
            ErrorCategory::Output => 5,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InputNotFound { path } => {
                format!("The export file '{}' does not exist", path.display())
            }
            Self::MalformedBlock { block, line, reason } => format!(
                "Entry #{} could not be parsed at line {}: {}",
                block, line, reason
            ),
            Self::WriteError { path, .. } => {
                format!("Could not write the CSV file '{}'", path.display())
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "Check the path of the exported .txt file",
            Self::ReadError { .. } => {
                "Re-export the vault as text; UTF-8 and UTF-16 with BOM are supported"
            }
            Self::MalformedBlock { .. } => {
                "The export template may have changed; use --on-malformed skip to drop unreadable entries"
            }
            Self::WriteError { .. } => "Choose a writable location with --output",
            Self::CsvError(_) => "Retry the conversion; the CSV writer failed unexpectedly",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the command-line options or the configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
