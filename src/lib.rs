pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, ConvertSettings};
pub use crate::core::{etl::ConvertEngine, pipeline::ExportPipeline};
pub use domain::model::{ConversionReport, Entry, EntryKind, MalformedPolicy, OutputRow};
pub use utils::error::{ConvertError, Result};
