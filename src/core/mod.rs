pub mod csv_output;
pub mod etl;
pub mod mapper;
pub mod parser;
pub mod pipeline;

pub use crate::domain::model::{
    ConversionReport, Entry, EntryKind, ExtractResult, OutputRow, RawEntryBlock, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
