use crate::config::cli::LocalStorage;
use crate::domain::model::OutputRow;
use crate::domain::ports::Storage;
use crate::utils::error::{ConvertError, Result};
use csv::{Terminator, WriterBuilder};
use std::path::Path;

/// Renders the header and rows as a CSV document with `\n` line endings.
/// The header is always present, even with no rows.
pub fn render_csv(rows: &[OutputRow]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(OutputRow::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ConvertError::CsvError(e.into_error().into()))
}

pub fn write_to<S: Storage>(storage: &S, rows: &[OutputRow], output_path: &Path) -> Result<()> {
    let data = render_csv(rows)?;
    tracing::debug!("Writing {} bytes to {}", data.len(), output_path.display());
    storage.write_file(output_path, &data)
}

pub fn write(rows: &[OutputRow], output_path: &Path) -> Result<()> {
    write_to(&LocalStorage, rows, output_path)
}
