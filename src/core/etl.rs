use crate::core::{ConversionReport, Pipeline};
use crate::utils::error::Result;

pub struct ConvertEngine<P: Pipeline> {
    pipeline: P,
    dry_run: bool,
}

impl<P: Pipeline> ConvertEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            dry_run: false,
        }
    }

    /// A dry run extracts and transforms but never calls `load`.
    pub fn new_dry_run(pipeline: P) -> Self {
        Self {
            pipeline,
            dry_run: true,
        }
    }

    pub fn run(&self) -> Result<ConversionReport> {
        tracing::info!("Starting conversion");

        let extracted = self.pipeline.extract()?;
        let blocks = extracted.blocks;
        let skipped_malformed = extracted.skipped_malformed;
        tracing::info!(
            "Parsed {} entry blocks ({} skipped as malformed)",
            blocks,
            skipped_malformed
        );

        let transformed = self.pipeline.transform(extracted)?;
        tracing::info!("Mapped {} importable entries", transformed.rows.len());

        let output_path = if self.dry_run {
            tracing::info!("Dry run: nothing written");
            None
        } else {
            let path = self.pipeline.load(&transformed)?;
            tracing::info!("Output saved to: {}", path.display());
            Some(path)
        };

        Ok(ConversionReport {
            output_path,
            blocks,
            rows: transformed.rows.len(),
            filtered_out: transformed.filtered_out,
            skipped_malformed,
        })
    }
}
