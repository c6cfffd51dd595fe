use crate::core::csv_output;
use crate::core::mapper::{to_row, RowOptions};
use crate::core::parser::{classify, decode_export, parse_blocks};
use crate::core::{ConfigProvider, ExtractResult, Pipeline, Storage, TransformResult};
use crate::domain::model::MalformedPolicy;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Kaspersky text export in, Google Passwords CSV out.
pub struct ExportPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> ExportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for ExportPipeline<S, C> {
    fn extract(&self) -> Result<ExtractResult> {
        let input = self.config.input_path();
        tracing::debug!("Reading export from {}", input.display());

        let bytes = self.storage.read_file(input)?;
        let text = decode_export(input, &bytes)?;

        let mut result = ExtractResult::default();
        for block in parse_blocks(&text) {
            result.blocks += 1;
            match classify(&block) {
                Ok(entry) => {
                    tracing::debug!(
                        block = block.index,
                        line = block.line,
                        kind = ?entry.kind,
                        "Classified entry"
                    );
                    result.entries.push(entry);
                }
                Err(err) => match self.config.malformed_policy() {
                    MalformedPolicy::Abort => return Err(err),
                    MalformedPolicy::Skip => {
                        tracing::warn!("Skipping entry: {}", err);
                        result.skipped_malformed += 1;
                    }
                },
            }
        }

        Ok(result)
    }

    fn transform(&self, extracted: ExtractResult) -> Result<TransformResult> {
        let options = RowOptions {
            normalize_urls: self.config.normalize_urls(),
        };

        let rows: Vec<_> = extracted
            .entries
            .iter()
            .filter_map(|entry| to_row(entry, options))
            .collect();
        let filtered_out = extracted.entries.len() - rows.len();

        if filtered_out > 0 {
            tracing::info!(
                "Dropped {} notes, cards, documents or addresses (not importable)",
                filtered_out
            );
        }

        Ok(TransformResult { rows, filtered_out })
    }

    fn load(&self, result: &TransformResult) -> Result<PathBuf> {
        let output = self.config.output_path();
        csv_output::write_to(&self.storage, &result.rows, output)?;
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertSettings;
    use crate::utils::error::ConvertError;
    use crate::domain::model::EntryKind;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .borrow_mut()
                .insert(PathBuf::from(path), content.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(Path::new(path))
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| ConvertError::InputNotFound {
                    path: path.to_path_buf(),
                })
        }

        fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    const MIXED_EXPORT: &str = "Websites\n\n\
Website name: GitHub\nWebsite URL: github.com\nLogin name: \nLogin: octo\nPassword: gh-pass\nComment: \n\n---\n\n\
Website name: Broken\nWebsite URL: broken.example\nSecret question: ?\n\n---\n\n\
Applications\n\n\
Application: Steam\nLogin name: \nLogin: gamer\nPassword: st3am\nComment: \n\n---\n\n\
Notes\n\nName: Door code\nText: 1234\n\n---\n";

    #[test]
    fn test_abort_policy_stops_on_malformed_block() {
        let storage = MockStorage::with_file("vault.txt", MIXED_EXPORT);
        let pipeline = ExportPipeline::new(storage, ConvertSettings::new("vault.txt"));

        let err = pipeline.extract().unwrap_err();
        assert!(matches!(err, ConvertError::MalformedBlock { block: 2, .. }));
    }

    #[test]
    fn test_skip_policy_counts_malformed_blocks() {
        let storage = MockStorage::with_file("vault.txt", MIXED_EXPORT);
        let settings = ConvertSettings::new("vault.txt").with_malformed_policy(MalformedPolicy::Skip);
        let pipeline = ExportPipeline::new(storage, settings);

        let extracted = pipeline.extract().unwrap();
        assert_eq!(extracted.blocks, 4);
        assert_eq!(extracted.skipped_malformed, 1);

        let kinds: Vec<_> = extracted.entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds[0], EntryKind::Website);
        assert_eq!(kinds[1], EntryKind::Application);

        let transformed = pipeline.transform(extracted).unwrap();
        assert_eq!(transformed.rows.len(), 2);
        assert_eq!(transformed.filtered_out, 1);
        assert_eq!(transformed.rows[0].url, "https://github.com");
        assert_eq!(transformed.rows[1].url, "");
    }

    #[test]
    fn test_load_writes_csv_to_output_path() {
        let storage = MockStorage::with_file("vault.txt", MIXED_EXPORT);
        let settings = ConvertSettings::new("vault.txt")
            .with_malformed_policy(MalformedPolicy::Skip)
            .with_normalize_urls(false);
        let pipeline = ExportPipeline::new(storage, settings);

        let extracted = pipeline.extract().unwrap();
        let transformed = pipeline.transform(extracted).unwrap();
        let output = pipeline.load(&transformed).unwrap();

        assert_eq!(output, PathBuf::from("vault.csv"));
        assert_eq!(
            pipeline.storage.get_file("vault.csv").unwrap(),
            "name,url,username,password\nGitHub,github.com,octo,gh-pass\nSteam,,gamer,st3am\n"
        );
    }

    #[test]
    fn test_missing_input_is_reported() {
        let pipeline = ExportPipeline::new(MockStorage::default(), ConvertSettings::new("nope.txt"));
        assert!(matches!(
            pipeline.extract(),
            Err(ConvertError::InputNotFound { .. })
        ));
    }
}
