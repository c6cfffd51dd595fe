use crate::domain::model::{ExtractResult, MalformedPolicy, TransformResult};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &Path;
    fn output_path(&self) -> &Path;
    fn malformed_policy(&self) -> MalformedPolicy;
    fn normalize_urls(&self) -> bool;
}

pub trait Pipeline {
    fn extract(&self) -> Result<ExtractResult>;
    fn transform(&self, extracted: ExtractResult) -> Result<TransformResult>;
    fn load(&self, result: &TransformResult) -> Result<PathBuf>;
}
