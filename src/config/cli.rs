use crate::core::Storage;
use crate::utils::error::{ConvertError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Filesystem storage. Each call opens and closes its own handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConvertError::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => ConvertError::ReadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let write_error = |source: std::io::Error| ConvertError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        fs::write(path, data).map_err(write_error)
    }
}
