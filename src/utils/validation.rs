use crate::utils::error::{ConvertError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let raw = path.to_string_lossy();

    if raw.is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if raw.contains('\0') {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, path: &Path, allowed_extensions: &[&str]) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(extension)
            if allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(extension)) =>
        {
            Ok(())
        }
        Some(extension) => Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// Rejects an output path that would overwrite the input. A missing input
/// passes, so that reading it reports `InputNotFound`.
pub fn validate_distinct_paths(input: &Path, output: &Path) -> Result<()> {
    let Ok(input) = input.canonicalize() else {
        return Ok(());
    };
    let same = output
        .canonicalize()
        .map_or(false, |output| output == input);

    if same {
        return Err(ConvertError::InvalidConfigValueError {
            field: "output".to_string(),
            value: output.display().to_string(),
            reason: "Output path must differ from the input path".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", Path::new("export.txt")).is_ok());
        assert!(validate_path("input", Path::new("")).is_err());
        assert!(validate_path("input", Path::new("bad\0name.txt")).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("output", Path::new("out.csv"), &["csv"]).is_ok());
        assert!(validate_file_extension("output", Path::new("OUT.CSV"), &["csv"]).is_ok());
        assert!(validate_file_extension("output", Path::new("out.txt"), &["csv"]).is_err());
        assert!(validate_file_extension("output", Path::new("out"), &["csv"]).is_err());
    }

    #[test]
    fn test_validate_distinct_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("a.csv");
        std::fs::write(&input, "").unwrap();

        assert!(validate_distinct_paths(&input, &dir.path().join("b.csv")).is_ok());
        assert!(validate_distinct_paths(&input, &input).is_err());
        assert!(validate_distinct_paths(&input, &dir.path().join(".").join("a.csv")).is_err());
    }

    #[test]
    fn test_missing_input_is_left_to_the_reader() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(validate_distinct_paths(&missing, &missing).is_ok());
    }
}
