use anyhow::Result;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn kpm_export_csv() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kpm-export-csv"))
}

#[test]
fn test_converts_and_exits_zero() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("vault.txt");
    fs::write(
        &input,
        "Websites\n\nWebsite name: Example\nWebsite URL: example.com\nLogin: a\nPassword: b\nComment:\n\n---\n",
    )?;

    let output = kpm_export_csv().arg(&input).output()?;

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("vault.csv"))?,
        "name,url,username,password\nExample,https://example.com,a,b\n"
    );
    Ok(())
}

#[test]
fn test_empty_input_exits_zero_with_header() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("empty.txt");
    fs::write(&input, "")?;
    let csv_path = temp_dir.path().join("google.csv");

    let output = kpm_export_csv().arg(&input).arg("--output").arg(&csv_path).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(csv_path)?, "name,url,username,password\n");
    Ok(())
}

#[test]
fn test_missing_input_exits_non_zero_without_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("missing.txt");

    let output = kpm_export_csv().arg(&input).output()?;

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
    assert!(!temp_dir.path().join("missing.csv").exists());
    Ok(())
}

#[test]
fn test_missing_csv_named_input_is_input_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("missing.csv");

    let output = kpm_export_csv().arg(&input).output()?;

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
    assert!(!input.exists());
    Ok(())
}

#[test]
fn test_malformed_block_reports_block_and_line() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("vault.txt");
    fs::write(&input, "Website name: orphan\nWebsite URL: x.com\n")?;

    let output = kpm_export_csv().arg(&input).output()?;

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Entry #1"));
    assert!(stderr.contains("line 1"));
    assert!(!temp_dir.path().join("vault.csv").exists());
    Ok(())
}

#[test]
fn test_config_file_and_dry_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("vault.txt");
    fs::write(
        &input,
        "Identities\n\nName: me\n\n---\n\nWebsites\n\nWebsite name: a\nWebsite URL: a.com\n\n---\n",
    )?;
    let config = temp_dir.path().join("convert.toml");
    fs::write(&config, "[parser]\non_malformed = \"skip\"\n")?;

    let output = kpm_export_csv()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 entries would be written"));
    assert!(stdout.contains("1 malformed entries were skipped"));
    assert!(!temp_dir.path().join("vault.csv").exists());
    Ok(())
}

#[test]
fn test_refuses_to_overwrite_input() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("vault.csv");
    fs::write(&input, "")?;

    let output = kpm_export_csv().arg(&input).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(fs::read_to_string(&input)?, "");
    Ok(())
}
