use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One `---`-delimited unit of the export, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntryBlock<'a> {
    /// 1-based ordinal among yielded blocks.
    pub index: usize,
    /// 1-based line number of the first content line.
    pub line: usize,
    /// Section header in effect for this block, e.g. `Websites`.
    pub section: Option<&'a str>,
    pub lines: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    Note,
    BankCard,
    Document,
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Website,
    Application,
    Other(OtherKind),
}

impl EntryKind {
    pub fn is_login(self) -> bool {
        matches!(self, Self::Website | Self::Application)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub name: Option<String>,
    pub url: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub comment: Option<String>,
}

impl Entry {
    pub fn other(kind: OtherKind) -> Self {
        Self {
            kind: EntryKind::Other(kind),
            name: None,
            url: None,
            login: None,
            password: None,
            comment: None,
        }
    }
}

/// A row of the Google Passwords import CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub name: String,
    pub url: String,
    pub username: String,
    pub password: String,
}

impl OutputRow {
    /// The importer checks these names and their order strictly.
    pub const HEADER: [&'static str; 4] = ["name", "url", "username", "password"];
}

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub entries: Vec<Entry>,
    pub blocks: usize,
    pub skipped_malformed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub rows: Vec<OutputRow>,
    pub filtered_out: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// `None` on a dry run.
    pub output_path: Option<PathBuf>,
    pub blocks: usize,
    pub rows: usize,
    pub filtered_out: usize,
    pub skipped_malformed: usize,
}

/// What to do with a block that cannot be classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop the run at the first malformed block; nothing is written.
    #[default]
    Abort,
    /// Log a warning, drop the block and keep going.
    Skip,
}
