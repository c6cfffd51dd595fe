//! Kaspersky Password Manager text export parsing.
//!
//! The export is a list of `---`-separated blocks. A known section name at
//! the top of a block (`Websites`, `Applications`, ...) is a header that
//! applies to every following block until the next header. Login
//! blocks are made of `Label: value` lines in a fixed template order.

use crate::domain::model::{Entry, EntryKind, OtherKind, RawEntryBlock};
use crate::utils::error::{ConvertError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::iter::Enumerate;
use std::path::Path;
use std::str::Lines;
use std::sync::LazyLock;

pub const BLOCK_DELIMITER: &str = "---";

const WEBSITE_NAME: &str = "Website name";
const WEBSITE_URL: &str = "Website URL";
const APPLICATION: &str = "Application";
const LOGIN_NAME: &str = "Login name";
const LOGIN: &str = "Login";
const PASSWORD: &str = "Password";
const COMMENT: &str = "Comment";

static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<label>[^:]+):(?: (?P<value>.*))?$").expect("field line pattern is valid")
});

/// Field vocabulary of a login block. Any other label is a template change.
struct Template {
    kind: EntryKind,
    title: &'static str,
    labels: &'static [&'static str],
}

const WEBSITE_TEMPLATE: Template = Template {
    kind: EntryKind::Website,
    title: WEBSITE_NAME,
    labels: &[WEBSITE_NAME, WEBSITE_URL, LOGIN_NAME, LOGIN, PASSWORD, COMMENT],
};

const APPLICATION_TEMPLATE: Template = Template {
    kind: EntryKind::Application,
    title: APPLICATION,
    labels: &[APPLICATION, LOGIN_NAME, LOGIN, PASSWORD, COMMENT],
};

/// Decodes raw export bytes. UTF-8 (with or without BOM) and BOM-marked
/// UTF-16 are accepted.
pub fn decode_export(path: &Path, bytes: &[u8]) -> Result<String> {
    let read_error = |reason: String| ConvertError::ReadError {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return decode_utf16(rest, u16::from_le_bytes).map_err(read_error);
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        return decode_utf16(rest, u16::from_be_bytes).map_err(read_error);
    }

    let rest = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(rest)
        .map(str::to_owned)
        .map_err(|e| read_error(format!("invalid UTF-8 at byte {}", e.valid_up_to())))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> std::result::Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("truncated UTF-16 data".to_string());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| "invalid UTF-16 data".to_string())
}

/// Lazily splits export text into entry blocks, in input order.
pub fn parse_blocks(text: &str) -> Blocks<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Blocks {
        lines: text.lines().enumerate(),
        section: None,
        yielded: 0,
    }
}

pub struct Blocks<'a> {
    lines: Enumerate<Lines<'a>>,
    section: Option<&'a str>,
    yielded: usize,
}

impl<'a> Blocks<'a> {
    /// Lines up to the next delimiter, paired with 1-based line numbers.
    /// `None` once the input is exhausted.
    fn next_chunk(&mut self) -> Option<Vec<(usize, &'a str)>> {
        let mut chunk = Vec::new();
        let mut saw_line = false;

        for (idx, line) in self.lines.by_ref() {
            saw_line = true;
            if line.trim() == BLOCK_DELIMITER {
                return Some(chunk);
            }
            chunk.push((idx + 1, line));
        }

        saw_line.then_some(chunk)
    }

    fn open_block(&mut self, chunk: &[(usize, &'a str)]) -> Option<RawEntryBlock<'a>> {
        let mut content = trim_blank_edges(chunk);

        // Anything else stays in the block and fails there, not in later blocks.
        if let Some(&(_, first)) = content.first() {
            if kind_for_section(first).is_some() {
                self.section = Some(first.trim());
                content = trim_blank_edges(&content[1..]);
            }
        }

        let &(line, _) = content.first()?;
        self.yielded += 1;

        Some(RawEntryBlock {
            index: self.yielded,
            line,
            section: self.section,
            lines: content.iter().map(|&(_, text)| text).collect(),
        })
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = RawEntryBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let chunk = self.next_chunk()?;
            if let Some(block) = self.open_block(&chunk) {
                return Some(block);
            }
        }
    }
}

fn trim_blank_edges<'c, 'a>(lines: &'c [(usize, &'a str)]) -> &'c [(usize, &'a str)] {
    let start = lines
        .iter()
        .position(|(_, l)| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|(_, l)| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    &lines[start..end]
}

/// Section headers are part of the export template and match exactly.
fn kind_for_section(header: &str) -> Option<EntryKind> {
    let kind = match header.trim() {
        "Websites" => EntryKind::Website,
        "Applications" => EntryKind::Application,
        "Notes" => EntryKind::Other(OtherKind::Note),
        "Bank cards" | "Credit cards" => EntryKind::Other(OtherKind::BankCard),
        "Documents" => EntryKind::Other(OtherKind::Document),
        "Addresses" => EntryKind::Other(OtherKind::Address),
        _ => return None,
    };
    Some(kind)
}

/// Classifies a block by its section and, for login kinds, extracts fields.
///
/// Values are kept verbatim apart from the single space after the colon;
/// only the name and URL are trimmed.
pub fn classify(block: &RawEntryBlock<'_>) -> Result<Entry> {
    let section = block
        .section
        .ok_or_else(|| ConvertError::malformed(block.index, block.line, "no section header precedes this entry"))?;

    let kind = kind_for_section(section).ok_or_else(|| {
        ConvertError::malformed(
            block.index,
            block.line,
            format!("unrecognized section header '{}'", section),
        )
    })?;

    match kind {
        EntryKind::Website => parse_login_block(block, &WEBSITE_TEMPLATE),
        EntryKind::Application => parse_login_block(block, &APPLICATION_TEMPLATE),
        EntryKind::Other(other) => Ok(Entry::other(other)),
    }
}

fn parse_login_block(block: &RawEntryBlock<'_>, template: &Template) -> Result<Entry> {
    let mut fields: HashMap<&'static str, String> = HashMap::new();
    let mut comment: Option<String> = None;

    for (offset, line) in block.lines.iter().enumerate() {
        let line_no = block.line + offset;

        // Comment is the last field of the template and may span lines.
        if let Some(comment) = comment.as_mut() {
            comment.push('\n');
            comment.push_str(line);
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        // Never echo the line itself: it may hold a password.
        let caps = FIELD_LINE.captures(line).ok_or_else(|| {
            ConvertError::malformed(block.index, line_no, "line is not a 'Label: value' field")
        })?;
        let label = caps.name("label").map_or("", |m| m.as_str());
        let value = caps.name("value").map_or("", |m| m.as_str()).to_string();

        let Some(&known) = template.labels.iter().find(|&&l| l == label) else {
            return Err(ConvertError::malformed(
                block.index,
                line_no,
                format!("unknown label '{}'", label),
            ));
        };

        if known == COMMENT {
            comment = Some(value);
        } else if fields.insert(known, value).is_some() {
            return Err(ConvertError::malformed(
                block.index,
                line_no,
                format!("duplicate label '{}'", known),
            ));
        }
    }

    let required = |fields: &mut HashMap<&'static str, String>, label: &str| {
        take_trimmed(fields, label).ok_or_else(|| {
            ConvertError::malformed(block.index, block.line, format!("missing or empty '{}'", label))
        })
    };

    let name = required(&mut fields, template.title)?;
    let url = match template.kind {
        EntryKind::Website => Some(required(&mut fields, WEBSITE_URL)?),
        _ => None,
    };
    let login = take_non_empty(&mut fields, LOGIN).or_else(|| take_non_empty(&mut fields, LOGIN_NAME));
    let password = take_non_empty(&mut fields, PASSWORD);

    Ok(Entry {
        kind: template.kind,
        name: Some(name),
        url,
        login,
        password,
        comment,
    })
}

fn take_non_empty(fields: &mut HashMap<&'static str, String>, label: &str) -> Option<String> {
    fields.remove(label).filter(|v| !v.is_empty())
}

fn take_trimmed(fields: &mut HashMap<&'static str, String>, label: &str) -> Option<String> {
    fields
        .remove(label)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
