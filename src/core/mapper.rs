use crate::domain::model::{Entry, EntryKind, OutputRow};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOptions {
    /// Prefix scheme-less website URLs with `https://`.
    pub normalize_urls: bool,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            normalize_urls: true,
        }
    }
}

/// Maps a classified entry to an import row. Non-login entries map to `None`.
pub fn to_row(entry: &Entry, options: RowOptions) -> Option<OutputRow> {
    if !entry.kind.is_login() {
        return None;
    }

    let url = match (entry.kind, entry.url.as_deref()) {
        (EntryKind::Website, Some(raw)) if options.normalize_urls => normalize_url(raw),
        (EntryKind::Website, Some(raw)) => raw.to_string(),
        _ => String::new(),
    };

    Some(OutputRow {
        name: entry.name.clone().unwrap_or_default(),
        url,
        username: entry.login.clone().unwrap_or_default(),
        password: entry.password.clone().unwrap_or_default(),
    })
}

/// The importer rejects URLs without a scheme. Anything already carrying a
/// scheme, or that does not parse with one added, is returned unchanged.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        return trimmed.to_string();
    }

    let candidate = format!("https://{}", trimmed);
    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => candidate,
        _ => trimmed.to_string(),
    }
}
