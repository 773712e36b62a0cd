use chrono::NaiveDate;
use std::collections::HashMap;

use crate::index::{ProjectDocument, ReleaseFile};
use crate::version::VersionKey;

/// Display format for release dates, e.g. `Jan 02, 2024`.
const RELEASE_DATE_FORMAT: &str = "%b %d, %Y";

/// A plugin as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    pub name: String,
    /// Link target for the name, if the project declares one.
    pub home_page: Option<String>,
    pub summary: String,
    /// Formatted date of the newest release, or empty.
    pub last_release: String,
}

impl PluginRecord {
    /// Build a record from a project's metadata document.
    pub fn from_document(doc: &ProjectDocument) -> Self {
        let info = &doc.info;
        let home_page = [info.home_page.as_deref(), info.project_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .map(str::to_string);

        Self {
            name: info.name.clone(),
            home_page,
            summary: info.summary.as_deref().map(collapse_summary).unwrap_or_default(),
            last_release: last_release(&doc.releases),
        }
    }

    /// The name as Markdown, linked when `link` is set and a URL is known.
    pub fn display_name(&self, link: bool) -> String {
        match &self.home_page {
            Some(url) if link => format!("[{}]({})", self.name, url),
            _ => self.name.clone(),
        }
    }
}

/// Trim a summary and fold it onto a single line.
pub fn collapse_summary(summary: &str) -> String {
    summary.trim().replace("\r\n", "\n").replace(['\n', '\r'], ",")
}

/// Date of the newest release that has at least one uploaded file.
///
/// Releases are ordered by version, highest first; keys that are not valid
/// versions sort last but are still considered.
pub fn last_release(releases: &HashMap<String, Vec<ReleaseFile>>) -> String {
    let mut versions: Vec<(VersionKey, &str, &Vec<ReleaseFile>)> = releases
        .iter()
        .map(|(version, files)| (VersionKey::new(version), version.as_str(), files))
        .collect();
    // Ties between unparseable keys fall back to the raw string for a stable result.
    versions.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(a.1)));

    versions
        .into_iter()
        .find_map(|(_, _, files)| files.last())
        .and_then(|file| file.upload_time_iso_8601.as_deref())
        .and_then(format_upload_date)
        .unwrap_or_default()
}

fn format_upload_date(timestamp: &str) -> Option<String> {
    let date = timestamp.split('T').next()?;
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.format(RELEASE_DATE_FORMAT).to_string())
}
