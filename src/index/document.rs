use serde::Deserialize;
use std::collections::HashMap;

/// One project in the PEP 691 simple index listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    #[serde(rename = "_last-serial")]
    pub last_serial: u64,
}

/// The JSON form of `https://pypi.org/simple`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleIndex {
    pub projects: Vec<IndexEntry>,
}

/// The `info` block of the PyPI JSON API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub summary: Option<String>,
    pub home_page: Option<String>,
    pub project_url: Option<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
}

/// A single uploaded distribution file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseFile {
    pub upload_time_iso_8601: Option<String>,
}

/// Metadata document from `https://pypi.org/pypi/<name>/json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDocument {
    pub info: ProjectInfo,
    #[serde(default)]
    pub releases: HashMap<String, Vec<ReleaseFile>>,
}
