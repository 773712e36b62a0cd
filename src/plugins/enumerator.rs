use indicatif::ProgressBar;
use rustc_hash::FxHashSet;
use tracing::{debug, info, instrument};

use super::record::PluginRecord;
use crate::index::{IndexEntry, ProjectSource};
use crate::Result;

/// Development status classifier that marks a project as abandoned.
pub const INACTIVE_CLASSIFIER: &str = "Development Status :: 7 - Inactive";

/// Decides which index entries are plugin candidates.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    prefix: String,
    additional: FxHashSet<String>,
}

impl CandidateFilter {
    pub fn new(prefix: impl Into<String>, additional: impl IntoIterator<Item = String>) -> Self {
        Self {
            prefix: prefix.into(),
            additional: additional.into_iter().collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) || self.additional.contains(name)
    }
}

/// Lazily turns index candidates into plugin records.
///
/// Each call to `next` fetches one project. Removed and inactive projects are
/// skipped; the first fetch error is yielded and ends the run for the caller.
pub struct PluginEnumerator<'a, S> {
    source: &'a S,
    candidates: std::vec::IntoIter<IndexEntry>,
    progress: ProgressBar,
}

impl<'a, S: ProjectSource> PluginEnumerator<'a, S> {
    /// Fetch the index listing and keep the entries accepted by `filter`.
    #[instrument(skip_all)]
    pub fn new(source: &'a S, filter: &CandidateFilter) -> Result<Self> {
        let candidates: Vec<IndexEntry> = source
            .list_projects()?
            .into_iter()
            .filter(|entry| filter.matches(&entry.name))
            .collect();
        info!(candidates = candidates.len(), "selected plugin candidates");

        Ok(Self {
            source,
            candidates: candidates.into_iter(),
            progress: ProgressBar::hidden(),
        })
    }

    /// Report each fetched candidate on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        progress.set_length(self.candidates.len() as u64);
        self.progress = progress;
        self
    }

    fn fetch(&self, entry: &IndexEntry) -> Result<Option<PluginRecord>> {
        let Some(doc) = self.source.fetch_project(&entry.name, entry.last_serial)? else {
            debug!(name = %entry.name, "project removed from index, skipping");
            return Ok(None);
        };

        if doc.info.classifiers.iter().any(|c| c == INACTIVE_CLASSIFIER) {
            debug!(name = %entry.name, "project is inactive, skipping");
            return Ok(None);
        }

        Ok(Some(PluginRecord::from_document(&doc)))
    }
}

impl<S: ProjectSource> Iterator for PluginEnumerator<'_, S> {
    type Item = Result<PluginRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.candidates.next() {
            self.progress.set_message(entry.name.clone());
            let fetched = self.fetch(&entry);
            self.progress.inc(1);

            match fetched {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => {
                    // Nothing after a fatal error is worth fetching.
                    self.candidates = Vec::new().into_iter();
                    self.progress.abandon();
                    return Some(Err(e));
                }
            }
        }

        self.progress.finish_and_clear();
        None
    }
}
