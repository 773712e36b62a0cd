use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::info;

use crate::cache::ResponseCache;
use crate::classify::group_records;
use crate::config::Settings;
use crate::index::{CachedSession, HttpTransport, IndexClient, ProjectSource};
use crate::plugins::{PluginEnumerator, PluginRecord};
use crate::report::{render, write_report};
use crate::{progress, Result};

/// A rendered report and the number of plugins in it.
#[derive(Debug, Clone)]
pub struct Report {
    pub content: String,
    pub total: usize,
}

/// Run the whole pipeline against `source`: enumerate, classify, render.
/// Fails on the first fetch error, before anything is written.
pub fn build_report<S: ProjectSource>(
    source: &S,
    settings: &Settings,
    progress: ProgressBar,
) -> Result<Report> {
    let plugins: Vec<PluginRecord> = PluginEnumerator::new(source, &settings.candidate_filter())?
        .with_progress(progress)
        .collect::<Result<_>>()?;

    let total = plugins.len();
    let grouping = group_records(&settings.groups, plugins);
    let content = render(&grouping, total, &settings.render_options());

    Ok(Report { content, total })
}

/// Fetch plugins from PyPI and write the report.
pub fn run(config: Option<PathBuf>, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    let settings = Settings::resolve(config.as_deref())?;
    let output = output.unwrap_or_else(|| settings.output.clone());

    let cache = ResponseCache::new()?;
    cache.ensure_cache_dir()?;
    info!(cache = %cache.cache_dir().display(), "using response cache");

    let client = IndexClient::new(CachedSession::new(cache, HttpTransport::new()?));
    let report = build_report(&client, &settings, progress::fetch_bar(quiet))?;

    write_report(&output, &report.content)?;
    println!("Wrote {} plugins to {}", report.total, output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::GroupRule;
    use crate::plugins::{FakeSource, INACTIVE_CLASSIFIER};

    fn settings() -> Settings {
        Settings {
            groups: vec![GroupRule::new("log", &["log"]), GroupRule::new("other", &[])],
            ..Default::default()
        }
    }

    #[test]
    fn test_build_report() {
        let mut source = FakeSource::default();
        source.add("pytest-zzz", &[]);
        source.add("pytest-logging", &[]);
        source.add("pytest-dead", &[INACTIVE_CLASSIFIER]);
        source.add_listed("pytest-removed");
        source.add("unrelated", &[]);

        let report = build_report(&source, &settings(), ProgressBar::hidden()).unwrap();

        assert_eq!(report.total, 2);
        assert!(report.content.contains("这份列表包含了 2 个 Pytest 插件."));
        assert!(!report.content.contains("pytest-dead"));
        assert!(!report.content.contains("pytest-removed"));
        assert!(!report.content.contains("unrelated"));

        let log = report.content.find("## log").unwrap();
        let other = report.content.find("## other").unwrap();
        let logging = report.content.find("[pytest-logging]").unwrap();
        let zzz = report.content.find("[pytest-zzz]").unwrap();
        assert!(log < logging && logging < other && other < zzz);
    }

    #[test]
    fn test_build_report_fails_on_fetch_error() {
        let mut source = FakeSource::default();
        source.add("pytest-a", &[]);
        source.add("pytest-b", &[]);
        source.failing = Some("pytest-b".to_string());

        assert!(build_report(&source, &settings(), ProgressBar::hidden()).is_err());
    }

    #[test]
    fn test_build_report_includes_additional_projects() {
        let mut source = FakeSource::default();
        source.add("logassert", &[]);

        let report = build_report(&source, &settings(), ProgressBar::hidden()).unwrap();
        assert_eq!(report.total, 1);
        assert!(report.content.contains("## log"));
    }
}
