use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cache::APP_NAME;
use crate::classify::GroupRule;
use crate::plugins::CandidateFilter;
use crate::report::{Language, RenderOptions};
use crate::{Error, Result};

/// Settings file name, both in the project directory and the XDG config home.
pub const SETTINGS_FILENAME: &str = "plugin-list.toml";

const SETTINGS_HEADER: &str = "# pytest-plugin-list settings\n\
# Groups are matched in order; the first group with a keyword contained in\n\
# the package name wins. Unmatched packages go to \"other\".\n\n";

/// Which optional columns the report shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    /// Link names to the project home page.
    pub links: bool,
    pub last_release: bool,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            links: true,
            last_release: true,
        }
    }
}

/// The parsed plugin-list.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Report destination.
    pub output: PathBuf,
    pub title: String,
    pub language: Language,
    /// Package names starting with this are plugin candidates.
    pub prefix: String,
    /// Packages to include even though they lack the prefix.
    pub additional_projects: Vec<String>,
    pub columns: Columns,
    pub groups: Vec<GroupRule>,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            output: PathBuf::from("README.md"),
            title: render.title,
            language: render.language,
            prefix: "pytest-".to_string(),
            additional_projects: vec![
                "logassert".to_string(),
                "nuts".to_string(),
                "flask_fixture".to_string(),
            ],
            columns: Columns::default(),
            groups: default_groups(),
            path: None,
        }
    }
}

/// The built-in keyword groups, in match order.
pub fn default_groups() -> Vec<GroupRule> {
    vec![
        GroupRule::new("log", &["log"]),
        GroupRule::new(
            "report",
            &["report", "allure", "html", "json", "markdown", "rich", "email"],
        ),
        GroupRule::new("run", &["run", "time", "retry", "random", "reverse", "sort"]),
        GroupRule::new("async", &["async"]),
        GroupRule::new("api", &["api"]),
        GroupRule::new("auto", &["auto", "selenium", "playwright", "requests"]),
        GroupRule::new("bdd", &["bdd"]),
        GroupRule::new("check", &["check", "assert", "expect"]),
        GroupRule::new("config", &["config", "env", "ini"]),
        GroupRule::new("cov", &["cov"]),
        GroupRule::new("mock", &["mock"]),
        GroupRule::new("db", &["mongodb", "mysql"]),
        GroupRule::new(
            "framework",
            &["fastapi", "django", "flask", "nginx", "nose", "redis", "docker"],
        ),
    ]
}

impl Settings {
    /// Get the global settings path (~/.config/pytest-plugin-list/plugin-list.toml).
    pub fn global_path() -> Option<PathBuf> {
        let dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        dirs.get_config_home().map(|p| p.join(SETTINGS_FILENAME))
    }

    /// Get the project settings path (./plugin-list.toml).
    pub fn project_path() -> PathBuf {
        PathBuf::from(SETTINGS_FILENAME)
    }

    /// Find the settings file to edit (project first, then global).
    pub fn find_path() -> Option<PathBuf> {
        let project_path = Self::project_path();
        if project_path.exists() {
            return Some(project_path);
        }

        Self::global_path().filter(|p| p.exists())
    }

    /// Load `explicit` if given, otherwise the project or global file,
    /// otherwise the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::find_path() {
            Some(path) => Self::load(&path),
            None => {
                debug!("no settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse settings from TOML content. Missing keys take their defaults.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::SettingsParse(e.to_string()))
    }

    /// Load settings from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut settings = Self::parse(&content)?;
        settings.path = Some(path.to_path_buf());
        debug!(path = %path.display(), groups = settings.groups.len(), "loaded settings");
        Ok(settings)
    }

    /// The default settings as a commented TOML document.
    pub fn default_toml() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())
            .map_err(|e| Error::SettingsParse(e.to_string()))?;
        Ok(format!("{}{}", SETTINGS_HEADER, body))
    }

    pub fn candidate_filter(&self) -> CandidateFilter {
        CandidateFilter::new(self.prefix.clone(), self.additional_projects.iter().cloned())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title: self.title.clone(),
            language: self.language,
            link_names: self.columns.links,
            last_release: self.columns.last_release,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.groups.len(), 13);
    }

    #[test]
    fn test_parse_partial() {
        let content = r#"
output = "docs/plugins.md"
language = "en"

[columns]
links = false
"#;
        let settings = Settings::parse(content).unwrap();
        assert_eq!(settings.output, PathBuf::from("docs/plugins.md"));
        assert_eq!(settings.language, Language::En);
        assert!(!settings.columns.links);
        assert!(settings.columns.last_release);
        assert_eq!(settings.prefix, "pytest-");
    }

    #[test]
    fn test_groups_keep_file_order() {
        let content = r#"
[[groups]]
label = "run"
keywords = ["run"]

[[groups]]
label = "log"
keywords = ["log", "logging"]

[[groups]]
label = "empty"
"#;
        let settings = Settings::parse(content).unwrap();
        let labels: Vec<&str> = settings.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["run", "log", "empty"]);
        assert_eq!(settings.groups[1].keywords, vec!["log", "logging"]);
        assert!(settings.groups[2].keywords.is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        let result = Settings::parse("groups = 3");
        assert!(matches!(result, Err(Error::SettingsParse(_))));
    }

    #[test]
    fn test_default_toml_round_trips() {
        let content = Settings::default_toml().unwrap();
        assert!(content.starts_with("# pytest-plugin-list settings"));
        assert_eq!(Settings::parse(&content).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_records_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILENAME);
        std::fs::write(&path, "title = \"Mine\"\n").unwrap();

        let settings = Settings::resolve(Some(&path)).unwrap();
        assert_eq!(settings.title, "Mine");
        assert_eq!(settings.path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Settings::load(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_derived_options() {
        let mut settings = Settings::default();
        settings.columns.last_release = false;
        settings.prefix = "pytest_".to_string();

        let options = settings.render_options();
        assert!(!options.last_release);
        assert!(options.link_names);

        let filter = settings.candidate_filter();
        assert!(filter.matches("pytest_foo"));
        assert!(filter.matches("nuts"));
        assert!(!filter.matches("pytest-foo"));
    }
}
