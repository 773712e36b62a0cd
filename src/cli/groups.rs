use std::path::PathBuf;
use toml_edit::{Array, ArrayOfTables, DocumentMut, Item, Table};

use crate::classify::{GroupRule, FALLBACK_GROUP};
use crate::config::{default_groups, Settings};
use crate::{Error, Result};

/// Print the groups in match order.
pub fn list(config: Option<PathBuf>) -> Result<()> {
    let settings = Settings::resolve(config.as_deref())?;

    match &settings.path {
        Some(path) => println!("Groups from {}:", path.display()),
        None => println!("Built-in groups:"),
    }
    for (i, group) in settings.groups.iter().enumerate() {
        println!("  {:>2}. {}: {}", i + 1, group.label, group.keywords.join(", "));
    }
    println!("      {}: (anything unmatched)", FALLBACK_GROUP);

    Ok(())
}

/// Add a group to the settings file.
pub fn add(label: String, keywords: Vec<String>, before: Option<String>) -> Result<()> {
    let path = Settings::find_path().ok_or(Error::NoSettings)?;
    let mut doc = read_document(&path)?;

    add_group(&mut doc, &GroupRule { label: label.clone(), keywords }, before.as_deref())?;
    write_document(&path, &doc)?;

    match before {
        Some(b) => println!("Added group {} before {} in {}", label, b, path.display()),
        None => println!("Added group {} to {}", label, path.display()),
    }
    Ok(())
}

/// Remove a group from the settings file.
pub fn remove(label: String) -> Result<()> {
    let path = Settings::find_path().ok_or(Error::NoSettings)?;
    let mut doc = read_document(&path)?;

    remove_group(&mut doc, &label)?;
    write_document(&path, &doc)?;

    println!("Removed group {} from {}", label, path.display());
    Ok(())
}

fn read_document(path: &std::path::Path) -> Result<DocumentMut> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    content
        .parse()
        .map_err(|e: toml_edit::TomlError| Error::SettingsParse(e.to_string()))
}

fn write_document(path: &std::path::Path, doc: &DocumentMut) -> Result<()> {
    std::fs::write(path, doc.to_string()).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn group_table(rule: &GroupRule) -> Table {
    let mut keywords = Array::new();
    for keyword in &rule.keywords {
        keywords.push(keyword.as_str());
    }

    let mut table = Table::new();
    table.insert("label", toml_edit::value(rule.label.as_str()));
    table.insert("keywords", toml_edit::value(keywords));
    table
}

fn table_label(table: &Table) -> Option<&str> {
    table.get("label").and_then(|item| item.as_str())
}

/// The `[[groups]]` array, seeded with the built-in groups if the file has none,
/// so that editing never silently drops the defaults.
fn groups_mut(doc: &mut DocumentMut) -> Result<&mut ArrayOfTables> {
    if !doc.contains_key("groups") {
        let mut groups = ArrayOfTables::new();
        for rule in default_groups() {
            groups.push(group_table(&rule));
        }
        doc.insert("groups", Item::ArrayOfTables(groups));
    }

    doc.get_mut("groups")
        .and_then(|item| item.as_array_of_tables_mut())
        .ok_or_else(|| Error::SettingsParse("'groups' must be an array of tables".to_string()))
}

fn add_group(doc: &mut DocumentMut, rule: &GroupRule, before: Option<&str>) -> Result<()> {
    let groups = groups_mut(doc)?;

    if groups.iter().any(|t| table_label(t) == Some(rule.label.as_str())) {
        return Err(Error::GroupExists(rule.label.clone()));
    }

    let Some(before) = before else {
        groups.push(group_table(rule));
        return Ok(());
    };

    let position = groups
        .iter()
        .position(|t| table_label(t) == Some(before))
        .ok_or_else(|| Error::GroupNotFound(before.to_string()))?;

    let mut tables: Vec<Table> = groups.iter().cloned().collect();
    tables.insert(position, group_table(rule));
    groups.clear();
    for table in tables {
        groups.push(table);
    }
    Ok(())
}

fn remove_group(doc: &mut DocumentMut, label: &str) -> Result<()> {
    let groups = groups_mut(doc)?;

    let position = groups
        .iter()
        .position(|t| table_label(t) == Some(label))
        .ok_or_else(|| Error::GroupNotFound(label.to_string()))?;
    groups.remove(position);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"# my settings
title = "Plugins"

[[groups]]
label = "log"
keywords = ["log"]

[[groups]]
label = "run"
keywords = ["run", "time"]
"#;

    fn labels(doc: &DocumentMut) -> Vec<String> {
        Settings::parse(&doc.to_string())
            .unwrap()
            .groups
            .into_iter()
            .map(|g| g.label)
            .collect()
    }

    #[test]
    fn test_add_group_appends() {
        let mut doc: DocumentMut = SETTINGS.parse().unwrap();
        add_group(&mut doc, &GroupRule::new("mock", &["mock", "fake"]), None).unwrap();

        assert_eq!(labels(&doc), vec!["log", "run", "mock"]);
        let settings = Settings::parse(&doc.to_string()).unwrap();
        assert_eq!(settings.groups[2].keywords, vec!["mock", "fake"]);
        // Comments and other keys survive the edit.
        assert!(doc.to_string().starts_with("# my settings"));
        assert_eq!(settings.title, "Plugins");
    }

    #[test]
    fn test_add_group_before() {
        let mut doc: DocumentMut = SETTINGS.parse().unwrap();
        add_group(&mut doc, &GroupRule::new("async", &["async"]), Some("run")).unwrap();

        assert_eq!(labels(&doc), vec!["log", "async", "run"]);
    }

    #[test]
    fn test_add_group_before_unknown() {
        let mut doc: DocumentMut = SETTINGS.parse().unwrap();
        let result = add_group(&mut doc, &GroupRule::new("async", &["async"]), Some("nope"));

        assert!(matches!(result, Err(Error::GroupNotFound(label)) if label == "nope"));
    }

    #[test]
    fn test_add_duplicate_group() {
        let mut doc: DocumentMut = SETTINGS.parse().unwrap();
        let result = add_group(&mut doc, &GroupRule::new("log", &["logger"]), None);

        assert!(matches!(result, Err(Error::GroupExists(_))));
    }

    #[test]
    fn test_add_group_seeds_defaults() {
        let mut doc: DocumentMut = "title = \"x\"\n".parse().unwrap();
        add_group(&mut doc, &GroupRule::new("extra", &["extra"]), None).unwrap();

        let labels = labels(&doc);
        assert_eq!(labels.len(), default_groups().len() + 1);
        assert_eq!(labels.first().map(String::as_str), Some("log"));
        assert_eq!(labels.last().map(String::as_str), Some("extra"));
    }

    #[test]
    fn test_remove_group() {
        let mut doc: DocumentMut = SETTINGS.parse().unwrap();
        remove_group(&mut doc, "log").unwrap();

        assert_eq!(labels(&doc), vec!["run"]);
    }

    #[test]
    fn test_remove_missing_group() {
        let mut doc: DocumentMut = SETTINGS.parse().unwrap();
        let result = remove_group(&mut doc, "nope");

        assert!(matches!(result, Err(Error::GroupNotFound(_))));
    }

    #[test]
    fn test_groups_wrong_type() {
        let mut doc: DocumentMut = "groups = 1\n".parse().unwrap();
        let result = remove_group(&mut doc, "log");

        assert!(matches!(result, Err(Error::SettingsParse(_))));
    }
}
