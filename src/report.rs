use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::classify::Grouping;
use crate::plugins::PluginRecord;
use crate::{Error, Result};

/// Language of the plugin count sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    fn count_sentence(self, total: usize) -> String {
        match self {
            Language::Zh => format!("这份列表包含了 {} 个 Pytest 插件.", total),
            Language::En => format!("This list contains {} pytest plugins.", total),
        }
    }
}

/// Presentation settings for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: String,
    pub language: Language,
    /// Render names as links to the project home page.
    pub link_names: bool,
    /// Include the `last release` column.
    pub last_release: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Pytest Plugins".to_string(),
            language: Language::default(),
            link_names: true,
            last_release: true,
        }
    }
}

/// Render the grouped plugins as a Markdown document.
///
/// The document opens with a blank line, then the title and count sentence.
/// Every group follows in first-seen order and the fallback group closes it,
/// even when empty.
pub fn render(grouping: &Grouping, total: usize, options: &RenderOptions) -> String {
    let mut out = format!(
        "\n# {}\n\n{}\n\n",
        options.title,
        options.language.count_sentence(total)
    );

    for (label, records) in grouping.ordered() {
        out.push_str(&format!("## {}\n\n", label));
        out.push_str(&render_table(records, options));
        out.push_str("\n\n");
    }

    out
}

/// A pipe table with one row per record, columns padded to the widest cell.
/// Widths are terminal display columns, so CJK text stays aligned.
pub fn render_table(records: &[PluginRecord], options: &RenderOptions) -> String {
    let mut headers = vec!["name", "summary"];
    if options.last_release {
        headers.push("last release");
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let mut row = vec![
                escape_cell(&record.display_name(options.link_names)),
                escape_cell(&record.summary),
            ];
            if options.last_release {
                row.push(escape_cell(&record.last_release));
            }
            row
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter().copied(), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| format!(":{}", "-".repeat(w + 1)))
            .fold(String::from("|"), |line, cell| line + &cell + "|"),
    );
    for row in &rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }

    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| {
            let padding = width.saturating_sub(cell.width());
            format!(" {}{} ", cell, " ".repeat(padding))
        })
        .collect();
    format!("|{}|", cells.join("|"))
}

/// Escape characters that would break a pipe table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Overwrite `path` with the rendered report.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), bytes = content.len(), "wrote report");
    Ok(())
}
