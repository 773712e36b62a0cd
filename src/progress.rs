//! Progress display for the fetch loop.

use indicatif::{ProgressBar, ProgressStyle};

const FETCH_TEMPLATE: &str =
    "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta} {msg}";

/// A bar for per-package fetches, or a hidden one in quiet mode.
/// The length is set by the enumerator once candidates are known.
pub fn fetch_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(FETCH_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_bar_is_hidden() {
        assert!(fetch_bar(true).is_hidden());
    }

    #[test]
    fn test_template_is_valid() {
        assert!(ProgressStyle::default_bar().template(FETCH_TEMPLATE).is_ok());
    }
}
