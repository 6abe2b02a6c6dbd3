//! Check report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::rewrite::CheckIssue;
use crate::utils::{plural_count, plural_s};

/// Unresolved references grouped by page, ordered by path.
#[derive(Debug, Default)]
pub struct CheckReport {
    pages: BTreeMap<String, Vec<CheckIssue>>,
}

impl CheckReport {
    /// Record the issues found in one page.
    pub fn add(&mut self, source: String, issues: Vec<CheckIssue>) {
        self.pages.entry(source).or_default().extend(issues);
    }

    /// Pages with at least one issue.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total recorded issues.
    pub fn issue_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Print the grouped report to stderr.
    pub fn print(&self) {
        if self.pages.is_empty() {
            return;
        }

        eprintln!();
        eprintln!(
            "{} {}",
            "unresolved references".red().bold(),
            format!(
                "({} page{}, {} issue{})",
                self.page_count(),
                plural_s(self.page_count()),
                self.issue_count(),
                plural_s(self.issue_count())
            )
            .dimmed()
        );

        for (path, issues) in &self.pages {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for issue in issues {
                eprintln!("  {} {}", "→".red(), issue);
            }
        }
        eprintln!();
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pages.is_empty() {
            write!(f, "{}", "all references resolve".green())
        } else {
            let summary = format!(
                "found {} in {}",
                plural_count(self.issue_count(), "unresolved reference"),
                plural_count(self.page_count(), "page")
            );
            write!(f, "{}", summary.red())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn broken(target: &str) -> CheckIssue {
        CheckIssue::BrokenLink { target: target.to_string(), slug: target.to_string() }
    }

    #[test]
    fn test_counts() {
        let mut report = CheckReport::default();
        assert_eq!(report.page_count(), 0);
        assert_eq!(report.issue_count(), 0);

        report.add("a.html".to_string(), vec![broken("x"), broken("y")]);
        report.add("b.html".to_string(), vec![broken("z")]);
        assert_eq!(report.page_count(), 2);
        assert_eq!(report.issue_count(), 3);
    }

    #[test]
    fn test_same_page_extends() {
        let mut report = CheckReport::default();
        report.add("a.html".to_string(), vec![broken("x")]);
        report.add("a.html".to_string(), vec![broken("y")]);
        assert_eq!(report.page_count(), 1);
        assert_eq!(report.issue_count(), 2);
    }
}
