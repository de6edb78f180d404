//! Glossary inspection command handler.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::{ConfigManager, DEFAULT_RULES_FILE};
use crate::glossary;
use crate::paths;
use crate::ui::Style;

use super::translate::report_glossary_issues;

/// Prints the rules parsed from a glossary file in match precedence order.
///
/// Without `path`, the configured rule file (or `replacements.txt`) is used.
/// Missing files and malformed lines are reported as warnings.
pub fn print_rules(path: Option<&str>) -> Result<()> {
    let path = rules_path(path)?;
    let loaded = glossary::load(&path)?;
    report_glossary_issues(&loaded.issues);

    let rules = loaded.index.rules();
    if rules.is_empty() {
        println!("No rules loaded from {}", path.display());
        return Ok(());
    }

    println!(
        "{} {} {}\n",
        Style::header("Rules from"),
        Style::value(path.display()),
        Style::secondary(format!("({} rules, longest first)", rules.len()))
    );

    let width = rules
        .iter()
        .map(|rule| rule.source.chars().count())
        .max()
        .unwrap_or(0);

    for rule in rules {
        let padding = width - rule.source.chars().count();
        println!(
            "  {}{} → {}  {}",
            rule.source,
            " ".repeat(padding),
            Style::value(&rule.target),
            Style::secondary(format!("line {}", rule.line))
        );
    }

    Ok(())
}

fn rules_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return paths::expand_home(path);
    }

    let config = ConfigManager::new()?.load_or_default()?;
    let rules = config.defaults.rules.as_deref().unwrap_or(DEFAULT_RULES_FILE);
    paths::expand_home(rules)
}
