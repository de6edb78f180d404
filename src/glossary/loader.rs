//! Rule file parsing and loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::{GlossaryError, GlossaryIndex, GlossaryIssue, GlossaryRule};

/// Separator between source and target terms in a rule file.
pub const DELIMITER: char = '→';

const COMMENT_PREFIX: char = '#';

/// A glossary index together with the problems found while loading it.
#[derive(Debug, Clone, Default)]
pub struct LoadedGlossary {
    pub index: GlossaryIndex,
    pub issues: Vec<GlossaryIssue>,
}

/// Loads and indexes the rule file at `path`.
///
/// A missing file is not an error: the result holds an empty index and a
/// [`GlossaryIssue::RuleFileMissing`]. Malformed lines are skipped and
/// reported the same way.
pub fn load(path: impl AsRef<Path>) -> Result<LoadedGlossary, GlossaryError> {
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(LoadedGlossary {
                index: GlossaryIndex::empty(),
                issues: vec![GlossaryIssue::RuleFileMissing {
                    path: path.to_path_buf(),
                }],
            });
        }
        Err(source) => {
            return Err(GlossaryError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let (rules, issues) = parse(&content);
    let index = GlossaryIndex::from_rules(rules)?;

    Ok(LoadedGlossary { index, issues })
}

/// Parses rule file content into rules and malformed-line issues.
///
/// Blank lines, `#` comments and lines without [`DELIMITER`] are ignored.
pub fn parse(content: &str) -> (Vec<GlossaryRule>, Vec<GlossaryIssue>) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut rules = Vec::new();
    let mut issues = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        let Some((source, target)) = line.split_once(DELIMITER) else {
            continue;
        };

        let (source, target) = (source.trim(), target.trim());
        if source.is_empty() || target.is_empty() {
            issues.push(GlossaryIssue::MalformedRule {
                line: idx + 1,
                content: line.to_string(),
            });
            continue;
        }

        rules.push(GlossaryRule {
            source: source.to_string(),
            target: target.to_string(),
            line: idx + 1,
        });
    }

    (rules, issues)
}
