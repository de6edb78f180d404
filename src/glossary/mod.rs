//! Glossary rules applied to translated text.
//!
//! A rule file holds one `source → target` rule per line. Rules are matched
//! case-insensitively as whole words, and the authored target text is emitted
//! verbatim whatever the case of the match.
//!
//! ```text
//! # Azerbaijani fixes
//! state machine → vəziyyət maşını
//! state → dövlət
//! ```

mod index;
mod loader;

use std::path::PathBuf;
use thiserror::Error;

pub use index::GlossaryIndex;
pub use loader::{DELIMITER, LoadedGlossary, load, parse};

/// A single `source → target` substitution rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryRule {
    /// Term to look for, as written in the rule file.
    pub source: String,
    /// Replacement text, emitted exactly as written.
    pub target: String,
    /// 1-based line number in the rule file (0 for rules built in code).
    pub line: usize,
}

impl GlossaryRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            line: 0,
        }
    }
}

/// Non-fatal problems found while loading a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlossaryIssue {
    /// The rule file does not exist; no substitutions are applied.
    #[error("rule file not found: {}", .path.display())]
    RuleFileMissing { path: PathBuf },

    /// A line contains the delimiter but not two non-empty terms.
    #[error("malformed rule on line {line}: {content}")]
    MalformedRule { line: usize, content: String },
}

/// Fatal glossary errors.
#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("failed to read rule file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile glossary pattern: {0}")]
    Pattern(#[from] regex::Error),
}
