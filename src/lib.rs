//! # gtl - Sentence-by-sentence Translation CLI
//!
//! `gtl` splits text into sentences, translates each one through an
//! OpenAI-compatible endpoint and then enforces a user glossary on the
//! joined result, so preferred terms survive whatever the model produced.
//!
//! ## Features
//!
//! - **Glossary enforcement**: whole-word, case-insensitive, longest-match
//!   replacement from a plain `source → target` rule file
//! - **Sentence pipeline**: per-sentence progress, ordered output and
//!   bounded concurrency
//! - **Graceful failure**: a sentence that fails to translate keeps its
//!   original text and the run continues
//! - **Caching**: avoid redundant API calls with SQLite-based caching
//! - **Glossary-only mode**: apply the rules without any backend
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate words given on the command line
//! gtl --to az "The cache is warm. Restart the server."
//!
//! # Translate from stdin, printing only the result
//! cat notes.txt | gtl --to tr --plain
//!
//! # Only enforce the glossary
//! gtl --glossary-only --rules terms.txt "Open the pull request"
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/gtl/config.toml`:
//!
//! ```toml
//! [defaults]
//! provider = "ollama"
//! model = "gemma3:12b"
//! from = "en"
//! to = "az"
//! rules = "~/.config/gtl/replacements.txt"
//!
//! [providers.ollama]
//! endpoint = "http://localhost:11434"
//! models = ["gemma3:12b", "llama3.2"]
//! ```

/// Translation cache management using `SQLite`.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// Glossary rule parsing and whole-word replacement.
pub mod glossary;

/// Input reading from files, command-line words and stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Segment, translate and post-process pipeline.
pub mod pipeline;

/// Sentence segmentation.
pub mod segment;

/// Translation backends for OpenAI-compatible APIs.
pub mod translation;

/// Terminal UI components (spinner, colors, prompts).
pub mod ui;
