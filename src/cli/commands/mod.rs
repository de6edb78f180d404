//! Subcommand implementations.

/// Configure command handler.
pub mod configure;

/// Provider listing command handler.
pub mod providers;

/// Glossary inspection command handler.
pub mod rules;

/// Translation command handler.
pub mod translate;
