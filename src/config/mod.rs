//! Configuration file management and provider settings.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_CONCURRENCY, DEFAULT_RULES_FILE, DEFAULT_SOURCE_LANGUAGE,
    DefaultsConfig, ProviderConfig, ResolveOptions, ResolvedBackend, ResolvedConfig,
    resolve_config,
};
