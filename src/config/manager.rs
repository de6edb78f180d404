use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::paths;
use crate::translation::validate_language;
use crate::ui::Style;

/// Source language used when neither the CLI nor the config file sets one.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Rule file looked up in the working directory by default.
pub const DEFAULT_RULES_FILE: &str = "replacements.txt";

/// Sentences translated at once by default.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Default settings in the `[defaults]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Default source language (ISO 639-1 code).
    pub from: Option<String>,
    /// Default target language (ISO 639-1 code).
    pub to: Option<String>,
    /// Default glossary rule file.
    pub rules: Option<String>,
    /// Default number of sentences translated at once.
    pub concurrency: Option<usize>,
}

/// Configuration for a translation provider.
///
/// Each provider has an endpoint and optional API key settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/gtl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// The translation backend selected for a run.
#[derive(Debug, Clone)]
pub struct ResolvedBackend {
    /// The selected provider name.
    pub provider_name: String,
    /// The API endpoint URL.
    pub endpoint: String,
    /// The model to use for translation.
    pub model: String,
    /// The API key (if required).
    pub api_key: Option<String>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` when only the glossary runs.
    pub backend: Option<ResolvedBackend>,
    pub source_language: String,
    pub target_language: String,
    pub rules_path: PathBuf,
    pub concurrency: usize,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Source language code override.
    pub from: Option<String>,
    /// Target language code override.
    pub to: Option<String>,
    /// Provider name override.
    pub provider: Option<String>,
    /// Model name override.
    pub model: Option<String>,
    /// Rule file override.
    pub rules: Option<String>,
    /// Concurrency override.
    pub concurrency: Option<usize>,
    /// Skip the translation backend entirely.
    pub glossary_only: bool,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take
/// precedence over built-in defaults.
///
/// # Errors
///
/// Returns an error if required configuration (provider, model, target
/// language) is missing, a language code is invalid, or the provider is
/// unknown or lacks its API key. With `glossary_only` the backend settings
/// are not required and the target language defaults to the source.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let defaults = &config_file.defaults;

    let source_language = options
        .from
        .as_ref()
        .or(defaults.from.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_SOURCE_LANGUAGE.to_string());
    validate_language(&source_language, "source")?;

    let target_language = match options.to.as_ref().or(defaults.to.as_ref()) {
        Some(to) => to.clone(),
        None if options.glossary_only => source_language.clone(),
        None => bail!(
            "Missing required configuration: 'to' (target language)\n\n\
             Please provide it via:\n  \
             - CLI option: gtl --to <lang>\n  \
             - Config file: ~/.config/gtl/config.toml"
        ),
    };
    validate_language(&target_language, "target")?;

    let rules = options
        .rules
        .as_deref()
        .or(defaults.rules.as_deref())
        .unwrap_or(DEFAULT_RULES_FILE);
    let rules_path = paths::expand_home(rules)?;

    let concurrency = options
        .concurrency
        .or(defaults.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);
    if concurrency == 0 {
        bail!("Invalid configuration: 'concurrency' must be at least 1");
    }

    let backend = if options.glossary_only {
        None
    } else {
        Some(resolve_backend(options, config_file)?)
    };

    Ok(ResolvedConfig {
        backend,
        source_language,
        target_language,
        rules_path,
        concurrency,
    })
}

fn resolve_backend(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedBackend> {
    let defaults = &config_file.defaults;

    let provider_name = options
        .provider
        .as_ref()
        .or(defaults.provider.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'provider'\n\n\
                 Please provide it via:\n  \
                 - CLI option: gtl --provider <name>\n  \
                 - Config file: ~/.config/gtl/config.toml\n\n\
                 Use --glossary-only to apply the glossary without translating."
            )
        })?;

    let provider_config = config_file.providers.get(&provider_name).ok_or_else(|| {
        let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        available.sort_unstable();
        if available.is_empty() {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 No providers configured. Add providers to ~/.config/gtl/config.toml"
            )
        } else {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/gtl/config.toml",
                available.join("\n  - ")
            )
        }
    })?;

    let model = options
        .model
        .as_ref()
        .or(defaults.model.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'model'\n\n\
                 Please provide it via:\n  \
                 - CLI option: gtl --model <name>\n  \
                 - Config file: ~/.config/gtl/config.toml"
            )
        })?;

    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        crate::warn!(
            "{} Model '{}' is not in the configured models list for '{}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            model,
            provider_name,
            provider_config.models.join(", ")
        );
    }

    let api_key = provider_config.get_api_key();

    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/gtl/config.toml"
        );
    }

    Ok(ResolvedBackend {
        provider_name,
        endpoint: provider_config.endpoint.clone(),
        model,
        api_key,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/gtl/config.toml`
    /// or `~/.config/gtl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(config_file)
    }

    /// Loads the config file, treating a missing file as the default config.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        match fs::metadata(&self.config_path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ConfigFile::default()),
            _ => self.load(),
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    fn create_test_options() -> ResolveOptions {
        ResolveOptions {
            from: Some("en".to_string()),
            to: Some("az".to_string()),
            provider: Some("ollama".to_string()),
            model: Some("gemma3:12b".to_string()),
            ..ResolveOptions::default()
        }
    }

    fn create_test_config() -> ConfigFile {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["gemma3:12b".to_string()],
            },
        );
        providers.insert(
            "openrouter".to_string(),
            ProviderConfig {
                endpoint: "https://openrouter.ai/api".to_string(),
                api_key: None,
                api_key_env: Some("GTL_TEST_NONEXISTENT_API_KEY".to_string()),
                models: vec!["gpt-4o".to_string()],
            },
        );

        ConfigFile {
            defaults: DefaultsConfig {
                provider: Some("ollama".to_string()),
                model: Some("gemma3:12b".to_string()),
                from: Some("en".to_string()),
                to: Some("az".to_string()),
                rules: Some("glossary.txt".to_string()),
                concurrency: Some(2),
            },
            providers,
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager.save(&create_test_config()).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.defaults.provider, Some("ollama".to_string()));
        assert_eq!(loaded.defaults.to, Some("az".to_string()));
        assert_eq!(loaded.defaults.rules, Some("glossary.txt".to_string()));
        assert_eq!(loaded.defaults.concurrency, Some(2));
        assert!(loaded.providers.contains_key("ollama"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().unwrap().providers.is_empty());
    }

    #[test]
    fn test_load_or_default_rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[defaults\nto = ").unwrap();

        let err = manager.load_or_default().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: ConfigFile = toml::from_str("[defaults]\nto = \"az\"\n").unwrap();
        assert_eq!(config.defaults.to, Some("az".to_string()));
        assert!(config.defaults.provider.is_none());
        assert!(config.providers.is_empty());
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_from_env() {
        // SAFETY: tests touching the environment are serialized
        unsafe {
            std::env::set_var("GTL_TEST_API_KEY", "test-key-value");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("GTL_TEST_API_KEY".to_string()),
            models: vec![],
        };

        assert_eq!(provider.get_api_key(), Some("test-key-value".to_string()));

        // SAFETY: tests touching the environment are serialized
        unsafe {
            std::env::remove_var("GTL_TEST_API_KEY");
        }
    }

    #[test]
    fn test_provider_get_api_key_fallback() {
        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("GTL_TEST_UNSET_KEY".to_string()),
            models: vec![],
        };

        assert_eq!(provider.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_resolve_config_with_cli_options() {
        let resolved = resolve_config(&create_test_options(), &create_test_config()).unwrap();
        let backend = resolved.backend.unwrap();

        assert_eq!(backend.provider_name, "ollama");
        assert_eq!(backend.endpoint, "http://localhost:11434");
        assert_eq!(backend.model, "gemma3:12b");
        assert!(backend.api_key.is_none());
        assert_eq!(resolved.source_language, "en");
        assert_eq!(resolved.target_language, "az");
    }

    #[test]
    fn test_resolve_config_falls_back_to_file() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(resolved.backend.unwrap().model, "gemma3:12b");
        assert_eq!(resolved.target_language, "az");
        assert_eq!(resolved.rules_path, PathBuf::from("glossary.txt"));
        assert_eq!(resolved.concurrency, 2);
    }

    #[test]
    fn test_resolve_config_builtin_defaults() {
        let mut config = create_test_config();
        config.defaults.from = None;
        config.defaults.rules = None;
        config.defaults.concurrency = None;

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert_eq!(resolved.source_language, DEFAULT_SOURCE_LANGUAGE);
        assert_eq!(resolved.rules_path, PathBuf::from(DEFAULT_RULES_FILE));
        assert_eq!(resolved.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_resolve_config_missing_provider() {
        let options = ResolveOptions {
            provider: None,
            ..create_test_options()
        };

        let result = resolve_config(&options, &ConfigFile::default());

        assert!(result.unwrap_err().to_string().contains("provider"));
    }

    #[test]
    fn test_resolve_config_provider_not_found() {
        let options = ResolveOptions {
            provider: Some("nonexistent".to_string()),
            ..create_test_options()
        };

        let err = resolve_config(&options, &create_test_config()).unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("ollama"));
    }

    #[test]
    fn test_resolve_config_missing_model() {
        let options = ResolveOptions {
            model: None,
            ..create_test_options()
        };
        let mut config = create_test_config();
        config.defaults.model = None;

        let result = resolve_config(&options, &config);

        assert!(result.unwrap_err().to_string().contains("model"));
    }

    #[test]
    fn test_resolve_config_missing_target_language() {
        let options = ResolveOptions {
            to: None,
            ..create_test_options()
        };
        let mut config = create_test_config();
        config.defaults.to = None;

        let result = resolve_config(&options, &config);

        assert!(result.unwrap_err().to_string().contains("'to'"));
    }

    #[test]
    fn test_resolve_config_invalid_language() {
        let options = ResolveOptions {
            to: Some("klingon".to_string()),
            ..create_test_options()
        };

        let err = resolve_config(&options, &create_test_config()).unwrap_err();

        assert!(err.to_string().contains("Invalid target language code"));
    }

    #[test]
    fn test_resolve_config_zero_concurrency() {
        let options = ResolveOptions {
            concurrency: Some(0),
            ..create_test_options()
        };

        let err = resolve_config(&options, &create_test_config()).unwrap_err();

        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_resolve_config_api_key_required_but_missing() {
        let options = ResolveOptions {
            provider: Some("openrouter".to_string()),
            model: Some("gpt-4o".to_string()),
            ..create_test_options()
        };

        let result = resolve_config(&options, &create_test_config());

        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_resolve_config_glossary_only_needs_no_backend() {
        let options = ResolveOptions {
            glossary_only: true,
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &ConfigFile::default()).unwrap();

        assert!(resolved.backend.is_none());
        assert_eq!(resolved.source_language, "en");
        assert_eq!(resolved.target_language, "en");
    }
}
