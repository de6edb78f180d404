//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::config::{
    ConfigFile, ConfigManager, DEFAULT_RULES_FILE, DEFAULT_SOURCE_LANGUAGE, DefaultsConfig,
};
use crate::translation::SUPPORTED_LANGUAGES;
use crate::ui::{Style, run_prompt};

/// Runs the configure command to edit default settings.
///
/// Prompts for the default provider and model (when providers are configured),
/// the source and target languages and the glossary rule file.
pub fn run_configure() -> Result<()> {
    if run_prompt(run_configure_inner)?.is_none() {
        println!("{}", Style::secondary("Cancelled."));
    }
    Ok(())
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let (provider, model) = if config.providers.is_empty() {
        println!(
            "{}",
            Style::secondary(format!(
                "No providers configured; add [providers.<name>] to {} to enable translation.",
                manager.config_path().display()
            ))
        );
        println!();
        (None, None)
    } else {
        let mut provider_names: Vec<String> = config.providers.keys().cloned().collect();
        provider_names.sort();

        let provider = select_provider(&provider_names, config.defaults.provider.as_deref())?;
        let available_models = config
            .providers
            .get(&provider)
            .map(|p| p.models.clone())
            .unwrap_or_default();
        let model = select_model(&available_models, config.defaults.model.as_deref())?;
        (Some(provider), Some(model))
    };

    let from = select_language(
        "Default source language:",
        config
            .defaults
            .from
            .as_deref()
            .or(Some(DEFAULT_SOURCE_LANGUAGE)),
    )?;
    let to = select_language("Default target language:", config.defaults.to.as_deref())?;
    let rules = prompt_rules(config.defaults.rules.as_deref())?;

    config.defaults = DefaultsConfig {
        provider,
        model,
        from: Some(from),
        to: Some(to),
        rules: Some(rules),
        concurrency: config.defaults.concurrency,
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let show = |value: Option<&str>| value.map_or_else(|| Style::secondary("(not set)"), Style::value);
    let defaults = &config.defaults;

    println!("{}", Style::header("Current defaults"));
    println!("  {}  {}", Style::label("provider"), show(defaults.provider.as_deref()));
    println!("  {}     {}", Style::label("model"), show(defaults.model.as_deref()));
    println!("  {}      {}", Style::label("from"), show(defaults.from.as_deref()));
    println!("  {}        {}", Style::label("to"), show(defaults.to.as_deref()));
    println!("  {}     {}", Style::label("rules"), show(defaults.rules.as_deref()));
    println!();
}

fn select_provider(providers: &[String], default: Option<&str>) -> Result<String> {
    let default_index = default
        .and_then(|d| providers.iter().position(|p| p == d))
        .unwrap_or(0);

    let selection = Select::new("Default provider:", providers.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn select_model(available_models: &[String], default: Option<&str>) -> Result<String> {
    if available_models.is_empty() {
        let mut prompt = Text::new("Default model:").with_help_message("Enter the model name");
        if let Some(d) = default {
            prompt = prompt.with_default(d);
        }

        let model = prompt.prompt()?;
        if model.trim().is_empty() {
            bail!("Model name cannot be empty");
        }

        Ok(model.trim().to_string())
    } else {
        let default_index = default
            .and_then(|d| available_models.iter().position(|m| m == d))
            .unwrap_or(0);

        let selection = Select::new("Default model:", available_models.to_vec())
            .with_starting_cursor(default_index)
            .prompt()?;

        Ok(selection)
    }
}

fn select_language(message: &str, default: Option<&str>) -> Result<String> {
    let options: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("{code} - {name}"))
        .collect();

    let default_index = default
        .and_then(|d| SUPPORTED_LANGUAGES.iter().position(|(code, _)| *code == d))
        .unwrap_or(0);

    let selection = Select::new(message, options)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(language_code(&selection).to_string())
}

fn prompt_rules(default: Option<&str>) -> Result<String> {
    let rules = Text::new("Glossary rule file:")
        .with_default(default.unwrap_or(DEFAULT_RULES_FILE))
        .with_help_message("One `source → target` rule per line; `~` is expanded")
        .prompt()?;

    let rules = rules.trim();
    if rules.is_empty() {
        bail!("Rule file path cannot be empty");
    }

    Ok(rules.to_string())
}

/// Extracts the code from a `code - Name` selection.
fn language_code(selection: &str) -> &str {
    selection.split(" - ").next().unwrap_or(selection)
}
