//! Provider listing command handler.

use anyhow::Result;

use crate::config::{ConfigManager, ProviderConfig};
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Otherwise, lists all configured providers with their endpoints and models.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    if config.providers.is_empty() {
        println!("No providers configured.");
        println!(
            "Add providers to {} (glossary-only mode works without one)",
            manager.config_path().display()
        );
        return Ok(());
    }

    let default_provider = config.defaults.provider.as_deref();
    let marker = |name: &str| {
        if default_provider == Some(name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };

    if let Some(provider_name) = specific_provider {
        let Some(provider) = config.providers.get(provider_name) else {
            anyhow::bail!("Provider '{provider_name}' not found");
        };
        println!(
            "{} {}{}",
            Style::header("Provider:"),
            Style::value(provider_name),
            marker(provider_name)
        );
        print_provider_details(provider);
    } else {
        println!("{}\n", Style::header("Configured providers:"));

        let mut names: Vec<&String> = config.providers.keys().collect();
        names.sort();
        for name in names {
            let provider = &config.providers[name];
            println!("  {}{}", Style::value(name), marker(name));
            println!(
                "    {} {}",
                Style::label("endpoint:"),
                Style::secondary(&provider.endpoint)
            );
            if !provider.models.is_empty() {
                println!("    {} {}", Style::label("models:"), provider.models.join(", "));
            }
        }
    }

    Ok(())
}

fn print_provider_details(provider: &ProviderConfig) {
    println!(
        "  {} = {}",
        Style::label("endpoint"),
        Style::secondary(&provider.endpoint)
    );
    if provider.requires_api_key() {
        let state = if provider.get_api_key().is_some() {
            "(set)"
        } else {
            "(not set)"
        };
        println!("  {}  = {state}", Style::label("api_key"));
    }
    if provider.models.is_empty() {
        println!("  {}   = (none configured)", Style::label("models"));
    } else {
        println!("  {}:", Style::label("models"));
        for model in &provider.models {
            println!("    - {model}");
        }
    }
}
