use anyhow::Result;
use std::path::Path;

use crate::cache::CacheManager;
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::glossary::{self, GlossaryIndex, GlossaryIssue};
use crate::input::{InputReader, InputSource};
use crate::output;
use crate::pipeline::{Pipeline, PipelineOptions, SentenceOutcome};
use crate::translation::{CachedTranslator, IdentityTranslator, TranslationClient, Translator};
use crate::ui::{Spinner, Style};
use crate::{info, status, warn};

pub struct TranslateOptions {
    pub file: Option<String>,
    pub text: Vec<String>,
    pub resolve: ResolveOptions,
    pub no_cache: bool,
    pub plain: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let source = InputSource::detect(options.file.as_deref(), &options.text);
    let input = InputReader::read(source)?;

    let manager = ConfigManager::new()?;
    let config = resolve_config(&options.resolve, &manager.load_or_default()?)?;

    info!("{} {input}\n", Style::label("Input:"));

    let glossary = load_glossary(&config.rules_path)?;
    let pipeline_options = PipelineOptions {
        source_language: config.source_language,
        target_language: config.target_language,
        concurrency: config.concurrency,
    };

    let Some(backend) = config.backend else {
        return run_pipeline(IdentityTranslator, glossary, pipeline_options, &input, &options).await;
    };

    let client = TranslationClient::new(backend.endpoint, backend.model, backend.api_key);
    if options.no_cache {
        run_pipeline(client, glossary, pipeline_options, &input, &options).await
    } else {
        let translator = CachedTranslator::new(client, CacheManager::new()?);
        run_pipeline(translator, glossary, pipeline_options, &input, &options).await
    }
}

/// Loads the rule file, reporting missing files and malformed lines.
pub fn load_glossary(path: &Path) -> Result<GlossaryIndex> {
    let loaded = glossary::load(path)?;
    report_glossary_issues(&loaded.issues);

    if !loaded.index.is_empty() {
        info!(
            "Loaded {} replacement rules from {}",
            loaded.index.len(),
            path.display()
        );
    }

    Ok(loaded.index)
}

pub fn report_glossary_issues(issues: &[GlossaryIssue]) {
    for issue in issues {
        match issue {
            GlossaryIssue::RuleFileMissing { .. } => {
                warn!("{} {issue}. Skipping replacements.", Style::warning("Warning:"));
            }
            GlossaryIssue::MalformedRule { .. } => {
                warn!("{} {issue}", Style::warning("Warning:"));
            }
        }
    }
}

/// Prints the usage shown when no input text is supplied.
pub fn print_usage() {
    eprintln!("{} no input text supplied\n", Style::error("Error:"));
    eprintln!("Usage: gtl \"Your English text\"");
    eprintln!("   or: cat file.txt | gtl");
    eprintln!("   or: gtl --file file.txt");
    eprintln!("\nRun 'gtl --help' for all options.");
}

async fn run_pipeline<T: Translator + Sync>(
    translator: T,
    glossary: GlossaryIndex,
    pipeline_options: PipelineOptions,
    input: &str,
    options: &TranslateOptions,
) -> Result<()> {
    let pipeline = Pipeline::new(translator, glossary, pipeline_options);

    let hide_spinner = output::is_quiet() || options.resolve.glossary_only;
    let spinner = Spinner::new("Translating...", hide_spinner);

    let result = pipeline
        .run(input, |outcome| {
            spinner.suspend(|| report_sentence(outcome));
            spinner.set_message(format!(
                "Translating... ({}/{})",
                outcome.index, outcome.total
            ));
        })
        .await;

    spinner.stop();

    let failures = result.failures();
    if failures > 0 {
        warn!(
            "{} {failures} of {} sentences were left untranslated",
            Style::warning("Warning:"),
            result.sentences.len()
        );
    }

    if result.glossary_applied() {
        info!("\n{} {}", Style::label("After replacements:"), result.text);
    }

    if options.plain {
        println!("{}", result.text);
    } else {
        status!();
        println!("{} {}", Style::success("✓ FINAL:"), result.text);
    }

    Ok(())
}

fn report_sentence(outcome: &SentenceOutcome) {
    status!(
        "  {} {}",
        Style::secondary(format!("[{}/{}]", outcome.index, outcome.total)),
        outcome.original
    );

    if let Some(error) = &outcome.error {
        warn!(
            "{} translation failed for sentence {}: {error}. Keeping original text.",
            Style::warning("Warning:"),
            outcome.index
        );
    }

    status!("        → {}", outcome.translated);
}
