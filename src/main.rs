use anyhow::Result;
use clap::Parser;

use gloss_tl::cli::commands::{configure, providers, rules, translate};
use gloss_tl::cli::{Args, Command};
use gloss_tl::config::ResolveOptions;
use gloss_tl::input::InputError;
use gloss_tl::output::{self, OutputConfig};
use gloss_tl::translation::print_languages;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    output::init(OutputConfig::from_flags(args.quiet, args.no_color));

    match args.command {
        Some(Command::Configure) => {
            configure::run_configure()?;
        }
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        Some(Command::Rules { path }) => {
            rules::print_rules(path.as_deref())?;
        }
        None => {
            let options = translate::TranslateOptions {
                file: args.file,
                text: args.text,
                resolve: ResolveOptions {
                    from: args.from,
                    to: args.to,
                    provider: args.provider,
                    model: args.model,
                    rules: args.rules,
                    concurrency: args.concurrency.map(usize::from),
                    glossary_only: args.glossary_only,
                },
                no_cache: args.no_cache,
                plain: args.plain,
            };

            if let Err(e) = translate::run_translate(options).await {
                if e.downcast_ref::<InputError>().is_some() {
                    translate::print_usage();
                    std::process::exit(exitcode::USAGE);
                }
                return Err(e);
            }
        }
    }

    Ok(())
}
