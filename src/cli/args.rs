use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gtl")]
#[command(about = "Sentence-by-sentence translation CLI with glossary post-processing")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Text to translate (joined with spaces; reads stdin if omitted)
    pub text: Vec<String>,

    /// Read the text to translate from a file
    #[arg(short = 'i', long = "file", value_name = "FILE")]
    pub file: Option<String>,

    /// Source language code (ISO 639-1, default: en)
    #[arg(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Target language code (ISO 639-1, e.g., az, tr, ru)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Provider name (e.g., ollama, openrouter)
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Glossary rule file (default: replacements.txt)
    #[arg(short = 'r', long, value_name = "FILE")]
    pub rules: Option<String>,

    /// Number of sentences translated at once
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Disable the translation cache
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Skip translation and only apply the glossary
    #[arg(short = 'g', long)]
    pub glossary_only: bool,

    /// Print only the final text on stdout
    #[arg(long)]
    pub plain: bool,

    /// Suppress progress output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactively edit default settings
    Configure,
    /// List supported language codes
    Languages,
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
    /// Show the rules parsed from a glossary file
    Rules {
        /// Rule file (default: configured rules or replacements.txt)
        path: Option<String>,
    },
}
