//! Thesa CLI - Command-line interface
//!
//! Usage:
//!   thesa annotate --vocab <file> [--input <file>] [--stem|--no-stem] [--format json|text]
//!   thesa vocab --vocab <file>
//!   thesa stem <words>...

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use thesa_annotator::{stem, Annotator, Vocabulary, VocabularyOptions};
use thesa_core::config::AppConfig;
use thesa_core::{AnnotateOptions, AnnotationResult};
use thesa_parser::ParserRegistry;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thesa")]
#[command(about = "Thesaurus-driven text annotation")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate text with vocabulary concepts
    Annotate {
        /// Vocabulary file (.ttl, .nt or .json)
        #[arg(long)]
        vocab: Option<PathBuf>,
        /// Input text file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
        /// Match word stems as well as surface forms
        #[arg(long, overrides_with = "no_stem")]
        stem: bool,
        /// Match surface forms only, even if the configuration enables stems
        #[arg(long, overrides_with = "stem")]
        no_stem: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show vocabulary statistics and skipped entries
    Vocab {
        /// Vocabulary file (.ttl, .nt or .json)
        #[arg(long)]
        vocab: Option<PathBuf>,
    },
    /// Print the stem of each word
    Stem {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,thesa_annotator={}", config.logging.level))
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Annotate {
            vocab,
            input,
            stem: use_stem,
            no_stem,
            format,
        } => {
            let vocabulary = load_vocabulary(&config, vocab.as_deref()).await?;
            let text = read_input(input.as_deref()).await?;
            if text.trim().is_empty() {
                tracing::warn!("Input text is empty");
            }

            let options = AnnotateOptions {
                use_stem: resolve_use_stem(use_stem, no_stem, config.annotation.use_stem),
            };
            let result = Annotator::new(vocabulary).with_options(options).run(&text);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => print_text(&result),
            }
        }
        Commands::Vocab { vocab } => {
            let vocabulary = load_vocabulary(&config, vocab.as_deref()).await?;
            let stats = vocabulary.stats();

            println!("Concepts: {}", stats.concepts);
            println!("Labels:   {}", stats.labels);
            println!("Stems:    {}", stats.stems);
            println!("Skipped:  {}", stats.diagnostics);
            for diagnostic in vocabulary.diagnostics() {
                println!("  {diagnostic}");
            }
        }
        Commands::Stem { words } => {
            for word in words {
                println!("{} -> {}", word, stem(&word));
            }
        }
    }

    Ok(())
}

/// Command-line flags win over the configured default
fn resolve_use_stem(stem: bool, no_stem: bool, configured: bool) -> bool {
    match (stem, no_stem) {
        (true, _) => true,
        (_, true) => false,
        _ => configured,
    }
}

async fn load_vocabulary(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<Vocabulary> {
    let path = path
        .or(config.vocabulary.path.as_deref())
        .context("No vocabulary given; pass --vocab or set THESA_VOCABULARY")?;

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let format = thesa_parser::VocabularyFormat::from_path(path);
    let triples = ParserRegistry::with_defaults()
        .parse_str(format, &content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!("Read {} triples from {} ({})", triples.len(), path.display(), format);

    let options = VocabularyOptions::default()
        .with_language(config.vocabulary.language.clone())
        .with_skip_unchanged_stems(config.annotation.skip_unchanged_stems);
    Ok(Vocabulary::from_triples(&triples, &options))
}

async fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

/// Highlights in brackets, followed by the concept list
fn print_text(result: &AnnotationResult) {
    let mut rendered = String::new();
    for sentence in &result.sentences {
        for segment in &sentence.segments {
            if segment.highlighted {
                rendered.push('[');
                rendered.push_str(&segment.text);
                rendered.push(']');
            } else {
                rendered.push_str(&segment.text);
            }
        }
    }
    println!("{}", rendered.trim_end());

    if result.concepts.is_empty() {
        println!("\nNo concepts found.");
        return;
    }

    println!("\nConcepts ({}):", result.concepts.len());
    for concept in &result.concepts {
        match &concept.definition {
            Some(definition) => {
                println!("  {} {}: {}", concept.uri, concept.pref_label, definition)
            }
            None => println!("  {} {}", concept.uri, concept.pref_label),
        }
    }
}
