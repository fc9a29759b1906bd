//! Application state management
//!
//! Author: hephaex@gmail.com

use std::path::Path;

use thesa_annotator::{Annotator, Vocabulary, VocabularyOptions};
use thesa_core::config::AppConfig;
use thesa_core::AnnotateOptions;
use thesa_parser::{ParserRegistry, VocabularyFormat};
use tokio::sync::RwLock;

use crate::store::AnnotationStore;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Triple readers for vocabulary uploads
    pub parsers: ParserRegistry,
    /// Saved annotations
    pub annotations: AnnotationStore,
    /// Currently served vocabulary; swapped whole on reload
    annotator: RwLock<Annotator>,
}

impl AppState {
    /// Create new application state with an empty vocabulary
    pub fn new(config: AppConfig) -> Self {
        Self::with_vocabulary(config, Vocabulary::default())
    }

    /// Create application state serving `vocabulary`
    pub fn with_vocabulary(config: AppConfig, vocabulary: Vocabulary) -> Self {
        let annotator = Annotator::new(vocabulary).with_options(AnnotateOptions {
            use_stem: config.annotation.use_stem,
        });

        Self {
            config,
            parsers: ParserRegistry::with_defaults(),
            annotations: AnnotationStore::new(),
            annotator: RwLock::new(annotator),
        }
    }

    /// Vocabulary load options derived from the configuration
    pub fn vocabulary_options(&self) -> VocabularyOptions {
        VocabularyOptions::default()
            .with_language(self.config.vocabulary.language.clone())
            .with_skip_unchanged_stems(self.config.annotation.skip_unchanged_stems)
    }

    /// Snapshot of the current annotator
    ///
    /// Callers keep annotating against this snapshot even if the vocabulary
    /// is replaced meanwhile.
    pub async fn annotator(&self) -> Annotator {
        self.annotator.read().await.clone()
    }

    /// Swap in a new vocabulary
    pub async fn replace_vocabulary(&self, vocabulary: Vocabulary) {
        let mut annotator = self.annotator.write().await;
        *annotator = Annotator::new(vocabulary).with_options(*annotator.options());
    }

    /// Read, parse and install a vocabulary file
    pub async fn load_vocabulary_file(&self, path: &Path) -> anyhow::Result<()> {
        let format = VocabularyFormat::from_path(path);
        let content = tokio::fs::read_to_string(path).await?;

        let options = self.vocabulary_options();
        let vocabulary = tokio::task::spawn_blocking(move || -> anyhow::Result<Vocabulary> {
            let triples = ParserRegistry::with_defaults().parse_str(format, &content)?;
            Ok(Vocabulary::from_triples(&triples, &options))
        })
        .await??;
        tracing::info!(
            "Serving vocabulary from {} ({} concepts)",
            path.display(),
            vocabulary.concepts().len()
        );
        self.replace_vocabulary(vocabulary).await;
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
