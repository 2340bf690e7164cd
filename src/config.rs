//! Pipeline configuration (`pipeline.json`) and startup initialization.
//!
//! Every field has a default, so `{}` is a valid configuration:
//!
//! ```json
//! {
//!   "slang_corpus": "resource/slang_word_list.csv",
//!   "emoticon_corpus": "resource/emoticon.json",
//!   "stop_words": "resource/stop_words.json",
//!   "lemma_table": null,
//!   "slang_boundary": "whole_word",
//!   "emoticon_boundary": "edges",
//!   "execution": "sequential",
//!   "workers": null,
//!   "grammar": { "digit": "\\b\\d+\\b" }
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use serde::Deserialize;

use crate::{
    batch::{BatchRunner, ExecutionMode},
    corpus,
    error::{Error, Result},
    linguistic::LexiconEngine,
    pipeline::{Pipeline, DEFAULT_NEGATIONS},
    stages::GrammarConfig,
    trie::{Boundary, KeywordTrie},
};

/// Deserialized `pipeline.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub slang_corpus: PathBuf,
    pub emoticon_corpus: PathBuf,
    pub stop_words: PathBuf,
    /// Optional surface → lemma CSV for the built-in engine.
    pub lemma_table: Option<PathBuf>,
    pub negation_words: Vec<String>,
    pub slang_boundary: Boundary,
    pub emoticon_boundary: Boundary,
    pub grammar: GrammarConfig,
    pub execution: ExecutionMode,
    /// Worker pool size in parallel mode; logical CPU count when unset.
    pub workers: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            slang_corpus: PathBuf::from("resource/slang_word_list.csv"),
            emoticon_corpus: PathBuf::from("resource/emoticon.json"),
            stop_words: PathBuf::from("resource/stop_words.json"),
            lemma_table: None,
            negation_words: DEFAULT_NEGATIONS.iter().map(|w| w.to_string()).collect(),
            slang_boundary: Boundary::WholeWord,
            emoticon_boundary: Boundary::Edges,
            grammar: GrammarConfig::default(),
            execution: ExecutionMode::Sequential,
            workers: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
    }

    /// Resolve relative resource paths against `base` (usually the directory
    /// holding the configuration file).
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.slang_corpus);
        resolve(&mut self.emoticon_corpus);
        resolve(&mut self.stop_words);
        if let Some(p) = self.lemma_table.as_mut() {
            resolve(p);
        }
        self
    }

    /// Load every resource and build the pipeline.
    ///
    /// Stop words are resolved first, then the two corpora. Any failure
    /// aborts initialization; no pipeline is returned from partial resources.
    pub fn build_pipeline(&self) -> Result<Pipeline> {
        let policy = corpus::load_stop_word_policy(&self.stop_words)?;
        info!(
            "Loaded stop-word overlay: {} forced, {} excluded",
            policy.force_stop.len(),
            policy.force_not_stop.len()
        );

        let mut engine = LexiconEngine::new();
        if let Some(path) = &self.lemma_table {
            let lemmas = corpus::load_lemma_table(path)?;
            info!("Loaded {} lemmas from {}", lemmas.len(), path.display());
            engine = engine.with_lemmas(lemmas);
        }

        let slang = KeywordTrie::from_entries(
            self.slang_boundary,
            corpus::load_slang_corpus(&self.slang_corpus)?,
        )?;
        info!("Loaded {} slang words from {}", slang.len(), self.slang_corpus.display());

        let emoticons = KeywordTrie::from_entries(
            self.emoticon_boundary,
            corpus::load_emoticon_corpus(&self.emoticon_corpus)?,
        )?;
        info!("Loaded {} emoticons from {}", emoticons.len(), self.emoticon_corpus.display());

        Pipeline::builder()
            .emoticons(emoticons)
            .slang(slang)
            .grammar(self.grammar.clone())
            .engine(Arc::new(engine))
            .stop_word_policy(policy)
            .negations(self.negation_words.iter().cloned())
            .build()
    }

    /// A runner over `pipeline` in the configured execution mode.
    pub fn batch_runner<'p>(&self, pipeline: &'p Pipeline) -> BatchRunner<'p> {
        BatchRunner::new(pipeline).with_mode(self.execution, self.workers)
    }
}
