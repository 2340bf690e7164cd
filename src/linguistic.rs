//! Linguistic analysis: tokenization, lemmatization and stop-word flags.
//!
//! The analysis capability itself is a black box behind [`LinguisticEngine`].
//! [`LinguisticProcessor`] pairs an engine with the resolved
//! [`StopWordSet`] and turns one input string into the space-joined lemmas of
//! its surviving tokens (pipeline stage 9).
//!
//! The engine never owns mutable process-wide state: the stop-word set is
//! resolved once and handed to every [`LinguisticEngine::analyze`] call.
//!
//! ## Built-in engine
//! [`LexiconEngine`] splits on the word/punctuation grammar `\w+|[^\w\s]`,
//! lemmatizes by table lookup and ships the Indonesian base stop-word list.

use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::stopwords::{StopWordPolicy, StopWordSet, INDONESIAN_STOP_WORDS};

/// Internal failure reported by a linguistic engine.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(String);

impl EngineError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// One analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub is_stop: bool,
    pub is_punct: bool,
}

/// The external linguistic-analysis capability.
pub trait LinguisticEngine: Send + Sync {
    /// The engine's own stop-word list, before any overlay.
    fn default_stop_words(&self) -> Vec<String>;

    /// Tokenize `text`, lemmatize each token and flag the tokens contained in
    /// `stop_words`. Tokens are returned in input order.
    fn analyze(&self, text: &str, stop_words: &StopWordSet) -> Result<Vec<Token>, EngineError>;

    /// Whether concurrent `analyze` calls are safe and give the same results
    /// as sequential ones.
    fn is_reentrant(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in engine
// ─────────────────────────────────────────────────────────────────────────────

/// Words and individual punctuation marks, like `re.findall(r"\w+|[^\w\s]")`.
static RE_TOKENIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").unwrap());

/// Split `text` into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    RE_TOKENIZE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Table-driven engine: regex tokenizer, lemma lookup, Indonesian stop words.
#[derive(Debug, Clone)]
pub struct LexiconEngine {
    lemmas: HashMap<String, String>,
    stop_words: Vec<String>,
}

impl Default for LexiconEngine {
    fn default() -> Self {
        Self {
            lemmas: HashMap::new(),
            stop_words: INDONESIAN_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl LexiconEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `lemmas` (surface form → lemma) for lemmatization. Unknown tokens
    /// are their own lemma.
    pub fn with_lemmas(mut self, lemmas: HashMap<String, String>) -> Self {
        self.lemmas = lemmas;
        self
    }

    /// Replace the base stop-word list.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn lemma<'a>(&'a self, token: &'a str) -> &'a str {
        self.lemmas.get(token).map(String::as_str).unwrap_or(token)
    }
}

impl LinguisticEngine for LexiconEngine {
    fn default_stop_words(&self) -> Vec<String> {
        self.stop_words.clone()
    }

    fn analyze(&self, text: &str, stop_words: &StopWordSet) -> Result<Vec<Token>, EngineError> {
        Ok(tokenize(text)
            .into_iter()
            .map(|t| Token {
                text: t.to_string(),
                lemma: self.lemma(t).to_string(),
                is_stop: stop_words.contains(t),
                is_punct: !t.chars().any(|c| c.is_alphanumeric() || c == '_'),
            })
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Processor
// ─────────────────────────────────────────────────────────────────────────────

/// An engine bound to its resolved stop-word set.
#[derive(Clone)]
pub struct LinguisticProcessor {
    engine: Arc<dyn LinguisticEngine>,
    stop_words: StopWordSet,
}

impl std::fmt::Debug for LinguisticProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinguisticProcessor")
            .field("stop_words", &self.stop_words.len())
            .field("reentrant", &self.engine.is_reentrant())
            .finish()
    }
}

impl LinguisticProcessor {
    /// Resolve `policy` against the engine's base list.
    pub fn new(engine: Arc<dyn LinguisticEngine>, policy: &StopWordPolicy) -> Self {
        let stop_words = policy.apply(engine.default_stop_words());
        Self { engine, stop_words }
    }

    /// Use an already resolved stop-word set.
    pub fn with_stop_words(engine: Arc<dyn LinguisticEngine>, stop_words: StopWordSet) -> Self {
        Self { engine, stop_words }
    }

    pub fn stop_words(&self) -> &StopWordSet {
        &self.stop_words
    }

    pub fn is_reentrant(&self) -> bool {
        self.engine.is_reentrant()
    }

    /// Tokenize, lemmatize and drop stop words and punctuation; surviving
    /// lemmas are joined with single spaces in input order.
    pub fn process(&self, text: &str) -> Result<String, EngineError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let tokens = self.engine.analyze(text, &self.stop_words)?;
        Ok(tokens
            .iter()
            .filter(|t| !t.is_stop && !t.is_punct)
            .map(|t| t.lemma.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor(engine: LexiconEngine, policy: StopWordPolicy) -> LinguisticProcessor {
        LinguisticProcessor::new(Arc::new(engine), &policy)
    }

    #[test]
    fn test_tokenize_words_and_punctuation() {
        assert_eq!(tokenize("halo, dunia!"), vec!["halo", ",", "dunia", "!"]);
        assert_eq!(tokenize("gak_apa_apa ok"), vec!["gak_apa_apa", "ok"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_stop_words_dropped() {
        let p = processor(LexiconEngine::new(), StopWordPolicy::default());
        assert_eq!(p.process("barang yang saya pesan").unwrap(), "barang pesan");
    }

    #[test]
    fn test_overlay_controls_flags() {
        let policy = StopWordPolicy::new(["barang"], ["yang"]);
        let p = processor(LexiconEngine::new(), policy);
        assert_eq!(p.process("barang yang saya pesan").unwrap(), "yang pesan");
    }

    #[test]
    fn test_lemma_lookup() {
        let lemmas = HashMap::from([("dikirim".to_string(), "kirim".to_string())]);
        let engine = LexiconEngine::new().with_lemmas(lemmas).with_stop_words(Vec::<String>::new());
        let p = processor(engine, StopWordPolicy::default());
        assert_eq!(p.process("paket dikirim besok").unwrap(), "paket kirim besok");
    }

    #[test]
    fn test_punctuation_tokens_dropped() {
        let engine = LexiconEngine::new().with_stop_words(Vec::<String>::new());
        let p = processor(engine, StopWordPolicy::default());
        assert_eq!(p.process("oke , siap").unwrap(), "oke siap");
    }

    #[test]
    fn test_blank_input() {
        let p = processor(LexiconEngine::new(), StopWordPolicy::default());
        assert_eq!(p.process("  ").unwrap(), "");
    }

    struct Broken;

    impl LinguisticEngine for Broken {
        fn default_stop_words(&self) -> Vec<String> {
            Vec::new()
        }
        fn analyze(&self, _: &str, _: &StopWordSet) -> Result<Vec<Token>, EngineError> {
            Err(EngineError::new("model not loaded"))
        }
    }

    #[test]
    fn test_engine_error_propagates() {
        let p = LinguisticProcessor::new(Arc::new(Broken), &StopWordPolicy::default());
        let err = p.process("halo").unwrap_err();
        assert_eq!(err.to_string(), "model not loaded");
    }
}
