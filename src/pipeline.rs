//! Pipeline orchestrator: applies the twelve stages, in order, to one
//! message's content.
//!
//! The order is part of the contract:
//! - emoticons are replaced before case folding and punctuation removal
//!   destroy their symbols;
//! - scheme-less URLs are normalized before URL removal so they are caught;
//! - slang runs after case folding (the corpus is lower-case) and before
//!   linguistic analysis (so expansions are stemmed and filtered too);
//! - negation joining runs after stop-word filtering, on the surviving tokens.
//!
//! A [`Pipeline`] owns its two keyword tries, its grammars and its linguistic
//! processor; none of them change after [`PipelineBuilder::build`]. Several
//! independently configured pipelines can coexist in one process.

use std::{collections::HashSet, sync::Arc};

use log::debug;

use crate::{
    error::{Error, Result},
    linguistic::{LexiconEngine, LinguisticEngine, LinguisticProcessor},
    stages::{
        case_fold, collapse_whitespace, join_negations, remove_unused_characters,
        substitute_keywords, Grammar, GrammarConfig, Stage,
    },
    stopwords::StopWordPolicy,
    trie::{Boundary, KeywordTrie},
};

/// Indonesian negation markers joined with their follower by stage 11.
pub const DEFAULT_NEGATIONS: &[&str] = &[
    "tidak", "gak", "nggak", "ga", "enggak", "tak", "bukan", "belum", "jangan", "tdk", "gk",
    "ngga",
];

/// The fixed normalization sequence for one message.
#[derive(Debug)]
pub struct Pipeline {
    emoticons: KeywordTrie,
    slang: KeywordTrie,
    grammar: Grammar,
    processor: LinguisticProcessor,
    negations: HashSet<String>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Run all twelve stages.
    ///
    /// # Errors
    /// [`Error::StageFailure`] naming the first stage that failed. No
    /// partially rewritten content is returned.
    pub fn process(&self, content: &str) -> Result<String> {
        let prepared = self.prepare(content)?;
        let analyzed = self.analyze(&prepared)?;
        Ok(self.finish(&analyzed))
    }

    /// Stages 1–8: keyword substitution and structural cleanup.
    pub fn prepare(&self, content: &str) -> Result<String> {
        let text = substitute_keywords(content, &self.emoticons);
        let text = self
            .grammar
            .normalize_urls(&text)
            .map_err(|e| Error::stage(Stage::NormalizeUrl, e))?;
        let text = self.grammar.remove_urls(&text).map_err(|e| Error::stage(Stage::RemoveUrl, e))?;
        let text = self
            .grammar
            .remove_emails(&text)
            .map_err(|e| Error::stage(Stage::RemoveEmail, e))?;
        let text = self
            .grammar
            .remove_digits(&text)
            .map_err(|e| Error::stage(Stage::RemoveDigit, e))?;
        let text = case_fold(&text);
        let text = self
            .grammar
            .remove_punctuation(&text)
            .map_err(|e| Error::stage(Stage::RemovePunctuation, e))?;
        Ok(substitute_keywords(&text, &self.slang))
    }

    /// Stage 9: tokenize, stem, drop stop words.
    pub fn analyze(&self, prepared: &str) -> Result<String> {
        self.processor.process(prepared).map_err(|e| Error::stage(Stage::Linguistic, e))
    }

    /// Stages 10–12: residual cleanup, negation joining, whitespace collapse.
    pub fn finish(&self, analyzed: &str) -> String {
        let text = remove_unused_characters(analyzed);
        let text = join_negations(&text, &self.negations);
        collapse_whitespace(&text)
    }

    pub fn emoticons(&self) -> &KeywordTrie {
        &self.emoticons
    }

    pub fn slang(&self) -> &KeywordTrie {
        &self.slang
    }

    pub fn processor(&self) -> &LinguisticProcessor {
        &self.processor
    }

    pub fn negations(&self) -> &HashSet<String> {
        &self.negations
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Collects the initialization inputs of a [`Pipeline`].
///
/// Unset parts default to: empty tries, built-in grammars, [`LexiconEngine`],
/// an empty stop-word overlay and [`DEFAULT_NEGATIONS`].
///
/// The negation words are never stop words: [`build`](Self::build) adds them
/// to the overlay's exclusions.
pub struct PipelineBuilder {
    emoticons: KeywordTrie,
    slang: KeywordTrie,
    grammar: GrammarConfig,
    engine: Option<Arc<dyn LinguisticEngine>>,
    policy: StopWordPolicy,
    negations: HashSet<String>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            emoticons: KeywordTrie::new(Boundary::Edges),
            slang: KeywordTrie::new(Boundary::WholeWord),
            grammar: GrammarConfig::default(),
            engine: None,
            policy: StopWordPolicy::default(),
            negations: DEFAULT_NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl PipelineBuilder {
    pub fn emoticons(mut self, trie: KeywordTrie) -> Self {
        self.emoticons = trie;
        self
    }

    pub fn slang(mut self, trie: KeywordTrie) -> Self {
        self.slang = trie;
        self
    }

    pub fn grammar(mut self, grammar: GrammarConfig) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn engine(mut self, engine: Arc<dyn LinguisticEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn stop_word_policy(mut self, policy: StopWordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn negations<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.negations = words.into_iter().map(Into::into).collect();
        self
    }

    /// Compile grammars and resolve the stop-word overlay.
    ///
    /// # Errors
    /// [`Error::Grammar`] when a configured pattern does not compile.
    pub fn build(self) -> Result<Pipeline> {
        let grammar = Grammar::compile(&self.grammar)?;
        let engine = self.engine.unwrap_or_else(|| Arc::new(LexiconEngine::new()));
        // A negation that is also a stop word would be gone before stage 11.
        let mut policy = self.policy;
        policy.force_not_stop.extend(self.negations.iter().cloned());
        let processor = LinguisticProcessor::new(engine, &policy);
        debug!(
            "Pipeline ready: {} emoticons, {} slang words, {} stop words, {} negations",
            self.emoticons.len(),
            self.slang.len(),
            processor.stop_words().len(),
            self.negations.len()
        );

        Ok(Pipeline {
            emoticons: self.emoticons,
            slang: self.slang,
            grammar,
            processor,
            negations: self.negations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::KeywordEntry;

    fn pipeline() -> Pipeline {
        let emoticons = KeywordTrie::from_entries(
            Boundary::Substring,
            [KeywordEntry::new("😀", " senang "), KeywordEntry::new(":(", " sedih ")],
        )
        .unwrap();
        let slang = KeywordTrie::from_entries(
            Boundary::WholeWord,
            [KeywordEntry::new("gpp", "gak_apa_apa"), KeywordEntry::new("org", "orang")],
        )
        .unwrap();
        Pipeline::builder()
            .emoticons(emoticons)
            .slang(slang)
            .stop_word_policy(StopWordPolicy::new(Vec::<String>::new(), DEFAULT_NEGATIONS.iter().copied()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_end_to_end_message() {
        let out = pipeline().process("Gpp kok gak ada org disini http://x.co 😀").unwrap();
        assert_eq!(out, "gak_apa_apa kok gak_ada orang disini senang");
    }

    #[test]
    fn test_slang_matches_after_case_fold() {
        let out = pipeline().process("GPP").unwrap();
        assert_eq!(out, "gak_apa_apa");
    }

    #[test]
    fn test_emoticon_before_punctuation_removal() {
        // ":(" would be stripped by stage 7 if stage 1 ran later.
        let out = pipeline().process("barang rusak :(").unwrap();
        assert_eq!(out, "barang rusak sedih");
    }

    #[test]
    fn test_only_noise_becomes_empty() {
        let out = pipeline().process("http://a.co www.b.com cs@toko.id 08123456789").unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_stop_words_removed() {
        let out = pipeline().process("Barangnya yang bagus").unwrap();
        assert_eq!(out, "barangnya bagus");
    }

    #[test]
    fn test_split_stages_compose_to_process() {
        let p = pipeline();
        let input = "Ga suka pelayanan nya :( cek www.toko.com";
        let manual = p.finish(&p.analyze(&p.prepare(input).unwrap()).unwrap());
        assert_eq!(manual, p.process(input).unwrap());
        assert_eq!(manual, "ga_suka pelayanan sedih cek");
    }

    #[test]
    fn test_default_builder_joins_negations() {
        let p = Pipeline::builder().build().unwrap();
        assert_eq!(p.process("tidak suka").unwrap(), "tidak_suka");
        assert_eq!(p.process("Jangan lupa").unwrap(), "jangan_lupa");
        assert_eq!(p.process("belum dikirim").unwrap(), "belum_dikirim");
        assert!(!p.processor().stop_words().contains("bukan"));
    }

    #[test]
    fn test_negation_wins_over_forced_stop_word() {
        let p = Pipeline::builder()
            .stop_word_policy(StopWordPolicy::new(["gak"], Vec::<String>::new()))
            .build()
            .unwrap();
        assert_eq!(p.process("gak ada").unwrap(), "gak_ada");
    }

    #[test]
    fn test_edge_boundary_spares_urls() {
        let emoticons = KeywordTrie::from_entries(
            Boundary::Edges,
            [KeywordEntry::new("xD", " tertawa "), KeywordEntry::new(":)", " senang ")],
        )
        .unwrap();
        let p = Pipeline::builder().emoticons(emoticons).build().unwrap();
        assert_eq!(p.emoticons().boundary(), Boundary::Edges);
        assert_eq!(p.process("mantap:) xD").unwrap(), "mantap senang tertawa");
        assert_eq!(p.process("cek https://bit.ly/3xDfG").unwrap(), "cek");
    }
}
