//! Normalization stages: the twelve text rewrites applied to every message.
//!
//! Each stage is a pure function over strings. The regex-backed stages live on
//! [`Grammar`], whose patterns come from configuration ([`GrammarConfig`]) and
//! fall back to the built-in grammars documented on each `DEFAULT_*` constant.
//!
//! | # | Stage | Function |
//! |---|-------|----------|
//! | 1 | emoticon substitution | [`substitute_keywords`] (emoticon trie) |
//! | 2 | URL normalization | [`Grammar::normalize_urls`] |
//! | 3 | URL removal | [`Grammar::remove_urls`] |
//! | 4 | email removal | [`Grammar::remove_emails`] |
//! | 5 | digit removal | [`Grammar::remove_digits`] |
//! | 6 | case folding | [`case_fold`] |
//! | 7 | punctuation removal | [`Grammar::remove_punctuation`] |
//! | 8 | slang substitution | [`substitute_keywords`] (slang trie) |
//! | 9 | stemming + tokenization + stop words | [`LinguisticProcessor::process`](crate::linguistic::LinguisticProcessor::process) |
//! | 10 | unused-character removal | [`remove_unused_characters`] |
//! | 11 | negation joining | [`join_negations`] |
//! | 12 | extra-space collapse | [`collapse_whitespace`] |

use std::{collections::HashSet, fmt};

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::trie::KeywordTrie;

// ─────────────────────────────────────────────────────────────────────────────
// Stage identity
// ─────────────────────────────────────────────────────────────────────────────

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Emoticon,
    NormalizeUrl,
    RemoveUrl,
    RemoveEmail,
    RemoveDigit,
    CaseFold,
    RemovePunctuation,
    Slang,
    Linguistic,
    RemoveUnusedCharacter,
    JoinNegation,
    CollapseWhitespace,
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::Emoticon,
        Stage::NormalizeUrl,
        Stage::RemoveUrl,
        Stage::RemoveEmail,
        Stage::RemoveDigit,
        Stage::CaseFold,
        Stage::RemovePunctuation,
        Stage::Slang,
        Stage::Linguistic,
        Stage::RemoveUnusedCharacter,
        Stage::JoinNegation,
        Stage::CollapseWhitespace,
    ];

    /// 1-based position in the pipeline.
    pub fn index(self) -> usize {
        self as usize + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Emoticon => "emoticon",
            Stage::NormalizeUrl => "normalize_url",
            Stage::RemoveUrl => "remove_url",
            Stage::RemoveEmail => "remove_email",
            Stage::RemoveDigit => "remove_digit",
            Stage::CaseFold => "case_fold",
            Stage::RemovePunctuation => "remove_punctuation",
            Stage::Slang => "slang",
            Stage::Linguistic => "linguistic",
            Stage::RemoveUnusedCharacter => "remove_unused_character",
            Stage::JoinNegation => "join_negation",
            Stage::CollapseWhitespace => "collapse_whitespace",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.index(), self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in grammars
// ─────────────────────────────────────────────────────────────────────────────

/// `www.` host without a scheme, not already part of a URL, path or email.
pub const DEFAULT_WWW_URL: &str = r"(?i)(?<![\w/.@:-])(www\.[^\s]+)";

/// Bare domain with a common TLD (optionally followed by a two-letter country
/// code and a path), not already part of a URL, path or email.
pub const DEFAULT_BARE_DOMAIN: &str = r"(?i)(?<![\w/.@:-])((?:[a-z0-9-]+\.)+(?:com|net|org|id|co|io|me|ly|info|biz)(?:\.[a-z]{2})?(?:/[^\s]*)?)(?![\w@-])";

/// Scheme-qualified URL up to the next whitespace.
pub const DEFAULT_URL: &str = r"(?i)\b(?:https?|ftp)://[^\s]+";

/// `local@domain.tld`, multi-label domains included.
pub const DEFAULT_EMAIL: &str = r"(?i)[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[a-z]{2,}\b";

/// Standalone run of digits; digits glued to letters are kept.
pub const DEFAULT_DIGIT: &str = r"\b\d+\b";

/// Anything that is neither a word character nor whitespace. `_` is a word
/// character, so joined tokens (`gak_apa_apa`) survive.
pub const DEFAULT_PUNCTUATION: &str = r"[^\w\s]";

static RE_SPACES: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"\s+").unwrap());

/// Optional overrides for the regex-backed stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    pub www_url: Option<String>,
    pub bare_domain: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub digit: Option<String>,
    pub punctuation: Option<String>,
}

/// Compiled regex grammars for stages 2–5 and 7.
#[derive(Debug)]
pub struct Grammar {
    www_url: Regex,
    bare_domain: Regex,
    url: Regex,
    email: Regex,
    digit: Regex,
    punctuation: Regex,
}

fn compile(stage: Stage, pattern: Option<&str>, default: &str) -> Result<Regex> {
    Regex::new(pattern.unwrap_or(default))
        .map_err(|source| Error::Grammar { stage, source: Box::new(source) })
}

impl Grammar {
    /// Compile the configured grammars.
    ///
    /// # Errors
    /// [`Error::Grammar`] naming the stage whose pattern does not compile.
    pub fn compile(config: &GrammarConfig) -> Result<Self> {
        Ok(Self {
            www_url: compile(Stage::NormalizeUrl, config.www_url.as_deref(), DEFAULT_WWW_URL)?,
            bare_domain: compile(
                Stage::NormalizeUrl,
                config.bare_domain.as_deref(),
                DEFAULT_BARE_DOMAIN,
            )?,
            url: compile(Stage::RemoveUrl, config.url.as_deref(), DEFAULT_URL)?,
            email: compile(Stage::RemoveEmail, config.email.as_deref(), DEFAULT_EMAIL)?,
            digit: compile(Stage::RemoveDigit, config.digit.as_deref(), DEFAULT_DIGIT)?,
            punctuation: compile(
                Stage::RemovePunctuation,
                config.punctuation.as_deref(),
                DEFAULT_PUNCTUATION,
            )?,
        })
    }

    /// The built-in grammars.
    pub fn builtin() -> Result<Self> {
        Self::compile(&GrammarConfig::default())
    }

    /// Stage 2: prefix scheme-less URLs with `http://` so stage 3 sees them.
    pub fn normalize_urls(&self, text: &str) -> std::result::Result<String, fancy_regex::Error> {
        let text = self.www_url.try_replacen(text, 0, "http://$1")?.into_owned();
        Ok(self.bare_domain.try_replacen(&text, 0, "http://$1")?.into_owned())
    }

    /// Stage 3.
    pub fn remove_urls(&self, text: &str) -> std::result::Result<String, fancy_regex::Error> {
        Ok(self.url.try_replacen(text, 0, " ")?.into_owned())
    }

    /// Stage 4.
    pub fn remove_emails(&self, text: &str) -> std::result::Result<String, fancy_regex::Error> {
        Ok(self.email.try_replacen(text, 0, " ")?.into_owned())
    }

    /// Stage 5.
    pub fn remove_digits(&self, text: &str) -> std::result::Result<String, fancy_regex::Error> {
        Ok(self.digit.try_replacen(text, 0, "")?.into_owned())
    }

    /// Stage 7: punctuation becomes a space so words on either side stay apart.
    pub fn remove_punctuation(&self, text: &str) -> std::result::Result<String, fancy_regex::Error> {
        Ok(self.punctuation.try_replacen(text, 0, " ")?.into_owned())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plain stages
// ─────────────────────────────────────────────────────────────────────────────

/// Stages 1 and 8.
pub fn substitute_keywords(text: &str, trie: &KeywordTrie) -> String {
    trie.substitute(text)
}

/// Stage 6.
pub fn case_fold(text: &str) -> String {
    text.to_lowercase()
}

fn is_unused(c: char) -> bool {
    (c.is_control() && !c.is_whitespace())
        || matches!(
            c,
            '\u{200B}'..='\u{200F}'
                | '\u{2060}'..='\u{2064}'
                | '\u{FEFF}'
                | '\u{FFFD}'
                | '\u{00AD}'
                // Variation selectors and emoji tags survive stage 7 as `\w`.
                | '\u{FE00}'..='\u{FE0F}'
                | '\u{E0001}'
                | '\u{E0020}'..='\u{E007F}'
                | '\u{E0100}'..='\u{E01EF}'
        )
}

/// Stage 10: drop control, zero-width, soft-hyphen, replacement and
/// emoji-presentation characters (variation selectors, tag characters).
pub fn remove_unused_characters(text: &str) -> String {
    text.chars().filter(|&c| !is_unused(c)).collect()
}

/// Stage 11: join a negation token with the token right after it
/// (`tidak suka` → `tidak_suka`).
///
/// Only adjacent pairs are joined, left to right; the joined pair is not
/// rescanned, so `tidak tidak suka` becomes `tidak_tidak suka`. A negation at
/// the end of the text stays as it is.
pub fn join_negations(text: &str, negations: &HashSet<String>) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut tokens = text.split_whitespace();

    while let Some(token) = tokens.next() {
        if negations.contains(token) {
            if let Some(next) = tokens.next() {
                out.push(format!("{}_{}", token, next));
                continue;
            }
        }
        out.push(token.to_string());
    }
    out.join(" ")
}

/// Stage 12.
pub fn collapse_whitespace(text: &str) -> String {
    RE_SPACES.replace_all(text.trim(), " ").into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
