//! Multi-pattern keyword matcher used for the emoticon and slang corpora.
//!
//! Patterns are stored in a character trie (an arena of nodes addressed by
//! `u32` ids), so one scan over the input walks at most `max pattern length`
//! nodes per position regardless of how many patterns are registered.
//!
//! ## Matching policy
//! - **Longest match first**: among the patterns starting at the current
//!   position, the longest one wins.
//! - **No overlap**: after a substitution the scan resumes right after the
//!   consumed input, never inside the replacement.
//! - **Case-sensitive**: callers normalize case before substitution when the
//!   corpus is lower-cased.
//! - Unmatched characters are copied verbatim.
//!
//! ```
//! use chatclean::trie::{Boundary, KeywordTrie};
//!
//! let mut trie = KeywordTrie::new(Boundary::Substring);
//! trie.register("lol", "laugh").unwrap();
//! trie.register("lolz", "laughlots").unwrap();
//! assert_eq!(trie.substitute("lolz"), "laughlots");
//! ```

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Where a registered pattern is allowed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Match anywhere, including inside words (`"aa"` matches in `"baac"`).
    #[default]
    Substring,
    /// Match only when the pattern is neither preceded nor followed by a
    /// word character (alphanumeric or `_`). The longest pattern satisfying
    /// both edges wins.
    WholeWord,
    /// Word boundaries are enforced only on the edges where the pattern
    /// itself has a word character: `:)` matches in `mantap:)`, `xD` does not
    /// match in `3xDfG`.
    Edges,
}

/// One corpus row: `pattern` is rewritten to `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub pattern: String,
    pub replacement: String,
}

impl KeywordEntry {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), replacement: replacement.into() }
    }
}

#[derive(Debug, Default)]
struct Node {
    children: FxHashMap<char, u32>,
    /// Index into `KeywordTrie::replacements` when a pattern ends here.
    replacement: Option<u32>,
}

/// Character trie mapping patterns to replacements.
///
/// Built once during initialization; [`substitute`](Self::substitute) only
/// needs `&self`, so a finished trie can be shared across threads freely.
#[derive(Debug)]
pub struct KeywordTrie {
    nodes: Vec<Node>,
    replacements: Vec<String>,
    boundary: Boundary,
}

impl Default for KeywordTrie {
    fn default() -> Self {
        Self::new(Boundary::default())
    }
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl KeywordTrie {
    pub fn new(boundary: Boundary) -> Self {
        Self { nodes: vec![Node::default()], replacements: Vec::new(), boundary }
    }

    /// Build a trie from corpus entries, in order (later duplicates win).
    pub fn from_entries<I>(boundary: Boundary, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = KeywordEntry>,
    {
        let mut trie = Self::new(boundary);
        for entry in entries {
            trie.register(&entry.pattern, &entry.replacement)?;
        }
        Ok(trie)
    }

    /// Add `pattern → replacement`, overwriting an earlier mapping for the
    /// same pattern.
    ///
    /// # Errors
    /// [`Error::InvalidPattern`] when `pattern` is empty.
    pub fn register(&mut self, pattern: &str, replacement: &str) -> Result<()> {
        if pattern.is_empty() {
            return Err(Error::InvalidPattern { pattern: pattern.to_string() });
        }

        let mut node = 0usize;
        for ch in pattern.chars() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child as usize,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(ch, child as u32);
                    child
                }
            };
        }

        match self.nodes[node].replacement {
            Some(slot) => self.replacements[slot as usize] = replacement.to_string(),
            None => {
                self.nodes[node].replacement = Some(self.replacements.len() as u32);
                self.replacements.push(replacement.to_string());
            }
        }
        Ok(())
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Replacement registered for exactly `pattern`, if any.
    pub fn get(&self, pattern: &str) -> Option<&str> {
        let mut node = 0usize;
        for ch in pattern.chars() {
            node = *self.nodes[node].children.get(&ch)? as usize;
        }
        self.nodes[node].replacement.map(|slot| self.replacements[slot as usize].as_str())
    }

    /// Longest pattern starting at byte offset `start`; returns the end byte
    /// offset of the match and the replacement slot. `after_word` tells
    /// whether the character before `start` is a word character.
    fn longest_match(&self, text: &str, start: usize, after_word: bool) -> Option<(usize, u32)> {
        let mut node = 0usize;
        let mut best = None;
        let tail = &text[start..];
        let mut chars = tail.char_indices().peekable();

        if let Some(&(_, first)) = chars.peek() {
            let start_ok = match self.boundary {
                Boundary::Substring => true,
                Boundary::WholeWord => !after_word,
                Boundary::Edges => !(after_word && is_word_char(first)),
            };
            if !start_ok {
                return None;
            }
        }

        while let Some((offset, ch)) = chars.next() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child as usize,
                None => break,
            };
            if let Some(slot) = self.nodes[node].replacement {
                let end = start + offset + ch.len_utf8();
                let next_is_word = chars.peek().map_or(false, |&(_, next)| is_word_char(next));
                let edge_ok = match self.boundary {
                    Boundary::Substring => true,
                    Boundary::WholeWord => !next_is_word,
                    Boundary::Edges => !(next_is_word && is_word_char(ch)),
                };
                if edge_ok {
                    best = Some((end, slot));
                }
            }
        }
        best
    }

    /// Replace every non-overlapping, longest match in `text`.
    pub fn substitute(&self, text: &str) -> String {
        if text.is_empty() || self.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut pos = 0usize;
        let mut prev: Option<char> = None;

        while let Some(ch) = text[pos..].chars().next() {
            let after_word = prev.map_or(false, is_word_char);
            if let Some((end, slot)) = self.longest_match(text, pos, after_word) {
                out.push_str(&self.replacements[slot as usize]);
                prev = text[..end].chars().next_back();
                pos = end;
                continue;
            }

            out.push(ch);
            prev = Some(ch);
            pos += ch.len_utf8();
        }
        out
    }
}
