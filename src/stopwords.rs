//! Stop-word policy: the engine's base list overlaid with explicit additions
//! and exclusions.
//!
//! The overlay is resolved once at startup into an immutable [`StopWordSet`]
//! that is passed by reference into every linguistic-analysis call.

use std::collections::HashSet;

use serde::Deserialize;

/// Indonesian base stop words exposed by the built-in engine.
///
/// Negations (`tidak`, `bukan`, `belum`, `jangan`) are part of the base list,
/// as in the usual Indonesian lists; the pipeline excludes its negation words
/// again so negation joining can see them.
pub const INDONESIAN_STOP_WORDS: &[&str] = &[
    // Pronouns
    "aku", "saya", "kamu", "anda", "dia", "ia", "beliau", "kami", "kita", "mereka",
    "engkau", "kalian", "nya",
    // Demonstratives / locatives
    "ini", "itu", "sini", "situ", "sana", "begini", "begitu",
    // Prepositions
    "di", "ke", "dari", "pada", "kepada", "untuk", "bagi", "dengan", "oleh", "dalam",
    "tentang", "antara", "hingga", "sampai", "sejak", "menuju", "terhadap",
    // Conjunctions
    "dan", "atau", "tetapi", "tapi", "namun", "serta", "karena", "sebab", "jika",
    "kalau", "apabila", "agar", "supaya", "bahwa", "sehingga", "maka", "lalu",
    "kemudian", "ketika", "sedangkan", "walaupun", "meskipun",
    // Particles
    "pun", "lah", "kah", "tah", "dong", "deh", "sih", "kan", "toh",
    // Auxiliaries / adverbs
    "adalah", "ialah", "merupakan", "yaitu", "yakni", "akan", "sudah", "telah",
    "sedang", "masih", "pernah", "bisa", "dapat", "harus", "boleh", "mau", "ingin",
    "juga", "saja", "hanya", "lagi", "sangat", "amat", "paling", "lebih", "kurang",
    "sekali", "terlalu", "agak", "cukup", "pula", "memang",
    // Relatives / quantifiers
    "yang", "para", "sang", "si", "se", "semua", "setiap", "tiap", "beberapa",
    "banyak", "sedikit", "segala", "seluruh",
    // Negations (excluded again by the pipeline)
    "tidak", "bukan", "belum", "jangan",
];

/// Resolved, read-only stop-word set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { words: words.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Explicit additions and exclusions on top of a base stop-word list.
///
/// Deserializes from `{ "force_stop": [...], "force_not_stop": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StopWordPolicy {
    pub force_stop: HashSet<String>,
    pub force_not_stop: HashSet<String>,
}

impl StopWordPolicy {
    pub fn new<I, J, S, T>(force_stop: I, force_not_stop: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            force_stop: force_stop.into_iter().map(Into::into).collect(),
            force_not_stop: force_not_stop.into_iter().map(Into::into).collect(),
        }
    }

    /// `(base ∪ force_stop) \ force_not_stop`.
    ///
    /// A token listed in both overlays is removed. Applying the same policy
    /// to its own output yields the same set.
    pub fn apply<I, S>(&self, base: I) -> StopWordSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: HashSet<String> = base.into_iter().map(Into::into).collect();
        words.extend(self.force_stop.iter().cloned());
        words.retain(|w| !self.force_not_stop.contains(w));
        StopWordSet { words }
    }
}
