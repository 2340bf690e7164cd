//! Startup resources: slang corpus, emoticon corpus, stop-word overlay and
//! lemma table.
//!
//! | Resource | Format |
//! |----------|--------|
//! | slang | CSV with a header row; column 1 = pattern, column 2 = replacement |
//! | emoticon | JSON; canonical token → list of emoticon variants, either as an object or as a list of `[token, [variants…]]` pairs |
//! | stop-word overlay | JSON `{ "force_stop": [...], "force_not_stop": [...] }` |
//! | lemma table | CSV with a header row; column 1 = surface form, column 2 = lemma |
//!
//! Every loader is all-or-nothing: the first bad row fails the whole load.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    error::{Error, Result},
    stopwords::StopWordPolicy,
    trie::KeywordEntry,
};

/// Read the first two columns of every row, in file order.
fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    let csv_err = |source: csv::Error| Error::Csv { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        match (record.get(0), record.get(1)) {
            (Some(first), Some(second)) => pairs.push((first.to_string(), second.to_string())),
            _ => {
                return Err(Error::MissingColumn {
                    path: path.to_path_buf(),
                    line: record.position().map_or(0, |p| p.line()),
                    expected: 2,
                })
            }
        }
    }
    Ok(pairs)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

/// Load the slang corpus: one entry per row.
pub fn load_slang_corpus(path: &Path) -> Result<Vec<KeywordEntry>> {
    Ok(read_pairs(path)?
        .into_iter()
        .map(|(pattern, replacement)| KeywordEntry { pattern, replacement })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmoticonCorpus {
    Pairs(Vec<(String, Vec<String>)>),
    Map(BTreeMap<String, Vec<String>>),
}

/// Load the emoticon corpus: one entry per `(variant → canonical token)`.
///
/// Replacements are padded with a space on each side so a sentiment token
/// never fuses with the word the emoticon was attached to (`mantap😀` →
/// `mantap senang `). Pair lists keep file order; objects are visited in key
/// order. A variant listed under two tokens maps to the one visited last.
pub fn load_emoticon_corpus(path: &Path) -> Result<Vec<KeywordEntry>> {
    let groups = match read_json::<EmoticonCorpus>(path)? {
        EmoticonCorpus::Pairs(pairs) => pairs,
        EmoticonCorpus::Map(map) => map.into_iter().collect(),
    };
    Ok(emoticon_entries(groups))
}

/// Flatten `(canonical token, variants)` groups into padded entries.
pub fn emoticon_entries<I>(groups: I) -> Vec<KeywordEntry>
where
    I: IntoIterator<Item = (String, Vec<String>)>,
{
    groups
        .into_iter()
        .flat_map(|(token, variants)| {
            let replacement = format!(" {} ", token);
            variants.into_iter().map(move |v| KeywordEntry::new(v, replacement.clone()))
        })
        .collect()
}

/// Load the stop-word overlay lists.
pub fn load_stop_word_policy(path: &Path) -> Result<StopWordPolicy> {
    read_json(path)
}

/// Load a surface-form → lemma table.
pub fn load_lemma_table(path: &Path) -> Result<HashMap<String, String>> {
    Ok(read_pairs(path)?.into_iter().collect())
}
