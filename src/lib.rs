//! # chatclean
//!
//! Normalizes raw chat-message text into an analysis-ready token stream for
//! topic modeling and word statistics.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use chatclean::{config::PipelineConfig, message::read_messages};
//!
//! let config = PipelineConfig::from_file(Path::new("config/pipeline.json")).unwrap();
//! let pipeline = config.build_pipeline().unwrap();
//!
//! let messages = read_messages(Path::new("resource/example/example.csv")).unwrap();
//! for message in config.batch_runner(&pipeline).run(messages) {
//!     println!("{}", message.content);
//! }
//! ```
//!
//! Or build a pipeline by hand:
//!
//! ```
//! use chatclean::{KeywordEntry, KeywordTrie, Pipeline, trie::Boundary};
//!
//! let slang = KeywordTrie::from_entries(
//!     Boundary::WholeWord,
//!     [KeywordEntry::new("gpp", "gak_apa_apa")],
//! ).unwrap();
//! let pipeline = Pipeline::builder().slang(slang).build().unwrap();
//! assert_eq!(pipeline.process("GPP kok!").unwrap(), "gak_apa_apa kok");
//! ```
//!
//! ## Pipeline
//! 1. **Emoticons**: symbolic emoticons → sentiment tokens (case-sensitive trie).
//! 2. **URL normalization**: `www.…` and bare domains get an `http://` scheme.
//! 3. **URL removal**.
//! 4. **Email removal**.
//! 5. **Digit removal**: standalone numeric runs.
//! 6. **Case folding**.
//! 7. **Punctuation removal**: `_` is kept.
//! 8. **Slang**: lower-case slang → canonical words (trie).
//! 9. **Linguistic analysis**: tokenize, lemmatize, drop stop words.
//! 10. **Unused characters**: control and zero-width characters.
//! 11. **Negation joining**: `tidak suka` → `tidak_suka`.
//! 12. **Whitespace collapse**.
//!
//! Initialization (corpora, stop-word overlay, grammars) happens once; the
//! resulting [`Pipeline`] is immutable and shared freely across threads.

pub mod batch;
pub mod config;
pub mod corpus;
pub mod error;
pub mod linguistic;
pub mod message;
pub mod pipeline;
pub mod stages;
pub mod stopwords;
pub mod trie;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use batch::{BatchReport, BatchRunner, ExecutionMode};
pub use error::{Error, Result, StageError};
pub use message::ChatMessage;
pub use pipeline::Pipeline;
pub use stages::Stage;
pub use trie::{KeywordEntry, KeywordTrie};
