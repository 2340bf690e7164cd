use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use chatclean::{
    linguistic::{EngineError, LexiconEngine, LinguisticEngine, Token},
    stopwords::{StopWordPolicy, StopWordSet},
    BatchRunner, ChatMessage, Error, ExecutionMode, Pipeline, Stage,
};

/// Delegates to the built-in engine after a content-dependent delay and
/// records the order in which calls complete.
struct SlowEngine {
    inner: LexiconEngine,
    finished: Mutex<Vec<String>>,
}

impl LinguisticEngine for SlowEngine {
    fn default_stop_words(&self) -> Vec<String> {
        self.inner.default_stop_words()
    }

    fn analyze(&self, text: &str, stop_words: &StopWordSet) -> Result<Vec<Token>, EngineError> {
        let delay = if text.contains("pertama") {
            120
        } else if text.contains("kedua") {
            60
        } else {
            0
        };
        thread::sleep(Duration::from_millis(delay));
        self.finished.lock().unwrap().push(text.trim().to_string());
        self.inner.analyze(text, stop_words)
    }
}

/// Fails on any text containing "rusak".
struct FlakyEngine {
    calls: AtomicUsize,
}

impl LinguisticEngine for FlakyEngine {
    fn default_stop_words(&self) -> Vec<String> {
        Vec::new()
    }

    fn analyze(&self, text: &str, stop_words: &StopWordSet) -> Result<Vec<Token>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("rusak") {
            return Err(EngineError::new("cannot analyze"));
        }
        LexiconEngine::new().analyze(text, stop_words)
    }
}

struct SingleThreadedEngine;

impl LinguisticEngine for SingleThreadedEngine {
    fn default_stop_words(&self) -> Vec<String> {
        Vec::new()
    }

    fn analyze(&self, text: &str, stop_words: &StopWordSet) -> Result<Vec<Token>, EngineError> {
        LexiconEngine::new().analyze(text, stop_words)
    }

    fn is_reentrant(&self) -> bool {
        false
    }
}

fn messages(contents: &[&str]) -> Vec<ChatMessage> {
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| ChatMessage::new(format!("m{}", i), *c))
        .collect()
}

#[test]
fn test_parallel_output_keeps_input_order() {
    let engine = Arc::new(SlowEngine { inner: LexiconEngine::new(), finished: Mutex::new(Vec::new()) });
    let pipeline = Pipeline::builder().engine(engine.clone()).build().unwrap();
    let input = messages(&["Pesan PERTAMA", "pesan kedua", "pesan ketiga"]);

    let out = BatchRunner::new(&pipeline)
        .with_mode(ExecutionMode::Parallel, Some(3))
        .run(input.clone());

    let contents: Vec<_> = out.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["pesan pertama", "pesan kedua", "pesan ketiga"]);
    let names: Vec<_> = out.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["m0", "m1", "m2"]);

    // The slow first message finished last, yet came out first.
    assert_eq!(engine.finished.lock().unwrap().last().map(String::as_str), Some("pesan pertama"));

    let sequential = BatchRunner::new(&pipeline).run(input);
    assert_eq!(out, sequential);
}

#[test]
fn test_failed_message_is_skipped() {
    let engine = Arc::new(FlakyEngine { calls: AtomicUsize::new(0) });
    let pipeline = Pipeline::builder().engine(engine.clone()).build().unwrap();

    let report = BatchRunner::new(&pipeline)
        .run_with_report(messages(&["paket aman", "paket rusak", "terima kasih"]));

    assert_eq!(report.failed, 1);
    assert_eq!(report.dropped, 0);
    let names: Vec<_> = report.messages.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["m0", "m2"]);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_failure_names_linguistic_stage() {
    let engine = Arc::new(FlakyEngine { calls: AtomicUsize::new(0) });
    let pipeline = Pipeline::builder().engine(engine).build().unwrap();

    match pipeline.process("barang rusak") {
        Err(Error::StageFailure { stage, .. }) => assert_eq!(stage, Stage::Linguistic),
        other => panic!("expected stage failure, got {:?}", other),
    }
}

#[test]
fn test_parallel_failures_match_sequential() {
    let engine = Arc::new(FlakyEngine { calls: AtomicUsize::new(0) });
    let pipeline = Pipeline::builder().engine(engine).build().unwrap();
    let input = messages(&["rusak", "oke", "rusak lagi", "123", "mantap"]);

    let seq = BatchRunner::new(&pipeline).run_with_report(input.clone());
    let par = BatchRunner::new(&pipeline)
        .with_mode(ExecutionMode::Parallel, Some(2))
        .run_with_report(input);

    assert_eq!(seq.messages, par.messages);
    assert_eq!((seq.failed, seq.dropped), (par.failed, par.dropped));
    assert_eq!((par.failed, par.dropped), (2, 1));
}

#[test]
fn test_non_reentrant_engine_still_processes() {
    let pipeline = Pipeline::builder()
        .engine(Arc::new(SingleThreadedEngine))
        .stop_word_policy(StopWordPolicy::default())
        .build()
        .unwrap();

    let out = BatchRunner::new(&pipeline)
        .with_mode(ExecutionMode::Parallel, Some(4))
        .run(messages(&["Satu", "Dua"]));
    let contents: Vec<_> = out.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["satu", "dua"]);
}
