//! In-memory collaborator adapters used by the simulator binary and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use lexigem_algo::{Sentence, VocabularyWord};

use crate::error::{AudioError, BackendError};
use crate::ports::{
    AttemptHistoryStore, AttemptRecord, AudioSource, AudioTrigger, ProgressSink,
    SessionSummarySink, WordCorpus,
};
use crate::session::{ProgressSnapshot, SessionSummary};

#[derive(Default)]
pub struct InMemoryCorpus {
    sets: Mutex<HashMap<String, Vec<VocabularyWord>>>,
    sentences: Mutex<Vec<Sentence>>,
    fail_sentences: AtomicBool,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(self, set_id: &str, words: Vec<VocabularyWord>) -> Self {
        self.sets.lock().insert(set_id.to_string(), words);
        self
    }

    pub fn with_sentences(self, sentences: Vec<Sentence>) -> Self {
        self.sentences.lock().extend(sentences);
        self
    }

    /// Make every sentence lookup fail from now on
    pub fn set_sentence_failure(&self, failing: bool) {
        self.fail_sentences.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl WordCorpus for InMemoryCorpus {
    async fn list_words(&self, set_id: &str) -> Result<Vec<VocabularyWord>, BackendError> {
        self.sets
            .lock()
            .get(set_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("word set {set_id}")))
    }

    async fn find_sentence_containing(
        &self,
        word: &str,
        _language: &str,
    ) -> Result<Vec<Sentence>, BackendError> {
        if self.fail_sentences.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("sentence corpus".to_string()));
        }
        let needle = word.to_lowercase();
        Ok(self
            .sentences
            .lock()
            .iter()
            .filter(|sentence| sentence.text.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryHistoryStore {
    last_seen: Mutex<HashMap<String, DateTime<Utc>>>,
    levels: Mutex<HashMap<String, u8>>,
    records: Mutex<Vec<AttemptRecord>>,
    failing: AtomicBool,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn seed_encounter(&self, word_id: &str, at: DateTime<Utc>, level: u8) {
        self.last_seen.lock().insert(word_id.to_string(), at);
        self.levels.lock().insert(word_id.to_string(), level);
    }

    pub fn records(&self) -> Vec<AttemptRecord> {
        self.records.lock().clone()
    }

    pub fn level_of(&self, word_id: &str) -> Option<u8> {
        self.levels.lock().get(word_id).copied()
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("attempt history".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AttemptHistoryStore for InMemoryHistoryStore {
    async fn last_encountered(&self, word_id: &str) -> Result<Option<DateTime<Utc>>, BackendError> {
        self.check()?;
        Ok(self.last_seen.lock().get(word_id).copied())
    }

    async fn mastery_level(&self, word_id: &str) -> Result<Option<u8>, BackendError> {
        self.check()?;
        Ok(self.levels.lock().get(word_id).copied())
    }

    async fn record_attempt(&self, record: &AttemptRecord) -> Result<(), BackendError> {
        self.check()?;
        self.last_seen
            .lock()
            .insert(record.word_id.clone(), record.recorded_at);
        self.levels
            .lock()
            .insert(record.word_id.clone(), record.new_level);
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Audio trigger that only remembers what it was asked to play
#[derive(Default)]
pub struct RecordingAudio {
    played: Mutex<Vec<(AudioSource, String)>>,
    failing: AtomicBool,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn played(&self) -> Vec<(AudioSource, String)> {
        self.played.lock().clone()
    }
}

impl AudioTrigger for RecordingAudio {
    fn play(&self, source: AudioSource, language: &str) -> Result<(), AudioError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AudioError::Playback("output device unavailable".to_string()));
        }
        self.played.lock().push((source, language.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySummarySink {
    summaries: Mutex<Vec<SessionSummary>>,
    failing: AtomicBool,
}

impl InMemorySummarySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.summaries.lock().clone()
    }
}

#[async_trait]
impl SessionSummarySink for InMemorySummarySink {
    async fn on_session_complete(&self, summary: &SessionSummary) -> Result<(), BackendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected("summary sink offline".to_string()));
        }
        self.summaries.lock().push(summary.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProgressSink {
    saves: Mutex<Vec<ProgressSnapshot>>,
    failing: AtomicBool,
}

impl InMemoryProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn saves(&self) -> Vec<ProgressSnapshot> {
        self.saves.lock().clone()
    }
}

#[async_trait]
impl ProgressSink for InMemoryProgressSink {
    async fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<(), BackendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("progress sink".to_string()));
        }
        self.saves.lock().push(snapshot.clone());
        Ok(())
    }
}
