//! Collaborator interfaces consumed by the engine.
//!
//! Every external system (word corpus, attempt history, audio, summary and
//! progress persistence) is reached through one of these traits and injected
//! as `Arc<dyn Trait>` at construction time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lexigem_algo::{Sentence, VocabularyWord};

use crate::error::{AudioError, BackendError};
use crate::session::{ProgressSnapshot, SessionSummary};

#[async_trait]
pub trait WordCorpus: Send + Sync {
    async fn list_words(&self, set_id: &str) -> Result<Vec<VocabularyWord>, BackendError>;

    /// Candidate sentences that contain `word`; may include substring matches
    async fn find_sentence_containing(
        &self,
        word: &str,
        language: &str,
    ) -> Result<Vec<Sentence>, BackendError>;
}

#[async_trait]
pub trait AttemptHistoryStore: Send + Sync {
    async fn last_encountered(&self, word_id: &str) -> Result<Option<DateTime<Utc>>, BackendError>;

    async fn mastery_level(&self, word_id: &str) -> Result<Option<u8>, BackendError>;

    async fn record_attempt(&self, record: &AttemptRecord) -> Result<(), BackendError>;
}

/// Fire-and-forget audio playback
pub trait AudioTrigger: Send + Sync {
    fn play(&self, source: AudioSource, language: &str) -> Result<(), AudioError>;
}

#[async_trait]
pub trait SessionSummarySink: Send + Sync {
    async fn on_session_complete(&self, summary: &SessionSummary) -> Result<(), BackendError>;
}

#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<(), BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AudioSource {
    Reference(String),
    Text(String),
}

impl AudioSource {
    /// The word's audio reference if it has one, else its text for speech synthesis
    pub fn for_word(word: &VocabularyWord) -> Self {
        match &word.audio_ref {
            Some(reference) if !reference.trim().is_empty() => Self::Reference(reference.clone()),
            _ => Self::Text(word.source_text.clone()),
        }
    }
}

/// One attempt as written to the history store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub word_id: String,
    pub is_correct: bool,
    pub hint_used: bool,
    pub response_time_ms: u64,
    pub previous_level: u8,
    pub new_level: u8,
    pub recorded_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
}

/// Result of a recorded (non-throttled) attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryUpdate {
    pub word_id: String,
    pub new_mastery_level: u8,
    pub tier_upgraded: bool,
    pub points_awarded: u32,
    pub next_review_at: DateTime<Utc>,
}
