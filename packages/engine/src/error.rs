use thiserror::Error;

/// Failure reported by a collaborator adapter (corpus, history store, sinks)
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fatal start-up failures; nothing after `start` returns this
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("word set {set_id} is empty")]
    EmptyWordList { set_id: String },
    #[error("failed to load word list")]
    WordList(#[source] BackendError),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio playback unsupported")]
    Unsupported,
    #[error("audio playback failed: {0}")]
    Playback(String),
}
