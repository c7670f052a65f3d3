use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lexigem_algo::{is_throttled, next_mastery_level, review_interval_secs, THROTTLE_WINDOW_SECS};

use crate::ports::{AttemptHistoryStore, AttemptRecord, MasteryUpdate};

/// What the session hands over for one attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    pub word_id: String,
    pub is_correct: bool,
    pub response_time_ms: u64,
    pub hint_used: bool,
    /// Level to assume when the store has none for the word
    pub fallback_mastery: u8,
}

pub struct SpacedRepetitionScheduler {
    store: Arc<dyn AttemptHistoryStore>,
    throttle_window: Duration,
    /// Word ids with a read-check-write cycle in progress
    in_flight: Mutex<HashSet<String>>,
}

/// Claim on a word id, released when the attempt finishes or is cancelled
struct InFlight<'a> {
    ids: &'a Mutex<HashSet<String>>,
    word_id: String,
}

impl<'a> InFlight<'a> {
    fn claim(ids: &'a Mutex<HashSet<String>>, word_id: &str) -> Option<Self> {
        if !ids.lock().insert(word_id.to_string()) {
            return None;
        }
        Some(Self {
            ids,
            word_id: word_id.to_string(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.ids.lock().remove(&self.word_id);
    }
}

impl SpacedRepetitionScheduler {
    pub fn new(store: Arc<dyn AttemptHistoryStore>) -> Self {
        Self::with_throttle(store, Duration::from_secs(THROTTLE_WINDOW_SECS))
    }

    pub fn with_throttle(store: Arc<dyn AttemptHistoryStore>, throttle_window: Duration) -> Self {
        Self {
            store,
            throttle_window,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Record an attempt now. Returns `None` when throttled, when another
    /// attempt for the same word is still being recorded, or when the store failed.
    pub async fn record_attempt(&self, attempt: &AttemptOutcome) -> Option<MasteryUpdate> {
        self.record_attempt_at(attempt, Utc::now()).await
    }

    pub async fn record_attempt_at(
        &self,
        attempt: &AttemptOutcome,
        now: DateTime<Utc>,
    ) -> Option<MasteryUpdate> {
        let word_id = attempt.word_id.as_str();

        // A concurrent attempt falls inside the throttle window of the one in progress.
        let Some(_claim) = InFlight::claim(&self.in_flight, word_id) else {
            debug!(word_id, "attempt already in flight, throttled");
            return None;
        };

        match self.store.last_encountered(word_id).await {
            Ok(Some(last)) => {
                let elapsed_ms = (now - last).num_milliseconds();
                if is_throttled(elapsed_ms, self.throttle_window.as_secs()) {
                    debug!(word_id, elapsed_ms, "attempt throttled");
                    return None;
                }
            }
            Ok(None) => {}
            Err(err) => {
                // Without the last timestamp the throttle cannot be honored.
                warn!(error = %err, word_id, "failed to read last encounter, attempt not recorded");
                return None;
            }
        }

        let current = match self.store.mastery_level(word_id).await {
            Ok(level) => level.unwrap_or(attempt.fallback_mastery),
            Err(err) => {
                warn!(error = %err, word_id, "failed to read mastery level, using session level");
                attempt.fallback_mastery
            }
        };

        let step = next_mastery_level(current, attempt.is_correct, attempt.hint_used);
        let counted_correct = attempt.is_correct && !attempt.hint_used;
        let interval = review_interval_secs(step.new_level, counted_correct);
        let next_review_at = now + chrono::Duration::seconds(interval as i64);

        let record = AttemptRecord {
            word_id: attempt.word_id.clone(),
            is_correct: attempt.is_correct,
            hint_used: attempt.hint_used,
            response_time_ms: attempt.response_time_ms,
            previous_level: step.previous_level,
            new_level: step.new_level,
            recorded_at: now,
            next_review_at,
        };

        if let Err(err) = self.store.record_attempt(&record).await {
            warn!(error = %err, word_id, "failed to record attempt");
            return None;
        }

        debug!(
            word_id,
            previous_level = step.previous_level,
            new_level = step.new_level,
            "attempt recorded"
        );

        Some(MasteryUpdate {
            word_id: attempt.word_id.clone(),
            new_mastery_level: step.new_level,
            tier_upgraded: step.tier_upgraded,
            points_awarded: step.points_awarded,
            next_review_at,
        })
    }
}
