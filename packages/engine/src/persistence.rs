//! Debounced progress saves.
//!
//! At most one save reaches the sink per `min_interval`; snapshots offered in
//! between replace each other and only the latest is kept. `flush` writes the
//! pending snapshot, if any, regardless of the interval. Both paths are lossy:
//! a failed save is logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::ports::ProgressSink;
use crate::session::ProgressSnapshot;

#[derive(Default)]
struct DebounceState {
    last_save: Option<Instant>,
    pending: Option<ProgressSnapshot>,
}

pub struct SaveDebouncer {
    sink: Arc<dyn ProgressSink>,
    min_interval: Duration,
    state: Mutex<DebounceState>,
}

impl SaveDebouncer {
    pub fn new(sink: Arc<dyn ProgressSink>, min_interval: Duration) -> Self {
        Self {
            sink,
            min_interval,
            state: Mutex::new(DebounceState::default()),
        }
    }

    /// Save now if the interval has elapsed, otherwise keep as pending
    pub async fn offer(&self, snapshot: ProgressSnapshot) {
        let due = {
            let mut state = self.state.lock();
            let now = Instant::now();
            let due = state
                .last_save
                .map_or(true, |last| now.duration_since(last) >= self.min_interval);
            if due {
                state.last_save = Some(now);
                state.pending = None;
                Some(snapshot)
            } else {
                debug!(index = snapshot.current_index, "progress save coalesced");
                state.pending = Some(snapshot);
                None
            }
        };

        if let Some(snapshot) = due {
            self.save(&snapshot).await;
        }
    }

    pub async fn flush(&self) {
        let pending = {
            let mut state = self.state.lock();
            let pending = state.pending.take();
            if pending.is_some() {
                state.last_save = Some(Instant::now());
            }
            pending
        };

        if let Some(snapshot) = pending {
            self.save(&snapshot).await;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    async fn save(&self, snapshot: &ProgressSnapshot) {
        if let Err(err) = self.sink.save_progress(snapshot).await {
            warn!(
                error = %err,
                session_id = %snapshot.session_id,
                index = snapshot.current_index,
                "progress save failed"
            );
        }
    }
}
