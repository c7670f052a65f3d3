//! Practice Session State Machine
//!
//! `Loading -> Presenting -> Submitted -> Advancing -> Presenting | Complete`
//!
//! One submission is accepted per presented word. Submissions are keyed by
//! `(word_index, raw_input, response_time_ms)` and dropped when the key was
//! already processed or the answer is already showing. Scheduler writes and
//! progress saves run in the background and never block a turn. Background
//! tasks are detached: dropping the session lets in-flight writes finish.
//!
//! The session never advances on its own. After an accepted submission the
//! caller drives `Submitted -> Advancing` exactly once, either with
//! `advance_after_delay(&outcome)` or by waiting `outcome.advance_delay` and
//! calling `advance(outcome.advance)`.

mod state;
mod summary;

pub use state::{feedback, AdvanceToken, Phase, SessionState, Tally, POINTS_PER_CORRECT};
pub use summary::{accuracy, ProgressSnapshot, SessionSummary};

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use lexigem_algo::modes::{resolve_mode, strategy, AnswerSide};
use lexigem_algo::{
    reward_for, validate_for_mode, AttemptContext, ExerciseData, Mode, Reward, RewardInput,
    Validation, VocabularyWord,
};

use crate::config::EngineConfig;
use crate::error::SessionError;
use crate::generator::ExerciseGenerator;
use crate::persistence::SaveDebouncer;
use crate::ports::{
    AttemptHistoryStore, AudioSource, AudioTrigger, MasteryUpdate, ProgressSink,
    SessionSummarySink, WordCorpus,
};
use crate::scheduler::{AttemptOutcome, SpacedRepetitionScheduler};

/// Language of target-side answers (translations)
const TARGET_LANGUAGE: &str = "en";

/// External systems a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub corpus: Arc<dyn WordCorpus>,
    pub history: Arc<dyn AttemptHistoryStore>,
    pub audio: Arc<dyn AudioTrigger>,
    pub summary_sink: Arc<dyn SessionSummarySink>,
    pub progress_sink: Arc<dyn ProgressSink>,
}

/// Verdict of one accepted submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub context: AttemptContext,
    pub validation: Validation,
    pub tally: Tally,
    pub reward: Option<Reward>,
    pub correct_answer: String,
    pub feedback: String,
    pub streak: u32,
    /// Token for the single advance out of `Submitted`. Until it is passed to
    /// `advance` the session stays on this word with the answer showing.
    pub advance: AdvanceToken,
    /// How long the verdict stays on screen before `advance` should run
    pub advance_delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Next { index: usize, exercise: ExerciseData },
    Complete(SessionSummary),
}

pub struct PracticeSession {
    id: Uuid,
    set_id: String,
    mode: Mode,
    words: Vec<VocabularyWord>,
    config: EngineConfig,
    generator: ExerciseGenerator,
    scheduler: Arc<SpacedRepetitionScheduler>,
    saver: Arc<SaveDebouncer>,
    audio: Arc<dyn AudioTrigger>,
    summary_sink: Arc<dyn SessionSummarySink>,
    state: Mutex<SessionState>,
    mastery_updates: Arc<Mutex<HashMap<String, MasteryUpdate>>>,
    background: Mutex<Vec<JoinHandle<()>>>,
    started_at: Instant,
}

impl PracticeSession {
    pub async fn start(
        set_id: &str,
        mode: Mode,
        collaborators: Collaborators,
        config: EngineConfig,
    ) -> Result<Self, SessionError> {
        let generator = ExerciseGenerator::new(collaborators.corpus.clone(), config.language.clone());
        Self::start_with_generator(set_id, mode, collaborators, config, generator).await
    }

    /// Start with a fixed RNG seed for distractor and sentence selection
    pub async fn start_seeded(
        set_id: &str,
        mode: Mode,
        collaborators: Collaborators,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, SessionError> {
        let generator =
            ExerciseGenerator::with_seed(collaborators.corpus.clone(), config.language.clone(), seed);
        Self::start_with_generator(set_id, mode, collaborators, config, generator).await
    }

    async fn start_with_generator(
        set_id: &str,
        mode: Mode,
        collaborators: Collaborators,
        config: EngineConfig,
        generator: ExerciseGenerator,
    ) -> Result<Self, SessionError> {
        let words = collaborators
            .corpus
            .list_words(set_id)
            .await
            .map_err(SessionError::WordList)?;
        if words.is_empty() {
            return Err(SessionError::EmptyWordList {
                set_id: set_id.to_string(),
            });
        }

        let scheduler = Arc::new(SpacedRepetitionScheduler::with_throttle(
            collaborators.history.clone(),
            config.throttle_window,
        ));
        let saver = Arc::new(SaveDebouncer::new(
            collaborators.progress_sink.clone(),
            config.save_interval,
        ));

        let session = Self {
            id: Uuid::new_v4(),
            set_id: set_id.to_string(),
            mode,
            words,
            config,
            generator,
            scheduler,
            saver,
            audio: collaborators.audio,
            summary_sink: collaborators.summary_sink,
            state: Mutex::new(SessionState::new(resolve_mode(mode, 0))),
            mastery_updates: Arc::new(Mutex::new(HashMap::new())),
            background: Mutex::new(Vec::new()),
            started_at: Instant::now(),
        };

        let first_mode = resolve_mode(mode, 0);
        let exercise = session
            .generator
            .generate(&session.words[0], first_mode, &session.words)
            .await;
        session.state.lock().present(0, first_mode, exercise);
        session.announce(0, first_mode);

        info!(
            session_id = %session.id,
            set_id = %session.set_id,
            mode = mode.as_str(),
            total_words = session.words.len(),
            "practice session started"
        );

        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Copy of the current state
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn current_word(&self) -> Option<&VocabularyWord> {
        let index = self.state.lock().current_index;
        self.words.get(index)
    }

    pub fn current_exercise(&self) -> Option<ExerciseData> {
        self.state.lock().exercise.clone()
    }

    /// Submit an answer for the presented word. Returns `None` when the
    /// submission was dropped (duplicate, answer already showing, not presenting).
    pub fn submit(&self, raw_input: &str, response_time_ms: u64) -> Option<TurnOutcome> {
        let (outcome, snapshot) = {
            let mut state = self.state.lock();

            if !state.accepts_input() {
                debug!(phase = ?state.phase, show_answer = state.show_answer, "submission ignored");
                return None;
            }

            let index = state.current_index;
            let Some(word) = self.words.get(index) else {
                debug!(index, "submission for out-of-range word ignored");
                return None;
            };
            let Some(exercise) = state.exercise.clone() else {
                debug!(index, "submission without an exercise ignored");
                return None;
            };

            let context = AttemptContext {
                word_index: index,
                word_id: word.id.clone(),
                mode: state.current_mode,
                raw_input: raw_input.to_string(),
                response_time_ms,
                hint_used: state.translation_shown,
                current_streak: state.streak,
                prior_mastery_level: word.mastery_level,
            };

            let key = context.key();
            if state.last_processed_key.as_ref() == Some(&key) {
                debug!(index, "duplicate submission dropped");
                return None;
            }

            let answer_language = match strategy(context.mode).answer {
                AnswerSide::Target => TARGET_LANGUAGE,
                _ => self.config.language.as_str(),
            };
            let validation = validate_for_mode(
                context.mode,
                raw_input,
                &exercise.correct_answer,
                &self.config.validator_options(answer_language),
            );
            let tally = Tally::of(validation, context.hint_used);
            let reward = match tally {
                Tally::Correct => reward_for(&RewardInput {
                    is_correct: true,
                    response_time_ms,
                    streak: context.current_streak,
                    hint_used: false,
                    mode: context.mode,
                    prior_mastery_level: context.prior_mastery_level,
                }),
                _ => None,
            };

            state.apply(&word.id, tally, reward);
            state.show_answer = true;
            state.phase = Phase::Submitted;
            state.last_processed_key = Some(key);
            state.turns += 1;

            let advance = AdvanceToken {
                word_index: index,
                turn: state.turns,
            };
            state.pending_advance = Some(advance);

            debug!(
                index,
                word_id = %word.id,
                tally = ?tally,
                streak = state.streak,
                "submission processed"
            );

            let outcome = TurnOutcome {
                feedback: feedback(tally, validation, raw_input, &exercise.correct_answer),
                correct_answer: exercise.correct_answer,
                validation,
                tally,
                reward,
                streak: state.streak,
                advance,
                advance_delay: self.config.advance_delay(tally == Tally::Correct),
                context,
            };
            (outcome, self.snapshot(&state))
        };

        self.dispatch_record(&outcome);
        let saver = self.saver.clone();
        self.spawn_background(async move { saver.offer(snapshot).await });

        Some(outcome)
    }

    /// Reveal the answer before submitting; the next submission counts as shown
    pub fn reveal_translation(&self) -> Option<String> {
        let mut state = self.state.lock();
        if !state.accepts_input() {
            return None;
        }
        state.translation_shown = true;
        debug!(index = state.current_index, "translation revealed");
        state.exercise.as_ref().map(|exercise| exercise.correct_answer.clone())
    }

    /// Count down a timed exercise. When the time runs out an empty answer is
    /// submitted through `submit`.
    pub fn tick(&self, elapsed_secs: u32) -> Option<TurnOutcome> {
        let expired = {
            let mut state = self.state.lock();
            if !state.accepts_input() {
                return None;
            }
            let time_left = state.time_left_secs?;
            let remaining = time_left.saturating_sub(elapsed_secs);
            state.time_left_secs = Some(remaining);
            remaining == 0
        };

        if !expired {
            return None;
        }
        let limit_ms = self
            .current_exercise()
            .and_then(|exercise| exercise.time_limit_secs())
            .map_or(0, |secs| u64::from(secs) * 1000);
        debug!("time limit reached");
        self.submit("", limit_ms)
    }

    /// Drive `tick` once per second until the presented word is answered
    pub async fn run_countdown(&self) -> Option<TurnOutcome> {
        let index = self.state.lock().current_index;
        loop {
            {
                let state = self.state.lock();
                if state.current_index != index
                    || !state.accepts_input()
                    || state.time_left_secs.is_none()
                {
                    return None;
                }
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
            if let Some(outcome) = self.tick(1) {
                return Some(outcome);
            }
        }
    }

    /// Replay the word's audio, limited per word
    pub fn replay_audio(&self) -> bool {
        let (index, mode) = {
            let mut state = self.state.lock();
            if state.phase != Phase::Presenting
                || !strategy(state.current_mode).plays_audio
                || state.audio_replays >= self.config.max_audio_replays
            {
                return false;
            }
            state.audio_replays += 1;
            (state.current_index, state.current_mode)
        };
        self.announce(index, mode);
        true
    }

    /// Leave `Submitted` for the next word or `Complete`. Only the pending
    /// token advances; any other or repeated token is ignored.
    pub async fn advance(&self, token: AdvanceToken) -> Option<Advance> {
        let next_index = {
            let mut state = self.state.lock();
            if state.phase != Phase::Submitted || state.pending_advance != Some(token) {
                debug!(?token, "stale advance ignored");
                return None;
            }
            state.pending_advance = None;

            if state.current_index + 1 >= self.words.len() {
                state.current_index = self.words.len();
                state.phase = Phase::Complete;
                None
            } else {
                state.phase = Phase::Advancing;
                Some(state.current_index + 1)
            }
        };

        let Some(next_index) = next_index else {
            let summary = self.summary();
            self.finish(&summary);
            return Some(Advance::Complete(summary));
        };

        let mode = resolve_mode(self.mode, next_index);
        let exercise = self
            .generator
            .generate(&self.words[next_index], mode, &self.words)
            .await;

        {
            let mut state = self.state.lock();
            if state.phase != Phase::Advancing {
                return None;
            }
            state.present(next_index, mode, exercise.clone());
        }
        self.announce(next_index, mode);
        debug!(index = next_index, mode = mode.as_str(), "presenting next word");

        Some(Advance::Next {
            index: next_index,
            exercise,
        })
    }

    /// Wait out the display window of a turn, then advance
    pub async fn advance_after_delay(&self, outcome: &TurnOutcome) -> Option<Advance> {
        tokio::time::sleep(outcome.advance_delay).await;
        self.advance(outcome.advance).await
    }

    /// Stop the session early. Flushes pending progress and returns a partial summary.
    pub async fn exit(&self) -> SessionSummary {
        let was_active = {
            let mut state = self.state.lock();
            let was_active = state.phase != Phase::Complete;
            state.phase = Phase::Complete;
            state.pending_advance = None;
            was_active
        };
        if was_active {
            info!(session_id = %self.id, "practice session exited");
        }
        self.saver.flush().await;
        self.summary()
    }

    /// Wait for every background write dispatched so far
    pub async fn finish_background(&self) {
        let tasks = std::mem::take(&mut *self.background.lock());
        for task in tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "background task failed");
            }
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.state.lock();
        let tier_upgrades = self
            .mastery_updates
            .lock()
            .values()
            .filter(|update| update.tier_upgraded)
            .count() as u32;

        SessionSummary {
            session_id: self.id,
            set_id: self.set_id.clone(),
            completed: state.phase == Phase::Complete && state.current_index == self.words.len(),
            score: state.score,
            accuracy: accuracy(state.correct_count, state.incorrect_count),
            correct_count: state.correct_count,
            incorrect_count: state.incorrect_count,
            shown_count: state.shown_count,
            total_words: self.words.len(),
            gems_collected: state.gems_collected,
            gem_tally_by_tier: state.gem_tally_by_tier.clone(),
            max_streak: state.max_streak,
            xp_earned: state.xp_earned,
            words_learned: state.words_learned.clone(),
            words_struggling: state.words_struggling.clone(),
            tier_upgrades,
            duration_ms: self.started_at.elapsed().as_millis() as u64,
        }
    }

    fn snapshot(&self, state: &SessionState) -> ProgressSnapshot {
        ProgressSnapshot {
            session_id: self.id,
            set_id: self.set_id.clone(),
            current_index: state.current_index,
            total_words: self.words.len(),
            score: state.score,
            correct_count: state.correct_count,
            incorrect_count: state.incorrect_count,
            streak: state.streak,
            max_streak: state.max_streak,
            gems_collected: state.gems_collected,
            xp_earned: state.xp_earned,
        }
    }

    fn dispatch_record(&self, outcome: &TurnOutcome) {
        let counted = outcome.tally != Tally::Shown;
        let attempt = AttemptOutcome {
            word_id: outcome.context.word_id.clone(),
            is_correct: counted && outcome.validation.is_correct,
            response_time_ms: outcome.context.response_time_ms,
            hint_used: !counted,
            fallback_mastery: outcome.context.prior_mastery_level,
        };
        let scheduler = self.scheduler.clone();
        let updates = self.mastery_updates.clone();

        self.spawn_background(async move {
            if let Some(update) = scheduler.record_attempt(&attempt).await {
                updates.lock().insert(update.word_id.clone(), update);
            }
        });
    }

    fn finish(&self, summary: &SessionSummary) {
        info!(
            session_id = %summary.session_id,
            score = summary.score,
            accuracy = summary.accuracy,
            correct = summary.correct_count,
            incorrect = summary.incorrect_count,
            gems = summary.gems_collected,
            max_streak = summary.max_streak,
            "practice session complete"
        );

        let saver = self.saver.clone();
        let sink = self.summary_sink.clone();
        let summary = summary.clone();
        self.spawn_background(async move {
            saver.flush().await;
            if let Err(err) = sink.on_session_complete(&summary).await {
                warn!(error = %err, session_id = %summary.session_id, "session summary not delivered");
            }
        });
    }

    fn announce(&self, index: usize, mode: Mode) {
        if !strategy(mode).plays_audio {
            return;
        }
        let Some(word) = self.words.get(index) else {
            return;
        };
        if let Err(err) = self
            .audio
            .play(AudioSource::for_word(word), &self.config.language)
        {
            warn!(error = %err, word_id = %word.id, "audio playback failed");
        }
    }

    fn spawn_background<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(handle) => {
                let mut tasks = self.background.lock();
                tasks.retain(|task| !task.is_finished());
                tasks.push(handle.spawn(task));
            }
            Err(_) => warn!(session_id = %self.id, "no async runtime, background write dropped"),
        }
    }
}
