//! End-to-end session flows against the in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use lexigem_algo::{ExercisePayload, Mode, VocabularyWord};
use lexigem_engine::memory::{
    InMemoryCorpus, InMemoryHistoryStore, InMemoryProgressSink, InMemorySummarySink,
    RecordingAudio,
};
use lexigem_engine::session::{Phase, Tally};
use lexigem_engine::{Advance, Collaborators, EngineConfig, PracticeSession, SessionError};

// ============================================================================
// Helpers
// ============================================================================

struct Harness {
    corpus: Arc<InMemoryCorpus>,
    history: Arc<InMemoryHistoryStore>,
    summaries: Arc<InMemorySummarySink>,
    progress: Arc<InMemoryProgressSink>,
}

impl Harness {
    fn new(words: Vec<VocabularyWord>) -> Self {
        Self {
            corpus: Arc::new(InMemoryCorpus::new().with_set("set", words)),
            history: Arc::new(InMemoryHistoryStore::new()),
            summaries: Arc::new(InMemorySummarySink::new()),
            progress: Arc::new(InMemoryProgressSink::new()),
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            corpus: self.corpus.clone(),
            history: self.history.clone(),
            audio: Arc::new(RecordingAudio::new()),
            summary_sink: self.summaries.clone(),
            progress_sink: self.progress.clone(),
        }
    }

    async fn start(&self, mode: Mode) -> PracticeSession {
        self.start_with(mode, EngineConfig::default()).await
    }

    async fn start_with(&self, mode: Mode, config: EngineConfig) -> PracticeSession {
        PracticeSession::start_seeded("set", mode, self.collaborators(), config, 42)
            .await
            .expect("session should start")
    }
}

fn five_words() -> Vec<VocabularyWord> {
    [
        ("1", "perro", "dog"),
        ("2", "gato", "cat"),
        ("3", "casa", "house"),
        ("4", "libro", "book"),
        ("5", "mesa", "table"),
    ]
    .into_iter()
    .map(|(id, source, target)| VocabularyWord::new(id, source, target))
    .collect()
}

fn correct_answer(session: &PracticeSession) -> String {
    let exercise = session.current_exercise().expect("exercise presented");
    match &exercise.payload {
        ExercisePayload::MultipleChoice { options } => options
            .iter()
            .find(|option| option.is_correct)
            .map(|option| option.text.clone())
            .expect("one correct option"),
        _ => exercise.correct_answer,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_all_correct_session_completes() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Typing).await;

    let mut summary = None;
    for _ in 0..5 {
        let answer = correct_answer(&session);
        let outcome = session.submit(&answer, 3000).expect("accepted");
        assert_eq!(outcome.tally, Tally::Correct);
        assert_eq!(outcome.feedback, "Correct!");

        match session.advance(outcome.advance).await {
            Some(Advance::Next { .. }) => {}
            Some(Advance::Complete(done)) => summary = Some(done),
            None => panic!("advance dropped"),
        }
    }
    session.finish_background().await;

    let summary = summary.expect("session completed");
    assert!(summary.completed);
    assert_eq!(summary.correct_count, 5);
    assert_eq!(summary.incorrect_count, 0);
    assert_eq!(summary.gems_collected, 5);
    assert_eq!(summary.accuracy, 100.0);
    assert_eq!(summary.score, 50);
    assert_eq!(summary.total_words, 5);
    assert_eq!(summary.words_learned.len(), 5);

    let state = session.state();
    assert_eq!(state.phase, Phase::Complete);
    assert_eq!(state.current_index, 5);
    assert!(session.submit("dog", 1000).is_none());

    assert_eq!(harness.summaries.summaries(), vec![summary]);
    assert_eq!(harness.history.records().len(), 5);
}

#[tokio::test]
async fn test_streak_through_hint_and_miss() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Typing).await;

    let mut streaks = Vec::new();
    for turn in 0..5 {
        let answer = match turn {
            2 => {
                session.reveal_translation().expect("revealed");
                correct_answer(&session)
            }
            3 => "banana".to_string(),
            _ => correct_answer(&session),
        };
        let outcome = session.submit(&answer, 3000).expect("accepted");
        streaks.push(outcome.streak);
        session.advance(outcome.advance).await;
    }
    session.finish_background().await;

    assert_eq!(streaks, vec![1, 2, 2, 0, 1]);
    let summary = session.summary();
    assert_eq!(summary.max_streak, 2);
    assert_eq!(summary.correct_count, 3);
    assert_eq!(summary.incorrect_count, 1);
    assert_eq!(summary.shown_count, 1);
    assert_eq!(summary.accuracy, 75.0);
    assert!(summary.correct_count + summary.incorrect_count <= summary.total_words as u32);
}

#[tokio::test]
async fn test_duplicate_submission_mutates_once() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Typing).await;

    assert!(session.submit("dog", 1234).is_some());
    let after_first = session.state();
    assert!(session.submit("dog", 1234).is_none());
    assert_eq!(session.state(), after_first);
    assert_eq!(after_first.correct_count, 1);

    session.finish_background().await;
    assert_eq!(harness.history.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_double_fired_advance_moves_once() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Typing).await;

    let outcome = session.submit("dog", 1500).expect("accepted");
    let (first, second) = tokio::join!(
        session.advance_after_delay(&outcome),
        session.advance_after_delay(&outcome)
    );
    assert_eq!(first.is_some() as u8 + second.is_some() as u8, 1);
    assert_eq!(session.state().current_index, 1);
    session.finish_background().await;
}

#[tokio::test(start_paused = true)]
async fn test_advance_waits_for_display_window() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Typing).await;

    let outcome = session.submit("wrong", 1500).expect("accepted");
    assert_eq!(outcome.advance_delay, Duration::from_millis(2500));

    let started = tokio::time::Instant::now();
    assert!(session.advance_after_delay(&outcome).await.is_some());
    assert!(started.elapsed() >= Duration::from_millis(2500));
    session.finish_background().await;
}

#[tokio::test(start_paused = true)]
async fn test_speed_timer_submits_empty_answer() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Speed).await;

    let limit = session
        .current_exercise()
        .and_then(|exercise| exercise.time_limit_secs())
        .expect("timed exercise");

    let outcome = session.run_countdown().await.expect("timer expired");
    assert_eq!(outcome.context.raw_input, "");
    assert_eq!(outcome.context.response_time_ms, u64::from(limit) * 1000);
    assert_eq!(outcome.tally, Tally::Incorrect);
    assert_eq!(outcome.feedback, "Incorrect. The answer is: dog");

    // The learner's late click lands after the timer and is dropped.
    assert!(session.submit("dog", 4000).is_none());
    assert_eq!(session.state().incorrect_count, 1);
    assert_eq!(session.state().correct_count, 0);
    session.finish_background().await;
}

#[tokio::test]
async fn test_manual_submit_beats_timer() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Speed).await;

    assert!(session.submit("dog", 1200).is_some());
    assert!(session.tick(60).is_none());
    let state = session.state();
    assert_eq!(state.correct_count, 1);
    assert_eq!(state.incorrect_count, 0);
    session.finish_background().await;
}

#[tokio::test]
async fn test_replayed_word_within_window_is_throttled() {
    let harness = Harness::new(five_words());

    let first = harness.start(Mode::Typing).await;
    first.submit("dog", 1500).expect("accepted");
    first.finish_background().await;

    let second = harness.start(Mode::Typing).await;
    let outcome = second.submit("dog", 1500).expect("accepted");
    second.finish_background().await;

    assert_eq!(outcome.tally, Tally::Correct);
    assert_eq!(harness.history.records().len(), 1);
    assert_eq!(harness.history.level_of("1"), Some(1));
}

#[tokio::test]
async fn test_mastery_never_decreases_across_sessions() {
    let harness = Harness::new(vec![VocabularyWord::new("1", "perro", "dog")]);
    let config = EngineConfig {
        throttle_window: Duration::ZERO,
        ..EngineConfig::default()
    };

    let mut levels = Vec::new();
    for answer in ["dog", "cat", "dog", "dog"] {
        let session = harness.start_with(Mode::Typing, config.clone()).await;
        session.submit(answer, 2500).expect("accepted");
        session.finish_background().await;
        levels.push(harness.history.level_of("1").expect("recorded"));
    }

    assert_eq!(levels, vec![1, 1, 2, 3]);
}

#[tokio::test]
async fn test_multiple_choice_session() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::MultipleChoice).await;

    for _ in 0..5 {
        let exercise = session.current_exercise().expect("exercise");
        let options = exercise.options();
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|option| option.is_correct).count(), 1);

        let answer = correct_answer(&session);
        let outcome = session.submit(&answer, 1500).expect("accepted");
        assert_eq!(outcome.tally, Tally::Correct);
        session.advance(outcome.advance).await;
    }
    session.finish_background().await;
    assert_eq!(session.summary().correct_count, 5);
}

#[tokio::test]
async fn test_mixed_rotates_modes() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Mixed).await;

    let mut modes = Vec::new();
    for _ in 0..5 {
        modes.push(session.state().current_mode);
        let answer = correct_answer(&session);
        let outcome = session.submit(&answer, 2500).expect("accepted");
        assert_eq!(outcome.tally, Tally::Correct, "{:?}", outcome.context.mode);
        session.advance(outcome.advance).await;
    }
    session.finish_background().await;

    assert_eq!(
        modes,
        vec![
            Mode::MultipleChoice,
            Mode::Typing,
            Mode::Listening,
            Mode::Cloze,
            Mode::Flashcards,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_progress_saves_are_debounced_and_flushed() {
    let harness = Harness::new(five_words());
    let session = harness.start(Mode::Typing).await;

    for _ in 0..5 {
        let answer = correct_answer(&session);
        let outcome = session.submit(&answer, 2000).expect("accepted");
        session.finish_background().await;
        session.advance(outcome.advance).await;
    }
    session.finish_background().await;

    let saves = harness.progress.saves();
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[0].correct_count, 1);
    assert_eq!(saves[1].correct_count, 5);
}

#[tokio::test]
async fn test_backend_failures_are_invisible() {
    let harness = Harness::new(five_words());
    harness.history.set_failing(true);
    harness.summaries.set_failing(true);
    harness.progress.set_failing(true);
    let session = harness.start(Mode::Typing).await;

    let mut last = None;
    for _ in 0..5 {
        let answer = correct_answer(&session);
        let outcome = session.submit(&answer, 2000).expect("accepted");
        last = session.advance(outcome.advance).await;
    }
    session.finish_background().await;

    assert!(matches!(last, Some(Advance::Complete(ref summary)) if summary.correct_count == 5));
    assert!(harness.history.records().is_empty());
}

#[tokio::test]
async fn test_empty_word_list_fails_to_start() {
    let harness = Harness::new(Vec::new());
    let result =
        PracticeSession::start("set", Mode::Typing, harness.collaborators(), EngineConfig::default())
            .await;
    assert!(matches!(result, Err(SessionError::EmptyWordList { .. })));

    let result = PracticeSession::start(
        "missing",
        Mode::Typing,
        harness.collaborators(),
        EngineConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(SessionError::WordList(_))));
}
