use std::sync::Arc;

use lexigem_algo::{ExercisePayload, Mode, Sentence, VocabularyWord};

use lexigem_engine::config::EngineConfig;
use lexigem_engine::logging::init_tracing;
use lexigem_engine::memory::{
    InMemoryCorpus, InMemoryHistoryStore, InMemoryProgressSink, InMemorySummarySink,
    RecordingAudio,
};
use lexigem_engine::{Advance, Collaborators, PracticeSession};

const DEMO_SET: &str = "demo";

fn demo_words() -> Vec<VocabularyWord> {
    [
        ("w1", "perro", "dog"),
        ("w2", "gato", "cat"),
        ("w3", "casa", "house"),
        ("w4", "libro", "book"),
        ("w5", "café", "coffee"),
        ("w6", "veinticuatro", "twenty-four"),
    ]
    .into_iter()
    .map(|(id, source, target)| VocabularyWord::new(id, source, target))
    .collect()
}

fn demo_sentences() -> Vec<Sentence> {
    [
        ("El perro duerme en la casa.", "The dog sleeps in the house."),
        ("Mi gato come pescado.", "My cat eats fish."),
        ("Leo un libro cada semana.", "I read a book every week."),
        ("Tomo café por la mañana.", "I drink coffee in the morning."),
    ]
    .into_iter()
    .map(|(text, translation)| Sentence {
        text: text.to_string(),
        translation: Some(translation.to_string()),
    })
    .collect()
}

/// Scripted learner: answers most words correctly, reveals every third one
fn scripted_answer(session: &PracticeSession, turn: usize) -> Option<String> {
    let exercise = session.current_exercise()?;
    if turn % 3 == 2 {
        session.reveal_translation();
    }
    let answer = match &exercise.payload {
        ExercisePayload::MultipleChoice { options } => options
            .iter()
            .find(|option| option.is_correct)
            .map(|option| option.text.clone())?,
        ExercisePayload::Flashcard { .. } => "known".to_string(),
        _ => exercise.correct_answer.clone(),
    };
    Some(answer)
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = EngineConfig::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let mode = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<Mode>().ok())
        .unwrap_or(Mode::Mixed);

    let collaborators = Collaborators {
        corpus: Arc::new(
            InMemoryCorpus::new()
                .with_set(DEMO_SET, demo_words())
                .with_sentences(demo_sentences()),
        ),
        history: Arc::new(InMemoryHistoryStore::new()),
        audio: Arc::new(RecordingAudio::new()),
        summary_sink: Arc::new(InMemorySummarySink::new()),
        progress_sink: Arc::new(InMemoryProgressSink::new()),
    };

    let session = match PracticeSession::start(DEMO_SET, mode, collaborators, config).await {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(error = %err, "failed to start practice session");
            return;
        }
    };

    let mut turn = 0;
    loop {
        let Some(answer) = scripted_answer(&session, turn) else {
            break;
        };
        let Some(outcome) = session.submit(&answer, 1800) else {
            break;
        };
        tracing::info!(
            word = %outcome.context.word_id,
            mode = outcome.context.mode.as_str(),
            feedback = %outcome.feedback,
            "turn"
        );
        turn += 1;

        match session.advance_after_delay(&outcome).await {
            Some(Advance::Next { .. }) => continue,
            Some(Advance::Complete(_)) | None => break,
        }
    }

    session.finish_background().await;
    match serde_json::to_string_pretty(&session.summary()) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(error = %err, "failed to serialize summary"),
    }
}
