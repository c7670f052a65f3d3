use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use lexigem_algo::exercise::{
    build_cloze, match_payload, multiple_choice_options, pick_cloze, synthesized_cloze,
};
use lexigem_algo::modes::{canonical_answer, strategy, word_time_limit, AnswerSide, ExerciseKind};
use lexigem_algo::{ClozePayload, ExerciseData, ExercisePayload, Mode, Sentence, VocabularyWord};

use crate::ports::WordCorpus;

/// Builds the exercise for one (word, mode) pair.
///
/// Randomness comes from an owned ChaCha8 generator: entropy-seeded in
/// production, fixed-seeded in tests.
pub struct ExerciseGenerator {
    corpus: Arc<dyn WordCorpus>,
    language: String,
    rng: Mutex<ChaCha8Rng>,
}

impl ExerciseGenerator {
    pub fn new(corpus: Arc<dyn WordCorpus>, language: impl Into<String>) -> Self {
        Self::with_rng(corpus, language, ChaCha8Rng::from_entropy())
    }

    pub fn with_seed(corpus: Arc<dyn WordCorpus>, language: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(corpus, language, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(corpus: Arc<dyn WordCorpus>, language: impl Into<String>, rng: ChaCha8Rng) -> Self {
        Self {
            corpus,
            language: language.into(),
            rng: Mutex::new(rng),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// `pool` is the active word list, used for distractors and match pairs.
    /// Never fails: corpus errors degrade to a synthesized cloze sentence.
    pub async fn generate(
        &self,
        word: &VocabularyWord,
        mode: Mode,
        pool: &[VocabularyWord],
    ) -> ExerciseData {
        let strategy = strategy(mode);

        let payload = match strategy.exercise {
            ExerciseKind::Plain => ExercisePayload::Plain {
                prompt: match strategy.answer {
                    AnswerSide::Source => word.target_text.clone(),
                    _ => word.source_text.clone(),
                },
            },
            ExerciseKind::MultipleChoice => {
                let mut rng = self.rng.lock();
                ExercisePayload::MultipleChoice {
                    options: multiple_choice_options(word, pool, &mut *rng),
                }
            }
            ExerciseKind::Cloze => ExercisePayload::Cloze(self.cloze_for(word).await),
            ExerciseKind::Match => {
                let mut rng = self.rng.lock();
                ExercisePayload::Match(match_payload(word, pool, &mut *rng))
            }
            ExerciseKind::Flashcard => ExercisePayload::Flashcard {
                front: word.source_text.clone(),
                back: word.target_text.clone(),
            },
            ExerciseKind::Timed => ExercisePayload::Timed {
                prompt: word.source_text.clone(),
                time_limit_secs: word_time_limit(word),
            },
        };

        let cloze = match &payload {
            ExercisePayload::Cloze(cloze) => Some(cloze),
            _ => None,
        };

        ExerciseData {
            mode,
            correct_answer: canonical_answer(mode, word, cloze),
            payload,
        }
    }

    async fn cloze_for(&self, word: &VocabularyWord) -> ClozePayload {
        let candidates = match self
            .corpus
            .find_sentence_containing(&word.source_text, &self.language)
            .await
        {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, word_id = %word.id, "sentence lookup failed, synthesizing cloze");
                Vec::new()
            }
        };

        let picked = {
            let mut rng = self.rng.lock();
            pick_cloze(word, &candidates, &mut *rng)
        };
        if let Some(cloze) = picked {
            return cloze;
        }

        if let Some(example) = &word.example_sentence {
            let sentence = Sentence {
                text: example.clone(),
                translation: word.example_translation.clone(),
            };
            if let Some(cloze) = build_cloze(word, &sentence) {
                return cloze;
            }
        }

        debug!(word_id = %word.id, "no usable sentence, synthesizing cloze");
        synthesized_cloze(word, &self.language)
    }
}
