//! # lexigem-algo - vocabulary practice core algorithms
//!
//! Pure, synchronous building blocks of a practice session:
//!
//! - **Answer validation** - tolerant comparison of free-text answers
//! - **Gem rewards** - rarity tier and XP per attempt
//! - **Mastery progression** - per-word level, review intervals, throttle window
//! - **Mode dispatch** - one table from presentation mode to exercise/answer strategy
//! - **Exercise payloads** - distractors, cloze sentences, match pairs
//!
//! ## Modules
//!
//! - [`validator`] - `validate`, alternatives, number words, contractions
//! - [`reward`] - `rarity_for`, `xp_for`
//! - [`mastery`] - `next_mastery_level`, `review_interval_secs`
//! - [`modes`] - `strategy`, `resolve_mode`, `canonical_answer`
//! - [`exercise`] - payload builders taking an injected RNG
//! - [`sanitize`] - text normalization helpers
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use lexigem_algo::{validate, GemTier, Mode, RewardInput, rarity_for};
//!
//! let verdict = validate("cafe", "café");
//! assert!(verdict.is_correct && verdict.accent_mismatch_only);
//!
//! let tier = rarity_for(&RewardInput {
//!     is_correct: true,
//!     response_time_ms: 3000,
//!     streak: 1,
//!     hint_used: false,
//!     mode: Mode::MultipleChoice,
//!     prior_mastery_level: 2,
//! });
//! assert_eq!(tier, Some(GemTier::Rare));
//! ```

pub mod exercise;
pub mod mastery;
pub mod modes;
pub mod reward;
pub mod sanitize;
pub mod types;
pub mod validator;

pub use types::*;

pub use mastery::{
    is_throttled, next_mastery_level, review_interval_secs, MasteryStep, THROTTLE_WINDOW_SECS,
};
pub use modes::{canonical_answer, resolve_mode, strategy, ModeStrategy};
pub use reward::{rarity_for, reward_for, xp_for, Reward, RewardInput};
pub use validator::{similarity, validate, validate_for_mode, validate_with, ValidatorOptions};
