use std::time::Duration;

use lexigem_algo::{ValidatorOptions, THROTTLE_WINDOW_SECS};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Anti-spam window for recording attempts of the same word
    pub throttle_window: Duration,
    pub correct_delay: Duration,
    /// Display window after an incorrect or shown verdict
    pub incorrect_delay: Duration,
    /// Minimum interval between two progress saves
    pub save_interval: Duration,
    pub allow_synonyms: bool,
    /// Source language code of the word list
    pub language: String,
    pub max_audio_replays: u32,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            throttle_window: Duration::from_secs(THROTTLE_WINDOW_SECS),
            correct_delay: Duration::from_millis(1000),
            incorrect_delay: Duration::from_millis(2500),
            save_interval: Duration::from_millis(5000),
            allow_synonyms: true,
            language: "es".to_string(),
            max_audio_replays: 2,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_parse::<u64>("PRACTICE_THROTTLE_SECS") {
            config.throttle_window = Duration::from_secs(secs);
        }
        if let Some(ms) = env_parse::<u64>("PRACTICE_CORRECT_DELAY_MS") {
            config.correct_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("PRACTICE_INCORRECT_DELAY_MS") {
            config.incorrect_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("PRACTICE_SAVE_INTERVAL_MS") {
            config.save_interval = Duration::from_millis(ms);
        }
        if let Some(allow) = env_parse::<bool>("PRACTICE_ALLOW_SYNONYMS") {
            config.allow_synonyms = allow;
        }
        if let Ok(language) = std::env::var("PRACTICE_LANGUAGE") {
            if !language.trim().is_empty() {
                config.language = language.trim().to_lowercase();
            }
        }
        if let Some(replays) = env_parse::<u32>("PRACTICE_MAX_AUDIO_REPLAYS") {
            config.max_audio_replays = replays;
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = level;
        }

        config
    }

    /// Validator options for answers written in `answer_language`
    pub fn validator_options(&self, answer_language: &str) -> ValidatorOptions {
        ValidatorOptions {
            allow_synonyms: self.allow_synonyms,
            language: answer_language.to_string(),
        }
    }

    pub fn advance_delay(&self, counted_correct: bool) -> Duration {
        if counted_correct {
            self.correct_delay
        } else {
            self.incorrect_delay
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.throttle_window, Duration::from_secs(600));
        assert_eq!(config.correct_delay, Duration::from_millis(1000));
        assert_eq!(config.incorrect_delay, Duration::from_millis(2500));
        assert_eq!(config.save_interval, Duration::from_millis(5000));
        assert!(config.allow_synonyms);
        assert_eq!(config.language, "es");
        assert_eq!(config.max_audio_replays, 2);
    }

    #[test]
    fn test_advance_delay() {
        let config = EngineConfig::default();
        assert_eq!(config.advance_delay(true), config.correct_delay);
        assert_eq!(config.advance_delay(false), config.incorrect_delay);
    }

    #[test]
    fn test_validator_options() {
        let config = EngineConfig {
            allow_synonyms: false,
            ..EngineConfig::default()
        };
        let options = config.validator_options("en");
        assert!(!options.allow_synonyms);
        assert_eq!(options.language, "en");
    }
}
