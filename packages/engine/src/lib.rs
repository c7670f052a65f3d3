pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod memory;
pub mod persistence;
pub mod ports;
pub mod scheduler;
pub mod session;

pub use config::EngineConfig;
pub use error::{AudioError, BackendError, SessionError};
pub use generator::ExerciseGenerator;
pub use persistence::SaveDebouncer;
pub use scheduler::{AttemptOutcome, SpacedRepetitionScheduler};
pub use session::{Advance, Collaborators, PracticeSession, SessionSummary, TurnOutcome};
