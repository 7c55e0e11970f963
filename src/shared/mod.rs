//! Shared Module
//!
//! Platform-agnostic types of the workout tracker: the domain shapes exchanged
//! with the API, configuration, and the errors they can raise.

/// Application configuration
pub mod config;

/// Shared error types
pub mod error;

/// Templates, sessions and drafts
pub mod workout;

pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use workout::{
    ActiveWorkout, LatestSet, SessionDraft, SessionExercise, SessionExerciseInput, TemplateDraft,
    TemplateExercise, TemplateSummary, WorkoutExercise, WorkoutSession,
};
