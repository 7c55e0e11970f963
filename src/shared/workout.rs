//! Workout domain types
//!
//! Shapes exchanged with the workout API: templates and their exercises, recorded
//! sessions, and the drafts the client sends when creating or updating them.
//! Server responses are decoded leniently (`#[serde(default)]`) because the same
//! types are also read back from the local mirror, where offline-created records
//! only carry the fields the client sent.

use crate::shared::error::SharedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /templates` and `PUT /templates/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub exercises: Vec<String>,
}

impl TemplateDraft {
    /// Build a draft from raw form input
    ///
    /// The name and every exercise are trimmed, blank exercises are dropped, and
    /// the result must have a name and at least one exercise.
    pub fn new<I, S>(name: &str, exercises: I) -> Result<Self, SharedError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(SharedError::validation("name", "Please enter a template name"));
        }

        let exercises: Vec<String> = exercises
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if exercises.is_empty() {
            return Err(SharedError::validation(
                "exercises",
                "Please add at least one exercise",
            ));
        }

        Ok(Self {
            name: name.to_string(),
            exercises,
        })
    }
}

/// Template as listed by `GET /templates` or cached in the mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// Server identifier; absent for templates created offline
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    /// Only populated for offline-created templates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<String>,
}

/// Entry of `GET /templates/{id}/exercises`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub order_idx: i64,
}

/// One exercise line of a session being saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExerciseInput {
    pub template_exercise_id: i64,
    pub weight_kg: f64,
    pub reps: i64,
    pub sets: i64,
}

/// Body of `POST /sessions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub template_id: i64,
    /// RFC 3339 start time of the workout
    pub session_date: String,
    pub exercises: Vec<SessionExerciseInput>,
}

impl SessionDraft {
    pub fn new(
        template_id: i64,
        started_at: DateTime<Utc>,
        exercises: Vec<SessionExerciseInput>,
    ) -> Result<Self, SharedError> {
        if exercises.is_empty() {
            return Err(SharedError::validation(
                "exercises",
                "Please enter data for at least one exercise",
            ));
        }
        Ok(Self {
            template_id,
            session_date: started_at.to_rfc3339(),
            exercises,
        })
    }
}

/// Recorded exercise inside a listed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExercise {
    #[serde(default)]
    pub template_exercise_id: Option<i64>,
    #[serde(default)]
    pub exercise_name: Option<String>,
    pub weight_kg: f64,
    pub reps: i64,
    pub sets: i64,
}

/// Session as listed by `GET /sessions` or cached in the mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Server identifier; absent for sessions saved offline
    #[serde(default)]
    pub id: Option<i64>,
    pub template_id: i64,
    #[serde(default)]
    pub template_name: Option<String>,
    pub session_date: String,
    #[serde(default)]
    pub exercises: Vec<SessionExercise>,
}

/// Last recorded values for an exercise (`GET /sessions/latest/{id}`)
///
/// The server answers `{}` when the exercise was never recorded, which decodes to
/// the all-blank default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestSet {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub reps: Option<i64>,
    #[serde(default)]
    pub sets: Option<i64>,
}

/// Exercise of a running workout, prefilled with its last values
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub id: i64,
    pub name: String,
    pub last: LatestSet,
}

/// A workout in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveWorkout {
    pub template_id: i64,
    pub template_name: String,
    pub started_at: DateTime<Utc>,
    pub exercises: Vec<WorkoutExercise>,
}
