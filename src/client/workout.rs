//! # Workout Service
//!
//! Application operations of the tracker expressed over the request gateway:
//! templates, running a workout, saving sessions and browsing history.
//!
//! Mutations go through [`RequestGateway::execute`] and therefore queue while
//! offline. Listings fall back to the local mirror whenever the server cannot
//! provide them, and say so through [`DataSource`].

use crate::client::error::{ClientError, GatewayError, StorageError};
use crate::client::gateway::{Outcome, RequestGateway};
use crate::client::local_db::{MirrorKind, MirrorRecord};
use crate::client::types::ApiMethod;
use crate::shared::{
    ActiveWorkout, LatestSet, SessionDraft, SessionExerciseInput, TemplateDraft, TemplateExercise,
    TemplateSummary, WorkoutExercise, WorkoutSession,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Where a listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    /// Served from the local mirror; may include unsynced records
    Mirror,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub source: DataSource,
}

#[derive(Debug, Clone)]
pub struct WorkoutService {
    gateway: RequestGateway,
}

impl WorkoutService {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }

    /// Templates of the current user, from the server when possible
    pub async fn load_templates(&self) -> Result<Loaded<Vec<TemplateSummary>>, ClientError> {
        match self.fetch_listing(MirrorKind::Template, "/templates", true).await {
            Ok(templates) => Ok(Loaded {
                data: templates,
                source: DataSource::Remote,
            }),
            Err(e) => {
                tracing::warn!("Loading templates from the local mirror: {}", e);
                let data = self.read_mirror(MirrorKind::Template, e).await?;
                Ok(Loaded {
                    data,
                    source: DataSource::Mirror,
                })
            }
        }
    }

    pub async fn template_exercises(
        &self,
        template_id: i64,
    ) -> Result<Vec<TemplateExercise>, ClientError> {
        Ok(self
            .gateway
            .get_json(&format!("/templates/{}/exercises", template_id))
            .await?)
    }

    /// Create a template, or replace `existing_id` with the given name and exercises
    pub async fn save_template<I, S>(
        &self,
        existing_id: Option<i64>,
        name: &str,
        exercises: I,
    ) -> Result<Outcome, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let draft = TemplateDraft::new(name, exercises)?;
        let payload = serde_json::to_value(&draft).map_err(StorageError::from)?;

        let outcome = match existing_id {
            Some(id) => {
                self.gateway
                    .execute(ApiMethod::Put, &format!("/templates/{}", id), Some(payload))
                    .await?
            }
            None => {
                self.gateway
                    .execute(ApiMethod::Post, "/templates", Some(payload))
                    .await?
            }
        };
        Ok(outcome)
    }

    pub async fn delete_template(&self, template_id: i64) -> Result<Outcome, ClientError> {
        Ok(self
            .gateway
            .execute(ApiMethod::Delete, &format!("/templates/{}", template_id), None)
            .await?)
    }

    /// Begin a workout from a template, prefilled with each exercise's last values
    ///
    /// A missing or failing last-values lookup leaves that exercise blank; it
    /// never prevents the workout from starting.
    pub async fn start_workout(&self, template_id: i64) -> Result<ActiveWorkout, ClientError> {
        let templates: Vec<TemplateSummary> = self.gateway.get_json("/templates").await?;
        let template = templates
            .into_iter()
            .find(|t| t.id == Some(template_id))
            .ok_or_else(|| ClientError::NotFound(format!("template {}", template_id)))?;

        let mut exercises = Vec::new();
        for exercise in self.template_exercises(template_id).await? {
            let last = match self
                .gateway
                .get_json::<LatestSet>(&format!("/sessions/latest/{}", exercise.id))
                .await
            {
                Ok(last) => last,
                Err(e) => {
                    tracing::debug!("No previous values for {}: {}", exercise.name, e);
                    LatestSet::default()
                }
            };
            exercises.push(WorkoutExercise {
                id: exercise.id,
                name: exercise.name,
                last,
            });
        }

        Ok(ActiveWorkout {
            template_id,
            template_name: template.name,
            started_at: chrono::Utc::now(),
            exercises,
        })
    }

    /// Record a finished workout; `session_date` is the time it started
    pub async fn save_session(
        &self,
        workout: &ActiveWorkout,
        entries: Vec<SessionExerciseInput>,
    ) -> Result<Outcome, ClientError> {
        let draft = SessionDraft::new(workout.template_id, workout.started_at, entries)?;
        let payload = serde_json::to_value(&draft).map_err(StorageError::from)?;
        Ok(self
            .gateway
            .execute(ApiMethod::Post, "/sessions", Some(payload))
            .await?)
    }

    /// Session history, optionally restricted to one template
    pub async fn load_history(
        &self,
        template_filter: Option<i64>,
    ) -> Result<Loaded<Vec<WorkoutSession>>, ClientError> {
        let path = match template_filter {
            Some(id) => format!("/sessions?template={}", id),
            None => "/sessions".to_string(),
        };

        // A filtered listing is partial and must not replace the mirror
        match self
            .fetch_listing(MirrorKind::Session, &path, template_filter.is_none())
            .await
        {
            Ok(sessions) => Ok(Loaded {
                data: sessions,
                source: DataSource::Remote,
            }),
            Err(e) => {
                tracing::warn!("Loading history from the local mirror: {}", e);
                let mut sessions: Vec<WorkoutSession> =
                    self.read_mirror(MirrorKind::Session, e).await?;
                if let Some(id) = template_filter {
                    sessions.retain(|s| s.template_id == id);
                }
                Ok(Loaded {
                    data: sessions,
                    source: DataSource::Mirror,
                })
            }
        }
    }

    pub async fn delete_session(&self, session_id: i64) -> Result<Outcome, ClientError> {
        Ok(self
            .gateway
            .execute(ApiMethod::Delete, &format!("/sessions/{}", session_id), None)
            .await?)
    }

    async fn fetch_listing<T: DeserializeOwned>(
        &self,
        kind: MirrorKind,
        path: &str,
        refresh_mirror: bool,
    ) -> Result<Vec<T>, ClientError> {
        let records: Vec<Value> = self.gateway.get_json(path).await?;

        if refresh_mirror {
            if let Some(owner) = self.gateway.context().user_id().await {
                if let Err(e) = self
                    .gateway
                    .mirror()
                    .upsert_from_remote(kind, &owner, &records)
                    .await
                {
                    tracing::error!("Failed to refresh {} mirror: {}", kind, e);
                }
            }
        }

        records
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|e| {
                    ClientError::from(GatewayError::InvalidResponse(format!("GET {}: {}", path, e)))
                })
            })
            .collect()
    }

    // Without a logged-in user there is no mirror to read, so the remote error stands
    async fn read_mirror<T: DeserializeOwned>(
        &self,
        kind: MirrorKind,
        remote_error: ClientError,
    ) -> Result<Vec<T>, ClientError> {
        let Some(owner) = self.gateway.context().user_id().await else {
            return Err(remote_error);
        };
        let records = self.gateway.mirror().read_for_user(kind, &owner).await?;
        Ok(decode_records(&records))
    }
}

fn decode_records<T: DeserializeOwned>(records: &[MirrorRecord]) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match record.decode() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    "Skipping unreadable {} record {}: {}",
                    record.kind,
                    record.local_id,
                    e
                );
                None
            }
        })
        .collect()
}
