use crate::error::scenario::ScenarioError;
use crate::types::jobs::chaos_job::ChaosJob;
use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::serde_helpers::{chrono_datetime_as_bson_datetime, uuid_1_as_binary};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A stored scenario definition, looked up by its human-assigned name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScenarioItem {
    #[serde(with = "uuid_1_as_binary")]
    pub id: Uuid,
    pub name: String,
    /// YAML list of stages, each stage a list of steps
    pub definition: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ScenarioItem {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        let now = Utc::now().round_subsecs(0);
        Self { id: Uuid::new_v4(), name: name.into(), definition: definition.into(), created_at: now, updated_at: now }
    }
}

/// Stages run strictly one after another, the steps of a stage run concurrently.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Scenario {
    pub stages: Vec<Vec<ChaosJob>>,
}

impl Scenario {
    pub fn new(stages: Vec<Vec<ChaosJob>>) -> Self {
        Self { stages }
    }

    pub fn from_yaml(definition: &str) -> Result<Self, ScenarioError> {
        serde_yaml::from_str(definition).map_err(|e| ScenarioError::MalformedDefinition(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        serde_yaml::to_string(self).map_err(|e| ScenarioError::MalformedDefinition(e.to_string()))
    }

    pub fn jobs(&self) -> impl Iterator<Item = &ChaosJob> {
        self.stages.iter().flatten()
    }

    pub fn jobs_mut(&mut self) -> impl Iterator<Item = &mut ChaosJob> {
        self.stages.iter_mut().flatten()
    }

    pub fn find_job_mut(&mut self, name: &str) -> Option<&mut ChaosJob> {
        self.jobs_mut().find(|job| job.name == name)
    }

    /// Checks the preconditions of a run: step names are unique across all stages and
    /// every step type is one this service can execute.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut seen = HashSet::new();
        for job in self.jobs() {
            if !seen.insert(job.name.as_str()) {
                return Err(ScenarioError::DuplicateStepName(job.name.clone()));
            }
            if !job.job_type.is_supported() {
                return Err(ScenarioError::UnsupportedType(job.job_type.to_string()));
            }
        }
        Ok(())
    }
}
