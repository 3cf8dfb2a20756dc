use crate::error::status::StatusError;
use crate::types::scenario::Scenario;
use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::serde_helpers::{chrono_datetime_as_bson_datetime, uuid_1_as_binary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted progress of one run.
///
/// `status` holds the whole scenario tree serialized as YAML. It is only ever replaced as
/// a whole, guarded by `version`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RunStatusItem {
    /// the run id
    #[serde(with = "uuid_1_as_binary")]
    pub id: Uuid,
    #[serde(with = "uuid_1_as_binary")]
    pub scenario_id: Uuid,
    pub status: String,
    /// helps to keep track of the version of the item for optimistic locking
    pub version: i32,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl RunStatusItem {
    pub fn new(scenario_id: Uuid, status: String) -> Self {
        let now = Utc::now().round_subsecs(0);
        Self { id: Uuid::new_v4(), scenario_id, status, version: 0, created_at: now, updated_at: now }
    }

    pub fn tree(&self) -> Result<Scenario, StatusError> {
        serde_yaml::from_str(&self.status).map_err(|e| StatusError::Codec(e.to_string()))
    }
}
