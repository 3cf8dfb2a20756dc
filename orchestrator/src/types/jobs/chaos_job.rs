use crate::types::jobs::types::{ChaosJobType, JobStatus};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One step of a scenario.
///
/// The same structure is used for the scenario definition written by users and for the
/// per-step entries of the run-status document, which is why it carries `status` and
/// `failed_reason`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChaosJob {
    /// Unique across the whole scenario
    pub name: String,
    #[serde(rename = "type")]
    pub job_type: ChaosJobType,
    /// Experiment tuning, exported to the chaos container as environment variables
    #[serde(default, deserialize_with = "deserialize_config")]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub service_account_name: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub failed_reason: String,
}

impl ChaosJob {
    pub fn new(name: impl Into<String>, job_type: ChaosJobType) -> Self {
        Self {
            name: name.into(),
            job_type,
            config: BTreeMap::new(),
            image: String::new(),
            service_account_name: String::new(),
            status: JobStatus::Pending,
            failed_reason: String::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Returns a config value, treating an empty string as unset.
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }
}

/// Hand-written definitions often leave numbers and booleans unquoted. The experiments
/// only read strings, so every scalar is kept in its textual form.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<ConfigScalar> for String {
    fn from(value: ConfigScalar) -> Self {
        match value {
            ConfigScalar::Text(text) => text,
            ConfigScalar::Integer(number) => number.to_string(),
            ConfigScalar::Float(number) => number.to_string(),
            ConfigScalar::Flag(flag) => flag.to_string(),
        }
    }
}

fn deserialize_config<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<ConfigScalar>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.map(String::from).unwrap_or_default()))
        .collect())
}
