use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::error::scenario::ScenarioError;
use crate::types::jobs::chaos_job::ChaosJob;
use crate::types::jobs::types::{ChaosJobType, JobStatus};
use crate::types::scenario::Scenario;

const COMMON_TEMPLATE: &str = include_str!("../../../resources/litmus/common.yaml");
const POD_DELETE_TEMPLATE: &str = include_str!("../../../resources/litmus/pod-delete.yaml");
const POD_IO_STRESS_TEMPLATE: &str = include_str!("../../../resources/litmus/pod-io-stress.yaml");

/// Built-in defaults of an experiment.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentTemplate {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub service_account_name: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl ExperimentTemplate {
    fn parse(source: &str) -> Result<Self, ScenarioError> {
        serde_yaml::from_str(source).map_err(|e| ScenarioError::InvalidTemplate(e.to_string()))
    }

    /// The common template with the template of `job_type` laid over it.
    pub fn for_type(job_type: &ChaosJobType) -> Result<Self, ScenarioError> {
        let specific = match job_type {
            ChaosJobType::PodDelete => POD_DELETE_TEMPLATE,
            ChaosJobType::PodIoStress => POD_IO_STRESS_TEMPLATE,
            ChaosJobType::Unsupported(name) => return Err(ScenarioError::UnsupportedType(name.clone())),
        };
        let mut template = Self::parse(COMMON_TEMPLATE)?;
        let specific = Self::parse(specific)?;
        if !specific.image.is_empty() {
            template.image = specific.image;
        }
        if !specific.service_account_name.is_empty() {
            template.service_account_name = specific.service_account_name;
        }
        template.env.extend(specific.env);
        Ok(template)
    }
}

/// Key of a caller override for `key` of step `step_name`.
pub fn override_key(step_name: &str, key: &str) -> String {
    format!("{}-{}", step_name, key)
}

/// Fills a step from its template and applies caller overrides, then resets it to pending.
///
/// Template keys only fill gaps in the step config. An override replaces a key that is
/// present after defaulting and is ignored otherwise.
pub fn apply_defaults(job: &mut ChaosJob, overrides: &HashMap<String, String>) -> Result<(), ScenarioError> {
    let template = ExperimentTemplate::for_type(&job.job_type)?;
    for (key, value) in template.env {
        job.config.entry(key).or_insert(value);
    }
    for (key, value) in job.config.iter_mut() {
        if let Some(replacement) = overrides.get(&override_key(&job.name, key)) {
            *value = replacement.clone();
        }
    }
    if job.image.is_empty() {
        job.image = template.image;
    }
    if job.service_account_name.is_empty() {
        job.service_account_name = template.service_account_name;
    }
    job.status = JobStatus::Pending;
    job.failed_reason.clear();
    Ok(())
}

/// [`apply_defaults`] for every step of a scenario.
pub fn apply_scenario_defaults(
    scenario: &mut Scenario,
    overrides: &HashMap<String, String>,
) -> Result<(), ScenarioError> {
    scenario.jobs_mut().try_for_each(|job| apply_defaults(job, overrides))
}
