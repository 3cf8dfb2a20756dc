use serde::{Deserialize, Serialize};
use std::fmt;

/// The experiment a step runs.
///
/// Scenario definitions are written by hand, so an unknown type must survive parsing
/// and be rejected by the pre-run check instead of failing deserialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ChaosJobType {
    /// Deletes pods of the target application through the litmus `pod-delete` experiment
    PodDelete,
    /// Keeps a fraction of the target pods under io stress for a bounded duration
    PodIoStress,
    /// Any type this service does not know how to run
    Unsupported(String),
}

impl ChaosJobType {
    pub fn as_str(&self) -> &str {
        match self {
            ChaosJobType::PodDelete => "pod-delete",
            ChaosJobType::PodIoStress => "pod-io-stress",
            ChaosJobType::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ChaosJobType::Unsupported(_))
    }
}

impl From<String> for ChaosJobType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pod-delete" => ChaosJobType::PodDelete,
            "pod-io-stress" => ChaosJobType::PodIoStress,
            _ => ChaosJobType::Unsupported(value),
        }
    }
}

impl From<ChaosJobType> for String {
    fn from(value: ChaosJobType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ChaosJobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a step as recorded in the run-status document.
///
/// ```text
/// pending -> running -> success -> failed
///        \           \-> failed
///         \           \-> unknown
///          \-> success | failed | unknown
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    /// The step has been parsed and persisted but not dispatched yet
    #[default]
    Pending,
    /// The step's workload has been accepted by the platform
    Running,
    /// The step finished and its workloads were cleaned up
    Success,
    /// The step failed, see `failed_reason`
    Failed,
    /// The chaos pod ended in a phase we cannot interpret
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed | JobStatus::Unknown)
    }

    /// Guard applied before a status is written to the run-status document.
    ///
    /// `Success -> Failed` stays legal so that a failure discovered after a success was
    /// reported can still be recorded.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Pending, JobStatus::Running | JobStatus::Success | JobStatus::Failed | JobStatus::Unknown) => {
                true
            }
            (JobStatus::Running, JobStatus::Success | JobStatus::Failed | JobStatus::Unknown) => true,
            (JobStatus::Success, JobStatus::Failed) => true,
            _ => false,
        }
    }
}
