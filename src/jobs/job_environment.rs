use serde_derive::{Deserialize, Serialize};

/// Runtime environment for the launched jobs.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JobEnvironment {
    /// Project to launch the job in. Falls back to the execution service project if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Compute zone for the job workers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Location for staging temporary files (e.g. `gs://bucket/tmp/`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_location: Option<String>,
    /// Service account the job workers run as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_email: Option<String>,
    /// Maximum number of workers the job can scale to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<u32>,
    /// Additional experiment flags for the job.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_experiments: Vec<String>,
}
