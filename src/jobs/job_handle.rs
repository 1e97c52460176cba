use crate::jobs::SubmissionState;
use serde_derive::Serialize;

/// Reference to a job instance that the execution service accepted.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    /// Identifier of the job assigned by the execution service.
    pub id: String,
    /// Name the job was submitted with.
    pub name: String,
    /// Status of the submission that produced the job.
    pub status: SubmissionState,
    /// Job state reported by the execution service at submission time, e.g. `JOB_STATE_QUEUED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_state: Option<String>,
}
