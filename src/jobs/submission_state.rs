use anyhow::bail;
use serde_derive::{Deserialize, Serialize};

/// State of a single submission attempt.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionState {
    /// The submission is prepared, but nothing has been sent yet.
    Pending,
    /// The job-start request has been sent and the acknowledgment is awaited.
    Submitted,
    /// The execution service acknowledged the job.
    Accepted,
    /// The execution service refused the job.
    Rejected,
}

impl SubmissionState {
    /// Indicates whether the state is final for the submission attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Moves the submission to the next state, failing if the transition isn't allowed.
    pub fn transition(self, next: SubmissionState) -> anyhow::Result<SubmissionState> {
        if self.is_terminal() {
            bail!("Submission is already finished as {self:?}, cannot move to {next:?}.");
        }

        match (self, next) {
            (Self::Pending, Self::Submitted)
            | (Self::Submitted, Self::Accepted)
            | (Self::Submitted, Self::Rejected) => Ok(next),
            (current, next) => bail!("Invalid submission state transition: {current:?} -> {next:?}."),
        }
    }
}
