use serde_derive::Serialize;
use std::fmt::{Display, Formatter};

/// Describes the category of a job submission failure.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The descriptor is incomplete or malformed. Detected before any request is sent and never
    /// retried, the descriptor has to be fixed.
    InvalidConfiguration,
    /// The execution service refused the request (bad template reference, permission denied,
    /// quota exceeded, etc.).
    SubmissionRejected,
    /// The execution service is temporarily unreachable or unavailable.
    TransientFailure,
}

impl ErrorKind {
    /// Indicates whether the operation that failed with this kind of error can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientFailure)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::InvalidConfiguration => "invalid configuration",
            Self::SubmissionRejected => "submission rejected",
            Self::TransientFailure => "transient failure",
        })
    }
}
