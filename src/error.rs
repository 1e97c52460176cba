mod error_kind;

use anyhow::anyhow;
use std::fmt::{Debug, Display, Formatter};

pub use error_kind::ErrorKind;

/// Classified job submission error.
#[derive(thiserror::Error)]
pub struct Error {
    root_cause: anyhow::Error,
    kind: ErrorKind,
}

impl Error {
    /// Creates an invalid configuration error instance with the given message.
    pub fn invalid_configuration<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::InvalidConfiguration,
        }
    }

    /// Creates a submission rejected error instance with the given root cause.
    pub fn rejected_with_root_cause(root_cause: anyhow::Error) -> Self {
        Self {
            root_cause,
            kind: ErrorKind::SubmissionRejected,
        }
    }

    /// Creates a transient failure error instance with the given root cause.
    pub fn transient_with_root_cause(root_cause: anyhow::Error) -> Self {
        Self {
            root_cause,
            kind: ErrorKind::TransientFailure,
        }
    }

    /// Category of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Underlying error as reported by the failed operation.
    pub fn root_cause(&self) -> &anyhow::Error {
        &self.root_cause
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.kind, self.root_cause)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.root_cause, f)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        // Errors that cannot be classified are surfaced to the operator, but never retried.
        err.downcast::<Error>()
            .unwrap_or_else(Error::rejected_with_root_cause)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};
    use anyhow::anyhow;
    use insta::assert_debug_snapshot;

    #[test]
    fn can_create_invalid_configuration_errors() -> anyhow::Result<()> {
        let error = Error::invalid_configuration("Uh oh.");

        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
        assert!(!error.kind().is_retryable());
        assert_debug_snapshot!(error, @r###""Uh oh.""###);
        assert_eq!(error.to_string(), "invalid configuration: Uh oh.");

        Ok(())
    }

    #[test]
    fn can_create_rejected_errors() -> anyhow::Result<()> {
        let error = Error::rejected_with_root_cause(anyhow!("Permission denied."));

        assert_eq!(error.kind(), ErrorKind::SubmissionRejected);
        assert_eq!(error.to_string(), "submission rejected: Permission denied.");

        let error =
            Error::rejected_with_root_cause(anyhow!("Something sensitive").context("Uh oh."));
        assert_eq!(error.kind(), ErrorKind::SubmissionRejected);
        assert_debug_snapshot!(error, @r###"
        Error {
            context: "Uh oh.",
            source: "Something sensitive",
        }
        "###);
        assert_eq!(
            error.to_string(),
            "submission rejected: Uh oh.: Something sensitive"
        );

        Ok(())
    }

    #[test]
    fn can_create_transient_errors() -> anyhow::Result<()> {
        let error = Error::transient_with_root_cause(anyhow!("Service unavailable."));

        assert_eq!(error.kind(), ErrorKind::TransientFailure);
        assert!(error.kind().is_retryable());
        assert_eq!(
            error.to_string(),
            "transient failure: Service unavailable."
        );
        assert_eq!(error.root_cause().to_string(), "Service unavailable.");

        Ok(())
    }

    #[test]
    fn unclassified_errors_are_not_retryable() -> anyhow::Result<()> {
        let error = Error::from(anyhow!("Something unexpected"));

        assert_eq!(error.kind(), ErrorKind::SubmissionRejected);
        assert_debug_snapshot!(error, @r###""Something unexpected""###);

        Ok(())
    }

    #[test]
    fn can_recover_original_error() -> anyhow::Result<()> {
        let transient_error =
            Error::transient_with_root_cause(anyhow!("One").context("Two").context("Three"));
        let error = Error::from(anyhow!(transient_error).context("Four"));

        assert_eq!(error.kind(), ErrorKind::TransientFailure);
        assert_debug_snapshot!(error, @r###"
        Error {
            context: "Three",
            source: Error {
                context: "Two",
                source: "One",
            },
        }
        "###);

        Ok(())
    }
}
