use serde_derive::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use url::Url;

/// Configuration for the integration with the managed batch-execution service.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct ExecutionServiceConfig {
    /// The URL to access the execution service API.
    pub host: Url,
    /// Project that jobs are launched in, unless a trigger overrides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Bearer token used to authorize job submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for ExecutionServiceConfig {
    fn default() -> Self {
        Self {
            host: Url::parse("https://dataflow.googleapis.com")
                .expect("Cannot parse execution service host parameter."),
            project: None,
            access_token: None,
        }
    }
}

// Access token must never end up in logs.
impl Debug for ExecutionServiceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionServiceConfig")
            .field("host", &self.host)
            .field("project", &self.project)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "***REDACTED***"),
            )
            .finish()
    }
}
