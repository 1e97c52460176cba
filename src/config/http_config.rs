use serde_derive::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

/// Settings of the HTTP layer used to talk to the execution service.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct HttpConfig {
    #[serde(default)]
    pub client: HttpClientConfig,
}

/// Timeouts and diagnostics of the execution service client. Every request that runs into any of
/// the timeouts is reported as a transient failure and can be retried by the scheduler.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Upper bound for a single job-start request, from connecting until the acknowledgment is
    /// read. Default is 30 seconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "HttpClientConfig::default_timeout")]
    pub timeout: Duration,
    /// Upper bound for establishing a connection to the execution service. Default is 10 seconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "HttpClientConfig::default_connect_timeout")]
    pub connect_timeout: Duration,
    /// How long idle connections are kept open between firings. Default is 5 seconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "HttpClientConfig::default_pool_idle_timeout")]
    pub pool_idle_timeout: Duration,
    /// Logs connection level reads and writes at trace level.
    #[serde(default)]
    pub verbose: bool,
}

impl HttpClientConfig {
    const fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }

    const fn default_connect_timeout() -> Duration {
        Duration::from_secs(10)
    }

    const fn default_pool_idle_timeout() -> Duration {
        Duration::from_secs(5)
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            connect_timeout: Self::default_connect_timeout(),
            pool_idle_timeout: Self::default_pool_idle_timeout(),
            verbose: false,
        }
    }
}
