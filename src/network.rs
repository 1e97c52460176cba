use crate::config::HttpClientConfig;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

/// Network utilities.
#[derive(Clone)]
pub struct Network {
    pub http_client: ClientWithMiddleware,
}

impl Network {
    /// Creates a new `Network` instance.
    pub fn new(http_client: ClientWithMiddleware) -> Self {
        Self { http_client }
    }

    /// Creates a new `Network` instance with the HTTP client built from the specified config.
    /// Client doesn't retry failed requests, retries are the responsibility of the caller.
    pub fn create(config: &HttpClientConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .connection_verbose(config.verbose)
            .build()?;
        Ok(Self::new(
            ClientBuilder::new(http_client)
                .with(TracingMiddleware::default())
                .build(),
        ))
    }
}
