mod execution_service_config;
mod http_config;
mod raw_config;
mod trigger_config;

pub use self::{
    execution_service_config::ExecutionServiceConfig,
    http_config::{HttpClientConfig, HttpConfig},
    raw_config::RawConfig,
    trigger_config::TriggerConfig,
};

/// Main application config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Configuration for the managed batch-execution service.
    pub execution: ExecutionServiceConfig,
    /// Configuration for the HTTP functionality.
    pub http: HttpConfig,
    /// Triggers that should be registered with the scheduler.
    pub triggers: Vec<TriggerConfig>,
}

impl Config {
    /// Returns configuration of the trigger with the specified name, if any.
    pub fn trigger(&self, name: &str) -> Option<&TriggerConfig> {
        self.triggers.iter().find(|trigger| trigger.name == name)
    }
}

impl AsRef<Config> for Config {
    fn as_ref(&self) -> &Config {
        self
    }
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        Self {
            execution: raw_config.execution,
            http: raw_config.http,
            triggers: raw_config.triggers,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, RawConfig, TriggerConfig};

    #[test]
    fn can_find_triggers_by_name() -> anyhow::Result<()> {
        let config = Config::from(RawConfig {
            triggers: vec![
                TriggerConfig::new("etl", "GCS_CSV_to_BigQuery", "us-central1"),
                TriggerConfig::new("backfill", "GCS_Text_to_BigQuery", "europe-west1"),
            ],
            ..RawConfig::default()
        });

        assert_eq!(
            config.trigger("backfill").map(|trigger| trigger.location.as_str()),
            Some("europe-west1")
        );
        assert!(config.trigger("unknown").is_none());

        Ok(())
    }
}
