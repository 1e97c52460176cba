use crate::config::{ExecutionServiceConfig, HttpConfig, TriggerConfig};
use figment::{Figment, Metadata, Profile, Provider, providers, providers::Format, value};
use serde_derive::{Deserialize, Serialize};

/// Raw configuration structure that is used to read the configuration from the file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct RawConfig {
    /// Configuration for the managed batch-execution service.
    #[serde(default)]
    pub execution: ExecutionServiceConfig,
    /// Configuration for the HTTP functionality.
    #[serde(default)]
    pub http: HttpConfig,
    /// Triggers that should be registered with the scheduler.
    #[serde(default)]
    pub triggers: Vec<TriggerConfig>,
}

impl RawConfig {
    /// Reads the configuration from the file (TOML) and merges it with the default values.
    pub fn read_from_file(path: &str) -> anyhow::Result<Self> {
        Ok(Figment::from(RawConfig::default())
            .merge(providers::Toml::file(path))
            .merge(providers::Env::prefixed("JOBTRIGGER_").split("__"))
            .extract()?)
    }
}

impl Provider for RawConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named("Job trigger main configuration")
    }

    fn data(&self) -> Result<value::Map<Profile, value::Dict>, figment::Error> {
        providers::Serialized::defaults(Self::default()).data()
    }
}
