use crate::{
    jobs::{JobEnvironment, JobTriggerDescriptor},
    scheduler::{SchedulerJobRetryStrategy, SchedulerTrigger},
};
use serde_derive::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};
use time::OffsetDateTime;

/// Describes a trigger as it's declared in the configuration file.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TriggerConfig {
    /// Unique name of the trigger.
    pub name: String,
    /// Name or `gs://` path of the job template to launch.
    pub template: String,
    /// Region where the job must run.
    pub location: String,
    /// Parameters passed to the template as is.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Parameters that must be present before the job is submitted.
    #[serde(default)]
    pub required_parameters: BTreeSet<String>,
    /// Runtime environment for the launched jobs.
    #[serde(default)]
    pub environment: JobEnvironment,
    /// Interval between recurring submissions. Default is 1 day.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_interval")]
    pub interval: Duration,
    /// Earliest time the trigger becomes active. Defaults to one interval before the trigger is
    /// loaded, so that it becomes active right away.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_at: Option<OffsetDateTime>,
    /// Retry strategy for transient submission failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_strategy: Option<SchedulerJobRetryStrategy>,
}

impl TriggerConfig {
    /// Creates a trigger config with the required fields only.
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            location: location.into(),
            parameters: BTreeMap::new(),
            required_parameters: BTreeSet::new(),
            environment: JobEnvironment::default(),
            interval: default_interval(),
            start_at: None,
            retry_strategy: None,
        }
    }

    /// Builds an immutable job descriptor out of this trigger config.
    pub fn to_descriptor(&self) -> JobTriggerDescriptor {
        let builder =
            JobTriggerDescriptor::builder(&self.name, &self.template, &self.location)
                .parameters(self.parameters.clone())
                .required_parameters(self.required_parameters.iter().cloned())
                .environment(self.environment.clone())
                .schedule_interval(self.interval);
        let builder = match self.start_at {
            Some(start_at) => builder.start_time(start_at),
            None => builder,
        };

        builder.build()
    }
}

impl From<&TriggerConfig> for SchedulerTrigger {
    fn from(config: &TriggerConfig) -> Self {
        SchedulerTrigger::new(
            config.to_descriptor(),
            config
                .retry_strategy
                .unwrap_or_default(),
        )
    }
}

/// Default interval between trigger firings.
const fn default_interval() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

#[cfg(test)]
mod tests {
    use crate::{
        config::TriggerConfig,
        jobs::JobEnvironment,
        scheduler::{SchedulerJobRetryStrategy, SchedulerTrigger},
    };
    use std::time::Duration;
    use time::macros::datetime;

    #[test]
    fn deserialization_with_defaults() {
        let config: TriggerConfig = toml::from_str(
            r#"
        name = 'etl_task_dataflow'
        template = 'GCS_CSV_to_BigQuery'
        location = 'us-central1'
    "#,
        )
        .unwrap();
        assert_eq!(
            config,
            TriggerConfig::new("etl_task_dataflow", "GCS_CSV_to_BigQuery", "us-central1")
        );
        assert_eq!(config.interval, Duration::from_secs(86400));
    }

    #[test]
    fn deserialization() {
        let config: TriggerConfig = toml::from_str(
            r#"
        name = 'etl_task_dataflow'
        template = 'gs://dataflow-templates-us-central1/latest/GCS_CSV_to_BigQuery'
        location = 'us-central1'
        required_parameters = ['inputFilePattern', 'outputTable']
        interval = 3600000
        start_at = '2024-01-01T00:00:00Z'
        retry_strategy = { type = 'exponential', initialInterval = 1000, multiplier = 2, maxInterval = 60000, maxAttempts = 3 }

        [parameters]
        inputFilePattern = 'gs://my-bucket/input.csv'
        outputTable = 'my-project:dataset.table'
        delimiter = ','

        [environment]
        zone = 'us-central1-a'
        temp_location = 'gs://my-bucket/tmp/'
    "#,
        )
        .unwrap();

        assert_eq!(config.name, "etl_task_dataflow");
        assert_eq!(config.interval, Duration::from_secs(3600));
        assert_eq!(config.start_at, Some(datetime!(2024-01-01 0:00 UTC)));
        assert_eq!(
            config.required_parameters.iter().collect::<Vec<_>>(),
            vec!["inputFilePattern", "outputTable"]
        );
        assert_eq!(
            config.parameters.get("delimiter").map(String::as_str),
            Some(",")
        );
        assert_eq!(
            config.environment,
            JobEnvironment {
                zone: Some("us-central1-a".to_string()),
                temp_location: Some("gs://my-bucket/tmp/".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(
            config.retry_strategy,
            Some(SchedulerJobRetryStrategy::Exponential {
                initial_interval: Duration::from_secs(1),
                multiplier: 2,
                max_interval: Duration::from_secs(60),
                max_attempts: 3,
            })
        );
    }

    #[test]
    fn can_be_converted_to_trigger() {
        let mut config =
            TriggerConfig::new("etl_task_dataflow", "GCS_CSV_to_BigQuery", "us-central1");
        config
            .parameters
            .insert("delimiter".to_string(), ",".to_string());
        config.required_parameters.insert("delimiter".to_string());
        config.start_at = Some(datetime!(2024-01-01 0:00 UTC));

        let trigger = SchedulerTrigger::from(&config);
        let descriptor = trigger.descriptor();
        assert_eq!(descriptor.name(), "etl_task_dataflow");
        assert_eq!(
            descriptor.template_path(),
            "gs://dataflow-templates-us-central1/latest/GCS_CSV_to_BigQuery"
        );
        assert_eq!(descriptor.location(), "us-central1");
        assert_eq!(
            descriptor.parameters().get("delimiter").map(String::as_str),
            Some(",")
        );
        assert!(descriptor.required_parameters().contains("delimiter"));
        assert_eq!(descriptor.schedule_interval(), Duration::from_secs(86400));
        assert_eq!(descriptor.start_time(), datetime!(2024-01-01 0:00 UTC));
        assert_eq!(trigger.retry_strategy(), &SchedulerJobRetryStrategy::default());
    }
}
