use crate::{error::Error as JobTriggerError, jobs::JobEnvironment};
use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};
use time::OffsetDateTime;
use uuid::Uuid;

/// Prefix of the buckets with the publicly available templates, suffixed with the location.
const PUBLIC_TEMPLATES_BUCKET_PREFIX: &str = "gs://dataflow-templates-";

/// Default interval between two recurring submissions of the same descriptor.
const DEFAULT_SCHEDULE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Static declaration of a batch job: what template to launch, where, and with which parameters.
/// Descriptor cannot be changed once built, every submission uses the very same values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTriggerDescriptor {
    name: String,
    template_identifier: String,
    location: String,
    parameters: BTreeMap<String, String>,
    required_parameters: BTreeSet<String>,
    environment: JobEnvironment,
    schedule_interval: Duration,
    start_time: OffsetDateTime,
}

impl JobTriggerDescriptor {
    /// Starts building a descriptor with the specified trigger name, template and location.
    pub fn builder(
        name: impl Into<String>,
        template_identifier: impl Into<String>,
        location: impl Into<String>,
    ) -> JobTriggerDescriptorBuilder {
        JobTriggerDescriptorBuilder {
            name: name.into(),
            template_identifier: template_identifier.into(),
            location: location.into(),
            parameters: BTreeMap::new(),
            required_parameters: BTreeSet::new(),
            environment: JobEnvironment::default(),
            schedule_interval: DEFAULT_SCHEDULE_INTERVAL,
            start_time: None,
        }
    }

    /// Unique name of the trigger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region where the job must run.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Template parameters.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Parameters that must be present before the job is submitted.
    pub fn required_parameters(&self) -> &BTreeSet<String> {
        &self.required_parameters
    }

    /// Runtime environment for the job.
    pub fn environment(&self) -> &JobEnvironment {
        &self.environment
    }

    /// Interval between recurring submissions.
    pub fn schedule_interval(&self) -> Duration {
        self.schedule_interval
    }

    /// Earliest time the trigger becomes active.
    pub fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }

    /// Indicates whether the trigger is active at the specified time.
    pub fn is_active_at(&self, time: OffsetDateTime) -> bool {
        time >= self.start_time
    }

    /// Time of the first firing for a trigger registered at the specified time. Firings are
    /// aligned to `start_time + k * schedule_interval`: inactive triggers first fire at the start
    /// time, and active ones fire right away for the latest slot that's already due.
    pub fn first_firing_at(&self, registered_at: OffsetDateTime) -> OffsetDateTime {
        let interval = self.schedule_interval.as_secs();
        if registered_at <= self.start_time || interval == 0 {
            return self.start_time;
        }

        let elapsed = (registered_at - self.start_time)
            .whole_seconds()
            .unsigned_abs();
        i64::try_from(elapsed - elapsed % interval)
            .ok()
            .and_then(|offset| {
                self.start_time
                    .checked_add(time::Duration::seconds(offset))
            })
            .unwrap_or(registered_at)
    }

    /// Full path of the template to launch. Identifiers that aren't `gs://` paths are treated as
    /// names of the public templates available in the job location.
    pub fn template_path(&self) -> String {
        let template_identifier = self.template_identifier.trim();
        if template_identifier.starts_with("gs://") {
            template_identifier.to_string()
        } else {
            format!(
                "{PUBLIC_TEMPLATES_BUCKET_PREFIX}{}/latest/{template_identifier}",
                self.location.trim()
            )
        }
    }

    /// Generates a unique name for a new job launched from this descriptor. Job names must start
    /// with a letter and can only contain lowercase letters, digits and hyphens.
    pub fn generate_job_name(&self) -> String {
        let sanitized_name = self
            .name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect::<String>();
        let sanitized_name = sanitized_name.trim_matches('-');

        let suffix = Uuid::now_v7().simple();
        match sanitized_name.chars().next() {
            None => format!("job-{suffix}"),
            Some(c) if c.is_ascii_lowercase() => format!("{sanitized_name}-{suffix}"),
            Some(_) => format!("job-{sanitized_name}-{suffix}"),
        }
    }

    /// Checks that the descriptor is complete enough to be submitted. This doesn't know anything
    /// about template specific schemas, the execution service validates parameters on its own.
    pub fn validate(&self) -> Result<(), JobTriggerError> {
        if self.template_identifier.trim().is_empty() {
            return Err(JobTriggerError::invalid_configuration(format!(
                "Template identifier of the trigger ({}) cannot be empty.",
                self.name
            )));
        }

        if self.location.trim().is_empty() {
            return Err(JobTriggerError::invalid_configuration(format!(
                "Location of the trigger ({}) cannot be empty.",
                self.name
            )));
        }

        if self.parameters.keys().any(|key| key.trim().is_empty()) {
            return Err(JobTriggerError::invalid_configuration(format!(
                "Parameter names of the trigger ({}) cannot be empty.",
                self.name
            )));
        }

        let missing_parameters = self
            .required_parameters
            .iter()
            .filter(|key| {
                self.parameters
                    .get(key.as_str())
                    .is_none_or(|value| value.trim().is_empty())
            })
            .map(String::as_str)
            .collect::<Vec<_>>();
        if !missing_parameters.is_empty() {
            return Err(JobTriggerError::invalid_configuration(format!(
                "Trigger ({}) is missing required parameters: {}.",
                self.name,
                missing_parameters.join(", ")
            )));
        }

        Ok(())
    }
}

/// Assembles [`JobTriggerDescriptor`] values. Building a descriptor has no side effects, it has to
/// be explicitly submitted or registered with the scheduler.
#[derive(Debug, Clone)]
pub struct JobTriggerDescriptorBuilder {
    name: String,
    template_identifier: String,
    location: String,
    parameters: BTreeMap<String, String>,
    required_parameters: BTreeSet<String>,
    environment: JobEnvironment,
    schedule_interval: Duration,
    start_time: Option<OffsetDateTime>,
}

impl JobTriggerDescriptorBuilder {
    /// Adds a template parameter, replacing the existing one with the same name.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Adds multiple template parameters.
    pub fn parameters<N: Into<String>, V: Into<String>>(
        mut self,
        parameters: impl IntoIterator<Item = (N, V)>,
    ) -> Self {
        self.parameters.extend(
            parameters
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        self
    }

    /// Marks multiple parameters as required.
    pub fn required_parameters<N: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = N>,
    ) -> Self {
        self.required_parameters
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn environment(mut self, environment: JobEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn schedule_interval(mut self, schedule_interval: Duration) -> Self {
        self.schedule_interval = schedule_interval;
        self
    }

    pub fn start_time(mut self, start_time: OffsetDateTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Builds the descriptor. If start time isn't set, the descriptor becomes active one interval
    /// before now, so it fires as soon as it's registered. Intervals reaching beyond the supported
    /// date range make the descriptor active since the Unix epoch instead.
    pub fn build(self) -> JobTriggerDescriptor {
        let start_time = self.start_time.unwrap_or_else(|| {
            time::Duration::try_from(self.schedule_interval)
                .ok()
                .and_then(|interval| OffsetDateTime::now_utc().checked_sub(interval))
                .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        });
        JobTriggerDescriptor {
            name: self.name,
            template_identifier: self.template_identifier,
            location: self.location,
            parameters: self.parameters,
            required_parameters: self.required_parameters,
            environment: self.environment,
            schedule_interval: self.schedule_interval,
            start_time,
        }
    }
}
