mod retry;
mod scheduler_job_retry_strategy;
mod scheduler_trigger;
mod trigger_job;

pub use self::{
    retry::retry_transient, scheduler_job_retry_strategy::SchedulerJobRetryStrategy,
    scheduler_trigger::SchedulerTrigger,
};
use crate::{api::Api, error::Error as JobTriggerError, scheduler::trigger_job::TriggerJob};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio_cron_scheduler::JobScheduler;
use tracing::{debug, info};
use uuid::Uuid;

/// Scheduler ticks have a second precision.
const MIN_SCHEDULE_INTERVAL: Duration = Duration::from_secs(1);

/// Longest supported interval between two firings of the same trigger (100 Julian years).
const MAX_SCHEDULE_INTERVAL: Duration = Duration::from_secs(100 * 31_557_600);

/// The scheduler is responsible for firing registered triggers on their intervals.
pub struct Scheduler {
    inner_scheduler: JobScheduler,
    api: Arc<Api>,
    /// Scheduler job IDs of the registered triggers, keyed by trigger name.
    triggers: BTreeMap<String, Uuid>,
}

impl Scheduler {
    /// Creates a scheduler without any triggers. Triggers should be explicitly registered before
    /// or after the scheduler is started.
    pub async fn new(api: Arc<Api>) -> anyhow::Result<Self> {
        Ok(Self {
            inner_scheduler: JobScheduler::new().await?,
            api,
            triggers: BTreeMap::new(),
        })
    }

    /// Registers a trigger. Trigger names must be unique and non-empty.
    pub async fn register(&mut self, trigger: SchedulerTrigger) -> anyhow::Result<Uuid> {
        if trigger.name().trim().is_empty() {
            return Err(JobTriggerError::invalid_configuration(
                "Trigger name cannot be empty.",
            )
            .into());
        }

        if self.triggers.contains_key(trigger.name()) {
            return Err(JobTriggerError::invalid_configuration(format!(
                "Trigger ({}) is already registered.",
                trigger.name()
            ))
            .into());
        }

        let interval = trigger.descriptor().schedule_interval();
        if !(MIN_SCHEDULE_INTERVAL..=MAX_SCHEDULE_INTERVAL).contains(&interval) {
            return Err(JobTriggerError::invalid_configuration(format!(
                "Interval of the trigger ({}) should be between {} and {}, but received {}.",
                trigger.name(),
                humantime::format_duration(MIN_SCHEDULE_INTERVAL),
                humantime::format_duration(MAX_SCHEDULE_INTERVAL),
                humantime::format_duration(interval)
            ))
            .into());
        }

        let name = trigger.name().to_string();
        let descriptor = trigger.descriptor();
        info!(
            trigger.name = %name,
            "Registering trigger: template {} in {}, every {}, active since {}.",
            descriptor.template_path(),
            descriptor.location(),
            humantime::format_duration(descriptor.schedule_interval()),
            descriptor.start_time()
        );

        let job_id = self
            .inner_scheduler
            .add(TriggerJob::create(self.api.clone(), Arc::new(trigger))?)
            .await?;
        self.triggers.insert(name, job_id);

        Ok(job_id)
    }

    /// Withdraws the trigger with the specified name. Returns `false` if there is no such trigger.
    pub async fn unregister(&mut self, name: &str) -> anyhow::Result<bool> {
        let Some(job_id) = self.triggers.remove(name) else {
            return Ok(false);
        };

        self.inner_scheduler.remove(&job_id).await?;
        debug!(trigger.name = name, "Trigger has been unregistered.");

        Ok(true)
    }

    /// Returns names of the registered triggers.
    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.triggers.keys().map(String::as_str)
    }

    /// Starts firing registered triggers.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.inner_scheduler.start().await?;
        Ok(())
    }

    /// Stops the scheduler. Firings in progress are abandoned.
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.inner_scheduler.shutdown().await?;
        Ok(())
    }
}
