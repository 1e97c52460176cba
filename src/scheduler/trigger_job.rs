use crate::{
    api::Api, error::Error as JobTriggerError, jobs::JobHandle,
    scheduler::SchedulerTrigger,
};
use std::{sync::Arc, time::Instant};
use time::OffsetDateTime;
use tokio_cron_scheduler::{Job, job::job_data::JobStoredData};
use tracing::{debug, error, info};

/// The job executes on the trigger interval and submits the trigger descriptor to the execution
/// service.
pub(crate) struct TriggerJob;
impl TriggerJob {
    /// Creates a new recurring `TriggerJob` job for the specified trigger. The first tick is
    /// aligned to the trigger schedule, so active triggers fire as soon as the scheduler runs.
    pub fn create(api: Arc<Api>, trigger: Arc<SchedulerTrigger>) -> anyhow::Result<Job> {
        let interval = trigger.descriptor().schedule_interval();
        let first_firing = trigger
            .descriptor()
            .first_firing_at(OffsetDateTime::now_utc());
        // Scheduler ticks have a second precision, round up to not fire before the start time.
        let first_tick = first_firing.unix_timestamp() + i64::from(first_firing.nanosecond() > 0);

        let mut job = Job::new_repeated_async(interval, move |job_id, _| {
            let api = api.clone();
            let trigger = trigger.clone();
            Box::pin(async move {
                let execute_start = Instant::now();
                match Self::execute(api, trigger.clone()).await {
                    Ok(Some(handle)) => {
                        info!(
                            trigger.name = trigger.name(),
                            job.id = %handle.id,
                            scheduler.job.id = %job_id,
                            "Trigger fired, job has been accepted ({} elapsed).",
                            humantime::format_duration(execute_start.elapsed())
                        );
                    }
                    Ok(None) => {}
                    Err(err) => {
                        error!(
                            trigger.name = trigger.name(),
                            error.kind = %err.kind(),
                            scheduler.job.id = %job_id,
                            "Trigger fired, but job submission failed ({} elapsed): {err}",
                            humantime::format_duration(execute_start.elapsed())
                        );
                    }
                }
            })
        })?;

        let job_data = job.job_data()?;
        job.set_job_data(JobStoredData {
            next_tick: u64::try_from(first_tick).unwrap_or(1).max(1),
            ..job_data
        })?;

        Ok(job)
    }

    /// Executes a `TriggerJob` job. Returns `None` if the trigger isn't active yet.
    pub async fn execute(
        api: Arc<Api>,
        trigger: Arc<SchedulerTrigger>,
    ) -> Result<Option<JobHandle>, JobTriggerError> {
        let descriptor = trigger.descriptor();
        if !descriptor.is_active_at(OffsetDateTime::now_utc()) {
            debug!(
                trigger.name = trigger.name(),
                "Trigger isn't active until {}, skipping.",
                descriptor.start_time()
            );
            return Ok(None);
        }

        api.jobs()
            .submit_with_retry(descriptor, trigger.retry_strategy())
            .await
            .map(Some)
    }
}
