use crate::{
    api::Api,
    error::Error as JobTriggerError,
    jobs::{
        JobHandle, JobTriggerDescriptor, SubmissionState,
        launch_template::{
            LaunchTemplateParameters, LaunchTemplateResponse, RuntimeEnvironment,
            ServiceErrorResponse,
        },
    },
    scheduler::{SchedulerJobRetryStrategy, retry_transient},
};
use anyhow::{Context, anyhow};
use reqwest::StatusCode;
use reqwest_retry::{Retryable, default_on_request_failure, default_on_request_success};
use tracing::{debug, info};

/// API to submit jobs to the managed batch-execution service.
pub struct JobsApi<'a> {
    api: &'a Api,
}

impl<'a> JobsApi<'a> {
    /// Creates Jobs API.
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Submits the described job to the execution service. Every call sends exactly one job-start
    /// request (or none if the descriptor is invalid), and submitting the same descriptor twice
    /// results in two independent jobs.
    pub async fn submit(
        &self,
        descriptor: &JobTriggerDescriptor,
    ) -> Result<JobHandle, JobTriggerError> {
        let state = SubmissionState::Pending;

        descriptor.validate()?;
        let project = descriptor
            .environment()
            .project
            .as_deref()
            .or(self.api.config.execution.project.as_deref())
            .map(str::trim)
            .filter(|project| !project.is_empty())
            .ok_or_else(|| {
                JobTriggerError::invalid_configuration(format!(
                    "Project of the trigger ({}) is not configured.",
                    descriptor.name()
                ))
            })?;

        let job_name = descriptor.generate_job_name();
        let endpoint = format!(
            "{}v1b3/projects/{}/locations/{}/templates:launch",
            self.api.config.execution.host,
            urlencoding::encode(project),
            urlencoding::encode(descriptor.location().trim())
        );
        let mut request = self
            .api
            .network
            .http_client
            .post(&endpoint)
            .query(&[("gcsPath", descriptor.template_path())])
            .json(&LaunchTemplateParameters {
                job_name: job_name.clone(),
                parameters: descriptor.parameters(),
                environment: RuntimeEnvironment::from(descriptor.environment()),
            });
        if let Some(access_token) = &self.api.config.execution.access_token {
            request = request.bearer_auth(access_token);
        }

        let state = state.transition(SubmissionState::Submitted)?;
        debug!(
            trigger.name = descriptor.name(),
            job.name = %job_name,
            submission.state = ?state,
            "Sending job-start request."
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let retryable = default_on_request_failure(&err);
                let root_cause = anyhow!(err)
                    .context(format!("Cannot send job-start request ({job_name})."));
                return Err(match retryable {
                    Some(Retryable::Transient) => {
                        JobTriggerError::transient_with_root_cause(root_cause)
                    }
                    _ => {
                        state.transition(SubmissionState::Rejected)?;
                        JobTriggerError::rejected_with_root_cause(root_cause)
                    }
                });
            }
        };

        let status_code = response.status();
        if status_code.is_success() {
            let launched_job = response
                .json::<LaunchTemplateResponse>()
                .await
                .with_context(|| format!("Cannot deserialize launched job ({job_name})."))
                .and_then(|response| {
                    response.job.ok_or_else(|| {
                        anyhow!("Execution service didn't return launched job ({job_name}).")
                    })
                });
            return match launched_job {
                Ok(launched_job) => {
                    let state = state.transition(SubmissionState::Accepted)?;
                    info!(
                        trigger.name = descriptor.name(),
                        job.id = %launched_job.id,
                        job.name = %job_name,
                        "Job has been accepted by the execution service."
                    );
                    Ok(JobHandle {
                        id: launched_job.id,
                        name: launched_job.name.unwrap_or(job_name),
                        status: state,
                        job_state: launched_job.current_state,
                    })
                }
                Err(err) => {
                    state.transition(SubmissionState::Rejected)?;
                    Err(JobTriggerError::rejected_with_root_cause(err))
                }
            };
        }

        // Quota errors won't go away on their own within a single firing.
        let retryable = if status_code == StatusCode::TOO_MANY_REQUESTS {
            Some(Retryable::Fatal)
        } else {
            default_on_request_success(&response)
        };

        let response_text = response
            .text()
            .await
            .with_context(|| format!("Cannot read execution service response ({job_name})."))
            .map_err(JobTriggerError::transient_with_root_cause)?;
        let (error_message, error_status) =
            match serde_json::from_str::<ServiceErrorResponse>(&response_text) {
                Ok(response) => (response.error.message, response.error.status),
                Err(_) => (response_text, None),
            };
        let root_cause = anyhow!(error_message).context(match error_status {
            Some(error_status) => format!(
                "Execution service failed to launch job ({job_name}, {status_code}, {error_status})."
            ),
            None => format!("Execution service failed to launch job ({job_name}, {status_code})."),
        });

        Err(match retryable {
            Some(Retryable::Transient) => JobTriggerError::transient_with_root_cause(root_cause),
            _ => {
                state.transition(SubmissionState::Rejected)?;
                JobTriggerError::rejected_with_root_cause(root_cause)
            }
        })
    }

    /// Submits the described job, retrying transient failures according to the retry strategy.
    /// Every retry is an independent submission.
    pub async fn submit_with_retry(
        &self,
        descriptor: &JobTriggerDescriptor,
        retry_strategy: &SchedulerJobRetryStrategy,
    ) -> Result<JobHandle, JobTriggerError> {
        retry_transient(retry_strategy, move |_| self.submit(descriptor)).await
    }
}

impl Api {
    /// Returns an API to submit jobs.
    pub fn jobs(&self) -> JobsApi<'_> {
        JobsApi::new(self)
    }
}
