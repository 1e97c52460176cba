mod api_ext;
mod job_environment;
mod job_handle;
mod job_trigger_descriptor;
mod launch_template;
mod submission_state;

pub use self::{
    api_ext::JobsApi,
    job_environment::JobEnvironment,
    job_handle::JobHandle,
    job_trigger_descriptor::{JobTriggerDescriptor, JobTriggerDescriptorBuilder},
    submission_state::SubmissionState,
};

#[cfg(test)]
pub mod tests {
    use super::JobTriggerDescriptor;

    /// Descriptor of a CSV-to-table ingestion job with all the parameters the template requires.
    pub fn mock_descriptor() -> JobTriggerDescriptor {
        JobTriggerDescriptor::builder("etl_task_dataflow", "GCS_CSV_to_BigQuery", "us-central1")
            .parameters([
                ("inputFilePattern", "gs://bucket/in.csv"),
                ("outputTable", "proj:ds.table"),
                ("delimiter", ","),
                ("schemaJSONPath", "gs://bucket/schema.json"),
            ])
            .required_parameters([
                "inputFilePattern",
                "outputTable",
                "delimiter",
                "schemaJSONPath",
            ])
            .build()
    }
}
