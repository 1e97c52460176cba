use crate::jobs::JobEnvironment;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of the `templates:launch` request.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchTemplateParameters<'a> {
    pub job_name: String,
    pub parameters: &'a BTreeMap<String, String>,
    pub environment: RuntimeEnvironment<'a>,
}

/// Runtime environment as it's expected by the execution service.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeEnvironment<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<u32>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub additional_experiments: &'a [String],
}

impl<'a> From<&'a JobEnvironment> for RuntimeEnvironment<'a> {
    fn from(environment: &'a JobEnvironment) -> Self {
        Self {
            zone: environment.zone.as_deref(),
            temp_location: environment.temp_location.as_deref(),
            service_account_email: environment.service_account_email.as_deref(),
            max_workers: environment.max_workers,
            additional_experiments: &environment.additional_experiments,
        }
    }
}

/// Successful response of the `templates:launch` request.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LaunchTemplateResponse {
    pub job: Option<LaunchedJob>,
}

/// Job created by the execution service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchedJob {
    pub id: String,
    pub name: Option<String>,
    pub current_state: Option<String>,
}

/// Error response of the execution service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceErrorResponse {
    pub error: ServiceError,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceError {
    pub message: String,
    pub status: Option<String>,
}
