// src/lambda/mod.rs

//! AWS Lambda handler for scheduled runs.
//!
//! The function is invoked by a schedule; the event payload carries nothing
//! the run needs. Configuration comes from defaults plus environment
//! overrides (see [`Config::apply_env`](crate::models::Config::apply_env)),
//! and the access token from `GITHUB_ACCESS_TOKEN`.

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::{ACCESS_TOKEN_VAR, load_lambda_config};
use crate::error::Result;
use crate::pipeline::{RunReport, run_pipeline};

/// Response in API gateway proxy shape.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub status_code: u16,
    pub body: String,
}

impl TriggerResponse {
    /// Map a run result to the coarse trigger response.
    ///
    /// Per-item outcomes only show up in the logs.
    pub fn from_result(result: &Result<RunReport>) -> Self {
        match result {
            Ok(_) => Self {
                status_code: 200,
                body: "success".to_string(),
            },
            Err(e) => Self {
                status_code: 500,
                body: e.to_string(),
            },
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Value>) -> std::result::Result<TriggerResponse, LambdaError> {
    info!("Handling event: {:?}", event.payload);

    let result = run_scheduled().await;
    match &result {
        Ok(report) => info!(
            "Lambda execution successful: {} published, {} skipped, {} failed",
            report.published, report.skipped, report.failed
        ),
        Err(e) => error!("Lambda execution failed: {}", e),
    }

    Ok(TriggerResponse::from_result(&result))
}

/// Internal pipeline logic for the Lambda environment.
async fn run_scheduled() -> Result<RunReport> {
    let token = std::env::var(ACCESS_TOKEN_VAR).ok();
    let config = load_lambda_config()?;
    run_pipeline(config, token).await
}
