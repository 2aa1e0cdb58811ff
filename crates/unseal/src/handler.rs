//! Lambda entry point

use aws_config::SdkConfig;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error};
use unseal_core::{InvocationResponse, Result, Settings};

use crate::aws::{build_pipeline, load_sdk_config};

/// Run one invocation with already-read settings
///
/// Settings errors are reported in the response like any other abort.
pub async fn invoke(sdk_config: &SdkConfig, settings: Result<Settings>) -> InvocationResponse {
    match settings {
        Ok(settings) => build_pipeline(sdk_config, settings).respond().await,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            InvocationResponse::from_error(&e)
        }
    }
}

/// Handle a Lambda event
///
/// The payload is not interpreted; settings come from the environment.
pub async fn function_handler(
    event: LambdaEvent<Value>,
    sdk_config: &SdkConfig,
) -> std::result::Result<InvocationResponse, Error> {
    debug!(
        request_id = %event.context.request_id,
        payload = %event.payload,
        "Received invocation"
    );

    Ok(invoke(sdk_config, Settings::from_env()).await)
}

/// Serve invocations until the runtime shuts down
pub async fn run_lambda() -> std::result::Result<(), Error> {
    let sdk_config = load_sdk_config().await;
    lambda_runtime::run(service_fn(|event| function_handler(event, &sdk_config))).await
}
