//! Run command

use anyhow::{anyhow, Result};
use tracing::{debug, warn};
use unseal::aws::load_sdk_config;
use unseal::handler::invoke;
use unseal_core::Settings;

use crate::cli::RunArgs;

pub async fn run(args: RunArgs) -> Result<()> {
    load_dotenv();

    let settings =
        Settings::from_lookup(|name| args.override_for(name).or_else(|| std::env::var(name).ok()));

    let sdk_config = load_sdk_config().await;
    let response = invoke(&sdk_config, settings).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.is_success() {
        Ok(())
    } else {
        Err(anyhow!(
            "Invocation failed: {}",
            response.body.error.as_deref().unwrap_or("unknown error")
        ))
    }
}

/// Load a local `.env` file if there is one
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}
