//! Lambda command

use anyhow::{anyhow, Result};

pub async fn run() -> Result<()> {
    unseal::handler::run_lambda()
        .await
        .map_err(|e| anyhow!("Lambda runtime failed: {}", e))
}
