//! Status probe for a running gateway.

use gateway_config_and_utils::Config;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Check gateway status by calling its health endpoint.
pub async fn check_status(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.listen_addr()?;
    let url = format!("http://{addr}/health");

    let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => {
            let body: serde_json::Value = response.json().await?;
            let status = body
                .get("status")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            let version = body
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");

            println!("Gateway is running");
            println!("  Status:  {}", status);
            println!("  Version: {}", version);
            println!("  Address: {}", addr);
        }
        Ok(response) => {
            println!("Gateway returned HTTP {}", response.status());
        }
        Err(err) if err.is_connect() || err.is_timeout() => {
            println!("Gateway is not running (no answer on {})", addr);
        }
        Err(err) => {
            println!("Failed to reach gateway: {}", err);
        }
    }

    Ok(())
}
