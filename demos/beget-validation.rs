// # Beget Provider Real Environment Validation Tool
//
// Runs one reconciliation against the real Beget API. Use a test domain:
// the A record of the target is replaced and the full record set is written
// back.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - safe): only validates the configuration
// BEGET_LOGIN=your_login \
// BEGET_PASSWORD=your_api_password \
// DDNS_TARGET=ddns-test.example.com \
// DDNS_TEST_IP=1.2.3.4 \
// cargo run --bin beget_validation
//
// # Live mode (makes actual changes!)
// DDNS_MODE=live \
// BEGET_LOGIN=your_login \
// BEGET_PASSWORD=your_api_password \
// DDNS_TARGET=ddns-test.example.com \
// DDNS_TEST_IP=1.2.3.4 \
// cargo run --bin beget_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `BEGET_LOGIN`: Beget account login
// - `BEGET_PASSWORD`: Beget API password
// - `DDNS_TARGET`: Full record name (e.g., "ddns-test.example.com")
// - `DDNS_TEST_IP`: IPv4 address to write
//
// Optional:
// - `DDNS_DOMAIN`: Display domain (default: same as `DDNS_TARGET`)
// - `DDNS_OWNER`: Owner label (default: "@")
// - `DDNS_PRIORITY`: A record priority (default: 0)
// - `DDNS_MODE`: "dry-run" or "live" (default: dry-run)
// - `DDNS_TIMEOUT_SECS`: Cancel the update after this many seconds (default: 30)

use anyhow::Context;
use ddns_core::traits::DnsProvider;
use ddns_provider_beget::BegetProvider;
use serde_json::value::RawValue;
use std::env;
use std::net::IpAddr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{name} environment variable is required"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("=== Beget Provider Real Environment Validation ===");

    let login = required("BEGET_LOGIN")?;
    let password = required("BEGET_PASSWORD")?;
    let target = required("DDNS_TARGET")?;
    let test_ip: IpAddr = required("DDNS_TEST_IP")?
        .parse()
        .context("DDNS_TEST_IP is not an IP address")?;

    let domain = env::var("DDNS_DOMAIN").unwrap_or_else(|_| target.clone());
    let owner = env::var("DDNS_OWNER").unwrap_or_else(|_| "@".to_string());
    let priority: i64 = env::var("DDNS_PRIORITY")
        .ok()
        .map(|s| s.parse::<i64>())
        .transpose()
        .context("DDNS_PRIORITY is not an integer")?
        .unwrap_or(0);
    let timeout = Duration::from_secs(
        env::var("DDNS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30),
    );

    let mode = env::var("DDNS_MODE").unwrap_or_else(|_| "dry-run".to_string());
    let dry_run = mode.to_lowercase() != "live";

    if dry_run {
        tracing::warn!("Running in DRY-RUN mode - no changes will be made");
    } else {
        tracing::warn!("Running in LIVE mode - will make actual DNS changes!");
    }

    tracing::info!("Configuration:");
    tracing::info!("  Target: {}", target);
    tracing::info!("  Domain: {} (owner: {})", domain, owner);
    tracing::info!("  Priority: {}", priority);
    tracing::info!("  Test IP: {}", test_ip);
    tracing::info!("  Mode: {}", mode);

    // Step 1: construction validates the settings
    tracing::info!("--- Step 1: Creating Beget Provider ---");
    let settings = serde_json::json!({
        "login": login,
        "password": password,
        "domain": target,
        "priority": priority,
    });
    let settings = RawValue::from_string(settings.to_string())?;
    let provider = BegetProvider::new(&settings, &domain, &owner)?;

    tracing::info!("✓ Provider created: {}", provider.describe());
    tracing::info!("  Credentials validated (not shown for security)");

    if dry_run {
        tracing::info!("=== DRY-RUN COMPLETE ===");
        tracing::info!("No API calls were made. To update the record, set DDNS_MODE=live");
        return Ok(());
    }

    // Step 2: reconcile against the live API
    tracing::info!("--- Step 2: Updating A record ---");
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let deadline = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        deadline.cancel();
    });

    match provider.update(&cancel, &client, test_ip).await {
        Ok(applied) => {
            tracing::info!("✓ Update succeeded, applied IP: {}", applied);
            tracing::info!("Verify at: https://dnschecker.org/#A/{}", provider.target());
            Ok(())
        }
        Err(e) => {
            tracing::error!("✗ Update failed: {}", e);
            if let Some(body) = e.response_body() {
                tracing::error!("  Response body: {}", ddns_core::error::to_single_line(body));
            }
            Err(e.into())
        }
    }
}
