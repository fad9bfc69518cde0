//! rds-snapper entry point.
//!
//! Loads configuration, then runs one prune-and-backup cycle. Exits with
//! status 1 only when configuration cannot be loaded; individual API
//! failures are logged and do not change the exit status.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rds_snapper::config::SnapperConfig;
use rds_snapper::inventory::RdsInventory;
use rds_snapper::service::BackupDriver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let config = match SnapperConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        region = %config.region,
        config = %config.config_path.display(),
        max_to_keep = config.max_to_keep,
        dry_run = config.dry_run,
        "starting rds-snapper"
    );

    let inventory = Arc::new(RdsInventory::new(&config.region).await);
    let driver = BackupDriver::from_config(inventory, &config);
    let report = driver.run().await;

    if report.failures() > 0 {
        tracing::warn!(failures = report.failures(), "run finished with failures");
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
